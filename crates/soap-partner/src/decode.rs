//! Response decoder: XML reply bodies to typed results.
//!
//! Decoding is purely structural. Replies are parsed into a small tree of
//! local-named elements (prefixes vary between servers and API versions,
//! so they are stripped), then each operation's expected shape is read
//! off the tree. A reply that lacks the expected response or result
//! element is a decode error; a SOAP fault is detected separately and is
//! not a decode error.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, ErrorKind, Result};
use crate::sobject::{FieldValue, SObject};
use crate::types::{
    DescribeField, DescribeSObjectResult, LoginResult, QueryLocator, QueryResult, SaveError,
    SaveResult, SoapFault, UserInfo,
};

/// One parsed element: local name, `xsi:nil` flag, text content, children.
#[derive(Debug, Clone, Default)]
struct Element {
    name: String,
    nil: bool,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    fn child_bool(&self, name: &str) -> bool {
        self.child_text(name) == Some("true")
    }

    /// Depth-first search for the first descendant with the given name.
    fn descendant(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// The `*Response` element under the SOAP body.
    fn response_element(&self) -> Option<&Element> {
        let body = self.descendant("Body")?;
        body.children.iter().find(|c| c.name.ends_with("Response"))
    }
}

/// Parse a reply body into an element tree.
fn parse_tree(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = vec![Element::default()];

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                push_child(&mut stack, element)?;
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| Error::with_source(ErrorKind::Decode("bad text node".into()), e))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::decode("unbalanced end tag"))?;
                push_child(&mut stack, element)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::with_source(ErrorKind::Decode("malformed XML".into()), e)),
        }
    }

    if stack.len() != 1 {
        return Err(Error::decode("truncated XML reply"));
    }
    Ok(stack.pop().unwrap_or_default())
}

fn element_from_start(start: &quick_xml::events::BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut nil = false;
    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| Error::with_source(ErrorKind::Decode("bad attribute".into()), e))?;
        if attr.key.local_name().as_ref() == b"nil" {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::with_source(ErrorKind::Decode("bad attribute value".into()), e))?;
            nil = value == "true" || value == "1";
        }
    }
    Ok(Element {
        name,
        nil,
        ..Element::default()
    })
}

fn push_child(stack: &mut Vec<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None => Err(Error::decode("unbalanced end tag")),
    }
}

/// Detect a SOAP fault in a reply body.
///
/// Returns `None` for non-fault replies and for bodies too mangled to
/// parse (a mangled body becomes a decode error downstream instead).
pub fn parse_fault(xml: &str) -> Option<SoapFault> {
    if !xml.contains("faultcode") {
        return None;
    }
    let tree = parse_tree(xml).ok()?;
    let fault = tree.descendant("Fault")?;
    Some(SoapFault {
        fault_code: fault.child_text("faultcode")?.to_string(),
        fault_string: fault
            .child_text("faultstring")
            .unwrap_or("Unknown error")
            .to_string(),
    })
}

/// Decode a `login` reply.
pub fn parse_login_response(xml: &str) -> Result<LoginResult> {
    let tree = parse_tree(xml)?;
    let result = tree
        .response_element()
        .and_then(|r| r.child("result"))
        .ok_or_else(|| Error::decode("login reply has no result element"))?;

    let session_id = result
        .child_text("sessionId")
        .ok_or_else(|| Error::decode("login reply has no sessionId"))?
        .to_string();
    let server_url = result
        .child_text("serverUrl")
        .ok_or_else(|| Error::decode("login reply has no serverUrl"))?
        .to_string();

    let user_info = result
        .child("userInfo")
        .map(user_info_from_element)
        .unwrap_or_default();

    Ok(LoginResult {
        session_id,
        server_url,
        user_info,
    })
}

/// Decode a `getUserInfo` reply.
pub fn parse_user_info_response(xml: &str) -> Result<UserInfo> {
    let tree = parse_tree(xml)?;
    let result = tree
        .response_element()
        .and_then(|r| r.child("result"))
        .ok_or_else(|| Error::decode("getUserInfo reply has no result element"))?;
    Ok(user_info_from_element(result))
}

fn user_info_from_element(el: &Element) -> UserInfo {
    UserInfo {
        user_id: el.child_text("userId").unwrap_or_default().to_string(),
        organization_id: el
            .child_text("organizationId")
            .unwrap_or_default()
            .to_string(),
        user_full_name: el
            .child_text("userFullName")
            .unwrap_or_default()
            .to_string(),
        user_email: el.child_text("userEmail").unwrap_or_default().to_string(),
        user_name: el.child_text("userName").unwrap_or_default().to_string(),
        organization_name: el
            .child_text("organizationName")
            .unwrap_or_default()
            .to_string(),
    }
}

/// Decode a `describeSObject` reply (single result).
pub fn parse_describe_response(xml: &str) -> Result<DescribeSObjectResult> {
    let tree = parse_tree(xml)?;
    let result = tree
        .response_element()
        .and_then(|r| r.child("result"))
        .ok_or_else(|| Error::decode("describe reply has no result element"))?;
    Ok(describe_from_element(result))
}

/// Decode a `describeSObjects` reply (one result per requested name, in
/// request order).
pub fn parse_describe_many_response(xml: &str) -> Result<Vec<DescribeSObjectResult>> {
    let tree = parse_tree(xml)?;
    let response = tree
        .response_element()
        .ok_or_else(|| Error::decode("describe reply has no response element"))?;
    let results: Vec<_> = response
        .children_named("result")
        .map(describe_from_element)
        .collect();
    if results.is_empty() {
        return Err(Error::decode("describe reply has no result elements"));
    }
    Ok(results)
}

fn describe_from_element(el: &Element) -> DescribeSObjectResult {
    DescribeSObjectResult {
        name: el.child_text("name").unwrap_or_default().to_string(),
        label: el.child_text("label").unwrap_or_default().to_string(),
        label_plural: el
            .child_text("labelPlural")
            .unwrap_or_default()
            .to_string(),
        custom: el.child_bool("custom"),
        createable: el.child_bool("createable"),
        updateable: el.child_bool("updateable"),
        deletable: el.child_bool("deletable"),
        queryable: el.child_bool("queryable"),
        fields: el
            .children_named("fields")
            .map(|f| DescribeField {
                name: f.child_text("name").unwrap_or_default().to_string(),
                label: f.child_text("label").unwrap_or_default().to_string(),
                field_type: f.child_text("type").unwrap_or_default().to_string(),
                custom: f.child_bool("custom"),
                nillable: f.child_bool("nillable"),
                updateable: f.child_bool("updateable"),
            })
            .collect(),
    }
}

/// Decode a `query`/`queryAll`/`queryMore` reply.
///
/// The continuation cursor is surfaced only when `done` is false; a done
/// reply yields no cursor even if the server echoed a locator.
pub fn parse_query_response(xml: &str) -> Result<QueryResult> {
    let tree = parse_tree(xml)?;
    let result = tree
        .response_element()
        .and_then(|r| r.child("result"))
        .ok_or_else(|| Error::decode("query reply has no result element"))?;

    let done = result.child_bool("done");
    let size = result
        .child_text("size")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let query_locator = if done {
        None
    } else {
        result
            .child("queryLocator")
            .filter(|l| !l.nil && !l.text.is_empty())
            .map(|l| QueryLocator::new(l.text.clone()))
    };

    let records = result
        .children_named("records")
        .map(sobject_from_element)
        .collect();

    Ok(QueryResult {
        done,
        query_locator,
        size,
        records,
    })
}

/// Decode a `search` reply into its records, in server order.
pub fn parse_search_response(xml: &str) -> Result<Vec<SObject>> {
    let tree = parse_tree(xml)?;
    let result = tree
        .response_element()
        .and_then(|r| r.child("result"))
        .ok_or_else(|| Error::decode("search reply has no result element"))?;

    Ok(result
        .children_named("searchRecords")
        .filter_map(|sr| sr.child("record"))
        .map(sobject_from_element)
        .collect())
}

/// Decode a `retrieve` reply into its records, in server order.
pub fn parse_retrieve_response(xml: &str) -> Result<Vec<SObject>> {
    let tree = parse_tree(xml)?;
    let response = tree
        .response_element()
        .ok_or_else(|| Error::decode("retrieve reply has no response element"))?;
    Ok(response
        .children_named("result")
        .filter(|r| !r.nil)
        .map(sobject_from_element)
        .collect())
}

/// Decode a create/update/upsert/delete reply into per-record outcomes.
///
/// Outcome order and count mirror the reply's `result` elements, which the
/// server emits in input order; a record-level failure is data here, not
/// an error.
pub fn parse_save_results(xml: &str) -> Result<Vec<SaveResult>> {
    let tree = parse_tree(xml)?;
    let response = tree
        .response_element()
        .ok_or_else(|| Error::decode("save reply has no response element"))?;

    let results: Vec<SaveResult> = response
        .children_named("result")
        .map(|result| SaveResult {
            id: result
                .child("id")
                .filter(|id| !id.nil && !id.text.is_empty())
                .map(|id| id.text.clone()),
            success: result.child_bool("success"),
            errors: result
                .children_named("errors")
                .map(|err| SaveError {
                    status_code: err
                        .child_text("statusCode")
                        .unwrap_or_default()
                        .to_string(),
                    message: err.child_text("message").unwrap_or_default().to_string(),
                    fields: err
                        .children_named("fields")
                        .map(|f| f.text.clone())
                        .collect(),
                })
                .collect(),
        })
        .collect();

    if results.is_empty() {
        return Err(Error::decode("save reply has no result elements"));
    }
    Ok(results)
}

/// Decode a `logout` reply; the body carries no payload, only shape.
pub fn parse_logout_response(xml: &str) -> Result<()> {
    let tree = parse_tree(xml)?;
    tree.response_element()
        .ok_or_else(|| Error::decode("logout reply has no response element"))?;
    Ok(())
}

/// Build a record from a decoded sObject element: `type` fills the type
/// tag, the first non-nil `Id` fills the id slot (the Partner API repeats
/// it), everything else lands in the field bag in document order.
fn sobject_from_element(el: &Element) -> SObject {
    let object_type = el.child_text("type").unwrap_or_default().to_string();
    let mut record = SObject::new(object_type);

    let mut id_seen = false;
    for child in &el.children {
        match child.name.as_str() {
            "type" => {}
            "Id" => {
                if !id_seen && !child.nil && !child.text.is_empty() {
                    record = record.with_id(child.text.clone());
                    id_seen = true;
                }
            }
            _ => {
                let value = if child.nil {
                    FieldValue::Null
                } else {
                    FieldValue::from(child.text.clone())
                };
                record = record.field(child.name.clone(), value);
            }
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com" xmlns:sf="urn:sobject.partner.soap.sforce.com" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><soapenv:Body>{body}</soapenv:Body></soapenv:Envelope>"#
        )
    }

    #[test]
    fn test_parse_fault() {
        let xml = envelope(
            "<soapenv:Fault><faultcode>sf:INVALID_SESSION_ID</faultcode><faultstring>Session expired or invalid</faultstring></soapenv:Fault>",
        );
        let fault = parse_fault(&xml).unwrap();
        assert_eq!(fault.fault_code, "sf:INVALID_SESSION_ID");
        assert_eq!(fault.fault_string, "Session expired or invalid");
    }

    #[test]
    fn test_parse_fault_returns_none_for_success() {
        let xml = envelope("<queryResponse><result><done>true</done></result></queryResponse>");
        assert!(parse_fault(&xml).is_none());
    }

    #[test]
    fn test_parse_login_response() {
        let xml = envelope(
            "<loginResponse><result>\
             <serverUrl>https://na15.salesforce.com/services/Soap/u/62.0</serverUrl>\
             <sessionId>abcde12345</sessionId>\
             <userId>005000000000001</userId>\
             <userInfo>\
               <organizationId>00D000000000001</organizationId>\
               <organizationName>Acme</organizationName>\
               <userEmail>user@example.com</userEmail>\
               <userFullName>Jane Doe</userFullName>\
               <userId>005000000000001</userId>\
               <userName>user@example.com</userName>\
             </userInfo>\
             </result></loginResponse>",
        );

        let result = parse_login_response(&xml).unwrap();
        assert_eq!(result.session_id, "abcde12345");
        assert_eq!(
            result.server_url,
            "https://na15.salesforce.com/services/Soap/u/62.0"
        );
        assert_eq!(result.user_info.user_full_name, "Jane Doe");
        assert_eq!(result.user_info.organization_id, "00D000000000001");
    }

    #[test]
    fn test_parse_login_response_missing_session_is_decode_error() {
        let xml = envelope("<loginResponse><result><serverUrl>x</serverUrl></result></loginResponse>");
        let err = parse_login_response(&xml).unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::Decode(_)));
    }

    #[test]
    fn test_parse_user_info_response() {
        let xml = envelope(
            "<getUserInfoResponse><result>\
             <organizationId>00D000000000001</organizationId>\
             <userFullName>Jane Doe</userFullName>\
             <userId>005000000000001</userId>\
             </result></getUserInfoResponse>",
        );
        let info = parse_user_info_response(&xml).unwrap();
        assert_eq!(info.user_id, "005000000000001");
        assert_eq!(info.user_full_name, "Jane Doe");
    }

    #[test]
    fn test_parse_query_response_with_locator() {
        let xml = envelope(
            "<queryResponse><result xsi:type=\"QueryResult\">\
             <done>false</done>\
             <queryLocator>01g3000000-2000</queryLocator>\
             <records xsi:type=\"sf:sObject\">\
               <sf:type>Opportunity</sf:type>\
               <sf:Id>006A000000001</sf:Id>\
               <sf:Id>006A000000001</sf:Id>\
               <sf:Name>First Deal</sf:Name>\
               <sf:StageName>Prospecting</sf:StageName>\
             </records>\
             <records xsi:type=\"sf:sObject\">\
               <sf:type>Opportunity</sf:type>\
               <sf:Id>006A000000002</sf:Id>\
               <sf:Id>006A000000002</sf:Id>\
               <sf:Name>Second Deal</sf:Name>\
               <sf:StageName xsi:nil=\"true\"/>\
             </records>\
             <size>4000</size>\
             </result></queryResponse>",
        );

        let result = parse_query_response(&xml).unwrap();
        assert!(!result.done);
        assert_eq!(
            result.query_locator.as_ref().unwrap().as_str(),
            "01g3000000-2000"
        );
        assert_eq!(result.size, 4000);
        assert_eq!(result.records.len(), 2);

        let first = &result.records[0];
        assert_eq!(first.object_type(), "Opportunity");
        assert_eq!(first.id(), Some("006A000000001"));
        assert_eq!(first.get_text("Name"), Some("First Deal"));
        // Field order follows document order.
        let names: Vec<&str> = first.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Name", "StageName"]);

        // xsi:nil decodes as an explicit null, not a missing field.
        assert_eq!(result.records[1].get("StageName"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_parse_query_response_done_yields_no_cursor() {
        let xml = envelope(
            "<queryResponse><result>\
             <done>true</done>\
             <queryLocator xsi:nil=\"true\"/>\
             <size>1</size>\
             <records><sf:type>Account</sf:type><sf:Id>001X</sf:Id><sf:Name>Acme</sf:Name></records>\
             </result></queryResponse>",
        );
        let result = parse_query_response(&xml).unwrap();
        assert!(result.done);
        assert!(result.query_locator.is_none());
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn test_parse_query_response_without_result_is_decode_error() {
        let xml = envelope("<somethingElse/>");
        assert!(parse_query_response(&xml).is_err());
    }

    #[test]
    fn test_parse_search_response() {
        let xml = envelope(
            "<searchResponse><result>\
             <searchRecords><record><sf:type>Account</sf:type><sf:Id>001A</sf:Id><sf:Name>Acme</sf:Name></record></searchRecords>\
             <searchRecords><record><sf:type>Contact</sf:type><sf:Id>003A</sf:Id><sf:LastName>Doe</sf:LastName></record></searchRecords>\
             </result></searchResponse>",
        );
        let records = parse_search_response(&xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].object_type(), "Account");
        assert_eq!(records[1].get_text("LastName"), Some("Doe"));
    }

    #[test]
    fn test_parse_describe_response() {
        let xml = envelope(
            "<describeSObjectResponse><result>\
             <name>Opportunity</name>\
             <label>Opportunity</label>\
             <labelPlural>Opportunities</labelPlural>\
             <custom>false</custom>\
             <createable>true</createable>\
             <updateable>true</updateable>\
             <deletable>true</deletable>\
             <queryable>true</queryable>\
             <fields><name>Name</name><label>Name</label><type>string</type><custom>false</custom><nillable>false</nillable><updateable>true</updateable></fields>\
             <fields><name>CloseDate</name><label>Close Date</label><type>date</type><custom>false</custom><nillable>false</nillable><updateable>true</updateable></fields>\
             </result></describeSObjectResponse>",
        );
        let result = parse_describe_response(&xml).unwrap();
        assert_eq!(result.name, "Opportunity");
        assert!(result.createable);
        assert_eq!(result.fields.len(), 2);
        assert_eq!(result.fields[1].field_type, "date");
    }

    #[test]
    fn test_parse_describe_many_response_preserves_order() {
        let xml = envelope(
            "<describeSObjectsResponse>\
             <result><name>Account</name><label>Account</label><labelPlural>Accounts</labelPlural></result>\
             <result><name>Opportunity</name><label>Opportunity</label><labelPlural>Opportunities</labelPlural></result>\
             </describeSObjectsResponse>",
        );
        let results = parse_describe_many_response(&xml).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Account");
        assert_eq!(results[1].name, "Opportunity");
    }

    #[test]
    fn test_parse_save_results_preserves_order_and_failures() {
        let xml = envelope(
            "<createResponse>\
             <result><id>006A000000001</id><success>true</success></result>\
             <result>\
               <errors>\
                 <fields>CloseDate</fields>\
                 <message>Required fields are missing: [CloseDate]</message>\
                 <statusCode>REQUIRED_FIELD_MISSING</statusCode>\
               </errors>\
               <id xsi:nil=\"true\"/>\
               <success>false</success>\
             </result>\
             <result><id>006A000000003</id><success>true</success></result>\
             </createResponse>",
        );

        let results = parse_save_results(&xml).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id.as_deref(), Some("006A000000001"));
        assert!(results[0].success);
        assert!(results[0].errors.is_empty());

        let failed = &results[1];
        assert!(!failed.success);
        assert_eq!(failed.id, None);
        assert_eq!(failed.errors.len(), 1);
        assert_eq!(failed.errors[0].status_code, "REQUIRED_FIELD_MISSING");
        assert_eq!(failed.errors[0].fields, vec!["CloseDate"]);

        assert!(results[2].success);
    }

    #[test]
    fn test_parse_save_results_empty_is_decode_error() {
        let xml = envelope("<createResponse></createResponse>");
        assert!(parse_save_results(&xml).is_err());
    }

    #[test]
    fn test_parse_retrieve_response() {
        let xml = envelope(
            "<retrieveResponse>\
             <result><sf:type>Opportunity</sf:type><sf:Id>006A</sf:Id><sf:Name>Deal</sf:Name></result>\
             <result xsi:nil=\"true\"/>\
             </retrieveResponse>",
        );
        let records = parse_retrieve_response(&xml).unwrap();
        // Nil results (unknown ids) are dropped.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some("006A"));
    }

    #[test]
    fn test_parse_logout_response() {
        let xml = envelope("<logoutResponse></logoutResponse>");
        assert!(parse_logout_response(&xml).is_ok());
        assert!(parse_logout_response(&envelope("<x/>")).is_err());
    }

    #[test]
    fn test_malformed_xml_is_decode_error() {
        let err = parse_query_response("<unclosed").unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::Decode(_)));
    }
}

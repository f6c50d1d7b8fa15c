//! Envelope builder: pure functions from operation parameters to the XML
//! body fragment placed inside `<soapenv:Body>`.
//!
//! Two element namespaces, and the split is bit-exact or the server
//! rejects the request: `tns` (the Partner namespace) carries operation
//! elements and ordinary field elements; `ins0` (the sObject namespace)
//! carries the `type` tag and the `Id` element on `sObjects` entries.
//!
//! Every value interpolated here is XML-escaped; field and object names
//! become element names and are validated instead.

use sforce_soap_client::security::xml;

use crate::error::{Error, Result};
use crate::sobject::{FieldValue, SObject};
use crate::types::QueryLocator;

/// How to authenticate: exactly one of the two shapes.
///
/// Making this a sum type means "both shapes at once" and "session id
/// without a server url" are unrepresentable; only empty strings remain
/// to be checked at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginRequest {
    /// Username/password login against the configured login host.
    Credentials {
        username: String,
        password: String,
        /// Security token, appended to the password when present.
        security_token: Option<String>,
    },
    /// Adopt an already-issued session by validating it with a
    /// `getUserInfo` call against the given server.
    ExistingSession {
        session_id: String,
        server_url: String,
    },
}

impl LoginRequest {
    /// Username/password credentials.
    pub fn credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        LoginRequest::Credentials {
            username: username.into(),
            password: password.into(),
            security_token: None,
        }
    }

    /// Username/password credentials plus a security token.
    pub fn credentials_with_token(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        LoginRequest::Credentials {
            username: username.into(),
            password: password.into(),
            security_token: Some(security_token.into()),
        }
    }

    /// An already-issued session id and the server it was issued for.
    pub fn existing_session(
        session_id: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        LoginRequest::ExistingSession {
            session_id: session_id.into(),
            server_url: server_url.into(),
        }
    }

    /// Validate the request before any network interaction.
    pub fn validate(&self) -> Result<()> {
        match self {
            LoginRequest::Credentials {
                username, password, ..
            } => {
                if username.is_empty() {
                    return Err(Error::invalid_argument("login requires a username"));
                }
                if password.is_empty() {
                    return Err(Error::invalid_argument("login requires a password"));
                }
            }
            LoginRequest::ExistingSession {
                session_id,
                server_url,
            } => {
                if session_id.is_empty() {
                    return Err(Error::invalid_argument("login requires a session id"));
                }
                if server_url.is_empty() {
                    return Err(Error::invalid_argument(
                        "login with a session id requires a server url",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Which describe shape to request: the operation name itself depends on
/// whether one or many type names were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeRequest {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for DescribeRequest {
    fn from(name: &str) -> Self {
        DescribeRequest::One(name.to_string())
    }
}

impl From<String> for DescribeRequest {
    fn from(name: String) -> Self {
        DescribeRequest::One(name)
    }
}

impl From<Vec<String>> for DescribeRequest {
    fn from(names: Vec<String>) -> Self {
        DescribeRequest::Many(names)
    }
}

impl From<&[&str]> for DescribeRequest {
    fn from(names: &[&str]) -> Self {
        DescribeRequest::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Build the `login` body. The security token, when present, is already
/// concatenated onto the password by the caller.
pub fn login(username: &str, password: &str) -> String {
    format!(
        "<tns:login><tns:username>{}</tns:username><tns:password>{}</tns:password></tns:login>",
        xml::escape(username),
        xml::escape(password),
    )
}

/// Build the `getUserInfo` body (empty element).
pub fn get_user_info() -> String {
    "<tns:getUserInfo></tns:getUserInfo>".to_string()
}

/// Build the `logout` body (empty element).
pub fn logout() -> String {
    "<tns:logout></tns:logout>".to_string()
}

/// Build a `describeSObject`/`describeSObjects` body; the operation name
/// follows the request arity.
pub fn describe(request: &DescribeRequest) -> Result<String> {
    match request {
        DescribeRequest::One(name) => {
            require_element_name(name, "sobject type")?;
            Ok(format!(
                "<tns:describeSObject><tns:sObjectType>{}</tns:sObjectType></tns:describeSObject>",
                xml::escape(name)
            ))
        }
        DescribeRequest::Many(names) => {
            if names.is_empty() {
                return Err(Error::invalid_argument(
                    "describe requires at least one sobject type",
                ));
            }
            let mut body = String::from("<tns:describeSObjects>");
            for name in names {
                require_element_name(name, "sobject type")?;
                body.push_str(&format!(
                    "<tns:sObjectType>{}</tns:sObjectType>",
                    xml::escape(name)
                ));
            }
            body.push_str("</tns:describeSObjects>");
            Ok(body)
        }
    }
}

/// Build a `query` body; the query text goes through unmodified apart from
/// standard XML escaping.
pub fn query(soql: &str) -> Result<String> {
    require_non_empty(soql, "query string")?;
    Ok(format!(
        "<tns:query><tns:queryString>{}</tns:queryString></tns:query>",
        xml::escape(soql)
    ))
}

/// Build a `queryAll` body (includes deleted and archived rows).
pub fn query_all(soql: &str) -> Result<String> {
    require_non_empty(soql, "query string")?;
    Ok(format!(
        "<tns:queryAll><tns:queryString>{}</tns:queryString></tns:queryAll>",
        xml::escape(soql)
    ))
}

/// Build a `queryMore` body carrying the opaque cursor verbatim.
pub fn query_more(locator: &QueryLocator) -> String {
    format!(
        "<tns:queryMore><tns:queryLocator>{}</tns:queryLocator></tns:queryMore>",
        xml::escape(locator.as_str())
    )
}

/// Build a `search` body carrying the SOSL text.
pub fn search(sosl: &str) -> Result<String> {
    require_non_empty(sosl, "search string")?;
    Ok(format!(
        "<tns:search><tns:searchString>{}</tns:searchString></tns:search>",
        xml::escape(sosl)
    ))
}

/// Build a `create` body: one `sObjects` element per record, in order.
pub fn create(records: &[SObject]) -> Result<String> {
    sobjects_operation("create", records)
}

/// Build an `update` body; same per-record shape as `create`, with the
/// `Id` element present on each record that carries one.
pub fn update(records: &[SObject]) -> Result<String> {
    sobjects_operation("update", records)
}

/// Build an `upsert` body: `externalIDFieldName` once per request, before
/// the repeated `sObjects` elements.
pub fn upsert(external_id_field: &str, records: &[SObject]) -> Result<String> {
    require_element_name(external_id_field, "external id field")?;
    if records.is_empty() {
        return Err(Error::invalid_argument("upsert requires at least one record"));
    }
    let mut body = format!(
        "<tns:upsert><tns:externalIDFieldName>{}</tns:externalIDFieldName>",
        xml::escape(external_id_field)
    );
    for record in records {
        body.push_str(&sobject_fragment(record)?);
    }
    body.push_str("</tns:upsert>");
    Ok(body)
}

/// Build a `delete` body: one `ids` element per id, in order.
pub fn delete(ids: &[&str]) -> Result<String> {
    if ids.is_empty() {
        return Err(Error::invalid_argument("delete requires at least one id"));
    }
    let mut body = String::from("<tns:delete>");
    for id in ids {
        require_non_empty(id, "record id")?;
        body.push_str(&format!("<tns:ids>{}</tns:ids>", xml::escape(id)));
    }
    body.push_str("</tns:delete>");
    Ok(body)
}

/// Build a `retrieve` body: a comma-joined field list, the object type,
/// then one `ids` element per id.
pub fn retrieve(fields: &[&str], sobject_type: &str, ids: &[&str]) -> Result<String> {
    if fields.is_empty() {
        return Err(Error::invalid_argument("retrieve requires at least one field"));
    }
    if ids.is_empty() {
        return Err(Error::invalid_argument("retrieve requires at least one id"));
    }
    require_element_name(sobject_type, "sobject type")?;
    for field in fields {
        require_element_name(field, "field name")?;
    }
    let mut body = format!(
        "<tns:retrieve><tns:fieldList>{}</tns:fieldList><tns:sObjectType>{}</tns:sObjectType>",
        xml::escape(&fields.join(", ")),
        xml::escape(sobject_type),
    );
    for id in ids {
        require_non_empty(id, "record id")?;
        body.push_str(&format!("<tns:ids>{}</tns:ids>", xml::escape(id)));
    }
    body.push_str("</tns:retrieve>");
    Ok(body)
}

/// Shared shape for create/update.
fn sobjects_operation(operation: &str, records: &[SObject]) -> Result<String> {
    if records.is_empty() {
        return Err(Error::invalid_argument(format!(
            "{operation} requires at least one record"
        )));
    }
    let mut body = format!("<tns:{operation}>");
    for record in records {
        body.push_str(&sobject_fragment(record)?);
    }
    body.push_str(&format!("</tns:{operation}>"));
    Ok(body)
}

/// Serialize one record as an `sObjects` element.
///
/// Element order inside the entry is fixed by the sObject schema: the
/// `type` tag first, the `Id` element (when present) immediately after,
/// then the record's fields in their own insertion order.
fn sobject_fragment(record: &SObject) -> Result<String> {
    require_element_name(record.object_type(), "sobject type")?;

    let mut fragment = format!(
        "<tns:sObjects><ins0:type>{}</ins0:type>",
        xml::escape(record.object_type())
    );
    if let Some(id) = record.id() {
        fragment.push_str(&format!("<ins0:Id>{}</ins0:Id>", xml::escape(id)));
    }
    for (name, value) in record.fields() {
        require_element_name(name, "field name")?;
        match value {
            FieldValue::Scalar(scalar) => {
                fragment.push_str(&format!(
                    "<tns:{name}>{}</tns:{name}>",
                    xml::escape(&scalar.render())
                ));
            }
            FieldValue::Null => {
                fragment.push_str(&format!("<tns:fieldsToNull>{name}</tns:fieldsToNull>"));
            }
            FieldValue::List(items) => {
                for item in items {
                    fragment.push_str(&format!(
                        "<tns:{name}>{}</tns:{name}>",
                        xml::escape(&item.render())
                    ));
                }
            }
        }
    }
    fragment.push_str("</tns:sObjects>");
    Ok(fragment)
}

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Names used as XML element names cannot be escaped, only validated:
/// a letter followed by alphanumerics or underscores.
fn require_element_name(name: &str, what: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid {
        return Err(Error::invalid_argument(format!(
            "invalid {what}: {name:?}"
        )));
    }
    Ok(())
}

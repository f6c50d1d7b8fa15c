//! Typed results decoded from Partner API replies.

use crate::sobject::SObject;

/// Opaque pagination cursor for the remaining results of a prior query.
///
/// Produced by `query`/`queryAll`/`search` when the result set spans more
/// than one page; consumed by `queryMore`. The locator string is round-
/// tripped byte-for-byte and is not otherwise inspectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLocator(String);

impl QueryLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// The raw locator string, exactly as the server returned it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Whether this page is the last one.
    pub done: bool,
    /// Continuation cursor; present only when `done` is false.
    pub query_locator: Option<QueryLocator>,
    /// Total size reported by the server for the whole result set.
    pub size: usize,
    /// Records on this page, in server order.
    pub records: Vec<SObject>,
}

/// One field-level error inside a failed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveError {
    /// Machine-readable status code, e.g. `REQUIRED_FIELD_MISSING`.
    pub status_code: String,
    /// Human-readable message.
    pub message: String,
    /// Field names the error applies to, in server order.
    pub fields: Vec<String>,
}

/// Per-record outcome of a create/update/upsert/delete call.
///
/// The overall call succeeds even when individual outcomes report failure;
/// outcome order and count always match the input records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    /// Id of the affected record, when the server reports one.
    pub id: Option<String>,
    /// Whether this record was saved.
    pub success: bool,
    /// Errors for this record, empty on success.
    pub errors: Vec<SaveError>,
}

/// Field metadata from a describe reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeField {
    pub name: String,
    pub label: String,
    /// Wire type name, e.g. `string`, `date`, `picklist`.
    pub field_type: String,
    pub custom: bool,
    pub nillable: bool,
    pub updateable: bool,
}

/// Object metadata from a describe reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeSObjectResult {
    pub name: String,
    pub label: String,
    pub label_plural: String,
    pub custom: bool,
    pub createable: bool,
    pub updateable: bool,
    pub deletable: bool,
    pub queryable: bool,
    /// Declared fields, in server order.
    pub fields: Vec<DescribeField>,
}

/// Server-supplied identity metadata from a login or getUserInfo reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: String,
    pub organization_id: String,
    pub user_full_name: String,
    pub user_email: String,
    pub user_name: String,
    pub organization_name: String,
}

/// Decoded login reply: the session to adopt plus identity metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub session_id: String,
    pub server_url: String,
    pub user_info: UserInfo,
}

/// A structured SOAP fault from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_string: String,
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.fault_code, self.fault_string)
    }
}

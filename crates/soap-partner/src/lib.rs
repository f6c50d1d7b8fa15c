//! # sforce-soap-partner
//!
//! Typed client for the Salesforce Partner SOAP API: session login (by
//! credentials or an already-issued session id), SOQL query with
//! pagination, SOSL search, describe metadata, and create / update /
//! upsert / delete / retrieve on generic `SObject` records.
//!
//! The crate is organized the way a request flows:
//! - [`sobject`] - the record model (`SObject`, `FieldValue`)
//! - [`envelope`] - pure builders from operation parameters to the XML
//!   body fragment
//! - [`session`] - the authentication state machine
//! - [`client`] - the dispatcher, one async method per remote operation
//! - [`decode`] - structural decoding of reply bodies
//!
//! ## Example
//!
//! ```rust,ignore
//! use sforce_soap_partner::{LoginRequest, PartnerClient, SObject};
//!
//! let mut client = PartnerClient::new()?;
//! client
//!     .login(LoginRequest::credentials("user@example.com", "password"))
//!     .await?;
//!
//! let page = client
//!     .query("SELECT Id, Name FROM Opportunity WHERE IsClosed = false")
//!     .await?;
//! for record in &page.records {
//!     println!("{:?} {:?}", record.id(), record.get_text("Name"));
//! }
//!
//! let result = client
//!     .create(SObject::new("Opportunity").field("Name", "Big Deal"))
//!     .await?;
//! println!("created {:?}", result.id);
//! ```

pub mod client;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod session;
pub mod sobject;
pub mod types;

pub use client::PartnerClient;
pub use envelope::{DescribeRequest, LoginRequest};
pub use error::{Error, ErrorKind, Result};
pub use session::{Session, SessionState};
pub use sobject::{FieldValue, SObject, Scalar};
pub use types::{
    DescribeField, DescribeSObjectResult, LoginResult, QueryLocator, QueryResult, SaveError,
    SaveResult, SoapFault, UserInfo,
};

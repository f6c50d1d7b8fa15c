//! # sforce-soap-client
//!
//! SOAP transport infrastructure for the Salesforce Partner API.
//!
//! This crate provides the pieces that sit below the typed Partner API
//! surface:
//! - `SoapConnection` - wraps a body fragment in the SOAP envelope (with
//!   the `SessionHeader` when a session id is present), POSTs it with the
//!   correct content type and `SOAPAction` header, and hands back the raw
//!   reply body
//! - `ClientConfig` - login URL, API version, timeouts, user agent
//! - `wsdl` - the static Partner WSDL operation catalog
//! - `security::xml` - XML entity escaping for envelope construction
//!
//! The connection is deliberately dumb: one XML body in, one XML body out,
//! no retries, no fault interpretation. Decoding (including SOAP faults)
//! belongs to the layer above.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sforce_soap_client::{ClientConfig, SoapConnection};
//!
//! let connection = SoapConnection::new(ClientConfig::default())?;
//! let response = connection
//!     .call(
//!         "query",
//!         "https://na15.salesforce.com/services/Soap/u/62.0",
//!         Some("sessionid"),
//!         "<tns:query><tns:queryString>SELECT Id FROM Account</tns:queryString></tns:query>",
//!     )
//!     .await?;
//! println!("{}", response.body);
//! ```

mod config;
mod connection;
mod error;
pub mod security;
pub mod wsdl;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use connection::{SoapConnection, SoapResponse};
pub use error::{Error, ErrorKind, Result};
pub use wsdl::OperationCatalog;

/// Default Salesforce API version.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// Default login endpoint for production orgs.
pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";

/// User-Agent string for the client.
pub const USER_AGENT: &str = concat!("sforce-soap-api/", env!("CARGO_PKG_VERSION"));

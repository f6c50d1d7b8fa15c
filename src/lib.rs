//! # sforce-soap-api
//!
//! A Salesforce Partner SOAP API client library for Rust.
//!
//! This library authenticates a session against the Partner API and issues
//! typed record operations (query, search, describe, create, update, upsert,
//! delete) by building protocol-correct SOAP envelopes and decoding the XML
//! replies into structured results.
//!
//! ## Crates
//!
//! - **sforce-soap-client** - SOAP/HTTP transport, configuration, WSDL
//!   operation catalog, XML escaping
//! - **sforce-soap-partner** - Partner API engine: record model, envelope
//!   builder, session state, operation dispatcher, response decoder
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sforce_soap_api::partner::{LoginRequest, PartnerClient, SObject};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = PartnerClient::new()?;
//!
//!     client
//!         .login(LoginRequest::credentials("user@example.com", "password"))
//!         .await?;
//!
//!     let result = client
//!         .query("SELECT Id, Name, StageName FROM Opportunity")
//!         .await?;
//!
//!     for record in &result.records {
//!         println!("{:?}", record.get("Name"));
//!     }
//!
//!     let opportunity = SObject::new("Opportunity")
//!         .field("Name", "New Opportunity")
//!         .field("StageName", "Prospecting");
//!     let outcome = client.create(opportunity).await?;
//!     println!("created {:?}", outcome.id);
//!
//!     Ok(())
//! }
//! ```

// Re-export member crates for convenient access
pub use sforce_soap_client as client;
pub use sforce_soap_partner as partner;

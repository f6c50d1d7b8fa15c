//! Partner API client: one async method per remote operation.
//!
//! Each method validates its input, requires an authenticated session
//! (login excepted), builds the body fragment, performs exactly one round
//! trip, checks the reply for a SOAP fault, and decodes it. No retries,
//! no internal concurrency; callers needing parallelism share the client
//! behind their own primitive.

use tracing::{info, instrument};

use sforce_soap_client::{ClientConfig, SoapConnection, SoapResponse};

use crate::decode;
use crate::envelope::{self, DescribeRequest, LoginRequest};
use crate::error::{Error, ErrorKind, Result};
use crate::session::{Session, SessionState};
use crate::sobject::SObject;
use crate::types::{
    DescribeSObjectResult, QueryLocator, QueryResult, SaveResult, SoapFault, UserInfo,
};

/// Client for the Partner SOAP API.
///
/// Owns the session state: `login`/`logout` take `&mut self`, data
/// operations take `&self`, so a session swap cannot race an in-flight
/// operation.
#[derive(Debug)]
pub struct PartnerClient {
    connection: SoapConnection,
    session: SessionState,
}

impl PartnerClient {
    /// Create a client with default configuration.
    pub fn new() -> sforce_soap_client::Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with the given configuration.
    pub fn with_config(config: ClientConfig) -> sforce_soap_client::Result<Self> {
        Ok(Self {
            connection: SoapConnection::new(config)?,
            session: SessionState::default(),
        })
    }

    /// Create a client over an existing connection.
    pub fn with_connection(connection: SoapConnection) -> Self {
        Self {
            connection,
            session: SessionState::default(),
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        self.connection.config()
    }

    /// The operations named by the Partner WSDL.
    pub fn operations(&self) -> &'static [&'static str] {
        sforce_soap_client::wsdl::OperationCatalog.operations()
    }

    /// Whether the Partner WSDL names the given operation.
    pub fn supports(&self, operation: &str) -> bool {
        sforce_soap_client::wsdl::OperationCatalog.supports(operation)
    }

    /// The current session, when authenticated.
    pub fn session(&self) -> Option<&Session> {
        self.session.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Authenticate, replacing any existing session.
    ///
    /// Credentials post a `login` body to the configured login host; an
    /// existing session is validated with `getUserInfo` against its own
    /// server, the session id travelling in the transport header. A fault
    /// moves the session state to failed; the previous good session (if
    /// any) is retained there for inspection but no longer used.
    #[instrument(skip(self, request))]
    pub async fn login(&mut self, request: LoginRequest) -> Result<Session> {
        request.validate()?;

        let outcome = match request {
            LoginRequest::Credentials {
                username,
                password,
                security_token,
            } => {
                let full_password = match security_token {
                    Some(token) => format!("{password}{token}"),
                    None => password,
                };
                let body = envelope::login(&username, &full_password);
                let endpoint = self.config().login_endpoint();
                let response = self.connection.call("login", &endpoint, None, &body).await?;
                check_fault(&response).map(|()| response).and_then(|response| {
                    let result = decode::parse_login_response(&response.body)?;
                    Ok(Session::new(
                        result.session_id,
                        result.server_url,
                        Some(result.user_info),
                    ))
                })
            }
            LoginRequest::ExistingSession {
                session_id,
                server_url,
            } => {
                let body = envelope::get_user_info();
                let response = self
                    .connection
                    .call("getUserInfo", &server_url, Some(&session_id), &body)
                    .await?;
                check_fault(&response).map(|()| response).and_then(|response| {
                    let info = decode::parse_user_info_response(&response.body)?;
                    Ok(Session::new(session_id, server_url, Some(info)))
                })
            }
        };

        match outcome {
            Ok(session) => {
                info!(user = session.user_info().map(|u| u.user_name.as_str()), "logged in");
                self.session.authenticate(session.clone());
                Ok(session)
            }
            Err(err) => {
                if err.is_fault() {
                    self.session.fail();
                }
                Err(err)
            }
        }
    }

    /// Invalidate the session on the server and forget it locally.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<()> {
        let body = envelope::logout();
        let reply = self.dispatch("logout", &body).await?;
        decode::parse_logout_response(&reply)?;
        self.session.reset();
        Ok(())
    }

    /// Identity metadata for the current session.
    #[instrument(skip(self))]
    pub async fn user_info(&self) -> Result<UserInfo> {
        let body = envelope::get_user_info();
        let reply = self.dispatch("getUserInfo", &body).await?;
        decode::parse_user_info_response(&reply)
    }

    /// Metadata for one object type (`describeSObject`).
    #[instrument(skip(self))]
    pub async fn describe(&self, object_type: &str) -> Result<DescribeSObjectResult> {
        let body = envelope::describe(&DescribeRequest::One(object_type.to_string()))?;
        let reply = self.dispatch("describeSObject", &body).await?;
        decode::parse_describe_response(&reply)
    }

    /// Metadata for several object types in one call (`describeSObjects`),
    /// results in request order.
    #[instrument(skip(self, object_types))]
    pub async fn describe_many(
        &self,
        object_types: &[&str],
    ) -> Result<Vec<DescribeSObjectResult>> {
        let body = envelope::describe(&DescribeRequest::from(object_types))?;
        let reply = self.dispatch("describeSObjects", &body).await?;
        decode::parse_describe_many_response(&reply)
    }

    /// Run a SOQL query, excluding deleted and archived records.
    #[instrument(skip(self))]
    pub async fn query(&self, soql: &str) -> Result<QueryResult> {
        let body = envelope::query(soql)?;
        let reply = self.dispatch("query", &body).await?;
        decode::parse_query_response(&reply)
    }

    /// Run a SOQL query including deleted and archived records.
    #[instrument(skip(self))]
    pub async fn query_all(&self, soql: &str) -> Result<QueryResult> {
        let body = envelope::query_all(soql)?;
        let reply = self.dispatch("queryAll", &body).await?;
        decode::parse_query_response(&reply)
    }

    /// Fetch the next page for a cursor returned by a prior query.
    #[instrument(skip(self, locator))]
    pub async fn query_more(&self, locator: &QueryLocator) -> Result<QueryResult> {
        let body = envelope::query_more(locator);
        let reply = self.dispatch("queryMore", &body).await?;
        decode::parse_query_response(&reply)
    }

    /// Run a SOSL search.
    #[instrument(skip(self))]
    pub async fn search(&self, sosl: &str) -> Result<Vec<SObject>> {
        let body = envelope::search(sosl)?;
        let reply = self.dispatch("search", &body).await?;
        decode::parse_search_response(&reply)
    }

    /// Create one record.
    #[instrument(skip(self, record))]
    pub async fn create(&self, record: SObject) -> Result<SaveResult> {
        single(self.create_many(vec![record]).await?)
    }

    /// Create several records in one call; outcomes in input order.
    #[instrument(skip(self, records))]
    pub async fn create_many(&self, records: Vec<SObject>) -> Result<Vec<SaveResult>> {
        let body = envelope::create(&records)?;
        let reply = self.dispatch("create", &body).await?;
        decode::parse_save_results(&reply)
    }

    /// Update one record; it must carry an `Id`.
    #[instrument(skip(self, record))]
    pub async fn update(&self, record: SObject) -> Result<SaveResult> {
        single(self.update_many(vec![record]).await?)
    }

    /// Update several records in one call; outcomes in input order.
    #[instrument(skip(self, records))]
    pub async fn update_many(&self, records: Vec<SObject>) -> Result<Vec<SaveResult>> {
        let body = envelope::update(&records)?;
        let reply = self.dispatch("update", &body).await?;
        decode::parse_save_results(&reply)
    }

    /// Create-or-update records matched on an external id field; outcomes
    /// in input order.
    #[instrument(skip(self, records))]
    pub async fn upsert(
        &self,
        external_id_field: &str,
        records: Vec<SObject>,
    ) -> Result<Vec<SaveResult>> {
        let body = envelope::upsert(external_id_field, &records)?;
        let reply = self.dispatch("upsert", &body).await?;
        decode::parse_save_results(&reply)
    }

    /// Delete one record by id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<SaveResult> {
        single(self.delete_many(&[id]).await?)
    }

    /// Delete several records by id; outcomes in input order.
    #[instrument(skip(self, ids))]
    pub async fn delete_many(&self, ids: &[&str]) -> Result<Vec<SaveResult>> {
        let body = envelope::delete(ids)?;
        let reply = self.dispatch("delete", &body).await?;
        decode::parse_save_results(&reply)
    }

    /// Fetch specific fields of specific records by id; unknown ids are
    /// simply absent from the result.
    #[instrument(skip(self, fields, ids))]
    pub async fn retrieve(
        &self,
        fields: &[&str],
        object_type: &str,
        ids: &[&str],
    ) -> Result<Vec<SObject>> {
        let body = envelope::retrieve(fields, object_type, ids)?;
        let reply = self.dispatch("retrieve", &body).await?;
        decode::parse_retrieve_response(&reply)
    }

    /// One authenticated round trip: session check, call, fault check.
    async fn dispatch(&self, action: &str, body: &str) -> Result<String> {
        let session = self.session.require_authenticated()?;
        let response = self
            .connection
            .call(action, session.server_url(), Some(session.session_id()), body)
            .await?;
        check_fault(&response)?;
        Ok(response.body)
    }
}

/// Turn a faulty reply into an error; pass clean replies through.
///
/// Faults arrive as HTTP 500 with a well-formed fault body; a non-2xx
/// reply without one is a transport-level failure.
fn check_fault(response: &SoapResponse) -> Result<()> {
    if let Some(fault) = decode::parse_fault(&response.body) {
        let SoapFault {
            fault_code,
            fault_string,
        } = fault;
        return Err(Error::new(ErrorKind::Fault {
            code: fault_code,
            message: fault_string,
        }));
    }
    if !response.is_success() {
        return Err(Error::new(ErrorKind::Transport(format!(
            "HTTP {}",
            response.status
        ))));
    }
    Ok(())
}

/// Exactly one outcome for exactly one input record.
fn single(mut results: Vec<SaveResult>) -> Result<SaveResult> {
    if results.len() != 1 {
        return Err(Error::decode(format!(
            "expected one result, server sent {}",
            results.len()
        )));
    }
    Ok(results.remove(0))
}

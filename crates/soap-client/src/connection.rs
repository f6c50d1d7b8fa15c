//! SOAP connection: one XML body in, one XML body out.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};

/// SOAP Action header name.
static SOAP_ACTION_HEADER: HeaderName = HeaderName::from_static("soapaction");

/// Element namespace for Partner API operations and ordinary fields.
pub const PARTNER_NAMESPACE: &str = "urn:partner.soap.sforce.com";

/// Element namespace for the sObject `type`/`Id`/`fieldsToNull` elements.
pub const SOBJECT_NAMESPACE: &str = "urn:sobject.partner.soap.sforce.com";

/// Raw reply from one SOAP round trip.
///
/// The body is returned for every status code; SOAP faults arrive as
/// well-formed XML on non-2xx responses and the layer above decides what
/// they mean.
#[derive(Debug, Clone)]
pub struct SoapResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw XML reply body.
    pub body: String,
}

impl SoapResponse {
    /// Whether the HTTP exchange itself succeeded.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// SOAP transport over HTTP.
///
/// Wraps a body fragment in the SOAP envelope (adding the `SessionHeader`
/// when a session id is given), POSTs it, and returns the raw reply body.
/// Performs exactly one attempt per call; no retries, no fault
/// interpretation.
#[derive(Debug, Clone)]
pub struct SoapConnection {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl SoapConnection {
    /// Create a new connection with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create a connection with a custom HTTP client.
    pub fn with_http_client(config: ClientConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// The connection configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform one SOAP round trip.
    ///
    /// `body` is the operation fragment that goes inside `<soapenv:Body>`;
    /// `session_id` (when present) is carried in the `SessionHeader`, never
    /// in the body.
    #[instrument(skip(self, session_id, body), fields(action = action, endpoint = endpoint))]
    pub async fn call(
        &self,
        action: &str,
        endpoint: &str,
        session_id: Option<&str>,
        body: &str,
    ) -> Result<SoapResponse> {
        let envelope = build_envelope(session_id, body);

        debug!(bytes = envelope.len(), "sending SOAP request");

        let response = self
            .http_client
            .post(endpoint)
            .headers(build_headers(action)?)
            .body(envelope)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "received SOAP response");

        Ok(SoapResponse { status, body })
    }
}

/// Build common headers for SOAP requests.
fn build_headers(action: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/xml;charset=UTF-8"),
    );
    headers.insert(
        SOAP_ACTION_HEADER.clone(),
        HeaderValue::from_str(action)
            .map_err(|e| Error::with_source(ErrorKind::Config(format!("invalid action: {action}")), e))?,
    );
    Ok(headers)
}

/// Wrap a body fragment in the two-namespace Partner SOAP envelope.
fn build_envelope(session_id: Option<&str>, body: &str) -> String {
    let header = match session_id {
        Some(id) => format!(
            "<tns:SessionHeader><tns:sessionId>{}</tns:sessionId></tns:SessionHeader>",
            crate::security::xml::escape(id)
        ),
        None => String::new(),
    };

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:tns="{tns}" xmlns:ins0="{ins0}" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><soapenv:Header>{header}</soapenv:Header><soapenv:Body>{body}</soapenv:Body></soapenv:Envelope>"#,
        tns = PARTNER_NAMESPACE,
        ins0 = SOBJECT_NAMESPACE,
        header = header,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_envelope_without_session() {
        let envelope = build_envelope(None, "<tns:logout></tns:logout>");
        assert!(envelope.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(envelope.contains(r#"xmlns:tns="urn:partner.soap.sforce.com""#));
        assert!(envelope.contains(r#"xmlns:ins0="urn:sobject.partner.soap.sforce.com""#));
        assert!(envelope.contains("<soapenv:Header></soapenv:Header>"));
        assert!(envelope.contains("<soapenv:Body><tns:logout></tns:logout></soapenv:Body>"));
    }

    #[test]
    fn test_build_envelope_with_session() {
        let envelope = build_envelope(Some("abcde12345"), "<tns:getUserInfo></tns:getUserInfo>");
        assert!(envelope.contains(
            "<tns:SessionHeader><tns:sessionId>abcde12345</tns:sessionId></tns:SessionHeader>"
        ));
    }

    #[test]
    fn test_build_envelope_escapes_session_id() {
        let envelope = build_envelope(Some("a<b&c"), "<tns:logout></tns:logout>");
        assert!(envelope.contains("<tns:sessionId>a&lt;b&amp;c</tns:sessionId>"));
    }

    #[tokio::test]
    async fn test_call_posts_envelope_and_returns_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/Soap/u/62.0"))
            .and(header("content-type", "text/xml;charset=UTF-8"))
            .and(header("soapaction", "query"))
            .and(body_string_contains(
                "<tns:query><tns:queryString>SELECT Id FROM Account</tns:queryString></tns:query>",
            ))
            .and(body_string_contains("<tns:sessionId>token</tns:sessionId>"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<reply/>"))
            .expect(1)
            .mount(&server)
            .await;

        let connection = SoapConnection::new(ClientConfig::default()).unwrap();
        let response = connection
            .call(
                "query",
                &format!("{}/services/Soap/u/62.0", server.uri()),
                Some("token"),
                "<tns:query><tns:queryString>SELECT Id FROM Account</tns:queryString></tns:query>",
            )
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(response.is_success());
        assert_eq!(response.body, "<reply/>");
    }

    #[tokio::test]
    async fn test_call_returns_body_on_http_500() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<soapenv:Fault/>"))
            .mount(&server)
            .await;

        let connection = SoapConnection::new(ClientConfig::default()).unwrap();
        let response = connection
            .call("query", &server.uri(), None, "<tns:query></tns:query>")
            .await
            .unwrap();

        // Faults arrive as HTTP 500; the body must still come back.
        assert_eq!(response.status, 500);
        assert!(!response.is_success());
        assert_eq!(response.body, "<soapenv:Fault/>");
    }
}

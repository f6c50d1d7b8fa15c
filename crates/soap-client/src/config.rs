//! Client configuration.

use std::time::Duration;

/// Configuration for the SOAP connection.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Login endpoint, e.g. `https://login.salesforce.com` or
    /// `https://test.salesforce.com` for sandboxes.
    pub login_url: String,
    /// Partner API version, e.g. `62.0`.
    pub api_version: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            login_url: crate::DEFAULT_LOGIN_URL.to_string(),
            api_version: crate::DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// The SOAP endpoint under a given host, e.g.
    /// `https://login.salesforce.com/services/Soap/u/62.0`.
    pub fn soap_endpoint(&self, host: &str) -> String {
        format!(
            "{}/services/Soap/u/{}",
            host.trim_end_matches('/'),
            self.api_version
        )
    }

    /// The login SOAP endpoint derived from `login_url`.
    pub fn login_endpoint(&self) -> String {
        self.soap_endpoint(&self.login_url)
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the login endpoint host.
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.config.login_url = login_url.into();
        self
    }

    /// Set the Partner API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.login_url, "https://login.salesforce.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.contains("sforce-soap-api"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .with_login_url("https://test.salesforce.com")
            .with_api_version("58.0")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("custom-agent/1.0")
            .build();

        assert_eq!(config.login_url, "https://test.salesforce.com");
        assert_eq!(config.api_version, "58.0");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "custom-agent/1.0");
    }

    #[test]
    fn test_soap_endpoint() {
        let config = ClientConfig::builder().with_api_version("62.0").build();
        assert_eq!(
            config.soap_endpoint("https://na15.salesforce.com/"),
            "https://na15.salesforce.com/services/Soap/u/62.0"
        );
        assert_eq!(
            config.login_endpoint(),
            "https://login.salesforce.com/services/Soap/u/62.0"
        );
    }
}

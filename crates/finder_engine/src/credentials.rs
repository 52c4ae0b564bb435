use std::fmt;

/// Gateway host the default endpoint lives behind.
pub const DEFAULT_API_HOST: &str = "apijob-job-searching-api.p.rapidapi.com";

/// Source of the gateway credentials sent with every search.
pub trait CredentialProvider: Send + Sync {
    /// The API key, or `None` when the operator has not supplied one.
    fn api_key(&self) -> Option<&str>;
    fn api_host(&self) -> &str;
}

/// Credentials resolved once at startup.
#[derive(Clone)]
pub struct StaticCredentials {
    api_key: Option<String>,
    api_host: String,
}

impl StaticCredentials {
    /// Blank keys are treated as absent.
    pub fn new(api_key: Option<String>, api_host: impl Into<String>) -> Self {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self {
            api_key,
            api_host: api_host.into(),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn api_host(&self) -> &str {
        &self.api_host
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_host", &self.api_host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialProvider, StaticCredentials, DEFAULT_API_HOST};

    #[test]
    fn blank_key_is_absent() {
        let creds = StaticCredentials::new(Some("   ".to_string()), DEFAULT_API_HOST);
        assert_eq!(creds.api_key(), None);
    }

    #[test]
    fn key_is_trimmed() {
        let creds = StaticCredentials::new(Some(" secret\n".to_string()), DEFAULT_API_HOST);
        assert_eq!(creds.api_key(), Some("secret"));
        assert_eq!(creds.api_host(), DEFAULT_API_HOST);
    }

    #[test]
    fn debug_output_hides_key() {
        let creds = StaticCredentials::new(Some("secret".to_string()), "host.test");
        let printed = format!("{creds:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("host.test"));
    }
}

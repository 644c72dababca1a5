use std::env;

/// Resolves the API key at call time. The front end this core grew out of
/// re-read its ambient key on every service call so the user could swap keys
/// between runs; the provider trait keeps that rotation explicit and
/// testable.
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// Reads `GEMINI_API_KEY` from the environment on every call.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        env::var("GEMINI_API_KEY").ok()
    }
}

/// A fixed key handed over at construction.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    api_key: String,
}

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        Some(self.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Test stand-in whose key can be swapped mid-session.
    pub struct RotatingCredentials {
        key: Mutex<Option<String>>,
    }

    impl RotatingCredentials {
        pub fn new(key: Option<&str>) -> Self {
            Self {
                key: Mutex::new(key.map(String::from)),
            }
        }

        pub fn rotate(&self, key: Option<&str>) {
            *self.key.lock().unwrap() = key.map(String::from);
        }
    }

    impl CredentialProvider for RotatingCredentials {
        fn api_key(&self) -> Option<String> {
            self.key.lock().unwrap().clone()
        }
    }

    #[test]
    fn static_credentials_always_return_their_key() {
        let creds = StaticCredentials::new("abc123");
        assert_eq!(creds.api_key().as_deref(), Some("abc123"));
        assert_eq!(creds.api_key().as_deref(), Some("abc123"));
    }

    #[test]
    fn rotation_is_visible_between_calls() {
        let creds = RotatingCredentials::new(Some("first"));
        assert_eq!(creds.api_key().as_deref(), Some("first"));

        creds.rotate(Some("second"));
        assert_eq!(creds.api_key().as_deref(), Some("second"));

        creds.rotate(None);
        assert_eq!(creds.api_key(), None);
    }

    #[test]
    fn env_credentials_reread_the_environment_each_call() {
        let creds = EnvCredentials;
        env::set_var("GEMINI_API_KEY", "env-key-one");
        assert_eq!(creds.api_key().as_deref(), Some("env-key-one"));

        env::set_var("GEMINI_API_KEY", "env-key-two");
        assert_eq!(creds.api_key().as_deref(), Some("env-key-two"));

        env::remove_var("GEMINI_API_KEY");
    }
}

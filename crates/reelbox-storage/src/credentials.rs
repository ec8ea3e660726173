//! Storage service credential triple.

use crate::traits::{StorageError, StorageResult};
use reelbox_core::Config;

/// Account, key and secret for the transform service. Any of them may be absent; the
/// absence is reported when an upload is attempted, not at startup.
#[derive(Clone, Default)]
pub struct StorageCredentials {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

/// Credentials with every part present.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCredentials<'a> {
    pub cloud_name: &'a str,
    pub api_key: &'a str,
    pub api_secret: &'a str,
}

impl StorageCredentials {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cloud_name: config.storage_cloud_name().map(String::from),
            api_key: config.storage_api_key().map(String::from),
            api_secret: config.storage_api_secret().map(String::from),
        }
    }

    /// Return all three parts, or `CredentialsMissing` naming the absent ones.
    pub fn require(&self) -> StorageResult<ResolvedCredentials<'_>> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.trim().is_empty())
        }

        match (
            present(&self.cloud_name),
            present(&self.api_key),
            present(&self.api_secret),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Ok(ResolvedCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            (cloud_name, api_key, api_secret) => {
                let missing: Vec<&str> = [
                    ("STORAGE_CLOUD_NAME", cloud_name.is_none()),
                    ("STORAGE_API_KEY", api_key.is_none()),
                    ("STORAGE_API_SECRET", api_secret.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name)
                .collect();
                Err(StorageError::CredentialsMissing(missing.join(", ")))
            }
        }
    }
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_every_missing_part() {
        let creds = StorageCredentials {
            cloud_name: Some("demo".to_string()),
            api_key: None,
            api_secret: Some(" ".to_string()),
        };
        assert_eq!(
            creds.require().unwrap_err(),
            StorageError::CredentialsMissing("STORAGE_API_KEY, STORAGE_API_SECRET".to_string())
        );
    }

    #[test]
    fn test_require_returns_all_parts() {
        let creds = StorageCredentials {
            cloud_name: Some("demo".to_string()),
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
        };
        let resolved = creds.require().unwrap();
        assert_eq!(resolved.cloud_name, "demo");
        assert_eq!(resolved.api_secret, "secret");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = StorageCredentials {
            cloud_name: Some("demo".to_string()),
            api_key: Some("key-123".to_string()),
            api_secret: Some("secret-456".to_string()),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("key-123"));
        assert!(!debug.contains("secret-456"));
    }
}

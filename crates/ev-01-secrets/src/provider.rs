//! # File-first Secret Provider
//!
//! Reads `<secrets_dir>/<name>`, falling back to the environment variable of
//! the same name. Values are trimmed of trailing whitespace (secret files
//! commonly end with a newline) and cached after the first read.

use crate::error::SecretError;
use crate::secret::BallotSecret;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves a named secret.
pub trait SecretProvider: Send + Sync {
    /// Resolve `name` to its secret value.
    ///
    /// ## Errors
    ///
    /// - `SecretMissing`: neither file nor environment variable exists
    /// - `Unreadable`: the file exists but reading failed
    /// - `Empty`: the resolved value is empty after trimming
    fn read_secret(&self, name: &str) -> Result<BallotSecret, SecretError>;
}

/// Default directory for secret files (container-secret convention).
pub const DEFAULT_SECRETS_DIR: &str = "/run/secrets";

/// The production provider: file first, environment fallback, cached.
pub struct FileEnvSecretProvider {
    secrets_dir: PathBuf,
    cache: RwLock<HashMap<String, BallotSecret>>,
}

impl Default for FileEnvSecretProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SECRETS_DIR)
    }
}

impl FileEnvSecretProvider {
    /// Create a provider reading secret files from `secrets_dir`.
    pub fn new<P: AsRef<Path>>(secrets_dir: P) -> Self {
        Self {
            secrets_dir: secrets_dir.as_ref().to_path_buf(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Drop all cached values; the next read hits file/environment again.
    pub fn reload(&self) {
        self.cache.write().clear();
        tracing::info!("[ev-01] secret cache cleared");
    }

    fn resolve(&self, name: &str) -> Result<String, SecretError> {
        let path = self.secrets_dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!("[ev-01] secret '{}' resolved from file", name);
                return Ok(contents.trim_end().to_string());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(SecretError::Unreadable {
                    name: name.to_string(),
                    message: e.to_string(),
                })
            }
        }

        match std::env::var(name) {
            Ok(value) => {
                tracing::debug!("[ev-01] secret '{}' resolved from environment", name);
                Ok(value.trim_end().to_string())
            }
            Err(_) => Err(SecretError::SecretMissing {
                name: name.to_string(),
                searched_dir: self.secrets_dir.display().to_string(),
            }),
        }
    }
}

impl SecretProvider for FileEnvSecretProvider {
    fn read_secret(&self, name: &str) -> Result<BallotSecret, SecretError> {
        if let Some(cached) = self.cache.read().get(name) {
            return Ok(cached.clone());
        }

        let value = self.resolve(name)?;
        if value.is_empty() {
            return Err(SecretError::Empty {
                name: name.to_string(),
            });
        }

        let secret = BallotSecret::new(value);
        self.cache
            .write()
            .insert(name.to_string(), secret.clone());
        Ok(secret)
    }
}

/// Fixed-value provider for unit tests.
pub struct StaticSecretProvider {
    secrets: HashMap<String, String>,
}

impl StaticSecretProvider {
    /// Provider answering `name` with `value`, everything else missing.
    pub fn single(name: &str, value: &str) -> Self {
        let mut secrets = HashMap::new();
        secrets.insert(name.to_string(), value.to_string());
        Self { secrets }
    }
}

impl SecretProvider for StaticSecretProvider {
    fn read_secret(&self, name: &str) -> Result<BallotSecret, SecretError> {
        self.secrets
            .get(name)
            .map(|v| BallotSecret::new(v.clone()))
            .ok_or_else(|| SecretError::SecretMissing {
                name: name.to_string(),
                searched_dir: "<static>".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_wins_over_environment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TEST_FILE_FIRST"), "from-file\n").unwrap();
        std::env::set_var("TEST_FILE_FIRST", "from-env");

        let provider = FileEnvSecretProvider::new(dir.path());
        let secret = provider.read_secret("TEST_FILE_FIRST").unwrap();
        assert_eq!(secret.expose(), "from-file");

        std::env::remove_var("TEST_FILE_FIRST");
    }

    #[test]
    fn test_environment_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("TEST_ENV_FALLBACK", "env-value");

        let provider = FileEnvSecretProvider::new(dir.path());
        let secret = provider.read_secret("TEST_ENV_FALLBACK").unwrap();
        assert_eq!(secret.expose(), "env-value");

        std::env::remove_var("TEST_ENV_FALLBACK");
    }

    #[test]
    fn test_missing_secret_errors() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileEnvSecretProvider::new(dir.path());
        let err = provider.read_secret("TEST_DEFINITELY_MISSING").unwrap_err();
        assert!(matches!(err, SecretError::SecretMissing { .. }));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("TEST_EMPTY"), "\n").unwrap();
        let provider = FileEnvSecretProvider::new(dir.path());
        assert!(matches!(
            provider.read_secret("TEST_EMPTY"),
            Err(SecretError::Empty { .. })
        ));
    }

    #[test]
    fn test_cache_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TEST_CACHED");
        std::fs::write(&path, "first").unwrap();

        let provider = FileEnvSecretProvider::new(dir.path());
        assert_eq!(provider.read_secret("TEST_CACHED").unwrap().expose(), "first");

        // Cached: a file change is not picked up until reload.
        std::fs::write(&path, "second").unwrap();
        assert_eq!(provider.read_secret("TEST_CACHED").unwrap().expose(), "first");

        provider.reload();
        assert_eq!(provider.read_secret("TEST_CACHED").unwrap().expose(), "second");
    }
}

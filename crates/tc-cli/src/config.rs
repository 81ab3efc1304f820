//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use tc_api::{Credentials, Endpoint, Scheme};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL scheme of the Tipee instance.
    pub scheme: Scheme,
    /// Hostname of the Tipee instance.
    pub hostname: String,
    /// Explicit port; defaults to the scheme's standard port.
    pub port: Option<u16>,
    /// API base path under the host.
    pub base_path: String,
    /// Application name registered with Tipee.
    pub app_name: String,
    /// Application private key.
    pub app_secret: String,
    /// Numeric person identifier the timechecks are recorded against.
    pub person: i64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("scheme", &self.scheme)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("base_path", &self.base_path)
            .field("app_name", &self.app_name)
            .field("app_secret", &"[REDACTED]")
            .field("person", &self.person)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheme: Scheme::Https,
            hostname: String::new(),
            port: None,
            base_path: String::new(),
            app_name: String::new(),
            app_secret: String::new(),
            person: 0,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TC_*)
        figment = figment.merge(Env::prefixed("TC_"));

        figment.extract()
    }

    /// The endpoint described by this configuration.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            scheme: self.scheme,
            hostname: self.hostname.clone(),
            port: self.port,
            base_path: self.base_path.clone(),
        }
    }

    /// The credentials described by this configuration.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            app_name: self.app_name.clone(),
            app_secret: self.app_secret.clone(),
        }
    }
}

/// Returns the platform-specific config directory for tc.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tc"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_uses_https() {
        let config = Config::default();
        assert_eq!(config.scheme, Scheme::Https);
        assert!(config.port.is_none());
        assert!(config.hostname.is_empty());
    }

    #[test]
    fn load_from_merges_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
scheme = "http"
hostname = "tipee.local"
port = 8080
base_path = "brain/api"
app_name = "acme-tools"
app_secret = "s3cret"
person = 42
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.scheme, Scheme::Http);
        assert_eq!(config.hostname, "tipee.local");
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.person, 42);
    }

    #[test]
    fn debug_redacts_app_secret() {
        let config = Config {
            app_secret: "super-secret".to_string(),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

fn default_true() -> bool {
    true
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}

/// Gateway configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthSettings,

    /// Enforce per-route role requirements after authentication.
    #[serde(default = "default_true")]
    pub rbac_enabled: bool,

    #[serde(default)]
    pub cors_enabled: bool,
    /// Optional detailed CORS configuration
    pub cors: Option<CorsConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auth: AuthSettings::default(),
            rbac_enabled: true,
            cors_enabled: false,
            cors: None,
        }
    }
}

/// Settings for the authentication stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSettings {
    /// Disable to run every request with an anonymous security context.
    /// Intended only for single-user deployments without an identity
    /// provider.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// HMAC signing secret for bearer tokens. Required when `enabled`.
    #[serde(default = "default_secret")]
    pub secret_key: SecretString,

    /// Report every connection as transport-secure (TLS terminated
    /// upstream of this process).
    #[serde(default)]
    pub assume_secure_transport: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            secret_key: default_secret(),
            assume_secure_transport: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CorsConfig {
    /// Allowed origins: `["*"]` means any
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods, e.g. `["GET","POST","OPTIONS","PUT","DELETE","PATCH"]`
    pub allowed_methods: Vec<String>,
    /// Allowed request headers; `["*"]` means any
    pub allowed_headers: Vec<String>,
    /// Whether to allow credentials
    pub allow_credentials: bool,
    /// Max age for preflight caching in seconds
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
            allowed_methods: vec![
                "GET".to_owned(),
                "POST".to_owned(),
                "PUT".to_owned(),
                "PATCH".to_owned(),
                "DELETE".to_owned(),
                "OPTIONS".to_owned(),
            ],
            allowed_headers: vec!["*".to_owned()],
            allow_credentials: false,
            max_age_seconds: 600,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a YAML file overlaid with `SERVEKIT_`-prefixed
    /// environment variables (nested keys split on `__`, e.g.
    /// `SERVEKIT_AUTH__SECRET_KEY`).
    ///
    /// # Errors
    /// Returns the figment error for unreadable files, unknown keys, or
    /// type mismatches.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("SERVEKIT_").split("__"))
            .extract()
    }

    /// Cross-field constraints serde cannot express.
    ///
    /// # Errors
    /// Fails when auth is enabled without a signing secret, or when CORS
    /// combines credentials with a wildcard origin.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.enabled && self.auth.secret_key.expose_secret().is_empty() {
            anyhow::bail!(
                "auth is enabled but no signing secret is configured; \
                 set auth.secret_key or disable auth"
            );
        }
        if let Some(cors) = &self.cors
            && cors.allow_credentials
            && cors.allowed_origins.iter().any(|o| o == "*")
        {
            anyhow::bail!("CORS cannot allow credentials together with a wildcard origin");
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;

    fn from_yaml(yaml: &str) -> Result<GatewayConfig, figment::Error> {
        Figment::new().merge(Yaml::string(yaml)).extract()
    }

    #[test]
    fn defaults_enable_auth_and_rbac() {
        let cfg = GatewayConfig::default();
        assert!(cfg.auth.enabled);
        assert!(cfg.rbac_enabled);
        assert!(!cfg.cors_enabled);
        assert!(cfg.auth.secret_key.expose_secret().is_empty());
    }

    #[test]
    fn yaml_fills_unset_fields_with_defaults() {
        let cfg = from_yaml(
            r"
            auth:
              secret_key: s3cr3t
            ",
        )
        .unwrap();

        assert!(cfg.auth.enabled);
        assert_eq!(cfg.auth.secret_key.expose_secret(), "s3cr3t");
        assert!(cfg.rbac_enabled);
        assert!(cfg.cors.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = from_yaml(
            r"
            auth:
              secret_key: s3cr3t
              totally_unknown: true
            ",
        );
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_enabled_auth_without_secret() {
        let cfg = GatewayConfig::default();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_disabled_auth_without_secret() {
        let cfg = from_yaml(
            r"
            auth:
              enabled: false
            ",
        )
        .unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_credentialed_wildcard_cors() {
        let cfg = from_yaml(
            r"
            auth:
              enabled: false
            cors_enabled: true
            cors:
              allow_credentials: true
            ",
        )
        .unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn env_vars_override_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "auth:\n  secret_key: from-file")?;
            jail.set_env("SERVEKIT_AUTH__SECRET_KEY", "from-env");

            let cfg = GatewayConfig::load("config.yaml")?;
            assert_eq!(cfg.auth.secret_key.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn load_reads_a_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "auth:\n  secret_key: from-file\nrbac_enabled: false"
        )
        .unwrap();

        let cfg = GatewayConfig::load(file.path()).unwrap();
        assert_eq!(cfg.auth.secret_key.expose_secret(), "from-file");
        assert!(!cfg.rbac_enabled);
    }
}

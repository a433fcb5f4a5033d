use crate::authn::Credentials;
use crate::token::{ResponseType, Scopes};
use crate::utils::endpoints::DEFAULT_AUTHORIZATION_SERVER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum length of a base32 TOTP shared secret
pub const MIN_TOTP_SECRET_LEN: usize = 16;

/// Name of the settings file looked up in the working and secrets directories
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        source: basic_toml::Error,
    },

    #[error("Failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AutotokenSettings {
    pub provider: ProviderSettings,
    pub credentials: CredentialSettings,
    pub http: HttpSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub domain: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// `token`, `id_token` or `id_token token`
    pub response_type: String,
    pub authorization_server: String,
}

#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CredentialSettings {
    pub username: String,
    pub password: String,
    /// Base32 shared secret of the user's software TOTP factor
    pub totp_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            client_id: String::new(),
            redirect_uri: String::new(),
            scopes: vec![
                "openid".to_string(),
                "profile".to_string(),
                "email".to_string(),
            ],
            response_type: ResponseType::default().as_str().to_string(),
            authorization_server: DEFAULT_AUTHORIZATION_SERVER.to_string(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("autotoken/{}", crate::VERSION),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// Secrets stay out of Debug output
impl std::fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("totp_secret", &self.totp_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl std::fmt::Debug for AutotokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutotokenSettings")
            .field("provider", &self.provider)
            .field("credentials", &self.credentials)
            .field("http", &self.http)
            .field("logging", &self.logging)
            .finish()
    }
}

impl AutotokenSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but cannot be parsed
    /// - A settings file cannot be read or parsed
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_env_file()?;

        let secrets_dir = std::env::var_os("AUTOTOKEN_SECRETS_DIR").map(PathBuf::from);
        let mut settings = Self::load_base_settings(Path::new("."), secrets_dir.as_deref())?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `AUTOTOKEN_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in the working directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    pub fn load_base_settings(
        working_dir: &Path,
        secrets_dir: Option<&Path>,
    ) -> Result<Self, SettingsError> {
        let sources = Self::settings_sources(working_dir, secrets_dir);

        if let Some(secrets_dir) = secrets_dir {
            let secrets_path = secrets_dir.join(SETTINGS_FILE);
            if !sources.contains(&secrets_path) {
                eprintln!(
                    "⚠ AUTOTOKEN_SECRETS_DIR set but no {SETTINGS_FILE} found at: {}",
                    secrets_path.display()
                );
            }
        }

        let mut settings = Self::default();
        for path in sources {
            settings = Self::from_toml_file(&path)?;
            // Runs before the logger exists; stdout is reserved for tokens
            eprintln!("✓ Loaded settings from {}", path.display());
        }

        Ok(settings)
    }

    /// Settings files that exist, lowest priority first
    #[must_use]
    pub fn settings_sources(working_dir: &Path, secrets_dir: Option<&Path>) -> Vec<PathBuf> {
        std::iter::once(working_dir.join(SETTINGS_FILE))
            .chain(secrets_dir.map(|dir| dir.join(SETTINGS_FILE)))
            .filter(|path| path.exists())
            .collect()
    }

    /// Parse a single settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_toml_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        basic_toml::from_str(&content).map_err(|source| SettingsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(&mut self) {
        Self::apply_provider_env_overrides(&mut self.provider);
        Self::apply_credential_env_overrides(&mut self.credentials);
        Self::apply_http_env_overrides(&mut self.http);
        Self::apply_logging_env_overrides(&mut self.logging);
    }

    fn apply_provider_env_overrides(provider: &mut ProviderSettings) {
        Self::apply_string_env_override("OKTA_DOMAIN", &mut provider.domain);
        Self::apply_string_env_override("OKTA_CLIENT_ID", &mut provider.client_id);
        Self::apply_string_env_override("OKTA_REDIRECT_URI", &mut provider.redirect_uri);
        Self::apply_string_env_override("OKTA_RESPONSE_TYPE", &mut provider.response_type);
        Self::apply_string_env_override(
            "OKTA_AUTHORIZATION_SERVER",
            &mut provider.authorization_server,
        );
        if let Ok(scopes) = std::env::var("OKTA_SCOPES") {
            provider.scopes = scopes
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|scope| !scope.is_empty())
                .map(ToString::to_string)
                .collect();
        }
    }

    fn apply_credential_env_overrides(credentials: &mut CredentialSettings) {
        Self::apply_string_env_override("OKTA_USERNAME", &mut credentials.username);
        Self::apply_string_env_override("OKTA_PASSWORD", &mut credentials.password);
        if let Ok(secret) = std::env::var("OKTA_TOTP_SECRET") {
            credentials.totp_secret = if secret.trim().is_empty() {
                None
            } else {
                Some(secret)
            };
        }
    }

    fn apply_http_env_overrides(http: &mut HttpSettings) {
        if let Ok(value_str) = std::env::var("HTTP_TIMEOUT_SECONDS") {
            if let Ok(value) = value_str.parse::<u64>() {
                http.timeout_seconds = value;
            }
        }
    }

    fn apply_logging_env_overrides(logging: &mut LoggingSettings) {
        Self::apply_string_env_override("RUST_LOG", &mut logging.level);
    }

    /// Helper function to apply string environment variable overrides
    fn apply_string_env_override(env_var: &str, target: &mut String) {
        if let Ok(value) = std::env::var(env_var) {
            *target = value;
        }
    }

    /// Load environment variables from a `.env` file, if there is one
    fn load_env_file() -> Result<(), SettingsError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(()),
            Err(e) if e.not_found() => Ok(()),
            Err(e) => Err(SettingsError::EnvFile(e)),
        }
    }

    /// Initialize `env_logger` with the configured level as default filter
    ///
    /// # Errors
    ///
    /// Returns an error if a logger is already installed.
    pub fn init_logging(&self) -> Result<(), SettingsError> {
        env_logger::Builder::new()
            .parse_filters(&self.logging.level)
            .try_init()?;
        Ok(())
    }

    /// Check that everything the token flow needs is present and well-formed
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed setting.
    pub fn validate(&self) -> Result<(), SettingsError> {
        require("provider.domain", &self.provider.domain)?;
        require("provider.client_id", &self.provider.client_id)?;
        require("provider.redirect_uri", &self.provider.redirect_uri)?;
        require("credentials.username", &self.credentials.username)?;
        require("credentials.password", &self.credentials.password)?;

        url::Url::parse(&self.provider.redirect_uri).map_err(|e| SettingsError::Invalid {
            field: "provider.redirect_uri",
            message: e.to_string(),
        })?;

        if self.scopes().is_empty() {
            return Err(SettingsError::Invalid {
                field: "provider.scopes",
                message: "at least one scope is required".to_string(),
            });
        }

        self.response_type()?;

        if let Some(secret) = &self.credentials.totp_secret {
            let length = secret.chars().filter(|c| !c.is_whitespace()).count();
            if length < MIN_TOTP_SECRET_LEN {
                return Err(SettingsError::Invalid {
                    field: "credentials.totp_secret",
                    message: format!(
                        "must be at least {MIN_TOTP_SECRET_LEN} characters, got {length}"
                    ),
                });
            }
        }

        if self.http.timeout_seconds == 0 {
            return Err(SettingsError::Invalid {
                field: "http.timeout_seconds",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Configured scopes, deduplicated in order
    #[must_use]
    pub fn scopes(&self) -> Scopes {
        Scopes::new(&self.provider.scopes)
    }

    /// Parsed `provider.response_type`
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a supported response type.
    pub fn response_type(&self) -> Result<ResponseType, SettingsError> {
        self.provider
            .response_type
            .parse()
            .map_err(|e: crate::token::ParseResponseTypeError| SettingsError::Invalid {
                field: "provider.response_type",
                message: e.to_string(),
            })
    }

    /// Credentials for the configured user, with an optional passcode
    #[must_use]
    pub fn credentials(&self, pass_code: Option<String>) -> Credentials {
        Credentials {
            domain: self.provider.domain.clone(),
            username: self.credentials.username.clone(),
            password: self.credentials.password.clone(),
            pass_code,
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), SettingsError> {
    if value.trim().is_empty() {
        Err(SettingsError::Missing(field))
    } else {
        Ok(())
    }
}

//! Configuration for the Automower tools.
//!
//! TOML account profiles, credential resolution (env + keyring +
//! plaintext), and translation to `automower_core::HubConfig`. The CLI
//! layers its flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use automower_core::{Endpoints, HubConfig};

/// Keyring service name; entries are keyed by account username.
pub const KEYRING_SERVICE: &str = "automower";

pub const ENV_PREFIX: &str = "AUTOMOWER_";
pub const USERNAME_ENV: &str = "AUTOMOWER_USERNAME";
pub const PASSWORD_ENV: &str = "AUTOMOWER_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named accounts.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Profile name from an explicit choice, the configured default, or
    /// `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Poll period for `watch`, in seconds.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            scan_interval: default_scan_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_scan_interval() -> u64 {
    60
}

/// One vendor account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Account e-mail.
    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Override the login service base URL.
    pub auth_url: Option<String>,

    /// Override the mower service base URL.
    pub api_url: Option<String>,

    pub timeout: Option<u64>,

    pub scan_interval: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "automower", "automower").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("automower");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Layers: defaults, then the TOML file (if
/// present), then `AUTOMOWER_`-prefixed env vars with `__` as the
/// nesting separator (`AUTOMOWER_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Username from the profile, then `AUTOMOWER_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Password from `AUTOMOWER_PASSWORD`, then the system keyring, then
/// plaintext in the profile.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    username: &str,
) -> Result<SecretString, ConfigError> {
    first_password(
        std::env::var(PASSWORD_ENV).ok(),
        || keyring_password(username),
        profile.password.as_deref(),
    )
    .ok_or_else(|| ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn first_password(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    env.or_else(keyring)
        .or_else(|| plaintext.map(str::to_owned))
        .map(SecretString::from)
}

fn keyring_password(username: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, username)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store a password in the system keyring.
pub fn store_password(username: &str, password: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)?;
    entry.set_password(password.expose_secret())?;
    Ok(())
}

// ── Translation to core ─────────────────────────────────────────────

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {value}"),
    })
}

fn positive_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Endpoints from a profile, with unset URLs left at the vendor defaults.
pub fn resolve_endpoints(profile: &Profile) -> Result<Endpoints, ConfigError> {
    let mut endpoints = Endpoints::default();
    if let Some(ref auth) = profile.auth_url {
        endpoints.auth_url = parse_url("auth_url", auth)?;
    }
    if let Some(ref api) = profile.api_url {
        endpoints.api_url = parse_url("api_url", api)?;
    }
    Ok(endpoints)
}

/// Build a `HubConfig` from a profile and the global defaults.
pub fn profile_to_hub_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<HubConfig, ConfigError> {
    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name, &username)?;

    let mut hub = HubConfig::new(username, password);
    hub.endpoints = resolve_endpoints(profile)?;
    hub.timeout = positive_secs("timeout", profile.timeout.unwrap_or(defaults.timeout))?;
    hub.scan_interval = positive_secs(
        "scan_interval",
        profile.scan_interval.unwrap_or(defaults.scan_interval),
    )?;
    Ok(hub)
}

/// Resolve the active (or named) profile of `config` into a `HubConfig`.
pub fn resolve_hub_config(config: &Config, profile: Option<&str>) -> Result<HubConfig, ConfigError> {
    let name = config.active_profile_name(profile);
    let selected = config
        .profiles
        .get(&name)
        .ok_or_else(|| ConfigError::ProfileNotFound { name: name.clone() })?;
    profile_to_hub_config(selected, &name, &config.defaults)
}

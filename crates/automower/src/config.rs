//! CLI configuration: the config crate's profiles with global flag
//! overrides layered on top.

pub use automower_config::{
    Config, Profile, config_path, load_config, load_config_or_default, profile_to_hub_config,
    save_config, store_password,
};
use automower_core::HubConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Apply flag (and flag-env) overrides to a profile.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(ref password) = global.password {
        profile.password = Some(password.clone());
    }
    if let Some(ref url) = global.auth_url {
        profile.auth_url = Some(url.clone());
    }
    if let Some(ref url) = global.api_url {
        profile.api_url = Some(url.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// Build a `HubConfig` from the config file, profile, and CLI overrides.
///
/// A missing profile is only an error when it was asked for by name;
/// otherwise flags and `AUTOMOWER_*` env vars alone may supply the
/// account.
pub fn build_hub_config(global: &GlobalOpts) -> Result<HubConfig, CliError> {
    let cfg = load_config_or_default();
    build_hub_config_from(&cfg, global)
}

pub fn build_hub_config_from(cfg: &Config, global: &GlobalOpts) -> Result<HubConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(automower_config::ConfigError::ProfileNotFound { name: profile_name }.into());
        }
        None => Profile::default(),
    };
    apply_overrides(&mut profile, global);

    Ok(profile_to_hub_config(&profile, &profile_name, &cfg.defaults)?)
}

//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the password.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "scan_interval = {}", cfg.defaults.scan_interval);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref url) = p.auth_url {
            let _ = writeln!(out, "auth_url = \"{url}\"");
        }
        if let Some(ref url) = p.api_url {
            let _ = writeln!(out, "api_url = \"{url}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(interval) = p.scan_interval {
            let _ = writeln!(out, "scan_interval = {interval}");
        }
    }

    out
}

/// Copy of the config safe to serialize for `--output json|yaml`.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    cfg
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let available: Vec<_> = cfg.profiles.keys().cloned().collect();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn prompt_password() -> Result<String, CliError> {
    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if pass.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(pass)
}

/// Offer to store the password in the system keyring.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if stored
/// in the keyring.
fn prompt_keyring_storage(username: &str, password: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_password(username, &SecretString::from(password))?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

fn parse_secs(field: &str, value: &str) -> Result<u64, CliError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(CliError::Validation {
            field: field.into(),
            reason: "must be a positive number of seconds".into(),
        }),
    }
}

/// Apply one `config set` key to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "username" => profile.username = Some(value),
        "auth_url" | "auth-url" => profile.auth_url = Some(value),
        "api_url" | "api-url" => profile.api_url = Some(value),
        "timeout" => profile.timeout = Some(parse_secs("timeout", &value)?),
        "scan_interval" | "scan-interval" => {
            profile.scan_interval = Some(parse_secs("scan_interval", &value)?);
        }
        "password" => {
            return Err(CliError::Validation {
                field: "password".into(),
                reason: "use `automower config set-password` instead".into(),
            });
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: username, auth_url, \
                     api_url, timeout, scan_interval"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                global.output,
                &redacted(&cfg),
                format_config_redacted,
                |_| "config".into(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: automower config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    output::print_output(&format!("{name}{marker}"), global.quiet);
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name =
                profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            let prof = cfg
                .profiles
                .get(&profile_name)
                .ok_or_else(|| profile_not_found(&cfg, profile_name.clone()))?;
            let username = prof.username.as_deref().ok_or_else(|| CliError::Validation {
                field: "username".into(),
                reason: format!("profile '{profile_name}' has no username"),
            })?;

            let password = prompt_password()?;
            config::store_password(username, &SecretString::from(password))?;
            eprintln!("✓ Password stored in system keyring for '{username}'");
            Ok(())
        }
    }
}

/// Interactive wizard writing a single-profile config.
fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    // Refuse to clobber a config file that does not parse.
    let mut cfg = config::load_config()?;

    eprintln!("Automower CLI configuration");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Account e-mail")
        .interact_text()
        .map_err(prompt_err)?;
    if username.is_empty() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "account e-mail cannot be empty".into(),
        });
    }

    let password = prompt_keyring_storage(&username, prompt_password()?)?;

    let profile = Profile {
        username: Some(username),
        password,
        ..Profile::default()
    };

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: automower list");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn config_with_secret() -> Config {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "home".into(),
            Profile {
                username: Some("owner@example.com".into()),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        Config {
            default_profile: Some("home".into()),
            profiles,
            ..Config::default()
        }
    }

    #[test]
    fn show_masks_password() {
        let cfg = config_with_secret();
        let text = format_config_redacted(&cfg);
        assert!(text.contains("username = \"owner@example.com\""));
        assert!(!text.contains("hunter2"));

        let json = serde_json::to_string(&redacted(&cfg)).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn set_validates_keys() {
        let mut profile = Profile::default();
        set_profile_key(&mut profile, "scan-interval", "120".into()).unwrap();
        assert_eq!(profile.scan_interval, Some(120));

        assert!(set_profile_key(&mut profile, "timeout", "0".into()).is_err());
        assert!(set_profile_key(&mut profile, "password", "x".into()).is_err());
        assert!(set_profile_key(&mut profile, "color", "red".into()).is_err());
    }
}

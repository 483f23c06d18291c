use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, info};
use url::Url;
use zeroize::Zeroizing;

use crate::{
    error::ConfigError,
    profile::{ControlProfile, KeymapPreset},
};

pub const SHARED_SECRET_VARS: [&str; 2] = ["SOCKET_SHARED_SECRET", "APP__SOCKET_SHARED_SECRET"];
pub const ENDPOINT_VARS: [&str; 2] = ["RC_ENDPOINT", "APP__ENDPOINT"];
pub const PROFILE_VAR: &str = "RC_PROFILE";
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8081";
pub const DEFAULT_PROFILE_FILE: &str = "controller.toml";

/// Credential sent once per link before any command. Never printed, wiped on drop.
pub struct SharedSecret(Zeroizing<String>);

impl SharedSecret {
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ConfigError::MissingSharedSecret);
        }
        Ok(Self(Zeroizing::new(value)))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Values coming from the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub profile: Option<PathBuf>,
    pub keymap: Option<KeymapPreset>,
}

/// Environment plus the values captured when the binary was built.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub env: HashMap<String, String>,
    pub build_secret: Option<String>,
    pub build_endpoint: Option<String>,
}

impl ConfigSources {
    pub fn from_process() -> Self {
        let env = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self {
            env,
            build_secret: option_env!("SOCKET_SHARED_SECRET").map(str::to_owned),
            build_endpoint: option_env!("RC_ENDPOINT").map(str::to_owned),
        }
    }

    fn var(&self, name: &str) -> Option<&str> {
        self.env
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn first_var(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.var(name))
    }
}

#[derive(Debug)]
pub struct ClientSettings {
    pub endpoint: Url,
    pub shared_secret: SharedSecret,
    pub profile: ControlProfile,
}

pub fn load_settings(overrides: &SettingsOverrides) -> Result<ClientSettings, ConfigError> {
    load_settings_from(&ConfigSources::from_process(), overrides)
}

pub fn load_settings_from(
    sources: &ConfigSources,
    overrides: &SettingsOverrides,
) -> Result<ClientSettings, ConfigError> {
    let shared_secret = resolve_shared_secret(sources)?;

    let raw_endpoint = overrides
        .endpoint
        .as_deref()
        .or_else(|| sources.first_var(&ENDPOINT_VARS))
        .or(sources.build_endpoint.as_deref())
        .unwrap_or(DEFAULT_ENDPOINT);
    let endpoint = parse_endpoint(raw_endpoint)?;

    let profile_path = overrides
        .profile
        .clone()
        .or_else(|| sources.var(PROFILE_VAR).map(PathBuf::from))
        .or_else(|| {
            let fallback = Path::new(DEFAULT_PROFILE_FILE);
            fallback.exists().then(|| fallback.to_path_buf())
        });
    let mut profile = match &profile_path {
        Some(path) => {
            info!(path = %path.display(), "loading control profile");
            ControlProfile::load(path)?
        }
        None => {
            debug!("no control profile file; using built-in tables");
            ControlProfile::default()
        }
    };
    if let Some(preset) = overrides.keymap {
        profile = profile.with_keymap(preset);
    }

    Ok(ClientSettings {
        endpoint,
        shared_secret,
        profile,
    })
}

pub fn resolve_shared_secret(sources: &ConfigSources) -> Result<SharedSecret, ConfigError> {
    let value = sources
        .first_var(&SHARED_SECRET_VARS)
        .or(sources.build_secret.as_deref())
        .ok_or(ConfigError::MissingSharedSecret)?;
    SharedSecret::new(value)
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(invalid(format!(
            "scheme must be ws or wss, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

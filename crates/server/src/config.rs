use std::{fs, io, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "server.toml";
pub const DESTINATION_URL_ENV: &str = "GOOGLE_SCRIPT_WEBAPP_URL";

/// How much of the payload the relay checks before forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Every required form field must be filled.
    #[default]
    Full,
    /// Only full name and email, matching the legacy relay.
    Identity,
}

impl FromStr for ValidationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(ValidationMode::Full),
            "identity" => Ok(ValidationMode::Identity),
            other => bail!("unknown validation mode '{other}' (expected 'full' or 'identity')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    /// Absent is allowed: each registration then fails with a 500.
    pub destination_url: Option<Url>,
    pub upstream_timeout: Option<Duration>,
    pub validation_mode: ValidationMode,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".into(),
            destination_url: None,
            upstream_timeout: None,
            validation_mode: ValidationMode::Full,
            max_body_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    bind_addr: Option<String>,
    destination_url: Option<String>,
    upstream_timeout_secs: Option<u64>,
    validation_mode: Option<ValidationMode>,
    max_body_bytes: Option<usize>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let raw = match fs::read_to_string(SETTINGS_FILE) {
        Ok(raw) => Some(raw),
        Err(error) if error.kind() == io::ErrorKind::NotFound => None,
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read '{SETTINGS_FILE}'"))
        }
    };
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Layers defaults, the optional settings file, then environment overrides.
pub(crate) fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    let mut destination: Option<String> = None;

    if let Some(raw) = file {
        let file_cfg: FileSettings =
            toml::from_str(raw).with_context(|| format!("invalid '{SETTINGS_FILE}'"))?;
        if let Some(v) = file_cfg.bind_addr {
            settings.bind_addr = v;
        }
        if let Some(v) = file_cfg.destination_url {
            destination = Some(v);
        }
        if let Some(v) = file_cfg.upstream_timeout_secs {
            settings.upstream_timeout = Some(Duration::from_secs(v));
        }
        if let Some(v) = file_cfg.validation_mode {
            settings.validation_mode = v;
        }
        if let Some(v) = file_cfg.max_body_bytes {
            settings.max_body_bytes = v;
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.override_bind_addr(v);
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.override_bind_addr(v);
    }

    if let Some(v) = env(DESTINATION_URL_ENV) {
        destination = Some(v);
    }
    if let Some(v) = env("APP__DESTINATION_URL") {
        destination = Some(v);
    }

    if let Some(v) = env("APP__UPSTREAM_TIMEOUT_SECS") {
        let secs = v.trim().parse::<u64>().with_context(|| {
            format!("APP__UPSTREAM_TIMEOUT_SECS must be whole seconds, got '{v}'")
        })?;
        settings.upstream_timeout = Some(Duration::from_secs(secs));
    }

    if let Some(v) = env("APP__VALIDATION_MODE") {
        settings.validation_mode = v.parse()?;
    }

    if let Some(v) = env("APP__MAX_BODY_BYTES") {
        settings.max_body_bytes = v
            .trim()
            .parse::<usize>()
            .with_context(|| format!("APP__MAX_BODY_BYTES must be a byte count, got '{v}'"))?;
    }

    settings.destination_url = destination
        .as_deref()
        .map(parse_destination_url)
        .transpose()?
        .flatten();

    Ok(settings)
}

impl Settings {
    fn override_bind_addr(&mut self, value: String) {
        if !value.trim().is_empty() {
            self.bind_addr = value;
        }
    }
}

fn parse_destination_url(raw: &str) -> anyhow::Result<Option<Url>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(raw)
        .with_context(|| format!("{DESTINATION_URL_ENV} is not a valid URL: '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "{DESTINATION_URL_ENV} must use http or https, got '{}'",
            url.scheme()
        );
    }
    Ok(Some(url))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

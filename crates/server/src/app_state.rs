use anyhow::Context;
use reqwest::Client;
use url::Url;

use crate::config::{Settings, ValidationMode};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) http: Client,
    pub(crate) destination_url: Option<Url>,
    pub(crate) validation_mode: ValidationMode,
}

impl AppState {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build webhook HTTP client")?;

        Ok(Self {
            http,
            destination_url: settings.destination_url.clone(),
            validation_mode: settings.validation_mode,
        })
    }
}

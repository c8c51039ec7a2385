use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{RegistrationPayload, SubmitResponse};
use url::Url;

use crate::error::TransportError;

/// Path the relay is deployed under.
pub const REGISTER_PATH: &str = "/.netlify/functions/register";

#[async_trait]
pub trait RegistrationTransport: Send + Sync {
    /// Sends one registration. Any non-success answer is an error.
    async fn submit(&self, payload: &RegistrationPayload) -> Result<(), TransportError>;
}

pub struct HttpRegistrationTransport {
    http: Client,
    endpoint: Url,
}

impl HttpRegistrationTransport {
    pub fn new(proxy_base: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), proxy_base, REGISTER_PATH)
    }

    /// `path` is appended below whatever path `proxy_base` already carries.
    pub fn with_client(http: Client, proxy_base: &str, path: &str) -> Result<Self, TransportError> {
        let mut base = Url::parse(proxy_base)?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        let endpoint = base.join(path.trim_start_matches('/'))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RegistrationTransport for HttpRegistrationTransport {
    async fn submit(&self, payload: &RegistrationPayload) -> Result<(), TransportError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<SubmitResponse>()
            .await
            .ok()
            .and_then(|reply| reply.error);
        Err(TransportError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

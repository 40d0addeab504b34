//! Blocking HTTP transport for the Transparency Platform API.
//!
//! The orchestrator only sees the [`Transport`] seam, so tests can script
//! responses without a network and alternative transports (a recorded
//! fixture set, a proxy) slot in unchanged.

use log::debug;
use reqwest::blocking::Client;

use crate::error::Error;

const DEFAULT_API_URL: &str = "https://web-api.tp.entsoe.eu/api";

/// One synchronous request/response exchange with the remote API.
pub trait Transport {
    /// Issue one request with the given query parameters; returns the raw
    /// XML body on success.
    fn send(&self, params: &[(&str, String)]) -> Result<String, Error>;
}

/// [`Transport`] over blocking reqwest with token authentication.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Read `ENTSOE_TOKEN` (and the optional `ENTSOE_API_URL` override)
    /// from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();
        let token = std::env::var("ENTSOE_TOKEN").map_err(|_| Error::MissingToken)?;
        let base_url =
            std::env::var("ENTSOE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Ok(Self::new(base_url, token))
    }
}

impl Transport for HttpTransport {
    fn send(&self, params: &[(&str, String)]) -> Result<String, Error> {
        // No timeout beyond reqwest's defaults: a hung call blocks the
        // whole pipeline. TODO: add a configurable request timeout once
        // the CLI grows a --timeout flag.
        let mut query: Vec<(&str, &str)> = vec![("securityToken", self.token.as_str())];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let resp = self.client.get(self.base_url.as_str()).query(&query).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(Error::Transport {
                status: status.as_u16(),
                body,
            });
        }
        debug!("received {} bytes", body.len());
        Ok(body)
    }
}

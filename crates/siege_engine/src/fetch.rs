use std::time::Duration;

use reqwest::header::HOST;
use siege_core::Outcome;

/// Identifies the tool to the target host on every request.
pub const USER_AGENT: &str = concat!("logsiege/", env!("CARGO_PKG_VERSION"));

/// Issues replay GETs and classifies whatever comes back.
///
/// Classification is total: every fetch yields exactly one [`Outcome`] and
/// never an error, so no single failed request can abort a run.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    vhost: Option<String>,
}

impl Fetcher {
    /// Builds the shared HTTP client. `vhost`, when set, overrides the Host
    /// header derived from the target URL.
    pub fn new(request_timeout: Duration, vhost: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client, vhost })
    }

    /// GETs `url` and reads the status.
    pub async fn fetch(&self, url: &str) -> Outcome {
        let mut request = self.client.get(url);
        if let Some(vhost) = &self.vhost {
            request = request.header(HOST, vhost.as_str());
        }
        match request.send().await {
            Ok(response) => Outcome::from_status(response.status().as_u16()),
            Err(err) if err.is_timeout() => Outcome::Timeout,
            Err(_) => Outcome::NetworkError,
        }
    }
}

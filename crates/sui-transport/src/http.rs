//! Blocking JSON-over-HTTP exchange shared by every remote call.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::TransportError;

/// Request and connect timeouts for a [`JsonTransport`].
#[derive(Debug, Clone, Copy)]
pub struct HttpTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl HttpTimeouts {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds.
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn from_secs(request: u64, connect: u64) -> Self {
        Self {
            request: Duration::from_secs(request),
            connect: Duration::from_secs(connect),
        }
    }
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self::from_secs(Self::DEFAULT_TIMEOUT_SECS, Self::DEFAULT_CONNECT_TIMEOUT_SECS)
    }
}

/// JSON POST client with fixed headers.
#[derive(Clone)]
pub struct JsonTransport {
    agent: ureq::Agent,
    headers: Vec<(String, String)>,
}

impl JsonTransport {
    pub fn new(timeouts: HttpTimeouts) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeouts.request)
            .timeout_connect(timeouts.connect)
            .build();
        Self {
            agent,
            headers: Vec::new(),
        }
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// POST `body` as JSON to `url` and parse the response body as JSON.
    pub fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<Value, TransportError> {
        let mut request = self
            .agent
            .post(url)
            .set("Content-Type", "application/json");
        for (name, value) in &self.headers {
            request = request.set(name, value);
        }

        let response = match request.send_json(body) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(TransportError::Status { status, body });
            }
            Err(ureq::Error::Transport(e)) => return Err(TransportError::Network(e.to_string())),
        };

        let status = response.status();
        if !(200..300).contains(&status) {
            let body = response.into_string().unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        response
            .into_json::<Value>()
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

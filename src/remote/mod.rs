//! Clients for the finance tracker's JSON API.

use serde_json::Value;
use std::time::Duration;

use crate::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fetch-style request function against the API root.
pub(crate) trait RemoteApi {
    fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, RemoteError>;
}

/// Blocking HTTP client. Any non-2xx status or transport failure is an error.
pub(crate) struct HttpRemote {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpRemote {
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl RemoteApi for HttpRemote {
    fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, RemoteError> {
        let url = self.url(endpoint);
        tracing::debug!(%method, %url, "remote request");
        let req = self
            .agent
            .request(method.as_str(), &url)
            .set("Content-Type", "application/json");
        let result = match body {
            Some(b) => req.send_json(b),
            None => req.call(),
        };
        match result {
            Ok(resp) => resp
                .into_json::<Value>()
                .map_err(|e| RemoteError::Decode(e.to_string())),
            Err(ureq::Error::Status(code, _)) => Err(RemoteError::Status(code)),
            Err(ureq::Error::Transport(t)) => Err(RemoteError::Transport(t.to_string())),
        }
    }
}

/// Remote that is never reachable; every wrapper runs on the local mirror.
pub(crate) struct Offline;

impl RemoteApi for Offline {
    fn request(&self, _: Method, _: &str, _: Option<&Value>) -> Result<Value, RemoteError> {
        Err(RemoteError::Offline)
    }
}

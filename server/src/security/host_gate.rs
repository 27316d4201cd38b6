use std::collections::HashSet;
use std::sync::Arc;

use hyper::Request;
use hyper::header::HOST;

/// Outcome of the host check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostDecision {
    /// Host is listed; carries the identity to attach to the request.
    Allow(String),
    Reject(String),
}

/// Fixed allow-list of request hosts.
#[derive(Clone, Debug)]
pub struct HostGate {
    inner: Arc<HostGateInner>,
}

#[derive(Debug)]
struct HostGateInner {
    allowed: HashSet<String>,
    identity: String,
}

impl HostGate {
    pub fn new<I, S>(allowed: I, identity: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(HostGateInner {
                allowed: allowed
                    .into_iter()
                    .map(|h| h.into().to_ascii_lowercase())
                    .collect(),
                identity: identity.to_string(),
            }),
        }
    }

    /// Compare a host (port already stripped) against the allow-list.
    pub fn check(&self, host: &str) -> HostDecision {
        if self.inner.allowed.contains(&host.to_ascii_lowercase()) {
            HostDecision::Allow(self.inner.identity.clone())
        } else {
            HostDecision::Reject(host.to_string())
        }
    }

    /// Check the host a request is addressed to.
    pub fn check_request<B>(&self, req: &Request<B>) -> HostDecision {
        match request_host(req) {
            Some(host) => self.check(&host),
            None => HostDecision::Reject(String::new()),
        }
    }

    pub fn allowed_count(&self) -> usize {
        self.inner.allowed.len()
    }
}

/// Host the request targets: the `Host` header, else the absolute-form URI.
pub fn request_host<B>(req: &Request<B>) -> Option<String> {
    let raw = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().host().map(str::to_string))?;

    let host = strip_port(raw.trim());
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// `127.0.0.1:8080` → `127.0.0.1`, `[::1]:8080` → `::1`
pub fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.split(':').next().unwrap_or(host)
}

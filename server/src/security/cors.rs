use hyper::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, HeaderMap, HeaderValue, VARY,
};
use tracing::debug;

use tollgate_shared::types::server_config::CorsConfig;

/// Builds the cross-origin headers attached to every response.
///
/// The allowed origin is always the request's own `Origin`, never `*`.
#[derive(Clone, Debug)]
pub struct CorsNegotiator {
    allow_headers: HeaderValue,
    allow_methods: HeaderValue,
}

impl CorsNegotiator {
    pub fn new(allowed_headers: &[String], allowed_methods: &[String]) -> anyhow::Result<Self> {
        let allow_headers = HeaderValue::from_str(&allowed_headers.join(","))?;
        let allow_methods = HeaderValue::from_str(&allowed_methods.join(","))?;
        Ok(Self {
            allow_headers,
            allow_methods,
        })
    }

    pub fn from_config(config: &CorsConfig) -> anyhow::Result<Self> {
        Self::new(&config.allowed_headers, &config.allowed_methods)
    }

    /// Headers granting `origin` credentialed access. Never rejects.
    pub fn negotiate(&self, origin: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        match origin {
            Some(origin) => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                headers.insert(VARY, HeaderValue::from_static("Origin"));
            }
            None => debug!("No Origin header, allow-origin omitted"),
        }

        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );

        headers
    }
}

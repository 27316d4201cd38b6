use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Result, anyhow};
use hyper::header::{COOKIE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

/// Split a `Cookie` header into name → value.
///
/// Entries are `;` separated and split on their first `=`; entries without
/// one are skipped. A later duplicate name wins.
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();
            if name.is_empty() {
                None
            } else {
                Some((name.to_string(), value.to_string()))
            }
        })
        .collect()
}

/// Extract cookie value by name, looking through every `Cookie` header.
pub fn get_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let found = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|header| parse_cookies(header).remove(cookie_name));

    match &found {
        Some(_) => debug!("Cookie found: {}", cookie_name),
        None => debug!("Cookie not found: {}", cookie_name),
    }
    found
}

/// Set a cookie with options
pub fn set_cookie(
    name: &str,
    value: &str,
    max_age: Option<Duration>,
    path: Option<&str>,
    http_only: bool,
    same_site: Option<&str>,
) -> Result<HeaderValue> {
    let mut cookie = format!("{}={}", name, value);

    if let Some(age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", age.as_secs()));
    }

    if let Some(p) = path {
        cookie.push_str(&format!("; Path={}", p));
    }

    if http_only {
        cookie.push_str("; HttpOnly");
    }

    if let Some(policy) = same_site {
        cookie.push_str(&format!("; SameSite={}", policy));
        // Browsers drop `SameSite=None` cookies that are not also `Secure`.
        if policy.eq_ignore_ascii_case("none") {
            cookie.push_str("; Secure");
        }
    }

    debug!("Setting cookie: {}", name);

    HeaderValue::from_str(&cookie).map_err(|e| {
        warn!("Failed to create cookie header for {}: {}", name, e);
        anyhow!("Invalid cookie value: {}", e)
    })
}

/// The rolling session cookie. `Max-Age` is the full window on every response.
pub fn create_session_cookie(
    name: &str,
    value: &str,
    window: Duration,
    same_site: &str,
) -> Result<HeaderValue> {
    set_cookie(name, value, Some(window), Some("/"), true, Some(same_site))
}

/// A fragment cookie as issued by `/login`. Script-readable, the client replays it.
pub fn create_fragment_cookie(label: &str, value: &str, max_age: Duration) -> Result<HeaderValue> {
    set_cookie(label, value, Some(max_age), Some("/"), false, None)
}

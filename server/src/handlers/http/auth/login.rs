use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use hyper::header::SET_COOKIE;
use hyper::{Request, StatusCode};
use tracing::{debug, info};

use tollgate_shared::types::ApiReply;

use crate::AppState;
use crate::handlers::http::utils::{HttpResponse, create_fragment_cookie, deliver_serialized_json};
use crate::security::fragments;
use crate::tower_middle::RequestContext;

/// Main login handler
///
/// Marks the session as logged in, issues a credential for the configured
/// subject and hands it back as the labeled fragment set, in the body and
/// (unless disabled) as cookies.
pub async fn handle_login(
    _req: Request<Bytes>,
    state: AppState,
    ctx: RequestContext,
) -> Result<HttpResponse> {
    info!("Processing login request");

    let session = ctx
        .session
        .as_ref()
        .context("Login reached the router without a session")?;
    state.sessions.set_login_flag(session, true).await;

    let credential = state
        .codec
        .issue(&state.config.auth.login_subject)
        .context("Failed to sign credential")?;
    let fragment_set = fragments::fragment(&credential).context("Failed to fragment credential")?;

    let mut response = deliver_serialized_json(
        &ApiReply::ok("Login successful", &fragment_set),
        StatusCode::OK,
    )?;

    if state.config.auth.set_fragment_cookies {
        let max_age = Duration::from_secs(state.codec.lifetime_secs());
        for (label, value) in fragment_set.entries() {
            let cookie = create_fragment_cookie(label, value, max_age)
                .with_context(|| format!("Failed to build fragment cookie {}", label))?;
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        debug!("Fragment cookies attached");
    }

    info!("Login successful, credential issued");
    Ok(response)
}

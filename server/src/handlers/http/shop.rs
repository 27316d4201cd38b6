use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, StatusCode};
use serde::Serialize;
use tracing::info;

use tollgate_shared::types::ApiReply;

use crate::AppState;
use crate::handlers::http::utils::{HttpResponse, deliver_serialized_json};
use crate::tower_middle::RequestContext;

#[derive(Debug, Serialize)]
struct CartOwner<'a> {
    uname: &'a str,
}

/// Who the gate says is calling.
#[derive(Debug, Serialize)]
struct Caller {
    uid: Option<String>,
    user_id: Option<String>,
}

pub async fn handle_cart(
    _req: Request<Bytes>,
    _state: AppState,
    _ctx: RequestContext,
) -> Result<HttpResponse> {
    deliver_serialized_json(&ApiReply::ok("Success", CartOwner { uname: "kai" }), StatusCode::OK)
}

/// Favorites depend on the session login flag, not on the credential.
pub async fn handle_like(
    _req: Request<Bytes>,
    state: AppState,
    ctx: RequestContext,
) -> Result<HttpResponse> {
    let logged_in = match &ctx.session {
        Some(session) => state.sessions.is_logged_in(session).await,
        None => false,
    };

    let reply = if logged_in {
        ApiReply::message("Added to favorites", 200)
    } else {
        ApiReply::message("Please log in first", 201)
    };

    deliver_serialized_json(&reply, StatusCode::OK)
}

pub async fn handle_cookie(
    _req: Request<Bytes>,
    _state: AppState,
    ctx: RequestContext,
) -> Result<HttpResponse> {
    info!(
        uid = ctx.subject.as_deref().unwrap_or("-"),
        identity = ctx.identity.as_deref().unwrap_or("-"),
        "Credentialed request"
    );

    let caller = Caller {
        uid: ctx.subject,
        user_id: ctx.identity,
    };
    deliver_serialized_json(&ApiReply::ok("Success", caller), StatusCode::OK)
}

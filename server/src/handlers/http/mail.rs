use anyhow::{Context, Result};
use bytes::Bytes;
use hyper::{Request, StatusCode};
use tracing::{info, warn};

use tollgate_shared::types::ApiReply;

use crate::AppState;
use crate::handlers::http::utils::{HttpResponse, deliver_serialized_json};
use crate::mail::configured_message;
use crate::tower_middle::RequestContext;

/// Send the configured `[mail]` message.
pub async fn handle_email(
    _req: Request<Bytes>,
    state: AppState,
    _ctx: RequestContext,
) -> Result<HttpResponse> {
    let message = configured_message(&state.config.mail);
    let mailer = state.mailer.clone();

    let outcome = tokio::task::spawn_blocking(move || mailer.send(&message))
        .await
        .context("Mail task failed to complete")?;

    match outcome {
        Ok(receipt) => {
            let msg = if receipt.delivered {
                "Mail sent"
            } else {
                "Mail recorded, not delivered"
            };
            info!("{}, id={}", msg, receipt.message_id);
            deliver_serialized_json(&ApiReply::ok(msg, receipt), StatusCode::OK)
        }
        Err(e) => {
            warn!("Mail delivery failed: {:#}", e);
            deliver_serialized_json(
                &ApiReply::message("Mail delivery failed", 502),
                StatusCode::BAD_GATEWAY,
            )
        }
    }
}

//! User record endpoints. Bodies arrive as JSON or urlencoded forms.

use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, StatusCode};
use tracing::{error, info, warn};

use tollgate_shared::types::user::SEX_UNKNOWN;
use tollgate_shared::types::{ApiReply, PhoneDelete, PhoneUpdate, RegistrationData, SexFilter};

use crate::AppState;
use crate::handlers::http::utils::{
    HttpResponse, deliver_error_json, deliver_serialized_json, parse_body,
};
use crate::tower_middle::RequestContext;

/// Sex filter applied by `/findSome` when the body names none.
const DEFAULT_SEX_FILTER: u8 = 1;

fn bad_request(e: anyhow::Error) -> Result<HttpResponse> {
    warn!("Rejected request body: {:#}", e);
    deliver_error_json("INVALID_BODY", &format!("{:#}", e), StatusCode::BAD_REQUEST)
}

fn store_failure(msg: &str, e: anyhow::Error) -> Result<HttpResponse> {
    error!("{}: {:#}", msg, e);
    deliver_serialized_json(
        &ApiReply::message(msg, 500),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

pub async fn handle_register(
    req: Request<Bytes>,
    state: AppState,
    _ctx: RequestContext,
) -> Result<HttpResponse> {
    let data: RegistrationData = match parse_body(&req) {
        Ok(data) => data,
        Err(e) => return bad_request(e),
    };

    match state
        .users
        .create(&data.phone, data.sex.unwrap_or(SEX_UNKNOWN))
        .await
    {
        Ok(record) => {
            info!("Registered user {}", record.user_id);
            deliver_serialized_json(
                &ApiReply::ok("Registration successful", record),
                StatusCode::OK,
            )
        }
        Err(e) => store_failure("Registration failed", e),
    }
}

pub async fn handle_update(
    req: Request<Bytes>,
    state: AppState,
    _ctx: RequestContext,
) -> Result<HttpResponse> {
    let data: PhoneUpdate = match parse_body(&req) {
        Ok(data) => data,
        Err(e) => return bad_request(e),
    };

    match state.users.update_phone(&data.user_id, &data.phone).await {
        Ok(updated) => {
            deliver_serialized_json(&ApiReply::ok("Phone updated", updated), StatusCode::OK)
        }
        Err(e) => store_failure("Phone update failed", e),
    }
}

pub async fn handle_delete(
    req: Request<Bytes>,
    state: AppState,
    _ctx: RequestContext,
) -> Result<HttpResponse> {
    let data: PhoneDelete = match parse_body(&req) {
        Ok(data) => data,
        Err(e) => return bad_request(e),
    };

    match state.users.delete_by_phone(&data.phone).await {
        Ok(deleted) => {
            deliver_serialized_json(&ApiReply::ok("Phone deleted", deleted), StatusCode::OK)
        }
        Err(e) => store_failure("Phone delete failed", e),
    }
}

pub async fn handle_find_all(
    _req: Request<Bytes>,
    state: AppState,
    _ctx: RequestContext,
) -> Result<HttpResponse> {
    match state.users.find_all().await {
        Ok(records) => {
            deliver_serialized_json(&ApiReply::ok("Query successful", records), StatusCode::OK)
        }
        Err(e) => store_failure("Query failed", e),
    }
}

pub async fn handle_find_some(
    req: Request<Bytes>,
    state: AppState,
    _ctx: RequestContext,
) -> Result<HttpResponse> {
    let filter: SexFilter = match parse_body(&req) {
        Ok(filter) => filter,
        Err(e) => return bad_request(e),
    };
    let sex = filter.sex.unwrap_or(DEFAULT_SEX_FILTER);

    match state.users.find_by_sex(sex).await {
        Ok(listings) => {
            deliver_serialized_json(&ApiReply::ok("Query successful", listings), StatusCode::OK)
        }
        Err(e) => store_failure("Query failed", e),
    }
}

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::{Request, StatusCode};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::handlers::http::utils::{HttpResponse, plain_text};
use crate::security::{GateError, HostDecision, HostGate};
use crate::tower_middle::RequestContext;

pub const HOST_REJECTED_BODY: &str = "Request host is not allowed";

/// Tower layer for host filtering
///
/// Requests addressed to a host outside the allow-list are answered with
/// `403` and go no further. Accepted requests carry the configured identity
/// in their `RequestContext`.
#[derive(Clone)]
pub struct HostGateLayer {
    gate: HostGate,
}

impl HostGateLayer {
    pub fn new(gate: HostGate) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for HostGateLayer {
    type Service = HostGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HostGateService {
            inner,
            gate: self.gate.clone(),
        }
    }
}

#[derive(Clone)]
pub struct HostGateService<S> {
    inner: S,
    gate: HostGate,
}

impl<S, ReqBody> Service<Request<ReqBody>> for HostGateService<S>
where
    S: Service<Request<ReqBody>, Response = HttpResponse> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = HttpResponse;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let identity = match self.gate.check_request(&req) {
            HostDecision::Allow(identity) => identity,
            HostDecision::Reject(host) => {
                let err = GateError::HostNotAllowed(host);
                warn!(
                    "{} {} blocked: {} ({})",
                    req.method(),
                    req.uri().path(),
                    err,
                    err.code()
                );
                return Box::pin(async move {
                    Ok::<_, S::Error>(plain_text(StatusCode::FORBIDDEN, HOST_REJECTED_BODY))
                });
            }
        };

        debug!("Host accepted, identity={}", identity);
        RequestContext::update(&mut req, |ctx| ctx.identity = Some(identity));

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}

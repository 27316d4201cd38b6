use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::Request;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::handlers::http::utils::{HttpResponse, login_required};
use crate::security::RouteGuard;
use crate::tower_middle::RequestContext;

/// Tower layer enforcing a verified credential on protected paths.
///
/// Every failure kind produces the same `401` body. The kind itself is only
/// logged.
#[derive(Clone)]
pub struct RouteGuardLayer {
    guard: RouteGuard,
}

impl RouteGuardLayer {
    pub fn new(guard: RouteGuard) -> Self {
        Self { guard }
    }
}

impl<S> Layer<S> for RouteGuardLayer {
    type Service = RouteGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RouteGuardService {
            inner,
            guard: self.guard.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RouteGuardService<S> {
    inner: S,
    guard: RouteGuard,
}

impl<S, ReqBody> Service<Request<ReqBody>> for RouteGuardService<S>
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
        let rejection = match self.guard.check_request(&req).into_result() {
            Ok(None) => return self.forward(req),
            Ok(Some(subject)) => {
                debug!("Credential verified for {}", req.uri().path());
                RequestContext::update(&mut req, |ctx| ctx.subject = Some(subject));
                return self.forward(req);
            }
            Err(rejection) => rejection,
        };

        warn!(
            "{} {} rejected: {} ({})",
            req.method(),
            req.uri().path(),
            rejection,
            rejection.code()
        );
        Box::pin(async move { Ok::<_, S::Error>(login_required()) })
    }
}

impl<S> RouteGuardService<S> {
    fn forward<ReqBody>(
        &mut self,
        req: Request<ReqBody>,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, S::Error>> + Send>>
    where
        S: Service<Request<ReqBody>, Response = HttpResponse> + Clone + Send + 'static,
        S::Future: Send + 'static,
        ReqBody: Send + 'static,
    {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}

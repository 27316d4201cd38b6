use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::header::ORIGIN;
use hyper::{Request, Response};
use tower::{Layer, Service};

use crate::security::CorsNegotiator;

/// Tower layer that decorates every response with the negotiated CORS headers,
/// including rejections produced further down the stack.
#[derive(Clone)]
pub struct CorsLayer {
    negotiator: CorsNegotiator,
}

impl CorsLayer {
    pub fn new(negotiator: CorsNegotiator) -> Self {
        Self { negotiator }
    }
}

impl<S> Layer<S> for CorsLayer {
    type Service = CorsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorsService {
            inner,
            negotiator: self.negotiator.clone(),
        }
    }
}

#[derive(Clone)]
pub struct CorsService<S> {
    inner: S,
    negotiator: CorsNegotiator,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CorsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let cors_headers = self.negotiator.negotiate(req.headers().get(ORIGIN));

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            response.headers_mut().extend(cors_headers);
            Ok(response)
        })
    }
}

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use hyper::Request;
use hyper::header::SET_COOKIE;
use tower::{Layer, Service};
use tracing::error;

use tollgate_shared::types::server_config::SessionConfig;

use crate::handlers::http::utils::{HttpResponse, create_session_cookie, get_cookie};
use crate::security::SessionStore;
use crate::tower_middle::RequestContext;

/// Tower layer that resumes (or starts) the caller's session and re-sends the
/// session cookie on the way out.
#[derive(Clone)]
pub struct SessionLayer {
    store: SessionStore,
    cookie_name: String,
    same_site: String,
}

impl SessionLayer {
    pub fn new(store: SessionStore, config: &SessionConfig) -> Self {
        Self {
            store,
            cookie_name: config.cookie_name.clone(),
            same_site: config.same_site.clone(),
        }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionService {
            inner,
            layer: self.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SessionService<S> {
    inner: S,
    layer: SessionLayer,
}

impl<S, ReqBody> Service<Request<ReqBody>> for SessionService<S>
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
        let presented = get_cookie(req.headers(), &self.layer.cookie_name);
        let layer = self.layer.clone();

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let handle = layer.store.resume(presented.as_deref()).await;
            let session_id = handle.id.clone();
            RequestContext::update(&mut req, |ctx| ctx.session = Some(handle));

            let mut response = inner.call(req).await?;

            let window = Duration::from_secs(layer.store.window_secs());
            match create_session_cookie(&layer.cookie_name, &session_id, window, &layer.same_site)
            {
                Ok(cookie) => {
                    response.headers_mut().append(SET_COOKIE, cookie);
                }
                Err(e) => error!("Session cookie not sent: {}", e),
            }

            Ok(response)
        })
    }
}

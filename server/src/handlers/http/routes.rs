use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use anyhow::Result;
use bytes::Bytes;
use hyper::{Method, Request, StatusCode};
use tower::Service;
use tracing::{debug, error};

use crate::AppState;
use crate::handlers::http::utils::{HttpResponse, internal_error, plain_text, status_only};
use crate::handlers::http::{auth, mail, shop, users};
use crate::tower_middle::RequestContext;

// ---------------------------------------------------------------------------
// Handler type
// ---------------------------------------------------------------------------
//
// Authentication is settled before dispatch: the gate layers have already
// accepted the host, resumed the session and, on protected paths, verified
// the credential. Handlers read the outcome from `RequestContext`.

type RouteHandler = Box<
    dyn Fn(
            Request<Bytes>,
            AppState,
            RequestContext,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send>>
        + Send
        + Sync,
>;

struct Route {
    method: Method,
    path: String,
    handler: RouteHandler,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct Router {
    routes: Vec<Route>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn route<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(move |req, state, ctx| Box::pin(handler(req, state, ctx))),
        });
        self
    }

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::POST, path, handler)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn dispatch(&self, req: Request<Bytes>, state: AppState) -> Result<HttpResponse> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        for route in &self.routes {
            if route.method != method || !Self::path_matches(&route.path, &path) {
                continue;
            }
            let ctx = RequestContext::of(&req);
            return (route.handler)(req, state, ctx).await;
        }

        // Preflight for any path. The CORS layer supplies the headers.
        if method == Method::OPTIONS {
            debug!("Preflight for {}", path);
            return Ok(status_only(StatusCode::NO_CONTENT));
        }

        debug!("No route for {} {}", method, path);
        Ok(plain_text(StatusCode::NOT_FOUND, "Not Found"))
    }

    // ── Path matching ─────────────────────────────────────────────────────────

    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        // Strip query string from incoming request path before comparing.
        let clean = request_path.split('?').next().unwrap_or(request_path);
        route_path == clean
    }
}

// ---------------------------------------------------------------------------
// Route table
// ---------------------------------------------------------------------------

pub fn build_router() -> Router {
    Router::new()
        // ── Credential issue and gated routes ────────────────────────────────
        .get("/login", auth::login::handle_login)
        .get("/like", shop::handle_like)
        .get("/cookie", shop::handle_cookie)
        .get("/cart", shop::handle_cart)
        // ── Mail ─────────────────────────────────────────────────────────────
        .post("/email", mail::handle_email)
        // ── User records ─────────────────────────────────────────────────────
        .post("/register", users::handle_register)
        .post("/update", users::handle_update)
        .post("/delete", users::handle_delete)
        .post("/findAll", users::handle_find_all)
        .post("/findSome", users::handle_find_some)
}

// ---------------------------------------------------------------------------
// Tower adapter
// ---------------------------------------------------------------------------

/// Innermost service of the pipeline. Handler errors become a `500` JSON body.
#[derive(Clone)]
pub struct RouterService {
    router: Arc<Router>,
    state: AppState,
}

impl RouterService {
    pub fn new(router: Arc<Router>, state: AppState) -> Self {
        Self { router, state }
    }
}

impl Service<Request<Bytes>> for RouterService {
    type Response = HttpResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Bytes>) -> Self::Future {
        let router = self.router.clone();
        let state = self.state.clone();

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_string();

            match router.dispatch(req, state).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    error!("Handler for {} {} failed: {:#}", method, path, e);
                    Ok(internal_error())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_path_matches() {
        assert!(Router::path_matches("/cart", "/cart"));
    }

    #[test]
    fn different_paths_do_not_match() {
        assert!(!Router::path_matches("/cart", "/cookie"));
    }

    #[test]
    fn trailing_slash_does_not_match_without_slash() {
        assert!(!Router::path_matches("/login", "/login/"));
    }

    #[test]
    fn path_matching_is_case_sensitive() {
        assert!(Router::path_matches("/findAll", "/findAll"));
        assert!(!Router::path_matches("/findAll", "/findall"));
    }

    #[test]
    fn query_string_stripped_before_match() {
        assert!(Router::path_matches("/cart", "/cart?page=2"));
    }

    #[test]
    fn router_new_has_no_routes() {
        assert!(Router::new().is_empty());
    }

    #[test]
    fn route_table_registers_every_endpoint() {
        assert_eq!(build_router().len(), 10);
    }

    #[test]
    fn route_adds_entry_with_method() {
        let r = Router::new().post("/ping", |_req, _state, _ctx| async move {
            Ok(plain_text(StatusCode::OK, "pong"))
        });
        assert_eq!(r.routes.len(), 1);
        assert_eq!(r.routes[0].path, "/ping");
        assert_eq!(r.routes[0].method, Method::POST);
    }
}

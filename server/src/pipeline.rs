use std::convert::Infallible;
use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Body;
use hyper::{Request, StatusCode};
use tower::ServiceBuilder;
use tower::ServiceExt;
use tower::util::BoxCloneSyncService;
use tracing::{debug, info, warn};

use crate::AppState;
use crate::handlers::http::utils::{HttpResponse, plain_text};
use crate::handlers::http::{RouterService, build_router};
use crate::security::{CorsNegotiator, HostGate, RouteGuard};
use crate::tower_middle::{CorsLayer, HostGateLayer, RouteGuardLayer, SessionLayer};

type PipelineService = BoxCloneSyncService<Request<Bytes>, HttpResponse, Infallible>;

/// The full gate in front of the route table.
///
/// Stage order, outermost first: CORS, host gate, session, route guard,
/// router. A stage that rejects answers immediately and nothing inside it
/// runs; the CORS stage still decorates that answer.
#[derive(Clone)]
pub struct RequestPipeline {
    service: PipelineService,
    max_body_bytes: usize,
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

impl RequestPipeline {
    pub fn new(state: AppState) -> Result<Self> {
        let config = state.config.clone();

        let cors = CorsNegotiator::from_config(&config.cors)?;
        let hosts = HostGate::new(
            config.hosts.allowed.iter().cloned(),
            &config.hosts.request_identity,
        );
        let guard = RouteGuard::new(
            config.auth.protected_paths.iter().cloned(),
            state.codec.clone(),
        );
        let router = Arc::new(build_router());

        info!(
            "Pipeline built: {} allowed hosts, {} protected paths, {:?}",
            hosts.allowed_count(),
            config.auth.protected_paths.len(),
            router
        );

        let service = ServiceBuilder::new()
            .layer(CorsLayer::new(cors))
            .layer(HostGateLayer::new(hosts))
            .layer(SessionLayer::new(state.sessions.clone(), &config.session))
            .layer(RouteGuardLayer::new(guard))
            .service(RouterService::new(router, state));

        Ok(Self {
            service: BoxCloneSyncService::new(service),
            max_body_bytes: config.server.max_body_bytes,
        })
    }

    /// Run a request with an already collected body through every stage.
    pub async fn handle(&self, req: Request<Bytes>) -> HttpResponse {
        match self.service.clone().oneshot(req).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    /// Collect a streaming body (bounded by `max_body_bytes`) and run the request.
    pub async fn handle_incoming<B>(&self, req: Request<B>) -> HttpResponse
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();

        match Limited::new(body, self.max_body_bytes).collect().await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                debug!("Collected request body, {} bytes", bytes.len());
                self.handle(Request::from_parts(parts, bytes)).await
            }
            Err(e) if e.is::<http_body_util::LengthLimitError>() => {
                warn!(
                    "{} {} body exceeds {} bytes",
                    parts.method,
                    parts.uri.path(),
                    self.max_body_bytes
                );
                plain_text(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
            }
            Err(e) => {
                warn!("Failed to read request body: {}", e);
                plain_text(StatusCode::BAD_REQUEST, "Bad Request")
            }
        }
    }
}

/// Tower middleware module
///
/// The gate stages, outermost first:
/// - CORS decoration of every response
/// - Host filtering
/// - Session resume and cookie refresh
/// - Credential check on protected paths
///
/// `RequestPipeline` stacks them in this order in front of the route table.
pub mod context;
pub mod tower_cors;
pub mod tower_host_gate;
pub mod tower_route_guard;
pub mod tower_session;

pub use context::RequestContext;
pub use tower_cors::{CorsLayer, CorsService};
pub use tower_host_gate::{HostGateLayer, HostGateService};
pub use tower_route_guard::{RouteGuardLayer, RouteGuardService};
pub use tower_session::{SessionLayer, SessionService};

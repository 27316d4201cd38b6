//! Request gate components.
//!
//! Each component here is independent of hyper's service plumbing; the tower
//! layers in `tower_middle` wire them into the request path.

pub mod claims;
pub mod cors;
pub mod error;
pub mod fragments;
pub mod host_gate;
pub mod route_guard;
pub mod session;

pub use claims::ClaimsCodec;
pub use cors::CorsNegotiator;
pub use error::{FragmentError, GateError, VerificationError};
pub use host_gate::{HostDecision, HostGate};
pub use route_guard::{GuardDecision, RouteGuard};
pub use session::{SessionHandle, SessionStore};

pub mod auth;
pub mod mail;
pub mod routes;
pub mod shop;
pub mod users;
pub mod utils;

pub use routes::{Router, RouterService, build_router};

pub mod body;
pub mod headers;
pub mod json_response;

pub use body::*;
pub use headers::*;
pub use json_response::*;

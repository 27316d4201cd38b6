pub mod users;

pub use users::{UserRecord, UserStore};

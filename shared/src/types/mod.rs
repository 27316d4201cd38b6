pub mod api;
pub mod json_error;
pub mod jwt;
pub mod login;
pub mod mail;
pub mod server_config;
pub mod user;

pub use self::api::ApiReply;
pub use self::json_error::ErrorResponse;
pub use self::jwt::CredentialClaims;
pub use self::login::{DECOY_VALUE, FragmentSet, LABEL_A, LABEL_B, LABEL_C, LABEL_DECOY};
pub use self::mail::{MailMessage, MailReceipt};
pub use self::server_config::{AppConfig, ConfigError};
pub use self::user::{PhoneDelete, PhoneUpdate, RegistrationData, SexFilter, UserListing};

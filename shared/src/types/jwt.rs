use serde::{Deserialize, Serialize};

/// Claims embedded in every credential issued by `/login`.
///
/// The subject is opaque to the server. `exp` is always `iat` plus the
/// configured credential lifetime; the credential stops verifying at `exp`.
/// Nothing about the claims is stored server-side: the client holds the
/// signed credential, split into fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Standard JWT subject.
    pub sub: String,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: u64,

    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: u64,
}

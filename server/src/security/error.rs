use thiserror::Error;

/// Why a presented credential did not verify.
///
/// Only ever logged. Clients see the same login-required body for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("credential is malformed")]
    BadFormat,

    #[error("credential signature does not match")]
    BadSignature,

    #[error("credential has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::BadFormat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("credential has {0} segments, expected 3")]
    SegmentCount(usize),

    #[error("missing credential fragment `{0}`")]
    MissingFragment(&'static str),
}

/// Every way the gate stages can turn a request away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("request host `{0}` is not allowed")]
    HostNotAllowed(String),

    #[error("missing credential fragment `{0}`")]
    MissingCredentialFragment(&'static str),

    #[error("credential is malformed")]
    CredentialBadFormat,

    #[error("credential signature does not match")]
    CredentialBadSignature,

    #[error("credential has expired")]
    CredentialExpired,
}

impl From<VerificationError> for GateError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::BadFormat => Self::CredentialBadFormat,
            VerificationError::BadSignature => Self::CredentialBadSignature,
            VerificationError::Expired => Self::CredentialExpired,
        }
    }
}

impl From<FragmentError> for GateError {
    fn from(err: FragmentError) -> Self {
        match err {
            FragmentError::MissingFragment(label) => Self::MissingCredentialFragment(label),
            FragmentError::SegmentCount(_) => Self::CredentialBadFormat,
        }
    }
}

impl GateError {
    /// Stable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::HostNotAllowed(_) => "HOST_NOT_ALLOWED",
            Self::MissingCredentialFragment(_) => "MISSING_CREDENTIAL_FRAGMENT",
            Self::CredentialBadFormat => "CREDENTIAL_BAD_FORMAT",
            Self::CredentialBadSignature => "CREDENTIAL_BAD_SIGNATURE",
            Self::CredentialExpired => "CREDENTIAL_EXPIRED",
        }
    }
}

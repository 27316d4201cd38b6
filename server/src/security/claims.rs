use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use tollgate_shared::types::CredentialClaims;

use crate::security::error::VerificationError;
use crate::utils::{calculate_expiry, get_timestamp, is_expired};

/// Signs subjects into HS256 credentials and verifies them back.
///
/// Expiry is checked against an explicit `now` rather than by the JWT
/// library, so `verify_at` is deterministic and the boundary is exact:
/// a credential is valid strictly before `exp`.
pub struct ClaimsCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime_secs: u64,
}

impl fmt::Debug for ClaimsCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimsCodec")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl ClaimsCodec {
    pub fn new(secret: &[u8], lifetime_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    /// Issue a credential for `subject`, valid from now for the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(subject, get_timestamp())
    }

    pub fn issue_at(&self, subject: &str, now: u64) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = CredentialClaims {
            sub: subject.to_string(),
            iat: now,
            exp: calculate_expiry(now, self.lifetime_secs),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!("Issued credential, exp={}", claims.exp);
        Ok(token)
    }

    /// Verify a credential and return its subject.
    pub fn verify(&self, credential: &str) -> Result<String, VerificationError> {
        self.verify_at(credential, get_timestamp())
    }

    pub fn verify_at(&self, credential: &str, now: u64) -> Result<String, VerificationError> {
        let segments = credential.split('.').count();
        if segments != 3 {
            debug!("Credential rejected: {} segments", segments);
            return Err(VerificationError::BadFormat);
        }

        let data = decode::<CredentialClaims>(credential, &self.decoding, &self.validation)?;

        if is_expired(data.claims.exp, now) {
            return Err(VerificationError::Expired);
        }

        Ok(data.claims.sub)
    }
}

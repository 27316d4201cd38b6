use std::collections::HashSet;
use std::sync::Arc;

use hyper::header::COOKIE;
use hyper::{Method, Request};
use tracing::debug;

use crate::handlers::http::utils::headers::parse_cookies;
use crate::security::claims::ClaimsCodec;
use crate::security::error::{FragmentError, GateError, VerificationError};
use crate::security::fragments;
use crate::utils::get_timestamp;

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------
//
//   UNCHECKED ─┬─ not protected ──────────────────────────────▶ PathExempt
//              └─ protected ─┬─ fragments missing ───────────▶ FragmentsMissing
//                            └─ fragments present ─┬─ fails ─▶ VerifyFailed
//                                                  └─ ok ────▶ Verified

/// Terminal state of the guard for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    PathExempt,
    Verified(String),
    FragmentsMissing(FragmentError),
    VerifyFailed(VerificationError),
}

impl GuardDecision {
    /// `Ok(Some(subject))` when verified, `Ok(None)` when exempt.
    pub fn into_result(self) -> Result<Option<String>, GateError> {
        match self {
            Self::PathExempt => Ok(None),
            Self::Verified(subject) => Ok(Some(subject)),
            Self::FragmentsMissing(err) => Err(err.into()),
            Self::VerifyFailed(err) => Err(err.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// Requires a verified credential on a fixed set of paths.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    inner: Arc<RouteGuardInner>,
}

#[derive(Debug)]
struct RouteGuardInner {
    protected: HashSet<String>,
    codec: Arc<ClaimsCodec>,
}

impl RouteGuard {
    pub fn new<I, S>(protected: I, codec: Arc<ClaimsCodec>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(RouteGuardInner {
                protected: protected.into_iter().map(Into::into).collect(),
                codec,
            }),
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.inner.protected.contains(strip_query(path))
    }

    pub fn check(&self, path: &str, cookie_header: Option<&str>) -> GuardDecision {
        self.check_at(path, cookie_header, get_timestamp())
    }

    pub fn check_at(&self, path: &str, cookie_header: Option<&str>, now: u64) -> GuardDecision {
        if !self.is_protected(path) {
            return GuardDecision::PathExempt;
        }

        let cookies = parse_cookies(cookie_header.unwrap_or_default());
        let credential = match fragments::reassemble(&cookies) {
            Ok(credential) => credential,
            Err(err) => {
                debug!("Protected path {}: {}", path, err);
                return GuardDecision::FragmentsMissing(err);
            }
        };

        match self.inner.codec.verify_at(&credential, now) {
            Ok(subject) => GuardDecision::Verified(subject),
            Err(err) => {
                debug!("Protected path {}: {}", path, err);
                GuardDecision::VerifyFailed(err)
            }
        }
    }

    /// Run the guard against a request's path and `Cookie` header(s).
    ///
    /// Preflights carry no cookies and are always exempt.
    pub fn check_request<B>(&self, req: &Request<B>) -> GuardDecision {
        if req.method() == Method::OPTIONS {
            return GuardDecision::PathExempt;
        }

        let cookie_header = req
            .headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");

        let cookie_header = (!cookie_header.is_empty()).then_some(cookie_header);
        self.check(req.uri().path(), cookie_header.as_deref())
    }
}

fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tollgate_shared::types::{DECOY_VALUE, LABEL_DECOY};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const NOW: u64 = 1_700_000_000;

    fn guard() -> (RouteGuard, Arc<ClaimsCodec>) {
        let codec = Arc::new(ClaimsCodec::new(SECRET, 3600));
        (RouteGuard::new(["/cookie", "/like"], codec.clone()), codec)
    }

    fn cookies_for(codec: &ClaimsCodec, subject: &str) -> String {
        let token = codec.issue_at(subject, NOW).unwrap();
        fragments::fragment(&token).unwrap().to_cookie_header()
    }

    #[test]
    fn unprotected_path_is_exempt() {
        let (guard, _) = guard();
        assert_eq!(guard.check_at("/cart", None, NOW), GuardDecision::PathExempt);
        assert_eq!(guard.check_at("/login?x=1", None, NOW), GuardDecision::PathExempt);
    }

    #[test]
    fn query_string_does_not_hide_protection() {
        let (guard, _) = guard();
        assert!(guard.is_protected("/cookie?from=nav"));
        assert!(!guard.is_protected("/cookies"));
    }

    #[test]
    fn protected_path_without_cookies_is_missing() {
        let (guard, _) = guard();
        let decision = guard.check_at("/cookie", None, NOW);
        assert!(matches!(decision, GuardDecision::FragmentsMissing(_)));
        assert!(decision.into_result().is_err());
    }

    #[test]
    fn decoy_only_is_missing() {
        let (guard, _) = guard();
        let header = format!("{}={}", LABEL_DECOY, DECOY_VALUE);
        assert!(matches!(
            guard.check_at("/like", Some(&header), NOW),
            GuardDecision::FragmentsMissing(FragmentError::MissingFragment(_))
        ));
    }

    #[test]
    fn valid_fragments_verify() {
        let (guard, codec) = guard();
        let header = cookies_for(&codec, "uid_1314520");
        assert_eq!(
            guard.check_at("/cookie", Some(&header), NOW + 10),
            GuardDecision::Verified("uid_1314520".to_string())
        );
    }

    #[test]
    fn expired_fragments_fail_verification() {
        let (guard, codec) = guard();
        let header = cookies_for(&codec, "uid_1314520");
        let decision = guard.check_at("/cookie", Some(&header), NOW + 3600);
        assert_eq!(decision, GuardDecision::VerifyFailed(VerificationError::Expired));
        assert_eq!(decision.into_result(), Err(GateError::CredentialExpired));
    }

    #[test]
    fn unrelated_cookies_do_not_interfere() {
        let (guard, codec) = guard();
        let header = format!("sessionId=abc; {}; theme=dark", cookies_for(&codec, "s"));
        assert_eq!(
            guard.check_at("/cookie", Some(&header), NOW).into_result(),
            Ok(Some("s".to_string()))
        );
    }

    #[test]
    fn check_request_joins_multiple_cookie_headers() {
        let (guard, codec) = guard();
        let set = fragments::fragment(&codec.issue("split").unwrap()).unwrap();

        let req = Request::builder()
            .uri("/cookie")
            .header("cookie", format!("asdw={}; ydts={}", set.a, set.b))
            .header("cookie", format!("klia={}", set.c))
            .body(())
            .unwrap();

        assert_eq!(
            guard.check_request(&req),
            GuardDecision::Verified("split".to_string())
        );
    }

    #[test]
    fn preflight_to_protected_path_is_exempt() {
        let (guard, _) = guard();
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/cookie")
            .header("origin", "http://127.0.0.1:5500")
            .header("access-control-request-headers", "token")
            .body(())
            .unwrap();

        assert_eq!(guard.check_request(&req), GuardDecision::PathExempt);
    }
}

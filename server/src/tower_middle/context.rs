use hyper::Request;

use crate::security::SessionHandle;

/// Per-request facts written by the gate layers and read by handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Set by the host gate once the request host is accepted.
    pub identity: Option<String>,
    /// Verified credential subject, set by the route guard on protected paths.
    pub subject: Option<String>,
    pub session: Option<SessionHandle>,
}

impl RequestContext {
    /// Snapshot of the context carried by `req`, or an empty one.
    pub fn of<B>(req: &Request<B>) -> Self {
        req.extensions().get::<Self>().cloned().unwrap_or_default()
    }

    /// Apply `f` to the context carried by `req`, creating it if absent.
    pub fn update<B>(req: &mut Request<B>, f: impl FnOnce(&mut Self)) {
        let mut ctx = req.extensions_mut().remove::<Self>().unwrap_or_default();
        f(&mut ctx);
        req.extensions_mut().insert(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_context_reads_as_empty() {
        let req = Request::new(());
        assert_eq!(RequestContext::of(&req), RequestContext::default());
    }

    #[test]
    fn updates_accumulate() {
        let mut req = Request::new(());
        RequestContext::update(&mut req, |ctx| ctx.identity = Some("user-kai".into()));
        RequestContext::update(&mut req, |ctx| ctx.subject = Some("uid".into()));

        let ctx = RequestContext::of(&req);
        assert_eq!(ctx.identity.as_deref(), Some("user-kai"));
        assert_eq!(ctx.subject.as_deref(), Some("uid"));
        assert!(ctx.session.is_none());
    }
}

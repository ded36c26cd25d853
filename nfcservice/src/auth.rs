// nfcservice/src/auth.rs

use crate::types::CallerToken;

/// Decides whether a caller may add or remove listeners of a given type.
pub trait Authorizer: Send + Sync {
    /// Whether `caller` may register or unregister `event_type` listeners.
    fn is_permitted(&self, caller: CallerToken, event_type: &str) -> bool;
}

/// Permits everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn is_permitted(&self, _caller: CallerToken, _event_type: &str) -> bool {
        true
    }
}

impl<F> Authorizer for F
where
    F: Fn(CallerToken, &str) -> bool + Send + Sync,
{
    fn is_permitted(&self, caller: CallerToken, event_type: &str) -> bool {
        self(caller, event_type)
    }
}

use log::warn;

use crate::error::SessionExpiredReason;

/// Side effect run once the pipeline has given up on the session.
///
/// Called after session storage was cleared. A dashboard navigates to
/// `login_path`; a CLI tells the operator to log in again.
pub trait SessionExpiryHandler: Send + Sync {
    fn session_expired(&self, login_path: &str, reason: &SessionExpiredReason);
}

/// Default handler: records the expiry in the log and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogExpiryHandler;

impl SessionExpiryHandler for LogExpiryHandler {
    fn session_expired(&self, login_path: &str, reason: &SessionExpiredReason) {
        warn!("session expired ({reason}); sign in again at {login_path}");
    }
}

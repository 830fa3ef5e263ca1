//! Observer hooks for install state transitions.
//!
//! Observers see every transition but cannot alter the outcome.

use crate::installer::InstallState;
use crate::request::InstallRequest;

pub trait InstallObserver: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &'static str;

    fn on_transition(&self, _request: &InstallRequest, _from: InstallState, _to: InstallState) {}
}

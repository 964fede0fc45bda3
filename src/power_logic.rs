//! Power-off policy, independent of the pin that actually cuts power.
//!
//! The long-press path never touches the kill output itself: it hands a
//! [`ShutdownRequest`] to a worker context, which runs
//! [`PowerController::run_deferred_shutdown`].

use crate::error::Error;

/// Power-kill capability.
pub trait KillSwitch {
    /// Assert the kill output.  On success the supply is removed and this
    /// normally never returns to the caller.
    fn assert_kill(&mut self) -> Result<(), Error>;
}

/// Token passed from the timer path to the shutdown worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShutdownRequest;

/// Owns the kill output.
pub struct PowerController<K> {
    kill: K,
}

impl<K: KillSwitch> PowerController<K> {
    pub fn new(kill: K) -> Self {
        Self { kill }
    }

    /// Assert the kill signal.
    ///
    /// If the write fails the error is logged and the call returns with
    /// the system still running; callers must not assume termination.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        info!("Powering system off");
        self.kill.assert_kill().inspect_err(|e| {
            error!("Failed to set power kill signal, aborting power off: {:?}", e);
        })
    }

    /// Worker-side handler for a queued long-press shutdown.  No retry.
    pub fn run_deferred_shutdown(&mut self, _request: ShutdownRequest) {
        if self.shutdown().is_ok() {
            // Power should already be gone; reaching here means the rail
            // is held up externally (e.g. debugger supply).
            warn!("Kill signal asserted but still running");
        }
    }

    pub fn kill_switch(&self) -> &K {
        &self.kill
    }
}

//! Power-off execution on target.
//!
//! A sustained press ends here:
//! - the gesture task pushes a [`ShutdownRequest`] into a one-slot
//!   channel (non-blocking, "already pending" is fine),
//! - `shutdown_worker` picks it up in its own task and drives the kill
//!   output, which removes system power.
//!
//! The worker is the only place allowed to touch the kill pin.

use crate::error::Error;
use crate::gesture::{Handoff, ShutdownHandoff};
use crate::power_logic::{KillSwitch, PowerController, ShutdownRequest};
use embassy_nrf::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use embedded_hal::digital::OutputPin;

/// Single slot: at most one shutdown is ever pending.
static SHUTDOWN_CHANNEL: Channel<CriticalSectionRawMutex, ShutdownRequest, 1> = Channel::new();

/// Sending half handed to the gesture controller.
pub type ShutdownSender = Sender<'static, CriticalSectionRawMutex, ShutdownRequest, 1>;

/// Receiving half owned by the shutdown worker.
pub type ShutdownReceiver = Receiver<'static, CriticalSectionRawMutex, ShutdownRequest, 1>;

pub fn shutdown_sender() -> ShutdownSender {
    SHUTDOWN_CHANNEL.sender()
}

pub fn shutdown_receiver() -> ShutdownReceiver {
    SHUTDOWN_CHANNEL.receiver()
}

impl ShutdownHandoff for ShutdownSender {
    fn submit(&mut self) -> Handoff {
        match self.try_send(ShutdownRequest) {
            Ok(()) => Handoff::Queued,
            Err(TrySendError::Full(_)) => Handoff::AlreadyPending,
        }
    }
}

/// Active-high kill output.
pub struct KillPin<P> {
    pin: P,
}

impl<P: OutputPin> KillPin<P> {
    /// The pin must already be configured as an output driven low.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> KillSwitch for KillPin<P> {
    fn assert_kill(&mut self) -> Result<(), Error> {
        self.pin.set_high().map_err(|_| Error::PowerKill)
    }
}

/// Blocking-safe worker context for the power-off write.
#[embassy_executor::task]
pub async fn shutdown_worker(
    mut power: PowerController<KillPin<Output<'static>>>,
    requests: ShutdownReceiver,
) -> ! {
    info!("Shutdown worker ready");
    loop {
        let request = requests.receive().await;
        power.run_deferred_shutdown(request);
    }
}

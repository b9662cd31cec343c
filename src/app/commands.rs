//! Inbound commands to the controller.
//!
//! These represent actions requested from outside the foreground cycle
//! (currently the boot-time serial debug console) that the
//! [`CoopController`](super::service::CoopController) interprets.

use crate::lift::LiftCommand;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Drive the lift by hand. Extend and Retract open a fresh hold window.
    ManualLift(LiftCommand),

    /// Leave manual control: stop the lift and hand back to the alarms.
    ResumeAutomatic,
}

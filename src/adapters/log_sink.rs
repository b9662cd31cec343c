//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART console in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { now, open_at, close_at } => {
                match now {
                    Some(t) => info!("START | online at {}", t),
                    None => info!("START | online, clock unreadable"),
                }
                info!(
                    "START | open={:02}:{:02} close={:02}:{:02}",
                    open_at.hour, open_at.minute, close_at.hour, close_at.minute
                );
            }
            AppEvent::AlarmFired(slot) => {
                info!("ALARM | {} fired", slot);
            }
            AppEvent::LiftCommanded(cmd) => {
                info!("LIFT  | {}", cmd);
            }
            AppEvent::HoldExpired => {
                info!("LIFT  | hold window elapsed");
            }
            AppEvent::UiStateChanged { from, to } => {
                info!("UI    | {:?} -> {:?}", from, to);
            }
            AppEvent::ClockSet(t) => {
                info!("CLOCK | set to {}", t);
            }
            AppEvent::AlarmScheduled { slot, time } => {
                info!("ALARM | {} scheduled {:02}:{:02}", slot, time.hour, time.minute);
            }
            AppEvent::PortFault(e) => {
                warn!("FAULT | {}", e);
            }
        }
    }
}

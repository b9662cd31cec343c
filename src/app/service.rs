//! Application service: the hexagonal core.
//!
//! [`CoopController`] owns the lift sequencer, the keypad menu and the alarm
//! cache. All I/O flows through port traits injected at call sites, so the
//! whole foreground cycle runs against mock adapters in tests.
//!
//! ```text
//!  AlarmSignal ──▶ ┌────────────────────────┐ ──▶ EventSink
//!   ClockPort ◀──▶ │     CoopController     │
//! StoragePort ◀──▶ │  Alarms · Lift · Menu  │ ──▶ LiftPort
//! DisplayPort ◀─── └────────────────────────┘
//! ```

use log::{info, warn};

use crate::alarm::monitor::check_alarm_status;
use crate::alarm::signal::AlarmSignal;
use crate::alarm::store::AlarmStore;
use crate::alarm::{AlarmEvent, AlarmSlot};
use crate::clock::ClockTime;
use crate::config::ControllerConfig;
use crate::error::Error;
use crate::lift::LiftCommand;
use crate::lift::sequencer::{LiftSequencer, LiftState};
use crate::tick::TickScheduler;
use crate::ui::gate::InputGate;
use crate::ui::screen::Screen;
use crate::ui::states::build_state_table;
use crate::ui::{Commit, Source, UiMachine, UiStateId};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ClockPort, DisplayPort, EventSink, LiftPort, StoragePort};

// ───────────────────────────────────────────────────────────────
// CoopController
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct CoopController {
    config: ControllerConfig,
    gate: InputGate,
    lift: LiftSequencer,
    ui: UiMachine,
    alarms: AlarmStore,
    /// Last screen pushed to the display; `None` forces a redraw.
    last_screen: Option<Screen>,
    cycle_count: u64,
}

impl CoopController {
    /// Construct the controller from configuration.
    ///
    /// Touches no hardware; call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            gate: InputGate::new(config.ui_hold_ticks()),
            lift: LiftSequencer::new(config.hold_ticks()),
            ui: UiMachine::new(build_state_table(), UiStateId::ViewTime),
            alarms: AlarmStore::new(),
            last_screen: None,
            cycle_count: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the board into a known state: restore alarms from storage,
    /// de-energise the relays and draw the first screen.
    pub fn start(
        &mut self,
        ticks: &TickScheduler,
        hw: &mut (impl ClockPort + StoragePort + DisplayPort + LiftPort),
        sink: &mut impl EventSink,
    ) {
        if let Err(e) = self.alarms.init(hw) {
            fault(sink, e);
        }

        self.lift.command(LiftCommand::Stop, ticks, hw);

        self.refresh(hw, sink);
        self.render(hw, sink);

        let now = hw.now().map_err(|e| fault(sink, e.into())).ok();
        let open_at = self.alarms.get(AlarmSlot::Open);
        let close_at = self.alarms.get(AlarmSlot::Close);
        sink.emit(&AppEvent::Started { now, open_at, close_at });
        info!("CoopController started in {:?}", self.ui.current_state());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one foreground cycle: alarm check → lift → menu → display.
    ///
    /// The `hw` parameter satisfies every foreground port at once, which
    /// avoids a double mutable borrow while keeping each boundary explicit.
    pub fn cycle(
        &mut self,
        ticks: &TickScheduler,
        line: &AlarmSignal,
        hw: &mut (impl ClockPort + StoragePort + DisplayPort + LiftPort),
        sink: &mut impl EventSink,
    ) {
        self.cycle_count += 1;

        // 1. Alarm status
        let event = check_alarm_status(line, hw);
        if let Some(slot) = event.slot() {
            sink.emit(&AppEvent::AlarmFired(slot));
        }

        // 2. Lift sequencing
        self.step_lift(event, ticks, hw, sink);

        // 3. Menu
        let button = self.gate.poll(ticks);
        self.refresh(hw, sink);
        let step = self.ui.handle(button);

        if let Some(commit) = step.commit {
            self.apply_commit(commit, hw, sink);
        }

        if step.changed() {
            sink.emit(&AppEvent::UiStateChanged {
                from: step.from,
                to: step.to,
            });
            self.refresh(hw, sink);
        }

        // 4. Display
        self.render(hw, sink);
    }

    /// Enforce the hold window without touching the menu or alarms.
    ///
    /// Used while the debug console has the foreground.
    pub fn service_hold(
        &mut self,
        ticks: &TickScheduler,
        lift: &mut impl LiftPort,
        sink: &mut impl EventSink,
    ) {
        self.step_lift(AlarmEvent::None, ticks, lift, sink);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (debug console).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        ticks: &TickScheduler,
        lift: &mut impl LiftPort,
        sink: &mut impl EventSink,
    ) {
        let command = match cmd {
            AppCommand::ManualLift(command) => {
                info!("Manual lift command: {}", command);
                command
            }
            AppCommand::ResumeAutomatic => {
                info!("Resuming automatic operation");
                LiftCommand::Stop
            }
        };
        self.lift.command(command, ticks, lift);
        sink.emit(&AppEvent::LiftCommanded(command));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn ui_state(&self) -> UiStateId {
        self.ui.current_state()
    }

    pub fn lift_state(&self) -> LiftState {
        self.lift.state()
    }

    pub fn alarm_time(&self, slot: AlarmSlot) -> ClockTime {
        self.alarms.get(slot)
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ── Internals ─────────────────────────────────────────────

    fn step_lift(
        &mut self,
        event: AlarmEvent,
        ticks: &TickScheduler,
        lift: &mut impl LiftPort,
        sink: &mut impl EventSink,
    ) {
        if let Some(command) = self.lift.update(event, ticks, lift) {
            if event == AlarmEvent::None {
                sink.emit(&AppEvent::HoldExpired);
            }
            sink.emit(&AppEvent::LiftCommanded(command));
        }
    }

    /// Reload the edit buffer from the current state's source.
    fn refresh(&mut self, clock: &mut impl ClockPort, sink: &mut impl EventSink) {
        match self.ui.source() {
            Source::LiveClock => match clock.now() {
                Ok(now) => self.ui.load(now),
                Err(e) => fault(sink, e.into()),
            },
            Source::Alarm(slot) => self.ui.load(self.alarms.get(slot)),
            Source::Keep => {}
        }
    }

    fn apply_commit(
        &mut self,
        commit: Commit,
        hw: &mut (impl ClockPort + StoragePort),
        sink: &mut impl EventSink,
    ) {
        let Commit { target, value } = commit;
        let result = match target.alarm_slot() {
            None => hw.set_time(&value).map_err(Error::from).map(|()| {
                info!("Clock set to {}", value);
                AppEvent::ClockSet(value)
            }),
            Some(slot) => self
                .alarms
                .set(slot, &value, hw)
                .map(|()| AppEvent::AlarmScheduled { slot, time: value }),
        };
        match result {
            Ok(event) => sink.emit(&event),
            Err(e) => fault(sink, e),
        }
    }

    fn render(&mut self, display: &mut impl DisplayPort, sink: &mut impl EventSink) {
        let screen = self.ui.screen();
        if self.last_screen.as_ref() == Some(&screen) {
            return;
        }
        match screen.draw(display) {
            Ok(()) => self.last_screen = Some(screen),
            Err(e) => {
                // Redraw from scratch next cycle.
                self.last_screen = None;
                fault(sink, e.into());
            }
        }
    }
}

fn fault(sink: &mut impl EventSink, e: Error) {
    warn!("Port fault: {}", e);
    sink.emit(&AppEvent::PortFault(e));
}

//! End-to-end foreground scenarios: alarm line → lift, keypad → menu →
//! RTC / store, all against [`MockHardware`].

use coopdoor::alarm::AlarmSlot;
use coopdoor::alarm::signal::AlarmSignal;
use coopdoor::app::commands::AppCommand;
use coopdoor::app::events::AppEvent;
use coopdoor::app::service::CoopController;
use coopdoor::buttons::ButtonId;
use coopdoor::clock::ClockTime;
use coopdoor::config::ControllerConfig;
use coopdoor::error::{ClockError, Error};
use coopdoor::lift::LiftCommand;
use coopdoor::lift::sequencer::LiftState;
use coopdoor::tick::TickScheduler;
use coopdoor::ui::UiStateId;

use crate::mock_hw::{HwCall, MockHardware, RecordingSink, run_ticks};

struct Rig {
    app: CoopController,
    hw: MockHardware,
    sink: RecordingSink,
    ticks: TickScheduler,
    line: AlarmSignal,
}

impl Rig {
    fn new() -> Self {
        Self::with_hw(MockHardware::new())
    }

    fn with_hw(mut hw: MockHardware) -> Self {
        let ticks = TickScheduler::new();
        let mut sink = RecordingSink::new();
        let mut app = CoopController::new(ControllerConfig::default());
        app.start(&ticks, &mut hw, &mut sink);
        Self {
            app,
            hw,
            sink,
            ticks,
            line: AlarmSignal::new(),
        }
    }

    fn cycle(&mut self) {
        self.app.cycle(&self.ticks, &self.line, &mut self.hw, &mut self.sink);
    }

    fn idle(&mut self, n: u32) {
        run_ticks(&self.ticks, n, ButtonId::None);
    }

    /// One idle cycle to arm the gate, a full gate window with `button`
    /// held, then the cycle that consumes it.
    fn press(&mut self, button: ButtonId) {
        self.cycle();
        let hold = self.app.config().ui_hold_ticks();
        run_ticks(&self.ticks, hold, button);
        self.cycle();
    }

    fn fire(&mut self, slot: AlarmSlot) {
        self.hw.flags[slot.index()] = true;
        self.line.raise();
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_puts_board_in_known_state() {
    let rig = Rig::new();

    assert_eq!(rig.hw.lift_commands(), vec![LiftCommand::Stop]);
    assert!(rig.hw.square_wave_off);
    assert_eq!(rig.hw.irq_enabled, [true, true]);
    assert_eq!(rig.hw.rows[0], "Clock");
    assert_eq!(rig.hw.rows[1], "05:30");
    assert!(!rig.hw.blink);
    assert!(rig.sink.contains(&AppEvent::Started {
        now: Some(ClockTime::new(2025, 3, 1, 5, 30, 0)),
        open_at: ClockTime::EPOCH,
        close_at: ClockTime::EPOCH,
    }));
}

#[test]
fn start_with_dead_clock_reports_no_boot_time() {
    let mut hw = MockHardware::new();
    hw.fail_clock = true;
    let rig = Rig::with_hw(hw);

    assert!(rig.sink.contains(&AppEvent::Started {
        now: None,
        open_at: ClockTime::EPOCH,
        close_at: ClockTime::EPOCH,
    }));
    assert!(
        rig.sink
            .contains(&AppEvent::PortFault(Error::Clock(ClockError::Bus)))
    );
    assert_eq!(rig.hw.lift_commands(), vec![LiftCommand::Stop]);
}

// ── Alarm → lift ──────────────────────────────────────────────

#[test]
fn open_alarm_extends_then_stops_after_hold() {
    let mut rig = Rig::new();
    let hold = rig.app.config().hold_ticks();

    rig.fire(AlarmSlot::Open);
    rig.cycle();

    assert_eq!(rig.hw.lift_commands().last(), Some(&LiftCommand::Extend));
    assert!(rig.ticks.hold_active());
    assert_eq!(rig.ticks.hold_elapsed(), 0);
    assert_eq!(rig.app.lift_state(), LiftState::Running(LiftCommand::Extend));
    assert!(rig.sink.contains(&AppEvent::AlarmFired(AlarmSlot::Open)));

    rig.idle(hold - 1);
    rig.cycle();
    assert_eq!(rig.hw.lift_commands().last(), Some(&LiftCommand::Extend));

    rig.idle(1);
    rig.cycle();
    assert_eq!(
        rig.hw.lift_commands(),
        vec![LiftCommand::Stop, LiftCommand::Extend, LiftCommand::Stop]
    );
    assert!(!rig.ticks.hold_active());
    assert!(rig.sink.contains(&AppEvent::HoldExpired));
    assert_eq!(rig.app.lift_state(), LiftState::Stopped);
}

#[test]
fn close_alarm_retracts() {
    let mut rig = Rig::new();
    rig.fire(AlarmSlot::Close);
    rig.cycle();
    assert_eq!(rig.hw.lift_commands().last(), Some(&LiftCommand::Retract));
}

#[test]
fn simultaneous_alarms_report_open_first_and_keep_close_pending() {
    let mut rig = Rig::new();
    rig.hw.flags = [true, true];
    rig.line.raise();
    rig.cycle();

    assert!(rig.sink.contains(&AppEvent::AlarmFired(AlarmSlot::Open)));
    assert!(!rig.sink.contains(&AppEvent::AlarmFired(AlarmSlot::Close)));
    assert_eq!(rig.hw.flags, [false, true]);

    // Close is only seen on the next edge.
    rig.cycle();
    assert!(!rig.sink.contains(&AppEvent::AlarmFired(AlarmSlot::Close)));
    rig.line.raise();
    rig.cycle();
    assert!(rig.sink.contains(&AppEvent::AlarmFired(AlarmSlot::Close)));
    assert_eq!(rig.hw.lift_commands().last(), Some(&LiftCommand::Retract));
}

#[test]
fn spurious_edge_does_nothing() {
    let mut rig = Rig::new();
    rig.hw.clear_calls();
    rig.line.raise();
    rig.cycle();
    assert!(rig.hw.lift_commands().is_empty());
    assert!(!rig.ticks.hold_active());
}

// ── Keypad menu ───────────────────────────────────────────────

#[test]
fn editing_the_clock_writes_it_exactly_once() {
    let mut rig = Rig::new();

    rig.press(ButtonId::Select);
    assert_eq!(rig.app.ui_state(), UiStateId::EditTimeHourTens);
    assert_eq!(rig.hw.rows[0], "Set clock");
    assert!(rig.hw.blink);
    assert_eq!(rig.hw.cursor, (0, 1));

    rig.press(ButtonId::Up);
    assert_eq!(rig.hw.rows[1], "15:30");

    for _ in 0..3 {
        rig.press(ButtonId::Right);
    }
    assert_eq!(rig.app.ui_state(), UiStateId::EditTimeMinuteOnes);
    assert_eq!(rig.hw.cursor, (4, 1));
    assert!(rig.hw.set_time_calls().is_empty());

    rig.press(ButtonId::Select);
    assert_eq!(rig.app.ui_state(), UiStateId::ViewTime);
    assert_eq!(
        rig.hw.set_time_calls(),
        vec![ClockTime::new(2025, 3, 1, 15, 30, 0)]
    );
    assert_eq!(rig.hw.rows[1], "15:30");

    // More cycles do not write again.
    for _ in 0..5 {
        rig.cycle();
    }
    assert_eq!(rig.hw.set_time_calls().len(), 1);
}

#[test]
fn left_from_first_digit_discards_edit() {
    let mut rig = Rig::new();
    rig.press(ButtonId::Select);
    rig.press(ButtonId::Up);
    rig.press(ButtonId::Left);
    assert_eq!(rig.app.ui_state(), UiStateId::ViewTime);
    assert_eq!(rig.hw.rows[1], "05:30");
    assert!(rig.hw.set_time_calls().is_empty());
}

#[test]
fn scheduling_open_alarm_survives_reboot() {
    let mut rig = Rig::new();

    rig.press(ButtonId::Right);
    assert_eq!(rig.app.ui_state(), UiStateId::ViewOpen);
    assert_eq!(rig.hw.rows[0], "Door opens:");
    assert_eq!(rig.hw.rows[1], "00:00");

    rig.press(ButtonId::Select);
    rig.press(ButtonId::Down); // 00 → 20
    rig.press(ButtonId::Right);
    rig.press(ButtonId::Down); // 20 → 23
    rig.press(ButtonId::Right);
    rig.press(ButtonId::Up); // :10
    rig.press(ButtonId::Right);
    rig.press(ButtonId::Select);

    assert_eq!(rig.app.ui_state(), UiStateId::ViewOpen);
    assert_eq!(rig.app.alarm_time(AlarmSlot::Open).hour, 23);
    assert_eq!(rig.app.alarm_time(AlarmSlot::Open).minute, 10);
    assert!(rig.hw.calls.contains(&HwCall::ArmAlarm {
        slot: AlarmSlot::Open,
        hour: 23,
        minute: 10,
        second: 0,
    }));
    assert!(rig.hw.calls.contains(&HwCall::WriteBytes { addr: 0, len: 7 }));
    assert_eq!(rig.hw.rows[1], "23:10");

    let rebooted = Rig::with_hw(MockHardware::with_mem(rig.hw.mem));
    let open = rebooted.app.alarm_time(AlarmSlot::Open);
    assert_eq!((open.hour, open.minute), (23, 10));
    assert!(rebooted.hw.calls.contains(&HwCall::ArmAlarm {
        slot: AlarmSlot::Open,
        hour: 23,
        minute: 10,
        second: 0,
    }));
}

#[test]
fn press_shorter_than_gate_window_is_not_consumed() {
    let mut rig = Rig::new();
    rig.cycle();
    let hold = rig.app.config().ui_hold_ticks();
    run_ticks(&rig.ticks, hold - 1, ButtonId::Select);
    rig.cycle();
    assert_eq!(rig.app.ui_state(), UiStateId::ViewTime);
}

#[test]
fn screen_is_not_redrawn_when_unchanged() {
    let mut rig = Rig::new();
    rig.hw.clear_calls();
    for _ in 0..10 {
        rig.cycle();
    }
    assert_eq!(rig.hw.redraws(), 0);

    rig.hw.now = ClockTime::new(2025, 3, 1, 5, 31, 0);
    rig.cycle();
    assert_eq!(rig.hw.redraws(), 1);
}

// ── Faults and manual control ─────────────────────────────────

#[test]
fn clock_fault_is_reported_and_cycle_continues() {
    let mut rig = Rig::new();
    rig.hw.fail_clock = true;
    rig.cycle();
    assert!(
        rig.sink
            .contains(&AppEvent::PortFault(Error::Clock(ClockError::Bus)))
    );
    assert_eq!(rig.app.cycle_count(), 1);

    rig.hw.fail_clock = false;
    rig.fire(AlarmSlot::Open);
    rig.cycle();
    assert_eq!(rig.hw.lift_commands().last(), Some(&LiftCommand::Extend));
}

#[test]
fn manual_commands_drive_lift_and_resume_stops_it() {
    let mut rig = Rig::new();
    let Rig { app, hw, sink, ticks, .. } = &mut rig;

    app.handle_command(AppCommand::ManualLift(LiftCommand::Retract), ticks, hw, sink);
    assert_eq!(app.lift_state(), LiftState::Running(LiftCommand::Retract));
    assert!(ticks.hold_active());

    app.handle_command(AppCommand::ResumeAutomatic, ticks, hw, sink);
    assert_eq!(app.lift_state(), LiftState::Stopped);
    assert_eq!(
        hw.lift_commands(),
        vec![LiftCommand::Stop, LiftCommand::Retract, LiftCommand::Stop]
    );
}

#[test]
fn manual_run_is_cut_off_by_hold_window() {
    let mut rig = Rig::new();
    let hold = rig.app.config().hold_ticks();
    rig.app.handle_command(
        AppCommand::ManualLift(LiftCommand::Extend),
        &rig.ticks,
        &mut rig.hw,
        &mut rig.sink,
    );
    rig.idle(hold);
    rig.app.service_hold(&rig.ticks, &mut rig.hw, &mut rig.sink);
    assert_eq!(rig.hw.lift_commands().last(), Some(&LiftCommand::Stop));
}

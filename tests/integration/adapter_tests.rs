//! Controller wired through [`HardwareAdapter`] with the host-side NVS image
//! as its byte store: alarm slots and the config record share one blob.

use coopdoor::adapters::hardware::HardwareAdapter;
use coopdoor::adapters::log_sink::LogEventSink;
use coopdoor::adapters::nvs::{CONFIG_ADDR, IMAGE_LEN, NvsByteStore};
use coopdoor::alarm::AlarmSlot;
use coopdoor::alarm::signal::AlarmSignal;
use coopdoor::alarm::store::{AlarmStore, SLOT_LEN, decode_slot, slot_addr};
use coopdoor::app::commands::AppCommand;
use coopdoor::app::ports::{ConfigError, ConfigPort};
use coopdoor::app::service::CoopController;
use coopdoor::buttons::ButtonId;
use coopdoor::clock::ClockTime;
use coopdoor::config::ControllerConfig;
use coopdoor::lift::LiftCommand;
use coopdoor::tick::TickScheduler;

use crate::mock_hw::{MockHardware, RecordingSink, run_ticks};

type Board = HardwareAdapter<MockHardware, NvsByteStore, MockHardware, MockHardware>;

fn board(image: [u8; IMAGE_LEN]) -> Board {
    HardwareAdapter::new(
        MockHardware::new(),
        NvsByteStore::with_image(image),
        MockHardware::new(),
        MockHardware::new(),
    )
}

fn slot_bytes(image: &[u8; IMAGE_LEN], slot: AlarmSlot) -> [u8; SLOT_LEN] {
    let at = slot_addr(slot) as usize;
    let mut raw = [0u8; SLOT_LEN];
    raw.copy_from_slice(&image[at..at + SLOT_LEN]);
    raw
}

#[test]
fn blank_image_has_no_config() {
    let mut hw = board([0; IMAGE_LEN]);
    assert_eq!(hw.storage.load(), Err(ConfigError::NotFound));
}

#[test]
fn alarm_commit_does_not_disturb_config_record() {
    let cfg = ControllerConfig {
        hold_duration_ms: 6000,
        ..ControllerConfig::default()
    };
    let mut hw = board([0; IMAGE_LEN]);
    hw.storage.save(&cfg).unwrap();

    let ticks = TickScheduler::new();
    let line = AlarmSignal::new();
    let mut sink = RecordingSink::new();
    let mut app = CoopController::new(cfg.clone());
    app.start(&ticks, &mut hw, &mut sink);

    // ViewTime → ViewClose → edit → 00:00 becomes 01:00 → commit.
    let hold = app.config().ui_hold_ticks();
    let mut press = |app: &mut CoopController, hw: &mut Board, b: ButtonId| {
        app.cycle(&ticks, &line, hw, &mut sink);
        run_ticks(&ticks, hold, b);
        app.cycle(&ticks, &line, hw, &mut sink);
    };
    press(&mut app, &mut hw, ButtonId::Left);
    press(&mut app, &mut hw, ButtonId::Select);
    press(&mut app, &mut hw, ButtonId::Right);
    press(&mut app, &mut hw, ButtonId::Up);
    press(&mut app, &mut hw, ButtonId::Right);
    press(&mut app, &mut hw, ButtonId::Right);
    press(&mut app, &mut hw, ButtonId::Select);

    let close = decode_slot(&slot_bytes(hw.storage.image(), AlarmSlot::Close));
    assert_eq!((close.hour, close.minute), (1, 0));
    assert_eq!(app.alarm_time(AlarmSlot::Close), close);
    assert!(hw.storage.image()[CONFIG_ADDR as usize] != 0);
    assert_eq!(hw.storage.load().unwrap(), cfg);
}

#[test]
fn config_and_alarms_survive_reboot_together() {
    let mut image = [0u8; IMAGE_LEN];
    let open = ClockTime::new(2025, 5, 1, 6, 15, 0);
    image[..SLOT_LEN].copy_from_slice(&coopdoor::alarm::store::encode_slot(&open));

    let mut first = NvsByteStore::with_image(image);
    first.save(&ControllerConfig::default()).unwrap();

    let mut hw = board(*first.image());
    let cfg = hw.storage.load().unwrap();
    let ticks = TickScheduler::new();
    let mut sink = RecordingSink::new();
    let mut app = CoopController::new(cfg);
    app.start(&ticks, &mut hw, &mut sink);

    assert_eq!(app.alarm_time(AlarmSlot::Open), open);
    assert_eq!(hw.lift.lift_commands(), vec![LiftCommand::Stop]);
    assert_eq!(hw.display.rows[0], "Clock");
}

#[test]
fn alarm_edited_on_erased_image_survives_reboot() {
    let mut hw = board([0xFF; IMAGE_LEN]);
    let mut store = AlarmStore::new();
    store.init(&mut hw).unwrap();
    let edited = store.get(AlarmSlot::Open).with_time_of_day(23, 10, 0);
    store.set(AlarmSlot::Open, &edited, &mut hw).unwrap();

    let mut rebooted = board(*hw.storage.image());
    let mut store = AlarmStore::new();
    store.init(&mut rebooted).unwrap();
    let open = store.get(AlarmSlot::Open);
    assert_eq!((open.hour, open.minute), (23, 10));
}

#[test]
fn log_sink_accepts_every_event_kind() {
    let ticks = TickScheduler::new();
    let line = AlarmSignal::new();
    let mut hw = board([0; IMAGE_LEN]);
    let mut sink = LogEventSink::new();
    let mut app = CoopController::new(ControllerConfig::default());

    app.start(&ticks, &mut hw, &mut sink);
    hw.clock.flags[0] = true;
    line.raise();
    app.cycle(&ticks, &line, &mut hw, &mut sink);
    app.handle_command(AppCommand::ResumeAutomatic, &ticks, &mut hw, &mut sink);

    assert_eq!(
        hw.lift.lift_commands(),
        vec![LiftCommand::Stop, LiftCommand::Extend, LiftCommand::Stop]
    );
}

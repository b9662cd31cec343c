//! Fuzz target: keypad menu state machine
//!
//! The first two bytes seed the edit buffer (deliberately unbounded), the
//! rest are button codes. The machine must never panic, and every Up/Down
//! must leave the edited field inside its range.
//!
//! cargo fuzz run fuzz_ui_machine

#![no_main]

use coopdoor::buttons::ButtonId;
use coopdoor::clock::ClockTime;
use coopdoor::ui::states::build_state_table;
use coopdoor::ui::{Digit, UiMachine, UiStateId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let [hour, minute, rest @ ..] = data else {
        return;
    };
    let mut ui = UiMachine::new(build_state_table(), UiStateId::ViewTime);
    ui.load(ClockTime::new(2025, 1, 1, *hour, *minute, 0));

    for &raw in rest {
        let before = ui.current_state();
        let button = ButtonId::from_raw(raw % 8);
        let step = ui.handle(button);
        if let (Some(digit), ButtonId::Up | ButtonId::Down) = (before.digit(), button) {
            match digit {
                Digit::HourTens | Digit::HourOnes => assert!(ui.buffer().hour < 24),
                Digit::MinuteTens | Digit::MinuteOnes => assert!(ui.buffer().minute < 60),
            }
        }
        if step.commit.is_some() {
            assert!(!ui.current_state().is_edit());
        }
        let _ = ui.screen();
    }
});

//! Boot-time serial debug console.
//!
//! After boot the operator gets a short window to send any byte over the
//! serial port. If they do, the controller stays in a manual menu until
//! `0` is received:
//!
//! ```text
//! 1  extend lift
//! 2  retract lift
//! 3  stop lift
//! 0  stop lift and continue to normal operation
//! ```
//!
//! The console only parses; the binary owns the UART and the controller.

use log::info;

use crate::app::commands::AppCommand;
use crate::lift::LiftCommand;

pub const MENU: &str = "Debug menu: 1 = extend, 2 = retract, 3 = stop, 0 = stop and continue";
pub const NOT_RECOGNIZED: &str = "Command not recognized";

/// What one received byte asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Run this command and keep the menu open.
    Command(AppCommand),
    /// Run this command and leave the menu.
    Exit(AppCommand),
    /// Line endings and other whitespace are skipped silently.
    Ignore,
    Unrecognized(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleMode {
    /// Counting down; any input opens the menu.
    #[default]
    Waiting,
    Menu,
    /// Window closed or menu left; normal operation.
    Done,
}

pub struct DebugConsole {
    mode: ConsoleMode,
    secs_left: u8,
}

impl DebugConsole {
    pub fn new(window_secs: u8) -> Self {
        let mode = if window_secs == 0 {
            ConsoleMode::Done
        } else {
            ConsoleMode::Waiting
        };
        Self {
            mode,
            secs_left: window_secs,
        }
    }

    pub fn mode(&self) -> ConsoleMode {
        self.mode
    }

    pub fn is_done(&self) -> bool {
        self.mode == ConsoleMode::Done
    }

    /// Announce one second of the countdown. Closes the window at zero.
    pub fn countdown(&mut self) {
        if self.mode != ConsoleMode::Waiting {
            return;
        }
        if self.secs_left == 0 {
            info!("Debug window closed");
            self.mode = ConsoleMode::Done;
            return;
        }
        info!("Send any key for debug mode... {}", self.secs_left);
        self.secs_left -= 1;
    }

    /// Feed one received byte.
    pub fn feed(&mut self, byte: u8) -> ConsoleAction {
        match self.mode {
            ConsoleMode::Done => ConsoleAction::Ignore,
            ConsoleMode::Waiting => {
                self.mode = ConsoleMode::Menu;
                info!("{}", MENU);
                ConsoleAction::Ignore
            }
            ConsoleMode::Menu => {
                let action = parse(byte);
                match action {
                    ConsoleAction::Exit(_) => {
                        info!("Leaving debug mode");
                        self.mode = ConsoleMode::Done;
                    }
                    ConsoleAction::Unrecognized(_) => info!("{}", NOT_RECOGNIZED),
                    ConsoleAction::Command(_) | ConsoleAction::Ignore => {}
                }
                action
            }
        }
    }
}

pub fn parse(byte: u8) -> ConsoleAction {
    match byte {
        b'1' => ConsoleAction::Command(AppCommand::ManualLift(LiftCommand::Extend)),
        b'2' => ConsoleAction::Command(AppCommand::ManualLift(LiftCommand::Retract)),
        b'3' => ConsoleAction::Command(AppCommand::ManualLift(LiftCommand::Stop)),
        b'0' => ConsoleAction::Exit(AppCommand::ResumeAutomatic),
        b if b.is_ascii_whitespace() => ConsoleAction::Ignore,
        other => ConsoleAction::Unrecognized(other),
    }
}

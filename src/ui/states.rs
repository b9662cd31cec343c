//! Concrete UI state handlers and the table that wires them up.

use super::{
    ButtonHandlerFn, Digit, EditTarget, Source, StateDescriptor, UiContext, UiStateId,
    UiTransition, edit,
};
use crate::alarm::AlarmSlot;
use crate::buttons::ButtonId;

/// Build the 15-row state table, indexed by `UiStateId as usize`.
pub fn build_state_table() -> [StateDescriptor; UiStateId::COUNT] {
    use UiStateId::*;

    let on_view = view_update as ButtonHandlerFn;
    let on_edit = edit_update as ButtonHandlerFn;

    [
        row(ViewTime, "ViewTime", "Clock", Source::LiveClock, on_view),
        row(EditTimeHourTens, "EditTimeHourTens", "Set clock", Source::Keep, on_edit),
        row(EditTimeHourOnes, "EditTimeHourOnes", "Set clock", Source::Keep, on_edit),
        row(EditTimeMinuteTens, "EditTimeMinuteTens", "Set clock", Source::Keep, on_edit),
        row(EditTimeMinuteOnes, "EditTimeMinuteOnes", "Set clock", Source::Keep, on_edit),
        row(ViewOpen, "ViewOpen", "Door opens:", Source::Alarm(AlarmSlot::Open), on_view),
        row(EditOpenHourTens, "EditOpenHourTens", "Set opening", Source::Keep, on_edit),
        row(EditOpenHourOnes, "EditOpenHourOnes", "Set opening", Source::Keep, on_edit),
        row(EditOpenMinuteTens, "EditOpenMinuteTens", "Set opening", Source::Keep, on_edit),
        row(EditOpenMinuteOnes, "EditOpenMinuteOnes", "Set opening", Source::Keep, on_edit),
        row(ViewClose, "ViewClose", "Door closes:", Source::Alarm(AlarmSlot::Close), on_view),
        row(EditCloseHourTens, "EditCloseHourTens", "Set closing", Source::Keep, on_edit),
        row(EditCloseHourOnes, "EditCloseHourOnes", "Set closing", Source::Keep, on_edit),
        row(EditCloseMinuteTens, "EditCloseMinuteTens", "Set closing", Source::Keep, on_edit),
        row(EditCloseMinuteOnes, "EditCloseMinuteOnes", "Set closing", Source::Keep, on_edit),
    ]
}

fn row(
    id: UiStateId,
    name: &'static str,
    title: &'static str,
    source: Source,
    on_button: ButtonHandlerFn,
) -> StateDescriptor {
    StateDescriptor {
        id,
        name,
        title,
        source,
        on_button,
    }
}

// ═══════════════════════════════════════════════════════════════
//  VIEW STATES: show the live value, rotate with Left/Right
// ═══════════════════════════════════════════════════════════════

fn view_update(ctx: &mut UiContext, button: ButtonId) -> UiTransition {
    let target = ctx.state.target();
    match button {
        ButtonId::Select => UiTransition::Goto(UiStateId::edit(target, Digit::HourTens)),
        ButtonId::Left => UiTransition::Goto(UiStateId::view(target.prev())),
        ButtonId::Right => UiTransition::Goto(UiStateId::view(target.next())),
        ButtonId::Up | ButtonId::Down | ButtonId::Reset | ButtonId::None => UiTransition::Stay,
    }
}

// ═══════════════════════════════════════════════════════════════
//  EDIT STATES: one digit each, commit from the last
// ═══════════════════════════════════════════════════════════════

fn edit_update(ctx: &mut UiContext, button: ButtonId) -> UiTransition {
    let target: EditTarget = ctx.state.target();
    let Some(digit) = ctx.state.digit() else {
        return UiTransition::Stay;
    };

    match button {
        ButtonId::Up => {
            edit::step(&mut ctx.buffer, digit, true);
            UiTransition::Stay
        }
        ButtonId::Down => {
            edit::step(&mut ctx.buffer, digit, false);
            UiTransition::Stay
        }
        // Leaving through the first digit abandons the edit.
        ButtonId::Left => match digit.prev() {
            Some(prev) => UiTransition::Goto(UiStateId::edit(target, prev)),
            None => UiTransition::Goto(UiStateId::view(target)),
        },
        ButtonId::Right => match digit.next() {
            Some(next) => UiTransition::Goto(UiStateId::edit(target, next)),
            None => UiTransition::Stay,
        },
        ButtonId::Select if digit == Digit::MinuteOnes => {
            UiTransition::Commit(UiStateId::view(target))
        }
        ButtonId::Select | ButtonId::Reset | ButtonId::None => UiTransition::Stay,
    }
}

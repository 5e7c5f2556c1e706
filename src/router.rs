//! Command routing - remote codes and push buttons to panel actions.
//!
//! Remote codes arrive from the IR completion context and only raise a
//! pending flag. The front-panel loop polls the buttons, drains the flags
//! and forwards the resulting actions in a fixed order.

use core::sync::atomic::{AtomicBool, Ordering};

use heapless::Vec;

use crate::ir::CommandCode;

/// Logical panel action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Ok,
    /// Remote-only: toggle mute from any screen.
    Mute,
}

impl Action {
    /// Dispatch order within one tick.
    pub const ORDER: [Action; 6] = [
        Action::Left,
        Action::Mute,
        Action::Ok,
        Action::Up,
        Action::Down,
        Action::Right,
    ];

    const fn slot(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
            Action::Ok => 4,
            Action::Mute => 5,
        }
    }
}

/// Snapshot of the five front-panel buttons (`true` = pressed).
///
/// Active-low wiring is resolved by whoever produces the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonStates {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub ok: bool,
}

impl ButtonStates {
    pub fn is_pressed(&self, action: Action) -> bool {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Ok => self.ok,
            Action::Mute => false,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down || self.ok
    }
}

/// Source of button snapshots.
pub trait ButtonInput {
    fn poll_states(&mut self) -> ButtonStates;
}

/// Static lookup from remote codes to actions.
#[derive(Clone, Copy, Debug)]
pub struct KeyMap<'a> {
    table: &'a [(u64, Action)],
}

impl<'a> KeyMap<'a> {
    pub const fn new(table: &'a [(u64, Action)]) -> Self {
        Self { table }
    }

    /// Action bound to `code`, if any. `None` and `Repeat` never match.
    pub fn lookup(&self, code: CommandCode) -> Option<Action> {
        let value = code.value()?;
        self.table
            .iter()
            .find(|(key, _)| *key == value)
            .map(|&(_, action)| action)
    }
}

/// Pending remote actions, one independent flag per action.
///
/// Raised from the IR callback, drained by the panel loop. Each flag's
/// read-then-clear is a single atomic swap. A separate activity flag is
/// raised for every recognised code, including codes with no action.
#[derive(Debug)]
pub struct PendingActions {
    flags: [AtomicBool; 6],
    activity: AtomicBool,
}

impl PendingActions {
    pub const fn new() -> Self {
        Self {
            flags: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
            activity: AtomicBool::new(false),
        }
    }

    pub fn raise(&self, action: Action) {
        self.flags[action.slot()].store(true, Ordering::Release);
    }

    /// Clear the flag and report whether it was set.
    pub fn take(&self, action: Action) -> bool {
        self.flags[action.slot()].swap(false, Ordering::AcqRel)
    }

    pub fn is_raised(&self, action: Action) -> bool {
        self.flags[action.slot()].load(Ordering::Acquire)
    }

    pub fn note_activity(&self) {
        self.activity.store(true, Ordering::Release);
    }

    /// Clear the activity flag and report whether it was set.
    pub fn take_activity(&self) -> bool {
        self.activity.swap(false, Ordering::AcqRel)
    }
}

impl Default for PendingActions {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges remote and button input into one action stream.
#[derive(Debug)]
pub struct CommandRouter<'a> {
    keymap: KeyMap<'a>,
    wake_codes: &'a [u64],
    pending: &'a PendingActions,
}

impl<'a> CommandRouter<'a> {
    pub const fn new(keymap: KeyMap<'a>, pending: &'a PendingActions) -> Self {
        Self {
            keymap,
            wake_codes: &[],
            pending,
        }
    }

    /// Codes that count as activity even though no action is bound to them.
    pub const fn with_wake_codes(mut self, wake_codes: &'a [u64]) -> Self {
        self.wake_codes = wake_codes;
        self
    }

    /// IR callback side: raise the flag for a recognised code.
    ///
    /// Returns the action raised, or `None` for unmapped codes.
    pub fn route_code(&self, code: CommandCode) -> Option<Action> {
        let action = self.keymap.lookup(code);
        match action {
            Some(action) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Remote: {} -> {}", code, action);
                self.pending.raise(action);
                self.pending.note_activity();
            }
            None => {
                let known = code
                    .value()
                    .is_some_and(|value| self.wake_codes.contains(&value));
                if known {
                    self.pending.note_activity();
                }
                #[cfg(feature = "defmt")]
                defmt::debug!("Remote: {} (no action, wake {=bool})", code, known);
            }
        }
        action
    }

    /// Panel loop side: whether any recognised remote code arrived since
    /// the last call.
    pub fn take_activity(&self) -> bool {
        self.pending.take_activity()
    }

    /// Panel loop side: every action active this tick, in dispatch order.
    ///
    /// Drains the remote flags it reports.
    pub fn collect(&self, buttons: ButtonStates) -> Vec<Action, 6> {
        let mut active = Vec::new();
        for action in Action::ORDER {
            // Always drain the remote flag, even when the button is also down.
            let remote = self.pending.take(action);
            if remote || buttons.is_pressed(action) {
                // Capacity equals the number of actions.
                let _ = active.push(action);
            }
        }
        active
    }
}

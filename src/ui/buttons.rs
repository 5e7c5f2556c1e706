//! GPIO button input.
//!
//! Five physical buttons (active-low with internal pull-up):
//!   - LEFT / RIGHT - leave the current screen, or pick a toggle value
//!   - UP / DOWN    - volume on INFO, cursor in menus, confirm on toggles
//!   - OK           - mute on INFO, enter / commit elsewhere
//!
//! The panel loop samples all five once per tick; the settle delay after a
//! routed action is applied by the loop.

use embassy_nrf::gpio::{AnyPin, Input, Pull};

use crate::router::{ButtonInput, ButtonStates};

pub struct PanelButtons<'d> {
    left: Input<'d>,
    right: Input<'d>,
    up: Input<'d>,
    down: Input<'d>,
    ok: Input<'d>,
}

impl PanelButtons<'static> {
    pub fn new(left: AnyPin, right: AnyPin, up: AnyPin, down: AnyPin, ok: AnyPin) -> Self {
        Self {
            left: Input::new(left, Pull::Up),
            right: Input::new(right, Pull::Up),
            up: Input::new(up, Pull::Up),
            down: Input::new(down, Pull::Up),
            ok: Input::new(ok, Pull::Up),
        }
    }
}

impl ButtonInput for PanelButtons<'_> {
    fn poll_states(&mut self) -> ButtonStates {
        ButtonStates {
            left: self.left.is_low(),
            right: self.right.is_low(),
            up: self.up.is_low(),
            down: self.down.is_low(),
            ok: self.ok.is_low(),
        }
    }
}

//! Front-panel controller for the DAC appliance.
//!
//! Decodes IR remote bursts, merges them with the five panel buttons and
//! drives the OLED menu. Everything in this library is plain logic over
//! the [`ui::Display`], [`mixer::Mixer`] and [`router::ButtonInput`]
//! capabilities, so it builds and tests on the host.
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary (`src/main.rs`, `--features embedded`) wires
//! these modules to the nRF52840 peripherals. The hardware-facing modules
//! (`ir::receiver`, `ui::display`, `ui::buttons`) only exist with that
//! feature.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod inactivity;
pub mod ir;
pub mod mixer;
pub mod panel;
pub mod router;
pub mod ui;

pub use error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::config::{
        REMOTE_KEY_TABLE, REMOTE_MUTE, REMOTE_OK, REMOTE_POWER, REMOTE_UP, REMOTE_WAKE_CODES,
    };
    use super::inactivity::{screen_should_be_on, InactivityTimer, PowerChange};
    use super::ir::CommandCode;
    use super::mixer::{level_to_db, volume_down, volume_up, VOLUME_MAX};
    use super::router::{Action, ButtonStates, CommandRouter, KeyMap, PendingActions};
    use super::ui::input_logic::{select_next, select_prev, MENU_ITEMS};

    // ════════════════════════════════════════════════════════════════════════
    // Command Routing Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn keymap_maps_remote_codes() {
        let keymap = KeyMap::new(&REMOTE_KEY_TABLE);
        assert_eq!(keymap.lookup(CommandCode::Code(REMOTE_OK)), Some(Action::Ok));
        assert_eq!(keymap.lookup(CommandCode::Code(REMOTE_UP)), Some(Action::Up));
        assert_eq!(keymap.lookup(CommandCode::Code(REMOTE_MUTE)), Some(Action::Mute));
    }

    #[test]
    fn keymap_ignores_sentinels_and_unmapped_codes() {
        let keymap = KeyMap::new(&REMOTE_KEY_TABLE);
        assert_eq!(keymap.lookup(CommandCode::None), None);
        assert_eq!(keymap.lookup(CommandCode::Repeat), None);
        assert_eq!(keymap.lookup(CommandCode::Code(REMOTE_POWER)), None);
        assert_eq!(keymap.lookup(CommandCode::Code(0)), None);
    }

    #[test]
    fn router_raises_and_drains_remote_flags() {
        let pending = PendingActions::new();
        let router = CommandRouter::new(KeyMap::new(&REMOTE_KEY_TABLE), &pending);

        assert_eq!(router.route_code(CommandCode::Code(REMOTE_OK)), Some(Action::Ok));
        assert!(pending.is_raised(Action::Ok));

        let actions = router.collect(ButtonStates::default());
        assert_eq!(actions.as_slice(), &[Action::Ok]);
        assert!(!pending.is_raised(Action::Ok));
        assert!(router.collect(ButtonStates::default()).is_empty());
    }

    #[test]
    fn router_merges_buttons_in_dispatch_order() {
        let pending = PendingActions::new();
        let router = CommandRouter::new(KeyMap::new(&REMOTE_KEY_TABLE), &pending);
        router.route_code(CommandCode::Code(REMOTE_MUTE));
        router.route_code(CommandCode::Code(REMOTE_UP));

        let buttons = ButtonStates {
            right: true,
            up: true,
            left: true,
            ..ButtonStates::default()
        };
        let actions = router.collect(buttons);
        assert_eq!(
            actions.as_slice(),
            &[Action::Left, Action::Mute, Action::Up, Action::Right]
        );
        // Button and remote on the same action still drain the flag.
        assert!(!pending.is_raised(Action::Up));
    }

    #[test]
    fn router_unmapped_code_raises_nothing() {
        let pending = PendingActions::new();
        let router = CommandRouter::new(KeyMap::new(&REMOTE_KEY_TABLE), &pending);
        assert_eq!(router.route_code(CommandCode::Repeat), None);
        assert_eq!(router.route_code(CommandCode::Code(REMOTE_POWER)), None);
        assert!(Action::ORDER.iter().all(|&a| !pending.is_raised(a)));
    }

    #[test]
    fn router_power_key_wakes_without_action() {
        let pending = PendingActions::new();
        let router = CommandRouter::new(KeyMap::new(&REMOTE_KEY_TABLE), &pending)
            .with_wake_codes(&REMOTE_WAKE_CODES);

        assert_eq!(router.route_code(CommandCode::Code(REMOTE_POWER)), None);
        assert!(Action::ORDER.iter().all(|&a| !pending.is_raised(a)));
        assert!(router.take_activity());
        assert!(!router.take_activity());

        router.route_code(CommandCode::Code(0x1234));
        router.route_code(CommandCode::Repeat);
        assert!(!router.take_activity());

        router.route_code(CommandCode::Code(REMOTE_UP));
        assert!(router.take_activity());
    }

    #[test]
    fn pending_take_is_read_then_clear() {
        let pending = PendingActions::new();
        pending.raise(Action::Down);
        assert!(pending.take(Action::Down));
        assert!(!pending.take(Action::Down));
        assert!(!pending.take(Action::Left));
    }

    #[test]
    fn button_states_any() {
        assert!(!ButtonStates::default().any());
        let ok = ButtonStates {
            ok: true,
            ..ButtonStates::default()
        };
        assert!(ok.any());
        assert!(ok.is_pressed(Action::Ok));
        assert!(!ok.is_pressed(Action::Mute));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Volume Step Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn volume_step_table() {
        assert_eq!(volume_up(230), 233);
        assert_eq!(volume_up(240), 241);
        assert_eq!(volume_up(209), 219);
        assert_eq!(volume_up(119), 149);
        assert_eq!(volume_up(0), 30);
        assert_eq!(volume_up(254), 255);

        assert_eq!(volume_down(233), 230);
        assert_eq!(volume_down(255), 254);
        assert_eq!(volume_down(210), 200);
        assert_eq!(volume_down(30), 0);
        assert_eq!(volume_down(10), 0);
    }

    #[test]
    fn volume_up_from_zero_stops_at_max() {
        let mut level = 0u8;
        for _ in 0..200 {
            let next = volume_up(level);
            assert!(next >= level);
            level = next;
        }
        assert_eq!(level, VOLUME_MAX);
        assert_eq!(volume_up(VOLUME_MAX), VOLUME_MAX);
    }

    #[test]
    fn volume_down_from_max_stops_at_zero() {
        let mut level = VOLUME_MAX;
        for _ in 0..200 {
            let next = volume_down(level);
            assert!(next <= level);
            level = next;
        }
        assert_eq!(level, 0);
        assert_eq!(volume_down(0), 0);
    }

    #[test]
    fn volume_level_to_db() {
        assert_eq!(level_to_db(255), 0.0);
        assert_eq!(level_to_db(0), -127.5);
        assert_eq!(level_to_db(235), -10.0);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Menu Cursor Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn ui_input_logic_selection_boundaries() {
        assert_eq!(select_prev(1), 1);
        assert_eq!(select_prev(0), 1);
        assert_eq!(select_prev(3), 2);
        assert_eq!(select_next(1, MENU_ITEMS), 2);
        assert_eq!(select_next(MENU_ITEMS, MENU_ITEMS), 1);
    }

    #[test]
    fn ui_cursor_never_leaves_range() {
        let mut cursor = 1;
        for step in 0..50u32 {
            cursor = if step % 3 == 0 {
                select_prev(cursor)
            } else {
                select_next(cursor, MENU_ITEMS)
            };
            assert!((1..=MENU_ITEMS).contains(&cursor));
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Screen Timeout Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn screen_power_policy_auto_off_enabled_after_timeout() {
        assert!(screen_should_be_on(true, 119, 120));
        assert!(!screen_should_be_on(true, 120, 120));
        assert!(!screen_should_be_on(true, 240, 120));
    }

    #[test]
    fn screen_power_policy_auto_off_disabled_stays_on() {
        assert!(screen_should_be_on(false, 120, 120));
        assert!(screen_should_be_on(false, 3600, 120));
    }

    #[test]
    fn inactivity_turns_off_exactly_once() {
        let mut timer = InactivityTimer::new(0, 30_000, true);
        assert_eq!(timer.deadline_ms(), 30_000);
        assert_eq!(timer.tick(29_999), None);
        assert_eq!(timer.tick(30_000), Some(PowerChange::Off));
        assert_eq!(timer.tick(30_020), None);
        assert_eq!(timer.tick(90_000), None);
        assert!(!timer.display_on());
    }

    #[test]
    fn inactivity_touch_resets_deadline_and_wakes() {
        let mut timer = InactivityTimer::new(0, 30_000, true);
        assert_eq!(timer.touch(20_000), None);
        assert_eq!(timer.tick(30_000), None);
        assert_eq!(timer.deadline_ms(), 50_000);

        assert_eq!(timer.tick(50_000), Some(PowerChange::Off));
        assert_eq!(timer.touch(60_000), Some(PowerChange::On));
        assert_eq!(timer.touch(60_100), None);
        assert!(timer.display_on());
        assert_eq!(timer.tick(89_999), None);
        assert_eq!(timer.tick(90_100), Some(PowerChange::Off));
    }

    #[test]
    fn inactivity_disabled_never_turns_off() {
        let mut timer = InactivityTimer::new(0, 1_000, false);
        assert_eq!(timer.tick(1_000_000), None);
        assert!(timer.display_on());
    }

    #[test]
    fn inactivity_restart_keeps_policy() {
        let mut timer = InactivityTimer::new(0, 1_000, true);
        assert_eq!(timer.tick(1_000), Some(PowerChange::Off));
        let mut timer = timer.restarted(5_000);
        assert!(timer.display_on());
        assert_eq!(timer.deadline_ms(), 6_000);
        assert_eq!(timer.tick(6_000), Some(PowerChange::Off));
    }
}

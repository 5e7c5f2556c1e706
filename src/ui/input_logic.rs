//! Menu cursor movement. Cursors are 1-based.

/// Number of entries in the top menu and in the filter sub-menu.
pub const MENU_ITEMS: u8 = 4;

/// Move selection cursor one item up, stopping at the first item.
pub fn select_prev(selected: u8) -> u8 {
    if selected > 1 {
        selected - 1
    } else {
        1
    }
}

/// Move selection cursor one item down, wrapping from the last to the first.
pub fn select_next(selected: u8, item_count: u8) -> u8 {
    if selected >= item_count {
        1
    } else {
        selected + 1
    }
}

//! Desktop input mapped to camera actions.
//!
//! The frame loop feeds raw key and mouse events into [`InputState`]; once per
//! frame [`InputState::drive`] turns the accumulated state into camera mutations.
//!
//! # Invariants
//! - Mouse motion only counts while the cursor is captured.
//! - Look deltas are relative and cleared after each frame.

pub mod action;
mod state;

pub use action::{Action, MoveKey};
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "flyview-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}

use std::collections::HashSet;

use flyview_camera::Camera;
use glam::Vec2;

use crate::action::{Action, MoveKey};

/// Per-frame input snapshot: held movement keys, pending look delta, capture flag.
#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<MoveKey>,
    look_delta: Vec2,
    captured: bool,
}

impl Default for InputState {
    /// Starts captured, matching a window that grabs the cursor on launch.
    fn default() -> Self {
        Self::new(true)
    }
}

impl InputState {
    pub fn new(captured: bool) -> Self {
        Self {
            held: HashSet::new(),
            look_delta: Vec2::ZERO,
            captured,
        }
    }

    /// Record a key press or release.
    pub fn set_key(&mut self, key: MoveKey, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Accumulate relative mouse motion. Ignored while the cursor is free.
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.captured {
            self.look_delta += Vec2::new(dx, dy);
        }
    }

    pub fn look_delta(&self) -> Vec2 {
        self.look_delta
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Flip capture and return the new state. Pending motion is dropped on release.
    pub fn toggle_capture(&mut self) -> bool {
        self.set_captured(!self.captured);
        self.captured
    }

    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
        if !captured {
            self.look_delta = Vec2::ZERO;
        }
        tracing::info!(captured, "mouse capture changed");
    }

    /// Drain this frame's actions: the look first, then one move per held key.
    pub fn take_actions(&mut self, speed: f32) -> Vec<Action> {
        let mut actions = Vec::with_capacity(MoveKey::ALL.len() + 1);
        if self.look_delta != Vec2::ZERO {
            actions.push(Action::Look(self.look_delta));
            self.look_delta = Vec2::ZERO;
        }
        actions.extend(
            MoveKey::ALL
                .into_iter()
                .filter(|key| self.held.contains(key))
                .map(|key| Action::Move(key, speed)),
        );
        actions
    }

    /// Apply this frame's actions to the camera.
    pub fn drive(&mut self, camera: &mut Camera, speed: f32) {
        for action in self.take_actions(speed) {
            action.apply(camera);
        }
    }
}

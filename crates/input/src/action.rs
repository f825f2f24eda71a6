use flyview_camera::Camera;
use glam::Vec2;

/// A movement key, independent of the physical layout that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [
        MoveKey::Forward,
        MoveKey::Backward,
        MoveKey::Left,
        MoveKey::Right,
    ];

    /// Map the WASD letters onto movement keys (case-insensitive).
    pub fn from_wasd(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(MoveKey::Forward),
            's' => Some(MoveKey::Backward),
            'a' => Some(MoveKey::Left),
            'd' => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// A camera action produced by the input layer.
///
/// The camera only ever sees actions, never raw window events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Translate the camera by `speed` along the key's world axis.
    Move(MoveKey, f32),
    /// Relative mouse motion in pixels.
    Look(Vec2),
}

impl Action {
    pub fn apply(&self, camera: &mut Camera) {
        match *self {
            Action::Move(MoveKey::Forward, speed) => camera.move_forward(speed),
            Action::Move(MoveKey::Backward, speed) => camera.move_backward(speed),
            Action::Move(MoveKey::Left, speed) => camera.move_left(speed),
            Action::Move(MoveKey::Right, speed) => camera.move_right(speed),
            Action::Look(delta) => camera.look(delta.x, delta.y),
        }
    }
}

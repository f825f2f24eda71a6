//! Free-fly camera for the flyview demo.
//!
//! The camera owns an eye position plus `facing` and `up` direction vectors and
//! produces a right-handed look-at view matrix for the render loop.
//!
//! # Invariants
//! - `look` only yaws around `up`; vertical mouse motion is ignored.
//! - Movement translates along world axes, not along `facing`.
//! - `facing` is renormalized after every `look`.

mod camera;

pub use camera::{Camera, CameraError, LOOK_SENSITIVITY};

pub fn crate_info() -> &'static str {
    "flyview-camera v0.1.0"
}

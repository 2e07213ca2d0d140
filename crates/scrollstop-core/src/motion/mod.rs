//! Motion primitives shared by every animation on the page
//!
//! Time is always passed in explicitly as a `Duration` measured from an
//! arbitrary host epoch, so the math runs the same under a frame callback,
//! a timer, or a simulated clock.
//!
//! - `easing` - Pure easing functions mapping [0, 1] to [0, 1]
//! - `timing` - Progress and interpolation helpers
//! - `tween` - A single eased value whose target may move between frames

pub mod easing;
pub mod timing;
pub mod tween;

pub use easing::EasingType;
pub use timing::{lerp, progress};
pub use tween::Tween;

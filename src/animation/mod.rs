//! Animation primitives shared by the wave sequencer and the category layout.
//!
//! - `easing`: cubic-bezier timing curves
//! - `tween`: single-value interpolation with one-shot or restart playback
//! - `clock`: speed-scaled animation time on top of the executor clock

pub mod clock;
pub mod easing;
pub mod tween;

pub use clock::AnimationClock;
pub use easing::Easing;
pub use tween::{Repeat, Tween};

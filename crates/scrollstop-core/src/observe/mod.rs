//! Viewport observers: one-shot reveals, count-up metrics, carousel gating

pub mod carousel;
pub mod counter;
pub mod intersection;
pub mod reveal;

pub use carousel::CarouselGate;
pub use counter::Counter;
pub use intersection::{intersection_ratio, Viewport};
pub use reveal::{Observation, RevealObserver};

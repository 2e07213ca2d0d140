//! Cross-origin embed plumbing
//!
//! - `trust` - Origin allow-list for incoming messages
//! - `message` - Height extraction from embed measure messages
//! - `registry` - Embedded frames and resize propagation to loop duplicates
//! - `overlay` - Tap/click capture over embeds that opens the original post

pub mod message;
pub mod overlay;
pub mod registry;
pub mod trust;

pub use message::parse_height;
pub use overlay::{post_url_for, TapOverlay};
pub use registry::{EmbedFrame, EmbedRegistry, FrameId, WindowId};
pub use trust::TrustPolicy;

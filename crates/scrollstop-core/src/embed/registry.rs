//! Embedded frames and their heights
//!
//! A carousel that loops seamlessly renders each embed twice. Only one copy
//! reports its size, so a resize is copied to every frame with the same
//! source URL.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::message::parse_height;
use super::trust::TrustPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameId(pub usize);

/// Handle of the window inside a frame, the sender identity of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedFrame {
    pub id: FrameId,
    pub window: WindowId,
    pub src: String,
    /// Explicit height once the embed has measured itself
    pub height: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct EmbedRegistry {
    policy: TrustPolicy,
    min_height: f64,
    frames: Vec<EmbedFrame>,
}

impl EmbedRegistry {
    pub fn new(policy: TrustPolicy, min_height: f64) -> Self {
        Self {
            policy,
            min_height,
            frames: Vec::new(),
        }
    }

    pub fn register(&mut self, window: WindowId, src: impl Into<String>) -> FrameId {
        let id = FrameId(self.frames.len());
        self.frames.push(EmbedFrame {
            id,
            window,
            src: src.into(),
            height: None,
        });
        id
    }

    pub fn frames(&self) -> &[EmbedFrame] {
        &self.frames
    }

    pub fn frame(&self, id: FrameId) -> Option<&EmbedFrame> {
        self.frames.get(id.0)
    }

    pub fn height(&self, id: FrameId) -> Option<f64> {
        self.frame(id).and_then(|f| f.height)
    }

    /// Handle a cross-document message; returns the frames that were resized
    ///
    /// Untrusted origins, malformed payloads, heights below the floor and
    /// unknown senders are dropped without error.
    pub fn handle_message(&mut self, origin: &str, source: WindowId, data: &Value) -> Vec<FrameId> {
        if !self.policy.is_trusted(origin) {
            debug!(origin, "Ignoring message from untrusted origin");
            return Vec::new();
        }
        let Some(height) = parse_height(data, self.min_height) else {
            debug!(origin, "Ignoring message without a usable height");
            return Vec::new();
        };

        let mut resized = Vec::new();
        let mut matched_src = String::new();
        for frame in self.frames.iter_mut().filter(|f| f.window == source) {
            frame.height = Some(height);
            matched_src = frame.src.clone();
            resized.push(frame.id);
        }

        if !matched_src.is_empty() {
            for frame in self
                .frames
                .iter_mut()
                .filter(|f| f.window != source && f.src == matched_src)
            {
                frame.height = Some(height);
                resized.push(frame.id);
            }
        }

        if !resized.is_empty() {
            debug!(height, frames = resized.len(), "Resized embeds");
        }
        resized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IG: &str = "https://www.instagram.com";
    const POST_A: &str = "https://www.instagram.com/p/AAA/embed/";
    const POST_B: &str = "https://www.instagram.com/p/BBB/embed/";

    fn registry() -> (EmbedRegistry, [FrameId; 4]) {
        let policy = TrustPolicy::new([IG]).unwrap();
        let mut registry = EmbedRegistry::new(policy, 100.0);
        let a = registry.register(WindowId(1), POST_A);
        let b = registry.register(WindowId(2), POST_B);
        let a_clone = registry.register(WindowId(3), POST_A);
        let b_clone = registry.register(WindowId(4), POST_B);
        (registry, [a, b, a_clone, b_clone])
    }

    #[test]
    fn test_resize_propagates_to_duplicates() {
        let (mut registry, [a, b, a_clone, b_clone]) = registry();
        let resized = registry.handle_message(IG, WindowId(1), &json!({"height": 500}));
        assert_eq!(resized, vec![a, a_clone]);
        assert_eq!(registry.height(a), Some(500.0));
        assert_eq!(registry.height(a_clone), Some(500.0));
        assert_eq!(registry.height(b), None);
        assert_eq!(registry.height(b_clone), None);
    }

    #[test]
    fn test_below_floor_no_resize() {
        let (mut registry, [a, ..]) = registry();
        assert!(registry
            .handle_message(IG, WindowId(1), &json!({"height": 50}))
            .is_empty());
        assert_eq!(registry.height(a), None);
    }

    #[test]
    fn test_untrusted_origin_ignored() {
        let (mut registry, [a, ..]) = registry();
        let resized = registry.handle_message(
            "https://www.instagram.com.evil.example",
            WindowId(1),
            &json!({"height": 500}),
        );
        assert!(resized.is_empty());
        assert_eq!(registry.height(a), None);
    }

    #[test]
    fn test_unknown_sender_ignored() {
        let (mut registry, _) = registry();
        assert!(registry
            .handle_message(IG, WindowId(99), &json!({"height": 500}))
            .is_empty());
        assert!(registry.frames().iter().all(|f| f.height.is_none()));
    }

    #[test]
    fn test_clone_can_report_for_original() {
        let (mut registry, [a, _, a_clone, _]) = registry();
        let resized =
            registry.handle_message(IG, WindowId(3), &json!({"details": {"height": 640}}));
        assert_eq!(resized, vec![a_clone, a]);
        assert_eq!(registry.height(a), Some(640.0));
    }
}

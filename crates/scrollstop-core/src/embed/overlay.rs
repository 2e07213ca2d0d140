//! Tap capture over cross-origin embeds
//!
//! The embed itself cannot take touch gestures reliably, so a transparent
//! overlay sits on top. A short tap or a click opens the original post.

use std::sync::OnceLock;

use regex::Regex;

fn embed_segment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/embed/?").expect("valid regex"))
}

/// Post URL for an embed: explicit `data-href`, else derived from an Instagram `src`
pub fn post_url_for(data_href: Option<&str>, src: &str) -> Option<String> {
    if let Some(href) = data_href.filter(|h| !h.is_empty()) {
        return Some(href.to_string());
    }
    if !src.contains("instagram.com") {
        return None;
    }
    let url = embed_segment().replace(src, "/");
    let url = match url.find('?') {
        Some(query) => &url[..query],
        None => &url[..],
    };
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct TapOverlay {
    post_url: Option<String>,
    slop: f64,
    tap_start: Option<f64>,
}

impl TapOverlay {
    pub fn new(post_url: Option<String>, slop: f64) -> Self {
        Self {
            post_url,
            slop,
            tap_start: None,
        }
    }

    pub fn post_url(&self) -> Option<&str> {
        self.post_url.as_deref()
    }

    /// Pointer cursor only when there is somewhere to go
    pub fn is_clickable(&self) -> bool {
        self.post_url.is_some()
    }

    pub fn touch_start(&mut self, y: f64) {
        self.tap_start = Some(y);
    }

    /// URL to open when the touch was a tap rather than a swipe
    pub fn touch_end(&mut self, y: f64) -> Option<&str> {
        let start = self.tap_start.take()?;
        if (start - y).abs() < self.slop {
            self.post_url.as_deref()
        } else {
            None
        }
    }

    pub fn click(&self) -> Option<&str> {
        self.post_url.as_deref()
    }
}

//! Count-up metrics
//!
//! A metric element carries its final value as a string (`data-count`).
//! Once it scrolls into view the displayed text counts up from zero with an
//! ease-out cubic curve. Whole-number targets display integers, anything
//! else displays one decimal.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::motion::{EasingType, Tween};

#[derive(Debug, Clone)]
pub struct Counter {
    raw: String,
    target: f64,
    decimal: bool,
    duration: Duration,
    tween: Option<Tween>,
}

/// Leading numeric prefix, the way attribute values like "42+" are read
fn number_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
    })
}

/// Parse the numeric prefix of an attribute value; `None` when there is none
pub fn parse_count(raw: &str) -> Option<f64> {
    let matched = number_prefix().find(raw)?;
    matched
        .as_str()
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl Counter {
    /// Build from a `data-count` value; elements without a number are ignored
    pub fn parse(raw: &str, duration: Duration) -> Option<Self> {
        let target = parse_count(raw)?;
        Some(Self {
            raw: raw.to_string(),
            target,
            decimal: target.fract() != 0.0,
            duration,
            tween: None,
        })
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_decimal(&self) -> bool {
        self.decimal
    }

    pub fn is_started(&self) -> bool {
        self.tween.is_some()
    }

    /// Begin counting at `now`; later calls keep the first start time
    pub fn start(&mut self, now: Duration) {
        if self.tween.is_none() {
            self.tween = Some(Tween::new(now, 0.0, self.duration, EasingType::Cubic));
        }
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.tween.is_some_and(|t| t.is_complete(now))
    }

    /// Current numeric value
    pub fn value(&self, now: Duration) -> f64 {
        match &self.tween {
            Some(tween) => tween.value(now, self.target),
            None => 0.0,
        }
    }

    /// Text to display at `now`
    pub fn text(&self, now: Duration) -> String {
        self.format(self.value(now))
    }

    /// Text shown when observation is unavailable: the attribute as written
    pub fn final_text(&self) -> &str {
        &self.raw
    }

    fn format(&self, value: f64) -> String {
        if self.decimal {
            format!("{:.1}", value)
        } else {
            format!("{}", value.round() as i64)
        }
    }
}

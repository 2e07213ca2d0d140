//! Scripted input replay
//!
//! A script is a JSON document of timed input events. Replaying it drives a
//! `PageHost` at a fixed frame rate with a simulated clock and records a
//! trace: one entry per applied event and per notable frame.
//!
//! ```json
//! {
//!   "events": [
//!     { "at_ms": 100, "type": "wheel", "delta_y": 120 },
//!     { "at_ms": 900, "type": "key", "key": "ArrowDown" },
//!     { "at_ms": 2000, "type": "click", "href": "game.html" }
//!   ]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::host::{PageEffect, PageHost, PageInput, Snapshot};
use crate::embed::WindowId;
use crate::motion::timing::frame_interval;
use crate::navigator::NavKey;
use crate::{Error, Result};

/// Time simulated after the last event when the script sets no duration
const DEFAULT_TAIL: Duration = Duration::from_millis(2000);

/// Highest replay frame rate
const MAX_FPS: u32 = 1000;

/// Longest simulated run, one hour
const MAX_DURATION_MS: u64 = 3_600_000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Frames per simulated second
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Total simulated time; defaults to the last event plus a tail
    #[serde(default)]
    pub duration_ms: Option<u64>,
    pub events: Vec<TimedEvent>,
}

fn default_fps() -> u32 {
    60
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: ScriptEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Wheel {
        delta_y: f64,
    },
    Key {
        key: String,
        #[serde(default)]
        in_text_input: bool,
    },
    TouchStart {
        y: f64,
    },
    TouchMove {
        y: f64,
    },
    TouchEnd {
        y: f64,
    },
    NextButton {
        section: usize,
    },
    Click {
        href: String,
    },
    Message {
        origin: String,
        source: u64,
        data: Value,
    },
    Resize {
        width: f64,
        height: f64,
    },
}

impl ScriptEvent {
    fn to_input(&self) -> Result<PageInput> {
        Ok(match self {
            ScriptEvent::Wheel { delta_y } => PageInput::Wheel { delta_y: *delta_y },
            ScriptEvent::Key { key, in_text_input } => PageInput::Key {
                key: NavKey::from_key_name(key)
                    .ok_or_else(|| Error::Script(format!("unknown key '{}'", key)))?,
                in_text_input: *in_text_input,
            },
            ScriptEvent::TouchStart { y } => PageInput::TouchStart { y: *y },
            ScriptEvent::TouchMove { y } => PageInput::TouchMove { y: *y },
            ScriptEvent::TouchEnd { y } => PageInput::TouchEnd { y: *y },
            ScriptEvent::NextButton { section } => PageInput::NextButton { section: *section },
            ScriptEvent::Click { href } => PageInput::Click { href: href.clone() },
            ScriptEvent::Message {
                origin,
                source,
                data,
            } => PageInput::Message {
                origin: origin.clone(),
                source: WindowId(*source),
                data: data.clone(),
            },
            ScriptEvent::Resize { width, height } => PageInput::Resize {
                width: *width,
                height: *height,
            },
        })
    }
}

/// Why a trace entry was recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceCause {
    Event { event: ScriptEvent },
    Settled { index: usize },
    Revealed { count: usize },
    OpenUrl { url: String },
    Navigate { href: String },
    /// The transition finished; `intro` is whether the destination saw the flag
    Arrived { destination: String, intro: bool },
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub cause: TraceCause,
    pub state: Snapshot,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut script: Script = serde_json::from_str(content)?;
        if script.fps == 0 || script.fps > MAX_FPS {
            return Err(Error::Script(format!(
                "fps must be between 1 and {}, got {}",
                MAX_FPS, script.fps
            )));
        }
        let last_event = script.events.iter().map(|e| e.at_ms).max().unwrap_or(0);
        let longest = script.duration_ms.unwrap_or(0).max(last_event);
        if longest > MAX_DURATION_MS {
            return Err(Error::Script(format!(
                "script runs to {}ms, the limit is {}ms",
                longest, MAX_DURATION_MS
            )));
        }
        // Stable sort keeps same-time events in file order
        script.events.sort_by_key(|e| e.at_ms);
        Ok(script)
    }

    fn end(&self) -> Duration {
        match self.duration_ms {
            Some(ms) => Duration::from_millis(ms),
            None => {
                let last = self.events.last().map(|e| e.at_ms).unwrap_or(0);
                Duration::from_millis(last) + DEFAULT_TAIL
            }
        }
    }

    /// Replay against `host` and return the trace
    pub fn run(&self, host: &mut PageHost) -> Result<Vec<TraceEntry>> {
        let step = frame_interval(self.fps);
        let end = self.end();
        let mut trace = Vec::new();
        let mut pending = self.events.iter().peekable();
        let mut now = Duration::ZERO;

        loop {
            while let Some(timed) = pending.next_if(|e| Duration::from_millis(e.at_ms) <= now) {
                let input = timed.event.to_input()?;
                let effect = host.handle(input, now);
                trace.push(entry(host, now, TraceCause::Event {
                    event: timed.event.clone(),
                }));
                match effect {
                    Some(PageEffect::OpenUrl(url)) => {
                        trace.push(entry(host, now, TraceCause::OpenUrl { url }))
                    }
                    Some(PageEffect::Navigate(href)) => {
                        trace.push(entry(host, now, TraceCause::Navigate { href }))
                    }
                    None => {}
                }
            }

            let report = host.frame(now);
            if let Some(index) = report.settled {
                trace.push(entry(host, now, TraceCause::Settled { index }));
            }
            if !report.revealed.is_empty() {
                trace.push(entry(host, now, TraceCause::Revealed {
                    count: report.revealed.len(),
                }));
            }
            if let Some(destination) = report.navigate {
                let intro = host.arrive(&destination);
                trace.push(entry(host, now, TraceCause::Arrived { destination, intro }));
            }

            if now >= end && pending.peek().is_none() {
                break;
            }
            now += step;
        }

        trace.push(entry(host, now, TraceCause::End));
        debug!(entries = trace.len(), "Script finished");
        Ok(trace)
    }
}

fn entry(host: &PageHost, now: Duration, cause: TraceCause) -> TraceEntry {
    TraceEntry {
        at_ms: now.as_millis() as u64,
        cause,
        state: host.snapshot(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::page::PageSpec;

    fn host() -> PageHost {
        let mut config = AppConfig::default();
        config.transition.seed = Some(1);
        config.transition.audio = false;
        PageHost::new(PageSpec::demo().unwrap(), config, 800.0, 600.0).unwrap()
    }

    fn settled(trace: &[TraceEntry]) -> Vec<usize> {
        trace
            .iter()
            .filter_map(|e| match e.cause {
                TraceCause::Settled { index } => Some(index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_events() {
        let script = Script::from_json(
            r#"{
                "events": [
                    {"at_ms": 500, "type": "key", "key": "ArrowDown"},
                    {"at_ms": 100, "type": "wheel", "delta_y": 120},
                    {"at_ms": 700, "type": "message", "origin": "https://www.instagram.com",
                     "source": 1, "data": {"height": 300}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.fps, 60);
        assert_eq!(script.events[0].at_ms, 100);
        assert_eq!(
            script.events[1].event,
            ScriptEvent::Key {
                key: "ArrowDown".into(),
                in_text_input: false
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_fps() {
        for fps in ["0", "1001", "4000000000"] {
            let json = format!(r#"{{"fps": {}, "events": []}}"#, fps);
            assert!(matches!(Script::from_json(&json), Err(Error::Script(_))), "fps {}", fps);
        }
        assert_eq!(Script::from_json(r#"{"fps": 1000, "events": []}"#).unwrap().fps, 1000);
    }

    #[test]
    fn test_rejects_runaway_timestamps() {
        let late_event = format!(
            r#"{{"events": [{{"at_ms": {}, "type": "wheel", "delta_y": 100}}]}}"#,
            u64::MAX
        );
        assert!(matches!(Script::from_json(&late_event), Err(Error::Script(_))));

        let long_run = r#"{"duration_ms": 3600001, "events": []}"#;
        assert!(matches!(Script::from_json(long_run), Err(Error::Script(_))));

        let hour = r#"{"duration_ms": 3600000, "events": []}"#;
        assert!(Script::from_json(hour).is_ok());
    }

    #[test]
    fn test_unknown_key_is_script_error() {
        let script = Script::from_json(
            r#"{"events": [{"at_ms": 0, "type": "key", "key": "Escape"}]}"#,
        )
        .unwrap();
        assert!(matches!(script.run(&mut host()), Err(Error::Script(_))));
    }

    #[test]
    fn test_wheel_burst_moves_one_section() {
        let script = Script::from_json(
            r#"{
                "duration_ms": 1500,
                "events": [
                    {"at_ms": 100, "type": "wheel", "delta_y": 100},
                    {"at_ms": 140, "type": "wheel", "delta_y": 100},
                    {"at_ms": 180, "type": "wheel", "delta_y": 100},
                    {"at_ms": 220, "type": "wheel", "delta_y": 100}
                ]
            }"#,
        )
        .unwrap();
        let trace = script.run(&mut host()).unwrap();
        assert_eq!(settled(&trace), vec![1]);
        let last = trace.last().unwrap();
        assert_eq!(last.cause, TraceCause::End);
        assert_eq!(last.state.current, 1);
        assert!(last.state.compact);
    }

    #[test]
    fn test_short_swipe_snaps_back() {
        let script = Script::from_json(
            r#"{
                "duration_ms": 1200,
                "events": [
                    {"at_ms": 100, "type": "touch_start", "y": 400},
                    {"at_ms": 120, "type": "touch_move", "y": 380},
                    {"at_ms": 140, "type": "touch_end", "y": 380}
                ]
            }"#,
        )
        .unwrap();
        let trace = script.run(&mut host()).unwrap();
        assert!(settled(&trace).is_empty());
        let last = trace.last().unwrap();
        assert_eq!(last.state.current, 0);
        assert!(!last.state.animating);
    }

    #[test]
    fn test_play_click_arrives_with_intro() {
        let script = Script::from_json(
            r#"{"events": [{"at_ms": 0, "type": "click", "href": "game.html"}]}"#,
        )
        .unwrap();
        let trace = script.run(&mut host()).unwrap();
        let arrived = trace
            .iter()
            .find(|e| matches!(e.cause, TraceCause::Arrived { .. }))
            .unwrap();
        assert_eq!(
            arrived.cause,
            TraceCause::Arrived {
                destination: "game.html".into(),
                intro: true
            }
        );
        assert_eq!(arrived.state.location, "/game.html");
        assert_eq!(arrived.state.transition_frame, None);
    }
}

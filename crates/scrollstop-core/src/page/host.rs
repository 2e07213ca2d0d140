//! One page with all of its behaviors wired together
//!
//! The host owns the navigator, header, observers, embeds and transition for
//! a page and feeds them from a single stream of `PageInput` events plus one
//! `frame(now)` call per animation frame. Front ends only translate their
//! own input into `PageInput` and draw what the host reports.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use super::spec::PageSpec;
use crate::config::AppConfig;
use crate::embed::{post_url_for, EmbedRegistry, FrameId, TapOverlay, TrustPolicy, WindowId};
use crate::layout::{Header, Rect, SectionLayout, StackedLayout};
use crate::motion::timing::frame_interval;
use crate::nav_links::{active_links, parallax_offset, Bounds};
use crate::navigator::{NavKey, SectionNavigator};
use crate::observe::{CarouselGate, Counter, Observation, RevealObserver, Viewport};
use crate::transition::{
    AudioSink, Canvas, MemorySession, NullSink, Scene, SessionStore, Step, TransitionController,
    FRAME_RATE,
};
use crate::Result;

/// Height of an embed that has not measured itself yet
pub const EMBED_DEFAULT_HEIGHT: f64 = 160.0;

/// Transition glyph cell size in page pixels
const CELL_WIDTH: f64 = 10.0;
const CELL_HEIGHT: f64 = 15.0;

/// Share of each section taken by its title
const TITLE_BAND: f64 = 0.18;
const LINE_HEIGHT: f64 = 32.0;
const GAP: f64 = 16.0;

/// Marquee speed in page pixels per second
const MARQUEE_SPEED: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub usize);

#[derive(Debug, Clone)]
pub enum ElementKind {
    Text(String),
    Reveal {
        text: String,
        revealed: bool,
    },
    Metric {
        label: String,
        raw: String,
        /// `None` when the value has no number to count to
        counter: Option<Counter>,
    },
    Embed {
        frame: FrameId,
        overlay: TapOverlay,
        /// Second copy that closes the marquee loop
        duplicate: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Element {
    pub section: usize,
    pub kind: ElementKind,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    pub section: usize,
    gate: CarouselGate,
    offset: f64,
}

impl Carousel {
    pub fn is_running(&self) -> bool {
        self.gate.is_running()
    }

    /// Marquee scroll offset in page pixels
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// Input the host understands
#[derive(Debug, Clone, PartialEq)]
pub enum PageInput {
    Wheel {
        delta_y: f64,
    },
    Key {
        key: NavKey,
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
    /// "Next" button inside a section
    NextButton {
        section: usize,
    },
    /// Link activation
    Click {
        href: String,
    },
    /// Cross-document message from an embed
    Message {
        origin: String,
        source: WindowId,
        data: serde_json::Value,
    },
    Resize {
        width: f64,
        height: f64,
    },
    /// Pointer position in viewport coordinates
    PointerMove {
        x: f64,
        y: f64,
    },
    EmbedTouchStart {
        element: ElementId,
        y: f64,
    },
    EmbedTouchEnd {
        element: ElementId,
        y: f64,
    },
    EmbedClick {
        element: ElementId,
    },
}

/// Something the front end has to do on the page's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    /// Open a URL in a new tab / the system browser
    OpenUrl(String),
    /// Leave the page
    Navigate(String),
}

/// What changed during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub settled: Option<usize>,
    pub revealed: Vec<ElementId>,
    pub counters_started: Vec<ElementId>,
    /// The transition finished and the page should leave for this destination
    pub navigate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub path: String,
    pub hash: String,
}

impl Location {
    pub fn href(&self) -> String {
        format!("{}{}", self.path, self.hash)
    }
}

/// Serializable view of the page state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub scroll_top: f64,
    pub current: usize,
    pub marker: usize,
    pub animating: bool,
    pub compact: bool,
    pub header_height: f64,
    pub revealed: usize,
    pub counters: Vec<String>,
    pub carousels_running: Vec<bool>,
    pub embed_heights: Vec<Option<f64>>,
    pub transition_frame: Option<u32>,
    pub location: String,
    pub active_links: Vec<usize>,
}

pub struct PageHost {
    spec: PageSpec,
    config: AppConfig,
    navigator: SectionNavigator,
    header: Header,
    width: f64,
    viewport_height: f64,
    elements: Vec<Element>,
    reveals: RevealObserver<ElementId>,
    counters: RevealObserver<ElementId>,
    carousels: Vec<Carousel>,
    embeds: EmbedRegistry,
    transition: TransitionController,
    session: MemorySession,
    audio: Box<dyn AudioSink + Send>,
    scene: Option<Scene>,
    location: Location,
    hero_offset: (f64, f64),
    last_frame: Option<Duration>,
    /// When the running transition was triggered
    transition_start: Option<Duration>,
}

impl PageHost {
    /// Build the page for a viewport of `width` by `height` page pixels
    pub fn new(spec: PageSpec, config: AppConfig, width: f64, height: f64) -> Result<Self> {
        let policy = TrustPolicy::new(&config.embed.trusted_origins)?;
        let mut embeds = EmbedRegistry::new(policy, config.embed.min_height_px);

        let supported = config.reveal.supported;
        let mut reveals = RevealObserver::new(
            config.reveal.threshold,
            config.reveal.bottom_margin_px,
            supported,
        );
        let mut counters = RevealObserver::new(config.counter.threshold, 0.0, supported);
        let counter_duration = Duration::from_millis(config.counter.duration_ms);

        let mut elements = Vec::new();
        let mut carousels = Vec::new();
        let mut next_window = 1u64;

        for (index, section) in spec.sections.iter().enumerate() {
            for line in &section.body {
                elements.push(Element {
                    section: index,
                    kind: ElementKind::Text(line.clone()),
                });
            }

            for line in &section.reveals {
                let id = ElementId(elements.len());
                let revealed = reveals.observe(id) == Observation::RevealedNow;
                elements.push(Element {
                    section: index,
                    kind: ElementKind::Reveal {
                        text: line.clone(),
                        revealed,
                    },
                });
            }

            for metric in &section.metrics {
                let id = ElementId(elements.len());
                let counter = Counter::parse(&metric.count, counter_duration);
                if counter.is_some() {
                    counters.observe(id);
                }
                elements.push(Element {
                    section: index,
                    kind: ElementKind::Metric {
                        label: metric.label.clone(),
                        raw: metric.count.clone(),
                        counter,
                    },
                });
            }

            let copies = if section.carousel { 2 } else { 1 };
            for copy in 0..copies {
                for embed in &section.embeds {
                    let frame = embeds.register(WindowId(next_window), embed.src.clone());
                    next_window += 1;
                    let post_url = post_url_for(embed.href.as_deref(), &embed.src);
                    elements.push(Element {
                        section: index,
                        kind: ElementKind::Embed {
                            frame,
                            overlay: TapOverlay::new(post_url, config.embed.tap_slop_px),
                            duplicate: copy > 0,
                        },
                    });
                }
            }

            if section.carousel {
                carousels.push(Carousel {
                    section: index,
                    gate: CarouselGate::new(config.carousel.threshold, supported),
                    offset: 0.0,
                });
            }
        }

        let header = Header::new(
            f64::from(config.ui.header_rows) * config.ui.px_per_row,
            f64::from(config.ui.compact_header_rows) * config.ui.px_per_row,
        );
        let location = Location {
            path: spec.path.clone(),
            hash: String::new(),
        };

        info!(
            title = %spec.title,
            sections = spec.sections.len(),
            elements = elements.len(),
            "Page loaded"
        );

        Ok(Self {
            navigator: SectionNavigator::new(config.navigator.clone()),
            transition: TransitionController::new(config.transition.clone()),
            spec,
            config,
            header,
            width,
            viewport_height: height,
            elements,
            reveals,
            counters,
            carousels,
            embeds,
            session: MemorySession::new(),
            audio: Box::new(NullSink),
            scene: None,
            location,
            hero_offset: (0.0, 0.0),
            last_frame: None,
            transition_start: None,
        })
    }

    /// Route transition audio to `sink` instead of discarding it
    pub fn with_audio_sink(mut self, sink: Box<dyn AudioSink + Send>) -> Self {
        self.audio = sink;
        self
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn navigator(&self) -> &SectionNavigator {
        &self.navigator
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn carousels(&self) -> &[Carousel] {
        &self.carousels
    }

    pub fn embeds(&self) -> &EmbedRegistry {
        &self.embeds
    }

    pub fn session(&self) -> &MemorySession {
        &self.session
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn hero_offset(&self) -> (f64, f64) {
        self.hero_offset
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.viewport_height)
    }

    /// Transition frame to draw, while one is running
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_running()
    }

    pub fn header_height(&self, now: Duration) -> f64 {
        self.header.height(now)
    }

    pub fn is_compact(&self) -> bool {
        self.header.is_compact()
    }

    /// Section geometry at `now`, following the header height
    pub fn layout(&self, now: Duration) -> StackedLayout {
        StackedLayout::new(
            self.header.height(now),
            self.viewport_height,
            self.spec.sections.len(),
        )
    }

    /// Whether the page needs frames at the animation rate
    pub fn is_animating(&self, now: Duration) -> bool {
        self.navigator.needs_update()
            || self.header.is_resizing(now)
            || self.transition.is_running()
            || self.carousels.iter().any(Carousel::is_running)
            || self.elements.iter().any(|e| match &e.kind {
                ElementKind::Metric {
                    counter: Some(counter),
                    ..
                } => counter.is_started() && !counter.is_complete(now),
                _ => false,
            })
    }

    /// Vertical extent of every element, indexed like `elements()`
    pub fn element_rects(&self, now: Duration) -> Vec<Rect> {
        let layout = self.layout(now);
        let mut rects = vec![Rect::new(0.0, 0.0); self.elements.len()];
        let mut cursor = 0.0;
        let mut section = usize::MAX;
        let mut band: Option<Rect> = None;

        for (i, element) in self.elements.iter().enumerate() {
            if element.section != section {
                section = element.section;
                cursor = layout.section_offset(section) + self.viewport_height * TITLE_BAND;
                band = None;
            }
            let carousel = self.spec.sections[section].carousel;

            let rect = match &element.kind {
                ElementKind::Embed { .. } if carousel => {
                    // Marquee tiles share one band as tall as the tallest embed
                    *band.get_or_insert_with(|| {
                        let height = self.carousel_band_height(section);
                        let rect = Rect::new(cursor, height);
                        cursor += height + GAP;
                        rect
                    })
                }
                ElementKind::Embed { frame, .. } => {
                    let height = self.embeds.height(*frame).unwrap_or(EMBED_DEFAULT_HEIGHT);
                    let rect = Rect::new(cursor, height);
                    cursor += height + GAP;
                    rect
                }
                _ => {
                    let rect = Rect::new(cursor, LINE_HEIGHT);
                    cursor += LINE_HEIGHT + GAP;
                    rect
                }
            };
            rects[i] = rect;
        }
        rects
    }

    fn carousel_band_height(&self, section: usize) -> f64 {
        self.elements
            .iter()
            .filter(|e| e.section == section)
            .filter_map(|e| match &e.kind {
                ElementKind::Embed { frame, .. } => {
                    Some(self.embeds.height(*frame).unwrap_or(EMBED_DEFAULT_HEIGHT))
                }
                _ => None,
            })
            .fold(0.0, f64::max)
    }

    /// Display text of an element at `now`
    pub fn element_text(&self, id: ElementId, now: Duration) -> String {
        let Some(element) = self.elements.get(id.0) else {
            return String::new();
        };
        match &element.kind {
            ElementKind::Text(text) => text.clone(),
            ElementKind::Reveal { text, .. } => text.clone(),
            ElementKind::Metric { raw, counter, .. } => match counter {
                Some(counter) if self.reveals.is_supported() => counter.text(now),
                Some(counter) => counter.final_text().to_string(),
                None => raw.clone(),
            },
            ElementKind::Embed { frame, .. } => self
                .embeds
                .frame(*frame)
                .map(|f| f.src.clone())
                .unwrap_or_default(),
        }
    }

    fn sync_header(&mut self, now: Duration) {
        self.header.set_compact(self.navigator.is_compact(), now);
    }

    /// Apply one input event
    pub fn handle(&mut self, input: PageInput, now: Duration) -> Option<PageEffect> {
        if self.transition.is_running() {
            // The overlay covers the page until navigation
            if !matches!(input, PageInput::Resize { .. } | PageInput::Message { .. }) {
                return None;
            }
        }

        let layout = self.layout(now);
        let effect = match input {
            PageInput::Wheel { delta_y } => {
                self.navigator.wheel(delta_y, now, &layout);
                None
            }
            PageInput::Key { key, in_text_input } => {
                self.navigator.key(key, in_text_input, now, &layout);
                None
            }
            PageInput::TouchStart { y } => {
                self.navigator.touch_start(y);
                None
            }
            PageInput::TouchMove { y } => {
                self.navigator.touch_move(y, &layout);
                None
            }
            PageInput::TouchEnd { y } => {
                self.navigator.touch_end(y, now, &layout);
                None
            }
            PageInput::NextButton { section } => {
                let has_button = self
                    .spec
                    .sections
                    .get(section)
                    .is_some_and(|s| s.next_button);
                if has_button {
                    self.navigator.next_button(section, now, &layout);
                }
                None
            }
            PageInput::Click { href } => self.click(&href, now, &layout),
            PageInput::Message {
                origin,
                source,
                data,
            } => {
                self.embeds.handle_message(&origin, source, &data);
                None
            }
            PageInput::Resize { width, height } => {
                self.width = width;
                self.viewport_height = height;
                let layout = self.layout(now);
                self.navigator.realign(&layout);
                debug!(width, height, "Viewport resized");
                None
            }
            PageInput::PointerMove { x, y } => {
                let hero = layout.section_rect(0);
                let top = hero.top - self.navigator.scroll_top();
                if y >= top && y < top + hero.height {
                    let bounds = Bounds {
                        left: 0.0,
                        top,
                        width: self.width,
                        height: hero.height,
                    };
                    self.hero_offset = parallax_offset((x, y), &bounds);
                }
                None
            }
            PageInput::EmbedTouchStart { element, y } => {
                if let Some(overlay) = self.overlay_mut(element) {
                    overlay.touch_start(y);
                }
                None
            }
            PageInput::EmbedTouchEnd { element, y } => self
                .overlay_mut(element)
                .and_then(|overlay| overlay.touch_end(y))
                .map(|url| PageEffect::OpenUrl(url.to_string())),
            PageInput::EmbedClick { element } => self
                .overlay_mut(element)
                .and_then(|overlay| overlay.click())
                .map(|url| PageEffect::OpenUrl(url.to_string())),
        };

        self.sync_header(now);
        effect
    }

    fn overlay_mut(&mut self, id: ElementId) -> Option<&mut TapOverlay> {
        match self.elements.get_mut(id.0).map(|e| &mut e.kind) {
            Some(ElementKind::Embed { overlay, .. }) => Some(overlay),
            _ => None,
        }
    }

    fn click(&mut self, href: &str, now: Duration, layout: &StackedLayout) -> Option<PageEffect> {
        if self.transition.intercepts(href) {
            let canvas = Canvas::new(self.width, self.viewport_height, CELL_WIDTH, CELL_HEIGHT);
            if self.transition.trigger(&canvas, self.audio.as_mut()) {
                self.transition_start = Some(now);
            }
            return None;
        }

        if let Some((page, fragment)) = href.split_once('#') {
            let same_page = page.is_empty() || self.location.path.ends_with(page);
            if same_page {
                if let Some(index) = self.spec.section_index(fragment) {
                    self.location.hash = format!("#{}", fragment);
                    self.navigator.go_to(index, now, layout);
                    return None;
                }
            }
        }

        Some(PageEffect::Navigate(href.to_string()))
    }

    /// Advance everything to `now`
    pub fn frame(&mut self, now: Duration) -> FrameReport {
        let mut report = FrameReport::default();
        let dt = self
            .last_frame
            .map(|last| now.saturating_sub(last))
            .unwrap_or_default();
        self.last_frame = Some(now);

        report.navigate = self.advance_transition(now);

        let layout = self.layout(now);
        let state = self.navigator.tick(now, &layout);
        report.settled = state.settled;
        self.navigator.sync_compact();
        self.sync_header(now);

        let scroll_top = self.navigator.scroll_top();
        let rects = self.element_rects(now);
        let rect_of = |id: &ElementId| rects.get(id.0).copied();

        report.revealed = self.reveals.scan(scroll_top, self.viewport_height, rect_of);
        for id in &report.revealed {
            if let Some(ElementKind::Reveal { revealed, .. }) =
                self.elements.get_mut(id.0).map(|e| &mut e.kind)
            {
                *revealed = true;
            }
        }

        report.counters_started = self.counters.scan(scroll_top, self.viewport_height, rect_of);
        for id in &report.counters_started {
            if let Some(ElementKind::Metric {
                counter: Some(counter),
                ..
            }) = self.elements.get_mut(id.0).map(|e| &mut e.kind)
            {
                counter.start(now);
            }
        }

        let viewport = Viewport::new(scroll_top, self.viewport_height);
        let layout = self.layout(now);
        for carousel in &mut self.carousels {
            carousel
                .gate
                .update(layout.section_rect(carousel.section), &viewport);
            if carousel.gate.is_running() {
                carousel.offset += MARQUEE_SPEED * dt.as_secs_f64();
            }
        }

        report
    }

    /// Run the transition up to the frame due at `now`
    ///
    /// Frames follow elapsed time at the nominal transition rate, so extra
    /// `frame` calls within one interval add nothing and a stalled caller
    /// catches up.
    fn advance_transition(&mut self, now: Duration) -> Option<String> {
        let start = self.transition_start?;
        let interval = frame_interval(FRAME_RATE as u32).as_nanos().max(1);
        let due = (now.saturating_sub(start).as_nanos() / interval).min(u128::from(u32::MAX)) as u32;

        while self.transition.active().is_some_and(|t| t.frame() < due) {
            match self.transition.tick(&mut self.session) {
                Some(Step::Frame(scene)) => self.scene = Some(scene),
                Some(Step::Navigate { destination }) => {
                    self.scene = None;
                    self.transition_start = None;
                    return Some(destination);
                }
                None => break,
            }
        }
        None
    }

    /// Arrive at `destination` after leaving; true when the intro flag was set
    pub fn arrive(&mut self, destination: &str) -> bool {
        let key = self.config.transition.session_key.clone();
        let intro = self.session.take(&key).is_some();
        self.location = Location {
            path: format!("/{}", destination.trim_start_matches('/')),
            hash: String::new(),
        };
        info!(destination, intro, "Arrived");
        intro
    }

    pub fn active_links(&self) -> Vec<usize> {
        let hrefs: Vec<&str> = self.spec.nav.iter().map(|l| l.href.as_str()).collect();
        active_links(&self.location.path, &self.location.hash, &hrefs)
    }

    pub fn snapshot(&self, now: Duration) -> Snapshot {
        let layout = self.layout(now);
        let counters = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e.kind, ElementKind::Metric { .. }))
            .map(|(i, _)| self.element_text(ElementId(i), now))
            .collect();
        let revealed = self
            .elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Reveal { revealed: true, .. }))
            .count();

        Snapshot {
            scroll_top: self.navigator.scroll_top(),
            current: self.navigator.current_index(&layout),
            marker: self.navigator.active_marker(&layout),
            animating: self.navigator.is_animating(),
            compact: self.header.is_compact(),
            header_height: self.header.height(now),
            revealed,
            counters,
            carousels_running: self.carousels.iter().map(Carousel::is_running).collect(),
            embed_heights: self.embeds.frames().iter().map(|f| f.height).collect(),
            transition_frame: self.transition.active().map(|t| t.frame()),
            location: self.location.href(),
            active_links: self.active_links(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn host() -> PageHost {
        let mut config = AppConfig::default();
        config.transition.seed = Some(3);
        config.transition.audio = false;
        PageHost::new(PageSpec::demo().unwrap(), config, 800.0, 600.0).unwrap()
    }

    /// Run frames every 16ms from `from` to `to`
    fn run(host: &mut PageHost, from: u64, to: u64) -> Vec<FrameReport> {
        (from..=to).step_by(16).map(|t| host.frame(ms(t))).collect()
    }

    #[test]
    fn test_wheel_moves_one_section_and_compacts_header() {
        let mut host = host();
        run(&mut host, 0, 100);
        host.handle(PageInput::Wheel { delta_y: 120.0 }, ms(100));
        // Momentum events inside the cooldown are absorbed
        host.handle(PageInput::Wheel { delta_y: 80.0 }, ms(150));
        host.handle(PageInput::Wheel { delta_y: 60.0 }, ms(200));
        assert!(host.is_compact());

        let reports = run(&mut host, 116, 1500);
        let settled: Vec<_> = reports.iter().filter_map(|r| r.settled).collect();
        assert_eq!(settled, vec![1]);

        let layout = host.layout(ms(1500));
        assert_eq!(host.navigator().scroll_top(), layout.section_offset(1));
        assert_eq!(host.header_height(ms(1500)), 16.0);
    }

    #[test]
    fn test_reveals_fire_once_when_visible() {
        let mut host = host();
        let first = host.frame(ms(0));
        // Home section reveals are on screen from the start
        assert_eq!(first.revealed.len(), 3);
        assert!(host.frame(ms(16)).revealed.is_empty());
        assert_eq!(host.snapshot(ms(16)).revealed, 3);
    }

    #[test]
    fn test_counters_start_when_section_arrives() {
        let mut host = host();
        run(&mut host, 0, 100);
        assert_eq!(host.snapshot(ms(100)).counters, vec!["0", "0.0", "0"]);

        host.handle(PageInput::NextButton { section: 0 }, ms(100));
        let reports = run(&mut host, 116, 3000);
        let started: usize = reports.iter().map(|r| r.counters_started.len()).sum();
        assert_eq!(started, 3);
        assert_eq!(host.snapshot(ms(3000)).counters, vec!["250", "7.5", "42"]);
    }

    #[test]
    fn test_unsupported_observation_shows_final_values() {
        let mut config = AppConfig::default();
        config.reveal.supported = false;
        let mut host = PageHost::new(PageSpec::demo().unwrap(), config, 800.0, 600.0).unwrap();
        let snapshot = host.snapshot(ms(0));
        assert_eq!(snapshot.counters, vec!["250", "7.5", "42+"]);
        // Every reveal is final right away, including off-screen ones
        assert_eq!(snapshot.revealed, 5);
        assert!(host.frame(ms(0)).revealed.is_empty());
        assert_eq!(host.snapshot(ms(0)).carousels_running, vec![true]);
    }

    #[test]
    fn test_carousel_runs_only_on_screen() {
        let mut host = host();
        run(&mut host, 0, 50);
        assert_eq!(host.snapshot(ms(50)).carousels_running, vec![false]);

        host.handle(PageInput::Click { href: "#work".into() }, ms(50));
        run(&mut host, 66, 1500);
        assert_eq!(host.snapshot(ms(1500)).carousels_running, vec![true]);
        assert!(host.carousels()[0].offset() > 0.0);
        assert_eq!(host.location().hash, "#work");
        assert_eq!(host.active_links(), vec![1]);
    }

    #[test]
    fn test_trusted_message_resizes_loop_duplicates() {
        let mut host = host();
        let first = host.embeds().frames()[0].clone();
        host.handle(
            PageInput::Message {
                origin: "https://www.instagram.com".into(),
                source: first.window,
                data: json!({"type": "MEASURE", "details": {"height": 540}}),
            },
            ms(0),
        );
        let twins: Vec<_> = host
            .embeds()
            .frames()
            .iter()
            .filter(|f| f.src == first.src)
            .collect();
        assert_eq!(twins.len(), 2);
        assert!(twins.iter().all(|f| f.height == Some(540.0)));

        host.handle(
            PageInput::Message {
                origin: "https://evil.example".into(),
                source: first.window,
                data: json!({"height": 900}),
            },
            ms(0),
        );
        assert_eq!(host.embeds().frames()[0].height, Some(540.0));
    }

    #[test]
    fn test_embed_tap_opens_post() {
        let mut host = host();
        let (id, _) = host
            .elements()
            .iter()
            .enumerate()
            .find(|(_, e)| matches!(e.kind, ElementKind::Embed { .. }))
            .unwrap();
        let id = ElementId(id);

        host.handle(PageInput::EmbedTouchStart { element: id, y: 100.0 }, ms(0));
        let effect = host.handle(PageInput::EmbedTouchEnd { element: id, y: 104.0 }, ms(10));
        assert_eq!(
            effect,
            Some(PageEffect::OpenUrl("https://www.instagram.com/p/C1a2b3c/".into()))
        );

        host.handle(PageInput::EmbedTouchStart { element: id, y: 100.0 }, ms(20));
        assert_eq!(
            host.handle(PageInput::EmbedTouchEnd { element: id, y: 160.0 }, ms(30)),
            None
        );
    }

    #[test]
    fn test_play_link_runs_transition_then_navigates() {
        let mut host = host();
        host.frame(ms(0));
        assert_eq!(
            host.handle(PageInput::Click { href: "game.html".into() }, ms(0)),
            None
        );
        assert!(host.is_transitioning());

        // Navigation input is dropped under the overlay
        host.handle(PageInput::Wheel { delta_y: 100.0 }, ms(5));
        assert!(!host.navigator().is_animating());

        let interval = frame_interval(FRAME_RATE as u32);
        let mut navigate = None;
        for frame in 1..=90u64 {
            let report = host.frame(interval * frame as u32);
            if report.navigate.is_some() {
                navigate = report.navigate.map(|d| (frame, d));
                break;
            }
            assert!(host.scene().is_some());
        }
        assert_eq!(navigate, Some((86, "game.html".to_string())));
        assert!(host.arrive("game.html"));
        assert!(!host.arrive("game.html"));
        assert_eq!(host.location().path, "/game.html");
    }

    #[test]
    fn test_transition_follows_elapsed_time() {
        let mut host = host();
        host.handle(PageInput::Click { href: "game.html".into() }, ms(0));

        // Repeated frames at one instant never run the transition forward
        for _ in 0..200 {
            assert_eq!(host.frame(ms(0)).navigate, None);
        }
        assert_eq!(host.snapshot(ms(0)).transition_frame, Some(0));

        let interval = frame_interval(FRAME_RATE as u32);
        for _ in 0..50 {
            host.frame(interval * 3);
        }
        assert_eq!(host.snapshot(interval * 3).transition_frame, Some(3));

        // A late frame catches up to the navigation frame in one call
        let report = host.frame(Duration::from_secs(5));
        assert_eq!(report.navigate.as_deref(), Some("game.html"));
        assert!(!host.is_transitioning());
    }

    #[test]
    fn test_other_links_navigate_away() {
        let mut host = host();
        assert_eq!(
            host.handle(PageInput::Click { href: "who-me.html".into() }, ms(0)),
            Some(PageEffect::Navigate("who-me.html".into()))
        );
        assert_eq!(
            host.handle(PageInput::Click { href: "#nope".into() }, ms(0)),
            Some(PageEffect::Navigate("#nope".into()))
        );
    }

    #[test]
    fn test_pointer_over_hero_sets_parallax() {
        let mut host = host();
        host.frame(ms(0));
        let top = host.layout(ms(0)).section_offset(0);
        host.handle(PageInput::PointerMove { x: 800.0, y: top }, ms(0));
        let (x, y) = host.hero_offset();
        assert_eq!(x, 10.0);
        assert_eq!(y, -10.0);
    }
}

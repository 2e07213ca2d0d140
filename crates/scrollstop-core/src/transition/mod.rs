//! Full-screen break-apart transition played before leaving for the game page
//!
//! Driven by a frame counter against fixed thresholds: background glyphs
//! gather from the edges inward, the title fades in with a pulse, then
//! everything flies out from the center behind a short flash. Navigation
//! always happens at `nav_frame`, whatever the audio did.

pub mod audio;
pub mod particles;
pub mod session;

pub use audio::{play_best_effort, AudioSink, NullSink, WarpScore};
pub use particles::{Canvas, Particle, ParticleField, Tint};
pub use session::{MemorySession, SessionStore};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::TransitionConfig;

/// Nominal frame rate the thresholds are tuned for
pub const FRAME_RATE: f64 = 60.0;

const BACKGROUND_ALPHA: f64 = 0.28;
const FLICKER_ABOVE: f64 = 0.82;
const FADE_IN_FRAMES: f64 = 5.0;
const FADE_OUT_FRAMES: f64 = 30.0;
const FLASH_FRAMES: f64 = 4.0;
const FLASH_ALPHA: f64 = 0.22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Background glyphs fading in
    Gather,
    /// Title visible and pulsing
    Title,
    /// Particles flying outward
    Break,
}

/// One glyph to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    pub glyph: char,
    pub alpha: f64,
    pub tint: Tint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub frame: u32,
    pub phase: Phase,
    pub sprites: Vec<Sprite>,
    /// Opacity of the full-screen gold flash, if any
    pub flash: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Frame(Scene),
    Navigate { destination: String },
}

/// A single run of the transition
pub struct Transition {
    config: TransitionConfig,
    field: ParticleField,
    frame: u32,
    rng: StdRng,
}

impl Transition {
    pub fn new(config: TransitionConfig, canvas: &Canvas, mut rng: StdRng) -> Self {
        let field = ParticleField::generate(canvas, &config.title_art, config.density, &mut rng);
        Self {
            config,
            field,
            frame: 0,
            rng,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    fn phase_at(&self, frame: u32) -> Phase {
        if frame >= self.config.break_frame {
            Phase::Break
        } else if frame >= self.config.title_start {
            Phase::Title
        } else {
            Phase::Gather
        }
    }

    /// Advance one frame
    ///
    /// Once the navigation frame is reached the session flag is written and
    /// `Step::Navigate` is returned instead of a scene.
    pub fn tick(&mut self, session: &mut dyn SessionStore) -> Step {
        self.frame += 1;
        let frame = self.frame;

        if frame >= self.config.nav_frame {
            session.set(&self.config.session_key, "1");
            info!(destination = %self.config.destination, "Transition complete");
            return Step::Navigate {
                destination: self.config.destination.clone(),
            };
        }

        let phase = self.phase_at(frame);
        let f = frame as f64;
        let mut sprites = Vec::with_capacity(self.field.len());
        let mut flash = None;

        if phase == Phase::Break {
            let bf = f - self.config.break_frame as f64;
            let fade = (1.0 - bf / FADE_OUT_FRAMES).max(0.0);

            for p in &self.field.background {
                sprites.push(exploded_sprite(p, bf, fade * BACKGROUND_ALPHA));
            }
            for p in &self.field.title {
                sprites.push(exploded_sprite(p, bf, fade));
            }
            if bf <= FLASH_FRAMES {
                flash = Some(FLASH_ALPHA * (1.0 - bf / FLASH_FRAMES));
            }
        } else {
            for p in &mut self.field.background {
                let appear = ((f - p.appear_at) / FADE_IN_FRAMES).clamp(0.0, 1.0);
                if appear <= 0.0 {
                    continue;
                }
                if self.rng.gen::<f64>() > FLICKER_ABOVE {
                    p.glyph = particles::random_glyph(&mut self.rng);
                }
                sprites.push(Sprite {
                    x: p.x,
                    y: p.y,
                    glyph: p.glyph,
                    alpha: appear * BACKGROUND_ALPHA,
                    tint: p.tint,
                });
            }

            if phase == Phase::Title {
                let alpha = title_alpha(&self.config, f);
                if alpha > 0.0 {
                    sprites.extend(self.field.title.iter().map(|p| Sprite {
                        x: p.x,
                        y: p.y,
                        glyph: p.glyph,
                        alpha,
                        tint: p.tint,
                    }));
                }
            }
        }

        Step::Frame(Scene {
            frame,
            phase,
            sprites,
            flash,
        })
    }
}

fn exploded_sprite(p: &Particle, frames_since_break: f64, alpha: f64) -> Sprite {
    let (x, y) = p.exploded(frames_since_break);
    Sprite {
        x,
        y,
        glyph: p.glyph,
        alpha,
        tint: p.tint,
    }
}

/// Title opacity: linear fade-in between `title_start` and `title_full`, times a pulse
fn title_alpha(config: &TransitionConfig, frame: f64) -> f64 {
    let start = config.title_start as f64;
    let span = (config.title_full as f64 - start).max(1.0);
    let fade_in = ((frame - start) / span).clamp(0.0, 1.0);
    let pulse = 0.7 + 0.3 * (frame * 0.18).sin();
    fade_in * pulse
}

/// Intercepts clicks on the trigger link and owns the running transition
pub struct TransitionController {
    config: TransitionConfig,
    active: Option<Transition>,
}

impl TransitionController {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Whether a click on `href` should start the transition instead of navigating
    pub fn intercepts(&self, href: &str) -> bool {
        href == self.config.trigger_href
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref()
    }

    /// Start the transition over `canvas`; no-op while one is already running
    pub fn trigger(&mut self, canvas: &Canvas, sink: &mut dyn AudioSink) -> bool {
        if self.active.is_some() {
            debug!("Transition already running, ignoring trigger");
            return false;
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        if self.config.audio {
            let score = WarpScore::departure(
                self.config.break_frame as f64 / FRAME_RATE,
                self.config.nav_frame as f64 / FRAME_RATE,
            );
            play_best_effort(&score, sink, self.config.sample_rate, &mut rng);
        }

        let transition = Transition::new(self.config.clone(), canvas, rng);
        info!(particles = transition.field().len(), "Transition started");
        self.active = Some(transition);
        true
    }

    /// Advance the running transition, if any
    pub fn tick(&mut self, session: &mut dyn SessionStore) -> Option<Step> {
        let step = self.active.as_mut()?.tick(session);
        if matches!(step, Step::Navigate { .. }) {
            self.active = None;
        }
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result};

    struct BrokenSink;

    impl AudioSink for BrokenSink {
        fn play(&mut self, _samples: &[f32], _sample_rate: u32) -> Result<()> {
            Err(Error::Audio("unsupported".to_string()))
        }
    }

    fn test_config() -> TransitionConfig {
        TransitionConfig {
            seed: Some(7),
            sample_rate: 4_000,
            ..TransitionConfig::default()
        }
    }

    fn canvas() -> Canvas {
        Canvas::new(400.0, 200.0, 10.0, 15.0)
    }

    fn scene(step: Option<Step>) -> Scene {
        match step {
            Some(Step::Frame(scene)) => scene,
            other => panic!("expected a frame, got {:?}", other),
        }
    }

    #[test]
    fn test_intercepts_only_trigger_href() {
        let controller = TransitionController::new(test_config());
        assert!(controller.intercepts("game.html"));
        assert!(!controller.intercepts("who-me.html"));
        assert!(!controller.intercepts("#about"));
    }

    #[test]
    fn test_retrigger_is_noop() {
        let mut controller = TransitionController::new(test_config());
        assert!(controller.trigger(&canvas(), &mut NullSink));
        assert!(!controller.trigger(&canvas(), &mut NullSink));
        assert!(controller.is_running());
    }

    #[test]
    fn test_navigates_at_nav_frame_despite_audio_failure() {
        let mut controller = TransitionController::new(test_config());
        let mut session = MemorySession::new();
        assert!(controller.trigger(&canvas(), &mut BrokenSink));

        for frame in 1..86 {
            let s = scene(controller.tick(&mut session));
            assert_eq!(s.frame, frame);
        }
        assert_eq!(session.get("aq-play-intro"), None);

        match controller.tick(&mut session) {
            Some(Step::Navigate { destination }) => assert_eq!(destination, "game.html"),
            other => panic!("expected navigation, got {:?}", other),
        }
        assert_eq!(session.get("aq-play-intro").as_deref(), Some("1"));
        assert!(!controller.is_running());
        assert!(controller.tick(&mut session).is_none());
    }

    #[test]
    fn test_phase_progression_and_flash() {
        let mut controller = TransitionController::new(test_config());
        let mut session = MemorySession::new();
        controller.trigger(&canvas(), &mut NullSink);

        let mut scenes = Vec::new();
        for _ in 0..50 {
            scenes.push(scene(controller.tick(&mut session)));
        }
        // scenes[i] is frame i + 1
        assert_eq!(scenes[0].phase, Phase::Gather);
        assert_eq!(scenes[18].phase, Phase::Gather);
        assert_eq!(scenes[19].phase, Phase::Title);
        assert_eq!(scenes[40].phase, Phase::Title);
        assert_eq!(scenes[41].phase, Phase::Break);

        assert!(scenes[40].flash.is_none());
        assert_eq!(scenes[41].flash, Some(0.22));
        assert!((scenes[43].flash.unwrap() - 0.11).abs() < 1e-9);
        assert_eq!(scenes[45].flash, Some(0.0));
        assert!(scenes[46].flash.is_none());
    }

    #[test]
    fn test_background_fades_in_from_edges() {
        let mut controller = TransitionController::new(test_config());
        let mut session = MemorySession::new();
        controller.trigger(&canvas(), &mut NullSink);

        let first = scene(controller.tick(&mut session));
        // Nothing has appear_at below zero, so frame 1 only shows early edge cells
        assert!(first
            .sprites
            .iter()
            .all(|s| s.alpha > 0.0 && s.alpha <= BACKGROUND_ALPHA));

        let mut last = first;
        for _ in 1..19 {
            last = scene(controller.tick(&mut session));
        }
        let total = controller.active().unwrap().field().background.len();
        assert!(last.sprites.len() <= total);
        assert!(!last.sprites.is_empty());
    }

    #[test]
    fn test_title_alpha_pulses_after_full() {
        let config = test_config();
        assert_eq!(title_alpha(&config, 20.0), 0.0);
        let full = title_alpha(&config, 36.0);
        assert!((full - (0.7 + 0.3 * (36.0f64 * 0.18).sin())).abs() < 1e-9);
        let half = title_alpha(&config, 28.0);
        assert!((half - 0.5 * (0.7 + 0.3 * (28.0f64 * 0.18).sin())).abs() < 1e-9);
    }

    #[test]
    fn test_break_moves_particles_outward_and_fades() {
        let mut controller = TransitionController::new(test_config());
        let mut session = MemorySession::new();
        controller.trigger(&canvas(), &mut NullSink);
        let (cx, cy) = canvas().center();

        let mut scenes = Vec::new();
        for _ in 0..80 {
            scenes.push(scene(controller.tick(&mut session)));
        }
        let at_break = &scenes[41];
        let later = &scenes[51];
        let gold: Vec<_> = at_break
            .sprites
            .iter()
            .filter(|s| s.tint == Tint::Gold)
            .collect();
        let gold_later: Vec<_> = later
            .sprites
            .iter()
            .filter(|s| s.tint == Tint::Gold)
            .collect();
        assert_eq!(gold.len(), gold_later.len());
        assert!(gold.iter().all(|s| s.alpha == 1.0));
        for (a, b) in gold.iter().zip(&gold_later) {
            let da = ((a.x - cx).powi(2) + (a.y - cy).powi(2)).sqrt();
            let db = ((b.x - cx).powi(2) + (b.y - cy).powi(2)).sqrt();
            assert!(db > da);
            assert!((b.alpha - (1.0 - 10.0 / 30.0)).abs() < 1e-9);
        }
        // Fully faded 30 frames after the break
        assert!(scenes[71].sprites.iter().all(|s| s.alpha == 0.0));
    }
}

//! Procedural departure sound for the transition
//!
//! The score is plain data: a handful of voices, each an oscillator or a
//! filtered noise burst with parameter automation. `synthesize` renders it
//! to mono PCM. Playback goes through an `AudioSink`; a sink that fails or
//! does not exist only costs the sound, never the transition.

use std::f64::consts::TAU;

use rand::Rng;
use tracing::debug;

use crate::{Error, Result};

/// How a parameter travels from the previous point to this one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ramp {
    /// Jump at the point's time
    Step,
    Linear,
    /// Exponential curve; both ends must be positive
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub at: f64,
    pub value: f64,
    pub ramp: Ramp,
}

/// Piecewise parameter automation over time in seconds
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Automation {
    points: Vec<Point>,
}

impl Automation {
    pub fn starting(at: f64, value: f64) -> Self {
        Self {
            points: vec![Point {
                at,
                value,
                ramp: Ramp::Step,
            }],
        }
    }

    pub fn linear_to(mut self, value: f64, at: f64) -> Self {
        self.points.push(Point {
            at,
            value,
            ramp: Ramp::Linear,
        });
        self
    }

    pub fn exponential_to(mut self, value: f64, at: f64) -> Self {
        self.points.push(Point {
            at,
            value,
            ramp: Ramp::Exponential,
        });
        self
    }

    /// Value at time `t`; holds the first value before and the last value after
    pub fn value_at(&self, t: f64) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if t <= first.at {
            return first.value;
        }
        for pair in self.points.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if t >= next.at {
                continue;
            }
            let span = next.at - prev.at;
            if span <= 0.0 {
                return next.value;
            }
            let x = ((t - prev.at) / span).clamp(0.0, 1.0);
            return match next.ramp {
                Ramp::Step => prev.value,
                Ramp::Linear => prev.value + (next.value - prev.value) * x,
                Ramp::Exponential if prev.value > 0.0 && next.value > 0.0 => {
                    prev.value * (next.value / prev.value).powf(x)
                }
                Ramp::Exponential => prev.value + (next.value - prev.value) * x,
            };
        }
        self.points.last().map(|p| p.value).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Sample at phase in cycles
    fn sample(self, phase: f64) -> f64 {
        let frac = phase - phase.floor();
        match self {
            Waveform::Sine => (TAU * frac).sin(),
            Waveform::Sawtooth => 2.0 * frac - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (frac - 0.5).abs(),
        }
    }
}

/// Low-frequency gain wobble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tremolo {
    pub rate: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Voice {
    Tone {
        wave: Waveform,
        frequency: Automation,
        gain: Automation,
        start: f64,
        stop: f64,
        tremolo: Option<Tremolo>,
    },
    /// White noise through a band-pass filter
    Noise {
        center: f64,
        q: f64,
        gain: Automation,
        start: f64,
        stop: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarpScore {
    pub voices: Vec<Voice>,
    /// Total length in seconds
    pub length: f64,
}

impl WarpScore {
    /// The light-speed departure: a rising charge up to the break, then a
    /// crack, a punch and a fading hum until navigation.
    pub fn departure(break_at: f64, end_at: f64) -> Self {
        let voices = vec![
            // Charge-up sweep, builds while the glyphs gather
            Voice::Tone {
                wave: Waveform::Sawtooth,
                frequency: Automation::starting(0.0, 55.0).exponential_to(420.0, break_at),
                gain: Automation::starting(0.0, 0.03)
                    .linear_to(0.07, break_at - 0.05)
                    .linear_to(0.1, break_at),
                start: 0.0,
                stop: break_at + 0.02,
                tremolo: None,
            },
            // Sub-bass weight under everything
            Voice::Tone {
                wave: Waveform::Sine,
                frequency: Automation::starting(0.0, 38.0).linear_to(28.0, end_at),
                gain: Automation::starting(0.0, 0.04)
                    .linear_to(0.07, break_at)
                    .exponential_to(0.001, end_at),
                start: 0.0,
                stop: end_at,
                tremolo: None,
            },
            // Crack at the break
            Voice::Noise {
                center: 2200.0,
                q: 0.6,
                gain: Automation::starting(break_at, 0.14).exponential_to(0.001, break_at + 0.18),
                start: break_at,
                stop: break_at + 0.18,
            },
            // Warp punch
            Voice::Tone {
                wave: Waveform::Sine,
                frequency: Automation::starting(break_at, 380.0)
                    .exponential_to(3200.0, break_at + 0.25),
                gain: Automation::starting(break_at, 0.07).exponential_to(0.001, break_at + 0.35),
                start: break_at,
                stop: break_at + 0.35,
                tremolo: None,
            },
            // Travel hum with a doppler-ish wobble
            Voice::Tone {
                wave: Waveform::Triangle,
                frequency: Automation::starting(break_at + 0.08, 220.0)
                    .exponential_to(70.0, end_at),
                gain: Automation::starting(break_at + 0.08, 0.05).exponential_to(0.001, end_at),
                start: break_at + 0.08,
                stop: end_at,
                tremolo: Some(Tremolo {
                    rate: 14.0,
                    depth: 0.025,
                }),
            },
            // Shimmer tail
            Voice::Tone {
                wave: Waveform::Sine,
                frequency: Automation::starting(break_at + 0.05, 1800.0)
                    .exponential_to(600.0, end_at),
                gain: Automation::starting(break_at + 0.05, 0.03)
                    .exponential_to(0.001, end_at - 0.1),
                start: break_at + 0.05,
                stop: end_at,
                tremolo: None,
            },
        ];
        Self {
            voices,
            length: end_at,
        }
    }

    /// Render the score to mono samples
    pub fn synthesize<R: Rng + ?Sized>(&self, sample_rate: u32, rng: &mut R) -> Result<Vec<f32>> {
        if sample_rate == 0 {
            return Err(Error::Audio("sample rate must be positive".to_string()));
        }
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(Error::Audio(format!("invalid score length {}", self.length)));
        }

        let rate = sample_rate as f64;
        let total = (self.length * rate).ceil() as usize;
        let mut mix = vec![0.0f64; total];

        for voice in &self.voices {
            match voice {
                Voice::Tone {
                    wave,
                    frequency,
                    gain,
                    start,
                    stop,
                    tremolo,
                } => {
                    let mut phase = 0.0;
                    for (i, out) in sample_range(&mut mix, *start, *stop, rate) {
                        let t = i as f64 / rate;
                        let mut g = gain.value_at(t);
                        if let Some(tremolo) = tremolo {
                            g += tremolo.depth * (TAU * tremolo.rate * (t - start)).sin();
                        }
                        *out += wave.sample(phase) * g;
                        phase += frequency.value_at(t) / rate;
                    }
                }
                Voice::Noise {
                    center,
                    q,
                    gain,
                    start,
                    stop,
                } => {
                    let mut filter = BandPass::new(*center, *q, rate);
                    for (i, out) in sample_range(&mut mix, *start, *stop, rate) {
                        let t = i as f64 / rate;
                        let noise = rng.gen::<f64>() * 2.0 - 1.0;
                        *out += filter.process(noise) * gain.value_at(t);
                    }
                }
            }
        }

        Ok(mix.into_iter().map(|s| s.clamp(-1.0, 1.0) as f32).collect())
    }
}

/// Mutable samples of `mix` between `start` and `stop` seconds, with their indices
fn sample_range(
    mix: &mut [f64],
    start: f64,
    stop: f64,
    rate: f64,
) -> impl Iterator<Item = (usize, &mut f64)> {
    let from = ((start.max(0.0)) * rate).floor() as usize;
    let to = ((stop.max(0.0)) * rate).ceil() as usize;
    let to = to.min(mix.len());
    let from = from.min(to);
    mix[from..to]
        .iter_mut()
        .enumerate()
        .map(move |(i, s)| (from + i, s))
}

/// RBJ band-pass biquad, constant 0 dB peak gain
#[derive(Debug, Clone)]
struct BandPass {
    b0: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BandPass {
    fn new(center: f64, q: f64, rate: f64) -> Self {
        let w0 = TAU * center / rate;
        let alpha = w0.sin() / (2.0 * q.max(1e-3));
        let a0 = 1.0 + alpha;
        Self {
            b0: alpha / a0,
            b2: -alpha / a0,
            a1: -2.0 * w0.cos() / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b2 * self.x2 - self.a1 * self.y1 - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Output device for rendered audio
pub trait AudioSink {
    fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<()>;
}

/// Sink for hosts without audio output; accepts and discards
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _samples: &[f32], _sample_rate: u32) -> Result<()> {
        Ok(())
    }
}

/// Render and play `score`, swallowing any failure
///
/// Returns whether the sound was handed to the sink.
pub fn play_best_effort<R: Rng + ?Sized>(
    score: &WarpScore,
    sink: &mut dyn AudioSink,
    sample_rate: u32,
    rng: &mut R,
) -> bool {
    let result = score
        .synthesize(sample_rate, rng)
        .and_then(|samples| sink.play(&samples, sample_rate));
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Transition audio skipped");
            false
        }
    }
}

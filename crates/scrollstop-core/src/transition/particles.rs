//! Glyph particles for the break-apart transition

use std::f64::consts::PI;

use rand::Rng;

/// Glyphs background particles are drawn from and flicker between
pub const GLYPHS: &[char] = &[
    '░', '▒', '▓', '█', '▀', '▄', '▌', '▐', '│', '─', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴',
    '┼', '═', '║', '╔', '╗', '╚', '╝', '·', '.', '+', '*', ':', ';', '~', '^', '>', '<',
];

pub fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    GLYPHS[rng.gen_range(0..GLYPHS.len())]
}

/// Drawing surface in page pixels, split into glyph cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64, cell_width: f64, cell_height: f64) -> Self {
        Self {
            width,
            height,
            cell_width: cell_width.max(1.0),
            cell_height: cell_height.max(1.0),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Distance from the center to a corner
    pub fn max_distance(&self) -> f64 {
        let (cx, cy) = self.center();
        (cx * cx + cy * cy).sqrt()
    }
}

/// Color family of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tint {
    /// Dim amber background noise, HSL with fixed 22% saturation
    Ember { hue: f64, lightness: f64 },
    /// Title gold (#d4a850)
    Gold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub glyph: char,
    /// Frame at which the particle starts fading in
    pub appear_at: f64,
    /// Direction of travel once the screen breaks, radians
    pub angle: f64,
    pub speed: f64,
    pub tint: Tint,
}

impl Particle {
    /// Position `frames` after the break
    pub fn exploded(&self, frames: f64) -> (f64, f64) {
        let travel = self.speed * frames * 0.5;
        (
            self.x + self.angle.cos() * travel,
            self.y + self.angle.sin() * travel,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    pub background: Vec<Particle>,
    pub title: Vec<Particle>,
}

impl ParticleField {
    /// Scatter background particles over the canvas grid and lay out the title art
    ///
    /// Background cells are kept with probability `density`. Cells near the
    /// edges appear first and the wave moves inward; cells farther from the
    /// center fly out faster.
    pub fn generate<R: Rng + ?Sized>(
        canvas: &Canvas,
        title_art: &[String],
        density: f64,
        rng: &mut R,
    ) -> Self {
        let (cx, cy) = canvas.center();
        let max_dist = canvas.max_distance().max(f64::EPSILON);

        let cols = (canvas.width / canvas.cell_width).ceil() as usize + 1;
        let rows = (canvas.height / canvas.cell_height).ceil() as usize + 1;

        let mut background = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                if rng.gen::<f64>() > density {
                    continue;
                }
                let x = col as f64 * canvas.cell_width;
                let y = row as f64 * canvas.cell_height;
                let (dx, dy) = (x - cx, y - cy);
                let nd = (dx * dx + dy * dy).sqrt() / max_dist;
                background.push(Particle {
                    x,
                    y,
                    glyph: random_glyph(rng),
                    appear_at: (1.0 - nd) * 18.0 + rng.gen::<f64>() * 8.0,
                    angle: dy.atan2(dx),
                    speed: 3.0 + rng.gen::<f64>() * 9.0 + nd * 6.0,
                    tint: Tint::Ember {
                        hue: 36.0 + rng.gen::<f64>() * 10.0,
                        lightness: 16.0 + rng.gen::<f64>() * 20.0,
                    },
                });
            }
        }

        let art_width = title_art
            .first()
            .map(|line| line.chars().count())
            .unwrap_or(0) as f64
            * canvas.cell_width;
        let art_x = cx - art_width / 2.0;
        let art_y = cy - title_art.len() as f64 * canvas.cell_height / 2.0;

        let mut title = Vec::new();
        for (row, line) in title_art.iter().enumerate() {
            for (col, glyph) in line.chars().enumerate() {
                if glyph == ' ' {
                    continue;
                }
                let x = art_x + col as f64 * canvas.cell_width;
                let y = art_y + row as f64 * canvas.cell_height;
                let angle = if x == cx && y == cy {
                    rng.gen::<f64>() * 2.0 * PI
                } else {
                    (y - cy).atan2(x - cx)
                };
                title.push(Particle {
                    x,
                    y,
                    glyph,
                    appear_at: 0.0,
                    angle,
                    speed: 5.0 + rng.gen::<f64>() * 14.0,
                    tint: Tint::Gold,
                });
            }
        }

        Self { background, title }
    }

    pub fn len(&self) -> usize {
        self.background.len() + self.title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn art() -> Vec<String> {
        vec!["[ A B ]".to_string(), "[  C  ]".to_string()]
    }

    #[test]
    fn test_title_skips_spaces() {
        let mut rng = StdRng::seed_from_u64(7);
        let canvas = Canvas::new(200.0, 100.0, 10.0, 15.0);
        let field = ParticleField::generate(&canvas, &art(), 0.42, &mut rng);
        let glyphs: String = field.title.iter().map(|p| p.glyph).collect();
        assert_eq!(glyphs, "[AB][C]");
        assert!(field.title.iter().all(|p| p.tint == Tint::Gold));
    }

    #[test]
    fn test_background_parameters_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let canvas = Canvas::new(800.0, 600.0, 10.0, 15.0);
        let field = ParticleField::generate(&canvas, &[], 0.42, &mut rng);

        let cells = (81 * 41) as f64;
        let kept = field.background.len() as f64;
        assert!(kept > cells * 0.3 && kept < cells * 0.55, "kept {}", kept);

        for p in &field.background {
            assert!(p.appear_at >= 0.0 && p.appear_at <= 26.0);
            assert!(p.speed >= 3.0 && p.speed <= 18.0);
            assert!(GLYPHS.contains(&p.glyph));
            match p.tint {
                Tint::Ember { hue, lightness } => {
                    assert!((36.0..=46.0).contains(&hue));
                    assert!((16.0..=36.0).contains(&lightness));
                }
                Tint::Gold => panic!("background particle tinted gold"),
            }
        }
    }

    #[test]
    fn test_edges_appear_before_center() {
        let mut rng = StdRng::seed_from_u64(3);
        let canvas = Canvas::new(800.0, 600.0, 10.0, 15.0);
        let field = ParticleField::generate(&canvas, &[], 1.0, &mut rng);
        let corner = &field.background[0];
        assert_eq!((corner.x, corner.y), (0.0, 0.0));
        // Corner: nd = 1, delay is only the random jitter
        assert!(corner.appear_at <= 8.0);
        let center = field
            .background
            .iter()
            .find(|p| p.x == 400.0 && p.y == 300.0)
            .unwrap();
        assert!(center.appear_at >= 18.0);
    }

    #[test]
    fn test_explosion_moves_outward() {
        let p = Particle {
            x: 10.0,
            y: 0.0,
            glyph: '*',
            appear_at: 0.0,
            angle: 0.0,
            speed: 4.0,
            tint: Tint::Gold,
        };
        let (x, y) = p.exploded(10.0);
        assert!((x - 30.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_zero_density_has_only_title() {
        let mut rng = StdRng::seed_from_u64(1);
        let canvas = Canvas::new(100.0, 100.0, 10.0, 10.0);
        let field = ParticleField::generate(&canvas, &art(), 0.0, &mut rng);
        assert!(field.background.is_empty());
        assert_eq!(field.len(), 7);
    }
}

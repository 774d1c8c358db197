//! PPM (P6) frame export.
//!
//! A flat RGB buffer sized to the window; `set_pixel`/`draw_line`/
//! `draw_solid_circle`/`blank` mutate it, and `export` writes a binary P6
//! file with zero-padded sequential names. This is an external collaborator
//! the core only reaches through the five-method [`FrameSink`] trait;
//! edge-wrap is deliberately applied here (`to_window_space`) and nowhere
//! else — see `DESIGN.md` for why.

use crate::vector::Vec2;
use std::io::Write;
use std::path::Path;

/// An 8-bit RGB colour, matching `Image.hpp`'s `Colour` (there stored as
/// `uint8_t`; the `f64`-channel `Colour` overload in `Utils.hpp` is folded
/// into the `u8` representation here since nothing in this crate needs the
/// normalized `0..1` form).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Colour { r, g, b }
    }

    pub const BLACK: Colour = Colour::new(0, 0, 0);
    pub const WHITE: Colour = Colour::new(255, 255, 255);
}

/// A fixed palette used to colour boids by flock or by thread id, matching
/// `Image.hpp`'s `IDColours` table (trimmed to the subset this crate
/// exercises; indices wrap via modulo so any id is always colourable).
pub const ID_COLOURS: &[Colour] = &[
    Colour::new(255, 0, 0),
    Colour::new(0, 255, 0),
    Colour::new(0, 0, 255),
    Colour::new(255, 255, 0),
    Colour::new(0, 255, 255),
    Colour::new(255, 0, 255),
    Colour::new(255, 128, 0),
    Colour::new(0, 128, 255),
    Colour::new(128, 0, 255),
    Colour::new(128, 255, 0),
];

pub fn id_colour(index: usize) -> Colour {
    ID_COLOURS[index % ID_COLOURS.len()]
}

/// Wraps `p` into `[0, window_x) x [0, window_y)`. Called only at the
/// render boundary — `Boid::act` never wraps positions; see `DESIGN.md`
/// for why edge-wrap lives here and nowhere else.
pub fn to_window_space(p: Vec2, window_x: f64, window_y: f64) -> Vec2 {
    Vec2::new(p.x.rem_euclid(window_x), p.y.rem_euclid(window_y))
}

/// The five operations the core engine needs from a raster sink. Kept
/// minimal on purpose: anything richer (stroked circles, octant symmetry)
/// is renderer detail the simulation core never calls.
pub trait FrameSink {
    fn set_pixel(&mut self, x: i64, y: i64, colour: Colour);
    fn draw_line(&mut self, a: Vec2, b: Vec2, colour: Colour);
    fn draw_solid_circle(&mut self, centre: Vec2, radius: f64, colour: Colour);
    fn blank(&mut self);
    fn export(&mut self, dir: &Path) -> std::io::Result<()>;
}

/// An in-memory RGB framebuffer that exports to sequential P6 PPM files.
///
/// `num_exported` drives the zero-padded filename, matching
/// `Image::NumExported`/`NumLeading0s` in the original.
pub struct PpmFrameSink {
    width: usize,
    height: usize,
    data: Vec<Colour>,
    num_exported: usize,
}

const NUM_LEADING_ZEROS: usize = 5;

impl PpmFrameSink {
    pub fn new(window_x: f64, window_y: f64) -> Self {
        let width = window_x.max(0.0) as usize;
        let height = window_y.max(0.0) as usize;
        PpmFrameSink {
            width,
            height,
            data: vec![Colour::BLACK; width * height],
            num_exported: 0,
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

impl FrameSink for PpmFrameSink {
    fn set_pixel(&mut self, x: i64, y: i64, colour: Colour) {
        if self.in_bounds(x, y) {
            let idx = self.index(x as usize, y as usize);
            self.data[idx] = colour;
        }
    }

    /// Walks from `a` to `b` in unit steps along the normalized direction,
    /// matching `Image.hpp::DrawLine`'s `Magnitude` loop.
    fn draw_line(&mut self, a: Vec2, b: Vec2, colour: Colour) {
        let direction = b - a;
        let magnitude = direction.norm();
        if magnitude < f64::EPSILON {
            self.set_pixel(a.x.round() as i64, a.y.round() as i64, colour);
            return;
        }
        let step = direction / magnitude;
        let steps = magnitude.round() as i64;
        for i in 0..=steps {
            let p = a + step * (i as f64);
            self.set_pixel(p.x.round() as i64, p.y.round() as i64, colour);
        }
    }

    /// Fills every pixel within `radius` of `centre`, matching
    /// `Image.hpp::DrawSolidCircle`'s squared-distance scan.
    fn draw_solid_circle(&mut self, centre: Vec2, radius: f64, colour: Colour) {
        let r = radius.max(0.0);
        let min_x = (centre.x - r).floor() as i64;
        let max_x = (centre.x + r).ceil() as i64;
        let min_y = (centre.y - r).floor() as i64;
        let max_y = (centre.y + r).ceil() as i64;
        for px in min_x..max_x {
            for py in min_y..max_y {
                let dx = px as f64 - centre.x;
                let dy = py as f64 - centre.y;
                if dx * dx + dy * dy < r * r {
                    self.set_pixel(px, py, colour);
                }
            }
        }
    }

    fn blank(&mut self) {
        self.data.fill(Colour::BLACK);
    }

    /// Writes `frame_NNNNN.ppm` (P6) into `dir`, creating it if needed.
    fn export(&mut self, dir: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(dir)?;
        let name = format!("frame_{:0width$}.ppm", self.num_exported, width = NUM_LEADING_ZEROS);
        let path = dir.join(name);
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        for pixel in &self.data {
            writer.write_all(&[pixel.r, pixel.g, pixel.b])?;
        }
        writer.flush()?;
        self.num_exported += 1;
        Ok(())
    }
}

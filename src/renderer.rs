//! Software rasterisation of projected columns and the overhead map into a
//! packed `0RGB` buffer.

use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::camera::Camera;
use crate::geometry::{Color, Obstacle};
use crate::projector::Projection;
use crate::raycaster::{HitRecord, ray_end};
use crate::world::World;

const SKY: Color = [30, 30, 70];
const GROUND: Color = [40, 40, 40];
const RAY: Color = [0, 255, 0];
const PLAYER: Color = [255, 0, 0];
const DIVIDER: Color = [255, 255, 0];

const PLAYER_RADIUS: i32 = 5;
const HEADING_LENGTH: f32 = 20.0;

#[inline]
pub fn pack_rgb([r, g, b]: Color) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

#[inline]
pub fn gray(level: u8) -> u32 {
    pack_rgb([level, level, level])
}

/// Horizontal pixel span `[x0, x1)` a view draws into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x0: usize,
    pub x1: usize,
}

/// Clears `view` to sky over ground and fills every column, clipped to the
/// viewport and the buffer.
pub fn draw_columns(buf: &mut [u32], width: usize, view: Viewport, columns: &[Projection]) {
    let height = buf.len() / width.max(1);
    let mid = height / 2;
    let sky = pack_rgb(SKY);
    let ground = pack_rgb(GROUND);
    let x_lo = view.x0.min(width);
    let x_hi = view.x1.min(width);

    if x_lo >= x_hi {
        return;
    }

    buf.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let bg = if y < mid { sky } else { ground };
        row[x_lo..x_hi].fill(bg);

        let yf = y as f32;
        for col in columns {
            if yf < col.y || yf >= col.y + col.height {
                continue;
            }
            let (a, b) = clip_span(col.x, col.x + col.width, x_lo, x_hi);
            if a < b {
                row[a..b].fill(gray(col.gray()));
            }
        }
    });
}

#[inline]
fn clip_span(a: f32, b: f32, lo: usize, hi: usize) -> (usize, usize) {
    let a = (a.floor().max(lo as f32) as usize).min(hi);
    let b = (b.floor().max(lo as f32) as usize).min(hi);
    (a, b)
}

/// Fills the whole buffer with one color.
pub fn clear(buf: &mut [u32], width: usize, color: Color) {
    let c = pack_rgb(color);
    buf.par_chunks_mut(width.max(1)).for_each(|row| row.fill(c));
}

/// Top-down debug view: obstacles, the ray fan, the player and the split
/// line at `divider_x`.
pub fn draw_overhead(
    buf: &mut [u32],
    width: usize,
    world: &World,
    camera: &Camera,
    hits: &[Option<HitRecord>],
    divider_x: usize,
) {
    let height = buf.len() / width.max(1);
    let mut canvas = Canvas { buf, width, height };

    for obstacle in &world.obstacles {
        match obstacle {
            Obstacle::Block(s) => {
                let (lo, hi) = s.bounds();
                canvas.fill_rect(lo, hi, pack_rgb(s.color));
            }
            _ => {
                for s in obstacle.segments() {
                    canvas.line(s.start, s.end, pack_rgb(s.color));
                }
            }
        }
    }

    for hit in hits.iter().flatten() {
        canvas.line(camera.pos, hit.position, pack_rgb(RAY));
    }

    canvas.disc(camera.pos, PLAYER_RADIUS, pack_rgb(PLAYER));
    let tip = ray_end(camera.pos, HEADING_LENGTH, camera.angle);
    canvas.line(camera.pos, tip, pack_rgb(PLAYER));

    let x = divider_x as f32;
    canvas.line([x, 0.0], [x, height as f32], pack_rgb(DIVIDER));
}

struct Canvas<'a> {
    buf: &'a mut [u32],
    width: usize,
    height: usize,
}

impl Canvas<'_> {
    #[inline]
    fn put(&mut self, x: i32, y: i32, c: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = c;
        }
    }

    // Bresenham
    fn line(&mut self, a: [f32; 2], b: [f32; 2], c: u32) {
        let (mut x0, mut y0) = (a[0].round() as i32, a[1].round() as i32);
        let (x1, y1) = (b[0].round() as i32, b[1].round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, c);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn fill_rect(&mut self, lo: [f32; 2], hi: [f32; 2], c: u32) {
        let x0 = lo[0].max(0.0) as usize;
        let y0 = lo[1].max(0.0) as usize;
        let x1 = (hi[0].max(0.0) as usize).min(self.width);
        let y1 = (hi[1].max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            let row = y * self.width;
            if x0 < x1 {
                self.buf[row + x0..row + x1].fill(c);
            }
        }
    }

    fn disc(&mut self, center: [f32; 2], r: i32, c: u32) {
        let (cx, cy) = (center[0].round() as i32, center[1].round() as i32);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put(cx + dx, cy + dy, c);
                }
            }
        }
    }
}

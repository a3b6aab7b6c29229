//! Software rasterization primitives on RGBA buffers
//!
//! Shapes overwrite pixels; only [`blit`] blends. Everything is clipped to the
//! target buffer, so callers may pass coordinates outside of it.

use image::{Rgba, RgbaImage};

use super::Color;

/// Set a single pixel, ignoring coordinates outside the buffer
#[inline]
pub fn put(img: &mut RgbaImage, x: i32, y: i32, color: Color) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color.into());
    }
}

/// Source-over blend of one pixel
#[inline]
fn blend(dst: Rgba<u8>, src: Rgba<u8>, opacity: u8) -> Rgba<u8> {
    let sa = f32::from(src[3]) / 255.0 * f32::from(opacity) / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mix = |s: u8, d: u8| {
        let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Draw `src` onto `dst` with its top-left corner at (x, y)
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32, opacity: u8) {
    if opacity == 0 {
        return;
    }
    let (dw, dh) = (dst.width() as i32, dst.height() as i32);
    for (sx, sy, pixel) in src.enumerate_pixels() {
        let tx = x.saturating_add(sx as i32);
        let ty = y.saturating_add(sy as i32);
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let target = dst.get_pixel_mut(tx as u32, ty as u32);
        *target = blend(*target, *pixel, opacity);
    }
}

/// Stamp a square brush of `width` pixels centred on (x, y)
fn stamp(img: &mut RgbaImage, x: i32, y: i32, width: i32, color: Color) {
    let lo = -(width - 1) / 2;
    let hi = width / 2;
    for dy in lo..=hi {
        for dx in lo..=hi {
            put(img, x + dx, y + dy, color);
        }
    }
}

/// Bresenham line with a square brush
pub fn line(img: &mut RgbaImage, x1: i32, y1: i32, x2: i32, y2: i32, width: u32, color: Color) {
    let width = width.max(1) as i32;
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x1, y1);

    loop {
        stamp(img, x, y, width, color);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Axis-aligned rectangle, filled or with a one pixel border
pub fn rect(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, fill: bool, color: Color) {
    if w <= 0 || h <= 0 {
        return;
    }
    for py in y..y + h {
        for px in x..x + w {
            let border = px == x || py == y || px == x + w - 1 || py == y + h - 1;
            if fill || border {
                put(img, px, py, color);
            }
        }
    }
}

/// Ellipse inscribed in the given bounding box
pub fn ellipse(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, fill: bool, color: Color) {
    if w <= 0 || h <= 0 {
        return;
    }
    let rx = w as f32 / 2.0;
    let ry = h as f32 / 2.0;
    let cx = x as f32 + rx;
    let cy = y as f32 + ry;
    let inside = |px: i32, py: i32| {
        let nx = (px as f32 + 0.5 - cx) / rx;
        let ny = (py as f32 + 0.5 - cy) / ry;
        nx * nx + ny * ny <= 1.0
    };

    for py in y..y + h {
        for px in x..x + w {
            if !inside(px, py) {
                continue;
            }
            let edge = !inside(px - 1, py)
                || !inside(px + 1, py)
                || !inside(px, py - 1)
                || !inside(px, py + 1);
            if fill || edge {
                put(img, px, py, color);
            }
        }
    }
}

/// Closed polygon; filled with the even-odd rule
pub fn polygon(img: &mut RgbaImage, points: &[(i32, i32)], fill: bool, color: Color) {
    if points.is_empty() {
        return;
    }
    if fill {
        let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
        let max_y = points.iter().map(|p| p.1).max().unwrap_or(0);
        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for py in min_y..=max_y {
            let scan = py as f32 + 0.5;
            crossings.clear();
            for (i, &(ax, ay)) in points.iter().enumerate() {
                let (bx, by) = points[(i + 1) % points.len()];
                let (ay, by) = (ay as f32, by as f32);
                if (ay <= scan && by > scan) || (by <= scan && ay > scan) {
                    let t = (scan - ay) / (by - ay);
                    crossings.push(ax as f32 + t * (bx - ax) as f32);
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil() as i32;
                let end = (pair[1] - 0.5).floor() as i32;
                for px in start..=end {
                    put(img, px, py, color);
                }
            }
        }
    }
    for (i, &(ax, ay)) in points.iter().enumerate() {
        let (bx, by) = points[(i + 1) % points.len()];
        line(img, ax, ay, bx, by, 1, color);
    }
}

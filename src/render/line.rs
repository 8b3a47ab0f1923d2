//! Bresenham line drawing.
//!
//! The walk always runs along the major axis in increasing order: steep
//! lines swap x and y, and endpoints are swapped so `x0 <= x1`. Stroke width
//! adds pixels along the minor axis, centred on the ideal line.

use super::surface::Surface;
use crate::math::Vec3;

/// Walks the pixels of a line, calling `plot(x, y, t)` where `t` runs from 0
/// at the first endpoint to 1 at the second, whichever way the walk goes.
///
/// Only pixels inside `bounds` (width, height) are visited. The major axis is
/// clipped before the loop and the error term is advanced to the first
/// visible column, so the pixels match an unclipped walk.
fn walk(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    width: u32,
    bounds: (u32, u32),
    mut plot: impl FnMut(i32, i32, f32),
) {
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (mut ax, mut ay, mut bx, mut by) = if steep {
        (y0, x0, y1, x1)
    } else {
        (x0, y0, x1, y1)
    };
    let (major_len, minor_len) = if steep {
        (i64::from(bounds.1), i64::from(bounds.0))
    } else {
        (i64::from(bounds.0), i64::from(bounds.1))
    };
    let reversed = ax > bx;
    if reversed {
        std::mem::swap(&mut ax, &mut bx);
        std::mem::swap(&mut ay, &mut by);
    }

    let first = ax.max(0);
    let last = bx.min(major_len - 1);
    if first > last {
        return;
    }

    let dx = bx - ax;
    let dy = (by - ay).abs();
    let y_step = if ay < by { 1 } else { -1 };
    let width = i64::from(width.max(1));
    let first_offset = -(width - 1) / 2;

    // Minor steps taken before column ax + k: ceil((2dy*k - dx) / 2dx).
    let skipped = i128::from(first - ax);
    let steps = if dx == 0 {
        0
    } else {
        let (dx, dy) = (i128::from(dx), i128::from(dy));
        (2 * dy * skipped - dx + 2 * dx - 1).div_euclid(2 * dx)
    };
    let mut y = (i128::from(ay) + i128::from(y_step) * steps) as i64;
    let mut err = (2 * i128::from(dy) * (skipped + 1) - i128::from(dx) - 2 * i128::from(dx) * steps) as i64;

    for x in first..=last {
        let t = if dx == 0 { 0.0 } else { (x - ax) as f32 / dx as f32 };
        let t = if reversed { 1.0 - t } else { t };
        for k in 0..width {
            let minor = y + first_offset + k;
            if minor < 0 || minor >= minor_len {
                continue;
            }
            if steep {
                plot(minor as i32, x as i32, t);
            } else {
                plot(x as i32, minor as i32, t);
            }
        }
        if err > 0 {
            y += y_step;
            err -= 2 * dx;
        }
        err += 2 * dy;
    }
}

/// 2-D line with no depth test, for overlays.
pub fn draw_line(surface: &mut Surface, x0: i32, y0: i32, x1: i32, y1: i32, color: u32, width: u32) {
    let bounds = (surface.width(), surface.height());
    walk(x0, y0, x1, y1, width, bounds, |x, y, _| surface.set_pixel(x, y, color));
}

/// Screen-space line whose depth is interpolated from the endpoints' `z` and
/// tested like triangle pixels.
pub fn draw_line_3d(surface: &mut Surface, p0: Vec3, p1: Vec3, color: u32, width: u32) {
    let bounds = (surface.width(), surface.height());
    walk(
        p0.x.round() as i32,
        p0.y.round() as i32,
        p1.x.round() as i32,
        p1.y.round() as i32,
        width,
        bounds,
        |x, y, t| {
            let depth = p0.z + (p1.z - p0.z) * t;
            surface.set_pixel_with_depth(x, y, depth, color);
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(surface: &Surface) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..surface.height() as i32 {
            for x in 0..surface.width() as i32 {
                if surface.get_pixel(x, y) == Some(1) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn blank(w: u32, h: u32) -> Surface {
        let mut s = Surface::new(w, h);
        s.clear(0);
        s
    }

    #[test]
    fn every_octant_hits_both_endpoints_without_gaps() {
        let center = (8, 8);
        for (ex, ey) in [
            (15, 10), (10, 15), (6, 15), (1, 10),
            (1, 6), (6, 1), (10, 1), (15, 6),
        ] {
            let mut s = blank(16, 16);
            draw_line(&mut s, center.0, center.1, ex, ey, 1, 1);
            let pixels = lit(&s);
            assert!(pixels.contains(&center));
            assert!(pixels.contains(&(ex, ey)));
            let major = (ex - center.0).abs().max((ey - center.1).abs()) as usize;
            assert_eq!(pixels.len(), major + 1, "line to ({ex}, {ey})");
        }
    }

    #[test]
    fn direction_does_not_change_pixels() {
        let mut forward = blank(20, 20);
        let mut backward = blank(20, 20);
        draw_line(&mut forward, 2, 3, 17, 11, 1, 1);
        draw_line(&mut backward, 17, 11, 2, 3, 1, 1);
        assert_eq!(lit(&forward), lit(&backward));
    }

    #[test]
    fn single_point_line() {
        let mut s = blank(4, 4);
        draw_line(&mut s, 2, 2, 2, 2, 1, 1);
        assert_eq!(lit(&s), vec![(2, 2)]);
    }

    #[test]
    fn width_thickens_along_minor_axis() {
        let mut s = blank(10, 10);
        draw_line(&mut s, 1, 5, 8, 5, 1, 3);
        let pixels = lit(&s);
        assert_eq!(pixels.len(), 8 * 3);
        assert!(pixels.contains(&(1, 4)));
        assert!(pixels.contains(&(1, 6)));

        let mut v = blank(10, 10);
        draw_line(&mut v, 5, 1, 5, 8, 1, 2);
        let pixels = lit(&v);
        assert_eq!(pixels.len(), 8 * 2);
        assert!(pixels.iter().all(|&(x, _)| x == 5 || x == 6));
    }

    #[test]
    fn line_3d_respects_depth() {
        let mut s = blank(10, 3);
        for x in 0..10 {
            s.set_pixel_with_depth(x, 1, 0.5, 7);
        }
        // Depth rises from 0 to 1 across the row; only the nearer half wins.
        draw_line_3d(&mut s, Vec3::new(0.0, 1.0, 0.0), Vec3::new(9.0, 1.0, 1.0), 1, 1);
        assert_eq!(s.get_pixel(0, 1), Some(7));
        assert_eq!(s.get_pixel(4, 1), Some(7));
        assert_eq!(s.get_pixel(5, 1), Some(1));
        assert_eq!(s.get_pixel(9, 1), Some(1));
    }

    #[test]
    fn clipped_line_matches_unclipped_pixels() {
        // Same lines drawn on a wide surface and on a window shifted by 40 px.
        for (x0, y0, x1, y1) in [(10, 20, 90, 47), (90, 47, 10, 20), (45, 5, 55, 95), (70, 2, 20, 60)] {
            let mut wide = blank(100, 100);
            draw_line(&mut wide, x0, y0, x1, y1, 1, 1);
            let expected: Vec<_> = lit(&wide)
                .into_iter()
                .filter(|&(x, _)| (40..70).contains(&x))
                .map(|(x, y)| (x - 40, y))
                .collect();

            let mut window = blank(30, 100);
            draw_line(&mut window, x0 - 40, y0, x1 - 40, y1, 1, 1);
            assert_eq!(lit(&window), expected, "line ({x0}, {y0}) -> ({x1}, {y1})");
        }
    }

    #[test]
    fn far_endpoints_only_visit_the_surface() {
        let mut s = blank(16, 16);
        let start = std::time::Instant::now();
        draw_line(&mut s, -2_000_000_000, 5, 2_000_000_000, 5, 1, 3);
        draw_line_3d(&mut s, Vec3::new(7.0, -1.0e9, 0.0), Vec3::new(7.0, 1.0e9, 0.0), 1, 1);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));

        let pixels = lit(&s);
        assert_eq!(pixels.len(), 16 * 3 + 16 - 3);
        assert!((0..16).all(|x| pixels.contains(&(x, 4)) && pixels.contains(&(x, 6))));
        assert!((0..16).all(|y| pixels.contains(&(7, y))));
    }

    #[test]
    fn line_missing_the_surface_draws_nothing() {
        let mut s = blank(8, 8);
        draw_line(&mut s, -50, -3, 50, -1, 1, 1);
        draw_line(&mut s, 20, 0, 30, 7, 1, 1);
        assert!(lit(&s).is_empty());
    }
}

//! Scan-line triangle fill with Gouraud intensity and depth interpolation.
//!
//! # Algorithm
//!
//! 1. **Sort** the vertices by ascending y (bottom to top, stable).
//! 2. **Reject** zero-area triangles, including collinear ones.
//! 3. **Sweep** two segments: rows in `[y0, y1)` use the short edge
//!    `v0→v1`, rows in `[y1, y2]` use `v1→v2`; both pair with the long edge
//!    `v0→v2`.
//! 4. **Interpolate** x, depth and intensity down each edge, then across the
//!    row between the two edge points.
//!
//! ```text
//!            v2
//!           /|
//!          / |   rows [y1, y2]: edges v1→v2 and v0→v2
//!      v1 /__|
//!         \  |   rows [y0, y1): edges v0→v1 and v0→v2
//!          \ |
//!           \|
//!            v0
//! ```
//!
//! Splitting rows at `ceil(y1)` means every integer row between the lowest
//! and highest vertex belongs to exactly one segment, so flat-bottom and
//! flat-top triangles have no missing rows.
//!
//! Rows and spans are clipped to the surface before the loops run, so the
//! cost of a fill is bounded by the surface size. Interpolation and outline
//! placement use the unclipped edges.

use super::surface::Surface;
use crate::colors;
use crate::math::{Mat2, Vec2, Vec3};

/// A screen-space vertex: `position.x/y` in pixels, `position.z` depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    pub position: Vec3,
    pub intensity: f32,
}

impl ShadedVertex {
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// How the interior of a triangle is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    /// Material grey in `[0, 1]`, scaled by the interpolated intensity.
    pub base_grey: f32,
    /// Recolors span ends and the first/last rows when set.
    pub outline: Option<u32>,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            base_grey: colors::BASE_GREY,
            outline: None,
        }
    }
}

/// Edge point at one row.
#[derive(Clone, Copy)]
struct EdgeSample {
    x: f32,
    depth: f32,
    intensity: f32,
}

#[inline]
fn sample_edge(a: &ShadedVertex, b: &ShadedVertex, y: f32) -> EdgeSample {
    let height = b.position.y - a.position.y;
    let t = if height.abs() < f32::EPSILON {
        0.0
    } else {
        (y - a.position.y) / height
    };
    EdgeSample {
        x: a.position.x + (b.position.x - a.position.x) * t,
        depth: a.position.z + (b.position.z - a.position.z) * t,
        intensity: a.intensity + (b.intensity - a.intensity) * t,
    }
}

/// Twice the signed screen-space area; positive when counter-clockwise.
pub fn signed_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    Mat2::from_columns(
        Vec2::new(b.x - a.x, b.y - a.y),
        Vec2::new(c.x - a.x, c.y - a.y),
    )
    .determinant()
}

/// Fills a triangle into `surface` with depth testing.
pub fn fill_triangle(surface: &mut Surface, vertices: [ShadedVertex; 3], style: &FillStyle) {
    let mut v = vertices;
    v.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
    let [v0, v1, v2] = v;

    if signed_area(v0.position, v1.position, v2.position).abs() <= f32::EPSILON {
        return;
    }

    let first_row = v0.position.y.ceil() as i32;
    let split_row = v1.position.y.ceil() as i32;
    let last_row = v2.position.y.floor() as i32;

    // Only rows on the surface are swept; edge samples still use the full edges.
    let low = first_row.max(0);
    let high = last_row.min(surface.height() as i32 - 1);
    if low > high {
        return;
    }
    let split = split_row.clamp(low, high + 1);

    let mut row = |y: i32, short_a: &ShadedVertex, short_b: &ShadedVertex| {
        let fy = y as f32;
        let p = sample_edge(short_a, short_b, fy);
        let q = sample_edge(&v0, &v2, fy);
        let (left, right) = if p.x <= q.x { (p, q) } else { (q, p) };
        let edge_row = y == first_row || y == last_row;
        fill_span(surface, y, left, right, edge_row, style);
    };

    for y in low..split {
        row(y, &v0, &v1);
    }
    for y in split..=high {
        row(y, &v1, &v2);
    }
}

#[inline]
fn fill_span(
    surface: &mut Surface,
    y: i32,
    left: EdgeSample,
    right: EdgeSample,
    edge_row: bool,
    style: &FillStyle,
) {
    let x_start = left.x.ceil() as i32;
    let x_end = right.x.floor() as i32;
    let span = right.x - left.x;
    let first = x_start.max(0);
    let last = x_end.min(surface.width() as i32 - 1);

    for x in first..=last {
        let t = if span.abs() < f32::EPSILON {
            0.0
        } else {
            (x as f32 - left.x) / span
        };
        let depth = left.depth + (right.depth - left.depth) * t;
        let color = match style.outline {
            Some(outline) if edge_row || x == x_start || x == x_end => outline,
            _ => {
                let intensity = left.intensity + (right.intensity - left.intensity) * t;
                colors::grey(style.base_grey * intensity)
            }
        };
        surface.set_pixel_with_depth(x, y, depth, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: u32, h: u32) -> Surface {
        let mut s = Surface::new(w, h);
        s.clear(0);
        s
    }

    fn flat(points: [(f32, f32); 3], depth: f32) -> [ShadedVertex; 3] {
        points.map(|(x, y)| ShadedVertex::new(Vec3::new(x, y, depth), 1.0))
    }

    fn written_rows(s: &Surface) -> Vec<i32> {
        (0..s.height() as i32)
            .filter(|&y| (0..s.width() as i32).any(|x| s.get_pixel(x, y) != Some(0)))
            .collect()
    }

    fn count_written(s: &Surface) -> usize {
        s.pixels().iter().filter(|&&p| p != 0).count()
    }

    #[test]
    fn flat_bottom_has_no_row_gaps() {
        let mut s = blank(20, 20);
        fill_triangle(&mut s, flat([(2.0, 3.0), (15.0, 3.0), (8.0, 12.0)], 0.0), &FillStyle::default());
        assert_eq!(written_rows(&s), (3..=12).collect::<Vec<_>>());
    }

    #[test]
    fn flat_top_has_no_row_gaps() {
        let mut s = blank(20, 20);
        fill_triangle(&mut s, flat([(8.0, 2.0), (2.0, 11.0), (15.0, 11.0)], 0.0), &FillStyle::default());
        assert_eq!(written_rows(&s), (2..=11).collect::<Vec<_>>());
    }

    #[test]
    fn general_triangle_covers_every_row() {
        let mut s = blank(30, 30);
        fill_triangle(&mut s, flat([(5.0, 1.5), (25.0, 10.2), (12.0, 27.7)], 0.0), &FillStyle::default());
        assert_eq!(written_rows(&s), (2..=27).collect::<Vec<_>>());
    }

    #[test]
    fn degenerate_triangles_write_nothing() {
        let style = FillStyle::default();
        for points in [
            [(1.0, 5.0), (6.0, 5.0), (9.0, 5.0)],
            [(4.0, 1.0), (4.0, 6.0), (4.0, 9.0)],
            [(1.0, 1.0), (3.0, 3.0), (7.0, 7.0)],
            [(2.0, 2.0), (2.0, 2.0), (2.0, 2.0)],
        ] {
            let mut s = blank(10, 10);
            fill_triangle(&mut s, flat(points, 0.0), &style);
            assert_eq!(count_written(&s), 0, "{points:?}");
        }
    }

    #[test]
    fn depth_order_does_not_matter() {
        let near = flat([(0.0, 0.0), (9.0, 0.0), (0.0, 9.0)], 0.8);
        let far = flat([(0.0, 0.0), (9.0, 0.0), (9.0, 9.0)], 0.2);
        let near_style = FillStyle {
            base_grey: 1.0,
            outline: None,
        };
        let far_style = FillStyle {
            base_grey: 0.4,
            outline: None,
        };

        let mut a = blank(10, 10);
        fill_triangle(&mut a, near, &near_style);
        fill_triangle(&mut a, far, &far_style);
        let mut b = blank(10, 10);
        fill_triangle(&mut b, far, &far_style);
        fill_triangle(&mut b, near, &near_style);
        assert_eq!(a.pixels(), b.pixels());
        assert_eq!(a.get_pixel(1, 0), Some(colors::grey(1.0)));
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let tri = flat([(1.0, 2.0), (17.0, 6.0), (6.0, 15.0)], 0.0);
        let mut a = blank(20, 20);
        fill_triangle(&mut a, tri, &FillStyle::default());
        let mut b = blank(20, 20);
        fill_triangle(&mut b, [tri[2], tri[0], tri[1]], &FillStyle::default());
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn intensity_is_interpolated() {
        let mut s = blank(11, 3);
        let vertices = [
            ShadedVertex::new(Vec3::new(0.0, 0.0, 0.0), 0.0),
            ShadedVertex::new(Vec3::new(10.0, 0.0, 0.0), 1.0),
            ShadedVertex::new(Vec3::new(0.0, 2.0, 0.0), 0.0),
        ];
        let style = FillStyle {
            base_grey: 1.0,
            outline: None,
        };
        fill_triangle(&mut s, vertices, &style);
        let (left, _, _) = colors::channels(s.get_pixel(0, 0).unwrap_or(0));
        let (mid, _, _) = colors::channels(s.get_pixel(5, 0).unwrap_or(0));
        let (right, _, _) = colors::channels(s.get_pixel(10, 0).unwrap_or(0));
        assert!(left < mid && mid < right);
        assert_eq!(right, 255);
    }

    #[test]
    fn outline_marks_span_ends_and_extreme_rows() {
        let mut s = blank(12, 12);
        let style = FillStyle {
            base_grey: 1.0,
            outline: Some(7),
        };
        fill_triangle(&mut s, flat([(1.0, 1.0), (10.0, 1.0), (1.0, 10.0)], 0.0), &style);
        // Bottom row entirely outline.
        assert!((1..=10).all(|x| s.get_pixel(x, 1) == Some(7)));
        // Middle row: ends outlined, interior filled.
        assert_eq!(s.get_pixel(1, 4), Some(7));
        assert_eq!(s.get_pixel(2, 4), Some(colors::grey(1.0)));
        assert_eq!(s.get_pixel(7, 4), Some(7));
    }

    #[test]
    fn partly_offscreen_triangle_fills_only_visible_pixels() {
        // Hypotenuse x + y = 20.5 keeps pixel centres off the edge.
        let mut s = blank(16, 16);
        fill_triangle(
            &mut s,
            flat([(-10.0, -10.0), (30.5, -10.0), (-10.0, 30.5)], 0.0),
            &FillStyle::default(),
        );
        let expected = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|(x, y)| x + y <= 20)
            .count();
        assert_eq!(expected, 201);
        assert_eq!(count_written(&s), expected);
        assert_eq!(s.get_pixel(15, 5), Some(colors::grey(colors::BASE_GREY)));
        assert_eq!(s.get_pixel(15, 6), Some(0));
    }

    #[test]
    fn huge_triangle_costs_only_the_surface() {
        let mut s = blank(64, 64);
        let start = std::time::Instant::now();
        fill_triangle(
            &mut s,
            flat([(-20000.0, -20000.0), (20000.0, -20000.0), (0.0, 20000.0)], 0.0),
            &FillStyle::default(),
        );
        assert_eq!(count_written(&s), 64 * 64);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn offscreen_triangle_writes_nothing() {
        let mut s = blank(8, 8);
        fill_triangle(&mut s, flat([(0.0, 20.0), (6.0, 20.0), (3.0, 30.0)], 0.0), &FillStyle::default());
        fill_triangle(&mut s, flat([(-9.0, 1.0), (-2.0, 1.0), (-5.0, 6.0)], 0.0), &FillStyle::default());
        assert_eq!(count_written(&s), 0);
    }

    #[test]
    fn clipped_outline_stays_on_the_true_edges() {
        let mut s = blank(8, 8);
        let style = FillStyle {
            base_grey: 1.0,
            outline: Some(7),
        };
        fill_triangle(&mut s, flat([(-20.0, -20.0), (40.0, -20.0), (-20.0, 40.0)], 0.0), &style);
        // Surface borders are not triangle edges.
        assert_eq!(s.get_pixel(0, 0), Some(colors::grey(1.0)));
        assert_eq!(s.get_pixel(7, 3), Some(colors::grey(1.0)));
        assert_eq!(s.get_pixel(3, 0), Some(colors::grey(1.0)));
    }

    #[test]
    fn signed_area_sign_follows_winding() {
        let a = Vec3::ZERO;
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        assert!(signed_area(a, b, c) > 0.0);
        assert!(signed_area(a, c, b) < 0.0);
    }
}

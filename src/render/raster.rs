//! Rasterization primitives: line drawing and triangle filling.
//!
//! Screen-space inputs carry the pixel x/y in their first two components
//! and a positive view-space depth in the third, which is what the depth
//! buffer stores.

use cgmath::{Vector2, Vector3};

use super::framebuffer::FrameBuffer;

/// Triangles flatter than this in screen space are treated as degenerate
/// and skipped.
const DEGENERATE_AREA: f32 = 1e-8;

/// Bresenham traversal shared by the line-drawing entry points.
///
/// Generalized to arbitrary slope by swapping axes for steep lines and
/// endpoints for right-to-left ones. Depth is interpolated linearly along
/// the dominant axis and handed to the plot callback with each pixel.
fn traverse_line<F>(from: Vector3<f32>, to: Vector3<f32>, mut plot: F)
where
    F: FnMut(i32, i32, f32),
{
    let (mut x1, mut y1, mut z1) = (from.x, from.y, from.z);
    let (mut x2, mut y2, mut z2) = (to.x, to.y, to.z);

    let steep = (y2 - y1).abs() > (x2 - x1).abs();
    if steep {
        std::mem::swap(&mut x1, &mut y1);
        std::mem::swap(&mut x2, &mut y2);
    }
    if x1 > x2 {
        std::mem::swap(&mut x1, &mut x2);
        std::mem::swap(&mut y1, &mut y2);
        std::mem::swap(&mut z1, &mut z2);
    }

    let dx = x2 - x1;
    let dy = (y2 - y1).abs();

    let mut error = dx / 2.0;
    let ystep: i32 = if y1 < y2 { 1 } else { -1 };
    let mut y = y1 as i32;

    let x_start = x1 as i32;
    let x_end = x2 as i32;

    for x in x_start..=x_end {
        // Parametrize depth by progress along the dominant axis
        let t = if x_end > x_start {
            (x - x_start) as f32 / (x_end - x_start) as f32
        } else {
            0.0
        };
        let z = z1 + t * (z2 - z1);

        if steep {
            plot(y, x, z);
        } else {
            plot(x, y, z);
        }

        error -= dy;
        if error < 0.0 {
            y += ystep;
            error += dx;
        }
    }
}

/// Depth-tested Bresenham line, so lines occlude and are occluded by
/// filled triangles.
pub fn draw_line(
    fb: &mut FrameBuffer,
    from: Vector3<f32>,
    to: Vector3<f32>,
    color: Vector3<f32>,
) {
    traverse_line(from, to, |x, y, z| {
        fb.put_pixel_depth(x, y, z, color);
    });
}

/// Line drawing without depth participation, for viewport-space overlays
/// like the axes.
pub fn draw_line_flat(
    fb: &mut FrameBuffer,
    from: Vector2<f32>,
    to: Vector2<f32>,
    color: Vector3<f32>,
) {
    traverse_line(
        Vector3::new(from.x, from.y, 0.0),
        Vector3::new(to.x, to.y, 0.0),
        |x, y, _| fb.put_pixel(x, y, color),
    );
}

/// Barycentric weights of `p` in the screen-space triangle `(a, b, c)`.
///
/// Solves the 2x2 system `p - a = l1*(b - a) + l2*(c - a)` and returns
/// `(l0, l1, l2)` with `l0 = 1 - l1 - l2`. Returns `None` for degenerate
/// (zero-area) triangles instead of dividing by zero.
pub fn barycentric(
    p: Vector2<f32>,
    a: Vector2<f32>,
    b: Vector2<f32>,
    c: Vector2<f32>,
) -> Option<(f32, f32, f32)> {
    let u = b - a;
    let v = c - a;
    let w = p - a;

    let det = u.x * v.y - u.y * v.x;
    if det.abs() < DEGENERATE_AREA {
        return None;
    }

    let l1 = (w.x * v.y - w.y * v.x) / det;
    let l2 = (u.x * w.y - u.y * w.x) / det;
    Some((1.0 - l1 - l2, l1, l2))
}

/// Perspective-correct depth at barycentric weights `(l0, l1, l2)` over
/// vertex depths `(z0, z1, z2)`.
pub fn perspective_depth(l: (f32, f32, f32), z: (f32, f32, f32)) -> f32 {
    1.0 / (l.0 / z.0 + l.1 / z.1 + l.2 / z.2)
}

/// Fills a triangle by scanning its screen-space bounding box.
///
/// For every covered pixel the shader callback receives the barycentric
/// weights and produces a color; the write then goes through the depth
/// test with perspective-correct interpolated depth. Degenerate triangles
/// are skipped entirely.
pub fn fill_triangle<F>(fb: &mut FrameBuffer, tri: &[Vector3<f32>; 3], mut shade: F)
where
    F: FnMut(f32, f32, f32) -> Vector3<f32>,
{
    let a = Vector2::new(tri[0].x, tri[0].y);
    let b = Vector2::new(tri[1].x, tri[1].y);
    let c = Vector2::new(tri[2].x, tri[2].y);

    // Reject zero-area triangles before scanning anything
    if barycentric(a, a, b, c).is_none() {
        return;
    }

    let min_x = (a.x.min(b.x).min(c.x).floor().max(0.0)) as i32;
    let max_x = (a.x.max(b.x).max(c.x).ceil().min((fb.width() - 1) as f32)) as i32;
    let min_y = (a.y.min(b.y).min(c.y).floor().max(0.0)) as i32;
    let max_y = (a.y.max(b.y).max(c.y).ceil().min((fb.height() - 1) as f32)) as i32;

    let depths = (tri[0].z, tri[1].z, tri[2].z);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some((l0, l1, l2)) = barycentric(p, a, b, c) else {
                continue;
            };
            if l1 < 0.0 || l2 < 0.0 || l1 + l2 > 1.0 {
                continue;
            }

            let z = perspective_depth((l0, l1, l2), depths);
            let color = shade(l0, l1, l2);
            fb.put_pixel_depth(x, y, z, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    const WHITE: Vector3<f32> = Vector3::new(1.0, 1.0, 1.0);

    fn cleared(w: usize, h: usize) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h);
        fb.clear(Vector3::new(0.0, 0.0, 0.0));
        fb
    }

    #[test]
    fn test_barycentric_constant_interpolation() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(10.0, 0.0);
        let c = Vector2::new(0.0, 10.0);
        let (l0, l1, l2) = barycentric(Vector2::new(2.0, 3.0), a, b, c).unwrap();

        assert!(l0 > 0.0 && l1 > 0.0 && l2 > 0.0);
        assert!((l0 + l1 + l2 - 1.0).abs() < 1e-6);
        // Interpolating a constant returns the constant
        let value = l0 * 7.5 + l1 * 7.5 + l2 * 7.5;
        assert!((value - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(5.0, 2.0);
        let c = Vector2::new(2.0, 6.0);
        let (l0, l1, l2) = barycentric(a, a, b, c).unwrap();
        assert!((l0 - 1.0).abs() < 1e-6 && l1.abs() < 1e-6 && l2.abs() < 1e-6);
    }

    #[test]
    fn test_barycentric_partition_of_unity() {
        use rand::Rng;
        let mut rng = rand::rng();

        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(13.0, 4.0);
        let c = Vector2::new(6.0, 11.0);
        for _ in 0..200 {
            let p = Vector2::new(rng.random_range(-5.0..20.0), rng.random_range(-5.0..20.0));
            let (l0, l1, l2) = barycentric(p, a, b, c).unwrap();
            assert!((l0 + l1 + l2 - 1.0).abs() < 1e-4);
            // The weights reconstruct the point, inside the triangle or not
            let q = a * l0 + b * l1 + c * l2;
            assert!((q - p).magnitude() < 1e-3);
        }
    }

    #[test]
    fn test_barycentric_degenerate_is_none() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(5.0, 5.0);
        let c = Vector2::new(10.0, 10.0); // collinear
        assert!(barycentric(Vector2::new(1.0, 1.0), a, b, c).is_none());
    }

    #[test]
    fn test_perspective_depth_exact_at_vertices() {
        let z = (2.0, 5.0, 9.0);
        assert!((perspective_depth((1.0, 0.0, 0.0), z) - 2.0).abs() < 1e-6);
        assert!((perspective_depth((0.0, 1.0, 0.0), z) - 5.0).abs() < 1e-6);
        assert!((perspective_depth((0.0, 0.0, 1.0), z) - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_fill_skips_degenerate_triangle() {
        let mut fb = cleared(8, 8);
        let tri = [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(4.0, 4.0, 1.0),
            Vector3::new(8.0, 8.0, 1.0),
        ];
        fill_triangle(&mut fb, &tri, |_, _, _| WHITE);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.color_at(x, y), Vector3::new(0.0, 0.0, 0.0));
            }
        }
    }

    #[test]
    fn test_fill_covers_interior_not_exterior() {
        let mut fb = cleared(16, 16);
        let tri = [
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(14.0, 1.0, 1.0),
            Vector3::new(1.0, 14.0, 1.0),
        ];
        fill_triangle(&mut fb, &tri, |_, _, _| WHITE);
        // Deep interior pixel
        assert_eq!(fb.color_at(3, 3), WHITE);
        // Far corner outside the hypotenuse
        assert_eq!(fb.color_at(14, 14), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_fill_respects_depth_order() {
        let mut fb = cleared(16, 16);
        let near = [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(15.0, 0.0, 1.0),
            Vector3::new(0.0, 15.0, 1.0),
        ];
        let far = [
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(15.0, 0.0, 5.0),
            Vector3::new(0.0, 15.0, 5.0),
        ];
        fill_triangle(&mut fb, &near, |_, _, _| WHITE);
        fill_triangle(&mut fb, &far, |_, _, _| Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(fb.color_at(2, 2), WHITE);
    }

    #[test]
    fn test_line_endpoints_and_depth() {
        let mut fb = cleared(8, 8);
        draw_line(
            &mut fb,
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(7.0, 0.0, 3.0),
            WHITE,
        );
        assert_eq!(fb.color_at(0, 0), WHITE);
        assert_eq!(fb.color_at(7, 0), WHITE);
        // Depth interpolates along the run
        assert!((fb.depth_at(0, 0) - 1.0).abs() < 1e-5);
        assert!((fb.depth_at(7, 0) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_steep_line_covers_column() {
        let mut fb = cleared(8, 8);
        draw_line(
            &mut fb,
            Vector3::new(3.0, 0.0, 1.0),
            Vector3::new(3.0, 7.0, 1.0),
            WHITE,
        );
        for y in 0..8 {
            assert_eq!(fb.color_at(3, y), WHITE);
        }
    }
}

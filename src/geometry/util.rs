// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Metric helpers over [`Point2`].
//!
//! Everything here is plain `f64` arithmetic. These functions feed quality
//! measures, split-point placement and reporting, where a rounded magnitude
//! is acceptable; connectivity decisions go through [`crate::kernel`]
//! instead.

use crate::geometry::Point2;

/// Twice the signed area of triangle `abc`; positive when counter-clockwise.
pub fn signed_area2(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

pub fn triangle_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    0.5 * signed_area2(a, b, c).abs()
}

/// Circumcenter of triangle `abc`, or `None` when the three points are
/// (numerically) collinear and no finite center exists.
pub fn circumcenter(a: &Point2, b: &Point2, c: &Point2) -> Option<Point2> {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let acx = c.x - a.x;
    let acy = c.y - a.y;

    let d = 2.0 * (abx * acy - aby * acx);
    if d == 0.0 {
        return None;
    }

    let ab2 = abx * abx + aby * aby;
    let ac2 = acx * acx + acy * acy;
    let ux = (acy * ab2 - aby * ac2) / d;
    let uy = (abx * ac2 - acx * ab2) / d;

    let center = Point2::new(a.x + ux, a.y + uy);
    center.is_finite().then_some(center)
}

/// Squared circumradius from the product-of-edges formula
/// `R = (|ab| |bc| |ca|) / (4 A)`. Infinite for degenerate triangles.
pub fn circumradius2(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let area2 = signed_area2(a, b, c);
    if area2 == 0.0 {
        return f64::INFINITY;
    }
    let d2ab = a.distance2(b);
    let d2bc = b.distance2(c);
    let d2ca = c.distance2(a);
    (d2ab * d2bc * d2ca) / (4.0 * area2 * area2)
}

/// Smallest interior angle of triangle `abc`, in degrees.
pub fn min_angle_deg(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let d2a = b.distance2(c);
    let d2b = c.distance2(a);
    let d2c = a.distance2(b);

    let angle = |opp2: f64, adj1: f64, adj2: f64| -> f64 {
        let denom = 2.0 * (adj1 * adj2).sqrt();
        if denom == 0.0 {
            return 0.0;
        }
        let cos = ((adj1 + adj2 - opp2) / denom).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    };

    let alpha = angle(d2a, d2b, d2c);
    let beta = angle(d2b, d2c, d2a);
    let gamma = angle(d2c, d2a, d2b);
    alpha.min(beta).min(gamma)
}

/// Whether `w` lies strictly inside the circle whose diameter is `ab`,
/// i.e. the angle `a w b` exceeds a right angle.
pub fn in_diametral_circle(a: &Point2, b: &Point2, w: &Point2) -> bool {
    let dax = a.x - w.x;
    let day = a.y - w.y;
    let dbx = b.x - w.x;
    let dby = b.y - w.y;
    dax * dbx + day * dby < 0.0
}

/// Nearest power of two to `input`, which must be positive.
pub fn nearest_power_of_two(input: f64) -> f64 {
    2.0f64.powi(input.log2().round() as i32)
}

/// Area of a simple polygon given as a closed vertex loop (last vertex
/// implicitly connects to the first). Positive for counter-clockwise
/// winding.
pub fn polygon_signed_area(ring: &[Point2]) -> f64 {
    let mut sum = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = &ring[(i + 1) % ring.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    0.5 * sum
}

/// Area-weighted centroid of a simple polygon, or `None` when the loop is
/// too small or degenerate to carry one.
pub fn polygon_centroid(ring: &[Point2]) -> Option<Point2> {
    if ring.len() < 3 {
        return None;
    }

    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = &ring[(i + 1) % ring.len()];
        let cross = p.x * q.y - q.x * p.y;
        area2 += cross;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }

    if area2 == 0.0 {
        return None;
    }
    let centroid = Point2::new(cx / (3.0 * area2), cy / (3.0 * area2));
    centroid.is_finite().then_some(centroid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circumcenter_of_right_triangle() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(0.0, 2.0);

        // Right angle at a; center is the hypotenuse midpoint.
        let center = circumcenter(&a, &b, &c).unwrap();
        assert_eq!(center, Point2::new(1.0, 1.0));
        assert_eq!(circumradius2(&a, &b, &c), 2.0);
    }

    #[test]
    fn circumcenter_rejects_collinear() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 1.0);
        let c = Point2::new(2.0, 2.0);

        assert!(circumcenter(&a, &b, &c).is_none());
    }

    #[test]
    fn equilateral_min_angle() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.5, 3.0f64.sqrt() / 2.0);

        assert!((min_angle_deg(&a, &b, &c) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn diametral_circle_is_strict() {
        let a = Point2::new(-1.0, 0.0);
        let b = Point2::new(1.0, 0.0);

        assert!(in_diametral_circle(&a, &b, &Point2::new(0.0, 0.5)));
        // On the circle itself: right angle, not encroaching.
        assert!(!in_diametral_circle(&a, &b, &Point2::new(0.0, 1.0)));
        assert!(!in_diametral_circle(&a, &b, &Point2::new(0.0, 1.5)));
    }

    #[test]
    fn square_centroid() {
        let ring = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];

        assert_eq!(polygon_signed_area(&ring), 4.0);
        assert_eq!(polygon_centroid(&ring).unwrap(), Point2::new(1.0, 1.0));
    }

    #[test]
    fn power_of_two_rounding() {
        assert_eq!(nearest_power_of_two(1.0), 1.0);
        assert_eq!(nearest_power_of_two(0.7), 0.5);
        assert_eq!(nearest_power_of_two(0.26), 0.25);
        assert_eq!(nearest_power_of_two(100.0), 128.0);
    }
}

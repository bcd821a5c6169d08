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

//! Exact fallback evaluation over `rug::Rational`.
//!
//! An `f64` converts to a rational without loss, and rational add, subtract
//! and multiply are exact, so these functions return the true sign of each
//! determinant no matter how close to degenerate the input is. They only
//! run when the float filter in [`super::predicates`] cannot certify a
//! sign, which for realistic meshes is a small fraction of calls.

use rug::Rational;

use crate::geometry::Point2;
use crate::kernel::Sign;

fn rational(x: f64) -> Rational {
    debug_assert!(x.is_finite());
    Rational::from_f64(x).unwrap_or_default()
}

pub(super) fn orient2d(pa: &Point2, pb: &Point2, pc: &Point2) -> Sign {
    let acx = rational(pa.x) - rational(pc.x);
    let acy = rational(pa.y) - rational(pc.y);
    let bcx = rational(pb.x) - rational(pc.x);
    let bcy = rational(pb.y) - rational(pc.y);

    let det = acx * bcy - acy * bcx;
    Sign::from_ordering(det.cmp0())
}

pub(super) fn incircle(pa: &Point2, pb: &Point2, pc: &Point2, pd: &Point2) -> Sign {
    let adx = rational(pa.x) - rational(pd.x);
    let ady = rational(pa.y) - rational(pd.y);
    let bdx = rational(pb.x) - rational(pd.x);
    let bdy = rational(pb.y) - rational(pd.y);
    let cdx = rational(pc.x) - rational(pd.x);
    let cdy = rational(pc.y) - rational(pd.y);

    let alift = Rational::from(&adx * &adx) + Rational::from(&ady * &ady);
    let blift = Rational::from(&bdx * &bdx) + Rational::from(&bdy * &bdy);
    let clift = Rational::from(&cdx * &cdx) + Rational::from(&cdy * &cdy);

    let bcdet = Rational::from(&bdx * &cdy) - Rational::from(&cdx * &bdy);
    let cadet = Rational::from(&cdx * &ady) - Rational::from(&adx * &cdy);
    let abdet = Rational::from(&adx * &bdy) - Rational::from(&bdx * &ady);

    let det = alift * bcdet + blift * cadet + clift * abdet;
    Sign::from_ordering(det.cmp0())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_orientation_on_collinear_points() {
        // Exact binary coordinates in arithmetic progression.
        let a = Point2::new(0.5, 0.25);
        let b = Point2::new(1.25, 1.75);
        let c = Point2::new(2.0, 3.25);

        assert_eq!(orient2d(&a, &b, &c), Sign::Zero);
        assert_eq!(orient2d(&c, &b, &a), Sign::Zero);
    }

    #[test]
    fn exact_incircle_on_cocircular_points() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 1.0);
        let d = Point2::new(0.0, 1.0);

        assert_eq!(incircle(&a, &b, &c, &d), Sign::Zero);
    }

    #[test]
    fn exact_sign_tracks_one_ulp() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 1.0);
        let on = Point2::new(0.5, 0.5);
        // One ulp of 0.5 above the supporting line.
        let above = Point2::new(0.5, 0.5 + f64::EPSILON / 2.0);

        assert_eq!(orient2d(&a, &b, &on), Sign::Zero);
        assert_eq!(orient2d(&a, &b, &above), Sign::Positive);
    }
}

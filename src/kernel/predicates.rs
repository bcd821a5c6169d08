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

//! Filtered orientation and in-circle tests.
//!
//! Each predicate first evaluates the determinant in `f64` and accepts the
//! sign when its magnitude clears a forward error bound on that expression
//! (Shewchuk's static filter). Anything closer to zero re-evaluates over
//! exact rationals in [`super::exact`]. The result is an exact sign either
//! way: flips, walks and duplicate checks can never be driven into an
//! inconsistent state by roundoff, only slowed down near degeneracy.
//!
//! Ties are genuine: `Sign::Zero` means exactly collinear or exactly
//! cocircular, and each call site resolves it by a fixed rule (cocircular
//! quads are not flipped; walks prefer the lower vertex id) so construction
//! is deterministic.

use crate::geometry::Point2;
use crate::kernel::exact;

const EPSILON: f64 = f64::EPSILON * 0.5;
const CCW_ERRBOUND: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;
const ICC_ERRBOUND: f64 = (10.0 + 96.0 * EPSILON) * EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn from_ordering(ordering: std::cmp::Ordering) -> Sign {
        match ordering {
            std::cmp::Ordering::Less => Sign::Negative,
            std::cmp::Ordering::Equal => Sign::Zero,
            std::cmp::Ordering::Greater => Sign::Positive,
        }
    }

    fn of(value: f64) -> Sign {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    pub fn reverse(self) -> Sign {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Sign::Positive
    }

    pub fn is_negative(self) -> bool {
        self == Sign::Negative
    }

    pub fn is_zero(self) -> bool {
        self == Sign::Zero
    }
}

/// Orientation of `c` relative to the directed line `a -> b`:
/// `Positive` = left (the triangle `abc` winds counter-clockwise),
/// `Negative` = right, `Zero` = exactly collinear.
pub fn orient2d(pa: &Point2, pb: &Point2, pc: &Point2) -> Sign {
    let detleft = (pa.x - pc.x) * (pb.y - pc.y);
    let detright = (pa.y - pc.y) * (pb.x - pc.x);
    let det = detleft - detright;

    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return Sign::of(det);
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return Sign::of(det);
        }
        -detleft - detright
    } else {
        return Sign::of(det);
    };

    if det.abs() >= CCW_ERRBOUND * detsum {
        return Sign::of(det);
    }
    exact::orient2d(pa, pb, pc)
}

/// Position of `pd` relative to the circle through `pa`, `pb`, `pc`, which
/// must wind counter-clockwise: `Positive` = strictly inside,
/// `Negative` = strictly outside, `Zero` = exactly cocircular.
pub fn incircle(pa: &Point2, pb: &Point2, pc: &Point2, pd: &Point2) -> Sign {
    let adx = pa.x - pd.x;
    let ady = pa.y - pd.y;
    let bdx = pb.x - pd.x;
    let bdy = pb.y - pd.y;
    let cdx = pc.x - pd.x;
    let cdy = pc.y - pd.y;

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;
    let alift = adx * adx + ady * ady;

    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;
    let blift = bdx * bdx + bdy * bdy;

    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdxcdy - cdxbdy) + blift * (cdxady - adxcdy) + clift * (adxbdy - bdxady);

    let permanent = (bdxcdy.abs() + cdxbdy.abs()) * alift
        + (cdxady.abs() + adxcdy.abs()) * blift
        + (adxbdy.abs() + bdxady.abs()) * clift;
    if det.abs() > ICC_ERRBOUND * permanent {
        return Sign::of(det);
    }
    exact::incircle(pa, pb, pc, pd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_signs() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);

        assert_eq!(orient2d(&a, &b, &c), Sign::Positive);
        assert_eq!(orient2d(&a, &c, &b), Sign::Negative);
        assert_eq!(orient2d(&a, &b, &Point2::new(2.0, 0.0)), Sign::Zero);
    }

    #[test]
    fn orientation_antisymmetry_near_degeneracy() {
        // On the line y = 2x in decimal, off it by rounding in binary; the
        // filter hands these to the exact path, which must never disagree
        // between argument orders.
        let a = Point2::new(0.1, 0.2);
        let b = Point2::new(0.3, 0.6);
        let c = Point2::new(0.5, 1.0);

        let abc = orient2d(&a, &b, &c);
        assert_eq!(orient2d(&b, &c, &a), abc);
        assert_eq!(orient2d(&c, &a, &b), abc);
        assert_eq!(orient2d(&b, &a, &c), abc.reverse());
    }

    #[test]
    fn incircle_signs() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(0.0, 2.0);

        assert_eq!(
            incircle(&a, &b, &c, &Point2::new(0.5, 0.5)),
            Sign::Positive
        );
        assert_eq!(
            incircle(&a, &b, &c, &Point2::new(5.0, 5.0)),
            Sign::Negative
        );
        // The fourth corner of the square is exactly cocircular.
        assert_eq!(incircle(&a, &b, &c, &Point2::new(2.0, 2.0)), Sign::Zero);
    }

    #[test]
    fn incircle_consistent_under_rotation() {
        let a = Point2::new(0.25, 0.125);
        let b = Point2::new(1.5, 0.375);
        let c = Point2::new(0.875, 1.625);
        let d = Point2::new(0.9, 0.4);

        let sign = incircle(&a, &b, &c, &d);
        assert_eq!(incircle(&b, &c, &a, &d), sign);
        assert_eq!(incircle(&c, &a, &b, &d), sign);
    }
}

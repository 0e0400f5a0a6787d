//! Bézier curves of arbitrary degree.
//!
//! The same curve can be evaluated with two interchangeable algorithms:
//! the direct Bernstein sum and de Casteljau's recursive linear
//! interpolation. Both agree within floating point tolerance for any
//! input, including parameters outside of the [0, 1] range.

use crate::scalar::Scalar;
use crate::{Point, Vector};

use alloc::vec::Vec;
use arrayvec::ArrayVec;
use thiserror::Error;

#[cfg(test)]
use crate::point;

/// Number of control points evaluated without touching the heap.
///
/// De Casteljau's algorithm needs a scratch copy of the control points.
/// Curves up to this size keep it on the stack, larger ones allocate.
const STACK_POINTS: usize = 32;

/// Error type of the Bézier evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BezierError {
    /// A Bézier curve is defined by at least two control points.
    #[error("a bézier curve requires at least two control points")]
    TooFewControlPoints,
}

/// Selects which of the two evaluation algorithms to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Method {
    /// Direct evaluation of the Bernstein polynomial form.
    Direct,
    /// Recursive linear interpolation (de Casteljau's algorithm).
    DeCasteljau,
}

/// A Bézier curve of arbitrary degree, borrowing its ordered control points.
///
/// A curve over `n + 1` control points has degree `n`. The first and last
/// control points lie on the curve, the others generally do not.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BezierCurve<'l, S> {
    points: &'l [Point<S>],
}

impl<'l, S: Scalar> BezierCurve<'l, S> {
    /// Creates a curve over the given control points.
    ///
    /// Fails with `BezierError::TooFewControlPoints` if fewer than two
    /// points are supplied.
    pub fn new(points: &'l [Point<S>]) -> Result<Self, BezierError> {
        if points.len() < 2 {
            return Err(BezierError::TooFewControlPoints);
        }

        Ok(BezierCurve { points })
    }

    /// The degree of the curve (one less than the number of control points).
    #[inline]
    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    /// The ordered control points defining this curve.
    #[inline]
    pub fn control_points(&self) -> &'l [Point<S>] {
        self.points
    }

    /// The first control point (on the curve at `t = 0`).
    #[inline]
    pub fn from(&self) -> Point<S> {
        self.points[0]
    }

    /// The last control point (on the curve at `t = 1`).
    #[inline]
    pub fn to(&self) -> Point<S> {
        self.points[self.points.len() - 1]
    }

    /// Sample the curve at t.
    ///
    /// Uses de Casteljau's algorithm, which is numerically stable for any
    /// degree. `t` is typically in [0, 1] but both evaluation methods
    /// extrapolate cleanly outside of that range.
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.sample_de_casteljau(t)
    }

    /// Sample the curve at t with the requested algorithm.
    pub fn sample_with(&self, t: S, method: Method) -> Point<S> {
        match method {
            Method::Direct => self.sample_direct(t),
            Method::DeCasteljau => self.sample_de_casteljau(t),
        }
    }

    /// Sample the curve at t by summing the Bernstein polynomial basis:
    ///
    /// ```P(t) = Σ C(n,i) * (1 - t)^(n-i) * t^i * points[i]```
    ///
    /// The binomial coefficients are built up multiplicatively with the
    /// recurrence `C(n, i+1) = C(n, i) * (n - i) / (i + 1)` rather than
    /// from factorials, so the coefficients themselves do not overflow.
    /// The summation still accumulates rounding error as the degree grows;
    /// past roughly degree 20 prefer [`sample_de_casteljau`].
    ///
    /// [`sample_de_casteljau`]: Self::sample_de_casteljau
    pub fn sample_direct(&self, t: S) -> Point<S> {
        let n = self.degree();
        let one_t = S::ONE - t;

        let mut acc = Vector::zero();
        let mut coef = S::ONE;
        for (i, p) in self.points.iter().enumerate() {
            let basis = coef * one_t.powi((n - i) as i32) * t.powi(i as i32);
            acc += p.to_vector() * basis;
            coef = coef * S::value((n - i) as f32) / S::value((i + 1) as f32);
        }

        acc.to_point()
    }

    /// Sample the curve at t with de Casteljau's algorithm: repeatedly
    /// interpolate between consecutive control points until a single point
    /// remains. `n` rounds of interpolation for a degree-n curve.
    pub fn sample_de_casteljau(&self, t: S) -> Point<S> {
        if self.points.len() <= STACK_POINTS {
            let mut tmp: ArrayVec<Point<S>, STACK_POINTS> = self.points.iter().copied().collect();
            de_casteljau_in_place(&mut tmp, t)
        } else {
            let mut tmp: Vec<Point<S>> = self.points.to_vec();
            de_casteljau_in_place(&mut tmp, t)
        }
    }

    /// Returns an iterator over `step_count + 1` samples evenly spaced over
    /// t in [0, 1], the polyline the demos draw the curve with.
    ///
    /// The canonical rendering uses `step_count = 100` (t increments of 0.01).
    pub fn samples(&self, step_count: usize) -> Samples<'l, S> {
        Samples {
            curve: *self,
            i: 0,
            last: step_count,
        }
    }
}

/// Evaluate the Bézier curve defined by `points` at parameter t.
///
/// Convenience entry point wrapping [`BezierCurve::new`] and
/// [`BezierCurve::sample_with`].
pub fn evaluate<S: Scalar>(
    points: &[Point<S>],
    t: S,
    method: Method,
) -> Result<Point<S>, BezierError> {
    Ok(BezierCurve::new(points)?.sample_with(t, method))
}

fn de_casteljau_in_place<S: Scalar>(points: &mut [Point<S>], t: S) -> Point<S> {
    let mut n = points.len();
    while n > 1 {
        for i in 0..n - 1 {
            points[i] = points[i].lerp(points[i + 1], t);
        }
        n -= 1;
    }

    points[0]
}

/// An iterator over uniformly spaced samples of a curve.
pub struct Samples<'l, S> {
    curve: BezierCurve<'l, S>,
    i: usize,
    last: usize,
}

impl<'l, S: Scalar> Iterator for Samples<'l, S> {
    type Item = Point<S>;

    fn next(&mut self) -> Option<Point<S>> {
        if self.i > self.last {
            return None;
        }

        let t = if self.i == self.last {
            // Land exactly on the last control point.
            S::ONE
        } else {
            S::value(self.i as f32) / S::value(self.last as f32)
        };
        self.i += 1;

        Some(self.curve.sample(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.last + 1 - self.i;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
fn assert_approx_eq<S: Scalar>(a: Point<S>, b: Point<S>, tolerance: S) {
    assert!(
        (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance,
        "{:?} != {:?}",
        a,
        b,
    );
}

#[test]
fn evaluation_methods_agree() {
    let curves: &[&[Point<f64>]] = &[
        &[point(0.0, 0.0), point(10.0, 5.0)],
        &[point(-1.0, 2.0), point(3.0, -4.0), point(7.5, 6.0)],
        &[point(0.0, 0.0), point(1.0, 3.0), point(4.0, 3.0), point(5.0, 0.0)],
        &[
            point(-5.0, -5.0),
            point(-2.0, 8.0),
            point(0.0, -8.0),
            point(2.0, 8.0),
            point(5.0, -5.0),
            point(6.0, 1.0),
        ],
    ];

    for points in curves {
        let curve = BezierCurve::new(points).unwrap();
        // Sweep through [0, 1] and a bit beyond: extrapolation must stay
        // consistent between the two methods as well.
        for i in -20..=120 {
            let t = i as f64 / 100.0;
            assert_approx_eq(curve.sample_direct(t), curve.sample_de_casteljau(t), 1e-9);
        }
    }
}

#[test]
fn degree_one_is_linear_interpolation() {
    let p0 = point(1.0, 2.0);
    let p1 = point(5.0, -6.0);
    let curve_points = [p0, p1];
    let curve = BezierCurve::new(&curve_points).unwrap();

    for i in 0..=10 {
        let t = i as f64 / 10.0;
        let expected = p0 + (p1 - p0) * t;
        assert_approx_eq(curve.sample_direct(t), expected, 1e-12);
        assert_approx_eq(curve.sample_de_casteljau(t), expected, 1e-12);
    }
}

#[test]
fn endpoint_interpolation() {
    let points = [
        point(2.0f64, 3.0),
        point(-1.0, 7.0),
        point(4.0, -2.0),
        point(8.0, 1.0),
    ];
    let curve = BezierCurve::new(&points).unwrap();

    for &method in &[Method::Direct, Method::DeCasteljau] {
        assert_eq!(curve.sample_with(0.0, method), points[0]);
        assert_eq!(curve.sample_with(1.0, method), points[3]);
    }
}

#[test]
fn too_few_control_points() {
    let one = [point(1.0f32, 1.0)];

    assert_eq!(
        BezierCurve::new(&one).err(),
        Some(BezierError::TooFewControlPoints)
    );
    assert_eq!(
        evaluate(&[], 0.5f32, Method::Direct).err(),
        Some(BezierError::TooFewControlPoints)
    );
}

#[test]
fn uniform_samples() {
    let points = [point(0.0f64, 0.0), point(2.0, 4.0), point(4.0, 0.0)];
    let curve = BezierCurve::new(&points).unwrap();

    let samples: std::vec::Vec<_> = curve.samples(100).collect();

    assert_eq!(samples.len(), 101);
    assert_eq!(samples[0], points[0]);
    assert_eq!(samples[100], points[2]);
    // The quadratic midpoint.
    assert_approx_eq(samples[50], point(2.0, 2.0), 1e-12);
}

#[test]
fn high_degree_stability() {
    // 40 control points on the diagonal y = x: the curve must stay on it.
    // Also exercises the heap fallback of the de Casteljau scratch buffer.
    let points: std::vec::Vec<Point<f64>> = (0..40).map(|i| point(i as f64, i as f64)).collect();
    let curve = BezierCurve::new(&points).unwrap();

    for i in 0..=20 {
        let t = i as f64 / 20.0;
        let p = curve.sample(t);
        assert!((p.x - p.y).abs() < 1e-9, "off the diagonal at t={t}: {p:?}");
    }
}

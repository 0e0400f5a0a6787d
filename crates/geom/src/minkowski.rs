//! Minkowski fractal curve generation.
//!
//! Each subdivision level replaces every segment of the polyline with a
//! fixed 8-segment staircase motif expressed in the segment's local frame,
//! so a segment subdivided at depth `d` produces `8^d + 1` points.

use crate::scalar::Scalar;
use crate::{point, vector, Box2D, Point, Vector};

use alloc::vec;
use alloc::vec::Vec;
use thiserror::Error;

/// Maximum supported subdivision depth.
///
/// Depth 8 already produces `8^8 + 1` (about 16.7 million) points per
/// segment; deeper subdivision is rejected rather than exhausting memory.
pub const MAX_DEPTH: u32 = 8;

/// Error type of the Minkowski curve generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MinkowskiError {
    /// The segment's endpoints coincide, so it has no direction to build
    /// the motif frame from.
    #[error("cannot generate a fractal curve over a zero-length segment")]
    DegenerateSegment,
    /// The requested depth exceeds [`MAX_DEPTH`].
    #[error("subdivision depth {0} exceeds the supported maximum of {max}", max = MAX_DEPTH)]
    DepthLimitExceeded(u32),
}

/// Generates the Minkowski fractal polyline over a segment.
///
/// Depth 0 returns exactly `[from, to]`; every further level replaces each
/// segment with the staircase motif, keeping shared join points once. The
/// result always starts with `from` and ends with `to`.
///
/// Zero-length segments are rejected at every depth, including 0, so that
/// the contract does not depend on the requested depth. The same error is
/// reported when the motif offsets of a sub-segment vanish under
/// floating-point rounding (coordinates of extreme magnitude): the polyline
/// never contains duplicate consecutive points or non-finite coordinates.
pub fn generate<S: Scalar>(
    from: Point<S>,
    to: Point<S>,
    depth: u32,
) -> Result<Vec<Point<S>>, MinkowskiError> {
    if from == to {
        return Err(MinkowskiError::DegenerateSegment);
    }
    if depth > MAX_DEPTH {
        return Err(MinkowskiError::DepthLimitExceeded(depth));
    }

    // Level-by-level expansion instead of recursing into each sub-segment:
    // the work list is the polyline itself.
    let mut points = vec![from, to];
    for _ in 0..depth {
        let mut subdivided = Vec::with_capacity((points.len() - 1) * 8 + 1);
        subdivided.push(points[0]);
        for pair in points.windows(2) {
            append_motif(pair[0], pair[1], &mut subdivided)?;
        }
        points = subdivided;
    }

    Ok(points)
}

/// Generates a closed Minkowski fractal outline of a rectangle.
///
/// One [`generate`] call per side, corner points kept once. The polyline
/// is closed: its last point repeats the first.
pub fn square_outline<S: Scalar>(
    rect: &Box2D<S>,
    depth: u32,
) -> Result<Vec<Point<S>>, MinkowskiError> {
    let corners = [
        rect.min,
        point(rect.max.x, rect.min.y),
        rect.max,
        point(rect.min.x, rect.max.y),
    ];

    let mut outline = Vec::new();
    for i in 0..4 {
        let side = generate(corners[i], corners[(i + 1) % 4], depth)?;
        if i == 0 {
            outline.extend_from_slice(&side);
        } else {
            outline.extend_from_slice(&side[1..]);
        }
    }

    Ok(outline)
}

// The staircase motif as cumulative (along, across) offsets in units of
// segment length, `across` measured along the perpendicular `(-uy, ux)`.
// This exact sequence defines the fractal's shape.
fn motif<S: Scalar>() -> [(S, S); 9] {
    let z = S::ZERO;
    let q = S::QUARTER;
    let h = S::HALF;
    let t = S::value(0.75);
    [
        (z, z),
        (q, z),
        (q, -q),
        (h, -q),
        (h, z),
        (h, q),
        (t, q),
        (t, z),
        (S::ONE, z),
    ]
}

// Appends the 8 motif points following `from` (the caller owns `from`
// itself). The final motif point is `to` exactly, not recomputed through
// the frame mapping, so join points are bit-identical across levels.
//
// When a motif point rounds onto its predecessor the segment is too short
// for its coordinates' magnitude: fail rather than emit a duplicate that
// the next level would subdivide into NaN.
fn append_motif<S: Scalar>(
    from: Point<S>,
    to: Point<S>,
    out: &mut Vec<Point<S>>,
) -> Result<(), MinkowskiError> {
    let v = to - from;
    let length = v.length();
    let unit = v / length;
    let perp: Vector<S> = vector(-unit.y, unit.x);

    let motif = motif::<S>();
    let mut prev = from;
    for &(along, across) in &motif[1..8] {
        let p = from + unit * (along * length) + perp * (across * length);
        if p == prev {
            return Err(MinkowskiError::DegenerateSegment);
        }
        out.push(p);
        prev = p;
    }
    if to == prev {
        return Err(MinkowskiError::DegenerateSegment);
    }
    out.push(to);

    Ok(())
}

#[cfg(test)]
use std::vec::Vec as StdVec;

#[test]
fn depth_zero_is_the_segment() {
    let from = point(1.0f64, 2.0);
    let to = point(5.0, -3.0);

    assert_eq!(generate(from, to, 0).unwrap(), vec![from, to]);
}

#[test]
fn motif_shape_at_depth_one() {
    // A horizontal segment of length 4 makes every motif point land on
    // integer coordinates. The perpendicular of (1, 0) is (0, 1), so the
    // first indentation dips to negative y.
    let curve = generate(point(0.0f64, 0.0), point(4.0, 0.0), 1).unwrap();

    let expected: StdVec<Point<f64>> = vec![
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, -1.0),
        point(2.0, -1.0),
        point(2.0, 0.0),
        point(2.0, 1.0),
        point(3.0, 1.0),
        point(3.0, 0.0),
        point(4.0, 0.0),
    ];

    assert_eq!(curve, expected);
}

#[test]
fn point_counts() {
    let from = point(0.0f64, 0.0);
    let to = point(10.0, 0.0);

    for depth in 0..=4 {
        let curve = generate(from, to, depth).unwrap();
        assert_eq!(curve.len(), 8usize.pow(depth) + 1);
        assert_eq!(curve[0], from);
        assert_eq!(*curve.last().unwrap(), to);
    }
}

#[test]
fn self_similarity_at_depth_boundaries() {
    let from = point(-3.0f64, 1.0);
    let to = point(6.0, 4.0);

    for depth in 1..=2 {
        let coarse = generate(from, to, depth - 1).unwrap();
        let fine = generate(from, to, depth).unwrap();
        for (i, p) in coarse.iter().enumerate() {
            assert_eq!(fine[i * 8], *p);
        }
    }
}

#[test]
fn degenerate_segment() {
    let p = point(2.0f32, 2.0);

    for depth in 0..3 {
        assert_eq!(
            generate(p, p, depth).err(),
            Some(MinkowskiError::DegenerateSegment)
        );
    }
}

#[test]
fn precision_floor_is_rejected() {
    // At x ≈ 1e16 the f64 spacing is 2.0, so the motif offsets of a
    // length-2 segment round away entirely. Subdividing must report the
    // segment as degenerate instead of emitting duplicate consecutive
    // points (and NaN one level further down).
    let from = point(1.0e16f64, 0.0);
    let to = point(1.0e16 + 2.0, 0.0);

    for depth in 1..=3 {
        assert_eq!(
            generate(from, to, depth).err(),
            Some(MinkowskiError::DegenerateSegment)
        );
    }

    // Depth 0 never builds the motif frame and stays exact.
    assert_eq!(generate(from, to, 0).unwrap(), vec![from, to]);
}

#[test]
fn no_duplicate_consecutive_points() {
    let curve = generate(point(-3.0f64, 1.0), point(6.0, 4.0), 3).unwrap();

    for pair in curve.windows(2) {
        assert_ne!(pair[0], pair[1]);
        assert!(pair[1].x.is_finite() && pair[1].y.is_finite());
    }
}

#[test]
fn error_display() {
    use alloc::string::ToString;

    assert_eq!(
        MinkowskiError::DegenerateSegment.to_string(),
        "cannot generate a fractal curve over a zero-length segment"
    );
    assert_eq!(
        MinkowskiError::DepthLimitExceeded(9).to_string(),
        "subdivision depth 9 exceeds the supported maximum of 8"
    );
}

#[test]
fn depth_limit() {
    assert_eq!(
        generate(point(0.0f32, 0.0), point(1.0, 0.0), MAX_DEPTH + 1).err(),
        Some(MinkowskiError::DepthLimitExceeded(MAX_DEPTH + 1))
    );
}

#[test]
fn closed_square_outline() {
    let rect = Box2D {
        min: point(0.0f64, 0.0),
        max: point(4.0, 4.0),
    };

    for depth in 0..3 {
        let outline = square_outline(&rect, depth).unwrap();
        // Four sides sharing corners, closed back onto the first point.
        assert_eq!(outline.len(), 4 * 8usize.pow(depth) + 1);
        assert_eq!(outline[0], rect.min);
        assert_eq!(*outline.last().unwrap(), rect.min);
    }
}

#[test]
fn degenerate_square_outline() {
    let rect = Box2D {
        min: point(1.0f32, 1.0),
        max: point(1.0, 1.0),
    };

    assert_eq!(
        square_outline(&rect, 1).err(),
        Some(MinkowskiError::DegenerateSegment)
    );
}

#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! Curve math behind a set of 2D plotting demos.
//!
//! This crate is reexported in [grafika](https://docs.rs/grafika/).
//!
//! # Overview.
//!
//! This crate implements the maths to work with:
//!
//! - Bézier curves of arbitrary degree, evaluated either directly in the
//!   Bernstein basis or with de Casteljau's algorithm,
//! - Minkowski fractal curves, generated by recursively replacing a line
//!   segment with a fixed staircase motif.
//!
//! Both are pure computations over euclid's default-unit points and vectors:
//! drawing the resulting polylines is left to the caller.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod bezier;
pub mod minkowski;

#[doc(inline)]
pub use crate::bezier::{evaluate, BezierCurve, BezierError, Method};
#[doc(inline)]
pub use crate::minkowski::{generate, square_outline, MinkowskiError};

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use euclid::Trig;
    pub(crate) use num_traits::{Float, FloatConst, NumCast};

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + NumCast
        + FloatConst
        + Sized
        + Display
        + Debug
        + Trig
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const HALF: Self;
        const QUARTER: Self;

        const EPSILON: Self;

        fn value(v: f32) -> Self;
    }

    impl Scalar for f32 {
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const HALF: Self = 0.5;
        const QUARTER: Self = 0.25;

        const EPSILON: Self = 1e-4;

        #[inline]
        fn value(v: f32) -> Self {
            v
        }
    }

    impl Scalar for f64 {
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const HALF: Self = 0.5;
        const QUARTER: Self = 0.25;

        const EPSILON: Self = 1e-8;

        #[inline]
        fn value(v: f32) -> Self {
            v as f64
        }
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Alias for `euclid::default::Box2D`
pub use euclid::default::Box2D;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}

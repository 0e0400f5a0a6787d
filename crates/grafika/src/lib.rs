#![deny(bare_trait_objects)]

//! Curve and fractal math behind a set of 2D plotting demos.
//!
//! # Crates
//!
//! This meta-crate (`grafika`) reexports the following sub-crates for
//! convenience:
//!
//! * **grafika_geom** - Bézier curve evaluation and Minkowski fractal
//!   curve generation on top of euclid.
//! * **grafika_fractal** - Escape-time cotangent fractal engine with HSL
//!   coloring and row-parallel rendering.
//!
//! Each `grafika_<name>` crate is reexported as a `<name>` module. For
//! example `grafika_geom::BezierCurve` is also `grafika::geom::BezierCurve`.
//!
//! # Feature flags
//!
//! Serialization of the public value types with serde can be enabled with
//! the `serialization` feature flag (disabled by default).

pub use grafika_fractal as fractal;
pub use grafika_geom as geom;

pub use geom::{point, vector, Box2D, Point, Vector};

#[test]
fn reexports() {
    let points = [point(0.0f64, 0.0), point(1.0, 1.0)];
    let sample = geom::evaluate(&points, 0.5, geom::Method::DeCasteljau).unwrap();

    assert_eq!(sample, point(0.5, 0.5));
}

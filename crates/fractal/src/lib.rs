#![deny(bare_trait_objects)]

//! Escape-time fractal engine behind the grafika demos.
//!
//! This crate is reexported in [grafika](https://docs.rs/grafika/).
//!
//! The engine iterates the cotangent-based Julia-style map
//!
//! ```z ← cot(z)² + c```
//!
//! from each plane sample and classifies the sample by how many iterations
//! it takes for the magnitude to escape a configured radius. Samples that
//! never escape are "in the set" and rendered black, escaped samples are
//! colored by walking the HSL hue wheel with the iteration count.
//!
//! Every sample is classified independently of all others, so the renderer
//! distributes pixel rows across a rayon thread pool.

// Reexport dependencies.
pub use num_complex;
pub use rayon;

pub mod color;
pub mod engine;
pub mod render;

#[doc(inline)]
pub use crate::color::{hsl_to_rgb, sample_color, Rgb};
#[doc(inline)]
pub use crate::engine::{evaluate, FractalConfig, FractalSample};
#[doc(inline)]
pub use crate::render::{render, Viewport};

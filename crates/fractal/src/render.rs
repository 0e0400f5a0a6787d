//! Row-parallel rendering of the classified plane into an RGB buffer.

use grafika_geom::Box2D;
use num_complex::Complex64;
use rayon::prelude::*;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::color::{sample_color, Rgb};
use crate::engine::{evaluate, FractalConfig};

#[cfg(test)]
use grafika_geom::point;

/// The plane rectangle and pixel resolution of a render pass.
///
/// Pixel `(0, 0)` is the top-left corner: x grows to the right towards
/// `area.max.x` and y grows downward towards `area.min.y`, matching the
/// canvas orientation of the demos.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Viewport {
    /// The sampled rectangle of the complex plane.
    pub area: Box2D<f64>,
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
}

impl Viewport {
    /// The plane coordinates of a pixel's center.
    pub fn sample_at(&self, x: u32, y: u32) -> Complex64 {
        let fx = (x as f64 + 0.5) / self.width as f64;
        let fy = (y as f64 + 0.5) / self.height as f64;

        Complex64::new(
            self.area.min.x + fx * (self.area.max.x - self.area.min.x),
            self.area.max.y - fy * (self.area.max.y - self.area.min.y),
        )
    }
}

/// Renders the configured fractal into a row-major RGB buffer of
/// `width · height` pixels.
///
/// Samples are independent, so pixel rows are distributed across the rayon
/// thread pool; every worker produces its own rows and the buffer is
/// assembled at the end.
pub fn render(view: &Viewport, config: &FractalConfig) -> Vec<Rgb> {
    let view = *view;
    let config = *config;

    (0..view.height)
        .into_par_iter()
        .flat_map_iter(move |y| {
            (0..view.width)
                .map(move |x| sample_color(evaluate(view.sample_at(x, y), &config), config.max_iterations))
        })
        .collect()
}

#[cfg(test)]
fn test_viewport() -> Viewport {
    Viewport {
        area: Box2D {
            min: point(-2.0, -1.0),
            max: point(2.0, 1.0),
        },
        width: 16,
        height: 8,
    }
}

#[test]
fn pixel_centers() {
    let view = test_viewport();

    // The top-left pixel center sits half a pixel into the area.
    assert_eq!(view.sample_at(0, 0), Complex64::new(-1.875, 0.875));
    // The bottom-right one mirrors it.
    assert_eq!(view.sample_at(15, 7), Complex64::new(1.875, -0.875));
}

#[test]
fn buffer_shape() {
    let buffer = render(&test_viewport(), &FractalConfig::default());

    assert_eq!(buffer.len(), 16 * 8);
}

#[test]
fn render_is_deterministic() {
    let view = test_viewport();
    let config = FractalConfig::default();

    assert_eq!(render(&view, &config), render(&view, &config));
}

#[test]
fn far_field_escapes_are_colored() {
    // A viewport far away from the origin along the imaginary axis: every
    // sample starts outside the escape radius and escapes immediately.
    let view = Viewport {
        area: Box2D {
            min: point(-1.0, 90.0),
            max: point(1.0, 100.0),
        },
        width: 4,
        height: 4,
    };
    let config = FractalConfig::default();

    for pixel in render(&view, &config) {
        assert_ne!(pixel, Rgb::BLACK);
    }
}

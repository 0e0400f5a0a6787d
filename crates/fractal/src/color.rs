//! Mapping sample classifications to colors.
//!
//! Escaped samples walk the hue wheel with their iteration count at fixed
//! saturation and lightness; bounded samples are always black.

use crate::engine::FractalSample;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Saturation of the escape color ramp.
const RAMP_SATURATION: f64 = 0.8;

/// Lightness of the escape color ramp.
const RAMP_LIGHTNESS: f64 = 0.5;

/// An 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
}

/// The display color of a classified sample.
///
/// `hue = iterations / max_iterations · 360`, so early escapes are red and
/// the ramp wraps around the wheel as counts approach the budget.
pub fn sample_color(sample: FractalSample, max_iterations: u32) -> Rgb {
    if sample.is_bounded() {
        return Rgb::BLACK;
    }

    let hue = (sample.iterations as f64 / max_iterations as f64 * 360.0) % 360.0;
    hsl_to_rgb(hue, RAMP_SATURATION, RAMP_LIGHTNESS)
}

/// Standard HSL to RGB conversion.
///
/// Hue in degrees (wrapped into [0, 360)), saturation and lightness in
/// [0, 1].
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    if saturation == 0.0 {
        // Achromatic.
        let v = channel(lightness);
        return Rgb { r: v, g: v, b: v };
    }

    let h = (hue / 360.0).rem_euclid(1.0);
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    Rgb {
        r: channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        g: channel(hue_to_channel(p, q, h)),
        b: channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round() as u8
}

#[test]
fn bounded_samples_are_black() {
    for &max_iterations in &[1, 50, 100, 1000] {
        let sample = FractalSample {
            iterations: max_iterations,
            escaped: false,
        };

        assert_eq!(sample_color(sample, max_iterations), Rgb::BLACK);
    }
}

#[test]
fn early_escape_is_red() {
    let sample = FractalSample {
        iterations: 0,
        escaped: true,
    };

    // Hue 0 of the ramp: strongly red, equal small green and blue.
    let color = sample_color(sample, 100);
    assert!(color.r > 200);
    assert!(color.g < 40);
    assert_eq!(color.g, color.b);
}

#[test]
fn hsl_primaries_and_grays() {
    assert_eq!(
        hsl_to_rgb(120.0, 1.0, 0.5),
        Rgb { r: 0, g: 255, b: 0 }
    );
    assert_eq!(
        hsl_to_rgb(0.0, 1.0, 0.5),
        Rgb { r: 255, g: 0, b: 0 }
    );
    assert_eq!(
        hsl_to_rgb(0.0, 1.0, 1.0),
        Rgb {
            r: 255,
            g: 255,
            b: 255
        }
    );
    // Zero saturation is achromatic regardless of hue.
    assert_eq!(
        hsl_to_rgb(123.0, 0.0, 0.5),
        Rgb {
            r: 128,
            g: 128,
            b: 128
        }
    );
}

#[test]
fn hue_wraps_around_the_wheel() {
    assert_eq!(hsl_to_rgb(360.0, 0.8, 0.5), hsl_to_rgb(0.0, 0.8, 0.5));
    assert_eq!(hsl_to_rgb(720.0, 0.8, 0.5), hsl_to_rgb(0.0, 0.8, 0.5));
    assert_eq!(hsl_to_rgb(-360.0, 0.8, 0.5), hsl_to_rgb(0.0, 0.8, 0.5));
}

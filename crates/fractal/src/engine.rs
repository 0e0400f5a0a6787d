//! Per-sample escape-time iteration of `z ← cot(z)² + c`.

use num_complex::Complex64;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use std::f64::consts::PI;

/// Distance to a cotangent pole under which a sample is classified as
/// bounded without iterating. The map is undefined at the poles `k·π`.
const POLE_TOLERANCE: f64 = 0.01;

/// Below this squared magnitude the cotangent denominator is treated as
/// zero and replaced by the deterministic noise fallback.
const SINGULARITY_EPSILON: f64 = 1e-10;

/// Hard abort threshold on `|z|²`, guarding against numerical blow-up
/// seeded by the singularity fallback.
const BLOW_UP_LIMIT: f64 = 1e12;

/// Configuration of the escape-time iteration, read once per render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FractalConfig {
    /// Iteration budget per sample; reaching it classifies the sample as
    /// bounded. Must be greater than zero.
    pub max_iterations: u32,
    /// Escape threshold on the magnitude of z. Must be greater than zero.
    pub escape_radius: f64,
    /// The Julia constant c added after squaring the cotangent.
    pub c: Complex64,
}

impl Default for FractalConfig {
    fn default() -> Self {
        FractalConfig {
            max_iterations: 100,
            escape_radius: 2.0,
            c: Complex64::new(-0.2, 0.65),
        }
    }
}

/// Classification of a single plane sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FractalSample {
    /// Number of iterations performed; equal to the configured
    /// `max_iterations` when the sample never escaped.
    pub iterations: u32,
    /// Whether the iteration escaped before exhausting its budget.
    pub escaped: bool,
}

impl FractalSample {
    /// True when the sample is in the set (rendered black).
    #[inline]
    pub fn is_bounded(&self) -> bool {
        !self.escaped
    }
}

/// Classifies one sample of the complex plane.
///
/// Pure function of its inputs: numerical edge cases (poles of the
/// cotangent, near-zero denominators, non-finite intermediates) are
/// absorbed here and only ever surface as a classification, never as an
/// error or a panic.
pub fn evaluate(z0: Complex64, config: &FractalConfig) -> FractalSample {
    if near_pole(z0) {
        return FractalSample {
            iterations: config.max_iterations,
            escaped: false,
        };
    }

    let escape_sq = config.escape_radius * config.escape_radius;
    let mut z = z0;
    let mut iterations = 0;
    while iterations < config.max_iterations && z.norm_sqr() < escape_sq {
        let cot = match cotangent(z) {
            Some(w) => w,
            None => singularity_fallback(z),
        };

        let next = cot * cot + config.c;
        if !next.re.is_finite() || !next.im.is_finite() {
            // Fail soft: stop counting rather than propagate NaN.
            break;
        }

        z = next;
        iterations += 1;

        if z.norm_sqr() > BLOW_UP_LIMIT {
            break;
        }
    }

    FractalSample {
        iterations,
        escaped: iterations < config.max_iterations,
    }
}

// The poles of cot lie on the real axis at integer multiples of π.
fn near_pole(z: Complex64) -> bool {
    if z.im.abs() >= POLE_TOLERANCE {
        return false;
    }

    let nearest = (z.re / PI).round() * PI;
    (z.re - nearest).abs() < POLE_TOLERANCE
}

/// `cot(z) = i·(e^{2iz} + 1) / (e^{2iz} - 1)`, computed through the real
/// exponential decomposition `e^{2iz} = e^{-2·im}·(cos 2·re, sin 2·re)`.
///
/// Returns `None` when the denominator is numerically zero.
fn cotangent(z: Complex64) -> Option<Complex64> {
    let exp_term = (-2.0 * z.im).exp();
    let exp_2iz = Complex64::new(exp_term * (2.0 * z.re).cos(), exp_term * (2.0 * z.re).sin());

    let numerator = exp_2iz + 1.0;
    let denominator = exp_2iz - 1.0;
    if denominator.norm_sqr() < SINGULARITY_EPSILON {
        return None;
    }

    Some(Complex64::i() * (numerator / denominator))
}

// Stand-in for an unrenderable point right next to a pole: a large value
// that sends the orbit off to escape, keyed on the sample's bit pattern so
// that repeated renders agree exactly.
fn singularity_fallback(z: Complex64) -> Complex64 {
    let seed = z.re.to_bits() ^ z.im.to_bits().rotate_left(32);
    let radius = 500.0 + 1.0e3 * hash_to_unit(seed);
    let angle = 2.0 * PI * hash_to_unit(seed.wrapping_add(0x9e37_79b9_7f4a_7c15));

    Complex64::new(radius * angle.cos(), radius * angle.sin())
}

// splitmix64 finalizer mapped to [0, 1).
fn hash_to_unit(bits: u64) -> f64 {
    let mut x = bits;
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^= x >> 31;

    (x >> 11) as f64 / (1u64 << 53) as f64
}

#[test]
fn poles_are_bounded() {
    let configs = [
        FractalConfig::default(),
        FractalConfig {
            max_iterations: 7,
            escape_radius: 10.0,
            c: Complex64::new(0.3, -0.1),
        },
    ];

    let poles = [
        Complex64::new(0.0, 0.0),
        Complex64::new(PI, 0.0),
        Complex64::new(-3.0 * PI, 0.005),
        Complex64::new(2.0 * PI + 0.009, -0.009),
    ];

    for config in &configs {
        for &pole in &poles {
            let sample = evaluate(pole, config);
            assert!(sample.is_bounded());
            assert_eq!(sample.iterations, config.max_iterations);
        }
    }
}

#[test]
fn large_samples_escape_quickly() {
    let config = FractalConfig {
        max_iterations: 100,
        escape_radius: 2.0,
        c: Complex64::new(0.0, 0.0),
    };

    for &z0 in &[
        Complex64::new(0.0, 50.0),
        Complex64::new(200.0, -3.0),
        Complex64::new(-40.0, 40.0),
    ] {
        let sample = evaluate(z0, &config);
        assert!(sample.escaped);
        assert!(sample.iterations <= 2);
    }
}

#[test]
fn evaluation_is_deterministic() {
    let config = FractalConfig::default();

    // Includes samples right outside the pole tolerance, where orbits pass
    // closest to the deterministic singularity fallback.
    let samples = [
        Complex64::new(0.02, 0.0),
        Complex64::new(1.3, 0.4),
        Complex64::new(-0.7, -1.1),
        Complex64::new(PI + 0.0100001, 0.0),
    ];

    for &z0 in &samples {
        assert_eq!(evaluate(z0, &config), evaluate(z0, &config));
    }
}

#[test]
fn singularity_fallback_is_reproducible() {
    // Orbits only hit the fallback when an iterate lands within ~1e-5 of a
    // pole, which no fixed starting sample reliably does, so exercise it
    // directly: same input, same noise, and always far outside the escape
    // radius so the orbit is sent off to escape.
    let poles = [
        Complex64::new(PI, 1.0e-9),
        Complex64::new(-2.0 * PI, -1.0e-9),
        Complex64::new(0.0, 0.0),
    ];

    for &z in &poles {
        let noise = singularity_fallback(z);
        assert_eq!(noise, singularity_fallback(z));
        assert!(noise.norm_sqr() >= 499.0 * 499.0);
    }

    assert_ne!(
        singularity_fallback(poles[0]),
        singularity_fallback(poles[1])
    );
}

#[test]
fn iteration_count_never_exceeds_budget() {
    let config = FractalConfig {
        max_iterations: 25,
        escape_radius: 2.0,
        c: Complex64::new(-0.2, 0.65),
    };

    for i in -10..=10 {
        for j in -10..=10 {
            let z0 = Complex64::new(i as f64 * 0.3, j as f64 * 0.3);
            let sample = evaluate(z0, &config);
            assert!(sample.iterations <= config.max_iterations);
            assert_eq!(sample.escaped, sample.iterations < config.max_iterations);
        }
    }
}

//! The Sholl profile and its derived variants.
//!
//! A [`Profile`] is the ordered sequence of (radius, intersection count)
//! pairs produced by the sampler, one entry per scheduled radius. Transforms
//! never mutate their input: filtering, normalization and the log transforms
//! each allocate a fresh profile, so the raw samples stay available for
//! tabular output alongside every derived variant.

use crate::params::{Dim, Normalizer};
use serde::Serialize;
use std::f64::consts::PI;

/// One sampled shell: radius in physical units and the (possibly binned)
/// intersection count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub radius: f64,
    pub count: f64,
}

/// Ordered radius-vs-intersections samples. Insertion order equals radius
/// order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Profile {
    points: Vec<ProfilePoint>,
}

impl Profile {
    pub fn new(points: Vec<ProfilePoint>) -> Self {
        Self { points }
    }

    /// Profile with all counts at zero, one entry per scheduled radius. The
    /// sampler fills counts in place; entries past a cancellation point keep
    /// their zero.
    pub(crate) fn zeroed(radii: &[f64]) -> Self {
        Self {
            points: radii
                .iter()
                .map(|&radius| ProfilePoint { radius, count: 0.0 })
                .collect(),
        }
    }

    pub(crate) fn set_count(&mut self, index: usize, count: f64) {
        self.points[index].count = count;
    }

    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn radii(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.radius).collect()
    }

    pub fn counts(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.count).collect()
    }

    /// Retain pairs where both radius and count are strictly positive.
    ///
    /// Zero intersections are problematic for logs and polynomial fits: long
    /// stretches of zeros (discontinuous arbors) produce sharp bumps on the
    /// fitted curve, so they are removed before any fitting.
    pub fn non_zero(&self) -> Profile {
        Profile {
            points: self
                .points
                .iter()
                .filter(|p| p.radius > 0.0 && p.count > 0.0)
                .copied()
                .collect(),
        }
    }

    /// Divide each count by the geometric normalizer of its shell.
    ///
    /// `step` is the radius step of the schedule, used by the annulus/shell
    /// normalizer (`r₁ = r − step/2`, `r₂ = r + step/2`).
    pub fn normalized(&self, normalizer: Normalizer, dim: Dim, step: f64) -> Profile {
        Profile {
            points: self
                .points
                .iter()
                .map(|p| ProfilePoint {
                    radius: p.radius,
                    count: p.count / normalizer_value(normalizer, dim, p.radius, step),
                })
                .collect(),
        }
    }

    /// Natural log of the radius axis (producing log-log from semi-log).
    pub fn log_x(&self) -> Profile {
        Profile {
            points: self
                .points
                .iter()
                .map(|p| ProfilePoint {
                    radius: p.radius.ln(),
                    count: p.count,
                })
                .collect(),
        }
    }

    /// Natural log of the count axis (producing semi-log from linear-norm).
    pub fn log_y(&self) -> Profile {
        Profile {
            points: self
                .points
                .iter()
                .map(|p| ProfilePoint {
                    radius: p.radius,
                    count: p.count.ln(),
                })
                .collect(),
        }
    }
}

fn normalizer_value(normalizer: Normalizer, dim: Dim, r: f64, step: f64) -> f64 {
    match (normalizer, dim) {
        (Normalizer::Area, Dim::TwoD) => PI * r * r,
        (Normalizer::Area, Dim::ThreeD) => PI * r * r * r * 4.0 / 3.0,
        (Normalizer::Perimeter, Dim::TwoD) => 2.0 * PI * r,
        (Normalizer::Perimeter, Dim::ThreeD) => 4.0 * PI * r * r,
        (Normalizer::Annulus, dim) => {
            let r1 = r - step / 2.0;
            let r2 = r + step / 2.0;
            match dim {
                Dim::TwoD => PI * (r2 * r2 - r1 * r1),
                Dim::ThreeD => PI * 4.0 / 3.0 * (r2 * r2 * r2 - r1 * r1 * r1),
            }
        }
    }
}

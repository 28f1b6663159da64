use crate::params::DescriptorParams;
use crate::profile::Profile;
use serde::Serialize;

const VARIANCE_FLOOR: f64 = 1e-12;
const AREA_FLOOR: f64 = 1e-12;

/// Population moments of a univariate sample.
///
/// Skewness and kurtosis (excess) are absent when the variance is too close
/// to zero for the standardized moments to be meaningful.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

/// Mean, variance and the third/fourth standardized moments, computed from
/// running power sums (population formulas, not sample-corrected).
pub fn moments(values: &[f64]) -> Moments {
    let n = values.len() as f64;
    let (mut sum1, mut sum2, mut sum3, mut sum4) = (0.0, 0.0, 0.0, 0.0);
    for &v in values {
        let v2 = v * v;
        sum1 += v;
        sum2 += v2;
        sum3 += v * v2;
        sum4 += v2 * v2;
    }
    let mean = sum1 / n;
    let mean2 = mean * mean;
    let variance = sum2 / n - mean2;
    if variance <= VARIANCE_FLOOR {
        return Moments {
            mean,
            variance,
            skewness: None,
            kurtosis: None,
        };
    }
    let std = variance.sqrt();
    let skewness = ((sum3 - 3.0 * mean * sum2) / n + 2.0 * mean * mean2) / (variance * std);
    let kurtosis = ((sum4 - 4.0 * mean * sum3 + 6.0 * mean2 * sum2) / n - 3.0 * mean2 * mean2)
        / (variance * variance)
        - 3.0;
    Moments {
        mean,
        variance,
        skewness: Some(skewness),
        kurtosis: Some(kurtosis),
    }
}

pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid] + sorted[mid - 1]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Centroid of the closed polygon traced by the profile points, via the
/// shoelace formula. Absent when the enclosed area is near zero (collinear or
/// self-cancelling paths).
pub(crate) fn polygon_centroid(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let mut area = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for i in 1..xs.len() {
        let cross = xs[i - 1] * ys[i] - xs[i] * ys[i - 1];
        sum_x += (xs[i - 1] + xs[i]) * cross;
        sum_y += (ys[i - 1] + ys[i]) * cross;
        area += cross / 2.0;
    }
    if area.abs() <= AREA_FLOOR {
        return None;
    }
    Some((sum_x / (6.0 * area), sum_y / (6.0 * area)))
}

/// Statistics of the sampled (non-zero filtered) linear profile.
#[derive(Clone, Debug, Serialize)]
pub struct ProfileStats {
    /// Number of radii with at least one intersection.
    pub intersecting_radii: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    /// Highest sampled intersection count and the radius where it occurs
    /// (first occurrence on ties).
    pub max_count: f64,
    pub max_count_radius: f64,
    /// Max intersections divided by the number of primary branches (sampled
    /// Schoenen ramification index).
    pub ramification_index: f64,
    /// Primary-branch count actually used: the configured value, or the count
    /// at the first sampled radius when inferred.
    pub primary_branches: f64,
    pub centroid_radius: Option<f64>,
    pub centroid_count: Option<f64>,
    /// Largest radius whose count still meets the enclosing cutoff; NaN when
    /// no radius qualifies.
    pub enclosing_radius: f64,
}

impl ProfileStats {
    /// Compute sampled-profile statistics. Returns `None` for an empty
    /// (all-zero) filtered profile.
    pub fn compute(filtered: &Profile, params: &DescriptorParams) -> Option<Self> {
        if filtered.is_empty() {
            return None;
        }
        let xs = filtered.radii();
        let ys = filtered.counts();

        let mut max_count = 0.0f64;
        let mut max_count_radius = 0.0f64;
        let mut sum = 0.0;
        let mut enclosing_radius = f64::NAN;
        for (&x, &y) in xs.iter().zip(&ys) {
            if y > max_count {
                max_count = y;
                max_count_radius = x;
            }
            if y >= params.enclosing_cutoff {
                enclosing_radius = x;
            }
            sum += y;
        }

        let m = moments(&ys);
        let primary = params.primary_divisor(ys[0]);
        let centroid = polygon_centroid(&xs, &ys);
        Some(Self {
            intersecting_radii: filtered.len(),
            sum,
            mean: m.mean,
            median: median(&ys),
            skewness: m.skewness,
            kurtosis: m.kurtosis,
            max_count,
            max_count_radius,
            ramification_index: max_count / primary,
            primary_branches: primary,
            centroid_radius: centroid.map(|c| c.0),
            centroid_count: centroid.map(|c| c.1),
            enclosing_radius,
        })
    }

    /// Tabular rows for export; absent descriptors are skipped.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut rows = vec![
            ("Intersecting radii", self.intersecting_radii as f64),
            ("Sum inters.", self.sum),
            ("Mean inters.", self.mean),
            ("Median inters.", self.median),
        ];
        if let Some(skewness) = self.skewness {
            rows.push(("Skewness (sampled)", skewness));
        }
        if let Some(kurtosis) = self.kurtosis {
            rows.push(("Kurtosis (sampled)", kurtosis));
        }
        rows.push(("Max inters.", self.max_count));
        rows.push(("Max inters. radius", self.max_count_radius));
        rows.push(("Ramification index (sampled)", self.ramification_index));
        if let Some(radius) = self.centroid_radius {
            rows.push(("Centroid radius", radius));
        }
        if let Some(count) = self.centroid_count {
            rows.push(("Centroid value", count));
        }
        rows.push(("Enclosing radius", self.enclosing_radius));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfilePoint;

    fn profile(pairs: &[(f64, f64)]) -> Profile {
        Profile::new(
            pairs
                .iter()
                .map(|&(radius, count)| ProfilePoint { radius, count })
                .collect(),
        )
    }

    #[test]
    fn moments_match_hand_computed_values() {
        // Values 1, 2, 3, 4: mean 2.5, population variance 1.25, symmetric
        // (zero skewness), platykurtic.
        let m = moments(&[1.0, 2.0, 3.0, 4.0]);
        assert!((m.mean - 2.5).abs() < 1e-12);
        assert!((m.variance - 1.25).abs() < 1e-12);
        assert!(m.skewness.unwrap().abs() < 1e-12);
        assert!((m.kurtosis.unwrap() + 1.36).abs() < 1e-12);
    }

    #[test]
    fn moments_are_absent_for_constant_data() {
        let m = moments(&[3.0, 3.0, 3.0]);
        assert!(m.skewness.is_none());
        assert!(m.kurtosis.is_none());
    }

    #[test]
    fn median_handles_even_and_odd_sizes() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn empty_profile_yields_no_stats() {
        assert!(ProfileStats::compute(&profile(&[]), &DescriptorParams::default()).is_none());
    }

    #[test]
    fn max_and_enclosing_follow_tie_break_rules() {
        let p = profile(&[(5.0, 2.0), (10.0, 4.0), (15.0, 4.0), (20.0, 1.0)]);
        let stats = ProfileStats::compute(&p, &DescriptorParams::default()).unwrap();
        // First maximum wins.
        assert_eq!(stats.max_count, 4.0);
        assert_eq!(stats.max_count_radius, 10.0);
        // Largest radius with count >= 1.
        assert_eq!(stats.enclosing_radius, 20.0);
        assert_eq!(stats.sum, 11.0);
    }

    #[test]
    fn enclosing_radius_is_nan_below_cutoff() {
        let p = profile(&[(5.0, 2.0), (10.0, 3.0)]);
        let params = DescriptorParams {
            enclosing_cutoff: 5.0,
            ..Default::default()
        };
        let stats = ProfileStats::compute(&p, &params).unwrap();
        assert!(stats.enclosing_radius.is_nan());
    }

    #[test]
    fn ramification_index_infers_primary_branches() {
        let p = profile(&[(5.0, 2.0), (10.0, 8.0), (15.0, 4.0)]);
        let inferred = ProfileStats::compute(&p, &DescriptorParams::default()).unwrap();
        assert_eq!(inferred.primary_branches, 2.0);
        assert_eq!(inferred.ramification_index, 4.0);

        let configured = ProfileStats::compute(
            &p,
            &DescriptorParams {
                primary_branches: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(configured.ramification_index, 2.0);
    }

    #[test]
    fn collinear_profile_has_no_centroid() {
        // A straight path encloses no area.
        let xs = [1.0, 2.0, 3.0];
        let ys = [1.0, 2.0, 3.0];
        assert!(polygon_centroid(&xs, &ys).is_none());
    }

    #[test]
    fn centroid_of_known_polygon() {
        // Open square path (0,0) → (4,0) → (4,4) → (0,4); the implicit
        // closing edge completes the square with centroid (2, 2).
        let xs = [0.0, 4.0, 4.0, 0.0];
        let ys = [0.0, 0.0, 4.0, 4.0];
        let (cx, cy) = polygon_centroid(&xs, &ys).unwrap();
        assert!((cx - 2.0).abs() < 1e-12);
        assert!((cy - 2.0).abs() < 1e-12);
    }
}

//! Scalar descriptors derived from the sampled and fitted profiles.
//!
//! Three families are produced per run:
//! - [`ProfileStats`] — statistics of the sampled (non-zero filtered) linear
//!   profile: moments, maxima, centroid, enclosing radius, ramification
//!   index.
//! - [`PolyFitDescriptors`] — critical value/radius, mean value and moments
//!   of the fitted polynomial, available only when the linear profile was
//!   polynomial-fitted.
//! - [`RegressionSummary`] + [`MethodSelection`] — straight-line regressions
//!   of the semi-log and log-log profiles (full range and P10–P90) and the
//!   determination-ratio choice between them.
//!
//! Degenerate inputs never panic: descriptors that cannot be computed are
//! reported absent, and the rest of the pipeline proceeds.

mod poly_fit;
mod regression;
mod stats;

pub use poly_fit::PolyFitDescriptors;
pub use regression::{
    determination_ratio, regression, MethodSelection, PreferredMethod, RegressionLine,
    RegressionSummary,
};
pub use stats::{moments, Moments, ProfileStats};

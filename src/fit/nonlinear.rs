//! Damped Gauss-Newton refinement for the nonlinear fit families.

use super::{r_squared, FitMethod, FittedCurve};
use log::debug;
use nalgebra::{SMatrix, SVector};

const MAX_ITERS: usize = 200;
const MAX_HALVINGS: usize = 24;
const REL_TOL: f64 = 1e-12;

/// Model callback: value and Jacobian row of the parametrized curve at `x`.
type Model<const N: usize> = fn(&SVector<f64, N>, f64) -> (f64, SVector<f64, N>);

fn sum_squared_error<const N: usize>(
    xs: &[f64],
    ys: &[f64],
    params: &SVector<f64, N>,
    model: Model<N>,
) -> f64 {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let (value, _) = model(params, x);
            (y - value) * (y - value)
        })
        .sum()
}

/// Minimize the squared error with Gauss-Newton steps, halving the step until
/// it improves the objective. Stops on relative convergence, a singular
/// normal system or a step that cannot improve.
fn refine<const N: usize>(
    xs: &[f64],
    ys: &[f64],
    mut params: SVector<f64, N>,
    model: Model<N>,
) -> SVector<f64, N>
where
    nalgebra::Const<N>: nalgebra::DimMin<nalgebra::Const<N>, Output = nalgebra::Const<N>>,
{
    let mut current = sum_squared_error(xs, ys, &params, model);
    for _ in 0..MAX_ITERS {
        let mut jtj = SMatrix::<f64, N, N>::zeros();
        let mut jtr = SVector::<f64, N>::zeros();
        for (&x, &y) in xs.iter().zip(ys) {
            let (value, jacobian) = model(&params, x);
            jtj += jacobian * jacobian.transpose();
            jtr += jacobian * (y - value);
        }
        let Some(delta) = jtj.lu().solve(&jtr) else {
            debug!("Gauss-Newton: normal equations are singular, keeping current parameters");
            break;
        };

        let mut scale = 1.0;
        let mut improved = None;
        for _ in 0..MAX_HALVINGS {
            let candidate = params + delta * scale;
            let error = sum_squared_error(xs, ys, &candidate, model);
            if error.is_finite() && error < current {
                improved = Some((candidate, error));
                break;
            }
            scale *= 0.5;
        }
        let Some((candidate, error)) = improved else {
            break;
        };
        let relative_drop = (current - error) / current.max(f64::MIN_POSITIVE);
        params = candidate;
        current = error;
        if relative_drop < REL_TOL {
            break;
        }
    }
    params
}

/// Power-law fit `y = a·x^b`. Starts from the log-linearized regression and
/// refines in linear space; R² is reported in linear space as well.
///
/// Requires strictly positive data on both axes (callers fit power laws on
/// non-zero-filtered, normalized profiles, which satisfy this).
pub(super) fn fit_power(xs: &[f64], ys: &[f64]) -> Option<FittedCurve> {
    if xs.iter().any(|&x| x <= 0.0) || ys.iter().any(|&y| y <= 0.0) {
        debug!("power fit skipped: non-positive samples");
        return None;
    }
    let log_x: Vec<f64> = xs.iter().map(|x| x.ln()).collect();
    let log_y: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
    let line = super::fit_line(&log_x, &log_y)?;
    let start = SVector::<f64, 2>::new(line.params[0].exp(), line.params[1]);

    let model: Model<2> = |p, x| {
        let pow = x.powf(p[1]);
        (p[0] * pow, SVector::<f64, 2>::new(pow, p[0] * x.ln() * pow))
    };
    let params = refine(xs, ys, start, model);
    let (a, b) = (params[0], params[1]);
    Some(FittedCurve {
        method: FitMethod::Power,
        params: vec![a, b],
        r_squared: r_squared(xs, ys, |x| a * x.powf(b)),
    })
}

/// Exponential-with-offset fit `y = a·e^(−b·x) + c`.
pub(super) fn fit_exp_offset(xs: &[f64], ys: &[f64]) -> Option<FittedCurve> {
    let y_min = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let x_span = xs[xs.len() - 1] - xs[0];
    if !(y_min.is_finite() && y_max.is_finite()) || x_span.abs() <= f64::EPSILON {
        return None;
    }

    // Start below the smallest sample so the initial amplitude is positive;
    // the decay guess assumes roughly one e-folding over the sampled span.
    let c0 = y_min - 0.05 * (y_max - y_min).max(f64::MIN_POSITIVE);
    let a0 = (ys[0] - c0).max(f64::MIN_POSITIVE);
    let tail = (ys[ys.len() - 1] - c0).max(f64::MIN_POSITIVE);
    let b0 = ((a0 / tail).ln() / x_span).max(1e-3);
    let start = SVector::<f64, 3>::new(a0, b0, c0);

    let model: Model<3> = |p, x| {
        let decay = (-p[1] * x).exp();
        (
            p[0] * decay + p[2],
            SVector::<f64, 3>::new(decay, -p[0] * x * decay, 1.0),
        )
    };
    let params = refine(xs, ys, start, model);
    let (a, b, c) = (params[0], params[1], params[2]);
    Some(FittedCurve {
        method: FitMethod::ExpOffset,
        params: vec![a, b, c],
        r_squared: r_squared(xs, ys, |x| a * (-b * x).exp() + c),
    })
}

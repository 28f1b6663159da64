use super::{r_squared, FitMethod, FittedCurve};
use log::debug;
use nalgebra::{DMatrix, DVector};

/// Least-squares polynomial of the given degree, solved by SVD on the
/// Vandermonde design matrix. Coefficients are returned in ascending order.
pub(super) fn fit_poly(xs: &[f64], ys: &[f64], degree: u8) -> Option<FittedCurve> {
    let cols = degree as usize + 1;
    if xs.len() < cols {
        return None;
    }
    let mut design = DMatrix::<f64>::zeros(xs.len(), cols);
    for (row, &x) in xs.iter().enumerate() {
        let mut power = 1.0;
        for col in 0..cols {
            design[(row, col)] = power;
            power *= x;
        }
    }
    let rhs = DVector::from_column_slice(ys);
    let svd = design.svd(true, true);
    let solution = match svd.solve(&rhs, 1e-12) {
        Ok(solution) => solution,
        Err(err) => {
            debug!("polynomial fit of degree {degree} failed: {err}");
            return None;
        }
    };
    let params: Vec<f64> = solution.iter().copied().collect();
    let curve = FittedCurve {
        method: FitMethod::Poly(degree),
        params,
        r_squared: 0.0,
    };
    let r2 = r_squared(xs, ys, |x| curve.eval(x));
    Some(FittedCurve {
        r_squared: r2,
        ..curve
    })
}

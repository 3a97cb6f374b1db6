//! Classic Runge-Kutta 4 Coefficients
//!
//! Butcher tableau for the four-stage, fourth-order method:
//!
//! ```text
//!   0  |
//!  1/2 | 1/2
//!  1/2 |  0   1/2
//!   1  |  0    0    1
//! -----+---------------------
//!      | 1/6  1/3  1/3  1/6
//! ```
//!
//! Reference: Hairer, Nørsett & Wanner (1993), Table 1.2 ("the" Runge-Kutta method).

/// Number of stages in the RK4 method
pub const STAGES: usize = 4;

/// Order of the method
pub const ORDER: u8 = 4;

/// Node coefficients (c_i): stage i is evaluated at t_n + c[i]*h
pub const C: [f64; STAGES] = [
    0.0, // c[0]
    0.5, // c[1]
    0.5, // c[2]
    1.0, // c[3]
];

/// Runge-Kutta matrix (a_ij), lower triangular
///
/// k_i = f(t_n + c_i*h, y_n + h * sum_{j=0}^{i-1} a_{i,j} * k_j)
pub const A: [[f64; 3]; STAGES] = [
    [0.0, 0.0, 0.0],
    [0.5, 0.0, 0.0],
    [0.0, 0.5, 0.0],
    [0.0, 0.0, 1.0],
];

/// Solution weights (b_i)
///
/// y_{n+1} = y_n + h * sum_i b[i] * k_i
pub const B: [f64; STAGES] = [1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-15;

    #[test]
    fn test_row_sum_condition() {
        for i in 0..STAGES {
            let row_sum: f64 = A[i].iter().sum();
            assert!(
                (row_sum - C[i]).abs() < TOL,
                "Row {} sum = {}, expected c[{}] = {}",
                i,
                row_sum,
                i,
                C[i]
            );
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let b_sum: f64 = B.iter().sum();
        assert!((b_sum - 1.0).abs() < TOL, "Weights sum to {}", b_sum);
    }

    #[test]
    fn test_fourth_order_conditions() {
        // sum b_i c_i^(q-1) = 1/q for q = 2, 3, 4
        for q in 2..=ORDER as i32 {
            let sum: f64 = B.iter().zip(C.iter()).map(|(b, c)| b * c.powi(q - 1)).sum();
            let expected = 1.0 / q as f64;
            assert!(
                (sum - expected).abs() < TOL,
                "Quadrature condition q={} gives {}, expected {}",
                q,
                sum,
                expected
            );
        }
    }

    #[test]
    fn test_tableau_is_explicit() {
        for i in 0..STAGES {
            for j in i..3 {
                assert_eq!(A[i][j], 0.0, "A[{}][{}] must be zero", i, j);
            }
        }
    }
}

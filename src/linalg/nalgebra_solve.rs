use super::GlobalSystem;
use nalgebra::{DMatrix, DVector, Dynamic, LU};
use std::fmt;

/// Factorized system of the implicit (backward Euler) scheme
///
/// `(H + C/Δt) · T_next = P + (C/Δt) · T_current`
///
/// The left hand side doesn't change between steps, so it is LU-decomposed once and the
/// factorization is reused for every step. The matrix is never explicitly inverted.
pub struct ImplicitStepper {
    lu: LU<f64, Dynamic, Dynamic>,
    c_over_dt: DMatrix<f64>,
    p: DVector<f64>,
}

impl ImplicitStepper {
    /// Factorize `H + C/Δt` for the given system
    ///
    /// # Returns
    /// * An `Err` if `Δt` is not positive
    /// * An `Err` if the system matrix is singular
    pub fn new(system: &GlobalSystem, dt: f64) -> Result<Self, LinearAlgebraError> {
        if !(dt > 0.0) {
            return Err(LinearAlgebraError::InvalidTimeStep(dt));
        }

        let c_over_dt = &system.c / dt;
        let lu = (&system.h + &c_over_dt).lu();

        if !lu.is_invertible() {
            return Err(LinearAlgebraError::SingularSystem { step: None });
        }

        Ok(Self {
            lu,
            c_over_dt,
            p: system.p.clone(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.p.len()
    }

    /// Advance one step from `current`; `step` is only used to describe failures
    pub fn step(&self, current: &DVector<f64>, step: usize) -> Result<DVector<f64>, LinearAlgebraError> {
        if current.len() != self.dimension() {
            return Err(LinearAlgebraError::DimensionMismatch {
                expected: self.dimension(),
                found: current.len(),
            });
        }

        let rhs = &self.p + &self.c_over_dt * current;

        match self.lu.solve(&rhs) {
            Some(next) if next.iter().all(|t| t.is_finite()) => Ok(next),
            Some(_) => Err(LinearAlgebraError::NonFiniteSolution { step }),
            None => Err(LinearAlgebraError::SingularSystem { step: Some(step) }),
        }
    }
}

/// Error type for the implicit time-stepping solve
#[derive(Debug, Clone, PartialEq)]
pub enum LinearAlgebraError {
    SingularSystem { step: Option<usize> },
    NonFiniteSolution { step: usize },
    InvalidTimeStep(f64),
    DimensionMismatch { expected: usize, found: usize },
}

impl std::error::Error for LinearAlgebraError {}

impl fmt::Display for LinearAlgebraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::SingularSystem { step: Some(step) } => write!(
                f,
                "System matrix (H + C/dt) is singular at step {}; Cannot solve for temperatures!",
                step
            ),
            Self::SingularSystem { step: None } => write!(
                f,
                "System matrix (H + C/dt) is singular; Cannot solve for temperatures!"
            ),
            Self::NonFiniteSolution { step } => write!(
                f,
                "Solution at step {} contains non-finite temperatures; system is likely ill-conditioned!",
                step
            ),
            Self::InvalidTimeStep(dt) => {
                write!(f, "Time step must be positive (received: {}); Cannot build system!", dt)
            }
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "Temperature vector has {} entries but the system has {}!",
                found, expected
            ),
        }
    }
}

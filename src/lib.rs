//! 2D transient heat conduction with 4-node isoparametric quadrilateral Finite Elements.
//!
//! A [Grid](domain::Grid) is read from a mesh file (or generated), its Element matrices are
//! integrated with Gauss-Legendre quadrature and aggregated, and the resulting system is marched
//! through time with an implicit (backward Euler) scheme.
//!
//! ```no_run
//! use fem_heat_2d::prelude::*;
//!
//! let (mut grid, data) = read_mesh_file("./test_input/test_4_4.txt").unwrap();
//! let solution = simulate(&mut grid, &data, IntegrationOrder::Two).unwrap();
//!
//! for report in solution.steps.iter() {
//!     println!("{} {} {}", report.time, report.min, report.max);
//! }
//! ```

/// Geometry, material parameters and mesh input
pub mod domain;

/// Integration, assembly and time stepping
pub mod fem_problem;

/// Dense global matrices and the implicit solver
pub mod linalg;

pub mod prelude {
    pub use crate::domain::{read_mesh_file, GlobalData, Grid};
    pub use crate::fem_problem::{
        integration::{GaussScheme, IntegrationOrder, ShapeFnSampler},
        simulate, solve_transient, HeatError, StepReport, TransientSolution,
    };
}

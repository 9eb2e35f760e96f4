/// Structures and functions to assist in the numerical integration over Elements
pub mod integration;

/// Element level conductivity, capacity and convection matrices
pub mod local;

/// Aggregation of Element matrices into a Grid's global system
pub mod assembly;

/// Implicit time marching of the assembled system
pub mod transient;

use crate::domain::{mesh_file::MalformedInputError, ConfigurationError, GlobalData, Grid};
use crate::linalg::nalgebra_solve::LinearAlgebraError;
use integration::{GaussScheme, GeometryError, IntegrationOrder, ShapeFnSampler};
use log::debug;
use std::fmt;
pub use transient::{solve_transient, StepReport, TransientSolution, TransientSolver};

/// Validate, assemble and solve a heat conduction problem
///
/// ```
/// use fem_heat_2d::domain::{GlobalData, Grid};
/// use fem_heat_2d::fem_problem::{integration::IntegrationOrder, simulate};
///
/// let mut grid = Grid::uniform_rectangle(0.1, 0.1, [3, 3]).unwrap();
/// let data = GlobalData::from_values([
///     500.0, 50.0, 25.0, 300.0, 1200.0, 100.0, 7800.0, 700.0, 16.0, 9.0,
/// ]).unwrap();
///
/// let solution = simulate(&mut grid, &data, IntegrationOrder::Four).unwrap();
///
/// assert_eq!(solution.steps.len(), 10);
/// assert!(solution.steps.iter().all(|s| s.min >= 100.0 && s.max <= 1200.0));
/// ```
///
/// # Returns
/// * An `Err` if `data` doesn't describe `grid` or has invalid time settings
/// * An `Err` if any Element is geometrically invalid
/// * An `Err` if the system can't be solved
/// * The step reports and final temperatures, otherwise
pub fn simulate(
    grid: &mut Grid,
    data: &GlobalData,
    order: IntegrationOrder,
) -> Result<TransientSolution, HeatError> {
    data.validate(grid.num_nodes(), grid.num_elements())?;

    let sampler = ShapeFnSampler::new(GaussScheme::new(order));
    grid.assemble(data, &sampler)?;
    debug!("Solving {} steps of {}s", data.num_time_steps()?, data.simulation_step_time);

    solve_transient(grid, data)
}

/// Any failure of a heat conduction run
#[derive(Debug)]
pub enum HeatError {
    Geometry(GeometryError),
    Configuration(ConfigurationError),
    LinearAlgebra(LinearAlgebraError),
    MalformedInput(MalformedInputError),
}

impl std::error::Error for HeatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(e) => Some(e),
            Self::Configuration(e) => Some(e),
            Self::LinearAlgebra(e) => Some(e),
            Self::MalformedInput(e) => Some(e),
        }
    }
}

impl fmt::Display for HeatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Geometry(e) => write!(f, "Geometry Error: {}", e),
            Self::Configuration(e) => write!(f, "Configuration Error: {}", e),
            Self::LinearAlgebra(e) => write!(f, "Linear Algebra Error: {}", e),
            Self::MalformedInput(e) => write!(f, "Malformed Input: {}", e),
        }
    }
}

impl From<GeometryError> for HeatError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

impl From<ConfigurationError> for HeatError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<LinearAlgebraError> for HeatError {
    fn from(e: LinearAlgebraError) -> Self {
        Self::LinearAlgebra(e)
    }
}

impl From<MalformedInputError> for HeatError {
    fn from(e: MalformedInputError) -> Self {
        Self::MalformedInput(e)
    }
}

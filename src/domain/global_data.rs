use std::fmt;

/// Relative tolerance used when checking that the step size divides the simulation time
pub const TIME_STEP_TOLERANCE: f64 = 1e-9;

/// Simulation and material parameters shared by every Element of a [Grid](super::Grid)
///
/// The fields appear in the mesh file header in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalData {
    /// Total simulated time
    pub simulation_time: f64,
    /// Time step (Δt) of the implicit scheme
    pub simulation_step_time: f64,
    /// Thermal conductivity (k)
    pub conductivity: f64,
    /// Convection coefficient on boundary edges (α)
    pub alfa: f64,
    /// Ambient temperature
    pub tot: f64,
    /// Temperature of every node at t = 0
    pub initial_temp: f64,
    pub density: f64,
    pub specific_heat: f64,
    /// Declared number of Nodes (checked against the mesh)
    pub num_nodes: usize,
    /// Declared number of Elements (checked against the mesh)
    pub num_elements: usize,
}

impl GlobalData {
    /// Number of scalar values in the mesh file header
    pub const NUM_FIELDS: usize = 10;

    /// Build from the header values in file order.
    ///
    /// The two counts must be non-negative whole numbers.
    pub fn from_values(values: [f64; Self::NUM_FIELDS]) -> Result<Self, ConfigurationError> {
        let count = |name: &'static str, value: f64| -> Result<usize, ConfigurationError> {
            if value >= 0.0 && value.fract() == 0.0 && value.is_finite() {
                Ok(value as usize)
            } else {
                Err(ConfigurationError::InvalidCount(name, value))
            }
        };

        Ok(Self {
            simulation_time: values[0],
            simulation_step_time: values[1],
            conductivity: values[2],
            alfa: values[3],
            tot: values[4],
            initial_temp: values[5],
            density: values[6],
            specific_heat: values[7],
            num_nodes: count("Nodes number", values[8])?,
            num_elements: count("Elements number", values[9])?,
        })
    }

    /// Volumetric heat capacity (ρ·c)
    pub fn capacity_coefficient(&self) -> f64 {
        self.density * self.specific_heat
    }

    /// Number of implicit steps needed to reach `simulation_time`
    ///
    /// ```
    /// use fem_heat_2d::domain::GlobalData;
    ///
    /// let data = GlobalData {
    ///     simulation_time: 500.0,
    ///     simulation_step_time: 50.0,
    ///     conductivity: 25.0,
    ///     alfa: 300.0,
    ///     tot: 1200.0,
    ///     initial_temp: 100.0,
    ///     density: 7800.0,
    ///     specific_heat: 700.0,
    ///     num_nodes: 16,
    ///     num_elements: 9,
    /// };
    ///
    /// assert_eq!(data.num_time_steps().unwrap(), 10);
    /// ```
    pub fn num_time_steps(&self) -> Result<usize, ConfigurationError> {
        let step = self.simulation_step_time;
        if !(step > 0.0 && step.is_finite()) {
            return Err(ConfigurationError::NonPositiveTimeStep(step));
        }

        if !self.simulation_time.is_finite() {
            return Err(ConfigurationError::NonFiniteSimulationTime(self.simulation_time));
        }

        let ratio = self.simulation_time / step;
        let rounded = ratio.round();
        if rounded >= usize::MAX as f64 {
            return Err(ConfigurationError::TooManySteps(ratio));
        }
        if rounded < 1.0 || (ratio - rounded).abs() > TIME_STEP_TOLERANCE * rounded {
            return Err(ConfigurationError::StepDoesNotDivideTime {
                time: self.simulation_time,
                step,
            });
        }

        Ok(rounded as usize)
    }

    /// Check the declared counts against a mesh, and the time stepping settings
    pub fn validate(&self, num_nodes: usize, num_elements: usize) -> Result<(), ConfigurationError> {
        if self.num_nodes != num_nodes {
            return Err(ConfigurationError::NodeCountMismatch {
                declared: self.num_nodes,
                found: num_nodes,
            });
        }
        if self.num_elements != num_elements {
            return Err(ConfigurationError::ElementCountMismatch {
                declared: self.num_elements,
                found: num_elements,
            });
        }
        self.num_time_steps().map(|_| ())
    }
}

/// Error Type for invalid run settings; raised before any assembly starts
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    UnsupportedIntegrationOrder(usize),
    NonPositiveTimeStep(f64),
    NonFiniteSimulationTime(f64),
    TooManySteps(f64),
    StepDoesNotDivideTime { time: f64, step: f64 },
    InvalidCount(&'static str, f64),
    NodeCountMismatch { declared: usize, found: usize },
    ElementCountMismatch { declared: usize, found: usize },
    NodeIdOutOfRange { element: usize, node: usize, num_nodes: usize },
    EmptyRectangle([usize; 2]),
}

impl std::error::Error for ConfigurationError {}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnsupportedIntegrationOrder(n) => write!(
                f,
                "Unsupported integration order ({}); only 2, 3 and 4 point Gauss-Legendre schemes are available!",
                n
            ),
            Self::NonPositiveTimeStep(step) => {
                write!(f, "Simulation step time must be positive (received: {})!", step)
            }
            Self::NonFiniteSimulationTime(time) => {
                write!(f, "Simulation time must be finite (received: {})!", time)
            }
            Self::TooManySteps(ratio) => write!(
                f,
                "Simulation time needs {:e} steps; too many to represent!",
                ratio
            ),
            Self::StepDoesNotDivideTime { time, step } => write!(
                f,
                "Simulation step time ({}) does not evenly divide the simulation time ({})!",
                step, time
            ),
            Self::InvalidCount(name, value) => write!(
                f,
                "'{}' must be a non-negative whole number (received: {})!",
                name, value
            ),
            Self::NodeCountMismatch { declared, found } => write!(
                f,
                "Mesh declares {} Nodes but {} were found!",
                declared, found
            ),
            Self::ElementCountMismatch { declared, found } => write!(
                f,
                "Mesh declares {} Elements but {} were found!",
                declared, found
            ),
            Self::NodeIdOutOfRange {
                element,
                node,
                num_nodes,
            } => write!(
                f,
                "Element {} references Node {}; node ids must be in [1, {}]!",
                element, node, num_nodes
            ),
            Self::EmptyRectangle([nx, ny]) => write!(
                f,
                "A rectangle needs at least one Element per direction (received: {} x {})!",
                nx, ny
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(time: f64, step: f64) -> GlobalData {
        GlobalData::from_values([
            time, step, 25.0, 300.0, 1200.0, 100.0, 7800.0, 700.0, 16.0, 9.0,
        ])
        .unwrap()
    }

    #[test]
    fn header_values_map_to_fields() {
        let d = data(500.0, 50.0);
        assert_eq!(d.conductivity, 25.0);
        assert_eq!(d.tot, 1200.0);
        assert_eq!(d.num_nodes, 16);
        assert_eq!(d.num_elements, 9);
        assert_eq!(d.capacity_coefficient(), 7800.0 * 700.0);
    }

    #[test]
    fn time_step_must_divide_simulation_time() {
        assert_eq!(data(1.0, 1.0).num_time_steps().unwrap(), 1);
        assert_eq!(data(0.3, 0.1).num_time_steps().unwrap(), 3);
        assert!(matches!(
            data(500.0, 30.0).num_time_steps(),
            Err(ConfigurationError::StepDoesNotDivideTime { .. })
        ));
        assert!(matches!(
            data(10.0, 20.0).num_time_steps(),
            Err(ConfigurationError::StepDoesNotDivideTime { .. })
        ));
        assert!(matches!(
            data(500.0, 0.0).num_time_steps(),
            Err(ConfigurationError::NonPositiveTimeStep(_))
        ));
        assert!(matches!(
            data(500.0, -5.0).num_time_steps(),
            Err(ConfigurationError::NonPositiveTimeStep(_))
        ));
    }

    #[test]
    fn non_finite_or_huge_simulation_time_is_rejected() {
        assert_eq!(
            data(f64::INFINITY, 50.0).num_time_steps(),
            Err(ConfigurationError::NonFiniteSimulationTime(f64::INFINITY))
        );
        assert!(matches!(
            data(f64::NAN, 50.0).num_time_steps(),
            Err(ConfigurationError::NonFiniteSimulationTime(t)) if t.is_nan()
        ));
        assert!(matches!(
            data(1e300, 1e280).num_time_steps(),
            Err(ConfigurationError::TooManySteps(_))
        ));
        assert!(data(f64::INFINITY, 50.0).validate(16, 9).is_err());
    }

    #[test]
    fn counts_are_validated() {
        let d = data(500.0, 50.0);
        assert!(d.validate(16, 9).is_ok());
        assert_eq!(
            d.validate(15, 9),
            Err(ConfigurationError::NodeCountMismatch {
                declared: 16,
                found: 15
            })
        );
        let fractional_nodes = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 4.5, 1.0];
        assert!(GlobalData::from_values(fractional_nodes).is_err());
    }
}

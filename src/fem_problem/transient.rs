use super::HeatError;
use crate::domain::{GlobalData, Grid};
use crate::linalg::nalgebra_solve::ImplicitStepper;
use log::info;
use nalgebra::DVector;

#[cfg(feature = "json_export")]
use json::{object, JsonValue};
#[cfg(feature = "json_export")]
use std::fs::File;
#[cfg(feature = "json_export")]
use std::io::BufWriter;

/// Extremes of the temperature field after one implicit step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// 1-based step number
    pub step: usize,
    /// Simulated time at the end of the step
    pub time: f64,
    pub min: f64,
    pub max: f64,
}

impl StepReport {
    fn new(step: usize, time: f64, temperatures: &DVector<f64>) -> Self {
        let (min, max) = temperatures
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(*t), hi.max(*t)));
        Self { step, time, min, max }
    }
}

/// Result of a full transient run
#[derive(Clone, Debug)]
pub struct TransientSolution {
    pub steps: Vec<StepReport>,
    /// Nodal temperatures after the final step (index `i` is Node `i + 1`)
    pub temperatures: DVector<f64>,
}

impl TransientSolution {
    /// Print the step reports and final temperatures to a JSON file specified by path.
    #[cfg(feature = "json_export")]
    pub fn export_to_json(&self, path: impl AsRef<str>) -> std::io::Result<()> {
        let f = File::create(path.as_ref())?;
        let mut w = BufWriter::new(&f);

        let solution_object = object! {
            "steps": JsonValue::from(self.steps.iter().map(|report| object! {
                "step": report.step,
                "time": report.time,
                "min": report.min,
                "max": report.max,
            }).collect::<Vec<_>>()),
            "temperatures": self.temperatures.iter().copied().collect::<Vec<f64>>(),
        };

        solution_object.write_pretty(&mut w, 4)?;

        Ok(())
    }
}

/// Backward Euler time marching over an assembled [Grid]
///
/// ```text
/// (H + C/Δt) · Tˢ = P + (C/Δt) · Tˢ⁻¹,    T⁰ = initial_temp
/// ```
pub struct TransientSolver {
    stepper: ImplicitStepper,
    dt: f64,
    num_steps: usize,
    step: usize,
    temperatures: DVector<f64>,
}

impl TransientSolver {
    /// Factorize the system of an assembled Grid
    ///
    /// # Returns
    /// * An `Err` if the time settings in `data` are invalid
    /// * An `Err` if `H + C/Δt` is singular
    pub fn new(grid: &Grid, data: &GlobalData) -> Result<Self, HeatError> {
        let num_steps = data.num_time_steps()?;
        let dt = data.simulation_step_time;

        Ok(Self {
            stepper: ImplicitStepper::new(&grid.system, dt)?,
            dt,
            num_steps,
            step: 0,
            temperatures: DVector::from_element(grid.num_nodes(), data.initial_temp),
        })
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Current nodal temperatures
    pub fn temperatures(&self) -> &DVector<f64> {
        &self.temperatures
    }

    /// Advance a single step, returning `None` once the simulation time has been reached
    pub fn step(&mut self) -> Result<Option<StepReport>, HeatError> {
        if self.step == self.num_steps {
            return Ok(None);
        }

        let step = self.step + 1;
        self.temperatures = self.stepper.step(&self.temperatures, step)?;
        self.step = step;

        let report = StepReport::new(step, step as f64 * self.dt, &self.temperatures);
        info!(
            "Step {} (t = {}): min = {:.7}, max = {:.7}",
            report.step, report.time, report.min, report.max
        );

        Ok(Some(report))
    }

    /// Run every remaining step
    pub fn run(mut self) -> Result<TransientSolution, HeatError> {
        let mut steps = Vec::new();
        while let Some(report) = self.step()? {
            steps.push(report);
        }

        Ok(TransientSolution {
            steps,
            temperatures: self.temperatures,
        })
    }
}

/// Solve the transient problem over a Grid which has already been assembled
pub fn solve_transient(grid: &Grid, data: &GlobalData) -> Result<TransientSolution, HeatError> {
    TransientSolver::new(grid, data)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationError;
    use crate::fem_problem::integration::{GaussScheme, IntegrationOrder, ShapeFnSampler};
    use crate::linalg::nalgebra_solve::LinearAlgebraError;

    fn data(values: [f64; 8], grid: &Grid) -> GlobalData {
        let [time, step, k, alfa, tot, initial, density, specific_heat] = values;
        GlobalData::from_values([
            time,
            step,
            k,
            alfa,
            tot,
            initial,
            density,
            specific_heat,
            grid.num_nodes() as f64,
            grid.num_elements() as f64,
        ])
        .unwrap()
    }

    fn assembled(mut grid: Grid, data: &GlobalData, order: IntegrationOrder) -> Grid {
        grid.assemble(data, &ShapeFnSampler::new(GaussScheme::new(order)))
            .unwrap();
        grid
    }

    #[test]
    fn insulated_element_keeps_initial_temperature() {
        let grid = Grid::uniform_rectangle(1.0, 1.0, [1, 1]).unwrap();
        let d = data([1.0, 1.0, 25.0, 0.0, 0.0, 100.0, 7800.0, 700.0], &grid);
        let grid = assembled(grid, &d, IntegrationOrder::Two);

        let solution = solve_transient(&grid, &d).unwrap();

        assert_eq!(solution.steps.len(), 1);
        for t in solution.temperatures.iter() {
            assert!((t - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn reference_grid_first_step() {
        let grid = Grid::uniform_rectangle(0.1, 0.1, [3, 3]).unwrap();
        let d = data([500.0, 50.0, 25.0, 300.0, 1200.0, 100.0, 7800.0, 700.0], &grid);

        for order in [IntegrationOrder::Two, IntegrationOrder::Three, IntegrationOrder::Four] {
            let grid = assembled(grid.clone(), &d, order);
            let solution = solve_transient(&grid, &d).unwrap();

            assert_eq!(solution.steps.len(), 10);
            let first = solution.steps[0];
            assert_eq!(first.step, 1);
            assert_eq!(first.time, 50.0);
            assert!((first.min - 110.0379766).abs() < 1e-4, "min: {}", first.min);
            assert!((first.max - 365.8154706).abs() < 1e-4, "max: {}", first.max);

            // heating from the boundary is monotone
            for pair in solution.steps.windows(2) {
                assert!(pair[1].min > pair[0].min);
                assert!(pair[1].max > pair[0].max);
            }
        }
    }

    #[test]
    fn huge_step_approaches_ambient() {
        let grid = Grid::uniform_rectangle(0.1, 0.1, [3, 3]).unwrap();
        let d = data([1e12, 1e12, 25.0, 300.0, 1200.0, 100.0, 7800.0, 700.0], &grid);
        let grid = assembled(grid, &d, IntegrationOrder::Two);

        let solution = solve_transient(&grid, &d).unwrap();

        for t in solution.temperatures.iter() {
            assert!((t - 1200.0).abs() < 1e-3);
        }
    }

    #[test]
    fn stepping_stops_at_simulation_time() {
        let grid = Grid::uniform_rectangle(1.0, 1.0, [2, 2]).unwrap();
        let d = data([3.0, 1.0, 1.0, 10.0, 50.0, 0.0, 1.0, 1.0], &grid);
        let grid = assembled(grid, &d, IntegrationOrder::Two);

        let mut solver = TransientSolver::new(&grid, &d).unwrap();
        assert_eq!(solver.num_steps(), 3);

        let times: Vec<f64> = std::iter::from_fn(|| solver.step().unwrap())
            .map(|report| report.time)
            .collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
        assert!(solver.step().unwrap().is_none());
    }

    #[test]
    fn invalid_settings_are_rejected_before_solving() {
        let grid = Grid::uniform_rectangle(1.0, 1.0, [1, 1]).unwrap();

        let d = data([10.0, 3.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0], &grid);
        assert!(matches!(
            TransientSolver::new(&grid, &d),
            Err(HeatError::Configuration(ConfigurationError::StepDoesNotDivideTime { .. }))
        ));

        // never assembled: every matrix is zero
        let d = data([1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0], &grid);
        assert!(matches!(
            TransientSolver::new(&grid, &d),
            Err(HeatError::LinearAlgebra(LinearAlgebraError::SingularSystem { .. }))
        ));
    }
}

use super::integration::{element_jacobians, GeometryError, Jacobian, ShapeFnSampler, ShapeSample};
use crate::domain::{
    grid::{BoundaryEdge, BoundaryEdges, EdgeSide},
    GlobalData, Point,
};
use nalgebra::{Matrix4, Vector4};

/// A 4x4 matrix-valued integrand sampled at one interior point of an Element
pub trait PointIntegrand: Sync + Send {
    /// Evaluate the integrand (including `|det J|`, excluding the quadrature weight)
    fn sample(&self, sample: &ShapeSample, jacobian: &Jacobian) -> Matrix4<f64>;
}

/// Heat conduction: `k * (∇Nx ∇Nxᵀ + ∇Ny ∇Nyᵀ) * |det J|`
pub struct Conductivity(pub f64);

impl PointIntegrand for Conductivity {
    fn sample(&self, sample: &ShapeSample, jacobian: &Jacobian) -> Matrix4<f64> {
        let (d_x, d_y) = jacobian.real_derivatives(sample);
        (d_x * d_x.transpose() + d_y * d_y.transpose()) * (self.0 * jacobian.det.abs())
    }
}

/// Thermal capacity: `ρc * N Nᵀ * |det J|`
pub struct Capacity(pub f64);

impl PointIntegrand for Capacity {
    fn sample(&self, sample: &ShapeSample, jacobian: &Jacobian) -> Matrix4<f64> {
        sample.n * sample.n.transpose() * (self.0 * jacobian.det.abs())
    }
}

/// Convection matrix (Hbc) and ambient flux vector (P) contributed by one boundary edge
///
/// The edge is parameterized over its reference side, so `ds = L / 2`.
pub fn edge_convection(
    element_id: usize,
    edge: &BoundaryEdge,
    ends: [Point; 2],
    data: &GlobalData,
    sampler: &ShapeFnSampler,
) -> Result<(Matrix4<f64>, Vector4<f64>), GeometryError> {
    let length = ends[0].dist(&ends[1]);
    if length == 0.0 {
        return Err(GeometryError::ZeroLengthEdge {
            element: element_id,
            nodes: edge.node_ids,
        });
    }
    let ds = length / 2.0;

    let mut hbc = Matrix4::zeros();
    let mut p = Vector4::zeros();
    for s in sampler.edge(edge.reference_side) {
        hbc += s.n * s.n.transpose() * (data.alfa * s.weight * ds);
        p += s.n * (data.alfa * data.tot * s.weight * ds);
    }

    Ok((hbc, p))
}

/// Local matrices of a single Element
///
/// The per-point matrices are kept for inspection; `h` and `c` are their weighted sums.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalSystem {
    pub jacobians: Vec<Jacobian>,
    pub h_points: Vec<Matrix4<f64>>,
    pub c_points: Vec<Matrix4<f64>>,
    pub boundary_edges: BoundaryEdges,
    pub h: Matrix4<f64>,
    pub c: Matrix4<f64>,
    pub hbc: Matrix4<f64>,
    pub p: Vector4<f64>,
}

impl Default for LocalSystem {
    fn default() -> Self {
        Self {
            jacobians: Vec::new(),
            h_points: Vec::new(),
            c_points: Vec::new(),
            boundary_edges: BoundaryEdges::new(),
            h: Matrix4::zeros(),
            c: Matrix4::zeros(),
            hbc: Matrix4::zeros(),
            p: Vector4::zeros(),
        }
    }
}

impl LocalSystem {
    /// Compute every local matrix of an Element
    ///
    /// # Arguments
    /// * `corners`: coordinates of the Element's Nodes in local order
    /// * `boundary_edges`: the Element's sides lying on the domain boundary
    ///
    /// # Returns
    /// * An `Err` if the Element's Jacobian is degenerate or changes sign
    /// * An `Err` if a boundary edge has zero length
    pub fn compute(
        element_id: usize,
        corners: &[Point; 4],
        boundary_edges: BoundaryEdges,
        data: &GlobalData,
        sampler: &ShapeFnSampler,
    ) -> Result<Self, GeometryError> {
        let jacobians = element_jacobians(element_id, corners, sampler)?;
        let samples = sampler.interior();

        let conductivity = Conductivity(data.conductivity);
        let capacity = Capacity(data.capacity_coefficient());

        let h_points: Vec<Matrix4<f64>> = samples
            .iter()
            .zip(jacobians.iter())
            .map(|(s, j)| conductivity.sample(s, j))
            .collect();
        let c_points: Vec<Matrix4<f64>> = samples
            .iter()
            .zip(jacobians.iter())
            .map(|(s, j)| capacity.sample(s, j))
            .collect();

        let h = weighted_sum(&h_points, samples);
        let c = weighted_sum(&c_points, samples);

        let mut hbc = Matrix4::zeros();
        let mut p = Vector4::zeros();
        for edge in boundary_edges.iter() {
            let ends = edge_ends(edge, corners);
            let (edge_hbc, edge_p) = edge_convection(element_id, edge, ends, data, sampler)?;
            hbc += edge_hbc;
            p += edge_p;
        }

        Ok(Self {
            jacobians,
            h_points,
            c_points,
            boundary_edges,
            h,
            c,
            hbc,
            p,
        })
    }
}

fn weighted_sum(point_matrices: &[Matrix4<f64>], samples: &[ShapeSample]) -> Matrix4<f64> {
    point_matrices
        .iter()
        .zip(samples.iter())
        .fold(Matrix4::zeros(), |acc, (m, s)| acc + m * s.weight)
}

// end points of a boundary edge, taken from the corners of its reference side
fn edge_ends(edge: &BoundaryEdge, corners: &[Point; 4]) -> [Point; 2] {
    match edge.reference_side {
        EdgeSide::Bottom => [corners[0], corners[1]],
        EdgeSide::Right => [corners[1], corners[2]],
        EdgeSide::Top => [corners[2], corners[3]],
        EdgeSide::Left => [corners[3], corners[0]],
    }
}

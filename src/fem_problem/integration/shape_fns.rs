use super::glq::GaussScheme;
use crate::domain::{grid::EdgeSide, V2D};
use nalgebra::Vector4;

/*
    Local node ordering (counter-clockwise):

    (-1, 1) 3 *-------* 2 (1, 1)
              |       |
              |       |
    (-1,-1) 0 *-------* 1 (1,-1)
*/

/// Parametric corner of each local node
pub const NODE_CORNERS: [[f64; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Values of the four bilinear shape functions at (ξ, η)
///
/// ```
/// use fem_heat_2d::fem_problem::integration::shape_fns::*;
/// use fem_heat_2d::domain::V2D;
///
/// let n = shape_values(V2D::from([1.0, -1.0]));
/// assert_eq!(n.as_slice(), &[0.0, 1.0, 0.0, 0.0]);
/// ```
pub fn shape_values(p: V2D) -> Vector4<f64> {
    Vector4::from_fn(|k, _| {
        let [cx, cy] = NODE_CORNERS[k];
        0.25 * (1.0 + cx * p[0]) * (1.0 + cy * p[1])
    })
}

/// Partial derivatives of the four shape functions with respect to ξ at (ξ, η)
pub fn shape_d_xi(p: V2D) -> Vector4<f64> {
    Vector4::from_fn(|k, _| {
        let [cx, cy] = NODE_CORNERS[k];
        0.25 * cx * (1.0 + cy * p[1])
    })
}

/// Partial derivatives of the four shape functions with respect to η at (ξ, η)
pub fn shape_d_eta(p: V2D) -> Vector4<f64> {
    Vector4::from_fn(|k, _| {
        let [cx, cy] = NODE_CORNERS[k];
        0.25 * cy * (1.0 + cx * p[0])
    })
}

/// Shape function values and parametric derivatives at one sample point
#[derive(Clone, Debug)]
pub struct ShapeSample {
    pub point: V2D,
    pub weight: f64,
    pub n: Vector4<f64>,
    pub d_xi: Vector4<f64>,
    pub d_eta: Vector4<f64>,
}

impl ShapeSample {
    fn at(point: V2D, weight: f64) -> Self {
        Self {
            point,
            weight,
            n: shape_values(point),
            d_xi: shape_d_xi(point),
            d_eta: shape_d_eta(point),
        }
    }
}

/// Shape functions tabulated over the points of a [GaussScheme].
///
/// Built once per run and shared (by reference) between all Elements.
#[derive(Clone, Debug)]
pub struct ShapeFnSampler {
    scheme: GaussScheme,
    interior: Vec<ShapeSample>,
    // [top, right, bottom, left]
    edges: [Vec<ShapeSample>; 4],
}

impl ShapeFnSampler {
    pub fn new(scheme: GaussScheme) -> Self {
        let interior = scheme
            .interior_points()
            .map(|ip| ShapeSample::at(ip.coords, ip.weight))
            .collect();

        let edges: [Vec<ShapeSample>; 4] =
            [EdgeSide::Top, EdgeSide::Right, EdgeSide::Bottom, EdgeSide::Left].map(|side| {
                scheme
                    .edge_points(side)
                    .map(|ip| ShapeSample::at(ip.coords, ip.weight))
                    .collect()
            });

        Self {
            scheme,
            interior,
            edges,
        }
    }

    pub fn scheme(&self) -> &GaussScheme {
        &self.scheme
    }

    /// Samples at the interior points, in the order of [GaussScheme::interior_points]
    pub fn interior(&self) -> &[ShapeSample] {
        &self.interior
    }

    /// Samples at the points on one side of the parametric square
    pub fn edge(&self, side: EdgeSide) -> &[ShapeSample] {
        match side {
            EdgeSide::Top => &self.edges[0],
            EdgeSide::Right => &self.edges[1],
            EdgeSide::Bottom => &self.edges[2],
            EdgeSide::Left => &self.edges[3],
        }
    }
}

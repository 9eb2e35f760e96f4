use super::shape_fns::{ShapeFnSampler, ShapeSample};
use crate::domain::{Point, M2D};
use nalgebra::Vector4;
use std::fmt;

/// Mapping between Parametric and Real Space at one integration point of an Element
///
/// ```text
/// J  = | dx/dξ  dy/dξ |      J1 = |  dy/dη  -dy/dξ |
///      | dx/dη  dy/dη |           | -dx/dη   dx/dξ |
/// ```
/// `J1 / det` is the inverse of `J`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jacobian {
    pub j: M2D,
    pub j1: M2D,
    pub det: f64,
}

impl Jacobian {
    /// Evaluate the Jacobian from the parametric shape derivatives at a point and the corner coordinates
    pub fn new(d_xi: &Vector4<f64>, d_eta: &Vector4<f64>, corners: &[Point; 4]) -> Self {
        let x = Vector4::from_fn(|k, _| corners[k].x);
        let y = Vector4::from_fn(|k, _| corners[k].y);

        let j = M2D::from([d_xi.dot(&x), d_xi.dot(&y)], [d_eta.dot(&x), d_eta.dot(&y)]);

        Self {
            j,
            j1: j.adjugate(),
            det: j.det(),
        }
    }

    /// Shape function derivatives in Real Space: `[dN/dx; dN/dy] = J1 / det * [dN/dξ; dN/dη]`
    pub fn real_derivatives(&self, sample: &ShapeSample) -> (Vector4<f64>, Vector4<f64>) {
        let inv = self.j1 / self.det;
        let d_x = sample.d_xi * inv.u[0] + sample.d_eta * inv.u[1];
        let d_y = sample.d_xi * inv.v[0] + sample.d_eta * inv.v[1];
        (d_x, d_y)
    }
}

/// Evaluate the Jacobian at every interior point of an Element
///
/// Clockwise Elements produce negative determinants; that is accepted as long as every point agrees.
///
/// # Returns
/// * An `Err` if any determinant is exactly zero
/// * An `Err` if the determinants change sign within the Element
/// * A Jacobian for each point of [ShapeFnSampler::interior], otherwise
pub fn element_jacobians(
    element_id: usize,
    corners: &[Point; 4],
    sampler: &ShapeFnSampler,
) -> Result<Vec<Jacobian>, GeometryError> {
    let mut orientation: Option<bool> = None;

    sampler
        .interior()
        .iter()
        .enumerate()
        .map(|(point, sample)| {
            let jac = Jacobian::new(&sample.d_xi, &sample.d_eta, corners);

            if jac.det == 0.0 {
                return Err(GeometryError::DegenerateJacobian {
                    element: element_id,
                    point,
                });
            }

            let positive = jac.det > 0.0;
            match orientation {
                None => orientation = Some(positive),
                Some(first) if first != positive => {
                    return Err(GeometryError::InconsistentOrientation {
                        element: element_id,
                        point,
                    })
                }
                _ => (),
            }

            Ok(jac)
        })
        .collect()
}

/// Error Type for invalid Element geometry
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    DegenerateJacobian { element: usize, point: usize },
    InconsistentOrientation { element: usize, point: usize },
    ZeroLengthEdge { element: usize, nodes: [usize; 2] },
}

impl std::error::Error for GeometryError {}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DegenerateJacobian { element, point } => write!(
                f,
                "Jacobian determinant of Element {} is zero at integration point {}; Element is degenerate!",
                element, point
            ),
            Self::InconsistentOrientation { element, point } => write!(
                f,
                "Jacobian determinant of Element {} changes sign at integration point {}; Element is self-intersecting or non-convex!",
                element, point
            ),
            Self::ZeroLengthEdge { element, nodes } => write!(
                f,
                "Boundary edge ({}, {}) of Element {} has zero length; Cannot integrate convection!",
                nodes[0], nodes[1], element
            ),
        }
    }
}

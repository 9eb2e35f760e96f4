use crate::domain::{grid::EdgeSide, ConfigurationError, V2D};
use std::convert::TryFrom;
use std::fmt;

/// Number of Gauss-Legendre points along each parametric direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrationOrder {
    Two,
    Three,
    Four,
}

impl IntegrationOrder {
    pub fn num_points(&self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

impl TryFrom<usize> for IntegrationOrder {
    type Error = ConfigurationError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            _ => Err(ConfigurationError::UnsupportedIntegrationOrder(n)),
        }
    }
}

impl fmt::Display for IntegrationOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-point", self.num_points())
    }
}

/// A sample point of a [GaussScheme] in Parametric Space
#[derive(Clone, Copy, Debug)]
pub struct IntegrationPoint {
    /// (ξ, η)
    pub coords: V2D,
    /// Combined weight of the point (`w_i * w_j` for interior points, `w_i` for edge points)
    pub weight: f64,
}

/// Gauss-Legendre-Quadrature tables over the parametric square `[-1, 1]²`
///
/// Interior points are ordered with ξ varying fastest:
/// point `k = j * n + i` sits at `(points[i], points[j])` with weight `weights[i] * weights[j]`.
#[derive(Clone, Debug)]
pub struct GaussScheme {
    order: IntegrationOrder,
    points: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussScheme {
    /// Build the tables for one of the supported orders
    ///
    /// ```
    /// use fem_heat_2d::fem_problem::integration::glq::*;
    ///
    /// let scheme = GaussScheme::new(IntegrationOrder::Three);
    ///
    /// // compute the integral of (u^2 * v^2) over [-1, 1]²
    /// let solution = scheme.real_gauss_quad(|u, v| u.powi(2) * v.powi(2));
    ///
    /// assert!((solution - 4.0 / 9.0).abs() < 1e-12);
    /// ```
    pub fn new(order: IntegrationOrder) -> Self {
        let (points, weights) = match order {
            IntegrationOrder::Two => {
                let p = 1.0 / 3.0_f64.sqrt();
                (vec![-p, p], vec![1.0, 1.0])
            }
            IntegrationOrder::Three => {
                let p = (3.0_f64 / 5.0).sqrt();
                (vec![-p, 0.0, p], vec![5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0])
            }
            IntegrationOrder::Four => {
                let spread = 2.0 / 7.0 * (6.0_f64 / 5.0).sqrt();
                let inner = (3.0 / 7.0 - spread).sqrt();
                let outer = (3.0 / 7.0 + spread).sqrt();
                let w_inner = (18.0 + 30.0_f64.sqrt()) / 36.0;
                let w_outer = (18.0 - 30.0_f64.sqrt()) / 36.0;
                (
                    vec![-outer, -inner, inner, outer],
                    vec![w_outer, w_inner, w_inner, w_outer],
                )
            }
        };

        Self {
            order,
            points,
            weights,
        }
    }

    /// Build the tables from a raw number of points, failing for unsupported orders
    pub fn with_order(n: usize) -> Result<Self, ConfigurationError> {
        Ok(Self::new(IntegrationOrder::try_from(n)?))
    }

    pub fn order(&self) -> IntegrationOrder {
        self.order
    }

    /// 1D points over `(-1, 1)`, ascending
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// 1D weights matching [GaussScheme::points]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate over the n² interior points with their product weights
    pub fn interior_points(&self) -> impl Iterator<Item = IntegrationPoint> + '_ {
        let n = self.points.len();
        (0..n * n).map(move |k| {
            let (i, j) = (k % n, k / n);
            IntegrationPoint {
                coords: V2D::from([self.points[i], self.points[j]]),
                weight: self.weights[i] * self.weights[j],
            }
        })
    }

    /// Iterate over the n points which lie on one side of the parametric square
    pub fn edge_points(&self, side: EdgeSide) -> impl Iterator<Item = IntegrationPoint> + '_ {
        self.points
            .iter()
            .zip(self.weights.iter())
            .map(move |(p, w)| IntegrationPoint {
                coords: match side {
                    EdgeSide::Top => V2D::from([*p, 1.0]),
                    EdgeSide::Bottom => V2D::from([*p, -1.0]),
                    EdgeSide::Left => V2D::from([-1.0, *p]),
                    EdgeSide::Right => V2D::from([1.0, *p]),
                },
                weight: *w,
            })
    }

    /// 2D Gauss Legendre Quadrature integral of some function F(ξ, η) over `[-1, 1]²`
    pub fn real_gauss_quad<F>(&self, integrand: F) -> f64
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut solution = 0.0;
        for (u, u_w) in self.points.iter().zip(self.weights.iter()) {
            let mut inner_solution = 0.0;
            for (v, v_w) in self.points.iter().zip(self.weights.iter()) {
                inner_solution += integrand(*u, *v) * v_w;
            }
            solution += inner_solution * u_w;
        }
        solution
    }

    /// 1D integral of some function F(ξ, η) along one side of the parametric square
    ///
    /// ```
    /// use fem_heat_2d::fem_problem::integration::glq::*;
    /// use fem_heat_2d::domain::grid::EdgeSide;
    ///
    /// let scheme = GaussScheme::new(IntegrationOrder::Two);
    ///
    /// // integrate (u^2 * v^2) along the right side (u = 1)
    /// let solution = scheme.real_gauss_quad_edge(EdgeSide::Right, |u, v| u.powi(2) * v.powi(2));
    ///
    /// assert!((solution - 2.0 / 3.0).abs() < 1e-12);
    /// ```
    pub fn real_gauss_quad_edge<F>(&self, side: EdgeSide, integrand: F) -> f64
    where
        F: Fn(f64, f64) -> f64,
    {
        self.edge_points(side)
            .map(|ip| integrand(ip.coords.x(), ip.coords.y()) * ip.weight)
            .sum()
    }
}

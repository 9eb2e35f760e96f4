/// Use Nalgebra's LU decomposition to march the implicit scheme
pub mod nalgebra_solve;

use crate::domain::grid::Element;
use nalgebra::{DMatrix, DVector};

#[cfg(feature = "json_export")]
use crate::domain::grid::element::matrix_rows;
#[cfg(feature = "json_export")]
use json::{object, JsonValue};

/// Globally aggregated (dense) matrices of a Grid
///
/// `H` already contains the boundary convection (Hbc) contributions.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSystem {
    /// Size of the square matrices (number of Nodes)
    pub dimension: usize,
    /// Conductivity + boundary convection
    pub h: DMatrix<f64>,
    /// Thermal capacity
    pub c: DMatrix<f64>,
    /// Boundary flux load
    pub p: DVector<f64>,
}

impl GlobalSystem {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            h: DMatrix::zeros(dimension, dimension),
            c: DMatrix::zeros(dimension, dimension),
            p: DVector::zeros(dimension),
        }
    }

    /// Zero all entries, keeping the dimension
    pub fn clear(&mut self) {
        self.h.fill(0.0);
        self.c.fill(0.0);
        self.p.fill(0.0);
    }

    /// Scatter-add an Element's integrated local matrices into the global system
    ///
    /// Local row/column `i` maps to global index `node_ids[i] - 1`.
    pub fn scatter(&mut self, element: &Element) {
        let globals = element.global_indices();
        let local = &element.local;

        for (i, gi) in globals.iter().enumerate() {
            for (j, gj) in globals.iter().enumerate() {
                self.h[(*gi, *gj)] += local.h[(i, j)] + local.hbc[(i, j)];
                self.c[(*gi, *gj)] += local.c[(i, j)];
            }
            self.p[*gi] += local.p[i];
        }
    }

    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        object! {
            "dimension": self.dimension,
            "H": matrix_rows(&self.h),
            "C": matrix_rows(&self.c),
            "P": self.p.iter().copied().collect::<Vec<f64>>(),
        }
    }
}

impl<'a> Extend<&'a Element> for GlobalSystem {
    fn extend<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = &'a Element>,
    {
        for element in elements {
            self.scatter(element);
        }
    }
}

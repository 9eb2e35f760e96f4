use crate::fem_problem::local::LocalSystem;
#[cfg(feature = "json_export")]
use json::{object, JsonValue};

/// The `Element`s are the basic geometric unit of the Grid: a bilinear quadrilateral over four Nodes.
///
/// Elements are responsible for:
/// * Keeping the ordered (counter-clockwise) ids of their Nodes
/// * Holding the local matrices computed for them during the most recent assembly pass
#[derive(Debug, Clone)]
pub struct Element {
    /// 1-based id (matches the mesh file)
    pub id: usize,
    /// 1-based Node ids; local index `k` corresponds to parametric corner `k` of the shape functions
    pub node_ids: [usize; 4],
    /// Local matrices; zeroed until the Grid is assembled
    pub local: LocalSystem,
}

impl Element {
    pub fn new(id: usize, node_ids: [usize; 4]) -> Self {
        Self {
            id,
            node_ids,
            local: LocalSystem::default(),
        }
    }

    /// 0-based indices into the global matrices for each local index
    pub fn global_indices(&self) -> [usize; 4] {
        self.node_ids.map(|id| id - 1)
    }

    /// Produce a Json Object that describes this Element and its local matrices
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        object! {
            "id": self.id,
            "node_ids": self.node_ids.to_vec(),
            "boundary_edges": self.local.boundary_edges.iter().map(|edge| object! {
                "node_ids": edge.node_ids.to_vec(),
                "side": edge.side.name(),
            }).collect::<Vec<_>>(),
            "H": matrix_rows(&self.local.h),
            "C": matrix_rows(&self.local.c),
            "Hbc": matrix_rows(&self.local.hbc),
            "P": self.local.p.iter().copied().collect::<Vec<f64>>(),
        }
    }
}

#[cfg(feature = "json_export")]
pub(crate) fn matrix_rows<R, C, S>(m: &nalgebra::Matrix<f64, R, C, S>) -> JsonValue
where
    R: nalgebra::Dim,
    C: nalgebra::Dim,
    S: nalgebra::Storage<f64, R, C>,
{
    JsonValue::from(
        m.row_iter()
            .map(|row| JsonValue::from(row.iter().copied().collect::<Vec<f64>>()))
            .collect::<Vec<_>>(),
    )
}

use super::Point;
#[cfg(feature = "json_export")]
use json::{object, JsonValue};

/// A point in 2D space.
/// Groups of 4 Nodes describe Elements; pairs of boundary Nodes describe convective Edges.
#[derive(Debug, Clone)]
pub struct Node {
    /// 1-based id (matches the mesh file)
    pub id: usize,
    pub coords: Point,
    /// Set from the `*BC` list; marks the node as exposed to the ambient temperature
    pub boundary: bool,
}

impl Node {
    pub fn new(id: usize, coords: Point, boundary: bool) -> Self {
        Self {
            id,
            coords,
            boundary,
        }
    }

    /// Produce a Json Object that describes this Node
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        object! {
            "id": self.id,
            "coords": JsonValue::from(self.coords),
            "boundary": self.boundary,
        }
    }
}

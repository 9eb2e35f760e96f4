/// Classification of Element sides lying on the domain boundary
pub mod boundary;
/// A bilinear quadrilateral over four Nodes
pub mod element;
/// A Point in Real Space with a boundary flag
pub mod node;
/// Structures to describe the 2D real and parametric spaces
pub mod space;

pub use boundary::{detect_boundary_edges, BoundaryEdge, BoundaryEdges, EdgeSide};
pub use element::Element;
pub use node::Node;
pub use space::{Point, M2D, V2D};

use super::ConfigurationError;
use crate::linalg::GlobalSystem;

#[cfg(feature = "json_export")]
use json::{object, JsonValue};
#[cfg(feature = "json_export")]
use std::fs::File;
#[cfg(feature = "json_export")]
use std::io::BufWriter;

/// The Nodes and Elements of a heat conduction problem, along with its assembled global system.
///
/// Node and Element ids are 1-based; Node `i` is stored at `nodes[i - 1]`.
#[derive(Debug, Clone)]
pub struct Grid {
    pub nodes: Vec<Node>,
    pub elements: Vec<Element>,
    /// Aggregated H (with Hbc), C and P; zero until the Grid is assembled
    pub system: GlobalSystem,
}

impl Grid {
    /// Construct a Grid, checking that every Element only references existing Nodes
    pub fn new(nodes: Vec<Node>, elements: Vec<Element>) -> Result<Self, ConfigurationError> {
        let num_nodes = nodes.len();

        for element in elements.iter() {
            if let Some(bad_id) = element
                .node_ids
                .iter()
                .find(|id| **id == 0 || **id > num_nodes)
            {
                return Err(ConfigurationError::NodeIdOutOfRange {
                    element: element.id,
                    node: *bad_id,
                    num_nodes,
                });
            }
        }

        Ok(Self {
            nodes,
            elements,
            system: GlobalSystem::new(num_nodes),
        })
    }

    /// Construct a `width` by `height` rectangle split into `nx` by `ny` Elements, with its
    /// lower-left corner at the origin.
    ///
    /// Nodes are numbered column by column (bottom to top, then left to right) and every Node on
    /// the perimeter is flagged as a boundary Node. Both element counts must be non-zero.
    ///
    /// ```
    /// use fem_heat_2d::domain::Grid;
    ///
    /// let grid = Grid::uniform_rectangle(0.1, 0.1, [3, 3]).unwrap();
    ///
    /// assert_eq!(grid.num_nodes(), 16);
    /// assert_eq!(grid.num_elements(), 9);
    /// assert_eq!(grid.nodes.iter().filter(|n| n.boundary).count(), 12);
    /// ```
    pub fn uniform_rectangle(
        width: f64,
        height: f64,
        [nx, ny]: [usize; 2],
    ) -> Result<Self, ConfigurationError> {
        if nx == 0 || ny == 0 {
            return Err(ConfigurationError::EmptyRectangle([nx, ny]));
        }
        let column_len = ny + 1;

        let nodes: Vec<Node> = (0..=nx)
            .flat_map(|i| (0..=ny).map(move |j| (i, j)))
            .enumerate()
            .map(|(idx, (i, j))| {
                Node::new(
                    idx + 1,
                    Point::new(width * i as f64 / nx as f64, height * j as f64 / ny as f64),
                    i == 0 || j == 0 || i == nx || j == ny,
                )
            })
            .collect();

        let elements: Vec<Element> = (0..nx)
            .flat_map(|i| (0..ny).map(move |j| (i, j)))
            .enumerate()
            .map(|(idx, (i, j))| {
                let n1 = i * column_len + j + 1;
                Element::new(idx + 1, [n1, n1 + column_len, n1 + column_len + 1, n1 + 1])
            })
            .collect();

        Self::new(nodes, elements)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Retrieve a Node by its 1-based id
    pub fn node(&self, id: usize) -> Option<&Node> {
        id.checked_sub(1).and_then(|idx| self.nodes.get(idx))
    }

    /// Get the four corner [Point]s of an [Element] in its local order
    pub fn element_corners(&self, element: &Element) -> [Point; 4] {
        element.node_ids.map(|id| self.nodes[id - 1].coords)
    }

    /// Print the grid and its assembled system to a JSON file specified by path.
    #[cfg(feature = "json_export")]
    pub fn export_to_json(&self, path: impl AsRef<str>) -> std::io::Result<()> {
        let f = File::create(path.as_ref())?;
        let mut w = BufWriter::new(&f);

        let grid_object = object! {
            "Nodes": JsonValue::from(self.nodes.iter().map(|node| node.to_json()).collect::<Vec<_>>()),
            "Elements": JsonValue::from(self.elements.iter().map(|element| element.to_json()).collect::<Vec<_>>()),
            "System": self.system.to_json(),
        };

        grid_object.write_pretty(&mut w, 4)?;

        Ok(())
    }
}

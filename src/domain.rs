/// Simulation and material parameters
pub mod global_data;
/// The Nodes and Elements of a problem
pub mod grid;
/// Reader for the text mesh format
pub mod mesh_file;

pub use global_data::{ConfigurationError, GlobalData};
pub use grid::{Element, Grid, Node, Point, M2D, V2D};
pub use mesh_file::{parse_mesh, read_mesh_file, MalformedInputError};

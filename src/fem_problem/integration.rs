/// Gauss-Legendre-Quadrature tables over the parametric square
pub mod glq;
/// Jacobians of the Parametric to Real Space mapping
pub mod jacobian;
/// Bilinear shape functions and their tabulation over quadrature points
pub mod shape_fns;

pub use glq::{GaussScheme, IntegrationOrder, IntegrationPoint};
pub use jacobian::{element_jacobians, GeometryError, Jacobian};
pub use shape_fns::{ShapeFnSampler, ShapeSample};

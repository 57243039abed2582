//! Visual definitions shared by every canvas.
//!
//! - [`StrokeDefinition`] and [`StrokeStyle`] describe borders and rules.
//! - [`RenderLayer`] and [`LayeredOutput`] keep SVG nodes in z-order.

mod layer;
mod stroke;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeDefinition, StrokeStyle};

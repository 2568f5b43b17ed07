use crate::topology::{LayoutResult, Projection, TopologyController, ViewportCommand};

/// What the canvas draws: the current layout and its styles, index-aligned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub layout: LayoutResult,
	pub projection: Projection,
}

impl Scene {
	pub fn capture(controller: &TopologyController) -> Self {
		Self {
			layout: controller.layout().clone(),
			projection: controller.projection().clone(),
		}
	}
}

/// A camera instruction. `seq` changes on every request so repeating the
/// same command still reaches the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportRequest {
	pub seq: u64,
	pub command: ViewportCommand,
}

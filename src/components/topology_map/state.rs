use std::collections::HashMap;

use crate::topology::{GraphEdge, Position, ViewportCommand};

use super::types::{Scene, ViewportRequest};

pub const NODE_RADIUS: f64 = 14.0;
pub const HIT_RADIUS: f64 = 18.0;
/// Pointer travel (px) below which a press/release counts as a click.
const CLICK_SLOP: f64 = 4.0;
const FIT_MARGIN: f64 = 0.85;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 4.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Result of releasing the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum Release {
	Node(String),
	Background,
	/// The pointer was dragged; nothing was clicked.
	Pan,
}

pub struct MapState {
	pub scene: Scene,
	/// node id -> index into `scene.layout.nodes`
	node_index: HashMap<String, usize>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hovered: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	/// `seq` of the last viewport request applied.
	applied_seq: Option<u64>,
}

impl MapState {
	pub fn new(scene: Scene, width: f64, height: f64) -> Self {
		let mut state = Self {
			node_index: index_nodes(&scene),
			scene,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hovered: None,
			width,
			height,
			flow_time: 0.0,
			applied_seq: None,
		};
		state.apply(ViewportCommand::FitAll);
		state
	}

	pub fn set_scene(&mut self, scene: Scene) {
		if scene.layout != self.scene.layout {
			self.hovered = None;
			self.node_index = index_nodes(&scene);
		}
		self.scene = scene;
	}

	/// Takes the latest scene and, if `request` is new, applies it against
	/// that scene. A request already applied is not replayed.
	pub fn sync(&mut self, scene: Scene, request: Option<ViewportRequest>) {
		self.set_scene(scene);
		if let Some(request) = request {
			if self.applied_seq != Some(request.seq) {
				self.applied_seq = Some(request.seq);
				self.apply(request.command);
			}
		}
	}

	/// Positions of both endpoints, if they exist in the scene.
	pub fn endpoints(&self, edge: &GraphEdge) -> Option<(Position, Position)> {
		let nodes = &self.scene.layout.nodes;
		let source = nodes[*self.node_index.get(&edge.source_id)?].position;
		let target = nodes[*self.node_index.get(&edge.target_id)?].position;
		Some((source, target))
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Index of the topmost node under the pointer.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// HIT_RADIUS is in world-space, scales with zoom like nodes
		self.scene
			.layout
			.nodes
			.iter()
			.rposition(|node| (node.position.x - gx).hypot(node.position.y - gy) < HIT_RADIUS)
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			self.hovered = self.node_at_position(x, y);
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if dx.hypot(dy) > CLICK_SLOP {
			self.pan.moved = true;
		}
		if self.pan.moved {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	pub fn end_pan(&mut self, x: f64, y: f64) -> Release {
		let moved = self.pan.active && self.pan.moved;
		self.pan = PanState::default();
		if moved {
			return Release::Pan;
		}
		match self.node_at_position(x, y) {
			Some(idx) => Release::Node(self.scene.layout.nodes[idx].id.clone()),
			None => Release::Background,
		}
	}

	pub fn cancel_pan(&mut self) {
		self.pan = PanState::default();
		self.hovered = None;
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn apply(&mut self, command: ViewportCommand) {
		match command {
			ViewportCommand::CenterOn { x, y } => {
				self.transform.x = self.width / 2.0 - x * self.transform.k;
				self.transform.y = self.height / 2.0 - y * self.transform.k;
			}
			ViewportCommand::FitAll => self.fit_all(),
		}
	}

	fn fit_all(&mut self) {
		let nodes = &self.scene.layout.nodes;
		if nodes.is_empty() {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		}
		let (mut min_x, mut min_y, mut max_x, mut max_y) =
			(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
		for node in nodes {
			min_x = min_x.min(node.position.x);
			min_y = min_y.min(node.position.y);
			max_x = max_x.max(node.position.x);
			max_y = max_y.max(node.position.y);
		}
		let pad = NODE_RADIUS * 2.0;
		let (w, h) = (max_x - min_x + pad * 2.0, max_y - min_y + pad * 2.0);
		let k = ((self.width / w).min(self.height / h) * FIT_MARGIN).clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn index_nodes(scene: &Scene) -> HashMap<String, usize> {
	scene
		.layout
		.nodes
		.iter()
		.enumerate()
		.map(|(i, node)| (node.id.clone(), i))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::topology::{EngineConfig, LayerType, TopologyController};

	fn state() -> MapState {
		let controller = TopologyController::new(EngineConfig::default()).unwrap();
		MapState::new(Scene::capture(&controller), 1200.0, 800.0)
	}

	fn screen_pos(state: &MapState, id: &str) -> (f64, f64) {
		let node = state.scene.layout.node(id).unwrap();
		(
			node.position.x * state.transform.k + state.transform.x,
			node.position.y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn fit_all_puts_every_node_on_screen() {
		let state = state();
		for node in &state.scene.layout.nodes {
			let (x, y) = screen_pos(&state, &node.id);
			assert!((0.0..=1200.0).contains(&x) && (0.0..=800.0).contains(&y), "{}", node.id);
		}
	}

	#[test]
	fn press_and_release_on_a_node_is_a_click() {
		let mut state = state();
		let (x, y) = screen_pos(&state, "svc-auth");
		state.begin_pan(x, y);
		state.pointer_moved(x + 1.0, y);
		assert_eq!(state.end_pan(x + 1.0, y), Release::Node("svc-auth".into()));
	}

	#[test]
	fn release_on_empty_space_is_a_background_click() {
		let mut state = state();
		state.begin_pan(2.0, 2.0);
		assert_eq!(state.end_pan(2.0, 2.0), Release::Background);
	}

	#[test]
	fn dragging_pans_instead_of_clicking() {
		let mut state = state();
		let (x, y) = screen_pos(&state, "svc-auth");
		let before = state.transform.x;
		state.begin_pan(x, y);
		state.pointer_moved(x + 50.0, y);
		assert_eq!(state.transform.x, before + 50.0);
		assert_eq!(state.end_pan(x + 50.0, y), Release::Pan);
	}

	#[test]
	fn center_on_moves_point_to_middle() {
		let mut state = state();
		let controller = TopologyController::new(EngineConfig::default()).unwrap();
		let y = controller.layout().layer_offsets.as_ref().unwrap()[&LayerType::Host];
		state.apply(ViewportCommand::CenterOn { x: 0.0, y });
		assert!((state.transform.y + y * state.transform.k - 400.0).abs() < 1e-9);
		assert!((state.transform.x - 600.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_keeps_the_pointer_anchor() {
		let mut state = state();
		let before = state.screen_to_graph(300.0, 200.0);
		state.zoom_at(300.0, 200.0, -1.0);
		let after = state.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn empty_scene_fits_to_identity() {
		let state = MapState::new(Scene::default(), 400.0, 300.0);
		assert_eq!(state.transform.k, 1.0);
		assert_eq!(state.node_at_position(200.0, 150.0), None);
	}

	#[test]
	fn fit_request_lands_on_the_scene_delivered_with_it() {
		let mut controller = TopologyController::new(EngineConfig::default()).unwrap();
		let mut state = MapState::new(Scene::capture(&controller), 1200.0, 800.0);
		let command = controller.select_layer(LayerType::Process).unwrap();
		assert_eq!(command, ViewportCommand::FitAll);

		let scene = Scene::capture(&controller);
		let fitted = MapState::new(scene.clone(), 1200.0, 800.0).transform;
		let request = ViewportRequest { seq: 0, command };
		state.sync(scene.clone(), Some(request));
		assert!((state.transform.k - fitted.k).abs() < 1e-9);
		assert!((state.transform.x - fitted.x).abs() < 1e-9);
		assert!((state.transform.y - fitted.y).abs() < 1e-9);

		// a scene-only update keeps the camera where the user left it
		state.begin_pan(10.0, 10.0);
		state.pointer_moved(60.0, 10.0);
		state.end_pan(60.0, 10.0);
		let panned = state.transform.x;
		state.sync(scene, Some(request));
		assert_eq!(state.transform.x, panned);
	}
}

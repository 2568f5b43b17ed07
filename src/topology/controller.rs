//! Selection & mode controller.
//!
//! Owns the current layout, the selection derived from it, and the active
//! layout/view modes. Every UI event goes through [`TopologyController::dispatch`];
//! nothing else may regenerate the graph.

use std::collections::{BTreeMap, HashSet};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::catalog::EntityCatalog;
use super::cluster::{ClusterFocus, generate_cluster_layout};
use super::config::EngineConfig;
use super::error::TopologyError;
use super::projection::{Projection, ViewMode, project};
use super::resolve::{Reachability, counts_by_layer, resolve};
use super::stack::layout_catalog;
use super::types::{LayerType, LayoutResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
	#[default]
	Stack,
	Cluster,
}

impl LayoutMode {
	/// Process and host layers are shown as clusters, everything else stacked.
	pub fn for_layer(layer: LayerType) -> Self {
		match ClusterFocus::from_layer(layer) {
			Some(_) => Self::Cluster,
			None => Self::Stack,
		}
	}
}

/// UI events understood by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	ClickNode(String),
	ClickBackground,
	SelectLayer(LayerType),
	ToggleViewMode,
}

/// Camera instruction for the viewport after a regeneration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportCommand {
	CenterOn { x: f64, y: f64 },
	FitAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPhase {
	Idle,
	Selected(String),
}

/// The selected node and everything derived from it. Only constructible
/// from a layout, so the related sets can never drift from the selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
	selected_node_id: Option<String>,
	related: Reachability,
	related_counts_by_layer: BTreeMap<LayerType, usize>,
}

impl SelectionState {
	pub fn idle() -> Self {
		Self::default()
	}

	/// Selects `node_id` within `layout`. Unknown ids give the idle state.
	pub fn derive(layout: &LayoutResult, node_id: &str) -> Self {
		let related = resolve(&layout.nodes, &layout.edges, Some(node_id));
		if related.is_empty() {
			return Self::idle();
		}
		Self {
			selected_node_id: Some(node_id.to_owned()),
			related_counts_by_layer: counts_by_layer(&layout.nodes, &related),
			related,
		}
	}

	pub fn phase(&self) -> SelectionPhase {
		match &self.selected_node_id {
			Some(id) => SelectionPhase::Selected(id.clone()),
			None => SelectionPhase::Idle,
		}
	}

	pub fn selected_node_id(&self) -> Option<&str> {
		self.selected_node_id.as_deref()
	}

	pub fn related(&self) -> &Reachability {
		&self.related
	}

	pub fn related_node_ids(&self) -> &HashSet<String> {
		&self.related.node_ids
	}

	pub fn related_edge_ids(&self) -> &HashSet<String> {
		&self.related.edge_ids
	}

	/// Per-layer related counts, `None` while nothing is selected.
	pub fn related_counts_by_layer(&self) -> Option<&BTreeMap<LayerType, usize>> {
		self.selected_node_id
			.as_ref()
			.map(|_| &self.related_counts_by_layer)
	}
}

/// One legend row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSummary {
	pub layer: LayerType,
	pub total: usize,
	pub related: Option<usize>,
}

pub struct TopologyController<R = StdRng> {
	config: EngineConfig,
	catalog: EntityCatalog,
	rng: R,
	layout: LayoutResult,
	layout_mode: LayoutMode,
	focus_layer: Option<LayerType>,
	view_mode: ViewMode,
	selection: SelectionState,
	projection: Projection,
	generation: u64,
}

impl TopologyController<StdRng> {
	/// Controller over the demo catalog, seeded from `config`.
	pub fn new(config: EngineConfig) -> Result<Self, TopologyError> {
		let rng = StdRng::seed_from_u64(config.seed());
		Self::with_parts(config, EntityCatalog::demo(), rng)
	}
}

impl<R: Rng> TopologyController<R> {
	/// Validates `config` and performs the initial stack generation.
	pub fn with_parts(
		config: EngineConfig,
		catalog: EntityCatalog,
		rng: R,
	) -> Result<Self, TopologyError> {
		config.validate()?;
		let layout = layout_catalog(&catalog, &config.stack)?;
		let mut controller = Self {
			config,
			catalog,
			rng,
			layout,
			layout_mode: LayoutMode::Stack,
			focus_layer: None,
			view_mode: ViewMode::default(),
			selection: SelectionState::idle(),
			projection: Projection::default(),
			generation: 1,
		};
		controller.reproject();
		Ok(controller)
	}

	pub fn dispatch(&mut self, action: Action) -> Result<Option<ViewportCommand>, TopologyError> {
		match action {
			Action::ClickNode(id) => self.click_node(&id),
			Action::ClickBackground => self.click_background(),
			Action::SelectLayer(layer) => return self.select_layer(layer).map(Some),
			Action::ToggleViewMode => self.toggle_view_mode(),
		}
		Ok(None)
	}

	/// Selects `id`, or clears the selection when `id` is already selected.
	/// Ids outside the current layout are ignored.
	pub fn click_node(&mut self, id: &str) {
		if !self.layout.contains_node(id) {
			warn!("ignoring click on unknown node `{id}` (generation {})", self.generation);
			return;
		}
		if self.selection.selected_node_id() == Some(id) {
			debug!("deselect {id}");
			self.selection = SelectionState::idle();
		} else {
			self.selection = SelectionState::derive(&self.layout, id);
			debug!(
				"select {id}: {} related nodes, {} related edges",
				self.selection.related_node_ids().len(),
				self.selection.related_edge_ids().len()
			);
		}
		self.reproject();
	}

	pub fn click_background(&mut self) {
		if self.selection.selected_node_id().is_some() {
			debug!("background click clears selection");
		}
		self.selection = SelectionState::idle();
		self.reproject();
	}

	/// Regenerates the graph for `layer` and drops any selection. Returns the
	/// camera move the viewport should perform.
	pub fn select_layer(&mut self, layer: LayerType) -> Result<ViewportCommand, TopologyError> {
		self.selection = SelectionState::idle();

		let layout_mode = LayoutMode::for_layer(layer);
		let layout = match ClusterFocus::from_layer(layer) {
			Some(focus) => generate_cluster_layout(
				focus,
				self.generation + 1,
				&self.config.cluster,
				&mut self.rng,
			),
			None => layout_catalog(&self.catalog, &self.config.stack),
		};
		let layout = match layout {
			Ok(layout) => layout,
			Err(err) => {
				self.reproject();
				return Err(err);
			}
		};

		self.layout = layout;
		self.layout_mode = layout_mode;
		self.focus_layer = Some(layer);
		self.generation += 1;
		self.reproject();
		info!(
			"layer {layer} selected: {:?} layout, generation {}",
			layout_mode, self.generation
		);

		let offset = self
			.layout
			.layer_offsets
			.as_ref()
			.and_then(|offsets| offsets.get(&layer));
		Ok(match (layout_mode, offset) {
			(LayoutMode::Stack, Some(&y)) => ViewportCommand::CenterOn { x: 0.0, y },
			_ => ViewportCommand::FitAll,
		})
	}

	/// Flips the color mapping. Selection and layout are untouched.
	pub fn toggle_view_mode(&mut self) {
		self.view_mode = self.view_mode.toggled();
		debug!("view mode -> {:?}", self.view_mode);
		self.reproject();
	}

	fn reproject(&mut self) {
		self.projection = project(
			&self.layout.nodes,
			&self.layout.edges,
			self.selection.related(),
			self.view_mode,
		);
	}

	pub fn layout(&self) -> &LayoutResult {
		&self.layout
	}

	pub fn projection(&self) -> &Projection {
		&self.projection
	}

	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	pub fn phase(&self) -> SelectionPhase {
		self.selection.phase()
	}

	pub fn layout_mode(&self) -> LayoutMode {
		self.layout_mode
	}

	pub fn view_mode(&self) -> ViewMode {
		self.view_mode
	}

	/// Layer picked in the legend, if any since startup.
	pub fn focus_layer(&self) -> Option<LayerType> {
		self.focus_layer
	}

	/// Bumped on every regeneration.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Static totals plus related counts for the legend.
	pub fn layer_summaries(&self) -> Vec<LayerSummary> {
		let related = self.selection.related_counts_by_layer();
		self.layout
			.layer_totals()
			.into_iter()
			.map(|(layer, total)| LayerSummary {
				layer,
				total,
				related: related.map(|counts| counts.get(&layer).copied().unwrap_or(0)),
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::topology::projection::DIMMED_NODE_OPACITY;

	fn controller() -> TopologyController {
		TopologyController::new(EngineConfig::default()).unwrap()
	}

	#[test]
	fn starts_idle_on_the_stack_layout() {
		let c = controller();
		assert_eq!(c.phase(), SelectionPhase::Idle);
		assert_eq!(c.layout_mode(), LayoutMode::Stack);
		assert_eq!(c.view_mode(), ViewMode::Topology);
		assert!(c.layout().layer_offsets.is_some());
		assert_eq!(c.projection().node_styles.len(), c.layout().nodes.len());
		assert!(c.layer_summaries().iter().all(|s| s.related.is_none()));
	}

	#[test]
	fn click_selects_the_component() {
		let mut c = controller();
		c.click_node("svc-payment");
		assert_eq!(c.phase(), SelectionPhase::Selected("svc-payment".into()));

		let related = c.selection().related_node_ids();
		assert!(related.contains("app-webshop"));
		assert!(related.contains("dc-us-east"));
		// back-office stack is a separate component
		assert!(!related.contains("app-backoffice"));
		assert!(!related.contains("svc-reporting"));

		let summaries = c.layer_summaries();
		let related_total: usize = summaries.iter().filter_map(|s| s.related).sum();
		assert_eq!(related_total, related.len());
	}

	#[test]
	fn clicking_twice_restores_the_idle_state() {
		let mut c = controller();
		let selection = c.selection().clone();
		let projection = c.projection().clone();

		c.click_node("proc-redis");
		assert_ne!(c.projection(), &projection);
		c.click_node("proc-redis");

		assert_eq!(c.selection(), &selection);
		assert_eq!(c.projection(), &projection);
	}

	#[test]
	fn clicking_another_node_moves_the_selection() {
		let mut c = controller();
		c.click_node("svc-checkout");
		c.click_node("host-win-01");
		assert_eq!(c.phase(), SelectionPhase::Selected("host-win-01".into()));
		assert!(c.selection().related_node_ids().contains("app-backoffice"));
		assert!(!c.selection().related_node_ids().contains("svc-checkout"));
	}

	#[test]
	fn background_click_clears() {
		let mut c = controller();
		c.click_node("app-webshop");
		c.dispatch(Action::ClickBackground).unwrap();
		assert_eq!(c.phase(), SelectionPhase::Idle);
		assert_eq!(c.selection().related_counts_by_layer(), None);
		assert!(c.projection().node_styles.iter().all(|s| s.opacity == 1.0));
	}

	#[test]
	fn unknown_node_click_is_ignored() {
		let mut c = controller();
		c.click_node("app-webshop");
		c.click_node("does-not-exist");
		assert_eq!(c.phase(), SelectionPhase::Selected("app-webshop".into()));
	}

	#[test]
	fn orphan_selection_highlights_only_itself() {
		let mut c = controller();
		c.click_node("dc-lab");
		assert_eq!(c.selection().related_node_ids().len(), 1);
		assert!(c.selection().related_edge_ids().is_empty());
		let dimmed = c
			.projection()
			.node_styles
			.iter()
			.filter(|s| s.opacity == DIMMED_NODE_OPACITY)
			.count();
		assert_eq!(dimmed, c.layout().nodes.len() - 1);
	}

	#[test]
	fn layer_select_resets_selection_and_switches_mode() {
		let mut c = controller();
		c.click_node("svc-auth");

		let command = c.dispatch(Action::SelectLayer(LayerType::Process)).unwrap();
		assert_eq!(command, Some(ViewportCommand::FitAll));
		assert_eq!(c.layout_mode(), LayoutMode::Cluster);
		assert_eq!(c.phase(), SelectionPhase::Idle);
		assert!(c.layout().layer_offsets.is_none());
		assert!(c.projection().node_styles.iter().all(|s| !s.desaturate));
		assert!(c.projection().edge_styles.iter().all(|s| !s.animated));
		assert_eq!(c.focus_layer(), Some(LayerType::Process));
	}

	#[test]
	fn stack_layer_select_centers_on_its_row() {
		let mut c = controller();
		c.select_layer(LayerType::Host).unwrap();
		let command = c.select_layer(LayerType::Service).unwrap();
		let y = c.layout().layer_offsets.as_ref().unwrap()[&LayerType::Service];
		assert_eq!(command, ViewportCommand::CenterOn { x: 0.0, y });
		assert_eq!(c.layout_mode(), LayoutMode::Stack);
	}

	#[test]
	fn stale_selection_is_not_carried_across_regeneration() {
		let mut c = controller();
		c.select_layer(LayerType::Host).unwrap();
		c.click_node("g2-hg0-hub");
		assert_eq!(c.phase(), SelectionPhase::Selected("g2-hg0-hub".into()));
		c.select_layer(LayerType::Host).unwrap();
		assert_eq!(c.phase(), SelectionPhase::Idle);
		assert_eq!(c.generation(), 3);
		assert!(!c.layout().contains_node("g2-hg0-hub"));
		c.click_node("g2-hg0-hub");
		assert_eq!(c.phase(), SelectionPhase::Idle);
	}

	#[test]
	fn view_mode_toggle_keeps_selection() {
		let mut c = controller();
		c.click_node("svc-search");
		let selection = c.selection().clone();
		let before = c.projection().clone();

		c.dispatch(Action::ToggleViewMode).unwrap();
		assert_eq!(c.view_mode(), ViewMode::VulnerabilityOverlay);
		assert_eq!(c.selection(), &selection);
		assert_ne!(c.projection(), &before);
		let opacities = |p: &Projection| p.node_styles.iter().map(|s| s.opacity).collect::<Vec<_>>();
		assert_eq!(opacities(c.projection()), opacities(&before));

		c.toggle_view_mode();
		assert_eq!(c.projection(), &before);
	}

	#[test]
	fn counts_are_conserved_for_every_node() {
		let mut c = controller();
		let ids: Vec<String> = c.layout().nodes.iter().map(|n| n.id.clone()).collect();
		for id in ids {
			c.click_background();
			c.click_node(&id);
			let counts = c.selection().related_counts_by_layer().unwrap();
			assert_eq!(
				counts.values().sum::<usize>(),
				c.selection().related_node_ids().len(),
				"{id}"
			);
		}
	}

	#[test]
	fn debris_never_joins_a_cluster_selection() {
		let mut c = controller();
		c.select_layer(LayerType::Process).unwrap();
		let debris: Vec<String> = c
			.layout()
			.isolated_node_ids()
			.into_iter()
			.map(str::to_owned)
			.collect();
		assert!(!debris.is_empty());
		let others: Vec<String> = c
			.layout()
			.nodes
			.iter()
			.map(|n| n.id.clone())
			.filter(|id| !debris.contains(id))
			.collect();
		for id in others {
			c.click_background();
			c.click_node(&id);
			for d in &debris {
				assert!(!c.selection().related_node_ids().contains(d));
			}
		}
	}

	#[test]
	fn same_seed_regenerates_the_same_cluster() {
		let config = EngineConfig {
			seed: Some(99),
			..EngineConfig::default()
		};
		let mut a = TopologyController::new(config.clone()).unwrap();
		let mut b = TopologyController::new(config).unwrap();
		a.select_layer(LayerType::Process).unwrap();
		b.select_layer(LayerType::Process).unwrap();
		assert_eq!(a.layout(), b.layout());
	}

	#[test]
	fn invalid_config_is_rejected_up_front() {
		let mut config = EngineConfig::default();
		config.cluster.core_link_probability = -0.1;
		assert!(matches!(
			TopologyController::new(config),
			Err(TopologyError::InvalidConfig(_))
		));
	}

	#[test]
	fn empty_catalog_is_a_valid_empty_graph() {
		let mut c = TopologyController::with_parts(
			EngineConfig::default(),
			EntityCatalog::default(),
			StdRng::seed_from_u64(1),
		)
		.unwrap();
		assert!(c.layout().is_empty());
		assert!(c.projection().node_styles.is_empty());
		assert_eq!(c.select_layer(LayerType::Application).unwrap(), ViewportCommand::FitAll);
	}
}

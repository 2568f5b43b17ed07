//! Clustered "star" layout: one or more centers, each wrapped in a meshed
//! core ring and a jittered outer ring, plus isolated debris nodes.
//!
//! All randomness comes from the `Rng` passed in, so a seeded generator
//! reproduces the exact same graph.

use std::collections::HashSet;
use std::f64::consts::TAU;

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::ClusterConfig;
use super::error::TopologyError;
use super::types::{
	GraphEdge, GraphNode, HealthStatus, LayerType, LayoutResult, Position, Severity, Technology,
};

/// Which layer sits at the center of the stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterFocus {
	Process,
	Host,
}

impl ClusterFocus {
	pub fn from_layer(layer: LayerType) -> Option<Self> {
		match layer {
			LayerType::Process => Some(Self::Process),
			LayerType::Host => Some(Self::Host),
			_ => None,
		}
	}

	pub fn layer(self) -> LayerType {
		match self {
			Self::Process => LayerType::Process,
			Self::Host => LayerType::Host,
		}
	}

	/// Layer of the outer ring: the consumers of the focus layer.
	fn outer_layer(self) -> LayerType {
		match self {
			Self::Process => LayerType::Service,
			Self::Host => LayerType::Process,
		}
	}

	fn cluster_count(self, config: &ClusterConfig) -> usize {
		match self {
			Self::Process => config.process_clusters,
			Self::Host => config.host_clusters,
		}
	}

	fn id_prefix(self) -> &'static str {
		match self {
			Self::Process => "pg",
			Self::Host => "hg",
		}
	}

	fn technologies(self) -> &'static [Technology] {
		match self {
			Self::Process => &[
				Technology::Java,
				Technology::NodeJs,
				Technology::Python,
				Technology::Go,
				Technology::DotNet,
				Technology::Nginx,
			],
			Self::Host => &[Technology::Linux, Technology::Windows, Technology::Kubernetes],
		}
	}
}

/// Tracks emitted edges so no unordered pair is produced twice.
#[derive(Default)]
struct EdgeSet {
	edges: Vec<GraphEdge>,
	pairs: HashSet<(String, String)>,
}

impl EdgeSet {
	fn link(&mut self, a: &str, b: &str) -> bool {
		if a == b {
			return false;
		}
		let key = if a <= b {
			(a.to_owned(), b.to_owned())
		} else {
			(b.to_owned(), a.to_owned())
		};
		if !self.pairs.insert(key) {
			return false;
		}
		self.edges.push(GraphEdge::between(a, b));
		true
	}
}

fn random_status<R: Rng + ?Sized>(rng: &mut R) -> HealthStatus {
	match rng.gen_range(0..100) {
		0..=79 => HealthStatus::Healthy,
		80..=94 => HealthStatus::Warning,
		_ => HealthStatus::Critical,
	}
}

fn random_severity<R: Rng + ?Sized>(rng: &mut R) -> Option<Severity> {
	match rng.gen_range(0..100) {
		0..=64 => None,
		65..=79 => Some(Severity::Low),
		80..=89 => Some(Severity::Medium),
		90..=96 => Some(Severity::High),
		_ => Some(Severity::Critical),
	}
}

fn make_node<R: Rng + ?Sized>(
	rng: &mut R,
	id: String,
	layer_type: LayerType,
	sub_label: &str,
	technologies: &[Technology],
	position: Position,
) -> GraphNode {
	let technology_tag = if technologies.is_empty() {
		None
	} else {
		Some(technologies[rng.gen_range(0..technologies.len())])
	};
	GraphNode {
		label: id.clone(),
		id,
		layer_type,
		sub_label: sub_label.to_owned(),
		status: random_status(rng),
		vulnerability_severity: random_severity(rng),
		technology_tag,
		position,
	}
}

/// Centers are laid out on the x axis, symmetric around the origin.
pub fn cluster_centers(count: usize, config: &ClusterConfig) -> Vec<Position> {
	let mid = (count as f64 - 1.0) / 2.0;
	(0..count)
		.map(|i| Position::new((i as f64 - mid) * config.cluster_spacing, 0.0))
		.collect()
}

/// Generates one cluster layout. Ids carry `generation`, so layouts from
/// different regenerations never share an id.
pub fn generate_cluster_layout<R: Rng + ?Sized>(
	focus: ClusterFocus,
	generation: u64,
	config: &ClusterConfig,
	rng: &mut R,
) -> Result<LayoutResult, TopologyError> {
	config.validate()?;

	let layer = focus.layer();
	let outer_layer = focus.outer_layer();
	let prefix = format!("g{generation}-{}", focus.id_prefix());
	let technologies = focus.technologies();
	let centers = cluster_centers(focus.cluster_count(config), config);

	let mut nodes = Vec::new();
	let mut edges = EdgeSet::default();

	for (c, center) in centers.iter().enumerate() {
		let center_id = format!("{prefix}{c}-hub");
		nodes.push(make_node(
			rng,
			center_id.clone(),
			layer,
			"Cluster hub",
			technologies,
			*center,
		));

		let mut core_ids = Vec::with_capacity(config.core_count);
		for i in 0..config.core_count {
			let angle = i as f64 / config.core_count as f64 * TAU;
			let id = format!("{prefix}{c}-core-{i}");
			nodes.push(make_node(
				rng,
				id.clone(),
				layer,
				"Core member",
				technologies,
				Position::new(
					center.x + config.core_radius * angle.cos(),
					center.y + config.core_radius * angle.sin(),
				),
			));
			edges.link(&center_id, &id);
			core_ids.push(id);
		}
		for i in 0..core_ids.len() {
			if rng.gen_bool(config.core_link_probability) {
				let next = (i + 1) % core_ids.len();
				edges.link(&core_ids[i], &core_ids[next]);
			}
		}

		let mut outer_ids = Vec::with_capacity(config.outer_count);
		for i in 0..config.outer_count {
			let angle = i as f64 / config.outer_count as f64 * TAU
				+ rng.gen_range(-config.angle_jitter..=config.angle_jitter);
			let radius = config.outer_radius
				+ rng.gen_range(-config.outer_radius_jitter..=config.outer_radius_jitter);
			let id = format!("{prefix}{c}-outer-{i}");
			nodes.push(make_node(
				rng,
				id.clone(),
				outer_layer,
				"Consumer",
				&[],
				Position::new(
					center.x + radius * angle.cos(),
					center.y + radius * angle.sin(),
				),
			));
			if !core_ids.is_empty() {
				let parent = &core_ids[rng.gen_range(0..core_ids.len())];
				edges.link(parent, &id);
			} else {
				edges.link(&center_id, &id);
			}
			outer_ids.push(id);
		}
		if outer_ids.len() > 1 {
			for i in 0..outer_ids.len() {
				if rng.gen_bool(config.chaos_link_probability) {
					// pick any other outer node
					let mut j = rng.gen_range(0..outer_ids.len() - 1);
					if j >= i {
						j += 1;
					}
					edges.link(&outer_ids[i], &outer_ids[j]);
				}
			}
		}
	}

	for i in 0..config.debris_count {
		let angle = rng.gen_range(0.0..TAU);
		let radius = rng.gen_range(config.debris_min_radius..=config.debris_max_radius);
		nodes.push(make_node(
			rng,
			format!("{prefix}-debris-{i}"),
			layer,
			"Unconnected",
			technologies,
			Position::new(radius * angle.cos(), radius * angle.sin()),
		));
	}

	let layout = LayoutResult {
		nodes,
		edges: edges.edges,
		layer_offsets: None,
	};
	layout.validate()?;

	info!(
		"cluster layout ({:?}, generation {generation}): {} clusters, {} nodes, {} edges",
		focus,
		centers.len(),
		layout.nodes.len(),
		layout.edges.len()
	);
	Ok(layout)
}

//! Graph model: entity categories, nodes, edges and the layout snapshot
//! handed from the generators to the resolver and the canvas.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TopologyError;

/// Architectural layer of an entity, ordered top (application) to bottom
/// (datacenter).
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
	Application,
	Service,
	Process,
	Host,
	Datacenter,
}

impl LayerType {
	pub const ALL: [Self; 5] = [
		Self::Application,
		Self::Service,
		Self::Process,
		Self::Host,
		Self::Datacenter,
	];

	/// Row index in the stack layout.
	pub fn row(self) -> usize {
		match self {
			Self::Application => 0,
			Self::Service => 1,
			Self::Process => 2,
			Self::Host => 3,
			Self::Datacenter => 4,
		}
	}

	pub fn key(self) -> &'static str {
		match self {
			Self::Application => "application",
			Self::Service => "service",
			Self::Process => "process",
			Self::Host => "host",
			Self::Datacenter => "datacenter",
		}
	}

	/// Plural heading used by the legend.
	pub fn title(self) -> &'static str {
		match self {
			Self::Application => "Applications",
			Self::Service => "Services",
			Self::Process => "Processes",
			Self::Host => "Hosts",
			Self::Datacenter => "Datacenters",
		}
	}
}

impl fmt::Display for LayerType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

impl FromStr for LayerType {
	type Err = TopologyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"application" | "applications" | "app" => Ok(Self::Application),
			"service" | "services" => Ok(Self::Service),
			"process" | "processes" => Ok(Self::Process),
			"host" | "hosts" => Ok(Self::Host),
			"datacenter" | "datacenters" | "dc" => Ok(Self::Datacenter),
			other => Err(TopologyError::UnknownEntity(format!("layer `{other}`"))),
		}
	}
}

/// Health of an entity, independent of its vulnerability findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	#[default]
	Healthy,
	Warning,
	Critical,
}

/// Worst open vulnerability on an entity.
///
/// Variants are declared from least to most severe so the derived ordering
/// matches severity: `Low < Medium < High < Critical`.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Low,
	Medium,
	High,
	Critical,
}

impl Severity {
	pub const ALL: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];
}

/// Technology classification, only used to pick an icon and accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
	Browser,
	Mobile,
	Java,
	NodeJs,
	Python,
	Go,
	DotNet,
	Nginx,
	Postgres,
	Redis,
	Kafka,
	Linux,
	Windows,
	Kubernetes,
	Aws,
	Azure,
	OnPrem,
}

impl Technology {
	pub const ALL: [Self; 17] = [
		Self::Browser,
		Self::Mobile,
		Self::Java,
		Self::NodeJs,
		Self::Python,
		Self::Go,
		Self::DotNet,
		Self::Nginx,
		Self::Postgres,
		Self::Redis,
		Self::Kafka,
		Self::Linux,
		Self::Windows,
		Self::Kubernetes,
		Self::Aws,
		Self::Azure,
		Self::OnPrem,
	];

	/// Icon glyph and accent color.
	fn entry(self) -> (&'static str, &'static str) {
		match self {
			Self::Browser => ("\u{1F310}", "#60a5fa"),
			Self::Mobile => ("\u{1F4F1}", "#a78bfa"),
			Self::Java => ("J", "#f97316"),
			Self::NodeJs => ("N", "#22c55e"),
			Self::Python => ("Py", "#facc15"),
			Self::Go => ("Go", "#38bdf8"),
			Self::DotNet => (".N", "#8b5cf6"),
			Self::Nginx => ("Nx", "#16a34a"),
			Self::Postgres => ("Pg", "#3b82f6"),
			Self::Redis => ("R", "#ef4444"),
			Self::Kafka => ("K", "#e5e7eb"),
			Self::Linux => ("L", "#fbbf24"),
			Self::Windows => ("W", "#0ea5e9"),
			Self::Kubernetes => ("k8s", "#326ce5"),
			Self::Aws => ("aws", "#ff9900"),
			Self::Azure => ("az", "#0078d4"),
			Self::OnPrem => ("DC", "#9ca3af"),
		}
	}

	pub fn icon(self) -> &'static str {
		self.entry().0
	}

	pub fn accent_color(self) -> &'static str {
		self.entry().1
	}
}

/// World-space coordinate assigned by a layout generator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance_to(&self, other: &Position) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub id: String,
	pub layer_type: LayerType,
	pub label: String,
	pub sub_label: String,
	pub status: HealthStatus,
	pub vulnerability_severity: Option<Severity>,
	pub technology_tag: Option<Technology>,
	pub position: Position,
}

/// An edge between two nodes. `source_id`/`target_id` only drive the
/// direction of the flow animation; reachability ignores direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
	pub id: String,
	pub source_id: String,
	pub target_id: String,
}

impl GraphEdge {
	/// Builds an edge whose id is derived from its endpoints.
	pub fn between(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
		let (source_id, target_id) = (source_id.into(), target_id.into());
		Self {
			id: format!("{source_id}->{target_id}"),
			source_id,
			target_id,
		}
	}

	/// Endpoints ordered so `{a, b}` and `{b, a}` compare equal.
	pub fn unordered_pair(&self) -> (&str, &str) {
		if self.source_id <= self.target_id {
			(&self.source_id, &self.target_id)
		} else {
			(&self.target_id, &self.source_id)
		}
	}

	pub fn touches(&self, node_id: &str) -> bool {
		self.source_id == node_id || self.target_id == node_id
	}
}

/// A complete generated graph. Replaced wholesale on regeneration, never
/// edited in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	/// Vertical coordinate of each row; only set by the stack layout.
	pub layer_offsets: Option<BTreeMap<LayerType, f64>>,
}

impl LayoutResult {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.node(id).is_some()
	}

	/// Number of nodes per layer. Layers without nodes report zero.
	pub fn layer_totals(&self) -> BTreeMap<LayerType, usize> {
		let mut totals: BTreeMap<LayerType, usize> =
			LayerType::ALL.iter().map(|&layer| (layer, 0)).collect();
		for node in &self.nodes {
			*totals.entry(node.layer_type).or_default() += 1;
		}
		totals
	}

	/// Number of edges attached to a node.
	pub fn degree(&self, id: &str) -> usize {
		self.edges.iter().filter(|e| e.touches(id)).count()
	}

	/// Ids of nodes with no edges at all.
	pub fn isolated_node_ids(&self) -> Vec<&str> {
		let mut attached: HashSet<&str> = HashSet::new();
		for edge in &self.edges {
			attached.insert(&edge.source_id);
			attached.insert(&edge.target_id);
		}
		self.nodes
			.iter()
			.map(|n| n.id.as_str())
			.filter(|id| !attached.contains(id))
			.collect()
	}

	/// Rejects dangling edges, duplicate ids, self loops and repeated
	/// unordered endpoint pairs.
	pub fn validate(&self) -> Result<(), TopologyError> {
		let mut node_ids: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !node_ids.insert(&node.id) {
				return Err(TopologyError::MalformedGraph(format!(
					"duplicate node id `{}`",
					node.id
				)));
			}
		}

		let mut edge_ids: HashSet<&str> = HashSet::with_capacity(self.edges.len());
		let mut pairs: HashMap<(&str, &str), &str> = HashMap::with_capacity(self.edges.len());
		for edge in &self.edges {
			for endpoint in [&edge.source_id, &edge.target_id] {
				if !node_ids.contains(endpoint.as_str()) {
					return Err(TopologyError::MalformedGraph(format!(
						"edge `{}` references unknown node `{endpoint}`",
						edge.id
					)));
				}
			}
			if edge.source_id == edge.target_id {
				return Err(TopologyError::MalformedGraph(format!(
					"edge `{}` is a self loop on `{}`",
					edge.id, edge.source_id
				)));
			}
			if !edge_ids.insert(&edge.id) {
				return Err(TopologyError::MalformedGraph(format!(
					"duplicate edge id `{}`",
					edge.id
				)));
			}
			if let Some(existing) = pairs.insert(edge.unordered_pair(), &edge.id) {
				return Err(TopologyError::MalformedGraph(format!(
					"edges `{existing}` and `{}` connect the same pair",
					edge.id
				)));
			}
		}
		Ok(())
	}
}

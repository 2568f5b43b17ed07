//! Maps a reachability result onto per-node and per-edge display attributes.
//!
//! Styles are returned index-aligned with the node and edge slices they were
//! computed from; the graph itself is never touched.

use serde::{Deserialize, Serialize};

use super::resolve::Reachability;
use super::types::{GraphEdge, GraphNode, HealthStatus, LayerType, Severity};

pub const DIMMED_NODE_OPACITY: f64 = 0.2;
pub const DEFAULT_EDGE_OPACITY: f64 = 0.6;
pub const DIMMED_EDGE_OPACITY: f64 = 0.1;
pub const HIGHLIGHT_EDGE_OPACITY: f64 = 0.95;
pub const DEFAULT_EDGE_WIDTH: f64 = 1.5;
pub const HIGHLIGHT_EDGE_WIDTH: f64 = 3.0;

pub const DEFAULT_EDGE_COLOR: &str = "#64b4ff";
pub const HIGHLIGHT_EDGE_COLOR: &str = "#00e5ff";
/// Overlay color for entities without a finding.
pub const NO_FINDING_COLOR: &str = "#4b5563";

/// Color mapping used for node fills. Orthogonal to selection and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
	#[default]
	Topology,
	VulnerabilityOverlay,
}

impl ViewMode {
	pub fn toggled(self) -> Self {
		match self {
			Self::Topology => Self::VulnerabilityOverlay,
			Self::VulnerabilityOverlay => Self::Topology,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Topology => "Topology",
			Self::VulnerabilityOverlay => "Vulnerabilities",
		}
	}
}

pub fn layer_color(layer: LayerType) -> &'static str {
	match layer {
		LayerType::Application => "#a855f7", // Purple
		LayerType::Service => "#3b82f6",     // Blue
		LayerType::Process => "#14b8a6",     // Teal
		LayerType::Host => "#22c55e",        // Green
		LayerType::Datacenter => "#94a3b8",  // Slate
	}
}

pub fn severity_color(severity: Option<Severity>) -> &'static str {
	match severity {
		Some(Severity::Critical) => "#dc2626", // Red
		Some(Severity::High) => "#f97316",     // Orange
		Some(Severity::Medium) => "#facc15",   // Yellow
		Some(Severity::Low) => "#60a5fa",      // Light blue
		None => NO_FINDING_COLOR,
	}
}

pub fn status_color(status: HealthStatus) -> &'static str {
	match status {
		HealthStatus::Healthy => "#22c55e",
		HealthStatus::Warning => "#f59e0b",
		HealthStatus::Critical => "#ef4444",
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
	pub fill: &'static str,
	/// Health ring drawn around the node.
	pub stroke: &'static str,
	pub opacity: f64,
	/// Render without color saturation.
	pub desaturate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
	pub stroke: &'static str,
	pub width: f64,
	pub opacity: f64,
	/// Animate flow from source to target.
	pub animated: bool,
}

impl EdgeStyle {
	fn default_stroke() -> Self {
		Self {
			stroke: DEFAULT_EDGE_COLOR,
			width: DEFAULT_EDGE_WIDTH,
			opacity: DEFAULT_EDGE_OPACITY,
			animated: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
	pub node_styles: Vec<NodeStyle>,
	pub edge_styles: Vec<EdgeStyle>,
}

pub fn project(
	nodes: &[GraphNode],
	edges: &[GraphEdge],
	related: &Reachability,
	view_mode: ViewMode,
) -> Projection {
	let highlighting = !related.is_empty();

	let node_styles = nodes
		.iter()
		.map(|node| {
			let fill = match view_mode {
				ViewMode::Topology => layer_color(node.layer_type),
				ViewMode::VulnerabilityOverlay => severity_color(node.vulnerability_severity),
			};
			let dimmed = highlighting && !related.contains_node(&node.id);
			NodeStyle {
				fill,
				stroke: status_color(node.status),
				opacity: if dimmed { DIMMED_NODE_OPACITY } else { 1.0 },
				desaturate: dimmed,
			}
		})
		.collect();

	let edge_styles = edges
		.iter()
		.map(|edge| {
			if !highlighting {
				EdgeStyle::default_stroke()
			} else if related.contains_edge(&edge.id) {
				EdgeStyle {
					stroke: HIGHLIGHT_EDGE_COLOR,
					width: HIGHLIGHT_EDGE_WIDTH,
					opacity: HIGHLIGHT_EDGE_OPACITY,
					animated: true,
				}
			} else {
				EdgeStyle {
					opacity: DIMMED_EDGE_OPACITY,
					..EdgeStyle::default_stroke()
				}
			}
		})
		.collect();

	Projection {
		node_styles,
		edge_styles,
	}
}

//! Topology graph engine behind the dependency map.
//!
//! Layout generators build a [`LayoutResult`], the resolver finds the
//! connected component around a selected node, and the projection turns that
//! into per-node/per-edge styles. [`TopologyController`] ties them together
//! and is the only place a graph gets regenerated.

mod catalog;
mod cluster;
mod config;
mod controller;
mod error;
mod projection;
mod resolve;
mod stack;
mod types;

pub use catalog::{CatalogEntity, EntityCatalog};
pub use cluster::{ClusterFocus, cluster_centers, generate_cluster_layout};
pub use config::{ClusterConfig, DEFAULT_SEED, EngineConfig, StackConfig};
pub use controller::{
	Action, LayerSummary, LayoutMode, SelectionPhase, SelectionState, TopologyController,
	ViewportCommand,
};
pub use error::TopologyError;
pub use projection::{
	EdgeStyle, NodeStyle, Projection, ViewMode, layer_color, project, severity_color,
	status_color,
};
pub use resolve::{Reachability, counts_by_layer, resolve};
pub use stack::{generate_stack_layout, layout_catalog};
pub use types::{
	GraphEdge, GraphNode, HealthStatus, LayerType, LayoutResult, Position, Severity, Technology,
};

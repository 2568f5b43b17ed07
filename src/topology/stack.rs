//! Layered "stack" layout: one centered row per architectural layer.

use std::collections::{BTreeMap, HashSet};

use log::info;

use super::catalog::EntityCatalog;
use super::config::StackConfig;
use super::error::TopologyError;
use super::types::{GraphEdge, GraphNode, LayerType, LayoutResult, Position};

/// Vertical coordinate of a layer's row.
pub fn row_offset(layer: LayerType, config: &StackConfig) -> f64 {
	layer.row() as f64 * config.row_height + config.base_offset
}

/// Horizontal coordinate of the `column`-th node in a row of `columns`,
/// centered on x = 0.
pub fn column_x(column: usize, columns: usize, config: &StackConfig) -> f64 {
	let center = (columns as f64 - 1.0) / 2.0;
	(column as f64 - center) * (config.node_width + config.gutter)
}

/// Lays out the compiled-in demo catalog.
pub fn generate_stack_layout(config: &StackConfig) -> Result<LayoutResult, TopologyError> {
	layout_catalog(&EntityCatalog::demo(), config)
}

/// Lays out `catalog` as stacked rows. Positions depend only on each
/// entity's layer and its index within that layer.
pub fn layout_catalog(
	catalog: &EntityCatalog,
	config: &StackConfig,
) -> Result<LayoutResult, TopologyError> {
	config.validate()?;
	if catalog.is_empty() {
		return Ok(LayoutResult::default());
	}

	let mut nodes = Vec::with_capacity(catalog.entities.len());
	let mut layer_offsets = BTreeMap::new();
	for layer in LayerType::ALL {
		let y = row_offset(layer, config);
		layer_offsets.insert(layer, y);

		let row: Vec<_> = catalog.layer(layer).collect();
		for (column, entity) in row.iter().enumerate() {
			nodes.push(GraphNode {
				id: entity.id.clone(),
				layer_type: layer,
				label: entity.label.clone(),
				sub_label: entity.sub_label.clone(),
				status: entity.status,
				vulnerability_severity: entity.vulnerability_severity,
				technology_tag: entity.technology_tag,
				position: Position::new(column_x(column, row.len(), config), y),
			});
		}
	}

	let orphans: HashSet<&str> = catalog
		.entities
		.iter()
		.filter(|e| e.orphaned)
		.map(|e| e.id.as_str())
		.collect();

	let mut edges = Vec::with_capacity(catalog.dependencies.len());
	for (from, to) in &catalog.dependencies {
		for id in [from, to] {
			if catalog.entity(id).is_none() {
				return Err(TopologyError::UnknownEntity(format!(
					"dependency `{from}` -> `{to}` names `{id}`"
				)));
			}
			if orphans.contains(id.as_str()) {
				return Err(TopologyError::MalformedGraph(format!(
					"orphaned entity `{id}` appears in dependency `{from}` -> `{to}`"
				)));
			}
		}
		edges.push(GraphEdge::between(from.as_str(), to.as_str()));
	}

	let layout = LayoutResult {
		nodes,
		edges,
		layer_offsets: Some(layer_offsets),
	};
	layout.validate()?;

	info!(
		"stack layout: {} nodes, {} edges, {} orphans",
		layout.nodes.len(),
		layout.edges.len(),
		orphans.len()
	);
	Ok(layout)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::topology::catalog::CatalogEntity;

	fn positions(layout: &LayoutResult) -> Vec<(String, f64, f64)> {
		layout
			.nodes
			.iter()
			.map(|n| (n.id.clone(), n.position.x, n.position.y))
			.collect()
	}

	#[test]
	fn demo_layout_is_deterministic() {
		let config = StackConfig::default();
		let first = generate_stack_layout(&config).unwrap();
		let second = generate_stack_layout(&config).unwrap();
		assert_eq!(positions(&first), positions(&second));
		assert_eq!(first, second);
	}

	#[test]
	fn rows_follow_layer_order() {
		let config = StackConfig::default();
		let layout = generate_stack_layout(&config).unwrap();
		for node in &layout.nodes {
			assert_eq!(
				node.position.y,
				node.layer_type.row() as f64 * config.row_height + config.base_offset
			);
		}
		let offsets = layout.layer_offsets.unwrap();
		assert_eq!(offsets[&LayerType::Application], config.base_offset);
		assert_eq!(offsets[&LayerType::Datacenter], 4.0 * config.row_height);
	}

	#[test]
	fn rows_are_centered() {
		let config = StackConfig {
			node_width: 100.0,
			gutter: 20.0,
			row_height: 50.0,
			base_offset: 10.0,
		};
		let catalog = EntityCatalog {
			entities: vec![
				CatalogEntity::new("a", LayerType::Service, "a", ""),
				CatalogEntity::new("b", LayerType::Service, "b", ""),
				CatalogEntity::new("c", LayerType::Service, "c", ""),
				CatalogEntity::new("h", LayerType::Host, "h", ""),
			],
			dependencies: vec![],
		};
		let layout = layout_catalog(&catalog, &config).unwrap();
		assert_eq!(
			positions(&layout),
			vec![
				("a".into(), -120.0, 60.0),
				("b".into(), 0.0, 60.0),
				("c".into(), 120.0, 60.0),
				("h".into(), 0.0, 160.0),
			]
		);
	}

	#[test]
	fn orphans_never_receive_edges() {
		let catalog = EntityCatalog::demo();
		let layout = layout_catalog(&catalog, &StackConfig::default()).unwrap();
		let isolated = layout.isolated_node_ids();
		for entity in catalog.entities.iter().filter(|e| e.orphaned) {
			assert_eq!(layout.degree(&entity.id), 0, "{} has edges", entity.id);
			assert!(isolated.contains(&entity.id.as_str()));
		}
		assert!(isolated.len() >= LayerType::ALL.len());
	}

	#[test]
	fn dependency_on_orphan_is_rejected() {
		let mut catalog = EntityCatalog::demo();
		catalog
			.dependencies
			.push(("app-webshop".into(), "svc-reporting".into()));
		let err = layout_catalog(&catalog, &StackConfig::default()).unwrap_err();
		assert!(matches!(err, TopologyError::MalformedGraph(_)));
	}

	#[test]
	fn dependency_on_unknown_entity_is_rejected() {
		let mut catalog = EntityCatalog::demo();
		catalog
			.dependencies
			.push(("app-webshop".into(), "svc-missing".into()));
		let err = layout_catalog(&catalog, &StackConfig::default()).unwrap_err();
		assert!(matches!(err, TopologyError::UnknownEntity(_)));
	}

	#[test]
	fn empty_catalog_gives_empty_layout() {
		let layout = layout_catalog(&EntityCatalog::default(), &StackConfig::default()).unwrap();
		assert!(layout.is_empty());
		assert!(layout.edges.is_empty());
	}

	#[test]
	fn negative_row_height_is_an_invalid_config() {
		let config = StackConfig {
			row_height: -10.0,
			..StackConfig::default()
		};
		let err = generate_stack_layout(&config).unwrap_err();
		assert!(matches!(err, TopologyError::InvalidConfig(msg) if msg.contains("row_height")));
	}
}

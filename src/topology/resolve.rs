//! Reachability: the connected component around a selected node.
//!
//! Edges are walked in both directions. The result is the whole component,
//! with no depth limit, computed by a BFS over an adjacency list built per
//! call (O(V + E)).

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::types::{GraphEdge, GraphNode, LayerType};

/// Nodes and edges reachable from one selected node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reachability {
	pub node_ids: HashSet<String>,
	pub edge_ids: HashSet<String>,
}

impl Reachability {
	pub fn is_empty(&self) -> bool {
		self.node_ids.is_empty()
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.node_ids.contains(id)
	}

	pub fn contains_edge(&self, id: &str) -> bool {
		self.edge_ids.contains(id)
	}
}

/// Returns the component containing `selected`. An absent or unknown
/// selection yields an empty result.
///
/// Edges must only reference ids present in `nodes`; see
/// [`LayoutResult::validate`](super::types::LayoutResult::validate).
pub fn resolve(nodes: &[GraphNode], edges: &[GraphEdge], selected: Option<&str>) -> Reachability {
	let Some(start) = selected else {
		return Reachability::default();
	};
	if !nodes.iter().any(|n| n.id == start) {
		return Reachability::default();
	}

	// node id -> indices of incident edges
	let mut adjacency: HashMap<&str, Vec<usize>> = HashMap::with_capacity(nodes.len());
	for (i, edge) in edges.iter().enumerate() {
		adjacency.entry(edge.source_id.as_str()).or_default().push(i);
		adjacency.entry(edge.target_id.as_str()).or_default().push(i);
	}

	let mut visited: HashSet<&str> = HashSet::from([start]);
	let mut seen_edges = vec![false; edges.len()];
	let mut queue = VecDeque::from([start]);

	while let Some(current) = queue.pop_front() {
		let Some(incident) = adjacency.get(current) else {
			continue;
		};
		for &i in incident {
			if seen_edges[i] {
				continue;
			}
			seen_edges[i] = true;
			let edge = &edges[i];
			let other = if edge.source_id == current {
				edge.target_id.as_str()
			} else {
				edge.source_id.as_str()
			};
			if visited.insert(other) {
				queue.push_back(other);
			}
		}
	}

	Reachability {
		node_ids: visited.into_iter().map(str::to_owned).collect(),
		edge_ids: edges
			.iter()
			.zip(&seen_edges)
			.filter(|(_, seen)| **seen)
			.map(|(e, _)| e.id.clone())
			.collect(),
	}
}

/// Related nodes per layer. Every layer is present, so the map doubles as
/// the sidebar's row list; the values sum to the number of related nodes
/// found in `nodes`.
pub fn counts_by_layer(nodes: &[GraphNode], related: &Reachability) -> BTreeMap<LayerType, usize> {
	let mut counts: BTreeMap<LayerType, usize> =
		LayerType::ALL.iter().map(|&layer| (layer, 0)).collect();
	for node in nodes.iter().filter(|n| related.contains_node(&n.id)) {
		*counts.entry(node.layer_type).or_default() += 1;
	}
	counts
}

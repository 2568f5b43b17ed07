//! Generation parameters. Every field has a default, so a JSON document only
//! needs to name what it overrides.

use serde::{Deserialize, Serialize};

use super::error::TopologyError;

/// Seed used when [`EngineConfig::seed`] is not set.
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// Maximum number of star clusters a cluster layout may contain.
pub const MAX_CLUSTERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
	pub node_width: f64,
	/// Horizontal gap between neighbouring nodes of one row.
	pub gutter: f64,
	pub row_height: f64,
	/// Vertical coordinate of the application row.
	pub base_offset: f64,
}

impl Default for StackConfig {
	fn default() -> Self {
		Self {
			node_width: 140.0,
			gutter: 40.0,
			row_height: 180.0,
			base_offset: 0.0,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
	/// Nodes on the inner ring around each center.
	pub core_count: usize,
	/// Nodes on the outer ring around each center.
	pub outer_count: usize,
	pub core_radius: f64,
	pub outer_radius: f64,
	/// Max radial offset applied to outer ring nodes, either direction.
	pub outer_radius_jitter: f64,
	/// Max angular offset (radians) applied to outer ring nodes.
	pub angle_jitter: f64,
	/// Chance that a core node links to its angular successor.
	pub core_link_probability: f64,
	/// Chance that an outer node gets one extra link to another outer node.
	pub chaos_link_probability: f64,
	/// Isolated nodes scattered around the clusters.
	pub debris_count: usize,
	pub debris_min_radius: f64,
	pub debris_max_radius: f64,
	/// Distance between neighbouring cluster centers.
	pub cluster_spacing: f64,
	pub process_clusters: usize,
	pub host_clusters: usize,
}

impl StackConfig {
	pub fn validate(&self) -> Result<(), TopologyError> {
		non_negative("stack.node_width", self.node_width)?;
		non_negative("stack.gutter", self.gutter)?;
		non_negative("stack.row_height", self.row_height)?;
		if !self.base_offset.is_finite() {
			return Err(invalid("stack.base_offset must be finite"));
		}
		Ok(())
	}
}

impl Default for ClusterConfig {
	fn default() -> Self {
		Self {
			core_count: 8,
			outer_count: 24,
			core_radius: 160.0,
			outer_radius: 340.0,
			outer_radius_jitter: 60.0,
			angle_jitter: 0.15,
			core_link_probability: 0.6,
			chaos_link_probability: 0.3,
			debris_count: 6,
			debris_min_radius: 1600.0,
			debris_max_radius: 2000.0,
			cluster_spacing: 900.0,
			process_clusters: 3,
			host_clusters: 1,
		}
	}
}

impl ClusterConfig {
	/// Furthest any ring node can sit from its center.
	pub fn cluster_extent(&self) -> f64 {
		self.outer_radius + self.outer_radius_jitter
	}

	/// Rejects anything the generator could not sample from.
	pub fn validate(&self) -> Result<(), TopologyError> {
		non_negative("cluster.core_radius", self.core_radius)?;
		non_negative("cluster.outer_radius", self.outer_radius)?;
		non_negative("cluster.outer_radius_jitter", self.outer_radius_jitter)?;
		non_negative("cluster.angle_jitter", self.angle_jitter)?;
		non_negative("cluster.debris_min_radius", self.debris_min_radius)?;
		non_negative("cluster.debris_max_radius", self.debris_max_radius)?;
		non_negative("cluster.cluster_spacing", self.cluster_spacing)?;
		probability("cluster.core_link_probability", self.core_link_probability)?;
		probability("cluster.chaos_link_probability", self.chaos_link_probability)?;

		if self.debris_max_radius < self.debris_min_radius {
			return Err(invalid("cluster.debris_max_radius is below debris_min_radius"));
		}
		for (name, count) in [
			("cluster.process_clusters", self.process_clusters),
			("cluster.host_clusters", self.host_clusters),
		] {
			if !(1..=MAX_CLUSTERS).contains(&count) {
				return Err(invalid(format!("{name} must be in 1..={MAX_CLUSTERS}, got {count}")));
			}
		}
		if self.process_clusters.max(self.host_clusters) > 1
			&& self.cluster_spacing <= 2.0 * self.cluster_extent()
		{
			return Err(invalid(format!(
				"cluster.cluster_spacing {} lets rings of extent {} overlap",
				self.cluster_spacing,
				self.cluster_extent()
			)));
		}
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	pub stack: StackConfig,
	pub cluster: ClusterConfig,
	pub seed: Option<u64>,
}

impl EngineConfig {
	pub fn from_json(raw: &str) -> Result<Self, TopologyError> {
		let config: Self = serde_json::from_str(raw)?;
		config.validate()?;
		Ok(config)
	}

	pub fn seed(&self) -> u64 {
		self.seed.unwrap_or(DEFAULT_SEED)
	}

	pub fn validate(&self) -> Result<(), TopologyError> {
		self.stack.validate()?;
		self.cluster.validate()
	}
}

fn invalid(msg: impl Into<String>) -> TopologyError {
	TopologyError::InvalidConfig(msg.into())
}

fn non_negative(name: &str, value: f64) -> Result<(), TopologyError> {
	if value.is_finite() && value >= 0.0 {
		Ok(())
	} else {
		Err(invalid(format!("{name} must be a non-negative number, got {value}")))
	}
}

fn probability(name: &str, value: f64) -> Result<(), TopologyError> {
	if (0.0..=1.0).contains(&value) {
		Ok(())
	} else {
		Err(invalid(format!("{name} must be within [0, 1], got {value}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		assert!(EngineConfig::default().validate().is_ok());
	}

	#[test]
	fn partial_json_keeps_other_defaults() {
		let config =
			EngineConfig::from_json(r#"{ "cluster": { "core_count": 4 }, "seed": 7 }"#).unwrap();
		assert_eq!(config.cluster.core_count, 4);
		assert_eq!(config.cluster.outer_count, ClusterConfig::default().outer_count);
		assert_eq!(config.stack, StackConfig::default());
		assert_eq!(config.seed(), 7);
	}

	#[test]
	fn missing_seed_falls_back_to_default() {
		assert_eq!(EngineConfig::default().seed(), DEFAULT_SEED);
	}

	#[test]
	fn probability_out_of_range_is_rejected() {
		let err = EngineConfig::from_json(r#"{ "cluster": { "chaos_link_probability": 1.5 } }"#)
			.unwrap_err();
		assert!(matches!(err, TopologyError::InvalidConfig(msg) if msg.contains("chaos")));
	}

	#[test]
	fn overlapping_clusters_are_rejected() {
		let mut config = EngineConfig::default();
		config.cluster.cluster_spacing = config.cluster.cluster_extent();
		assert!(config.validate().is_err());
	}

	#[test]
	fn too_many_clusters_are_rejected() {
		let mut config = EngineConfig::default();
		config.cluster.process_clusters = MAX_CLUSTERS + 1;
		assert!(config.validate().is_err());
	}

	#[test]
	fn sections_validate_on_their_own() {
		let stack = StackConfig {
			row_height: f64::NAN,
			..StackConfig::default()
		};
		assert!(matches!(stack.validate(), Err(TopologyError::InvalidConfig(_))));

		let cluster = ClusterConfig {
			outer_radius_jitter: -1.0,
			..ClusterConfig::default()
		};
		assert!(matches!(cluster.validate(), Err(TopologyError::InvalidConfig(_))));

		let cluster = ClusterConfig {
			core_link_probability: f64::NAN,
			..ClusterConfig::default()
		};
		assert!(cluster.validate().is_err());
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		let err = EngineConfig::from_json("{ nope").unwrap_err();
		assert!(matches!(err, TopologyError::ConfigParse(_)));
	}
}

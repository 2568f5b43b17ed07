use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
	/// The node/edge sets break a structural invariant.
	#[error("malformed graph: {0}")]
	MalformedGraph(String),

	#[error("invalid generator config: {0}")]
	InvalidConfig(String),

	#[error("config parse error: {0}")]
	ConfigParse(#[from] serde_json::Error),

	#[error("unknown entity: {0}")]
	UnknownEntity(String),
}

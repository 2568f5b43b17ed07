mod component;
mod render;
mod state;
mod types;

pub use component::TopologyMap;
pub use types::{Scene, ViewportRequest};

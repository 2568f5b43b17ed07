pub mod layer_legend;
pub mod topology_map;

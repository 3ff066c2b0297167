pub mod apex_set;
pub mod edge;
pub mod edge_map;
pub mod hull_front;

pub mod convexity;
pub mod point_order;
pub mod types;
pub mod vector;

pub mod graph;
pub mod identity;

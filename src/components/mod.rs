//! Leptos view components.

pub mod topology_graph;

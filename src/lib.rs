//! tgdmine - Tuple-generating dependency discovery over ClickHouse
//!
//! This crate discovers TGD rules ("if these joined attributes co-occur,
//! then this attribute is determined") over a relational database through:
//! - Schema introspection and attribute join-compatibility testing
//! - A constraint graph over joinable indexed attribute pairs
//! - Pluggable graph traversal (DFS, BFS, A* with selectable heuristics)
//! - Confidence/accuracy scoring via counting queries

pub mod attribute_model;
pub mod config;
pub mod constraint_graph;
pub mod database;
pub mod discovery;
pub mod heuristics;
pub mod rules;
pub mod traversal;

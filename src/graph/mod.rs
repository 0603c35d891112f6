//! Co-occurrence graph model and construction
//!
//! - [`NodeIdentity`]: field-qualified value, the node key
//! - [`CooccurrenceGraph`]: weighted undirected simple graph
//! - [`build`]: dataset + field selection -> graph

pub mod builder;
pub mod cooccurrence;
pub mod identity;

pub use builder::{build, BuildOptions};
pub use cooccurrence::{CooccurrenceGraph, EdgeRef};
pub use identity::NodeIdentity;

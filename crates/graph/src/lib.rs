pub mod builder;
pub mod centrality;
pub mod decay;
pub mod export;
pub mod schema;

pub use builder::GraphBuilder;
pub use centrality::{degree_centrality, NodeDegree};
pub use decay::{decay_factor, DistanceDecayEngine};
pub use export::{export_graph, VisEdge, VisGraph, VisNode};
pub use schema::{GraphEdge, GraphMeta, GraphNode, RiskGraph};

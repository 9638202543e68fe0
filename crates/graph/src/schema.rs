use std::collections::HashMap;

use relate::RelationshipType;
use resolve::EntityType;
use serde::{Deserialize, Serialize};

/// An entity's view inside the graph, plus the fields derived during
/// decay decoration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub is_subject: bool,
    pub confidence: f64,
    pub mentions: usize,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Shortest-path length from the subject; `None` means unreachable.
    pub hop: Option<u32>,
    /// Confidence multiplier derived from the hop distance.
    pub decay: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Sorted endpoint ids, same key discipline as relationships.
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    pub label: String,
    /// Confidence as detected, untouched by decay.
    pub confidence: f64,
    /// Confidence after applying the more distant endpoint's decay factor.
    pub adjusted_confidence: f64,
    pub evidence: Vec<String>,
    pub method: String,
}

/// Aggregate facts about the finished graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphMeta {
    pub node_count: usize,
    pub edge_count: usize,
    /// hop distance -> node count; unreachable nodes keyed as "unreachable".
    pub hop_distribution: HashMap<String, usize>,
    pub edge_type_breakdown: HashMap<RelationshipType, usize>,
}

/// The assembled node/edge graph centered on the subject organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskGraph {
    pub subject_id: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
}

impl RiskGraph {
    pub fn new(subject_id: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::new(),
        }
    }

    /// Insert a node unless its id is already taken.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        let idx = *self.node_index.get(id)?;
        Some(&mut self.nodes[idx])
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Rebuild the id -> index map; needed after deserialization since the
    /// index is not carried on the wire.
    pub fn reindex(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.id.clone(), idx))
            .collect();
    }

    pub fn meta(&self) -> GraphMeta {
        let mut hop_distribution: HashMap<String, usize> = HashMap::new();
        for node in &self.nodes {
            let key = match node.hop {
                Some(h) => h.to_string(),
                None => "unreachable".to_string(),
            };
            *hop_distribution.entry(key).or_insert(0) += 1;
        }

        let mut edge_type_breakdown: HashMap<RelationshipType, usize> = HashMap::new();
        for edge in &self.edges {
            *edge_type_breakdown.entry(edge.rel_type).or_insert(0) += 1;
        }

        GraphMeta {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            hop_distribution,
            edge_type_breakdown,
        }
    }
}

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::schema::RiskGraph;

/// Multiplier applied for a given hop distance from the subject.
/// Direct connections keep full weight; every hop beyond halves trust or
/// worse; an unreachable node barely counts.
pub fn decay_factor(hop: Option<u32>) -> f64 {
    match hop {
        Some(0) | Some(1) => 1.0,
        Some(2) => 0.5,
        Some(3) => 0.25,
        Some(_) => 0.1,
        None => 0.05,
    }
}

/// Attaches hop distances and decay factors to a built graph.
///
/// Consumes the graph and returns the decorated snapshot, so no caller
/// can observe a half-decorated graph.
pub struct DistanceDecayEngine;

impl DistanceDecayEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn decorate(&self, mut graph: RiskGraph) -> RiskGraph {
        let distances = self.bfs_distances(&graph);

        for node in &mut graph.nodes {
            node.hop = distances.get(&node.id).copied();
            node.decay = decay_factor(node.hop);
        }

        // The more distant endpoint decides each edge's decay; an
        // unreachable endpoint counts as the most distant possible.
        for edge in &mut graph.edges {
            let hop_from = distances.get(&edge.from).copied();
            let hop_to = distances.get(&edge.to).copied();
            let governing = match (hop_from, hop_to) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            };
            edge.adjusted_confidence = edge.confidence * decay_factor(governing);
        }

        let unreachable = graph.nodes.iter().filter(|n| n.hop.is_none()).count();
        debug!(unreachable, "decay decoration complete");
        graph
    }

    /// Unweighted BFS from the subject over a bidirectional adjacency view.
    fn bfs_distances(&self, graph: &RiskGraph) -> HashMap<String, u32> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &graph.edges {
            adjacency.entry(&edge.from).or_default().push(&edge.to);
            adjacency.entry(&edge.to).or_default().push(&edge.from);
        }

        let mut distances: HashMap<String, u32> = HashMap::new();
        let mut queue: VecDeque<(&str, u32)> = VecDeque::new();

        distances.insert(graph.subject_id.clone(), 0);
        queue.push_back((&graph.subject_id, 0));

        while let Some((id, hop)) = queue.pop_front() {
            let Some(neighbors) = adjacency.get(id) else {
                continue;
            };
            for &neighbor in neighbors {
                if !distances.contains_key(neighbor) {
                    distances.insert(neighbor.to_string(), hop + 1);
                    queue.push_back((neighbor, hop + 1));
                }
            }
        }

        distances
    }
}

impl Default for DistanceDecayEngine {
    fn default() -> Self {
        Self::new()
    }
}

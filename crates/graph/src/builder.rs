use relate::{Relationship, RelationshipType, SUBJECT_ID};
use resolve::{Entity, EntityType};
use tracing::debug;

use crate::schema::{GraphEdge, GraphNode, RiskGraph};

/// Assembles entities and relationships into a graph centered on the
/// subject organization.
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        subject_name: &str,
        entities: &[Entity],
        relationships: &[Relationship],
    ) -> RiskGraph {
        let mut graph = RiskGraph::new(SUBJECT_ID);

        graph.add_node(GraphNode {
            id: SUBJECT_ID.to_string(),
            label: subject_name.to_string(),
            entity_type: EntityType::Organization,
            is_subject: true,
            confidence: 1.0,
            mentions: 0,
            roles: Vec::new(),
            hop: Some(0),
            decay: 1.0,
        });

        for entity in entities {
            // An id colliding with an existing node is skipped, not merged.
            graph.add_node(GraphNode {
                id: entity.id.clone(),
                label: entity.name.clone(),
                entity_type: entity.entity_type,
                is_subject: false,
                confidence: entity.confidence,
                mentions: entity.mentions,
                roles: entity.roles.clone(),
                hop: None,
                decay: 0.0,
            });
        }

        for rel in relationships {
            if !graph.has_node(&rel.a) || !graph.has_node(&rel.b) {
                continue;
            }
            self.merge_edge(&mut graph, rel);
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph assembled"
        );
        graph
    }

    /// One edge per unordered pair: parallel candidates keep the max
    /// confidence, concatenate evidence, and upgrade the type away from
    /// co-mention when something more specific is available.
    fn merge_edge(&self, graph: &mut RiskGraph, rel: &Relationship) {
        // Relationship endpoints are already sorted, so (A,B) and (B,A)
        // candidates arrive under the same key.
        if let Some(edge) = graph
            .edges
            .iter_mut()
            .find(|e| e.from == rel.a && e.to == rel.b)
        {
            edge.confidence = edge.confidence.max(rel.confidence);
            edge.evidence.extend(rel.evidence.iter().cloned());
            if edge.rel_type == RelationshipType::CoMention && rel.rel_type.is_specific() {
                edge.rel_type = rel.rel_type;
                edge.label = rel.label.clone();
                edge.method = rel.method.clone();
            }
            return;
        }

        graph.edges.push(GraphEdge {
            from: rel.a.clone(),
            to: rel.b.clone(),
            rel_type: rel.rel_type,
            label: rel.label.clone(),
            confidence: rel.confidence,
            adjusted_confidence: rel.confidence,
            evidence: rel.evidence.clone(),
            method: rel.method.clone(),
        });
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

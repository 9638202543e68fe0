use relate::RelationshipType;
use resolve::EntityType;
use serde::{Deserialize, Serialize};

use crate::schema::RiskGraph;

/// Generic node record for any downstream visualization layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    pub group: String,
    pub shape: String,
    pub size: f64,
    /// Tooltip text.
    pub title: String,
}

/// Generic edge record for any downstream visualization layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub title: String,
    pub width: f64,
    pub dashes: bool,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisGraph {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

/// Export the graph as plain visual-attribute records. The core draws
/// nothing itself; rendering belongs to downstream consumers.
pub fn export_graph(graph: &RiskGraph) -> VisGraph {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let group = if node.is_subject {
                "subject"
            } else {
                match node.entity_type {
                    EntityType::Person => "person",
                    EntityType::Organization => "organization",
                }
            };
            let shape = match group {
                "subject" => "star",
                "person" => "dot",
                _ => "square",
            };
            let hop_text = match node.hop {
                Some(h) => format!("{h} hop(s) from subject"),
                None => "unreachable from subject".to_string(),
            };
            VisNode {
                id: node.id.clone(),
                label: node.label.clone(),
                group: group.to_string(),
                shape: shape.to_string(),
                // Size grows with mention count but stays bounded.
                size: 10.0 + (node.mentions.min(20) as f64),
                title: format!(
                    "{} | confidence {:.2} | {} mention(s) | {}",
                    node.label, node.confidence, node.mentions, hop_text
                ),
            }
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|edge| VisEdge {
            from: edge.from.clone(),
            to: edge.to.clone(),
            label: edge.label.clone(),
            title: format!(
                "{} | confidence {:.2} (adjusted {:.2})",
                edge.label, edge.confidence, edge.adjusted_confidence
            ),
            width: 1.0 + 4.0 * edge.adjusted_confidence,
            dashes: edge.rel_type == RelationshipType::CoMention,
            color: edge_color(edge.rel_type).to_string(),
        })
        .collect();

    VisGraph { nodes, edges }
}

fn edge_color(rel_type: RelationshipType) -> &'static str {
    match rel_type {
        RelationshipType::SanctionsLink => "#c0392b",
        RelationshipType::Financial => "#d35400",
        RelationshipType::Organizational => "#2980b9",
        RelationshipType::EventBased => "#8e44ad",
        RelationshipType::CoMention => "#7f8c8d",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::decay::DistanceDecayEngine;
    use relate::Relationship;
    use resolve::{Entity, ExtractionMethod};

    #[test]
    fn test_export_shapes_and_dashes() {
        let entity = Entity {
            id: "ent_1".to_string(),
            name: "Maria Lopez".to_string(),
            normalized: "maria lopez".to_string(),
            entity_type: EntityType::Person,
            roles: Vec::new(),
            aliases: Vec::new(),
            methods: vec![ExtractionMethod::Nlp],
            confidence: 0.75,
            mentions: 4,
            source: "test".to_string(),
        };
        let mut rel = Relationship::between(
            "ent_1",
            "Maria Lopez",
            "subject",
            "Acme Corp",
            RelationshipType::CoMention,
        );
        rel.confidence = 0.5;
        rel.label = "co-mentioned".to_string();

        let graph = GraphBuilder::new().build("Acme Corp", &[entity], &[rel]);
        let graph = DistanceDecayEngine::new().decorate(graph);
        let vis = export_graph(&graph);

        let subject = vis.nodes.iter().find(|n| n.group == "subject").unwrap();
        assert_eq!(subject.shape, "star");
        let person = vis.nodes.iter().find(|n| n.group == "person").unwrap();
        assert_eq!(person.shape, "dot");
        assert!(person.title.contains("1 hop(s)"));

        assert!(vis.edges[0].dashes);
        assert!(vis.edges[0].width > 1.0);
    }
}

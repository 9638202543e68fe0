use serde::{Deserialize, Serialize};

use crate::schema::RiskGraph;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDegree {
    pub id: String,
    pub label: String,
    pub degree: usize,
}

/// Degree centrality, sorted descending. Informational ranking only;
/// nothing downstream gates on it.
pub fn degree_centrality(graph: &RiskGraph) -> Vec<NodeDegree> {
    let mut degrees: Vec<NodeDegree> = graph
        .nodes
        .iter()
        .map(|node| NodeDegree {
            id: node.id.clone(),
            label: node.label.clone(),
            degree: graph
                .edges
                .iter()
                .filter(|e| e.from == node.id || e.to == node.id)
                .count(),
        })
        .collect();

    degrees.sort_by(|a, b| b.degree.cmp(&a.degree));
    degrees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use relate::{Relationship, RelationshipType};
    use resolve::{Entity, EntityType, ExtractionMethod};

    fn entity(id: &str) -> Entity {
        Entity {
            id: id.to_string(),
            name: id.to_uppercase(),
            normalized: id.to_string(),
            entity_type: EntityType::Person,
            roles: Vec::new(),
            aliases: Vec::new(),
            methods: vec![ExtractionMethod::Pattern],
            confidence: 0.5,
            mentions: 1,
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_degree_sum_is_twice_edge_count() {
        let entities = vec![entity("a"), entity("b"), entity("c")];
        let relationships = vec![
            Relationship::between("a", "A", "subject", "S", RelationshipType::CoMention),
            Relationship::between("a", "A", "b", "B", RelationshipType::CoMention),
            Relationship::between("b", "B", "c", "C", RelationshipType::CoMention),
        ];
        let graph = GraphBuilder::new().build("Acme Corp", &entities, &relationships);

        let degrees = degree_centrality(&graph);
        let total: usize = degrees.iter().map(|d| d.degree).sum();
        assert_eq!(total, 2 * graph.edges.len());

        // Sorted descending; "a" and "b" tie at the top with degree 2.
        assert_eq!(degrees[0].degree, 2);
        assert!(degrees[0].degree >= degrees[degrees.len() - 1].degree);
    }
}

//! Result payload as delivered to the diagram and table views.
//!
//! Node properties travel as a single newline-delimited `key: value` string.
//! The encoding cannot represent keys containing a colon and is kept only for
//! compatibility with existing result fixtures.
//!
//! Two deliberate departures from the legacy table parser: entries are
//! separated by real newlines (the legacy parser split on a literal
//! backslash-n), and a key that is blank after trimming is skipped (the
//! legacy parser kept whitespace-only keys as long as the colon was not the
//! first character).

use crate::errors::QueryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub elements: Vec<ResultElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultElement {
    pub data: ElementData,
}

/// An element is an edge when it carries both `source` and `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementData {
    Edge(EdgeRecord),
    Node(NodeRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
}

impl EdgeRecord {
    /// Explicit id, or `source-target` when the payload has none.
    pub fn effective_id(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.source, self.target))
    }
}

impl ResultElement {
    pub fn node(
        id: &str,
        label: &str,
        entity_type: &str,
        background_color: &str,
        properties: &[(&str, &str)],
    ) -> Self {
        Self {
            data: ElementData::Node(NodeRecord {
                id: id.to_string(),
                label: label.to_string(),
                entity_type: Some(entity_type.to_string()),
                background_color: Some(background_color.to_string()),
                properties: Some(encode_properties(properties.iter().copied())),
            }),
        }
    }

    pub fn edge(source: &str, target: &str, label: &str) -> Self {
        Self {
            data: ElementData::Edge(EdgeRecord {
                id: None,
                source: source.to_string(),
                target: target.to_string(),
                label: label.to_string(),
            }),
        }
    }
}

impl QueryResult {
    pub fn from_json(json: &str) -> Result<Self, QueryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, QueryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.elements.iter().filter_map(|e| match &e.data {
            ElementData::Node(n) => Some(n),
            ElementData::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeRecord> {
        self.elements.iter().filter_map(|e| match &e.data {
            ElementData::Edge(edge) => Some(edge),
            ElementData::Node(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary::default();
        for node in self.nodes() {
            summary.node_count += 1;
            let ty = node.entity_type.as_deref().unwrap_or(UNKNOWN_TYPE);
            *summary.nodes_by_type.entry(ty.to_string()).or_default() += 1;
        }
        for edge in self.edges() {
            summary.edge_count += 1;
            *summary.edges_by_label.entry(edge.label.clone()).or_default() += 1;
        }
        summary
    }
}

pub(crate) const UNKNOWN_TYPE: &str = "unknown";

/// Counts for the diagram legend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: BTreeMap<String, usize>,
    pub edges_by_label: BTreeMap<String, usize>,
}

/// Splits each line on its first colon. Lines with nothing before the colon
/// are skipped; both sides are trimmed.
pub fn parse_properties(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

pub fn encode_properties<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_disambiguated_by_endpoints() {
        let json = r##"{
            "elements": [
                { "data": { "id": "n1", "label": "Ahmet", "type": "insan",
                            "backgroundColor": "#2563eb", "properties": "Yaş: 35" } },
                { "data": { "source": "n1", "target": "n2", "label": "Sahip" } },
                { "data": { "id": "n3", "source": "n1" } }
            ]
        }"##;
        let result = QueryResult::from_json(json).unwrap();
        assert_eq!(result.nodes().count(), 2);
        assert_eq!(result.edges().count(), 1);
        let edge = result.edges().next().unwrap();
        assert_eq!(edge.effective_id(), "n1-n2");
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            QueryResult::from_json("{\"elements\": 3}"),
            Err(QueryError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_parse_properties_first_colon() {
        let props = parse_properties("Adres: Atatürk Cad. No:15\nKat: 3\n: orphan\nno colon\n  Tip :Villa ");
        assert_eq!(props.len(), 3);
        assert_eq!(props["Adres"], "Atatürk Cad. No:15");
        assert_eq!(props["Kat"], "3");
        assert_eq!(props["Tip"], "Villa");
    }

    #[test]
    fn test_parse_properties_skips_whitespace_keys() {
        let props = parse_properties("   : gizli\nPlaka: 34ABC123\n\t: x");
        assert_eq!(props.len(), 1);
        assert_eq!(props["Plaka"], "34ABC123");
        assert!(!props.contains_key(""));
    }

    #[test]
    fn test_node_serializes_wire_names() {
        let element = ResultElement::node("n1", "34ABC123", "plaka", "#f59e42", &[("Renk", "Beyaz")]);
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["data"]["type"], "plaka");
        assert_eq!(json["data"]["backgroundColor"], "#f59e42");
        assert_eq!(json["data"]["properties"], "Renk: Beyaz");
    }

    #[test]
    fn test_summary_counts() {
        let result = QueryResult {
            elements: vec![
                ResultElement::node("a", "A", "insan", "#2563eb", &[]),
                ResultElement::node("b", "B", "insan", "#2563eb", &[]),
                ResultElement::node("c", "C", "ev", "#22c55e", &[]),
                ResultElement::edge("a", "c", "Oturan"),
            ],
        };
        let summary = result.summary();
        assert_eq!(summary.node_count, 3);
        assert_eq!(summary.edge_count, 1);
        assert_eq!(summary.nodes_by_type["insan"], 2);
        assert_eq!(summary.edges_by_label["Oturan"], 1);
    }
}

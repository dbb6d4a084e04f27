use crate::result::{EdgeRecord, QueryResult, UNKNOWN_TYPE, parse_properties};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const DEFAULT_ROW_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub other_id: String,
    pub other_label: String,
    pub edge_label: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub label: String,
    pub entity_type: String,
    pub background_color: String,
    pub properties: BTreeMap<String, String>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Label,
    Type,
    Connections,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Search box, type filter and sort column of the table view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableQuery {
    pub search: String,
    pub types: BTreeSet<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl TableQuery {
    /// Clicking the active column flips direction; another column sorts
    /// ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flip();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn toggle_type(&mut self, entity_type: &str) {
        if !self.types.remove(entity_type) {
            self.types.insert(entity_type.to_string());
        }
    }

    fn matches(&self, row: &TableRow) -> bool {
        let matches_type = self.types.is_empty() || self.types.contains(&row.entity_type);
        if !matches_type {
            return false;
        }
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        row.label.to_lowercase().contains(&needle)
            || row.entity_type.to_lowercase().contains(&needle)
            || row
                .properties
                .values()
                .any(|v| v.to_lowercase().contains(&needle))
    }

    fn compare(&self, a: &TableRow, b: &TableRow) -> Ordering {
        let ordering = match self.sort_field {
            SortField::Label => compare_text(&a.label, &b.label),
            SortField::Type => compare_text(&a.entity_type, &b.entity_type),
            SortField::Connections => a.connections.len().cmp(&b.connections.len()),
        };
        match self.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Tabular projection of a result payload: one row per node with its
/// connections in both directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    rows: Vec<TableRow>,
    edges: Vec<EdgeRecord>,
    node_types: Vec<String>,
}

impl ResultTable {
    pub fn from_result(result: &QueryResult) -> Self {
        let mut rows: Vec<TableRow> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut types = BTreeSet::new();

        for node in result.nodes() {
            let row = TableRow {
                id: node.id.clone(),
                label: node.label.clone(),
                entity_type: node
                    .entity_type
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
                background_color: node
                    .background_color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ROW_COLOR.to_string()),
                properties: node
                    .properties
                    .as_deref()
                    .map(parse_properties)
                    .unwrap_or_default(),
                connections: Vec::new(),
            };
            types.insert(row.entity_type.clone());
            // A repeated id replaces the earlier row in place.
            match index.get(&row.id) {
                Some(&i) => rows[i] = row,
                None => {
                    index.insert(row.id.clone(), rows.len());
                    rows.push(row);
                }
            }
        }

        let edges: Vec<EdgeRecord> = result.edges().cloned().collect();
        for edge in &edges {
            let (Some(&s), Some(&t)) = (index.get(&edge.source), index.get(&edge.target)) else {
                continue;
            };
            let source_label = rows[s].label.clone();
            let target_label = rows[t].label.clone();
            rows[s].connections.push(Connection {
                other_id: edge.target.clone(),
                other_label: target_label,
                edge_label: edge.label.clone(),
                direction: Direction::Outgoing,
            });
            rows[t].connections.push(Connection {
                other_id: edge.source.clone(),
                other_label: source_label,
                edge_label: edge.label.clone(),
                direction: Direction::Incoming,
            });
        }

        Self {
            rows,
            edges,
            node_types: types.into_iter().collect(),
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Distinct node types, sorted.
    pub fn node_types(&self) -> &[String] {
        &self.node_types
    }

    pub fn row(&self, id: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Filtered and sorted rows.
    pub fn view(&self, query: &TableQuery) -> Vec<&TableRow> {
        let mut rows: Vec<&TableRow> = self.rows.iter().filter(|r| query.matches(r)).collect();
        rows.sort_by(|a, b| query.compare(a, b));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fixture_result;

    fn labels(rows: &[&TableRow]) -> Vec<String> {
        rows.iter().map(|r| r.label.clone()).collect()
    }

    #[test]
    fn test_fixture_rows_and_types() {
        let table = ResultTable::from_result(&fixture_result());
        assert_eq!(table.rows().len(), 7);
        assert_eq!(table.edges().len(), 8);
        assert_eq!(table.node_types(), &["ev", "insan", "konum", "plaka"]);
    }

    #[test]
    fn test_connections_both_directions() {
        let table = ResultTable::from_result(&fixture_result());
        let plate = table.row("n2").unwrap();
        let incoming = plate
            .connections
            .iter()
            .filter(|c| c.direction == Direction::Incoming)
            .count();
        let outgoing = plate
            .connections
            .iter()
            .filter(|c| c.direction == Direction::Outgoing)
            .count();
        assert_eq!((incoming, outgoing), (2, 1));
        let besiktas = table.row("n4").unwrap();
        assert_eq!(besiktas.connections.len(), 2);
        assert!(besiktas.connections.iter().all(|c| c.edge_label == "Bulunduğu"));
    }

    #[test]
    fn test_search_matches_property_values() {
        let table = ResultTable::from_result(&fixture_result());
        let query = TableQuery {
            search: "mercedes".to_string(),
            ..Default::default()
        };
        assert_eq!(labels(&table.view(&query)), vec!["06XYZ789"]);
    }

    #[test]
    fn test_type_filter_and_sort() {
        let table = ResultTable::from_result(&fixture_result());
        let mut query = TableQuery::default();
        query.toggle_type("insan");
        assert_eq!(labels(&table.view(&query)), vec!["Ahmet Yılmaz", "Ayşe Demir"]);

        query.toggle_sort(SortField::Label);
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert_eq!(labels(&table.view(&query)), vec!["Ayşe Demir", "Ahmet Yılmaz"]);
    }

    #[test]
    fn test_sort_by_connections() {
        let table = ResultTable::from_result(&fixture_result());
        let mut query = TableQuery::default();
        query.toggle_sort(SortField::Connections);
        query.toggle_sort(SortField::Connections);
        let rows = table.view(&query);
        assert_eq!(rows[0].connections.len(), 3);
        assert!(rows.windows(2).all(|w| w[0].connections.len() >= w[1].connections.len()));
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let result = QueryResult::from_json(
            r#"{"elements":[{"data":{"id":"x"}},{"data":{"source":"x","target":"ghost"}}]}"#,
        )
        .unwrap();
        let table = ResultTable::from_result(&result);
        let row = table.row("x").unwrap();
        assert_eq!(row.entity_type, "unknown");
        assert_eq!(row.background_color, "#6b7280");
        assert!(row.connections.is_empty());
    }
}

use anyhow::{Context, Result, bail};
use querycanvas_app::AppController;
use querycanvas_canvas::DropPayload;
use querycanvas_core::{EdgeId, NodeId, Position, WorkspaceId};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One scripted canvas interaction.
///
/// Nodes and edges can be given an alias (`as`) when created; later steps may
/// name them by alias or by their real id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Drop {
        label: String,
        #[serde(rename = "type")]
        entity_type: String,
        #[serde(default)]
        color: Option<String>,
        x: f64,
        y: f64,
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
    Move {
        node: String,
        x: f64,
        y: f64,
    },
    Connect {
        source: String,
        target: String,
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
    ClickNode {
        node: String,
        #[serde(default)]
        modifier: bool,
    },
    ClickEdge {
        edge: String,
        #[serde(default)]
        modifier: bool,
    },
    ClickBackground,
    Delete,
    Undo,
    Clear,
    EditNode {
        node: String,
        key: String,
        value: String,
    },
    EditEdge {
        edge: String,
        key: String,
        value: String,
    },
    Template {
        id: String,
    },
    CreateWorkspace {
        name: String,
    },
    SwitchWorkspace {
        id: String,
    },
    RenameWorkspace {
        id: String,
        name: String,
    },
    DeleteWorkspace {
        id: String,
    },
    Params {
        result_limit: i64,
        query_depth: i64,
    },
    Query,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Replays steps against a controller, tracking aliases.
pub struct Runner<'a> {
    app: &'a AppController,
    nodes: HashMap<String, NodeId>,
    edges: HashMap<String, EdgeId>,
    pub queries_run: usize,
}

impl<'a> Runner<'a> {
    pub fn new(app: &'a AppController) -> Self {
        Self {
            app,
            nodes: HashMap::new(),
            edges: HashMap::new(),
            queries_run: 0,
        }
    }

    fn node(&self, name: &str) -> NodeId {
        self.nodes
            .get(name)
            .cloned()
            .unwrap_or_else(|| NodeId::from(name))
    }

    fn edge(&self, name: &str) -> EdgeId {
        self.edges
            .get(name)
            .cloned()
            .unwrap_or_else(|| EdgeId::from(name))
    }

    /// Runs one step. Returns whether it changed anything; steps the editor
    /// ignores are not errors. Only invalid query parameters, unknown
    /// templates and backend failures abort the script.
    pub async fn run(&mut self, step: &Step) -> Result<bool> {
        let app = self.app;
        let changed = match step {
            Step::Drop {
                label,
                entity_type,
                color,
                x,
                y,
                alias,
            } => {
                let payload = DropPayload {
                    label: Some(label.clone()),
                    entity_type: Some(entity_type.clone()),
                    color: color.clone(),
                };
                match app.drop_entity(&payload, Position::new(*x, *y), Position::default()) {
                    Some(id) => {
                        if let Some(alias) = alias {
                            self.nodes.insert(alias.clone(), id);
                        }
                        true
                    }
                    None => false,
                }
            }
            Step::Move { node, x, y } => app.move_node(&self.node(node), Position::new(*x, *y)),
            Step::Connect {
                source,
                target,
                alias,
            } => match app.connect(&self.node(source), &self.node(target)) {
                Some(id) => {
                    if let Some(alias) = alias {
                        self.edges.insert(alias.clone(), id);
                    }
                    true
                }
                None => false,
            },
            Step::ClickNode { node, modifier } => app.click_node(&self.node(node), *modifier),
            Step::ClickEdge { edge, modifier } => app.click_edge(&self.edge(edge), *modifier),
            Step::ClickBackground => {
                app.click_background();
                true
            }
            Step::Delete => app.delete_selected(),
            Step::Undo => app.undo(),
            Step::Clear => app.clear_canvas(),
            Step::EditNode { node, key, value } => app.edit_node_field(&self.node(node), key, value),
            Step::EditEdge { edge, key, value } => app.edit_edge_field(&self.edge(edge), key, value),
            Step::Template { id } => {
                app.load_template(id)?;
                true
            }
            Step::CreateWorkspace { name } => {
                app.create_workspace(name);
                true
            }
            Step::SwitchWorkspace { id } => app.switch_workspace(&WorkspaceId::from(id.as_str())),
            Step::RenameWorkspace { id, name } => {
                app.rename_workspace(&WorkspaceId::from(id.as_str()), name)
            }
            Step::DeleteWorkspace { id } => app.delete_workspace(&WorkspaceId::from(id.as_str())),
            Step::Params {
                result_limit,
                query_depth,
            } => {
                app.set_query_params(*result_limit, *query_depth)?;
                true
            }
            Step::Query => {
                if app.is_loading() {
                    bail!("A query is already running");
                }
                app.submit_query().await?;
                self.queries_run += 1;
                true
            }
        };
        if !changed {
            tracing::debug!(?step, "Step had no effect");
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querycanvas_app::AppSettings;

    fn app() -> AppController {
        AppController::new(&AppSettings {
            mock_query_delay_ms: 10,
            ..Default::default()
        })
    }

    #[test]
    fn test_parse_steps() {
        let script = Script::parse(
            r##"{"steps": [
                {"op": "drop", "label": "İnsan", "type": "insan", "x": 10, "y": 20, "as": "a"},
                {"op": "click_background"},
                {"op": "params", "result_limit": 10, "query_depth": 3}
            ]}"##,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 3);
        assert!(matches!(&script.steps[0], Step::Drop { alias: Some(a), color: None, .. } if a == "a"));
        assert_eq!(script.steps[1], Step::ClickBackground);
    }

    #[test]
    fn test_unknown_op_rejected() {
        assert!(Script::parse(r#"{"steps": [{"op": "explode"}]}"#).is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Script::load(&path).unwrap_err();
        assert!(err.to_string().contains("script.json"));
    }

    #[tokio::test]
    async fn test_aliases_resolve_to_generated_ids() {
        let app = app();
        let mut runner = Runner::new(&app);
        let script = Script::parse(
            r##"{"steps": [
                {"op": "drop", "label": "İnsan", "type": "insan", "x": 0, "y": 0, "as": "a"},
                {"op": "drop", "label": "Ev", "type": "ev", "x": 100, "y": 0, "as": "b"},
                {"op": "connect", "source": "a", "target": "b", "as": "e"},
                {"op": "edit_edge", "edge": "e", "key": "type", "value": "oturan"},
                {"op": "query"}
            ]}"##,
        )
        .unwrap();
        for step in &script.steps {
            assert!(runner.run(step).await.unwrap(), "{step:?}");
        }
        assert_eq!(runner.queries_run, 1);
        let ws = app.active_workspace().unwrap();
        assert_eq!(ws.edges()[0].relationship_type, "oturan");
    }

    #[tokio::test]
    async fn test_no_op_steps_are_not_errors() {
        let app = app();
        let mut runner = Runner::new(&app);
        assert!(!runner.run(&Step::Undo).await.unwrap());
        assert!(!runner.run(&Step::Delete).await.unwrap());
        assert!(runner
            .run(&Step::Template { id: "missing".into() })
            .await
            .is_err());
    }
}

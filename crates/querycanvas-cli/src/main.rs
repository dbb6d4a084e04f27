use anyhow::Result;
use clap::Parser;
use querycanvas_app::{AppController, AppSettings, WorkspaceSummary};
use querycanvas_canvas::PanelView;
use querycanvas_events::{Event, EventListener};
use querycanvas_query::{GraphSummary, ResultTable, TableQuery};
use querycanvas_workspace::Workspace;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod script;

use script::{Runner, Script};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a query canvas editing session")]
struct Args {
    /// JSON script of canvas steps to replay
    script: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,

    /// List the saved query templates and exit
    #[arg(long)]
    templates: bool,

    /// Filter the result table by this text
    #[arg(long)]
    search: Option<String>,
}

/// Logs every editor event at debug level.
struct EventLog {
    seen: usize,
}

impl EventListener for EventLog {
    fn handle_event(&mut self, event: &Event) {
        self.seen += 1;
        tracing::debug!(?event, "event");
    }
}

#[derive(Serialize)]
struct Report {
    workspaces: Vec<WorkspaceSummary>,
    active: Option<Workspace>,
    panel: Option<PanelView>,
    summary: Option<GraphSummary>,
    table: Option<ResultTable>,
    events: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = match args.settings.clone().or_else(AppSettings::default_path) {
        Some(path) => AppSettings::load(&path)?,
        None => AppSettings::default(),
    };
    let app = AppController::new(&settings);

    if args.templates {
        for template in app.templates() {
            println!(
                "{}\t{}\t{}\t{} nodes, {} edges",
                template.id,
                template.date,
                template.name,
                template.nodes.len(),
                template.edges.len()
            );
        }
        return Ok(());
    }

    let mut log = EventLog { seen: 0 };
    if let Some(path) = &args.script {
        let script = Script::load(path)?;
        info!(path = %path.display(), steps = script.steps.len(), "Replaying script");
        let mut runner = Runner::new(&app);
        for step in &script.steps {
            runner.run(step).await?;
            app.event_bus().dispatch_to(&mut log);
        }
        info!(queries = runner.queries_run, "Script finished");
    }

    let table = app.result_table();
    let report = Report {
        workspaces: app.workspaces(),
        active: app.active_workspace(),
        panel: app.focused_panel(),
        summary: app.last_result().map(|r| r.summary()),
        table,
        events: log.seen,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, args.search.as_deref());
    Ok(())
}

fn print_report(report: &Report, search: Option<&str>) {
    println!("Workspaces:");
    for ws in &report.workspaces {
        let marker = if ws.active { "*" } else { " " };
        println!(
            " {marker} {} {:?}: {} nodes, {} edges",
            ws.id, ws.name, ws.node_count, ws.edge_count
        );
    }

    if let Some(active) = &report.active {
        println!("\nCanvas ({}):", active.name());
        for node in active.nodes() {
            println!(
                "  [{}] {} ({}) at ({:.0}, {:.0})",
                node.id, node.label, node.entity_type, node.position.x, node.position.y
            );
        }
        for edge in active.edges() {
            println!(
                "  {} -> {} : {} [{}]",
                edge.source, edge.target, edge.label, edge.relationship_type
            );
        }
    }

    if let Some(panel) = &report.panel {
        println!("\nPanel:");
        for field in panel.fields() {
            println!("  {}: {}", field.label, field.value);
        }
    }

    if let Some(summary) = &report.summary {
        println!(
            "\nResult: {} nodes, {} edges",
            summary.node_count, summary.edge_count
        );
    }

    if let Some(table) = &report.table {
        let query = TableQuery {
            search: search.unwrap_or_default().to_string(),
            ..Default::default()
        };
        for row in table.view(&query) {
            println!(
                "  {:<20} {:<10} {} connections",
                row.label,
                row.entity_type,
                row.connections.len()
            );
        }
    }

    println!("\n{} events", report.events);
}

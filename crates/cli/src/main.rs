//! `workflow-graph` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate` — import a workflow document and report readiness issues.
//! - `inspect`  — print nodes, edges and execution order.
//! - `new`      — write a starter workflow document.
//! - `kinds`    — list node kinds, their roles and palette labels.
//! - `save` / `list` / `export` — manage documents in the workflow directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use engine::{check_readiness, GraphStore};
use nodes::{catalog, NodeKind};
use storage::{DocumentStore, FileDocumentStore};

#[derive(Parser)]
#[command(
    name = "workflow-graph",
    about = "Validate and manage agent workflow graphs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a workflow document and report readiness issues.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// Print the nodes, edges and execution order of a workflow document.
    Inspect {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// Write a starter workflow document.
    New {
        /// One of: basic-agent, agent-chain, new.
        #[arg(default_value = "new")]
        template: String,
        /// Output file; prints to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List node kinds, their edge roles and palette labels.
    Kinds,
    /// Store a workflow document in the workflow directory.
    Save {
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, env = "WORKFLOW_GRAPH_DIR", default_value = ".workflows")]
        dir: PathBuf,
    },
    /// List stored workflows, newest first.
    List {
        #[arg(long, env = "WORKFLOW_GRAPH_DIR", default_value = ".workflows")]
        dir: PathBuf,
    },
    /// Write a stored workflow back out as a document.
    Export {
        id: Uuid,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, env = "WORKFLOW_GRAPH_DIR", default_value = ".workflows")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => {
            let graph = read_graph(&path).await?;
            let report = check_readiness(&graph);
            println!(
                "Workflow has {} node(s) and {} edge(s).",
                graph.node_count(),
                graph.edge_count()
            );
            for issue in &report.issues {
                println!("  {issue}");
            }
            if report.is_ready() {
                println!("✅ Workflow is ready to run.");
            } else {
                eprintln!("❌ Workflow is not ready: {} error(s).", report.errors().count());
                std::process::exit(1);
            }
        }
        Command::Inspect { path } => {
            let graph = read_graph(&path).await?;
            print_graph(&graph);
        }
        Command::New { template, out } => {
            let graph = engine::template(&template)
                .with_context(|| format!("known templates: {}", engine::TEMPLATE_NAMES.join(", ")))?;
            write_output(out.as_deref(), &engine::to_json(&graph)?).await?;
        }
        Command::Kinds => {
            for kind in NodeKind::ALL {
                let entry = kind.palette_entry();
                println!("{:<20} {:<14} {}", kind, kind.role(), entry.label);
            }
            println!("{} kinds in the palette.", catalog().len());
        }
        Command::Save { path, name, dir } => {
            let graph = read_graph(&path).await?;
            let store = FileDocumentStore::open(&dir).await?;
            let name = name.unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "workflow".to_owned())
            });
            let stored = storage::save_graph(&store, &name, &graph).await?;
            println!("{}", stored.id);
        }
        Command::List { dir } => {
            let store = FileDocumentStore::open(&dir).await?;
            for summary in store.list().await? {
                println!(
                    "{}  {}  {} node(s), {} edge(s)  {}",
                    summary.id,
                    summary.saved_at.format("%Y-%m-%d %H:%M:%S"),
                    summary.node_count,
                    summary.edge_count,
                    summary.name
                );
            }
        }
        Command::Export { id, out, dir } => {
            let store = FileDocumentStore::open(&dir).await?;
            let graph = storage::load_graph(&store, id).await?;
            write_output(out.as_deref(), &engine::to_json(&graph)?).await?;
        }
    }

    Ok(())
}

async fn read_graph(path: &Path) -> anyhow::Result<GraphStore> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read file {}", path.display()))?;
    let graph = engine::from_json(&content)
        .with_context(|| format!("invalid workflow document {}", path.display()))?;
    info!("loaded {} with {} node(s)", path.display(), graph.node_count());
    Ok(graph)
}

async fn write_output(out: Option<&Path>, json: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("cannot write file {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_graph(graph: &GraphStore) {
    println!("Nodes:");
    for node in graph.nodes() {
        println!(
            "  {:<8} {:<20} {:<24} ({}, {})",
            node.id,
            node.kind(),
            node.label,
            node.position.x,
            node.position.y
        );
    }
    println!("Edges:");
    for edge in graph.edges() {
        println!("  {:<8} {} -> {}", edge.id, edge.source, edge.target);
    }
    match check_readiness(graph).execution_order {
        Some(order) => println!("Execution order: {}", order.join(" -> ")),
        None => println!("Execution order: unavailable (graph contains a cycle)"),
    }
}

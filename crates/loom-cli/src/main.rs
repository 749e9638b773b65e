//! Loom CLI — a thin terminal frontend wiring the agent core together.
//!
//! Mirrors `astrid-cli::main`'s shape: a `clap::Parser`, logging set up
//! before anything else, a session resolved against the working directory.
//! Trimmed to what the core itself needs to run — no daemon, no MCP server
//! management, no vendor-specific LLM adapter (see [`provider`]); those are
//! specified only at their contracts and left to an external integrator.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod provider;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use loom_approval::ApprovalMediator;
use loom_compaction::CompactionStrategy;
use loom_compaction::strategies::HidingThenSummaryStrategy;
use loom_context::Context;
use loom_core::{Part, SessionId};
use loom_llm::{ChatProvider, ThinkingEffort};
use loom_runtime::LaborMarket;
use loom_session::{LoomHome, MetadataStore, Session};
use loom_soul::{AgentLoopConfig, Soul, SoulSpawner};
use loom_telemetry::{LogConfig, LogFormat, setup_logging};
use loom_tools::builtins::{SendDMailTool, TaskTool};
use loom_tools::{ToolContext, ToolRegistry};
use loom_wire::Wire;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Loom — an interactive coding agent core, driven from the terminal.
#[derive(Parser)]
#[command(name = "loom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Working directory the session is bound to (defaults to the current directory).
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Resume a specific session id instead of the working directory's most recent one.
    #[arg(long)]
    resume: Option<String>,

    /// Auto-approve every tool call without prompting.
    #[arg(long)]
    yolo: bool,

    /// Enable debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    if let Err(err) = setup_logging(&LogConfig::new(level).with_format(LogFormat::Compact)) {
        eprintln!("failed to initialize logging: {err}");
    }

    let home = LoomHome::resolve().context("resolving $LOOM_HOME")?;
    home.ensure()?;

    let workspace_root = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir().context("resolving the current directory")?,
    };

    let mut metadata = MetadataStore::load(&home)?;
    let last_session_id = metadata.get(&workspace_root).last_session_id;
    let session = match (&cli.resume, last_session_id) {
        (Some(id), _) => Session::with_id(&home, &workspace_root, SessionId::parse(id).context("parsing --resume")?)?,
        (None, Some(last)) => Session::with_id(&home, &workspace_root, last)?,
        (None, None) => Session::create(&home, &workspace_root)?,
    };

    let mut workdir_meta = metadata.get(&workspace_root);
    workdir_meta.last_session_id = Some(session.id());
    metadata.set(&workspace_root, workdir_meta);
    metadata.save(&home)?;

    let wire = Wire::new();
    let _renderer = render::spawn(&wire);

    let approval = ApprovalMediator::new(wire.clone(), cli.yolo);
    let tool_ctx = ToolContext::new(workspace_root.clone(), approval);

    let mut tools = ToolRegistry::new();
    tools.register(Box::new(SendDMailTool));
    tools.register(Box::new(TaskTool));
    let tools = Arc::new(tools);

    let labor_market = Arc::new(LaborMarket::new());
    let compaction: Arc<dyn CompactionStrategy> = Arc::new(HidingThenSummaryStrategy::default());
    let config = AgentLoopConfig::default();
    let llm: Arc<dyn ChatProvider> = Arc::new(provider::UnconfiguredProvider);

    let spawner = Arc::new(SoulSpawner::new(
        session.id(),
        session.dir().to_path_buf(),
        Arc::clone(&llm),
        Arc::clone(&tools),
        Arc::clone(&labor_market),
        Arc::clone(&compaction),
        config,
        wire.clone(),
        cli.yolo,
    ));
    tool_ctx.set_subagent_spawner(Some(spawner)).await;

    let context = Context::open(session.context_path()).await.context("opening the session journal")?;
    let mut soul = Soul::new(
        context,
        wire,
        llm,
        tools,
        tool_ctx,
        compaction,
        config,
        "You are Loom, an interactive coding agent.",
        session.id(),
    );

    println!("loom session {} in {}", session.id(), workspace_root.display());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = soul.run(vec![Part::text(line)], ThinkingEffort::Off, CancellationToken::new()).await {
            eprintln!("turn failed: {err}");
        }
    }

    Ok(())
}

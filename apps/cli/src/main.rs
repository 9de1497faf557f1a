//! Worker entrypoint: loads a workflow definition from disk, drives a
//! single execution through [`nebula_execengine::ExecutionEngine`] against
//! in-memory drivers, and prints the settled execution state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use nebula_blocks::BlockRegistry;
use nebula_core::{ExecutionId, NodeId, UserId};
use nebula_eventbus::RecvOutcome;
use nebula_execengine::{EngineConfig, ExecutionEngine};
use nebula_execution::ExecutionState;
use nebula_execution_memory::InMemoryExecutionRepo;
use nebula_ports::ExecutionRepo;
use nebula_ports_memory::MemoryCircuitBreakerStore;
use nebula_workflow::WorkflowDefinition;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "nebula-worker", version, about = "Workflow execution worker")]
struct Cli {
    /// Path to a worker config file (JSON/TOML/YAML), layered under
    /// `NEBULA_ENGINE_*` environment overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one execution of a workflow definition to completion.
    Run {
        /// Path to a workflow definition (JSON).
        workflow: PathBuf,
        /// Path to a JSON object of initial execution variables (defaults to empty).
        #[arg(long)]
        input: Option<PathBuf>,
        /// User the execution runs as.
        #[arg(long)]
        user_id: Option<UserId>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = nebula_log::init().context("failed to initialize logging")?;
    let cli = Cli::parse();

    match cli.command {
        Command::Run { workflow, input, user_id } => {
            run_workflow(cli.config.as_deref(), &workflow, input.as_deref(), user_id).await
        }
    }
}

async fn run_workflow(
    config_path: Option<&std::path::Path>,
    workflow_path: &std::path::Path,
    input_path: Option<&std::path::Path>,
    user_id: Option<UserId>,
) -> Result<()> {
    let config = EngineConfig::load(config_path)
        .await
        .context("failed to load engine configuration")?;

    let workflow_json = tokio::fs::read_to_string(workflow_path)
        .await
        .with_context(|| format!("reading workflow definition at {}", workflow_path.display()))?;
    let workflow: WorkflowDefinition =
        serde_json::from_str(&workflow_json).context("parsing workflow definition")?;

    let input: serde_json::Map<String, serde_json::Value> = match input_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading execution input at {}", path.display()))?;
            serde_json::from_str(&raw).context("execution input must be a JSON object")?
        }
        None => serde_json::Map::new(),
    };

    let registry = Arc::new(default_registry());
    let execution_repo = Arc::new(InMemoryExecutionRepo::new());
    let breaker_store = Arc::new(MemoryCircuitBreakerStore::new());
    let events = Arc::new(nebula_execengine::ExecutionEvents::new());

    let execution_id = ExecutionId::v4();
    let user_id = user_id.unwrap_or_else(UserId::v4);
    let node_ids: Vec<NodeId> = workflow.nodes.iter().map(|n| n.id).collect();
    let mut state = ExecutionState::new(execution_id, workflow.id, &node_ids);
    state.variables = input;
    execution_repo.seed(execution_id, state).await;

    let mut subscription = events.subscribe(execution_id);
    let progress = tokio::spawn(async move {
        loop {
            match subscription.recv().await {
                RecvOutcome::Event(event) => tracing::info!(?event, "execution event"),
                RecvOutcome::Lagged(skipped) => tracing::warn!(skipped, "subscriber lagged"),
                RecvOutcome::Closed => break,
            }
        }
    });

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received, cancelling execution");
            ctrl_c_token.cancel();
        }
    });

    let engine = ExecutionEngine::new(registry, execution_repo.clone(), breaker_store, events, config);
    engine
        .run(&workflow, execution_id, user_id, cancellation)
        .await
        .context("execution failed")?;

    let _ = progress.await;

    let (_, value) = execution_repo
        .get_state(execution_id)
        .await
        .context("reading back execution state")?
        .context("execution vanished from the repo")?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

fn default_registry() -> BlockRegistry {
    use nebula_blocks::handlers::ai_agent::AiAgentHandler;
    use nebula_blocks::handlers::blockchain::UnavailableBlockchainProvider;
    use nebula_blocks::handlers::condition::ConditionHandler;
    use nebula_blocks::handlers::data_transform::DataTransformHandler;
    use nebula_blocks::handlers::http::HttpRequestHandler;
    use nebula_blocks::handlers::schedule::ScheduleHandler;
    use nebula_blocks::handlers::webhook::WebhookHandler;
    use nebula_ports_memory::{AllowAllSecurityValidator, MemoryTranscriptStore, MemorySubscriptionPort};
    use nebula_reasoning::BlocksReasoner;
    use nebula_sandbox::ToolServerSupervisor;

    // No providers are registered: an AI_AGENT node will fail with a clear
    // "no healthy provider" error until a deployment registers real ones.
    let providers = Arc::new(nebula_llm_provider::ProviderPool::new());
    let reasoner = Arc::new(BlocksReasoner::with_heuristic_confidence(
        providers,
        Arc::new(MemorySubscriptionPort::new()),
        Arc::new(MemoryTranscriptStore::new()),
    ));
    // No MCP tool servers are registered up front; a deployment would call
    // `register` against this supervisor for each configured server before
    // running workflows that select "mcp"-kind tools.
    let tool_servers = Arc::new(ToolServerSupervisor::new("nebula-worker", env!("CARGO_PKG_VERSION")));

    BlockRegistry::builder()
        .register("SCHEDULE", ScheduleHandler)
        .register("CONDITION", ConditionHandler)
        .register("DATA_TRANSFORM", DataTransformHandler)
        .register("HTTP_REQUEST", HttpRequestHandler)
        .register("WEBHOOK", WebhookHandler)
        .register(
            "AI_AGENT",
            AiAgentHandler::new(
                reasoner,
                Arc::new(AllowAllSecurityValidator),
                tool_servers,
                Arc::new(UnavailableBlockchainProvider),
            ),
        )
        .build()
}

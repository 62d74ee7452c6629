use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use requisition_flow::config::AppConfig;
use requisition_flow::error::AppError;
use requisition_flow::security::rate_limit::RateLimiter;
use requisition_flow::telemetry;
use requisition_flow::workflows::requisition::{
    classifier, guidance, requisition_router, ApplicationId, InMemoryStore, InterviewResult,
    RejectPolicy, RequestSnapshot, RequisitionService, StageId, StageRegistry,
    TransitionValidator,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Staffing Requisition Tracker",
    about = "Track university staffing requisitions through their approval workflow",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the requisition workflow from the command line
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum WorkflowCommand {
    /// List the ordered pipeline stages
    Pipeline,
    /// Print the checklist and required documents for a stage
    Guidance(GuidanceArgs),
    /// Dry-run a stage transition against an ad-hoc snapshot
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct GuidanceArgs {
    /// Stage tag (e.g. screening)
    #[arg(long)]
    stage: String,
    /// Position title, used to pick the document checklist
    #[arg(long)]
    position: Option<String>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Current stage tag
    #[arg(long)]
    from: String,
    /// Proposed stage tag
    #[arg(long)]
    to: String,
    /// Applications have been received
    #[arg(long)]
    has_applications: bool,
    /// VP of HR approval has been recorded
    #[arg(long)]
    approved_by_vp: bool,
    /// Faculty approval has been recorded
    #[arg(long)]
    approved_by_faculty: bool,
    /// Presidential approval has been recorded
    #[arg(long)]
    approved_by_president: bool,
    /// An interview result has been recorded (pass assumed)
    #[arg(long)]
    interview_result: bool,
    /// Application ids selected during screening
    #[arg(long)]
    selected: Vec<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Workflow { command } => run_workflow_command(command),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let ops_state = OpsState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let reject_policy = match config.workflow.reject_stages.clone() {
        Some(stages) => RejectPolicy::From(stages),
        None => RejectPolicy::AnyStage,
    };
    let service = Arc::new(RequisitionService::new(
        TransitionValidator::standard(),
        Arc::new(InMemoryStore::new()),
        reject_policy,
    ));
    let limiter = RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window);
    spawn_limiter_sweep(limiter.clone(), config.rate_limit.window);

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(ops_state)
        .merge(requisition_router(service, limiter))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "requisition tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Sweep drained callers out of the limiter once per window. `allow` only
/// prunes the caller it serves, so without this the map holds one entry per
/// distinct caller identity for the lifetime of the process.
fn spawn_limiter_sweep(limiter: RateLimiter, window: std::time::Duration) {
    let period = window.max(std::time::Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            limiter.evict_stale();
        }
    });
}

fn run_workflow_command(command: WorkflowCommand) -> Result<(), AppError> {
    match command {
        WorkflowCommand::Pipeline => {
            print_pipeline();
            Ok(())
        }
        WorkflowCommand::Guidance(args) => run_guidance(args),
        WorkflowCommand::Check(args) => run_check(args),
    }
}

fn print_pipeline() {
    println!("Requisition approval pipeline");
    for step in StageRegistry::standard().steps() {
        println!("{:>2}. {} ({})", step.order + 1, step.label, step.id.as_str());
    }
    println!("\nTerminal stages reached out of band: confirmed, rejected");
}

fn run_guidance(args: GuidanceArgs) -> Result<(), AppError> {
    let stage =
        StageId::parse(&args.stage).ok_or_else(|| AppError::UnknownStage(args.stage.clone()))?;

    let entry = guidance::guidance_for(stage);
    let category = classifier::classify(args.position.as_deref());

    println!("{} — {}", stage.label(), entry.title);
    for (index, step) in entry.steps.iter().enumerate() {
        println!("{}. {}", index + 1, step);
    }
    if !entry.notes.is_empty() {
        println!("Note: {}", entry.notes);
    }

    println!("\nApplicant category: {}", category.label());
    println!("Required documents");
    for document in classifier::documents_for(category) {
        println!("- {document}");
    }

    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let snapshot = snapshot_from_args(&args);
    let validator = TransitionValidator::standard();
    let outcome = validator.validate(&args.from, &args.to, &snapshot);

    if outcome.can_proceed {
        println!("ALLOWED: {}", outcome.message);
    } else {
        println!("BLOCKED: {}", outcome.message);
    }
    for warning in &outcome.warnings {
        println!("warning: {warning}");
    }

    Ok(())
}

fn snapshot_from_args(args: &CheckArgs) -> RequestSnapshot {
    RequestSnapshot {
        approved_by_vp: args.approved_by_vp,
        has_applications: args.has_applications,
        selected_applications: args
            .selected
            .iter()
            .cloned()
            .map(ApplicationId)
            .collect(),
        approved_by_faculty: args.approved_by_faculty,
        interview_result: args.interview_result.then(|| InterviewResult {
            passed: true,
            score: None,
            comments: None,
        }),
        approved_by_president: args.approved_by_president,
        position: None,
        personal_info: None,
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

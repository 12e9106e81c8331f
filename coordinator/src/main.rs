//! Cluster Coordination Service
//!
//! Standalone server binary. Workers register, heartbeat, rendezvous on
//! barriers, and share configuration through the key-value store; errors are
//! delivered to them through `PollForError`.
//!
//! # Usage
//!
//! ```bash
//! # Two jobs declared on the command line
//! coordinator --job worker:4 --job ps:2
//!
//! # Or from a configuration file
//! coordinator --config coordination.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tonic::transport::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coordination_core::{CoordinationService, JobSpec, ServiceConfig};
use coordinator::proto::coordination_service_server::CoordinationServiceServer;
use coordinator::CoordinationServiceImpl;

/// Coordination service for distributed compute clusters
#[derive(Parser, Debug)]
#[command(name = "coordinator")]
#[command(about = "Coordination service for distributed compute clusters")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "50051")]
    port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0")]
    address: String,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Coordinated job as <name>:<num_tasks>; repeatable
    #[arg(long = "job", value_parser = parse_job_spec)]
    jobs: Vec<JobSpec>,

    /// Heartbeat timeout in milliseconds (0 selects the 10s default)
    #[arg(long)]
    heartbeat_timeout_ms: Option<u64>,

    /// Shutdown barrier timeout in milliseconds (0 disconnects individually)
    #[arg(long)]
    shutdown_barrier_timeout_ms: Option<u64>,

    /// Allow tasks in an unavailable error state to reconnect with a new
    /// incarnation
    #[arg(long)]
    allow_new_incarnation_to_reconnect: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_job_spec(value: &str) -> Result<JobSpec, String> {
    let (name, num_tasks) = value
        .split_once(':')
        .ok_or_else(|| "expected <name>:<num_tasks>".to_string())?;
    if name.is_empty() {
        return Err("job name must not be empty".to_string());
    }
    let num_tasks: u32 = num_tasks
        .parse()
        .map_err(|e| format!("invalid task count: {e}"))?;
    Ok(JobSpec::new(name, num_tasks))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    config.coordinated_jobs.extend(args.jobs);
    if let Some(heartbeat_timeout_ms) = args.heartbeat_timeout_ms {
        config.heartbeat_timeout_ms = heartbeat_timeout_ms;
    }
    if let Some(shutdown_barrier_timeout_ms) = args.shutdown_barrier_timeout_ms {
        config.shutdown_barrier_timeout_ms = shutdown_barrier_timeout_ms;
    }
    if args.allow_new_incarnation_to_reconnect {
        config.allow_new_incarnation_to_reconnect = true;
    }
    config.validate()?;
    if config.coordinated_jobs.is_empty() {
        return Err("at least one coordinated job is required (--job or --config)".into());
    }

    tracing::info!("starting coordination service");
    tracing::info!(
        "  heartbeat timeout: {}ms",
        config.effective_heartbeat_timeout_ms()
    );
    tracing::info!(
        "  shutdown barrier timeout: {}ms",
        config.shutdown_barrier_timeout_ms
    );
    for job in &config.coordinated_jobs {
        tracing::info!("  job {} with {} tasks", job.name, job.num_tasks);
    }

    // No service-to-client connection: workers pull errors via PollForError.
    let service = CoordinationService::new(config, None);
    let rpc = CoordinationServiceImpl::new(service.clone());

    let addr: SocketAddr = format!("{}:{}", args.address, args.port).parse()?;
    tracing::info!("listening on {addr}");

    Server::builder()
        .add_service(CoordinationServiceServer::new(rpc))
        .serve_with_shutdown(addr, async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            tracing::info!("shutting down coordination service...");
        })
        .await?;

    service.stop().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_job_specs() {
        assert_eq!(parse_job_spec("worker:4").unwrap(), JobSpec::new("worker", 4));
        assert!(parse_job_spec("worker").is_err());
        assert!(parse_job_spec(":4").is_err());
        assert!(parse_job_spec("worker:x").is_err());
    }
}

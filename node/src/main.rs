//! # Arta Gateway Daemon
//!
//! Entry point for the `arta-node` binary. Parses CLI arguments,
//! initializes logging, wires the store and publisher into the
//! dispatchers, spawns the poll loops, and serves the Prometheus
//! `/metrics` endpoint until SIGINT/SIGTERM.
//!
//! The binary supports two subcommands:
//!
//! - `run`     — start the gateway daemon
//! - `version` — print build version information

mod cli;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;

use arta_gateway::bus::{KafkaPublisher, MemoryPublisher, MessagePublisher};
use arta_gateway::config::{KafkaConfig, NotificationConfig, VaDispatcherConfig};
use arta_gateway::dispatch::{NotificationDispatcher, VaDispatcher, VaQueue};
use arta_gateway::metrics::GatewayMetrics;
use arta_gateway::store::{BillingStore, MemoryStore};

use cli::{ArtaNodeCli, Commands, RunArgs};
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ArtaNodeCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Version => {
            println!("arta-node {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Starts the full daemon: VA pollers, reminder sweep, metrics endpoint.
async fn run_node(args: RunArgs) -> Result<()> {
    logging::init_logging(
        "arta_node=info,arta_gateway=info",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        brokers = %args.brokers,
        dry_run = args.dry_run,
        metrics_port = args.metrics_port,
        "starting arta-node"
    );

    // --- Publisher ---
    let publisher: Arc<dyn MessagePublisher> = if args.dry_run {
        tracing::warn!("dry run: messages are recorded in memory, not published");
        Arc::new(MemoryPublisher::new())
    } else {
        let kafka = KafkaConfig {
            brokers: args.brokers.clone(),
            message_timeout: Duration::from_millis(args.kafka_timeout_ms),
        };
        Arc::new(KafkaPublisher::new(&kafka).context("failed to create kafka producer")?)
    };

    // --- Store ---
    // The in-memory reference store. A production deployment swaps in the
    // ledger-backed implementation of `BillingStore` here.
    let store: Arc<dyn BillingStore> = Arc::new(MemoryStore::new());

    // --- Metrics ---
    let metrics = Arc::new(GatewayMetrics::new());

    // --- Dispatchers ---
    let va_dispatcher = Arc::new(VaDispatcher::new(
        Arc::clone(&store),
        Arc::clone(&publisher),
        Arc::clone(&metrics),
        VaDispatcherConfig {
            poll_interval: Duration::from_millis(args.va_poll_ms),
            topic: args.va_topic.clone(),
        },
    ));

    let notification_dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::clone(&store),
        Arc::clone(&publisher),
        Arc::clone(&metrics),
        NotificationConfig {
            reminder_interval: Duration::from_secs(args.reminder_interval_secs),
            batch_size: args.reminder_batch,
            delay_minutes: args.reminder_delay_minutes,
            reminder_template: args.reminder_template.clone(),
            payment_template: args.payment_template.clone(),
            contact_info: args.contact_info.clone(),
            contact_info_full: args.contact_info_full.clone(),
            finance_email: args.finance_email.clone(),
            send_finance_copy: args.finance_copy,
            it_email: args.it_email.clone(),
            send_it_copy: args.it_copy,
            notification_topic: args.notification_topic.clone(),
            payment_fact_topic: args.payment_fact_topic.clone(),
        },
    ));

    // --- Poll loops ---
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::new();

    for queue in VaQueue::ALL {
        let dispatcher = Arc::clone(&va_dispatcher);
        let shutdown = shutdown_rx.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher.run(queue, shutdown).await;
        }));
    }

    {
        let dispatcher = Arc::clone(&notification_dispatcher);
        let shutdown = shutdown_rx.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher.run_reminders(shutdown).await;
        }));
    }

    // --- Metrics server ---
    let router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics_handler))
        .with_state(Arc::clone(&metrics));
    let addr = format!("0.0.0.0:{}", args.metrics_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", addr))?;
    tracing::info!("metrics server listening on {}", addr);

    // --- Serve until asked to stop ---
    tokio::select! {
        res = axum::serve(listener, router) => {
            if let Err(e) = res {
                tracing::error!("metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, stopping pollers");
        }
    }

    let _ = shutdown_tx.send(true);
    for task in tasks {
        let _ = task.await;
    }

    tracing::info!("arta-node stopped");
    Ok(())
}

/// Serves the gateway registry in the Prometheus text format.
async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<Arc<GatewayMetrics>>,
) -> String {
    metrics.encode()
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

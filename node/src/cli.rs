//! # CLI Interface
//!
//! Command-line arguments for `arta-node` via `clap` derive. Every
//! operational knob has an `ARTA_*` environment fallback so container
//! deployments can configure the daemon without rebuilding images.

use clap::{Parser, Subcommand};

/// Arta virtual account gateway daemon.
///
/// Polls the billing store for pending virtual-account work and unsent
/// reminders, publishes the corresponding messages to the bus, and exposes
/// Prometheus metrics.
#[derive(Parser, Debug)]
#[command(
    name = "arta-node",
    about = "Arta virtual account gateway daemon",
    version,
    propagate_version = true
)]
pub struct ArtaNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the gateway daemon.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Kafka bootstrap broker list.
    #[arg(long, env = "ARTA_BROKERS", default_value = "localhost:9092")]
    pub brokers: String,

    /// Transport send timeout in milliseconds.
    #[arg(long, env = "ARTA_KAFKA_TIMEOUT_MS", default_value_t = 5000)]
    pub kafka_timeout_ms: u64,

    /// Record messages instead of publishing them: smoke-testing without
    /// a broker.
    #[arg(long)]
    pub dry_run: bool,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "ARTA_METRICS_PORT", default_value_t = 9641)]
    pub metrics_port: u16,

    /// Poll interval for each VA queue, in milliseconds.
    #[arg(long, env = "ARTA_VA_POLL_MS", default_value_t = 1000)]
    pub va_poll_ms: u64,

    /// Interval between reminder sweeps, in seconds.
    #[arg(long, env = "ARTA_REMINDER_INTERVAL_SECS", default_value_t = 60)]
    pub reminder_interval_secs: u64,

    /// Maximum bills considered per reminder sweep.
    #[arg(long, env = "ARTA_REMINDER_BATCH", default_value_t = 50)]
    pub reminder_batch: usize,

    /// Minutes after a bill's last update before its reminder may go out.
    #[arg(long, env = "ARTA_REMINDER_DELAY_MINUTES", default_value_t = 60)]
    pub reminder_delay_minutes: i64,

    /// Renderer template key for billing reminders.
    #[arg(long, env = "ARTA_REMINDER_TEMPLATE", default_value = "tagihan")]
    pub reminder_template: String,

    /// Renderer template key for payment notices.
    #[arg(long, env = "ARTA_PAYMENT_TEMPLATE", default_value = "pembayaran")]
    pub payment_template: String,

    /// Short contact-info line for notification payloads.
    #[arg(long, env = "ARTA_CONTACT_INFO", default_value = "")]
    pub contact_info: String,

    /// HTML contact-info block for notification payloads.
    #[arg(long, env = "ARTA_CONTACT_INFO_FULL", default_value = "")]
    pub contact_info_full: String,

    /// Finance mailbox for payment-notice copies.
    #[arg(long, env = "ARTA_FINANCE_EMAIL", default_value = "")]
    pub finance_email: String,

    /// Send finance a copy of every payment notice.
    #[arg(long, env = "ARTA_FINANCE_COPY")]
    pub finance_copy: bool,

    /// IT mailbox for payment-notice copies.
    #[arg(long, env = "ARTA_IT_EMAIL", default_value = "")]
    pub it_email: String,

    /// Send IT a copy of every payment notice.
    #[arg(long, env = "ARTA_IT_COPY")]
    pub it_copy: bool,

    /// Topic for outbound VA provisioning requests.
    #[arg(long, env = "ARTA_VA_TOPIC", default_value = "va.request")]
    pub va_topic: String,

    /// Topic for outbound notification requests.
    #[arg(long, env = "ARTA_NOTIFICATION_TOPIC", default_value = "notification.request")]
    pub notification_topic: String,

    /// Topic for payment-fact reconciliation records.
    #[arg(long, env = "ARTA_PAYMENT_FACT_TOPIC", default_value = "tagihan.payment")]
    pub payment_fact_topic: String,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "ARTA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        ArtaNodeCli::command().debug_assert();
    }

    #[test]
    fn run_defaults_match_the_gateway_defaults() {
        let cli = ArtaNodeCli::parse_from(["arta-node", "run"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.va_poll_ms, 1000);
        assert_eq!(args.reminder_batch, 50);
        assert_eq!(args.reminder_delay_minutes, 60);
        assert_eq!(args.va_topic, "va.request");
        assert!(!args.finance_copy);
    }
}

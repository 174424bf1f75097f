//! Hardware Classification Operator CLI
//!
//! Runs one classification pass of a HardwareClassification manifest against
//! an inventory snapshot file and prints the resulting status and host labels.

use clap::{Parser, ValueEnum};
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hardware_classification_operator::classification::ClassificationObserver;
use hardware_classification_operator::loader::{load_inventory, load_profile};
use hardware_classification_operator::{
    CheckEvent, Classifier, Error, HardwareClassificationStatus, MemoryInventory,
    RecordingObserver, Reconciler, ReconcilerConfig, Result, TracingObserver,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Hardware Classification Operator - match hosts against hardware profiles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HardwareClassification manifest (YAML or JSON)
    #[arg(long, env = "HWCC_PROFILE")]
    profile: PathBuf,

    /// Inventory snapshot (YAML or JSON list of hosts)
    #[arg(long, env = "HWCC_INVENTORY")]
    inventory: PathBuf,

    /// Namespace to classify; defaults to the manifest's namespace
    #[arg(long, env = "HWCC_NAMESPACE")]
    namespace: Option<String>,

    /// Prefix of the classification label key
    #[arg(long, env = "HWCC_LABEL_PREFIX", default_value = "hardwareclassification.metal3.io")]
    label_prefix: String,

    /// Label value written on matched hosts
    #[arg(long, env = "HWCC_LABEL_VALUE", default_value = "matches")]
    label_value: String,

    /// Include every hardware check in the output
    #[arg(long)]
    explain: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

/// What the CLI prints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    profile: String,
    namespace: String,
    status: HardwareClassificationStatus,
    labels: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<Vec<CheckEvent>>,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    info!("Starting hardware classification");
    info!("  Version: {}", hardware_classification_operator::VERSION);
    info!("  Profile: {}", args.profile.display());
    info!("  Inventory: {}", args.inventory.display());

    let mut hc = load_profile(&args.profile)?;
    let hosts = load_inventory(&args.inventory)?;

    let namespace = args
        .namespace
        .clone()
        .or_else(|| hc.namespace())
        .unwrap_or_else(|| "default".to_string());
    hc.metadata.namespace = Some(namespace.clone());

    let inventory = Arc::new(MemoryInventory::with_hosts(namespace.clone(), hosts));

    let recorder = Arc::new(RecordingObserver::new());
    let observer: Arc<dyn ClassificationObserver> = if args.explain {
        recorder.clone()
    } else {
        Arc::new(TracingObserver)
    };

    let config = ReconcilerConfig {
        label_prefix: args.label_prefix.clone(),
        label_value: args.label_value.clone(),
        default_namespace: namespace.clone(),
    };
    let reconciler = Reconciler::new(config, inventory.clone(), inventory.clone())
        .with_classifier(Classifier::with_observer(observer));

    let status = reconciler.reconcile(&hc).await;
    info!(
        status = %status.profile_match_status,
        matched = status.matched_hosts.len(),
        "classification complete"
    );

    let labels = inventory
        .hosts(&namespace)
        .into_iter()
        .map(|host| (host.name, host.labels))
        .collect();

    let report = Report {
        profile: hc.name_any(),
        namespace,
        status,
        labels,
        checks: args.explain.then(|| recorder.checks()),
    };

    let rendered = match args.output {
        OutputFormat::Yaml => serde_yaml::to_string(&report)?,
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    println!("{}", rendered);

    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let kube_directive = "kube=info"
        .parse()
        .map_err(|e| Error::Configuration(format!("Invalid log directive: {}", e)))?;
    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive(kube_directive);

    // Logs go to stderr so stdout carries only the report
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

//! Connectivity Sensor CLI
//!
//! Records link-state transitions and per-interval traffic usage.

use clap::{Parser, Subcommand};
use connectivity_sensor::{
    monitor::{check_support, Monitor, MonitorConfig},
    stats::create_shared_stats_with_persistence,
    store::JsonlStore,
    Config, ConnectivityRecord, ConnectivitySensor, SystemCounters, UsageSample, VERSION,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "connectivity-sensor")]
#[command(version = VERSION)]
#[command(about = "Connectivity sensor recording link state and traffic usage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the sensor
    Start {
        /// Label attached to every emitted record
        #[arg(long)]
        label: Option<String>,
    },

    /// Show current sensor status
    Status,

    /// Show configuration
    Config,

    /// Set the label attached to every emitted record
    Label {
        /// New label; an empty string clears it
        label: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { label } => {
            cmd_start(label);
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
        Commands::Label { label } => {
            cmd_label(label);
        }
    }
}

fn cmd_start(label: Option<String>) {
    println!("Connectivity Sensor v{VERSION}");
    println!();

    // Load or create configuration
    let mut config = Config::load().unwrap_or_default();
    if let Some(label) = label {
        config.label = label;
        if let Err(e) = config.save() {
            eprintln!("Warning: Could not save config: {e}");
        }
    }
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    println!("Starting sensor...");
    println!("  Device ID: {}", config.device_id);
    println!(
        "  Label: {}",
        if config.label.is_empty() {
            "(none)"
        } else {
            config.label.as_str()
        }
    );
    println!("  Data path: {:?}", config.data_path);
    println!("  Scan interval: {}s", config.scan_interval.as_secs());

    if !check_support() {
        eprintln!("Warning: Link watching not supported on this platform.");
        eprintln!("The sensor will run without link events.");
    }

    // Set up session stats
    let stats = create_shared_stats_with_persistence(config.data_path.join("stats.json"));

    // Create the sensor and its sinks
    let store = JsonlStore::new(config.data_path.join("records"));
    let mut sensor = ConnectivitySensor::new(
        config.clone(),
        Box::new(SystemCounters::new()),
        Box::new(store),
        None,
        stats.clone(),
    );

    if sensor.activate() {
        println!("  Traffic accounting: armed");
    } else {
        println!("  Traffic accounting: unavailable on this platform");
    }

    // Create the monitor
    let mut monitor = Monitor::new(MonitorConfig {
        scan_interval: config.scan_interval,
    });
    if let Err(e) = monitor.start() {
        eprintln!("Error starting monitor: {e}");
        std::process::exit(1);
    }

    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc_handler(r);

    // Main event loop
    let receiver = monitor.receiver().clone();
    let mut last_config_check = std::time::Instant::now();

    while running.load(Ordering::SeqCst) {
        // Periodically reload config so `connectivity-sensor label` can
        // retarget a running agent.
        if last_config_check.elapsed() >= Duration::from_secs(1) {
            if let Ok(cfg) = Config::load() {
                if cfg.label != sensor.label() {
                    println!("Label changed to {:?}", cfg.label);
                    sensor.set_label(cfg.label);
                }
            }
            last_config_check = std::time::Instant::now();
        }

        // Process events with timeout
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => sensor.handle(event),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Monitor disconnected unexpectedly");
                break;
            }
        }
    }

    // Stop watching
    println!();
    println!("Stopping sensor...");
    monitor.stop();

    // Save session stats
    if let Err(e) = stats.save() {
        eprintln!("Warning: Could not save session stats: {e}");
    }

    // Final stats
    println!();
    println!("{}", stats.summary());
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Connectivity Sensor Status");
    println!("==========================");
    println!();

    println!(
        "Link watching: {}",
        if check_support() {
            "supported"
        } else {
            "not supported on this platform"
        }
    );
    println!();

    println!("Configuration:");
    println!("  Device ID: {}", config.device_id);
    println!(
        "  Label: {}",
        if config.label.is_empty() {
            "(none)"
        } else {
            config.label.as_str()
        }
    );
    println!("  Scan interval: {}s", config.scan_interval.as_secs());
    println!();

    let store = JsonlStore::new(config.data_path.join("records"));
    println!("Recorded data:");
    println!(
        "  Connectivity records: {}",
        store.record_count(ConnectivityRecord::TABLE_NAME)
    );
    println!(
        "  Usage samples: {}",
        store.record_count(UsageSample::TABLE_NAME)
    );
    println!();

    // Load and show session stats if available
    let stats_path = config.data_path.join("stats.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(links) = stats.get("link_events") {
                    println!("  Link transitions: {links}");
                }
                if let Some(internet) = stats.get("internet_changes") {
                    println!("  Internet changes: {internet}");
                }
                if let Some(polls) = stats.get("traffic_polls") {
                    println!("  Traffic polls: {polls}");
                }
                if let Some(samples) = stats.get("usage_samples") {
                    println!("  Usage samples: {samples}");
                }
                if let Some(idle) = stats.get("idle_signals") {
                    println!("  Idle signals: {idle}");
                }
            }
        }
    } else {
        println!("No previous session data found.");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

fn cmd_label(label: String) {
    let mut config = Config::load().unwrap_or_default();
    config.label = label;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    if config.label.is_empty() {
        println!("Label cleared.");
    } else {
        println!("Label set to {:?}.", config.label);
    }
    println!("A running sensor picks the change up within a second.");
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}

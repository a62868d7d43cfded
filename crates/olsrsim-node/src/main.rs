use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use olsrsim_core::NetworkTopology;
use olsrsim_node::{config, logging, Controller, SimError};

#[derive(Parser)]
#[command(name = "olsrsim-node", about = "Simplified-OLSR ad-hoc mesh simulator")]
struct Cli {
    /// Topology file: one '<tick> <UP|DOWN> <from> <to>' record per line
    #[arg(long = "tf", value_name = "PATH")]
    topology_file: PathBuf,

    /// Node configuration file: one '<src> <dst> "<msg>" <delay>' line per node
    #[arg(long = "nf", value_name = "PATH")]
    node_file: PathBuf,

    /// Tick duration in milliseconds
    #[arg(short = 't', long = "tick-ms", value_name = "MS", default_value_t = 1000)]
    tick_ms: u64,

    /// Number of ticks to run
    #[arg(long = "rt", value_name = "TICKS", default_value_t = 120)]
    run_ticks: u64,

    /// Directory for per-node log files
    #[arg(long, value_name = "PATH", default_value = "./log")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        logging::init_json();
    } else {
        logging::init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("olsrsim-node: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), SimError> {
    if cli.tick_ms == 0 {
        return Err(SimError::Config("tick duration must be at least 1 ms".into()));
    }

    let topology_file = File::open(&cli.topology_file).map_err(|e| {
        SimError::Config(format!(
            "cannot open topology file {}: {e}",
            cli.topology_file.display()
        ))
    })?;
    let topology = NetworkTopology::from_reader(topology_file)?;

    let node_file = File::open(&cli.node_file).map_err(|e| {
        SimError::Config(format!(
            "cannot open node config file {}: {e}",
            cli.node_file.display()
        ))
    })?;
    let configs = config::read_node_configs(node_file)?;

    let controller = Controller::initialize(
        topology,
        configs,
        Duration::from_millis(cli.tick_ms),
        &cli.log_dir,
    )?;

    let handle = controller.shutdown_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received SIGINT, shutting down");
        handle.shutdown();
    });

    controller.run(cli.run_ticks).await;
    Ok(())
}

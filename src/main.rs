/* 3rd party libraries */
use clap::{Arg, Command as App};
use crossbeam_channel as cbc;
use log::{info, warn};
use std::io::BufRead;
use std::thread::Builder;

/* Custom libraries */
use elevator_bank::config::{self, Config, ConfigError};
use elevator_bank::unwrap_or_exit;
use elevator_bank::{BuildingSnapshot, Command, Coordinator};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/* Main */
fn main() {
    let matches = App::new("elevator-bank")
        .about("Two-car elevator bank simulation")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .takes_value(true)
                .value_name("FILE")
                .help("Path to the TOML configuration file"),
        )
        .get_matches();

    // Load the configuration; a missing default file falls back to the built-in constants
    let explicit_path = matches.value_of("config");
    let loaded = match config::load_config(explicit_path.unwrap_or(DEFAULT_CONFIG_PATH)) {
        Err(ConfigError::Read { .. }) if explicit_path.is_none() => Ok(Config::default()),
        other => other,
    };

    let log_level = loaded
        .as_ref()
        .map(|config| config.runtime.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = unwrap_or_exit!(loaded);
    info!("Starting elevator bank with {:?}", config.elevator);

    // Initialize channels
    let (command_tx, command_rx) = cbc::unbounded::<Command>();
    let (snapshot_tx, snapshot_rx) = cbc::unbounded::<BuildingSnapshot>();

    // Start the coordinator
    let coordinator = Coordinator::new(&config.elevator);
    let runtime = config.runtime.clone();
    let coordinator_thread = unwrap_or_exit!(Builder::new()
        .name("coordinator".into())
        .spawn(move || coordinator.run(&runtime, command_rx, snapshot_tx)));

    // Start the view, printing every snapshot as one JSON line
    let view_thread = Builder::new().name("view".into());
    unwrap_or_exit!(view_thread.spawn(move || {
        for snapshot in snapshot_rx.iter() {
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to serialize snapshot: {}", e),
            }
        }
    }));

    // Start the input reader
    let input_thread = Builder::new().name("input".into());
    unwrap_or_exit!(input_thread.spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if command_tx.send(command).is_err() || command == Command::Terminate {
                        return;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
        let _ = command_tx.send(Command::Terminate);
    }));

    if coordinator_thread.join().is_err() {
        log::error!("Coordinator thread panicked");
        std::process::exit(1);
    }
}

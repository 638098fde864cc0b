use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::Path;

use endpointfs::application::console::{run_line, ConsoleOutcome};
use endpointfs::infrastructure::config::Config;
use endpointfs::plugins::{create_endpoint, EndpointManager, PLUGIN_NAMES};

#[derive(Parser)]
#[command(name = "endpointfs")]
#[command(about = "Synthetic filesystem endpoints for search, summaries and skills", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount the configured endpoints and open a console on stdin
    Run {
        /// Config file path
        #[arg(short, long, default_value = "endpoints.yaml")]
        config: String,
    },
    /// Print a plugin's README
    Readme {
        /// Plugin name or alias (simpcurlfs, summaryfs, skillsfs)
        plugin: String,
    },
    /// Generate default config
    InitConfig {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show version
    Version,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            run_console(&config);
        }
        Commands::Readme { plugin } => match create_endpoint(&plugin) {
            Ok(endpoint) => print!("{}", endpoint.readme()),
            Err(e) => {
                eprintln!("error: {} (known plugins: {})", e, PLUGIN_NAMES.join(", "));
                std::process::exit(2);
            }
        },
        Commands::InitConfig { output } => {
            init_config(output.as_deref());
        }
        Commands::Version => {
            println!("endpointfs v{}", env!("CARGO_PKG_VERSION"));
        }
    }
}

fn run_console(config_path: &str) {
    let config = if Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        tracing::warn!("Config {} not found, using default mounts", config_path);
        Config::default()
    };

    let mut manager = match EndpointManager::from_config(&config) {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!("Failed to mount endpoints: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Mounted {} endpoints; type help for commands", manager.list_mounts().len());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        }

        match run_line(&manager, &line) {
            Ok(Some(ConsoleOutcome::Output(text))) => {
                print!("{}", text);
                if !text.is_empty() && !text.ends_with('\n') {
                    println!();
                }
            }
            Ok(Some(ConsoleOutcome::Quit)) => break,
            Ok(None) => {}
            Err(e) => println!("error: {}", e),
        }
    }

    manager.shutdown_all();
}

fn init_config(output: Option<&str>) {
    let yaml = match Config::default().to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    match output {
        Some(path) => match std::fs::write(path, &yaml) {
            Ok(()) => println!("Wrote default config to {}", path),
            Err(e) => {
                eprintln!("error: failed to write {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            println!("{}", yaml);
            println!("\nSave this to endpoints.yaml and adjust as needed.");
        }
    }
}

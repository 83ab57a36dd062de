use clap::{Parser, Subcommand};
use std::process::ExitCode;

use zenith_scan::config::Config;
use zenith_scan::observer::Observer;
use zenith_scan::scan::Scanner;
use zenith_scan::web;

#[derive(Parser)]
#[command(name = "zenith-scan")]
#[command(about = "Ranks what is overhead: planets, satellites, airplanes, stars")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scan API server
    Serve {
        /// Path to the YAML configuration file
        #[arg(long, default_value = "config.yaml")]
        config: String,
    },
    /// Run one scan and print the report as JSON
    Scan {
        /// Observer latitude in degrees
        #[arg(long)]
        lat: f64,
        /// Observer longitude in degrees
        #[arg(long)]
        lon: f64,
        /// Observer altitude in meters
        #[arg(long, default_value_t = 0.0)]
        alt: f64,
        /// Optional YAML configuration file; defaults apply otherwise
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Scan {
            lat,
            lon,
            alt,
            config,
        } => scan(lat, lon, alt, config.as_deref()).await,
    }
}

async fn serve(config_path: &str) -> ExitCode {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let scanner = match Scanner::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error building feed clients: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = web::run_server(config.web.bind.clone(), scanner).await {
        eprintln!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn scan(lat: f64, lon: f64, alt: f64, config_path: Option<&str>) -> ExitCode {
    let config = match config_path {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let observer = match Observer::new(lat, lon, alt, chrono::Utc::now()) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Invalid observer: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let scanner = match Scanner::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error building feed clients: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = scanner.scan(observer).await;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing report: {}", e);
            ExitCode::FAILURE
        }
    }
}

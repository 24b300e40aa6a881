use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use placekeep::app::{parse_transform, Command as AppCommand, Flow};
use placekeep::config::save_log_level;
use placekeep::{util, Config, Database, HeadlessApp, Transform};

#[derive(Parser)]
#[command(name = "placekeep", version, about = "Persist and restore tracked markers, anchors and viewpoints")]
struct Cli {
    /// Data directory (defaults to ~/.placekeep, or $PLACEKEEP_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Restore the saved layout and report what was reconstructed
    Restore,
    /// Touch the screen; HIT is the surface transform the tracker reports
    Tap {
        /// Three translation components or sixteen row-major components
        #[arg(long, value_parser = parse_transform, allow_hyphen_values = true)]
        hit: Transform,
    },
    /// Log the camera position under the current device ordinal
    RecordViewpoint {
        /// Camera transform: three translation components or sixteen row-major
        #[arg(long, value_parser = parse_transform, allow_hyphen_values = true)]
        camera: Transform,
        /// Advance to the next device ordinal before recording
        #[arg(long)]
        new_device: bool,
    },
    /// Print every logged viewpoint
    Viewpoints,
    /// Distance from the camera to each marker
    Distances {
        #[arg(long, value_parser = parse_transform, allow_hyphen_values = true)]
        camera: Transform,
    },
    /// Clear markers, anchors and viewpoints
    Reset,
    /// Read actions from stdin, one per line
    Shell,
    /// Edit the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set the tracing filter used for the log file
    SetLogLevel { level: String },
}

fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .or_else(|| std::env::var_os(util::DATA_DIR_ENV).map(PathBuf::from));
    util::init_data_dir(data_dir);

    let config = Config::load();
    init_logging(&config)?;

    if let CliCommand::Config { action } = &cli.command {
        match action {
            ConfigAction::SetLogLevel { level } => {
                save_log_level(level).context("Failed to update config")?;
                println!("log level set to {}", level);
            }
        }
        return Ok(());
    }

    let database = Database::open(config.database_path.clone()).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;
    let mut app = HeadlessApp::open(&database)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        CliCommand::Restore | CliCommand::Shell => app.write_startup(&mut out)?,
        _ => app.write_warnings(&mut out)?,
    }

    let script = match cli.command {
        CliCommand::Restore => vec![AppCommand::Status],
        CliCommand::Tap { hit } => vec![AppCommand::Tap(Some(hit))],
        CliCommand::RecordViewpoint { camera, new_device } => {
            let mut script = vec![AppCommand::Camera(Some(camera))];
            if new_device {
                script.push(AppCommand::AdvanceDevice);
            }
            script.push(AppCommand::RecordViewpoint);
            script
        }
        CliCommand::Viewpoints => vec![AppCommand::PrintViewpoints],
        CliCommand::Distances { camera } => {
            vec![AppCommand::Camera(Some(camera)), AppCommand::Distances]
        }
        CliCommand::Reset => vec![AppCommand::Reset],
        CliCommand::Shell => return app.run_shell(io::stdin().lock(), &mut out),
        CliCommand::Config { .. } => Vec::new(),
    };

    for command in script {
        if app.execute(command, &mut out)? == Flow::Quit {
            break;
        }
    }

    Ok(())
}

//! hours-ocr - opening hours from OCR dumps
//!
//! Batch front end for the recognizer: still images are read one forced run
//! each, recorded frame streams are replayed through a live session.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use opening_hours_ocr::capture::{self, CaptureConfig};
use opening_hours_ocr::config::{self, AppConfig};
use opening_hours_ocr::{HoursPipeline, HoursRecognizer, LiveSession, Locale, SessionEvent};

/// hours-ocr - read opening hours from OCR output
#[derive(Parser, Debug)]
#[command(name = "hours-ocr")]
#[command(about = "Turns OCR dumps of opening-hours signs into schedule strings")]
struct Args {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sign language, overrides the config file (en, de)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recognize still images, one OCR dump (JSON) per file
    Recognize {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Replay a recorded frame stream (JSON lines) through a live session
    Replay {
        file: PathBuf,

        /// Wait for the worker instead of dropping frames while it is busy
        #[arg(long)]
        lossless: bool,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };

    if let Command::InitConfig { force } = args.command {
        return init_config(&config_path, force);
    }

    let mut config = load_or_default_config(&config_path, args.config.is_some())?;
    if let Some(locale) = args.locale {
        config.general.locale = locale;
    }

    match args.command {
        Command::Recognize { files } => recognize(&config, &files),
        Command::Replay { file, lossless } => replay(&config, &file, lossless),
        Command::InitConfig { .. } => Ok(()),
    }
}

/// Load configuration from file or fall back to defaults
///
/// A config path given explicitly must exist.
fn load_or_default_config(path: &Path, explicit: bool) -> Result<AppConfig> {
    if path.exists() || explicit {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }
    info!("Using default configuration");
    Ok(AppConfig::default())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    config::save_config(&AppConfig::default(), path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// One forced run per still image
fn recognize(config: &AppConfig, files: &[PathBuf]) -> Result<()> {
    let capture = config.capture_config();
    let pipeline = HoursPipeline::new(config.pipeline_config());
    let mut recognizer = HoursRecognizer::new(config.recognition.finish_threshold);

    for path in files {
        let frame = match capture::load_frame(path, capture.orientation) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping {:?}: {:#}", path, anyhow::Error::from(e));
                continue;
            }
        };
        let text = recognizer.recognize_still(&pipeline, &frame);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        println!("\"{}\" => \"{}\",", name, text);
    }

    Ok(())
}

/// Feed a recorded stream through a live session, printing updates as they land
fn replay(config: &AppConfig, path: &Path, lossless: bool) -> Result<()> {
    let CaptureConfig {
        orientation,
        frame_interval_ms,
    } = config.capture_config();
    let frames = capture::load_frames(path, orientation)
        .with_context(|| format!("Failed to load frames from {:?}", path))?;
    info!("Replaying {} frames from {:?}", frames.len(), path);

    let session = LiveSession::new(config)?;
    let events = session.events();
    let interval = Duration::from_millis(frame_interval_ms);
    let mut finished = false;

    for frame in frames {
        if lossless {
            session.submit_frame_blocking(frame)?;
        } else {
            session.submit_frame(frame)?;
        }
        std::thread::sleep(interval);

        // published state is consumed here on the main thread
        finished = drain_events(&events);
        if finished {
            break;
        }
    }

    let runtime = session.shutdown();
    if !finished {
        finished = drain_events(&events);
    }

    info!(
        "Replay done: {} submitted, {} processed, {} dropped, {} stale",
        runtime.frames_submitted, runtime.frames_processed, runtime.frames_dropped, runtime.frames_stale
    );
    if !finished {
        warn!("Stream ended before the result stabilized");
    }
    Ok(())
}

/// Print pending updates; true once a finished state was seen
fn drain_events(events: &crossbeam_channel::Receiver<SessionEvent>) -> bool {
    let mut finished = false;
    for event in events.try_iter() {
        match event {
            SessionEvent::Updated(state) => {
                let marker = if state.finished { " (final)" } else { "" };
                println!("{}{}", state.text, marker);
                finished |= state.finished;
            }
            SessionEvent::Restarted { generation } => {
                info!("Session restarted (generation {})", generation);
            }
        }
    }
    finished
}

//! Live dictation CLI

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use voxlog::{
    list_input_devices, Config, FrameSource, Pipeline, WavFileSource, WhisperEngine,
};

/// Live microphone dictation to a text log
#[derive(Parser)]
#[command(name = "voxlog")]
#[command(about = "Live microphone dictation to a text log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start live dictation
    Run {
        /// Audio input device name (uses default if not specified)
        #[arg(short, long)]
        device: Option<String>,

        /// Path to Whisper model file
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Language code (e.g., en, de, fr)
        #[arg(short, long)]
        language: Option<String>,

        /// Chunk duration in seconds
        #[arg(long)]
        chunk_seconds: Option<f32>,

        /// Silence gate threshold (mean absolute amplitude)
        #[arg(long)]
        threshold: Option<f32>,

        /// Directory for the session log file
        #[arg(short, long)]
        log_dir: Option<PathBuf>,

        /// End the session when no audio arrives within the queue timeout
        #[arg(long)]
        stop_on_timeout: bool,

        /// Do not echo accepted text to the console
        #[arg(long)]
        quiet: bool,
    },

    /// List available audio input devices
    Devices,

    /// Transcribe a WAV file through the same pipeline
    Transcribe {
        /// Input WAV file path
        input: PathBuf,

        /// Path to Whisper model file
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Language code (e.g., en, de, fr)
        #[arg(short, long)]
        language: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Quiet by default, use -v for more
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Run {
            device,
            model,
            language,
            chunk_seconds,
            threshold,
            log_dir,
            stop_on_timeout,
            quiet,
        } => {
            if let Some(device) = device {
                config.audio.device = Some(device);
            }
            if let Some(model) = model {
                config.stt.model_path = model;
            }
            if let Some(language) = language {
                config.stt.language = language;
            }
            if let Some(chunk_seconds) = chunk_seconds {
                config.chunking.chunk_seconds = chunk_seconds;
            }
            if let Some(threshold) = threshold {
                config.chunking.volume_threshold = threshold;
            }
            if let Some(log_dir) = log_dir {
                config.session.log_dir = Some(log_dir);
            }
            if stop_on_timeout {
                config.session.on_queue_timeout = voxlog::TimeoutPolicy::Stop;
            }
            if quiet {
                config.session.echo_transcript = false;
            }
            config.validate()?;

            run_live(config)
        }
        Commands::Devices => list_devices(),
        Commands::Transcribe {
            input,
            model,
            language,
        } => {
            if let Some(model) = model {
                config.stt.model_path = model;
            }
            if let Some(language) = language {
                config.stt.language = language;
            }
            transcribe_file(config, input)
        }
    }
}

/// Run live dictation until Ctrl+C
fn run_live(config: Config) -> Result<()> {
    info!("Loading STT model from: {}", config.stt.model_path.display());
    let engine =
        WhisperEngine::new(config.stt.clone()).context("Failed to initialize STT engine")?;
    info!("STT engine initialized (language: {})", engine.language());

    let audio_config = config.audio.clone();
    let pipeline = Pipeline::new(config, &engine);

    let running = pipeline.cancel_handle();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    println!("Listening... Press Ctrl+C to stop");

    let summary = pipeline.run(move |running| FrameSource::open(&audio_config, running))?;

    if let Some(ref path) = summary.log_path {
        println!("Transcript saved to {}", path.display());
    }
    Ok(())
}

/// List available audio input devices
fn list_devices() -> Result<()> {
    let devices = list_input_devices()?;

    if devices.is_empty() {
        println!("No audio input devices found");
    } else {
        println!("Available audio input devices:");
        for (i, name) in devices.iter().enumerate() {
            println!("  {}. {}", i + 1, name);
        }
    }

    Ok(())
}

/// Run the pipeline over a WAV file instead of the microphone
fn transcribe_file(mut config: Config, input: PathBuf) -> Result<()> {
    let source = WavFileSource::open(&input, config.audio.frame_size as usize)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    info!(
        "Transcribing {} ({:.2}s at {} Hz)",
        input.display(),
        source.duration_secs(),
        source.sample_rate()
    );

    // Chunk sizing follows the file's own rate
    config.audio.sample_rate = source.sample_rate();
    config.validate()?;

    let engine =
        WhisperEngine::new(config.stt.clone()).context("Failed to initialize STT engine")?;

    let pipeline = Pipeline::new(config, &engine);
    let running = pipeline.cancel_handle();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let summary = pipeline.run(move |_| Ok(source))?;

    if let Some(ref path) = summary.log_path {
        println!("Transcript saved to {}", path.display());
    }
    Ok(())
}

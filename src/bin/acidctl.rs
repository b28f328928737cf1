//! acidctl
//!
//! Command-line front end for the staging primitives and the rotating log.

use std::io::{self, Write};
use std::path::PathBuf;

use acidlog::{
    AcidError, AtomicFileReader, AtomicFileWriter, DirectoryView, Level, LogConfig,
    RotatingLogSink,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

/// acidctl
#[derive(Parser, Debug)]
#[command(name = "acidctl")]
#[command(about = "Atomic file staging and rotating logs")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy stdin to a file, publishing it only when complete
    Write {
        /// Target file
        path: PathBuf,
    },

    /// Acquire a file, print it, then release it
    Read {
        /// File to read
        path: PathBuf,
    },

    /// List the stable entries of a directory
    List {
        /// Directory to list
        dir: PathBuf,

        /// Glob pattern for file names
        #[arg(short, long, default_value = "*")]
        pattern: String,
    },

    /// Remove orphaned staging files (only when nothing is active)
    Cleanup {
        /// Directory to clean
        dir: PathBuf,
    },

    /// Append a message to a rotating log
    Log {
        /// Message text
        message: String,

        /// TOML config file; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Live log file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Rotation threshold in bytes (0 = never)
        #[arg(long)]
        max_size: Option<u64>,

        /// Rotated versions to keep
        #[arg(long)]
        versions: Option<u32>,

        /// Program tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Message level
        #[arg(short, long, value_enum, default_value = "info")]
        level: LevelArg,

        /// Emit debug messages
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LevelArg {
    Debug,
    Info,
    Warn,
    Fatal,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Debug => Level::Debug,
            LevelArg::Info => Level::Info,
            LevelArg::Warn => Level::Warn,
            LevelArg::Fatal => Level::Fatal,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,acidlog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args.command) {
        Ok(()) => {}
        Err(AcidError::NotFound { path }) => {
            eprintln!("{}: absent or busy", path.display());
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(command: Commands) -> acidlog::Result<()> {
    match command {
        Commands::Write { path } => {
            let mut writer = AtomicFileWriter::open(&path)?;
            io::copy(&mut io::stdin().lock(), &mut writer)?;
            let published = writer.close()?;
            tracing::info!("Published {}", published.display());
        }
        Commands::Read { path } => {
            let mut reader = AtomicFileReader::open(&path)?;
            let buf = reader.read_all()?;
            io::stdout().write_all(&buf)?;
            reader.close()?;
        }
        Commands::List { dir, pattern } => {
            for entry in DirectoryView::new(dir).list(&pattern)? {
                println!("{}", entry.display());
            }
        }
        Commands::Cleanup { dir } => {
            let removed = DirectoryView::new(dir).cleanup()?;
            tracing::info!("Removed {} staging file(s)", removed);
        }
        Commands::Log {
            message,
            config,
            file,
            max_size,
            versions,
            tag,
            level,
            verbose,
        } => {
            let mut log_config = match config {
                Some(path) => LogConfig::from_toml_file(&path)?,
                None => LogConfig::default(),
            };
            if let Some(file) = file {
                log_config.base_path = file;
            }
            if let Some(max_size) = max_size {
                log_config.max_size_bytes = max_size;
            }
            if let Some(versions) = versions {
                log_config.version_count = versions;
            }
            if tag.is_some() {
                log_config.program_tag = tag;
            }
            log_config.verbose |= verbose;

            let sink = RotatingLogSink::open(log_config)?;
            match Level::from(level) {
                Level::Fatal => sink.fatal(&message),
                level => sink.emit(level, &message)?,
            }
            sink.flush()?;
        }
    }
    Ok(())
}

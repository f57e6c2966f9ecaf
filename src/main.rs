use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spellbee_audio::config::JobConfig;
use spellbee_audio::credentials::{api_key_from_env, confirm, mask_key, resolve_api_key};
use spellbee_audio::job::{parse_reference_arg, run_check, run_generate, run_verify, select_levels};
use spellbee_audio::retry::{Interrupt, ThreadSleeper};
use spellbee_audio::tts::OpenAiSpeech;
use spellbee_audio::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "spellbee-audio", version)]
#[command(about = "Generate pronunciation audio for spelling bee word lists", long_about = None)]
struct Cli {
    /// JSON job configuration; defaults to the standard three-level layout.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Regenerate and overwrite existing files.
    #[arg(short, long, global = true)]
    force: bool,
    /// Skip the confirmation that --force asks for.
    #[arg(long, global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate missing audio for every level (the default).
    Generate {
        /// Only process these levels.
        #[arg(long = "level")]
        levels: Vec<String>,
    },
    /// Report reference words missing from the level source files.
    Verify {
        /// LEVEL=PATH of a hand-transcribed reference list.
        #[arg(long = "level", required = true)]
        references: Vec<String>,
    },
    /// Generate one test file to check credentials and connectivity.
    Check,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version go to stdout and are not failures.
            let failed = err.use_stderr();
            let _ = err.print();
            return if failed { ExitCode::from(1) } else { ExitCode::SUCCESS };
        }
    };
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Error>() {
                Some(Error::Interrupted) => eprintln!("\n\nInterrupted by user"),
                Some(Error::Aborted) => eprintln!("Aborted"),
                Some(Error::MissingApiKey) => eprintln!("Error: API key is required"),
                _ => eprintln!("\nError: {err:#}"),
            }
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("spellbee_audio=debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<JobConfig> {
    match path {
        Some(path) => Ok(JobConfig::load(path)?),
        None => Ok(JobConfig::default()),
    }
}

/// Ctrl-C handling. Before the job starts nothing has been written, so an
/// interrupt exits at once. Once [`JobSignals::start_job`] is called, the first
/// Ctrl-C asks the job to stop at the next safe point and a second one exits.
struct JobSignals {
    interrupt: Interrupt,
    job_running: Arc<AtomicBool>,
}

impl JobSignals {
    fn install() -> Result<Self> {
        let interrupt = Interrupt::new();
        let job_running = Arc::new(AtomicBool::new(false));
        let flag = interrupt.clone();
        let running = Arc::clone(&job_running);
        ctrlc::set_handler(move || {
            if !running.load(Ordering::SeqCst) || flag.is_triggered() {
                eprintln!("\n\nInterrupted by user");
                std::process::exit(1);
            }
            flag.trigger();
        })
        .context("installing Ctrl-C handler")?;
        Ok(Self { interrupt, job_running })
    }

    fn start_job(&self) -> Result<()> {
        self.interrupt.check()?;
        self.job_running.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn run(cli: Cli) -> Result<()> {
    let signals = JobSignals::install()?;
    let config = load_config(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Generate { levels: Vec::new() });

    match command {
        Commands::Generate { levels } => generate(&config, &signals, cli.force, cli.yes, &levels),
        Commands::Verify { references } => {
            let references = references
                .iter()
                .map(|arg| parse_reference_arg(arg))
                .collect::<Result<Vec<_>, _>>()?;
            let report = run_verify(&config, &references)?;
            println!("{report}");
            if report.is_complete() {
                info!("Every reference word is present");
            }
            Ok(())
        }
        Commands::Check => check(&config),
    }
}

fn generate(
    config: &JobConfig,
    signals: &JobSignals,
    force: bool,
    yes: bool,
    only: &[String],
) -> Result<()> {
    let stdin = io::stdin();
    let api_key = resolve_api_key(api_key_from_env(), &mut stdin.lock(), &mut io::stdout())?;

    if force {
        println!("Force regeneration enabled - will overwrite existing files");
        if !yes && !confirm("Continue?", &mut stdin.lock(), &mut io::stdout())? {
            return Err(Error::Aborted.into());
        }
    }

    let levels = select_levels(config, only)?;
    let sleeper = ThreadSleeper::new(signals.interrupt.clone());
    let synth = OpenAiSpeech::new(api_key, config.tts.clone())?;

    signals.start_job()?;
    let run = run_generate(config, &levels, &synth, &sleeper, &signals.interrupt, force)?;
    println!("\n{run}");
    Ok(())
}

fn check(config: &JobConfig) -> Result<()> {
    let api_key = api_key_from_env()
        .filter(|k| !k.trim().is_empty())
        .ok_or(Error::MissingApiKey)?;
    println!("API key found (starts with: {})", mask_key(&api_key));
    println!("   Key length: {} characters", api_key.chars().count());
    println!("Testing connection to {}...", config.tts.base_url);

    let synth = OpenAiSpeech::new(api_key, config.tts.clone())?;
    match run_check(config, &synth) {
        Ok(path) => {
            info!("Success! Test audio file created at {}", path.display());
            println!("Connection is working properly.");
            Ok(())
        }
        Err(err) => {
            println!("\nPossible issues:");
            println!("1. VPN or proxy blocking the API host");
            println!("2. Firewall blocking HTTPS connections");
            println!("3. Corporate network restrictions");
            println!("4. TLS certificate issues");
            println!("5. Try a simple curl test:");
            println!(
                "   curl {}/models -H \"Authorization: Bearer ${}\"",
                config.tts.base_url,
                spellbee_audio::credentials::API_KEY_VAR
            );
            Err(err.into())
        }
    }
}

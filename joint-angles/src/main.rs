//! Joint Angles - Pose Landmark Angle Engine
//!
//! Turns per-frame pose landmarks into joint angle time series and session reports.

use joint_angles::app::cli::{Cli, Commands, ConfigAction};
use joint_angles::app::config::Config;
use joint_angles::export::angle_log;
use joint_angles::export::AngleLog;
use joint_angles::pose::{JsonLinesSource, PoseSource};
use joint_angles::workflow::{
    AnalysisSession, CompletedRecording, RunStats, SessionReport, SessionReportBuilder,
};
use joint_angles::JointName;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RECORDING_FILE: &str = "recording.json";
const REPORT_FILE: &str = "report.json";
const ANGLE_LOG_FILE: &str = "angles.log";
const CSV_FILE: &str = "series.csv";
const MARKDOWN_FILE: &str = "report.md";

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load config
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    // Execute command
    match cli.command {
        Commands::Process {
            input,
            output,
            name,
            no_record,
        } => {
            run_process(&input, output, name, no_record, &config)?;
        }
        Commands::Report { input, output } => {
            run_report(&input, output, &config)?;
        }
        Commands::List { detailed } => {
            run_list(detailed)?;
        }
        Commands::Init { force } => {
            run_init(force, &config_path, &config)?;
        }
        Commands::Delete { name, force } => {
            run_delete(&name, force)?;
        }
        Commands::Config { action } => {
            run_config(action, &config_path, &config)?;
        }
    }

    Ok(())
}

fn run_process(
    input: &Path,
    output: Option<PathBuf>,
    name: Option<String>,
    no_record: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let name = name.unwrap_or_else(|| {
        chrono::Local::now()
            .format("session_%Y%m%d_%H%M%S")
            .to_string()
    });
    let session_dir = match output {
        Some(dir) => dir,
        None => Cli::session_dir(&name)
            .ok_or_else(|| anyhow::anyhow!("Invalid session name '{}'", name))?,
    };

    info!("Processing {} as session '{}'", input.display(), name);

    let mut session = AnalysisSession::new(config.session_config());
    let mut source = JsonLinesSource::open(input)?;

    if no_record {
        let stats = session.run(&mut source)?;
        print_stats(&stats);
        print_live_angles(&session);
        return Ok(());
    }

    std::fs::create_dir_all(&session_dir)?;
    if config.recording.write_angle_log {
        // Each recording starts a fresh log
        session.attach_log(AngleLog::create(session_dir.join(ANGLE_LOG_FILE))?);
    }

    // Arm on the first frame so elapsed time starts at zero
    let mut stats = RunStats::default();
    while let Some(sample) = source.next_sample()? {
        if !session.is_recording() {
            session.start_named_recording(name.as_str(), sample.timestamp);
        }
        let outcome = session.process(&sample)?;
        stats.frames += 1;
        stats.detected += usize::from(outcome.detected);
        stats.recorded += usize::from(outcome.recorded);
    }
    print_stats(&stats);

    let recording = session.finish_recording();
    if recording.is_empty() {
        warn!("No frames were recorded; writing an empty report");
    }
    recording.save(&session_dir.join(RECORDING_FILE))?;

    let report = SessionReportBuilder::new().build(&recording);
    write_report(&report, &session_dir, config)?;

    println!("\nSession saved to {}", session_dir.display());
    Ok(())
}

fn run_report(input: &Path, output: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let recording = if input.extension().map(|e| e == "log").unwrap_or(false) {
        info!("Rebuilding recording from angle log {}", input.display());
        angle_log::load_recording(input)?
    } else {
        CompletedRecording::load(input)?
    };

    let output_dir = output.unwrap_or_else(|| {
        input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    std::fs::create_dir_all(&output_dir)?;

    let report = SessionReportBuilder::new().build(&recording);
    write_report(&report, &output_dir, config)?;
    Ok(())
}

/// Write the report JSON plus the configured exports, then print the summary
fn write_report(report: &SessionReport, dir: &Path, config: &Config) -> anyhow::Result<()> {
    report.save_json(&dir.join(REPORT_FILE))?;
    println!("Report: {}", dir.join(REPORT_FILE).display());

    if config.export.write_csv {
        report.write_csv(&dir.join(CSV_FILE))?;
        println!("Series CSV: {}", dir.join(CSV_FILE).display());
    }

    let markdown = report.to_markdown();
    if config.export.write_markdown {
        std::fs::write(dir.join(MARKDOWN_FILE), &markdown)?;
        println!("Summary: {}", dir.join(MARKDOWN_FILE).display());
    }

    println!("\n{}", markdown);
    Ok(())
}

fn print_stats(stats: &RunStats) {
    println!(
        "Processed {} frames ({} with a pose, {} recorded)",
        stats.frames, stats.detected, stats.recorded
    );
}

fn print_live_angles(session: &AnalysisSession) {
    println!("\nLatest angles in the live window:");
    for joint in JointName::ALL {
        match session.window().latest(joint) {
            Some((_, degrees)) => println!(
                "  {:8} {:>4} deg  ({} samples)",
                joint.as_str(),
                degrees.trunc() as i64,
                session.window().len(joint)
            ),
            None => println!("  {:8} -", joint.as_str()),
        }
    }
}

fn run_list(detailed: bool) -> anyhow::Result<()> {
    let sessions_dir = Cli::sessions_dir();

    if !sessions_dir.exists() {
        println!("No sessions found in {}", sessions_dir.display());
        println!("Process a landmark file with: joint-angles process --input <frames.jsonl>");
        return Ok(());
    }

    println!("Sessions in {:?}:", sessions_dir);

    let mut entries: Vec<_> = std::fs::read_dir(&sessions_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().join(RECORDING_FILE).exists())
        .collect();

    entries.sort_by_key(|e| e.path());

    for entry in &entries {
        let path = entry.path();
        let dir_name = path.file_name().unwrap_or_default().to_string_lossy();

        if detailed {
            match CompletedRecording::load(&path.join(RECORDING_FILE)) {
                Ok(recording) => {
                    let m = recording.metadata();
                    let duration_secs = m.duration_ms as f64 / 1000.0;
                    println!(
                        "  {}  ({} samples, {:.1}s, started {})",
                        dir_name,
                        m.sample_count,
                        duration_secs,
                        m.started_at.format("%Y-%m-%d %H:%M")
                    );
                }
                Err(_) => {
                    println!("  {}  (failed to parse {})", dir_name, RECORDING_FILE);
                }
            }
        } else {
            println!("  {}", dir_name);
        }
    }

    if entries.is_empty() {
        println!("  (none)");
    }

    Ok(())
}

fn run_init(force: bool, config_path: &PathBuf, config: &Config) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save(config_path)?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    std::fs::create_dir_all(Cli::sessions_dir())?;
    println!("\nCreated directories:");
    println!("  Sessions: {:?}", Cli::sessions_dir());

    Ok(())
}

fn run_delete(name: &str, force: bool) -> anyhow::Result<()> {
    let sessions_dir = Cli::sessions_dir();
    let Some(target) = Cli::session_dir(name) else {
        anyhow::bail!("Invalid session name '{}'", name);
    };

    if !target.join(RECORDING_FILE).exists() {
        anyhow::bail!("Session '{}' not found in {:?}", name, sessions_dir);
    }

    if !force {
        println!("Will delete: {}", target.display());
        println!("Use --force to skip this prompt, or re-run with -f");
        return Ok(());
    }

    std::fs::remove_dir_all(&target)?;
    info!("Deleted session: {}", target.display());
    println!("Deleted: {}", target.display());

    Ok(())
}

fn run_config(action: ConfigAction, config_path: &PathBuf, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Configuration ({:?}):\n", config_path);
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Get { key } => {
            let value = config.get(&key)?;
            println!("{} = {}", key, value);
        }
        ConfigAction::Set { key, value } => {
            if !config_path.exists() {
                anyhow::bail!("No config file found. Run 'joint-angles init' first.");
            }

            let updated = config.with_value(&key, &value)?;
            updated.save(config_path)?;
            println!("Set {} = {}", key, updated.get(&key)?);
        }
        ConfigAction::Reset { force } => {
            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save(config_path)?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}

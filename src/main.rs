use clap::Parser;
use media_batch_dl::{
    BatchDownloader, Config, DownloadOutcome, ToolsConfig, cancel_on_shutdown_signal, task_source,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Download every URL listed in a batch configuration file
#[derive(Parser, Debug)]
#[command(name = "media-batch-dl", version, about, long_about = None)]
struct Cli {
    /// Batch file with `defaults` and `urls` (JSON, or TOML for `.toml` files)
    #[arg(short, long, value_name = "FILE", default_value = "configuration.json")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    config: PathBuf,

    /// Maximum number of downloads running at once
    #[arg(short = 'w', long, value_name = "N", default_value_t = 10)]
    max_workers: usize,

    /// File that receives one line per successfully downloaded URL
    #[arg(long, value_name = "FILE", default_value = "downloads.txt")]
    progress_log: PathBuf,

    /// Path to the yt-dlp executable (searched in PATH if omitted)
    #[arg(long, value_name = "PATH")]
    ytdlp: Option<PathBuf>,

    /// Path to ffmpeg, forwarded to yt-dlp
    #[arg(long, value_name = "PATH")]
    ffmpeg: Option<PathBuf>,

    /// Print each result as a JSON line
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn runtime_config(&self) -> Config {
        Config {
            max_concurrent_downloads: self.max_workers,
            progress_log: self.progress_log.clone(),
            tools: ToolsConfig {
                ytdlp_path: self.ytdlp.clone(),
                ffmpeg_path: self.ffmpeg.clone(),
                ..ToolsConfig::default()
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_outcome(outcome: &DownloadOutcome, json: bool) {
    if json {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(url = %outcome.url(), error = %e, "Could not serialize result"),
        }
        return;
    }

    println!("{outcome}");
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.runtime_config();
    let tasks = task_source::load_tasks(&cli.config);

    let downloader =
        BatchDownloader::from_config(&config).with_cancellation(cancel_on_shutdown_signal());
    let outcomes = downloader
        .run(tasks, config.max_concurrent_downloads)
        .await;

    for outcome in &outcomes {
        print_outcome(outcome, cli.json);
    }
    if cli.json {
        eprintln!("Downloads completed.");
    } else {
        println!("Downloads completed.");
    }

    if outcomes.iter().all(DownloadOutcome::is_success) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

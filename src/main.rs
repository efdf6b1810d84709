use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use yt_scrape::config::{DEFAULT_OUTPUT, DEFAULT_QUALITY, DEFAULT_WORKERS};
use yt_scrape::{logging, source, DownloadOptions, WorkerPool, YtDlp};

/// Download multiple videos concurrently from a text file
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Text file containing video URLs (one per line)
    url_file: PathBuf,

    /// Output directory for downloaded files
    #[clap(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Video quality preference: best, worst, 720p, 480p, 360p, ...
    #[clap(short, long, default_value = DEFAULT_QUALITY)]
    quality: String,

    /// Download only audio (MP3 format)
    #[clap(short, long)]
    audio_only: bool,

    /// Number of concurrent workers (1-20)
    #[clap(short, long, default_value_t = DEFAULT_WORKERS as i64, allow_hyphen_values = true)]
    workers: i64,

    /// List URLs from file without downloading
    #[clap(long)]
    list_urls: bool,

    /// Path to the yt-dlp executable
    #[clap(long = "yt-dlp", env = "YT_DLP")]
    yt_dlp: Option<PathBuf>,

    /// More log output, repeat for trace
    #[clap(short, long, parse(from_occurrences))]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Args = Args::parse();
    logging::init(args.verbose);

    let list = match source::read_url_file(&args.url_file).await {
        Ok(list) => list,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if list.urls.is_empty() {
        println!("No valid video URLs found in the file.");
        return ExitCode::FAILURE;
    }
    println!("Found {} valid video URLs", list.urls.len());

    if args.list_urls {
        println!();
        println!("URLs to be downloaded:");
        for (i, url) in list.urls.iter().enumerate() {
            println!("{:2}. {}", i + 1, url);
        }
        return ExitCode::SUCCESS;
    }

    let ytdlp = match YtDlp::locate(args.yt_dlp) {
        Ok(ytdlp) => ytdlp,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let options = DownloadOptions {
        output: args.output,
        quality: args.quality,
        audio_only: args.audio_only,
    };
    let pool = WorkerPool::new(Arc::new(ytdlp), args.workers);
    let requests = list.into_requests(&options);

    println!(
        "Starting concurrent download of {} videos with {} workers...",
        requests.len(),
        pool.workers()
    );
    println!("Output directory: {}", options.output.display());
    println!("{}", "-".repeat(60));

    match pool.run(requests).await {
        Ok(results) => {
            println!();
            print!("{}", results.summary(&options.output));
            if results.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pagewright::core::config::{self, CliOverrides};
use pagewright::dom::MemoryDocument;
use pagewright::fetch::HttpFetcher;
use pagewright::Runtime;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "pagewright", about = "Client-side page composition, run headless")]
struct Args {
    /// Config file (default: ./pagewright.toml, then ~/.pagewright/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Origin the site is served from
    #[arg(long)]
    origin: Option<String>,

    /// Base URL prefix for every fetch
    #[arg(long)]
    base_url: Option<String>,

    /// Directory under the base URL holding routes, shell and pages
    #[arg(long)]
    base_path: Option<String>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Paths to visit: start at the first, then navigate through the rest
    paths: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let config_path = config::find_config(args.config.as_deref());
    let file_config = config::load_config(config_path.as_deref())?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            origin: args.origin,
            base_url: args.base_url,
            base_path: args.base_path,
            debug: args.debug,
        },
    );

    // Initialize file logger - writes to pagewright.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if resolved.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Ok(log_file) = File::create("pagewright.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let fetcher = Arc::new(HttpFetcher::new(resolved.origin.clone()));
    log::info!("Pagewright starting up against {}", fetcher.origin());

    let mut paths = args.paths.into_iter();
    let start = paths.next().unwrap_or_else(|| "/".to_string());

    let mut runtime = Runtime::new(MemoryDocument::at(&start), fetcher, resolved);
    runtime.start().await;
    for path in paths {
        runtime.navigate_to(&path);
        runtime.settle().await;
    }

    let document = runtime.document();
    println!("{}", document.title());
    println!("{}", document.container_html().unwrap_or_default());
    Ok(())
}

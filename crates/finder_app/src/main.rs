//! Job finder: terminal search view over a job-search gateway.

mod platform;

use std::path::PathBuf;

use clap::Parser;

/// Search job postings from the terminal
#[derive(Parser, Debug)]
#[command(name = "job_finder")]
#[command(version)]
#[command(about = "Search a job-posting API and browse the results as cards")]
pub struct Args {
    /// Path to a RON configuration file
    #[arg(long, env = "JOB_FINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// API key for the search gateway
    #[arg(long, env = "JOB_FINDER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gateway host identifier sent with every request
    #[arg(long, env = "JOB_FINDER_API_HOST")]
    pub api_host: Option<String>,

    /// Search endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Search term for the automatic first search
    #[arg(short, long)]
    pub query: Option<String>,

    /// Apply every response as it arrives instead of only the newest request's
    #[arg(long)]
    pub last_settled: bool,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = platform::config::resolve(&args)?;
    platform::run_app(settings)
}

mod logging;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use logging::LogLevel;
use oralarg_acquire::{archive, http, output};
use oralarg_model::{RunManifest, Year};
use oralarg_transcode::YtDlp;
use pipeline::{HttpResolver, RunOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oralarg")]
#[command(about = "Download Arizona Supreme Court oral-argument audio for a year")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Target year to download cases for (2006 through the current year)
    #[arg(long)]
    year: Year,

    /// Base directory to save audio files; files land in <output-dir>/<year>/ (default: ~/Downloads)
    #[arg(short = 'O', long)]
    output_dir: Option<PathBuf>,

    /// Load this listing frame directly instead of discovering it from the archive page
    #[arg(long)]
    listing_url: Option<String>,

    /// Media downloader executable
    #[arg(long = "yt-dlp", default_value = oralarg_transcode::DEFAULT_PROGRAM)]
    yt_dlp: String,

    /// List cases and resolve their streams without downloading
    #[arg(long)]
    dry_run: bool,

    /// Skip cases whose MP3 already exists in the output directory
    #[arg(long)]
    skip_existing: bool,

    /// Save the selected year's listing HTML as listing.html
    #[arg(long)]
    cache_html: bool,

    /// Run log path (default: <output-dir>/<year>/oralarg-<timestamp>.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let base_dir = cli.output_dir.clone().unwrap_or_else(default_output_dir);
    let year_dir = output::prepare_year_dir(&base_dir, cli.year)?;

    let log_path = cli.log_file.clone().unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        year_dir.join(format!("oralarg-{stamp}.log"))
    });
    match logging::init(cli.log_level, cli.utc, Some(&log_path)) {
        None => tracing::info!(path = %log_path.display(), "Run log opened"),
        Some(e) => tracing::warn!(path = %log_path.display(), "Could not open run log, logging to console only: {e}"),
    }

    tracing::info!(year = %cli.year, dir = %year_dir.display(), "Processing year");

    let extractor = YtDlp::new(cli.yt_dlp.clone());
    if !cli.dry_run {
        let version = extractor
            .version()
            .await
            .with_context(|| format!("{} is required to extract audio", extractor.program()))?;
        tracing::info!(tool = extractor.program(), version = %version, "Found media downloader");
    }

    let client = http::build_client()?;
    let listing = archive::fetch_year_listing(&client, cli.year, cli.listing_url.as_deref())
        .await
        .with_context(|| format!("Failed to load the case listing for {}", cli.year))?;
    tracing::info!("Found {} cases.", listing.cases.len());

    if cli.cache_html {
        output::cache_html(&year_dir, output::LISTING_CACHE_FILE, &listing.panel_html)?;
    }

    let mut manifest = RunManifest::new(
        cli.year,
        &year_dir.display().to_string(),
        &listing.listing_url,
        cli.dry_run,
    );
    let opts = RunOptions {
        dry_run: cli.dry_run,
        skip_existing: cli.skip_existing,
    };
    let resolver = HttpResolver::new(client);
    manifest.cases = pipeline::run(&listing.cases, &year_dir, opts, &resolver, &extractor).await;
    manifest.finish();
    output::write_manifest(&year_dir, &manifest)?;

    let summary = manifest.summary();
    tracing::info!(
        total = summary.total,
        downloaded = summary.downloaded,
        present = summary.present,
        listed = summary.listed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Run complete"
    );

    Ok(())
}

/// The user's Downloads folder, else `~/Downloads`, else the working directory.
fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| {
            dirs.download_dir()
                .map(PathBuf::from)
                .or_else(|| Some(dirs.home_dir().join("Downloads")))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal_args() {
        let cli = Cli::try_parse_from(["oralarg", "--year", "2019"]).unwrap();
        assert_eq!(cli.year.value(), 2019);
        assert!(cli.output_dir.is_none());
        assert_eq!(cli.yt_dlp, "yt-dlp");
        assert!(!cli.dry_run);
        assert!(!cli.skip_existing);
    }

    #[test]
    fn test_parse_all_args() {
        let cli = Cli::try_parse_from([
            "oralarg",
            "--year",
            "2012",
            "--output-dir",
            "/srv/audio",
            "--yt-dlp",
            "/opt/bin/yt-dlp",
            "--dry-run",
            "--skip-existing",
            "--cache-html",
            "--log-level",
            "debug",
            "--utc",
        ])
        .unwrap();
        assert_eq!(cli.output_dir, Some(PathBuf::from("/srv/audio")));
        assert_eq!(cli.yt_dlp, "/opt/bin/yt-dlp");
        assert!(cli.dry_run && cli.skip_existing && cli.cache_html && cli.utc);
    }

    #[test]
    fn test_year_is_required_and_validated() {
        assert!(Cli::try_parse_from(["oralarg"]).is_err());
        assert!(Cli::try_parse_from(["oralarg", "--year", "1999"]).is_err());
        assert!(Cli::try_parse_from(["oralarg", "--year", "next"]).is_err());
    }

    #[test]
    fn test_default_output_dir_is_absolute_or_cwd() {
        let dir = default_output_dir();
        assert!(dir.is_absolute() || dir == PathBuf::from("."));
    }
}

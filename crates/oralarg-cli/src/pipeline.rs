use anyhow::Result;
use oralarg_model::{CaseEntry, CaseOutcome, CaseRecord, FileNamer};
use oralarg_transcode::{expected_output, YtDlp};
use std::path::{Path, PathBuf};

/// Turns a media player page into a playable stream address.
pub trait StreamResolver {
    /// `Ok(None)`: the page has no stream.
    async fn resolve(&self, player_url: &str) -> Result<Option<String>>;
}

/// Fetches a stream and writes `<dir>/<stem>.mp3`.
pub trait AudioExtractor {
    async fn extract(&self, stream_url: &str, dir: &Path, stem: &str) -> Result<PathBuf>;
}

/// Resolves streams by scraping the media player page over HTTP.
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl StreamResolver for HttpResolver {
    async fn resolve(&self, player_url: &str) -> Result<Option<String>> {
        oralarg_acquire::stream::resolve_stream(&self.client, player_url).await
    }
}

impl AudioExtractor for YtDlp {
    async fn extract(&self, stream_url: &str, dir: &Path, stem: &str) -> Result<PathBuf> {
        Ok(self.extract_audio(stream_url, dir, stem).await?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Resolve streams but download nothing.
    pub dry_run: bool,
    /// Leave cases whose MP3 already exists alone.
    pub skip_existing: bool,
}

/// Process every case in listing order, one at a time.
///
/// Per-case problems become a `Skipped` or `Failed` record and the loop
/// moves on; nothing here aborts the run.
pub async fn run<R, E>(
    cases: &[CaseEntry],
    dir: &Path,
    opts: RunOptions,
    resolver: &R,
    extractor: &E,
) -> Vec<CaseRecord>
where
    R: StreamResolver,
    E: AudioExtractor,
{
    let mut namer = FileNamer::new();
    let mut records = Vec::with_capacity(cases.len());

    for case in cases {
        let stem = namer.stem_for(&case.name, case.index);
        tracing::info!(index = case.index, total = cases.len(), case = %stem, "Processing case");

        let mut record = CaseRecord {
            index: case.index,
            name: case.name.clone(),
            file_stem: stem,
            player_url: case.player_url.clone(),
            stream_url: None,
            outcome: CaseOutcome::Listed,
        };
        let outcome = process_case(&mut record, dir, opts, resolver, extractor).await;
        record.outcome = outcome;
        records.push(record);
    }

    records
}

async fn process_case<R, E>(
    record: &mut CaseRecord,
    dir: &Path,
    opts: RunOptions,
    resolver: &R,
    extractor: &E,
) -> CaseOutcome
where
    R: StreamResolver,
    E: AudioExtractor,
{
    let stem = record.file_stem.as_str();

    let Some(player_url) = record.player_url.as_deref() else {
        tracing::warn!(case = %stem, "No video link in listing, skipping");
        return CaseOutcome::skipped("no video link in listing");
    };

    let target = expected_output(dir, stem);
    if opts.skip_existing && target.exists() {
        tracing::info!(case = %stem, path = %target.display(), "Audio already present, skipping");
        return CaseOutcome::AlreadyPresent { path: target };
    }

    let stream_url = match resolver.resolve(player_url).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            tracing::warn!(case = %stem, player = %player_url, "Could not find .m3u8 on player page");
            return CaseOutcome::skipped("no stream manifest on player page");
        }
        Err(e) => {
            tracing::error!(case = %stem, player = %player_url, "Error loading media player page: {e:#}");
            return CaseOutcome::failed(format!("error loading media player page: {e:#}"));
        }
    };
    tracing::debug!(case = %stem, stream = %stream_url, "Resolved stream");
    record.stream_url = Some(stream_url.clone());

    if opts.dry_run {
        tracing::info!(case = %stem, stream = %stream_url, "Dry run, not downloading");
        return CaseOutcome::Listed;
    }

    tracing::info!(case = %stem, "Downloading audio");
    match extractor.extract(&stream_url, dir, stem).await {
        Ok(path) => {
            tracing::info!(case = %stem, path = %path.display(), "Finished");
            CaseOutcome::Downloaded { path }
        }
        Err(e) => {
            tracing::error!(case = %stem, "Download failed: {e:#}");
            CaseOutcome::failed(format!("download failed: {e:#}"))
        }
    }
}

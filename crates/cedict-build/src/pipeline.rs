use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use cedict_db::{Dictionary, write_json};
use cedict_frequency::{FrequencyScale, FrequencyTable, FrequencyTableBuilder};
use tempfile::NamedTempFile;
use tracing::info;

use crate::config::Config;
use crate::fetch::{Fetch, Location};

/// Counts reported at the end of a build.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub output: PathBuf,
    pub frequency_words: usize,
    pub pages_loaded: usize,
    pub pages_skipped: usize,
    pub processed: usize,
    pub skipped_lines: usize,
    pub records: usize,
    pub scored: usize,
    pub bytes: u64,
}

impl Summary {
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Fetch frequency pages and the dictionary, merge, and write the JSON output.
///
/// Frequency pages that cannot be fetched are skipped. Failing to fetch or
/// read the dictionary, or to write the output, aborts the run and leaves any
/// existing output untouched.
pub fn run(config: &Config, fetcher: &dyn Fetch) -> Result<Summary> {
    let started = Instant::now();
    let (frequencies, pages_loaded, pages_skipped) = load_frequencies(config, fetcher);

    let source = download_source(config, fetcher)?;
    let dictionary = Dictionary::load(source.path(), &frequencies, config.max_entries)
        .with_context(|| format!("load dictionary from {}", config.source))?;
    drop(source);

    let written = write_json(&dictionary, &config.output)?;
    let summary = Summary {
        output: config.output.clone(),
        frequency_words: frequencies.len(),
        pages_loaded,
        pages_skipped,
        processed: dictionary.processed(),
        skipped_lines: dictionary.skipped(),
        records: written.records,
        scored: dictionary.scored_count(),
        bytes: written.bytes,
    };

    info!(
        records = summary.records,
        scored = summary.scored,
        skipped_lines = summary.skipped_lines,
        "built {} in {} ms",
        summary.output.display(),
        started.elapsed().as_millis()
    );
    Ok(summary)
}

/// Build the frequency table from every configured page, in rank order.
pub fn load_frequencies(config: &Config, fetcher: &dyn Fetch) -> (FrequencyTable, usize, usize) {
    if config.frequency_pages.is_empty() {
        info!("no frequency pages configured");
        return (FrequencyTable::empty(), 0, 0);
    }

    let scale = match config.rank_span {
        Some(span) => FrequencyScale::new(span),
        None => FrequencyScale::covering(config.frequency_pages.len()),
    };
    info!(
        pages = config.frequency_pages.len(),
        span = scale.span(),
        "loading word frequencies"
    );

    let mut builder = FrequencyTableBuilder::new(scale);
    for (page_index, location) in config.frequency_pages.iter().enumerate() {
        info!("fetching frequency page {}: {location}", page_index + 1);
        match fetcher.fetch_text(location) {
            Ok(content) => {
                builder.add_page(page_index, &content);
            }
            Err(err) => builder.skip_page(page_index, err),
        }
    }

    let (loaded, skipped) = (builder.pages_loaded(), builder.pages_skipped());
    (builder.build(), loaded, skipped)
}

/// Copy the dictionary source into a temporary file that is removed on drop.
fn download_source(config: &Config, fetcher: &dyn Fetch) -> Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("cedict-").suffix(".download");
    let mut tmp = match &config.work_dir {
        Some(dir) => builder
            .tempfile_in(dir)
            .with_context(|| format!("create download file in {}", dir.display()))?,
        None => builder.tempfile().context("create download file")?,
    };

    match &config.source {
        Location::Remote(url) => info!("downloading CC-CEDICT from {url}"),
        Location::Local(path) => info!("reading CC-CEDICT from {}", path.display()),
    }
    let bytes = fetcher
        .fetch_to(&config.source, tmp.as_file_mut())
        .context("fetch dictionary")?;
    info!("downloaded {:.2} MB", bytes as f64 / (1024.0 * 1024.0));
    Ok(tmp)
}

//! Load CC-CEDICT into a headword-keyed record set and write it out as JSON.
//!
//! CC-CEDICT is line oriented: `Traditional Simplified [pin1 yin1] /gloss/gloss/`.
//! Every line becomes a [`CandidateEntry`](cedict_types::CandidateEntry);
//! candidates sharing a traditional headword are folded into one
//! [`DictionaryRecord`] by a [`RecordMerger`], which also attaches a popularity
//! score from a [`FrequencyTable`].
//!
//! # Features
//! - Plain or gzip-compressed sources, detected from the first bytes.
//! - Malformed lines are counted and skipped, never fatal.
//! - Optional cap on the number of entries processed, for sample runs.
//! - Records keep first-seen order, so identical input gives identical output.
//! - Output is written to a temporary file and renamed over the destination.
//!
//! # Example
//! ```no_run
//! use cedict_db::{Dictionary, write_json};
//! use cedict_frequency::FrequencyTable;
//!
//! # fn main() -> anyhow::Result<()> {
//! let frequencies = FrequencyTable::empty();
//! let dict = Dictionary::load("cedict_1_0_ts_utf-8_mdbg.txt.gz", &frequencies, None)?;
//! if let Some(record) = dict.get("中國") {
//!     println!("{}: {}", record.pronunciation, record.definitions.join("; "));
//! }
//! let summary = write_json(&dict, "assets/dictionary/cedict.json")?;
//! println!("wrote {} records ({} bytes)", summary.records, summary.bytes);
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p cedict-db --example stats -- <cedict file>`.

mod merge;
mod output;
mod parse;

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use cedict_frequency::FrequencyTable;
use cedict_types::DictionaryRecord;
use flate2::bufread::MultiGzDecoder;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, trace};

pub use merge::{Ingest, PROGRESS_INTERVAL, RecordMerger};
pub use output::{WriteSummary, write_json};
pub use parse::{COMMENT_MARKER, LineError, parse_line, parse_metadata, split_glosses};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Finished record set, keyed by traditional headword in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    records: Vec<DictionaryRecord>,
    index: HashMap<String, usize>,
    metadata: BTreeMap<String, String>,
    processed: usize,
    skipped: usize,
}

impl Dictionary {
    /// Load a CC-CEDICT file, plain or gzip-compressed.
    pub fn load(
        path: impl AsRef<Path>,
        frequencies: &FrequencyTable,
        limit: Option<usize>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let reader = open_reader(BufReader::new(file))
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_reader(reader, frequencies, limit)
            .with_context(|| format!("parse {}", path.display()))
    }

    /// Read CC-CEDICT lines from an already decompressed stream.
    pub fn from_reader<R: BufRead>(
        reader: R,
        frequencies: &FrequencyTable,
        limit: Option<usize>,
    ) -> Result<Self> {
        let mut merger = RecordMerger::new(frequencies).with_limit(limit);
        match limit.filter(|n| *n > 0) {
            Some(n) => info!("parsing CC-CEDICT (keeping up to {n} entries)"),
            None => info!("parsing CC-CEDICT (keeping all entries)"),
        }

        for (lineno, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("line {}", lineno + 1))?;
            if let Ingest::Rejected(err) = merger.ingest_line(&line)
                && err.is_malformed()
            {
                trace!("line {}: {err}", lineno + 1);
            }
            if merger.is_full() {
                debug!(
                    "stopping at line {} with {} records",
                    lineno + 1,
                    merger.record_count()
                );
                break;
            }
        }

        let dict = merger.finalize();
        info!(
            processed = dict.processed,
            skipped = dict.skipped,
            "parsed {} entries",
            dict.len()
        );
        Ok(dict)
    }

    pub fn get(&self, traditional: &str) -> Option<&DictionaryRecord> {
        self.index.get(traditional).map(|&idx| &self.records[idx])
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &DictionaryRecord> + '_ {
        self.records.iter()
    }

    /// Number of distinct headwords.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Candidates merged, including repeats of a headword.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Malformed lines skipped.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// `#! key=value` header fields of the source file.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Records that received a frequency score.
    pub fn scored_count(&self) -> usize {
        self.records.iter().filter(|r| r.frequency.is_some()).count()
    }
}

impl Serialize for Dictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.traditional, record)?;
        }
        map.end()
    }
}

/// Wrap `reader` in a gzip decoder when the stream starts with the gzip magic.
pub fn open_reader<R: BufRead + 'static>(mut reader: R) -> Result<Box<dyn BufRead>> {
    let head = reader.fill_buf().context("peek stream header")?;
    if head.starts_with(&GZIP_MAGIC) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use flate2::Compression;
    use flate2::write::GzEncoder;

    const SAMPLE: &str = "# CC-CEDICT\n\
                          #! version=1\n\
                          中國 中国 [Zhong1 guo2] /China/Middle Kingdom/\n\
                          中國 中国 [Zhong1guo2] /(old) Central Plain/\n\
                          好 好 [hao3] /good/\n";

    #[test]
    fn reads_plain_stream() {
        let table = FrequencyTable::empty();
        let dict = Dictionary::from_reader(Cursor::new(SAMPLE), &table, None).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.processed(), 3);
        assert_eq!(dict.metadata().get("version").map(String::as_str), Some("1"));
    }

    #[test]
    fn detects_gzip_streams() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let reader = open_reader(Cursor::new(compressed)).unwrap();
        let table = FrequencyTable::empty();
        let dict = Dictionary::from_reader(reader, &table, None).unwrap();
        assert_eq!(dict.get("好").unwrap().definitions, vec!["good"]);
    }

    #[test]
    fn plain_stream_passes_through() {
        let mut reader = open_reader(Cursor::new(SAMPLE.as_bytes().to_vec())).unwrap();
        let mut first = String::new();
        reader.read_line(&mut first).unwrap();
        assert_eq!(first, "# CC-CEDICT\n");
    }

    #[test]
    fn serializes_as_object_in_first_seen_order() {
        let table = FrequencyTable::empty();
        let input = "乙 乙 [yi3] /second/\n甲 甲 [jia3] /first/\n乙 乙 [yi3] /again/\n";
        let dict = Dictionary::from_reader(Cursor::new(input), &table, None).unwrap();
        let json = serde_json::to_string(&dict).unwrap();
        let yi = json.find("\"乙\"").unwrap();
        let jia = json.find("\"甲\"").unwrap();
        assert!(yi < jia);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["乙"]["definitions"][1], "[yi3]");
    }

    #[test]
    fn invalid_utf8_is_fatal() {
        let table = FrequencyTable::empty();
        let bytes = b"\xff\xfe [x] /y/\n".to_vec();
        assert!(Dictionary::from_reader(Cursor::new(bytes), &table, None).is_err());
    }
}

use std::collections::{BTreeMap, HashMap};

use cedict_frequency::FrequencyTable;
use cedict_types::{CandidateEntry, DictionaryRecord};
use tracing::{debug, info};

use crate::Dictionary;
use crate::parse::{LineError, parse_line, parse_metadata};

/// Candidates between progress log lines.
pub const PROGRESS_INTERVAL: usize = 10_000;

/// Outcome of feeding one candidate or line to a [`RecordMerger`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Ingest {
    /// Started a new record.
    Inserted,
    /// Folded into an existing record.
    Merged,
    /// The line produced no candidate.
    Rejected(LineError),
    /// The entry cap was hit earlier; nothing was read.
    LimitReached,
}

/// Folds candidates, in input order, into records keyed by traditional headword.
pub struct RecordMerger<'a> {
    frequencies: &'a FrequencyTable,
    limit: Option<usize>,
    records: Vec<DictionaryRecord>,
    index: HashMap<String, usize>,
    metadata: BTreeMap<String, String>,
    processed: usize,
    skipped: usize,
}

impl<'a> RecordMerger<'a> {
    pub fn new(frequencies: &'a FrequencyTable) -> Self {
        Self {
            frequencies,
            limit: None,
            records: Vec::new(),
            index: HashMap::new(),
            metadata: BTreeMap::new(),
            processed: 0,
            skipped: 0,
        }
    }

    /// Stop accepting candidates once `limit` have been processed. `None` and
    /// `Some(0)` both mean no cap.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.filter(|n| *n > 0);
        self
    }

    /// Whether the entry cap has been hit.
    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.processed >= limit)
    }

    /// Merge one parsed candidate.
    pub fn ingest(&mut self, candidate: CandidateEntry) -> Ingest {
        if self.is_full() {
            return Ingest::LimitReached;
        }

        let frequency = self.frequencies.lookup(&candidate.traditional, &candidate.simplified);
        let outcome = match self.index.get(&candidate.traditional) {
            Some(&idx) => {
                self.records[idx].absorb(candidate, frequency);
                Ingest::Merged
            }
            None => {
                self.index
                    .insert(candidate.traditional.clone(), self.records.len());
                self.records.push(DictionaryRecord::from_candidate(candidate, frequency));
                Ingest::Inserted
            }
        };

        self.processed += 1;
        if self.processed % PROGRESS_INTERVAL == 0 {
            info!("processed {} entries", self.processed);
        }
        if let Some(limit) = self.limit
            && self.processed >= limit
        {
            info!("reached limit of {limit} entries");
        }

        outcome
    }

    /// Parse and merge one raw line. Malformed lines are counted and skipped;
    /// `#!` header lines are kept as metadata.
    pub fn ingest_line(&mut self, line: &str) -> Ingest {
        if self.is_full() {
            return Ingest::LimitReached;
        }

        match parse_line(line) {
            Ok(candidate) => self.ingest(candidate),
            Err(err) => {
                if err.is_malformed() {
                    self.skipped += 1;
                } else if let Some((key, value)) = parse_metadata(line.trim_end()) {
                    debug!("source metadata {key} = {value}");
                    self.metadata.insert(key.to_string(), value.to_string());
                }
                Ingest::Rejected(err)
            }
        }
    }

    /// Candidates merged so far, counting repeats of the same headword.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Malformed lines seen so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Distinct headwords so far.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn finalize(self) -> Dictionary {
        Dictionary {
            records: self.records,
            index: self.index,
            metadata: self.metadata,
            processed: self.processed,
            skipped: self.skipped,
        }
    }
}

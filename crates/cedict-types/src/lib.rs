//! Shared types for turning CC-CEDICT lines into headword-keyed records.
//!
//! A [`CandidateEntry`] is one parsed dictionary line. Candidates that share a
//! traditional headword fold into a single [`DictionaryRecord`], which is what
//! ends up in the serialized output. [`FrequencyRow`] is the tuple produced by
//! frequency list extraction before ranks are turned into [`Score`]s.
//!
//! ```rust
//! use cedict_types::{CandidateEntry, DictionaryRecord};
//!
//! let first = CandidateEntry::new("中國", "中国", "Zhong1 guo2", ["China"]);
//! let second = CandidateEntry::new("中國", "中国", "Zhong1guo2", ["(old) Central Plain"]);
//!
//! let mut record = DictionaryRecord::from_candidate(first, None);
//! record.absorb(second, None);
//! assert_eq!(record.pronunciation, "Zhong1 guo2; Zhong1guo2");
//! assert_eq!(record.definitions[2], "[Zhong1guo2]");
//! ```

use serde::{Deserialize, Serialize};

/// Popularity score; higher means more common.
pub type Score = u32;

/// Separator placed between distinct pronunciations of one headword.
pub const PRONUNCIATION_SEPARATOR: &str = "; ";

/// A single dictionary line after parsing, before merging.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CandidateEntry {
    pub traditional: String,
    pub simplified: String,
    pub pronunciation: String,
    /// Definitions in source order; the first one is the primary sense.
    pub glosses: Vec<String>,
}

impl CandidateEntry {
    pub fn new<I, S>(
        traditional: impl Into<String>,
        simplified: impl Into<String>,
        pronunciation: impl Into<String>,
        glosses: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            traditional: traditional.into(),
            simplified: simplified.into(),
            pronunciation: pronunciation.into(),
            glosses: glosses.into_iter().map(Into::into).collect(),
        }
    }
}

/// Consolidated record for one traditional headword.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DictionaryRecord {
    pub traditional: String,
    pub simplified: String,
    #[serde(rename = "pinyin")]
    pub pronunciation: String,
    pub definitions: Vec<String>,
    pub frequency: Option<Score>,
}

impl DictionaryRecord {
    /// Start a record from the first candidate seen for its headword.
    pub fn from_candidate(candidate: CandidateEntry, frequency: Option<Score>) -> Self {
        Self {
            traditional: candidate.traditional,
            simplified: candidate.simplified,
            pronunciation: candidate.pronunciation,
            definitions: candidate.glosses,
            frequency,
        }
    }

    /// Fold a later candidate with the same headword into this record.
    ///
    /// The simplified form of `candidate` is ignored. Its pronunciation is
    /// appended unless it equals the whole stored value, so a reading that
    /// returns after a different one is listed again. Its glosses are appended
    /// behind a `[pronunciation]` marker so each sense keeps its reading, and
    /// the frequency only ever moves upwards.
    pub fn absorb(&mut self, candidate: CandidateEntry, frequency: Option<Score>) {
        debug_assert_eq!(self.traditional, candidate.traditional);

        if candidate.pronunciation != self.pronunciation {
            self.pronunciation.push_str(PRONUNCIATION_SEPARATOR);
            self.pronunciation.push_str(&candidate.pronunciation);
        }

        self.definitions.push(format!("[{}]", candidate.pronunciation));
        self.definitions.extend(candidate.glosses);

        if let Some(score) = frequency
            && self.frequency.is_none_or(|current| score > current)
        {
            self.frequency = Some(score);
        }
    }

    /// Pronunciations recorded so far, in the order they were appended.
    pub fn pronunciations(&self) -> impl Iterator<Item = &str> {
        self.pronunciation.split(PRONUNCIATION_SEPARATOR)
    }
}

/// One usable row of a ranked frequency list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrequencyRow {
    /// Global 1-based rank; lower is more common.
    pub rank: u32,
    pub traditional: String,
    pub simplified: String,
}

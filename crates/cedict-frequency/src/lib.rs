//! Build word popularity scores from ranked frequency list pages.
//!
//! The source list is split into pages of [`PAGE_SIZE`] words, processed in
//! rank order. Each row's global rank is turned into a score on a fixed
//! [`FrequencyScale`] so that higher means more common, and the first score
//! assigned to a word text is the one that sticks.
//!
//! Row extraction sits behind [`RowExtractor`]; the builder never looks at
//! markup itself. [`HtmlTableExtractor`] handles the table layout used by the
//! Wiktionary Mandarin frequency lists.
//!
//! # Example
//! ```rust
//! use cedict_frequency::{FrequencyScale, FrequencyTableBuilder};
//!
//! let page = "<tr><td>的</td><td>的</td></tr><tr><td>們</td><td>们</td></tr>";
//! let mut builder = FrequencyTableBuilder::new(FrequencyScale::default());
//! builder.add_page(0, page);
//! let table = builder.build();
//!
//! assert_eq!(table.get("的"), Some(10_999));
//! assert_eq!(table.lookup("們", "们"), Some(10_998));
//! ```

mod extract;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use cedict_types::{FrequencyRow, Score};
use tracing::{info, warn};

pub use extract::{HtmlTableExtractor, RowExtractor};

/// Number of ranked words on one page of the source list.
pub const PAGE_SIZE: u32 = 1000;

/// Default span: rank 1 scores 10 999, matching ten pages plus one page of
/// headroom.
///
/// The published scores are `11000 - rank`; 11 000 is the offset
/// `DEFAULT_RANK_SPAN + 1`, not the span itself.
pub const DEFAULT_RANK_SPAN: u32 = 10_999;

/// Global 1-based rank of the row at 1-based `position` on page `page_index`.
pub fn global_rank(page_index: usize, position: u32) -> u32 {
    (page_index as u32)
        .saturating_mul(PAGE_SIZE)
        .saturating_add(position)
}

/// Maps ranks onto scores where higher is more common.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrequencyScale {
    span: u32,
}

impl FrequencyScale {
    /// Scale whose lowest-ranked scorable word sits at `span`. Zero is bumped
    /// to one.
    pub fn new(span: u32) -> Self {
        Self { span: span.max(1) }
    }

    /// Default scale, widened if `page_count` pages would run past it.
    pub fn covering(page_count: usize) -> Self {
        let needed = (page_count as u32).saturating_mul(PAGE_SIZE);
        Self::new(DEFAULT_RANK_SPAN.max(needed))
    }

    pub fn span(&self) -> u32 {
        self.span
    }

    /// `span + 1 - rank`, or `None` when `rank` falls outside `1..=span`.
    pub fn score(&self, rank: u32) -> Option<Score> {
        (1..=self.span)
            .contains(&rank)
            .then(|| self.span + 1 - rank)
    }
}

impl Default for FrequencyScale {
    fn default() -> Self {
        Self::new(DEFAULT_RANK_SPAN)
    }
}

/// Read-only word text → score lookup.
#[derive(Clone, Debug, Default)]
pub struct FrequencyTable {
    scores: HashMap<String, Score>,
}

impl FrequencyTable {
    /// Table with no scores; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Option<Score> {
        self.scores.get(text).copied()
    }

    /// Score for a headword, trying the traditional form before the simplified one.
    pub fn lookup(&self, traditional: &str, simplified: &str) -> Option<Score> {
        self.get(traditional).or_else(|| self.get(simplified))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(String, Score)> for FrequencyTable {
    /// Collect pairs; as with the builder, the first score for a text wins.
    fn from_iter<T: IntoIterator<Item = (String, Score)>>(iter: T) -> Self {
        let mut scores = HashMap::new();
        for (text, score) in iter {
            scores.entry(text).or_insert(score);
        }
        Self { scores }
    }
}

/// Accumulates ranked pages into a [`FrequencyTable`].
pub struct FrequencyTableBuilder<E = HtmlTableExtractor> {
    extractor: E,
    scale: FrequencyScale,
    scores: HashMap<String, Score>,
    pages_loaded: usize,
    pages_skipped: usize,
}

impl FrequencyTableBuilder<HtmlTableExtractor> {
    pub fn new(scale: FrequencyScale) -> Self {
        Self::with_extractor(HtmlTableExtractor, scale)
    }
}

impl<E: RowExtractor> FrequencyTableBuilder<E> {
    pub fn with_extractor(extractor: E, scale: FrequencyScale) -> Self {
        Self {
            extractor,
            scale,
            scores: HashMap::new(),
            pages_loaded: 0,
            pages_skipped: 0,
        }
    }

    /// Extract and record the rows of one page. Returns the number of word
    /// texts that received their first score from this page.
    ///
    /// Pages must be added in rank order for first-wins to mean best-rank-wins.
    pub fn add_page(&mut self, page_index: usize, content: &str) -> usize {
        let rows = self.extractor.rows(page_index, content);
        if rows.is_empty() {
            warn!(page = page_index, "no usable rows found on frequency page");
        }
        self.pages_loaded += 1;
        self.add_rows(page_index, rows)
    }

    /// Record already extracted rows.
    pub fn add_rows(
        &mut self,
        page_index: usize,
        rows: impl IntoIterator<Item = FrequencyRow>,
    ) -> usize {
        let mut added = 0usize;
        let mut out_of_span = 0usize;

        for row in rows {
            let Some(score) = self.scale.score(row.rank) else {
                out_of_span += 1;
                continue;
            };
            added += usize::from(self.assign(row.traditional, score));
            added += usize::from(self.assign(row.simplified, score));
        }

        if out_of_span > 0 {
            warn!(
                page = page_index,
                span = self.scale.span(),
                "dropped {out_of_span} rows ranked beyond the frequency span"
            );
        }
        added
    }

    /// Note a page that could not be retrieved. Coverage degrades; the build
    /// goes on.
    pub fn skip_page(&mut self, page_index: usize, reason: impl fmt::Display) {
        warn!(page = page_index, "skipping frequency page: {reason}");
        self.pages_skipped += 1;
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn pages_skipped(&self) -> usize {
        self.pages_skipped
    }

    pub fn build(self) -> FrequencyTable {
        info!(
            pages = self.pages_loaded,
            skipped = self.pages_skipped,
            "loaded {} word frequencies",
            self.scores.len()
        );
        FrequencyTable {
            scores: self.scores,
        }
    }

    fn assign(&mut self, text: String, score: Score) -> bool {
        if text.is_empty() {
            return false;
        }
        match self.scores.entry(text) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(score);
                true
            }
        }
    }
}

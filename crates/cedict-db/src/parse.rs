use cedict_types::CandidateEntry;
use thiserror::Error;

/// Lines starting with this are comments.
pub const COMMENT_MARKER: char = '#';
const METADATA_MARKER: &str = "#!";

/// Why a line did not yield a candidate entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum LineError {
    #[error("comment line")]
    Comment,
    #[error("no '[' opening the pronunciation")]
    MissingOpenBracket,
    #[error("fewer than two headwords before the pronunciation")]
    MissingHeadwords,
    #[error("no ']' closing the pronunciation")]
    MissingCloseBracket,
}

impl LineError {
    /// True for lines that are malformed rather than deliberately ignored.
    pub fn is_malformed(self) -> bool {
        !matches!(self, LineError::Comment)
    }
}

/// Parse one `Traditional Simplified [pin1 yin1] /gloss/gloss/` line.
///
/// The head is everything before the first `[`; its first two whitespace
/// separated tokens are the headwords and anything after them is ignored. The
/// pronunciation runs to the first `]`, so brackets inside glosses are kept.
pub fn parse_line(line: &str) -> Result<CandidateEntry, LineError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.starts_with(COMMENT_MARKER) {
        return Err(LineError::Comment);
    }

    let (head, rest) = line.split_once('[').ok_or(LineError::MissingOpenBracket)?;
    let mut headwords = head.split_whitespace();
    let (Some(traditional), Some(simplified)) = (headwords.next(), headwords.next()) else {
        return Err(LineError::MissingHeadwords);
    };

    let (pronunciation, gloss_section) =
        rest.split_once(']').ok_or(LineError::MissingCloseBracket)?;

    Ok(CandidateEntry {
        traditional: traditional.to_string(),
        simplified: simplified.to_string(),
        pronunciation: pronunciation.trim().to_string(),
        glosses: split_glosses(gloss_section),
    })
}

/// Split a `/`-delimited gloss section into trimmed, non-empty glosses.
///
/// CC-CEDICT has no escape for a literal `/`, so a gloss such as `AC/DC` comes
/// out as two glosses.
pub fn split_glosses(section: &str) -> Vec<String> {
    section
        .trim()
        .trim_matches('/')
        .split('/')
        .map(str::trim)
        .filter(|gloss| !gloss.is_empty())
        .map(str::to_string)
        .collect()
}

/// `#! key=value` header lines carry file metadata such as `version` or `date`.
pub fn parse_metadata(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_prefix(METADATA_MARKER)?;
    let (key, value) = body.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_line() {
        let entry = parse_line("中國 中国 [Zhong1 guo2] /China/Middle Kingdom/\n").unwrap();
        assert_eq!(entry.traditional, "中國");
        assert_eq!(entry.simplified, "中国");
        assert_eq!(entry.pronunciation, "Zhong1 guo2");
        assert_eq!(entry.glosses, vec!["China", "Middle Kingdom"]);
    }

    #[test]
    fn rejects_comments() {
        assert_eq!(parse_line("# CC-CEDICT"), Err(LineError::Comment));
        assert_eq!(parse_line("#! version=1"), Err(LineError::Comment));
        assert!(!LineError::Comment.is_malformed());
    }

    #[test]
    fn rejects_missing_brackets() {
        assert_eq!(parse_line("中國 中国 /China/"), Err(LineError::MissingOpenBracket));
        assert_eq!(
            parse_line("中國 中国 [Zhong1 guo2 /China/"),
            Err(LineError::MissingCloseBracket)
        );
        assert_eq!(parse_line(""), Err(LineError::MissingOpenBracket));
    }

    #[test]
    fn rejects_single_headword() {
        assert_eq!(parse_line("中國 [Zhong1 guo2] /China/"), Err(LineError::MissingHeadwords));
        assert_eq!(parse_line("[a] /b/"), Err(LineError::MissingHeadwords));
        assert!(LineError::MissingHeadwords.is_malformed());
    }

    #[test]
    fn extra_head_tokens_are_ignored() {
        let entry = parse_line("一 一 extra [yi1] /one/").unwrap();
        assert_eq!(entry.traditional, "一");
        assert_eq!(entry.simplified, "一");
    }

    #[test]
    fn brackets_inside_glosses_survive() {
        let entry = parse_line("說 说 [shuo1] /to speak/see also 說服|说服[shui4 fu2]/").unwrap();
        assert_eq!(entry.pronunciation, "shuo1");
        assert_eq!(entry.glosses, vec!["to speak", "see also 說服|说服[shui4 fu2]"]);
    }

    #[test]
    fn empty_glosses_are_dropped() {
        let entry = parse_line("好 好 [hao3] // good / /well//\r\n").unwrap();
        assert_eq!(entry.glosses, vec!["good", "well"]);
        let bare = parse_line("好 好 [hao3]").unwrap();
        assert!(bare.glosses.is_empty());
    }

    #[test]
    fn slash_inside_gloss_splits_it() {
        assert_eq!(split_glosses("/AC/DC (band)/"), vec!["AC", "DC (band)"]);
    }

    #[test]
    fn reads_header_metadata() {
        assert_eq!(parse_metadata("#! version=1"), Some(("version", "1")));
        assert_eq!(
            parse_metadata("#! date=2024-01-01T00:00:00Z"),
            Some(("date", "2024-01-01T00:00:00Z"))
        );
        assert_eq!(parse_metadata("# plain comment"), None);
        assert_eq!(parse_metadata("#! =x"), None);
    }
}

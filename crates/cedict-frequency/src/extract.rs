use std::sync::LazyLock;

use cedict_types::FrequencyRow;
use regex::Regex;

use crate::global_rank;

static ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").expect("row pattern"));
static CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<td[^>]*>(.*?)</td>").expect("cell pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

/// Turns the raw content of one ranked page into ranked rows.
///
/// `page_index` is the 0-based position of the page in the overall list;
/// implementations derive each row's global rank from it and the row's
/// position within the page.
pub trait RowExtractor {
    fn rows(&self, page_index: usize, content: &str) -> Vec<FrequencyRow>;
}

/// Extracts `(traditional, simplified)` pairs from the first two `<td>` cells
/// of every table row in an HTML page.
///
/// Rows with fewer than two cells (headers, layout tables) are not counted.
/// A counted row whose first or second cell is empty after stripping markup
/// still occupies its rank but yields nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlTableExtractor;

impl RowExtractor for HtmlTableExtractor {
    fn rows(&self, page_index: usize, content: &str) -> Vec<FrequencyRow> {
        let mut rows = Vec::new();
        let mut position = 0u32;

        for row in ROW.captures_iter(content) {
            let cells: Vec<&str> = CELL
                .captures_iter(&row[1])
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect();
            if cells.len() < 2 {
                continue;
            }
            position += 1;

            let traditional = strip_tags(cells[0]);
            let simplified = strip_tags(cells[1]);
            if traditional.is_empty() || simplified.is_empty() {
                continue;
            }

            if position == 1 {
                tracing::debug!(
                    page = page_index,
                    cells = cells.len(),
                    "first row: {traditional} / {simplified}"
                );
            }

            rows.push(FrequencyRow {
                rank: global_rank(page_index, position),
                traditional,
                simplified,
            });
        }

        rows
    }
}

fn strip_tags(cell: &str) -> String {
    TAG.replace_all(cell, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nested_markup() {
        assert_eq!(
            strip_tags(r#" <span class="Hani"><a href="/wiki/的">的</a></span> "#),
            "的"
        );
    }

    #[test]
    fn skips_header_rows_without_cells() {
        let html = "<table><tr><th>Trad.</th><th>Simp.</th></tr>\
                    <tr><td>的</td><td>的</td><td>de</td></tr></table>";
        let rows = HtmlTableExtractor.rows(0, html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, 1);
    }

    #[test]
    fn empty_cells_consume_rank() {
        let html = "<tr><td></td><td>x</td></tr>\
                    <tr><td>是</td><td>是</td></tr>";
        let rows = HtmlTableExtractor.rows(2, html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, 2002);
        assert_eq!(rows[0].traditional, "是");
    }

    #[test]
    fn rows_with_single_cell_are_not_counted() {
        let html = "<tr><td>only</td></tr>\
                    <tr class=\"odd\"><td>個</td><td>个</td></tr>";
        let rows = HtmlTableExtractor.rows(0, html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].simplified, "个");
    }

    #[test]
    fn cells_may_span_lines() {
        let html = "<tr>\n<td>\n<a>們</a>\n</td>\n<td>\n们\n</td>\n</tr>";
        let rows = HtmlTableExtractor.rows(0, html);
        assert_eq!(rows[0].traditional, "們");
        assert_eq!(rows[0].simplified, "们");
    }
}

use std::path::PathBuf;

use clap::Parser;

use crate::fetch::Location;

pub const DEFAULT_SOURCE_URL: &str =
    "https://www.mdbg.net/chinese/export/cedict/cedict_1_0_ts_utf-8_mdbg.txt.gz";
pub const DEFAULT_OUTPUT: &str = "assets/dictionary/cedict.json";
pub const DEFAULT_FREQUENCY_URLS: [&str; 10] = [
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/1-1000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/1001-2000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/2001-3000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/3001-4000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/4001-5000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/5001-6000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/6001-7000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/7001-8000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/8001-9000",
    "https://en.wiktionary.org/wiki/Appendix:Mandarin_Frequency_lists/9001-10000",
];

#[derive(Parser, Debug)]
#[command(name = "cedict-build")]
#[command(about = "Build a headword-keyed JSON dictionary from CC-CEDICT")]
pub struct Cli {
    /// CC-CEDICT source, an http(s) URL or a local path (plain or gzip).
    #[arg(long, env = "CEDICT_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Ranked frequency list page, in rank order. Repeat for every page.
    #[arg(long = "frequency-url", env = "CEDICT_FREQUENCY_URLS", value_delimiter = ',')]
    pub frequency_urls: Vec<String>,

    /// Where to write the JSON document.
    #[arg(short, long, env = "CEDICT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Stop after this many dictionary entries. Unset or 0 keeps everything.
    #[arg(long, env = "CEDICT_MAX_ENTRIES")]
    pub max_entries: Option<usize>,

    /// Override the rank span used to turn ranks into scores.
    #[arg(long, env = "CEDICT_RANK_SPAN")]
    pub rank_span: Option<u32>,

    /// Build without frequency data.
    #[arg(long, default_value_t = false)]
    pub skip_frequencies: bool,

    /// Directory for the downloaded source (defaults to the system temp dir).
    #[arg(long, env = "CEDICT_WORK_DIR")]
    pub work_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub source: Location,
    pub frequency_pages: Vec<Location>,
    pub output: PathBuf,
    pub max_entries: Option<usize>,
    pub rank_span: Option<u32>,
    pub work_dir: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> Config {
        let frequency_pages = if self.skip_frequencies {
            Vec::new()
        } else if self.frequency_urls.is_empty() {
            DEFAULT_FREQUENCY_URLS.iter().map(|u| Location::parse(u)).collect()
        } else {
            self.frequency_urls.iter().map(|u| Location::parse(u)).collect()
        };

        Config {
            source: Location::parse(&self.source_url),
            frequency_pages,
            output: self.output,
            max_entries: self.max_entries.filter(|n| *n > 0),
            rank_span: self.rank_span.filter(|n| *n > 0),
            work_dir: self.work_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("cedict-build").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("valid args").into_config()
    }

    #[test]
    fn defaults_match_published_sources() {
        let config = parse(&[]);
        assert_eq!(config.frequency_pages.len(), 10);
        assert_eq!(
            config.frequency_pages[9],
            Location::Remote(DEFAULT_FREQUENCY_URLS[9].to_string())
        );
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.source, Location::Remote(DEFAULT_SOURCE_URL.to_string()));
        assert_eq!(config.max_entries, None);
    }

    #[test]
    fn explicit_pages_replace_defaults() {
        let config = parse(&[
            "--frequency-url",
            "pages/1.html",
            "--frequency-url",
            "pages/2.html",
            "--max-entries",
            "500",
        ]);
        assert_eq!(
            config.frequency_pages,
            vec![
                Location::Local(PathBuf::from("pages/1.html")),
                Location::Local(PathBuf::from("pages/2.html")),
            ]
        );
        assert_eq!(config.max_entries, Some(500));
    }

    #[test]
    fn comma_separated_pages_are_split() {
        let config = parse(&["--frequency-url", "a.html,b.html,c.html"]);
        assert_eq!(config.frequency_pages.len(), 3);
    }

    #[test]
    fn skip_frequencies_clears_pages() {
        let config = parse(&["--skip-frequencies", "--frequency-url", "a.html"]);
        assert!(config.frequency_pages.is_empty());
    }

    #[test]
    fn zero_cap_means_no_cap() {
        let config = parse(&["--max-entries", "0", "--rank-span", "0"]);
        assert_eq!(config.max_entries, None);
        assert_eq!(config.rank_span, None);
    }
}

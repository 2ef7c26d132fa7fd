use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;

const USER_AGENT: &str = concat!("cedict-build/", env!("CARGO_PKG_VERSION"));

/// Where a source document lives.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Location {
    Remote(String),
    Local(PathBuf),
}

impl Location {
    /// `http://` and `https://` are remote; `file://` and bare paths are local.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Location::Remote(raw.to_string())
        } else {
            let path = raw.strip_prefix("file://").unwrap_or(raw);
            Location::Local(PathBuf::from(path))
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Remote(url) => f.write_str(url),
            Location::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to set up HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("request to {url} failed: {error}")]
    Http { url: String, error: reqwest::Error },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to read {path}: {error}")]
    Read { path: PathBuf, error: io::Error },
    #[error("failed to store {location}: {error}")]
    Write { location: String, error: io::Error },
}

/// Retrieves source documents. Each call is a single blocking operation.
pub trait Fetch {
    /// Whole document as UTF-8 text.
    fn fetch_text(&self, location: &Location) -> Result<String, SourceError>;

    /// Stream the raw bytes into `dest`, returning how many were written.
    fn fetch_to(&self, location: &Location, dest: &mut dyn Write) -> Result<u64, SourceError>;
}

/// Fetches remote locations over HTTP(S) and reads local ones from disk.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|error| SourceError::Http {
                url: url.to_string(),
                error,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, location: &Location) -> Result<String, SourceError> {
        match location {
            Location::Remote(url) => self.get(url)?.text().map_err(|error| SourceError::Http {
                url: url.clone(),
                error,
            }),
            Location::Local(path) => fs::read_to_string(path).map_err(|error| SourceError::Read {
                path: path.clone(),
                error,
            }),
        }
    }

    fn fetch_to(&self, location: &Location, dest: &mut dyn Write) -> Result<u64, SourceError> {
        let copied = match location {
            Location::Remote(url) => {
                let mut response = self.get(url)?;
                response.copy_to(dest).map_err(|error| SourceError::Http {
                    url: url.clone(),
                    error,
                })?
            }
            Location::Local(path) => {
                let mut file = File::open(path).map_err(|error| SourceError::Read {
                    path: path.clone(),
                    error,
                })?;
                io::copy(&mut file, dest).map_err(|error| SourceError::Write {
                    location: location.to_string(),
                    error,
                })?
            }
        };
        dest.flush().map_err(|error| SourceError::Write {
            location: location.to_string(),
            error,
        })?;
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locations() {
        assert_eq!(
            Location::parse("https://www.mdbg.net/cedict.txt.gz"),
            Location::Remote("https://www.mdbg.net/cedict.txt.gz".to_string())
        );
        assert_eq!(
            Location::parse("file:///tmp/cedict.u8"),
            Location::Local(PathBuf::from("/tmp/cedict.u8"))
        );
        assert_eq!(
            Location::parse(" data/page1.html "),
            Location::Local(PathBuf::from("data/page1.html"))
        );
    }

    #[test]
    fn reads_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<tr><td>的</td><td>的</td></tr>").unwrap();

        let fetcher = HttpFetcher::new().unwrap();
        let location = Location::Local(path);
        assert!(fetcher.fetch_text(&location).unwrap().contains("的"));

        let mut sink = Vec::new();
        let copied = fetcher.fetch_to(&location, &mut sink).unwrap();
        assert_eq!(copied as usize, sink.len());
    }

    #[test]
    fn missing_local_file_reports_path() {
        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher
            .fetch_text(&Location::parse("/nonexistent/page.html"))
            .unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/page.html"));
    }
}

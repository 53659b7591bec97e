//! Error types for fetching and collection building.
//!
//! Attribute accessors never surface these; they degrade to an empty value.

/// All errors that can leave the library.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Unexpected listing structure: {0}")]
    Structure(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub(crate) fn fetch(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.to_string(),
            message: format!("{err:#}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = ScrapeError::fetch("https://www.imdb.com/title/tt1/", "navigation timed out");
        assert_eq!(
            err.to_string(),
            "Fetch failed for https://www.imdb.com/title/tt1/: navigation timed out"
        );
    }
}

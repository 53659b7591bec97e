//! Page variants of a title.

use std::fmt;

/// One distinct page variant of a title, each carrying its own subset of
/// attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Title root; carries the JSON-LD record.
    Main,
    Combined,
    Locations,
    ReleaseInfo,
    FullCredits,
    CriticReviews,
    Synopsis,
    Episodes { season: u32 },
}

impl View {
    /// Path segment appended to `{base}/title/tt{id}/`.
    pub fn path(&self) -> String {
        match self {
            View::Main => String::new(),
            View::Combined => "combined".to_string(),
            View::Locations => "locations".to_string(),
            View::ReleaseInfo => "releaseinfo".to_string(),
            View::FullCredits => "fullcredits".to_string(),
            View::CriticReviews => "criticreviews".to_string(),
            View::Synopsis => "synopsis".to_string(),
            View::Episodes { season } => format!("episodes/?season={season}"),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Main => f.write_str("main"),
            other => f.write_str(&other.path()),
        }
    }
}

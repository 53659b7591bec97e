//! Text normalization shared by the extractors.

use regex::Regex;
use std::sync::OnceLock;

fn plot_boilerplate() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:add|full)\s(?:summary|synopsis)|[\u{00BB}\u{00A0}|]")
            .expect("plot boilerplate regex is valid")
    })
}

fn release_date_noise() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:see|more)\b|[\u{00BB}\u{00A0}]")
            .expect("release date regex is valid")
    })
}

fn iso_duration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
        )
        .expect("duration regex is valid")
    })
}

/// Strip "add/full summary", "add/full synopsis", chevrons, non-breaking
/// spaces and pipes from a plot string.
pub fn sanitize_plot(plot: &str) -> String {
    plot_boilerplate().replace_all(plot, "").trim().to_string()
}

/// Strip the "see more »" navigation around a release date.
pub fn sanitize_release_date(date: &str) -> String {
    release_date_noise().replace_all(date, "").trim().to_string()
}

/// Decode named and numeric HTML entities.
pub fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

/// Parse an ISO-8601 duration such as `PT2H22M` into whole minutes.
pub fn parse_duration_minutes(s: &str) -> Option<u32> {
    let caps = iso_duration().captures(s.trim())?;
    if (1..=4).all(|i| caps.get(i).is_none()) {
        return None;
    }
    let part = |i: usize| -> Option<f64> {
        caps.get(i).map_or(Some(0.0), |m| m.as_str().parse().ok())
    };
    let seconds = part(1)? * 86_400.0 + part(2)? * 3_600.0 + part(3)? * 60.0 + part(4)?;
    Some((seconds / 60.0).floor() as u32)
}

/// Keep ASCII digits only.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Title supplied by a caller or a listing: quotes removed, trimmed.
pub fn clean_title(s: &str) -> String {
    s.replace('"', "").trim().to_string()
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plot_removes_boilerplate() {
        let plot = "  A boy wizard begins his training. full summary » | ";
        assert_eq!(sanitize_plot(plot), "A boy wizard begins his training.");
    }

    #[test]
    fn test_sanitize_plot_is_case_insensitive() {
        assert_eq!(
            sanitize_plot("Add Summary\u{00A0}Two friends. Full  Synopsis"),
            "Two friends. Full  Synopsis"
        );
        assert_eq!(sanitize_plot("ADD SYNOPSIS|"), "");
    }

    #[test]
    fn test_sanitize_release_date() {
        assert_eq!(
            sanitize_release_date("21 December 1988 (USA) See more\u{00A0}»"),
            "21 December 1988 (USA)"
        );
        assert_eq!(
            sanitize_release_date("July 4, 1990 (Baltimore)"),
            "July 4, 1990 (Baltimore)"
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Rock &amp; Roll"), "Rock & Roll");
        assert_eq!(decode_entities("Am&#233;lie"), "Amélie");
        assert_eq!(decode_entities("L&#x27;Avventura"), "L'Avventura");
        assert_eq!(decode_entities("&quot;Quoted&quot;"), "\"Quoted\"");
        assert_eq!(decode_entities("no entities"), "no entities");
        assert_eq!(decode_entities("Am&eacute;lie"), "Amélie");
        assert_eq!(decode_entities("K&ouml;nig"), "König");
        assert_eq!(decode_entities("Schindler&rsquo;s List"), "Schindler\u{2019}s List");
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration_minutes("PT2H22M"), Some(142));
        assert_eq!(parse_duration_minutes("PT90M"), Some(90));
        assert_eq!(parse_duration_minutes("PT1H"), Some(60));
        assert_eq!(parse_duration_minutes("PT45S"), Some(0));
        assert_eq!(parse_duration_minutes("P1DT1M"), Some(1441));
        assert_eq!(parse_duration_minutes(" PT1H30M30S "), Some(90));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration_minutes(""), None);
        assert_eq!(parse_duration_minutes("P"), None);
        assert_eq!(parse_duration_minutes("PT"), None);
        assert_eq!(parse_duration_minutes("2h 22m"), None);
    }

    #[test]
    fn test_digits_and_titles() {
        assert_eq!(digits_only("(1988–)"), "1988");
        assert_eq!(clean_title("  \"Twin Peaks\" "), "Twin Peaks");
        assert_eq!(normalize_ws(" a \n  b\t"), "a b");
    }
}

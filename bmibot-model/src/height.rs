use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const CM_PER_INCH: f64 = 2.54;

/// Result of matching a free-text height against the known notations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightMatch {
    Centimeters(f64),
    FeetInches { feet: u32, inches: u32 },
    Inches(u32),
    NoMatch,
}

impl HeightMatch {
    /// Converts the match to centimeters. Feet/inches pairs outside of
    /// 3-8 ft and 0-11 in are rejected.
    pub fn to_cm(self) -> Option<f64> {
        match self {
            HeightMatch::Centimeters(cm) => Some(cm),
            HeightMatch::FeetInches { feet, inches } => feet_inches_to_cm(feet, inches),
            HeightMatch::Inches(inches) => Some(inches as f64 * CM_PER_INCH),
            HeightMatch::NoMatch => None,
        }
    }
}

type Extractor = fn(&Captures) -> HeightMatch;

// Order matters, the first pattern that matches wins.
static HEIGHT_PATTERNS: Lazy<Vec<(Regex, Extractor)>> = Lazy::new(|| {
    let table: [(&str, Extractor); 5] = [
        (r"^(\d+(?:\.\d+)?)\s*cm$", centimeters),
        (r#"^(\d+)\s*(?:ft|')\s*(\d+)?\s*(?:in|")?$"#, feet_and_inches),
        (r"^(\d+)\s*(?:feet|foot)\s*(\d+)?\s*(?:in|inches)?$", feet_and_inches),
        (r#"^(\d+)\s*(?:in|")$"#, inches_only),
        (r"^(\d+)\s+(\d+)$", feet_and_inches),
    ];
    table
        .into_iter()
        .filter_map(|(pattern, extract)| Regex::new(pattern).ok().map(|re| (re, extract)))
        .collect()
});

fn centimeters(caps: &Captures) -> HeightMatch {
    caps[1]
        .parse::<f64>()
        .ok()
        .filter(|cm| cm.is_finite())
        .map_or(HeightMatch::NoMatch, HeightMatch::Centimeters)
}

fn feet_and_inches(caps: &Captures) -> HeightMatch {
    let Ok(feet) = caps[1].parse::<u32>() else {
        return HeightMatch::NoMatch;
    };
    let inches = match caps.get(2) {
        Some(m) => match m.as_str().parse::<u32>() {
            Ok(inches) => inches,
            Err(_) => return HeightMatch::NoMatch,
        },
        None => 0,
    };
    HeightMatch::FeetInches { feet, inches }
}

fn inches_only(caps: &Captures) -> HeightMatch {
    caps[1]
        .parse::<u32>()
        .map_or(HeightMatch::NoMatch, HeightMatch::Inches)
}

/// Matches a free-text height such as `175cm`, `5ft9`, `5'9"`, `5 feet 9 inches`,
/// `69in` or `5 9`. Matching is case-insensitive and ignores surrounding whitespace.
pub fn match_height(input: &str) -> HeightMatch {
    let raw = input.trim().to_lowercase();
    if raw.is_empty() {
        return HeightMatch::NoMatch;
    }

    HEIGHT_PATTERNS
        .iter()
        .find_map(|(re, extract)| re.captures(&raw).map(|caps| extract(&caps)))
        .unwrap_or(HeightMatch::NoMatch)
}

pub fn parse_height_to_cm(input: &str) -> Option<f64> {
    match_height(input).to_cm()
}

pub fn feet_inches_to_cm(feet: u32, inches: u32) -> Option<f64> {
    if !(3..=8).contains(&feet) || inches > 11 {
        return None;
    }
    Some((feet * 12 + inches) as f64 * CM_PER_INCH)
}

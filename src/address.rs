use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    // Whole-token expansions. The three sites abbreviate street types and
    // directionals inconsistently, so every variant maps to one spelling.
    static ref ABBREVIATIONS: HashMap<&'static str, &'static str> = HashMap::from([
        ("st", "street"),
        ("str", "street"),
        ("ave", "avenue"),
        ("av", "avenue"),
        ("blvd", "boulevard"),
        ("dr", "drive"),
        ("rd", "road"),
        ("ln", "lane"),
        ("ct", "court"),
        ("cir", "circle"),
        ("pl", "place"),
        ("pkwy", "parkway"),
        ("pky", "parkway"),
        ("hwy", "highway"),
        ("ter", "terrace"),
        ("terr", "terrace"),
        ("n", "north"),
        ("no", "north"),
        ("s", "south"),
        ("so", "south"),
        ("e", "east"),
        ("w", "west"),
        ("ne", "northeast"),
        ("nw", "northwest"),
        ("se", "southeast"),
        ("sw", "southwest"),
    ]);

    // A unit designator and the token after it are dropped entirely, so two
    // units in the same building share one canonical key.
    static ref UNIT_MARKERS: HashSet<&'static str> =
        HashSet::from(["apt", "apartment", "unit", "ste", "suite"]);
}

/// Collapses a raw address string into the canonical dedup key.
///
/// Total and deterministic: malformed input still yields some key. The output
/// is itself canonical, so `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len() + 8);
    for ch in raw.chars().flat_map(char::to_lowercase) {
        match ch {
            '.' | ',' => {}
            '#' => cleaned.push_str(" unit "),
            c if c.is_alphanumeric() => cleaned.push(c),
            _ => cleaned.push(' '),
        }
    }

    let mut tokens: Vec<&str> = Vec::new();
    let mut words = cleaned.split_whitespace();
    while let Some(word) = words.next() {
        if UNIT_MARKERS.contains(word) {
            // Swallow the unit identifier itself as well
            words.next();
            continue;
        }
        tokens.push(ABBREVIATIONS.get(word).copied().unwrap_or(word));
    }

    tokens.join(" ")
}

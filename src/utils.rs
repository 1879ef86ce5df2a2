use std::{cmp::Ordering, collections::HashSet, fmt};

use chrono::{DateTime, Utc};

use crate::types::{Release, ReleaseTableRow};

/// Known alternate names for major labels, keyed by lowercase canonical name.
const LABEL_ALIASES: &[(&str, &[&str])] = &[
    ("atlantic records", &["Atlantic", "Atlantic Recording Corporation"]),
    ("columbia records", &["Columbia", "Columbia Records Group"]),
    ("capitol records", &["Capitol", "Capitol Music Group"]),
    ("universal music", &["Universal Music Group", "UMG Recordings", "Universal"]),
    ("sony music", &["Sony Music Entertainment", "Sony Music Catalog"]),
    ("warner records", &["Warner Bros. Records", "Warner Music Group", "Warner"]),
    ("warner bros. records", &["Warner Records", "Warner"]),
    ("interscope records", &["Interscope", "Interscope Geffen A&M"]),
    ("def jam recordings", &["Def Jam", "Def Jam Records"]),
    ("rca records", &["RCA", "RCA Records Label"]),
    ("epic records", &["Epic"]),
    ("island records", &["Island", "Island Def Jam"]),
    ("republic records", &["Republic"]),
    ("parlophone records", &["Parlophone", "Parlophone UK"]),
    ("emi", &["EMI Records", "EMI Music"]),
    ("xl recordings", &["XL", "XL Recordings Ltd"]),
];

/// Trailing words that many catalogs omit from the label name.
const LABEL_SUFFIXES: &[&str] = &[
    " records",
    " recordings",
    " music",
    " entertainment",
    " label",
    " group",
    " ltd",
    " ltd.",
    " inc",
    " inc.",
];

/// Builds up to `max` alternate spellings for a label name.
///
/// Aliases from the known-label table come first, followed by generic
/// transforms: stripping a trailing suffix such as "Records", dropping a
/// leading "The", and appending " Records" to a bare name. The original
/// name itself is never part of the result and variants are unique
/// case-insensitively.
pub fn label_variants(name: &str, max: usize) -> Vec<String> {
    let name = name.trim();
    let lower = name.to_lowercase();

    let mut candidates: Vec<String> = Vec::new();

    if let Some((_, aliases)) = LABEL_ALIASES.iter().find(|(key, _)| *key == lower) {
        candidates.extend(aliases.iter().map(|a| a.to_string()));
    }

    let mut stripped = None;
    for suffix in LABEL_SUFFIXES {
        if lower.ends_with(suffix) && lower.len() > suffix.len() {
            let base = name
                .get(..name.len() - suffix.len())
                .unwrap_or_default()
                .trim_end_matches([',', ' ']);
            if !base.is_empty() {
                stripped = Some(base.to_string());
                candidates.push(base.to_string());
            }
            break;
        }
    }

    if lower.starts_with("the ") {
        if let Some(rest) = name.get(4..) {
            candidates.push(rest.to_string());
        }
    }

    if stripped.is_none() {
        candidates.push(format!("{name} Records"));
    }

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(lower);
    candidates
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .filter(|c| seen.insert(c.to_lowercase()))
        .take(max)
        .collect()
}

/// Splits `start..=end` into inclusive year ranges of `size` years.
///
/// The last range is clipped to `end`. An empty vector is returned when
/// `start > end` or `size` is not positive.
pub fn year_chunks(start: i32, end: i32, size: i32) -> Vec<(i32, i32)> {
    if size <= 0 || start > end {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut from = start;
    while from <= end {
        let to = (from + size - 1).min(end);
        chunks.push((from, to));
        from = to + 1;
    }
    chunks
}

/// Builds the provider search query for a label, optionally restricted to a
/// year range.
pub fn label_query(label: &str, years: Option<(i32, i32)>) -> String {
    let label = label.replace('"', "");
    match years {
        Some((from, to)) => format!("label:\"{label}\" year:{from}-{to}"),
        None => format!("label:\"{label}\""),
    }
}

/// Parses a `Retry-After` header given in delta-seconds.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

/// Deterministic cache key for a GET request.
///
/// Query pairs are sorted so logically identical requests share a key
/// regardless of parameter order.
pub fn cache_key(url: &str, query: &[(String, String)]) -> String {
    let mut pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    format!("{url}?{}", pairs.join("&"))
}

/// Opaque id for a saved catalog, derived from the label name.
pub fn catalog_id(name: &str) -> String {
    let mut id = String::new();
    let mut last_dash = true;
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            id.push(c);
            last_dash = false;
        } else if !last_dash {
            id.push('-');
            last_dash = true;
        }
    }
    id.trim_end_matches('-').to_string()
}

pub fn remove_duplicate_releases(releases: &mut Vec<Release>) {
    let mut seen_ids = HashSet::new();
    releases.retain(|release| seen_ids.insert(release.id.clone()));
}

pub fn sort_releases_by_date_and_artist(releases: &mut [Release]) {
    releases.sort_by(|a, b| {
        let date_cmp = b.release_date.cmp(&a.release_date);
        if date_cmp != Ordering::Equal {
            return date_cmp;
        }

        let a_artist = a.artists.first().map(|artist| &artist.name);
        let b_artist = b.artists.first().map(|artist| &artist.name);

        a_artist.cmp(&b_artist)
    });
}

pub fn sort_release_table_rows(rows: &mut [ReleaseTableRow]) {
    rows.sort_by(|a, b| match b.date.cmp(&a.date) {
        Ordering::Equal => a.artists.cmp(&b.artists),
        other => other,
    });
}

pub fn to_release_rows(releases: &[Release]) -> Vec<ReleaseTableRow> {
    let mut rows: Vec<ReleaseTableRow> = releases
        .iter()
        .map(|r| ReleaseTableRow {
            date: r.release_date.clone(),
            title: r.title.clone(),
            artists: r.artist_names(),
        })
        .collect();
    sort_release_table_rows(&mut rows);
    rows
}

pub fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Album,
    Single,
    AppearsOn,
    Compilation,
}

impl ReleaseKind {
    fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Album => "album",
            ReleaseKind::Single => "single",
            ReleaseKind::AppearsOn => "appears_on",
            ReleaseKind::Compilation => "compilation",
        }
    }
}

/// Set of release kinds, rendered as the provider's `include_groups` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseKinds(pub Vec<ReleaseKind>);

impl Default for ReleaseKinds {
    fn default() -> Self {
        ReleaseKinds(vec![ReleaseKind::Album, ReleaseKind::Single])
    }
}

impl fmt::Display for ReleaseKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{joined}")
    }
}

/// Parses a comma separated list of release kinds; `all` selects every kind.
pub fn parse_release_kinds(value: &str) -> Result<ReleaseKinds, String> {
    let mut kinds: Vec<ReleaseKind> = Vec::new();
    for part in value.split(',').map(|p| p.trim().to_lowercase()) {
        let parsed: &[ReleaseKind] = match part.as_str() {
            "album" => &[ReleaseKind::Album],
            "single" => &[ReleaseKind::Single],
            "appears_on" => &[ReleaseKind::AppearsOn],
            "compilation" => &[ReleaseKind::Compilation],
            "all" => &[
                ReleaseKind::Album,
                ReleaseKind::Single,
                ReleaseKind::AppearsOn,
                ReleaseKind::Compilation,
            ],
            "" => continue,
            other => return Err(format!("unknown release type: {other}")),
        };
        for kind in parsed {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
    }

    if kinds.is_empty() {
        return Err("no release type given".to_string());
    }
    Ok(ReleaseKinds(kinds))
}

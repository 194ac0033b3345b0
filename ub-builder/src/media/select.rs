//! Recording selection and ranking

use super::Candidate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Upper bound of recordings kept per species
pub const MAX_RECORDINGS: usize = 10;

/// Rating assumed when the archive has none
pub const DEFAULT_RATING: i64 = 1;

/// Minimum rating for background priority
pub const PRIORITY_MIN_RATING: i64 = 3;

/// Duration tiers in seconds, tried shortest first
pub const DURATION_TIERS: [u32; 2] = [30, 60];

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) s").expect("duration pattern is valid"));

/// Seconds from the first `<N> s` in a description
pub fn parse_duration(description: &str) -> Option<u32> {
    DURATION_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A recording chosen for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Selected<'a> {
    pub candidate: &'a Candidate,
    /// Spectrogram image sharing the recording's observation reference
    pub spectrogram: Option<&'a str>,
    pub duration: u32,
    pub rating: i64,
    /// Solo species with a good rating
    pub background_priority: bool,
}

/// Pick at most [`MAX_RECORDINGS`] recordings from one species' candidates
///
/// **Algorithm:**
/// 1. Split playable recordings from spectrogram images; map observation
///    reference to spectrogram URL (first image wins)
/// 2. Drop recordings repeating an earlier (rights holder, event date) pair
/// 3. Drop recordings without a parseable duration
/// 4. Keep only the shortest non-empty tier: ≤ 30 s, else ≤ 60 s, else all
/// 5. Default missing ratings to 1; priority = no associated taxa and rating ≥ 3
/// 6. Stable sort by priority desc, rating desc, duration asc and truncate
pub fn select_recordings<'a>(candidates: &[&'a Candidate]) -> Vec<Selected<'a>> {
    let mut spectrograms: HashMap<&'a str, &'a str> = HashMap::new();
    for &candidate in candidates.iter().filter(|c| c.is_spectrogram()) {
        if let Some(uri) = candidate.access_uri.as_deref() {
            spectrograms
                .entry(candidate.observation_ref.as_str())
                .or_insert(uri);
        }
    }

    let mut seen = HashSet::new();
    let mut selected: Vec<Selected<'a>> = candidates
        .iter()
        .copied()
        .filter(|c| c.is_playable())
        .filter(|&c| seen.insert((c.rights_holder.as_deref(), c.event_date.as_deref())))
        .filter_map(|c| {
            let duration = c.description.as_deref().and_then(parse_duration)?;
            let rating = c.rating.unwrap_or(DEFAULT_RATING);
            Some(Selected {
                candidate: c,
                spectrogram: spectrograms.get(c.observation_ref.as_str()).copied(),
                duration,
                rating,
                background_priority: c.associated_taxa.is_none() && rating >= PRIORITY_MIN_RATING,
            })
        })
        .collect();

    if let Some(limit) = DURATION_TIERS
        .into_iter()
        .find(|&limit| selected.iter().any(|s| s.duration <= limit))
    {
        selected.retain(|s| s.duration <= limit);
    }

    selected.sort_by(|a, b| {
        b.background_priority
            .cmp(&a.background_priority)
            .then(b.rating.cmp(&a.rating))
            .then(a.duration.cmp(&b.duration))
    });
    selected.truncate(MAX_RECORDINGS);
    selected
}

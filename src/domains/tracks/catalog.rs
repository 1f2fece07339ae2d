//! Track catalog - the fixed table of demonstration tracks.
//!
//! When adding a track, register it in `seed_tracks()`.

use std::collections::HashMap;

/// Id that never resolves, used to demonstrate the 404 envelope.
pub const MISSING_TRACK_ID: &str = "nonexistent";

const MAX_ID_LEN: usize = 64;
const SYNTHETIC_ARTIST: &str = "DIZI Demo Artist";

/// Track metadata returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration_ms: u64,
}

/// All tracks with stored metadata.
fn seed_tracks() -> Vec<Track> {
    vec![Track {
        id: "terimakasih".to_string(),
        title: "Terima Kasih Metadata".to_string(),
        artist: "DIZI Official".to_string(),
        duration_ms: 180_000,
    }]
}

/// In-memory track lookup. Read-only after construction.
#[derive(Debug, Clone)]
pub struct TrackCatalog {
    tracks: HashMap<String, Track>,
}

impl TrackCatalog {
    pub fn new() -> Self {
        let tracks = seed_tracks()
            .into_iter()
            .map(|track| (track.id.clone(), track))
            .collect();
        Self { tracks }
    }

    /// Resolve `id` case-insensitively.
    ///
    /// Returns `None` for the reserved missing id and for ids that are not
    /// short runs of letters, digits, `-` and `_`.
    pub fn find(&self, id: &str) -> Option<Track> {
        let key = id.trim().to_lowercase();
        if key == MISSING_TRACK_ID || !is_track_id(&key) {
            return None;
        }

        self.tracks
            .get(&key)
            .cloned()
            .or_else(|| Some(synthesize(&key)))
    }
}

impl Default for TrackCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn is_track_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Deterministic metadata for an id that is not in the table.
fn synthesize(id: &str) -> Track {
    let seed = id
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));

    Track {
        id: id.to_string(),
        title: format!("Session Track {}", id.to_uppercase()),
        artist: SYNTHETIC_ARTIST.to_string(),
        // Between 2:00 and 4:59
        duration_ms: 120_000 + (seed % 180) * 1_000,
    }
}

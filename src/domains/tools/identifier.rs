//! Artifact name generation.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide sequence closing the same-millisecond collision window.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a unique artifact file name such as `tts_1718000000123_0007_a1f3.mp3`.
///
/// The millisecond timestamp keeps names roughly sortable, the sequence makes
/// them unique within this process, and the random suffix keeps two processes
/// sharing one artifact directory apart.
pub fn new_artifact_name(kind: &str, ext: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) % 10_000;
    let suffix: u16 = rand::random();
    format!("{}_{}_{:04}_{:04x}.{}", kind, millis, seq, suffix, ext)
}

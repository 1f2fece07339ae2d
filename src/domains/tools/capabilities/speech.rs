//! Google Translate text-to-speech backend.
//!
//! The endpoint only accepts short texts, so input is split into chunks at
//! word boundaries and the MP3 segments are concatenated into one file.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{SpeechSynthesizer, SynthesisError};
use crate::core::config::TtsConfig;

const CONCURRENT_CHUNKS: usize = 4;

/// Speech synthesizer backed by the Google Translate TTS endpoint.
pub struct GoogleTtsSynthesizer {
    client: reqwest::Client,
    config: TtsConfig,
}

impl GoogleTtsSynthesizer {
    pub fn new(config: TtsConfig) -> Result<Self, SynthesisError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("tool-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SynthesisError::backend(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn chunk_url(&self, chunk: &str, lang: &str, idx: usize, total: usize) -> Result<String, SynthesisError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        let query = serde_urlencoded::to_string([
            ("ie", "UTF-8"),
            ("q", chunk),
            ("tl", lang),
            ("total", total.as_str()),
            ("idx", idx.as_str()),
            ("textlen", textlen.as_str()),
            ("client", "tw-ob"),
            ("prev", "input"),
            ("ttsspeed", "1"),
        ])
        .map_err(|e| SynthesisError::backend(e.to_string()))?;

        Ok(format!("{}?{}", self.config.endpoint, query))
    }

    async fn fetch_chunk(&self, url: &str, lang: &str) -> Result<bytes::Bytes, SynthesisError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SynthesisError::backend(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .bytes()
                .await
                .map_err(|e| SynthesisError::backend(e.to_string())),
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                Err(SynthesisError::UnsupportedLanguage(lang.to_string()))
            }
            status => Err(SynthesisError::backend(format!("HTTP {}", status))),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    #[instrument(skip(self, text), fields(lang = %lang, chars = text.chars().count()))]
    async fn synthesize(&self, text: &str, lang: &str, dest: &Path) -> Result<(), SynthesisError> {
        let chunks = split_text(text, self.config.chunk_chars);
        if chunks.is_empty() {
            return Err(SynthesisError::backend("nothing to synthesize"));
        }

        let total = chunks.len();
        let urls = chunks
            .iter()
            .enumerate()
            .map(|(idx, chunk)| self.chunk_url(chunk, lang, idx, total))
            .collect::<Result<Vec<_>, _>>()?;

        // Chunks are fetched a few at a time; `buffered` keeps them in order.
        let parts: Vec<bytes::Bytes> = stream::iter(urls.into_iter().enumerate())
            .map(|(idx, url)| async move {
                debug!("Fetching TTS chunk {}/{}", idx + 1, total);
                self.fetch_chunk(&url, lang).await
            })
            .buffered(CONCURRENT_CHUNKS)
            .try_collect()
            .await?;
        let audio = parts.concat();

        tokio::fs::write(dest, &audio).await?;
        info!("Wrote {} bytes of audio to {}", audio.len(), dest.display());
        Ok(())
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Whitespace is collapsed and chunks break between words. A chunk is closed
/// early after sentence punctuation once it is at least half full, so pauses
/// fall where the text has them. Words longer than `max_chars` are cut.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word_chars: Vec<char> = word.chars().collect();

        while word_chars.len() > max_chars {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word_chars.split_off(max_chars);
            chunks.push(word_chars.into_iter().collect());
            word_chars = rest;
        }

        let word_len = word_chars.len();
        if word_len == 0 {
            continue;
        }

        let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word_chars.iter());
        current_len += word_len;

        let ends_sentence = matches!(word_chars.last(), Some('.' | '!' | '?' | ';' | ':'));
        if ends_sentence && current_len * 2 >= max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }

    if current_len > 0 {
        chunks.push(current);
    }

    chunks
}

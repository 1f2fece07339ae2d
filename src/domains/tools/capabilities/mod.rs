//! Capability adapters.
//!
//! Each external operation the gateway performs sits behind one narrow,
//! async trait. The gateway depends only on these traits; the concrete
//! backends in this module are wired in at startup and replaced by test
//! doubles in tests.

mod error;
mod file_writer;
mod speech;
mod whois;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::ToolsConfig;

pub use error::{LookupError, SynthesisError, WriteError};
pub use file_writer::LocalFileWriter;
pub use speech::{GoogleTtsSynthesizer, split_text};
pub use whois::{TcpWhoisLookup, find_referral};

/// Turns text into an audio artifact.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` in `lang` and write the audio to `dest`.
    async fn synthesize(&self, text: &str, lang: &str, dest: &Path) -> Result<(), SynthesisError>;
}

/// Queries domain registration data.
#[async_trait]
pub trait DomainLookup: Send + Sync {
    /// Return the raw registry text for `domain`, failing once `timeout` elapses.
    async fn lookup(&self, domain: &str, timeout: Duration) -> Result<String, LookupError>;
}

/// Writes artifact content to an already sanitized path.
#[async_trait]
pub trait FileWriter: Send + Sync {
    async fn write(&self, path: &Path, content: &[u8]) -> Result<(), WriteError>;
}

/// The set of adapters a gateway dispatches to.
#[derive(Clone)]
pub struct Capabilities {
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub whois: Arc<dyn DomainLookup>,
    pub files: Arc<dyn FileWriter>,
}

impl Capabilities {
    /// Build the production adapters from configuration.
    pub fn from_config(config: &ToolsConfig) -> Result<Self, SynthesisError> {
        Ok(Self {
            speech: Arc::new(GoogleTtsSynthesizer::new(config.tts.clone())?),
            whois: Arc::new(TcpWhoisLookup::new(config.whois.clone())),
            files: Arc::new(LocalFileWriter),
        })
    }
}

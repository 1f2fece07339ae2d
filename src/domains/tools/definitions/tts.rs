//! Text-to-speech tool definition.
//!
//! Turns text into an MP3 artifact and returns a URL the caller can stream
//! it from. The artifact name is always generated, never taken from input.

use tracing::debug;

use crate::core::config::Config;
use crate::core::security::sanitize;
use crate::domains::tools::artifact::ArtifactRef;
use crate::domains::tools::envelope::ResponseEnvelope;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::identifier::new_artifact_name;

/// A validated TTS request, ready for the speech synthesizer.
#[derive(Debug, Clone)]
pub struct TtsPlan {
    pub text: String,
    pub lang: String,
    pub artifact: ArtifactRef,
}

/// Text-to-speech tool.
pub struct TtsTool;

impl TtsTool {
    /// Tool name as listed by the registry.
    pub const NAME: &'static str = "tts";

    /// Route the tool is served on.
    pub const PATH: &'static str = "/api/v1/tools/tts";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Convert text to speech. Body: {text, lang?}. \
         Returns the generated MP3 file name and a stream URL.";

    const ARTIFACT_KIND: &'static str = "tts";
    const EXTENSION: &'static str = "mp3";

    /// Validate the request and reserve an artifact path for it.
    pub fn plan(text: &str, lang: Option<&str>, config: &Config) -> Result<TtsPlan, ToolError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ToolError::validation("text is required."));
        }

        let max_chars = config.tools.max_text_chars;
        if text.chars().count() > max_chars {
            return Err(ToolError::validation(format!(
                "text must be at most {} characters.",
                max_chars
            )));
        }

        let lang = lang
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(config.tools.default_lang.as_str());
        if !is_language_tag(lang) {
            return Err(ToolError::validation(
                "lang must be a language code such as 'id' or 'en-US'.",
            ));
        }

        let name = new_artifact_name(Self::ARTIFACT_KIND, Self::EXTENSION);
        let safe = sanitize(&name, &config.artifacts.root_dir)?;
        debug!("Reserved TTS artifact {}", safe.file_name);

        Ok(TtsPlan {
            text: text.to_string(),
            lang: lang.to_string(),
            artifact: ArtifactRef::new(safe, config),
        })
    }

    /// Envelope returned once the audio file exists.
    pub fn success(artifact: &ArtifactRef) -> ResponseEnvelope {
        ResponseEnvelope::success("TTS file created successfully.")
            .with("filename", artifact.relative_name.as_str())
            .with("stream_url", artifact.public_url.as_str())
    }
}

/// Accepts `xx`, `xxx` and `xx-REGION` style tags.
fn is_language_tag(lang: &str) -> bool {
    let (primary, region) = match lang.split_once('-') {
        Some((primary, region)) => (primary, Some(region)),
        None => (lang, None),
    };

    let primary_ok = (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
    let region_ok = region.is_none_or(|r| {
        (2..=8).contains(&r.len()) && r.chars().all(|c| c.is_ascii_alphanumeric())
    });

    primary_ok && region_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_root(root: &TempDir) -> Config {
        let mut config = Config::default();
        config.artifacts.root_dir = root.path().to_path_buf();
        config
    }

    #[test]
    fn test_plan_uses_default_lang() {
        let root = TempDir::new().unwrap();
        let plan = TtsTool::plan("  Terima kasih ", None, &config_with_root(&root)).unwrap();

        assert_eq!(plan.text, "Terima kasih");
        assert_eq!(plan.lang, "id");
        assert!(plan.artifact.relative_name.starts_with("tts_"));
        assert!(plan.artifact.relative_name.ends_with(".mp3"));
        assert!(plan
            .artifact
            .absolute_path
            .starts_with(root.path().canonicalize().unwrap()));
        assert!(plan.artifact.public_url.ends_with(&plan.artifact.relative_name));
    }

    #[test]
    fn test_plan_blank_lang_falls_back() {
        let root = TempDir::new().unwrap();
        let plan = TtsTool::plan("hello", Some("  "), &config_with_root(&root)).unwrap();
        assert_eq!(plan.lang, "id");
    }

    #[test]
    fn test_plan_rejects_empty_text() {
        let root = TempDir::new().unwrap();
        let err = TtsTool::plan(" \n ", Some("en"), &config_with_root(&root)).unwrap_err();
        assert!(matches!(err, ToolError::Validation(ref m) if m.contains("text")));
    }

    #[test]
    fn test_plan_rejects_long_text() {
        let root = TempDir::new().unwrap();
        let mut config = config_with_root(&root);
        config.tools.max_text_chars = 5;
        assert!(TtsTool::plan("too long text", None, &config).is_err());
    }

    #[test]
    fn test_plan_rejects_bad_lang() {
        let root = TempDir::new().unwrap();
        let err = TtsTool::plan("hi", Some("../en"), &config_with_root(&root)).unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[test]
    fn test_language_tags() {
        assert!(is_language_tag("id"));
        assert!(is_language_tag("fil"));
        assert!(is_language_tag("en-US"));
        assert!(is_language_tag("zh-Hant"));
        assert!(!is_language_tag("e"));
        assert!(!is_language_tag("english"));
        assert!(!is_language_tag("en-"));
        assert!(!is_language_tag("en US"));
    }

    #[test]
    fn test_success_envelope() {
        let root = TempDir::new().unwrap();
        let plan = TtsTool::plan("hi", None, &config_with_root(&root)).unwrap();
        let envelope = TtsTool::success(&plan.artifact);

        assert!(envelope.is_success());
        assert_eq!(
            envelope.field("filename").and_then(|v| v.as_str()),
            Some(plan.artifact.relative_name.as_str())
        );
        assert_eq!(
            envelope.field("stream_url").and_then(|v| v.as_str()),
            Some(plan.artifact.public_url.as_str())
        );
    }
}

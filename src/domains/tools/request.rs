//! Tool request types.
//!
//! Bodies are deserialized leniently (every field optional) so that a
//! missing field reaches validation and gets a field-specific message instead
//! of a generic parse error.

use serde::Deserialize;

/// Body of `POST /api/v1/tools/tts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TtsBody {
    pub text: Option<String>,
    pub lang: Option<String>,
}

/// Body of `POST /api/v1/tools/whois`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WhoisBody {
    pub domain: Option<String>,
}

/// Body of `POST /api/v1/tools/createfile`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateFileBody {
    pub filename: Option<String>,
    pub content: Option<String>,
}

/// The tool endpoints the gateway dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Tts,
    Whois,
    CreateFile,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tts => "tts",
            Self::Whois => "whois",
            Self::CreateFile => "createfile",
        }
    }
}

/// A tool request as received, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Tts { text: String, lang: Option<String> },
    Whois { domain: String },
    CreateFile { filename: String, content: String },
}

impl ToolRequest {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Tts { .. } => ToolKind::Tts,
            Self::Whois { .. } => ToolKind::Whois,
            Self::CreateFile { .. } => ToolKind::CreateFile,
        }
    }
}

impl From<TtsBody> for ToolRequest {
    fn from(body: TtsBody) -> Self {
        Self::Tts {
            text: body.text.unwrap_or_default(),
            lang: body.lang,
        }
    }
}

impl From<WhoisBody> for ToolRequest {
    fn from(body: WhoisBody) -> Self {
        Self::Whois {
            domain: body.domain.unwrap_or_default(),
        }
    }
}

impl From<CreateFileBody> for ToolRequest {
    fn from(body: CreateFileBody) -> Self {
        Self::CreateFile {
            filename: body.filename.unwrap_or_default(),
            content: body.content.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_become_empty() {
        let body: TtsBody = serde_json::from_str("{}").unwrap();
        assert_eq!(
            ToolRequest::from(body),
            ToolRequest::Tts {
                text: String::new(),
                lang: None
            }
        );
    }

    #[test]
    fn test_null_field_is_missing() {
        let body: WhoisBody = serde_json::from_str(r#"{"domain": null}"#).unwrap();
        assert_eq!(body.domain, None);
    }

    #[test]
    fn test_form_body() {
        let body: CreateFileBody =
            serde_urlencoded::from_str("filename=hello.txt&content=hi+there").unwrap();
        assert_eq!(body.filename.as_deref(), Some("hello.txt"));
        assert_eq!(body.content.as_deref(), Some("hi there"));
    }

    #[test]
    fn test_kind_names() {
        let request = ToolRequest::from(CreateFileBody::default());
        assert_eq!(request.kind(), ToolKind::CreateFile);
        assert_eq!(request.kind().name(), "createfile");
    }
}

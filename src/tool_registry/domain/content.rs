//! Tool output content, as reported by hosts and in canonical form.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

/// Mime type assumed for images that do not declare one.
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/png";

/// One output item as reported by a tool-server host adapter.
///
/// Host adapters classify the transport's result shapes once, at their
/// boundary, into these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolContent {
    /// Textual output.
    Text(String),
    /// Binary image data, usually base64 encoded.
    Image {
        /// Encoded image payload.
        data: String,
        /// Declared mime type, when the server supplied one.
        mime_type: Option<String>,
    },
    /// Structured item passed through to the caller unchanged.
    Structured(Map<String, Value>),
    /// Any other shape; rendered as text.
    Opaque(Value),
}

/// Canonical content item of a tool call response.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    /// `{type: "text", text}`.
    Text {
        /// Text payload.
        text: String,
    },
    /// `{type: "image", data, mimeType}`.
    Image {
        /// Encoded image payload.
        data: String,
        /// Image mime type.
        mime_type: String,
    },
    /// Structured item serialised as-is.
    Raw(Map<String, Value>),
}

impl ContentItem {
    /// Creates a text item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Returns the image as a `data:` URI, for image items with data.
    #[must_use]
    pub fn image_data_uri(&self) -> Option<String> {
        match self {
            Self::Image { data, mime_type } if !data.is_empty() => {
                Some(format!("data:{mime_type};base64,{data}"))
            }
            _ => None,
        }
    }

    /// Renders the item as plain text for a transcript.
    #[must_use]
    pub fn render_text(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Image { mime_type, .. } => format!("[image: {mime_type}]"),
            Self::Raw(object) => Value::Object(object.clone()).to_string(),
        }
    }
}

impl From<ToolContent> for ContentItem {
    fn from(content: ToolContent) -> Self {
        match content {
            ToolContent::Text(text) => Self::Text { text },
            ToolContent::Image { data, mime_type } => Self::Image {
                data,
                mime_type: mime_type.unwrap_or_else(|| DEFAULT_IMAGE_MIME_TYPE.to_owned()),
            },
            ToolContent::Structured(object) => Self::Raw(object),
            ToolContent::Opaque(Value::String(text)) => Self::Text { text },
            ToolContent::Opaque(other) => Self::Text {
                text: other.to_string(),
            },
        }
    }
}

impl Serialize for ContentItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text { text } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "text")?;
                map.serialize_entry("text", text)?;
                map.end()
            }
            Self::Image { data, mime_type } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "image")?;
                map.serialize_entry("data", data)?;
                map.serialize_entry("mimeType", mime_type)?;
                map.end()
            }
            Self::Raw(object) => object.serialize(serializer),
        }
    }
}

/// Normalised result of one dispatched tool call.
///
/// Dispatch failures are values of this type too: a single text item with
/// `is_error` set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResponse {
    content: Vec<ContentItem>,
    is_error: bool,
}

impl ToolCallResponse {
    /// Creates a successful response from host output.
    #[must_use]
    pub fn success(content: impl IntoIterator<Item = ToolContent>) -> Self {
        Self {
            content: content.into_iter().map(ContentItem::from).collect(),
            is_error: false,
        }
    }

    /// Creates an error-flagged response carrying `message`.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(message)],
            is_error: true,
        }
    }

    /// Returns the canonical content items.
    #[must_use]
    pub fn content(&self) -> &[ContentItem] {
        &self.content
    }

    /// Returns whether the call failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }

    /// Concatenates the rendered text of every item.
    #[must_use]
    pub fn text(&self) -> String {
        self.content.iter().map(ContentItem::render_text).collect()
    }

    /// Returns `data:` URIs for every image item.
    #[must_use]
    pub fn image_data_uris(&self) -> Vec<String> {
        self.content
            .iter()
            .filter_map(ContentItem::image_data_uri)
            .collect()
    }
}

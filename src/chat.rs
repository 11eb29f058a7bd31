//! Chat message JSON, as used for status descriptions, login cancellation reasons, and play
//! disconnect reasons. Only the plain-text subset is needed by this core: formatting flags and
//! nested `extra` components, but no click/hover events.

use serde::Serialize;

/// A single chat message component. Boolean formatting flags and `extra` are omitted from the
/// encoded JSON when left at their default (empty/false) values.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub text: String,

    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub obfuscated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<ChatMessage>,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl ChatMessage {
    /// A plain-text message with no formatting.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            underlined: false,
            strikethrough: false,
            obfuscated: false,
            font: None,
            extra: Vec::new(),
        }
    }

    /// Serializes this message to its JSON representation, as sent over the wire.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("chat message serialization is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_omits_empty_fields() {
        let message = ChatMessage::plain("hello");
        assert_eq!(message.to_json(), r#"{"text":"hello"}"#);
    }

    #[test]
    fn bold_flag_is_included_when_set() {
        let mut message = ChatMessage::plain("hello");
        message.bold = true;
        assert_eq!(message.to_json(), r#"{"text":"hello","bold":true}"#);
    }

    #[test]
    fn nested_extra_is_included_when_present() {
        let mut message = ChatMessage::plain("hello ");
        message.extra.push(ChatMessage::plain("world"));
        assert_eq!(
            message.to_json(),
            r#"{"text":"hello ","extra":[{"text":"world"}]}"#
        );
    }
}

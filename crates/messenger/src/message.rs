//! Outbound message model and its Send API wire encoding.

use serde::Serialize;

/// One reply to send to a user. Built fresh per reply and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text(String),
    /// Text followed by tappable quick-reply chips.
    QuickReplies {
        text: String,
        choices: Vec<QuickReply>,
    },
    /// Carousel of elements.
    GenericTemplate { elements: Vec<Element> },
    /// Typing indicator or seen marker; carries no message body.
    Action(SenderAction),
}

impl OutboundMessage {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Short label for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Text(_) => "text".into(),
            Self::QuickReplies { choices, .. } => format!("quick_replies({})", choices.len()),
            Self::GenericTemplate { elements } => format!("generic_template({})", elements.len()),
            Self::Action(action) => action.as_str().into(),
        }
    }

    /// Build the JSON body for `POST /me/messages`.
    #[must_use]
    pub fn to_request<'a>(&'a self, recipient_id: &'a str) -> SendRequest<'a> {
        let recipient = Recipient { id: recipient_id };
        match self {
            Self::Action(action) => SendRequest {
                recipient,
                messaging_type: None,
                message: None,
                sender_action: Some(*action),
            },
            Self::Text(text) => SendRequest::message(recipient, WireMessage {
                text: Some(text.as_str()),
                ..Default::default()
            }),
            Self::QuickReplies { text, choices } => SendRequest::message(recipient, WireMessage {
                text: Some(text.as_str()),
                quick_replies: choices.iter().map(WireQuickReply::from).collect(),
                ..Default::default()
            }),
            Self::GenericTemplate { elements } => SendRequest::message(recipient, WireMessage {
                attachment: Some(WireAttachment {
                    kind: "template",
                    payload: TemplatePayload {
                        template_type: "generic",
                        elements: elements.as_slice(),
                    },
                }),
                ..Default::default()
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickReply {
    pub title: String,
    pub payload: String,
}

impl QuickReply {
    #[must_use]
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            payload: payload.into(),
        }
    }
}

/// A generic template card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Button {
    /// Sends `payload` back as a postback event when tapped.
    Postback { title: String, payload: String },
    WebUrl { title: String, url: String },
    /// Dials `payload`, an E.164 phone number.
    PhoneNumber { title: String, payload: String },
}

impl Button {
    #[must_use]
    pub fn postback(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Postback {
            title: title.into(),
            payload: payload.into(),
        }
    }

    #[must_use]
    pub fn web_url(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::WebUrl {
            title: title.into(),
            url: url.into(),
        }
    }

    #[must_use]
    pub fn phone_number(title: impl Into<String>, number: impl Into<String>) -> Self {
        Self::PhoneNumber {
            title: title.into(),
            payload: number.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderAction {
    TypingOn,
    TypingOff,
    MarkSeen,
}

impl SenderAction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypingOn => "typing_on",
            Self::TypingOff => "typing_off",
            Self::MarkSeen => "mark_seen",
        }
    }
}

// ── Wire encoding ───────────────────────────────────────────────────────────

/// Serialized body of a Send API call.
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    recipient: Recipient<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    messaging_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender_action: Option<SenderAction>,
}

impl<'a> SendRequest<'a> {
    fn message(recipient: Recipient<'a>, message: WireMessage<'a>) -> Self {
        Self {
            recipient,
            messaging_type: Some("RESPONSE"),
            message: Some(message),
            sender_action: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Debug, Default, Serialize)]
struct WireMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    quick_replies: Vec<WireQuickReply<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<WireAttachment<'a>>,
}

#[derive(Debug, Serialize)]
struct WireQuickReply<'a> {
    content_type: &'static str,
    title: &'a str,
    payload: &'a str,
}

impl<'a> From<&'a QuickReply> for WireQuickReply<'a> {
    fn from(reply: &'a QuickReply) -> Self {
        Self {
            content_type: "text",
            title: &reply.title,
            payload: &reply.payload,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireAttachment<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    payload: TemplatePayload<'a>,
}

#[derive(Debug, Serialize)]
struct TemplatePayload<'a> {
    template_type: &'static str,
    elements: &'a [Element],
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, serde_json::json};

    fn encode(message: &OutboundMessage) -> serde_json::Value {
        serde_json::to_value(message.to_request("42")).unwrap()
    }

    #[test]
    fn encodes_text() {
        assert_eq!(
            encode(&OutboundMessage::text("hello")),
            json!({
                "recipient": {"id": "42"},
                "messaging_type": "RESPONSE",
                "message": {"text": "hello"}
            })
        );
    }

    #[test]
    fn encodes_quick_replies() {
        let message = OutboundMessage::QuickReplies {
            text: "Pick one".into(),
            choices: vec![QuickReply::new("Menu", "MENU_PAYLOAD")],
        };
        assert_eq!(
            encode(&message)["message"],
            json!({
                "text": "Pick one",
                "quick_replies": [
                    {"content_type": "text", "title": "Menu", "payload": "MENU_PAYLOAD"}
                ]
            })
        );
    }

    #[test]
    fn encodes_generic_template() {
        let message = OutboundMessage::GenericTemplate {
            elements: vec![Element {
                title: "Pasta".into(),
                subtitle: None,
                image_url: Some("https://x.example/pasta.jpg".into()),
                buttons: vec![
                    Button::postback("Back", "BACK"),
                    Button::web_url("Map", "https://maps.example"),
                    Button::phone_number("Call", "+15551234567"),
                ],
            }],
        };
        assert_eq!(
            encode(&message)["message"],
            json!({
                "attachment": {
                    "type": "template",
                    "payload": {
                        "template_type": "generic",
                        "elements": [{
                            "title": "Pasta",
                            "image_url": "https://x.example/pasta.jpg",
                            "buttons": [
                                {"type": "postback", "title": "Back", "payload": "BACK"},
                                {"type": "web_url", "title": "Map", "url": "https://maps.example"},
                                {"type": "phone_number", "title": "Call", "payload": "+15551234567"}
                            ]
                        }]
                    }
                }
            })
        );
    }

    #[test]
    fn encodes_sender_action_without_message() {
        assert_eq!(
            encode(&OutboundMessage::Action(SenderAction::TypingOn)),
            json!({"recipient": {"id": "42"}, "sender_action": "typing_on"})
        );
    }

    #[test]
    fn describes_for_logs() {
        assert_eq!(OutboundMessage::text("x").describe(), "text");
        assert_eq!(
            OutboundMessage::GenericTemplate { elements: vec![] }.describe(),
            "generic_template(0)"
        );
        assert_eq!(
            OutboundMessage::Action(SenderAction::MarkSeen).describe(),
            "mark_seen"
        );
    }
}

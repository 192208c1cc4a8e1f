//! Messenger profile: the Get Started button, greeting text and persistent
//! menu shown before and during a conversation.

use serde::Serialize;

use crate::message::Button;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessengerProfile {
    get_started: GetStarted,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    greeting: Vec<LocalizedGreeting>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    persistent_menu: Vec<PersistentMenu>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct GetStarted {
    payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct LocalizedGreeting {
    locale: &'static str,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PersistentMenu {
    locale: &'static str,
    composer_input_disabled: bool,
    call_to_actions: Vec<Button>,
}

impl MessengerProfile {
    /// Profile whose Get Started button posts back `payload`.
    #[must_use]
    pub fn new(get_started_payload: impl Into<String>) -> Self {
        Self {
            get_started: GetStarted {
                payload: get_started_payload.into(),
            },
            greeting: Vec::new(),
            persistent_menu: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_greeting(mut self, text: impl Into<String>) -> Self {
        self.greeting = vec![LocalizedGreeting {
            locale: "default",
            text: text.into(),
        }];
        self
    }

    #[must_use]
    pub fn with_menu(mut self, buttons: Vec<Button>) -> Self {
        self.persistent_menu = if buttons.is_empty() {
            Vec::new()
        } else {
            vec![PersistentMenu {
                locale: "default",
                composer_input_disabled: false,
                call_to_actions: buttons,
            }]
        };
        self
    }

    #[must_use]
    pub fn get_started_payload(&self) -> &str {
        &self.get_started.payload
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn minimal_profile_only_has_get_started() {
        let profile = MessengerProfile::new("GO");
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({"get_started": {"payload": "GO"}})
        );
    }

    #[test]
    fn full_profile_encoding() {
        let profile = MessengerProfile::new("GO")
            .with_greeting("Hello {{user_first_name}}")
            .with_menu(vec![Button::postback("Menu", "MENU")]);
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({
                "get_started": {"payload": "GO"},
                "greeting": [{"locale": "default", "text": "Hello {{user_first_name}}"}],
                "persistent_menu": [{
                    "locale": "default",
                    "composer_input_disabled": false,
                    "call_to_actions": [{"type": "postback", "title": "Menu", "payload": "MENU"}]
                }]
            })
        );
    }

    #[test]
    fn empty_menu_is_omitted() {
        let profile = MessengerProfile::new("GO").with_menu(Vec::new());
        assert!(serde_json::to_value(&profile).unwrap().get("persistent_menu").is_none());
        assert_eq!(profile.get_started_payload(), "GO");
    }
}

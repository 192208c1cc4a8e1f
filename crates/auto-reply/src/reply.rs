use std::{collections::HashSet, path::Path, time::Duration};

use {
    bistro_config::RepliesConfig,
    bistro_messenger::{Button, Element, OutboundMessage, QuickReply, SenderAction},
    tracing::warn,
};

use crate::{
    content::{self, Dish},
    keywords::{Action, payload},
};

/// One message of a reply, sent `delay` after the previous step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyStep {
    pub delay: Duration,
    pub message: OutboundMessage,
}

/// Ordered messages answering a single event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyPlan {
    pub steps: Vec<ReplyStep>,
}

impl ReplyPlan {
    fn now(mut self, message: OutboundMessage) -> Self {
        self.steps.push(ReplyStep {
            delay: Duration::ZERO,
            message,
        });
        self
    }

    fn after(mut self, delay: Duration, message: OutboundMessage) -> Self {
        self.steps.push(ReplyStep { delay, message });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Builds canned replies. Building never fails; only sending can.
#[derive(Debug, Clone)]
pub struct Composer {
    base_url: String,
    follow_up_delay: Duration,
    typing_indicator: bool,
    /// Image paths absent from the assets directory; cards skip them.
    missing_images: HashSet<&'static str>,
}

impl Composer {
    /// `server_url` is the public base URL that serves the image assets.
    #[must_use]
    pub fn new(server_url: &str, replies: &RepliesConfig) -> Self {
        Self {
            base_url: server_url.trim_end_matches('/').to_string(),
            follow_up_delay: Duration::from_millis(replies.follow_up_delay_ms),
            typing_indicator: replies.typing_indicator,
            missing_images: HashSet::new(),
        }
    }

    /// Drop `image_url` from cards whose image is not under `assets_dir`.
    #[must_use]
    pub fn with_assets_dir(mut self, assets_dir: &Path) -> Self {
        self.missing_images = content::image_paths()
            .filter(|path| !assets_dir.join(path).is_file())
            .collect();
        if !self.missing_images.is_empty() {
            warn!(
                assets_dir = %assets_dir.display(),
                missing = self.missing_images.len(),
                "reply images not found, cards will be sent without them"
            );
        }
        self
    }

    /// The messages to send for `action`; empty for log-only actions.
    #[must_use]
    pub fn plan(&self, action: Action) -> ReplyPlan {
        let plan = ReplyPlan::default();
        let plan = match action {
            Action::Reserved | Action::GetStarted => return plan,
            Action::MainMenu => plan.now(self.main_menu()),
            Action::AllSpecials => plan.now(self.all_specials()),
            Action::DailySpecial => plan.now(self.daily_special()),
            Action::PartySpecial => plan.now(self.party_special()),
            Action::Location => plan
                .now(self.location())
                .after(self.follow_up_delay, self.action_menu()),
            Action::OpeningHours => plan
                .now(self.hours_text())
                .after(self.follow_up_delay, self.action_menu()),
            Action::HoursText => plan.now(self.hours_text()),
            Action::ActionMenu => plan.now(self.action_menu()),
            Action::SpecialPrompt => plan.now(self.special_prompt()),
            Action::Welcome => plan.now(self.welcome()),
            Action::WelcomeWithGreeting => plan
                .now(self.welcome())
                .after(self.follow_up_delay, self.greeting()),
            Action::OptinConfirmation => plan.now(self.optin_confirmation()),
        };

        if self.typing_indicator {
            let mut steps = Vec::with_capacity(plan.steps.len() + 1);
            steps.push(ReplyStep {
                delay: Duration::ZERO,
                message: OutboundMessage::Action(SenderAction::TypingOn),
            });
            steps.extend(plan.steps);
            ReplyPlan { steps }
        } else {
            plan
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn image(&self, path: &'static str) -> Option<String> {
        (!self.missing_images.contains(path)).then(|| self.url(path))
    }

    fn card(&self, dish: &Dish, buttons: Vec<Button>) -> Element {
        Element {
            title: dish.title.to_string(),
            subtitle: Some(dish.subtitle.to_string()),
            image_url: self.image(dish.image),
            buttons,
        }
    }

    #[must_use]
    pub fn main_menu(&self) -> OutboundMessage {
        let elements = content::MENU_SECTIONS
            .iter()
            .map(|(dish, anchor)| {
                self.card(dish, vec![
                    Button::web_url(
                        "View dishes",
                        format!("{}#{anchor}", self.url(content::MENU_PAGE)),
                    ),
                    Button::postback("Specials", payload::MAIN_MENU_BACK),
                    Button::postback("Back", payload::BACK),
                ])
            })
            .collect();
        OutboundMessage::GenericTemplate { elements }
    }

    #[must_use]
    pub fn all_specials(&self) -> OutboundMessage {
        let elements = content::ALL_SPECIALS
            .iter()
            .map(|dish| {
                self.card(dish, vec![
                    Button::phone_number("Reserve a table", content::PHONE),
                    Button::postback("Back", payload::SPECIAL_BACK),
                ])
            })
            .collect();
        OutboundMessage::GenericTemplate { elements }
    }

    #[must_use]
    pub fn daily_special(&self) -> OutboundMessage {
        OutboundMessage::GenericTemplate {
            elements: vec![self.card(&content::DAILY_SPECIAL, vec![
                Button::postback("All specials", payload::ALL_SPECIAL),
                Button::postback("Back", payload::SPECIAL_BACK),
            ])],
        }
    }

    #[must_use]
    pub fn party_special(&self) -> OutboundMessage {
        OutboundMessage::GenericTemplate {
            elements: vec![self.card(&content::PARTY_SPECIAL, vec![
                Button::phone_number("Book a party", content::PHONE),
                Button::postback("All specials", payload::ALL_SPECIAL),
                Button::postback("Back", payload::SPECIAL_BACK),
            ])],
        }
    }

    #[must_use]
    pub fn location(&self) -> OutboundMessage {
        OutboundMessage::GenericTemplate {
            elements: vec![Element {
                title: content::RESTAURANT_NAME.to_string(),
                subtitle: Some(content::ADDRESS.to_string()),
                image_url: self.image(content::MAP_IMAGE),
                buttons: vec![
                    Button::web_url("Open in Maps", content::MAPS_URL),
                    Button::phone_number("Call us", content::PHONE),
                    Button::postback("Back", payload::LOCATION_BACK),
                ],
            }],
        }
    }

    #[must_use]
    pub fn hours_text(&self) -> OutboundMessage {
        OutboundMessage::text(content::OPENING_HOURS)
    }

    #[must_use]
    pub fn action_menu(&self) -> OutboundMessage {
        OutboundMessage::QuickReplies {
            text: content::ACTION_MENU_PROMPT.to_string(),
            choices: vec![
                QuickReply::new("Menu", payload::MENU),
                QuickReply::new("Specials", payload::ALL_SPECIAL),
                QuickReply::new("Location", payload::LOCATION),
                QuickReply::new("Opening hours", payload::OPENING_HOURS),
            ],
        }
    }

    #[must_use]
    pub fn special_prompt(&self) -> OutboundMessage {
        OutboundMessage::QuickReplies {
            text: content::SPECIAL_PROMPT.to_string(),
            choices: vec![
                QuickReply::new("Today's special", payload::DAILY_SPECIAL),
                QuickReply::new("Party special", payload::PARTY_SPECIAL),
                QuickReply::new("All specials", payload::ALL_SPECIAL),
                QuickReply::new("Back", payload::BACK),
            ],
        }
    }

    #[must_use]
    pub fn welcome(&self) -> OutboundMessage {
        OutboundMessage::GenericTemplate {
            elements: vec![Element {
                title: format!("Welcome to {}", content::RESTAURANT_NAME),
                subtitle: Some(content::TAGLINE.to_string()),
                image_url: self.image(content::LOGO_IMAGE),
                buttons: vec![
                    Button::postback("Menu", payload::MENU),
                    Button::postback("Location", payload::LOCATION),
                    Button::postback("Opening hours", payload::OPENING_HOURS),
                ],
            }],
        }
    }

    #[must_use]
    pub fn greeting(&self) -> OutboundMessage {
        OutboundMessage::text(content::GREETING)
    }

    #[must_use]
    pub fn optin_confirmation(&self) -> OutboundMessage {
        OutboundMessage::text(content::OPTIN_CONFIRMATION)
    }
}

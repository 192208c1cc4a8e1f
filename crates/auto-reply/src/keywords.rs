//! Keyword and postback tables.
//!
//! Text keywords are matched after lowercasing; payload tokens are compared
//! verbatim. Several keys may map to the same action.

/// Postback and quick-reply payload tokens.
pub mod payload {
    pub const MENU: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_MENU";
    pub const LOCATION: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_LOCATION";
    pub const OPENING_HOURS: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_OPENING_HOURS";
    pub const ALL_SPECIAL: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_ALL_SPECIAL";
    pub const DAILY_SPECIAL: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_DAILY_SPECIAL";
    pub const PARTY_SPECIAL: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_PARTY_SPECIAL";
    pub const REVIEWS: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_REVIEWS";
    pub const BACK: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_BACK";
    pub const SPECIAL_BACK: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_SPECIAL_BACK";
    pub const LOCATION_BACK: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_LOCATION_BACK";
    pub const MAIN_MENU_BACK: &str = "DEVELOPER_DEFINED_PAYLOAD_FOR_MAIN_MENU_BACK";
    pub const GET_STARTED: &str = "GET_STARTED_BUTTON_PAYLOAD";
}

/// What to do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MainMenu,
    AllSpecials,
    DailySpecial,
    PartySpecial,
    /// Location card, then the action-menu prompt after the follow-up delay.
    Location,
    /// Hours text, then the action-menu prompt after the follow-up delay.
    OpeningHours,
    /// Hours text alone (typed keyword).
    HoursText,
    /// Quick-reply prompt: menu, specials, location, hours.
    ActionMenu,
    /// Quick-reply prompt: daily, party, all specials, back.
    SpecialPrompt,
    Welcome,
    /// Welcome card, then a greeting text after the follow-up delay.
    WelcomeWithGreeting,
    OptinConfirmation,
    /// Recognised but intentionally unanswered.
    Reserved,
    /// Get Started tapped; logged only.
    GetStarted,
}

const KEYWORDS: &[(&str, Action)] = &[
    ("today's special", Action::AllSpecials),
    ("todays special", Action::AllSpecials),
    ("special", Action::AllSpecials),
    ("special dishes", Action::AllSpecials),
    ("party", Action::PartySpecial),
    ("party special", Action::PartySpecial),
    ("menu", Action::MainMenu),
    ("opening hours", Action::HoursText),
    ("gallery", Action::Reserved),
    ("reviews", Action::Reserved),
    ("hungry", Action::Reserved),
];

const PAYLOADS: &[(&str, Action)] = &[
    (payload::MENU, Action::MainMenu),
    (payload::LOCATION, Action::Location),
    (payload::OPENING_HOURS, Action::OpeningHours),
    (payload::ALL_SPECIAL, Action::AllSpecials),
    (payload::DAILY_SPECIAL, Action::DailySpecial),
    (payload::PARTY_SPECIAL, Action::PartySpecial),
    (payload::REVIEWS, Action::Reserved),
    (payload::BACK, Action::ActionMenu),
    (payload::SPECIAL_BACK, Action::ActionMenu),
    (payload::LOCATION_BACK, Action::ActionMenu),
    (payload::MAIN_MENU_BACK, Action::SpecialPrompt),
    (payload::GET_STARTED, Action::GetStarted),
];

/// Map free text to an action. Unknown text gets the welcome card plus a
/// delayed greeting.
#[must_use]
pub fn match_keyword(text: &str) -> Action {
    let lowered = text.to_lowercase();
    lookup(KEYWORDS, &lowered).unwrap_or(Action::WelcomeWithGreeting)
}

/// Map a postback or quick-reply payload to an action. Unknown payloads get
/// the welcome card.
#[must_use]
pub fn match_payload(token: &str) -> Action {
    lookup(PAYLOADS, token).unwrap_or(Action::Welcome)
}

fn lookup(table: &[(&str, Action)], key: &str) -> Option<Action> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, action)| *action)
}

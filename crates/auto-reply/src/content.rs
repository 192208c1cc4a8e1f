//! Static restaurant content. Pure data; image paths are relative to the
//! public assets directory and resolved against the server URL at compose
//! time.

use bistro_messenger::{Button, MessengerProfile};

use crate::keywords::payload;

pub const RESTAURANT_NAME: &str = "Bistro Lumiere";
pub const TAGLINE: &str = "Seasonal French cooking in the heart of the old town";
pub const ADDRESS: &str = "12 Market Square, Old Town";
pub const PHONE: &str = "+15550142233";
pub const MAPS_URL: &str = "https://www.google.com/maps/search/?api=1&query=12+Market+Square+Old+Town";
pub const LOGO_IMAGE: &str = "img/logo.jpg";
pub const MAP_IMAGE: &str = "img/location.jpg";
/// Static web menu; the carousel links to its section anchors.
pub const MENU_PAGE: &str = "menu.html";

pub const OPENING_HOURS: &str = "Our opening hours:\n\
    Mon-Thu 11:30 - 22:00\n\
    Fri-Sat 11:30 - 23:00\n\
    Sun 12:00 - 21:00\n\
    The kitchen closes 45 minutes before we do.";

pub const GREETING: &str = "Hi there! Tap a button above, or just type \"menu\", \
    \"special\", \"party\" or \"opening hours\".";

pub const OPTIN_CONFIRMATION: &str = "Authentication successful";

pub const ACTION_MENU_PROMPT: &str = "What would you like to do next?";
pub const SPECIAL_PROMPT: &str = "Fancy one of our specials?";

/// Greeting shown on the Messenger welcome screen before Get Started.
pub const PROFILE_GREETING: &str =
    "Welcome to Bistro Lumiere! Browse the menu, check today's special or find us.";

/// One card of static content.
#[derive(Debug, Clone, Copy)]
pub struct Dish {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub image: &'static str,
}

/// Sections shown by the main menu carousel, with their anchor on the web menu.
pub const MENU_SECTIONS: &[(Dish, &str)] = &[
    (
        Dish {
            title: "Starters",
            subtitle: "Soupe a l'oignon, escargots, goat cheese salad",
            image: "img/menu/starters.jpg",
        },
        "starters",
    ),
    (
        Dish {
            title: "Mains",
            subtitle: "Steak frites, bouillabaisse, mushroom risotto",
            image: "img/menu/mains.jpg",
        },
        "mains",
    ),
    (
        Dish {
            title: "Desserts",
            subtitle: "Creme brulee, tarte tatin, chocolate mousse",
            image: "img/menu/desserts.jpg",
        },
        "desserts",
    ),
    (
        Dish {
            title: "Drinks",
            subtitle: "Regional wines, craft beer, house lemonade",
            image: "img/menu/drinks.jpg",
        },
        "drinks",
    ),
];

pub const DAILY_SPECIAL: Dish = Dish {
    title: "Today's special: Coq au vin",
    subtitle: "Slow-braised chicken, mushrooms, pearl onions. $18",
    image: "img/specials/daily.jpg",
};

pub const PARTY_SPECIAL: Dish = Dish {
    title: "Party platter for 8",
    subtitle: "Charcuterie, cheeses, quiche and two bottles of house wine. $149",
    image: "img/specials/party.jpg",
};

pub const WEEKEND_BRUNCH: Dish = Dish {
    title: "Weekend brunch",
    subtitle: "Croque madame, pastries and coffee, Sat-Sun until 14:00. $22",
    image: "img/specials/brunch.jpg",
};

pub const LUNCH_FORMULA: Dish = Dish {
    title: "Lunch formula",
    subtitle: "Starter and main, or main and dessert, weekdays. $19",
    image: "img/specials/lunch.jpg",
};

/// Carousel order for "all specials".
pub const ALL_SPECIALS: &[Dish] = &[DAILY_SPECIAL, PARTY_SPECIAL, WEEKEND_BRUNCH, LUNCH_FORMULA];

/// Every image path referenced by the canned replies.
pub fn image_paths() -> impl Iterator<Item = &'static str> {
    [LOGO_IMAGE, MAP_IMAGE]
        .into_iter()
        .chain(MENU_SECTIONS.iter().map(|(dish, _)| dish.image))
        .chain(ALL_SPECIALS.iter().map(|dish| dish.image))
}

/// Messenger profile advertising the bot's entry points.
#[must_use]
pub fn messenger_profile() -> MessengerProfile {
    MessengerProfile::new(payload::GET_STARTED)
        .with_greeting(PROFILE_GREETING)
        .with_menu(vec![
            Button::postback("Menu", payload::MENU),
            Button::postback("Specials", payload::ALL_SPECIAL),
            Button::postback("Location", payload::LOCATION),
        ])
}

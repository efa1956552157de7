use crate::message::{Coordinate, RequestPayload};

#[derive(Debug, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    PlaceSearch,
    Unknown,
}

const PLACE_KEYWORDS: &[&str] = &[
    "restaurant",
    "restaurants",
    "cafe",
    "coffee",
    "bar",
    "bars",
    "hotel",
    "pharmacy",
    "near me",
    "nearby",
    "closest",
    "find a",
];

const GREETINGS: &[&str] = &["hello", "hi", "hey"];

pub fn detect_intent(msg: &str) -> Intent {
    let words: Vec<String> = msg
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    // Padded so phrases only match on whole words.
    let padded = format!(" {} ", words.join(" "));
    let has = |keyword: &str| padded.contains(&format!(" {keyword} "));

    if PLACE_KEYWORDS.iter().any(|k| has(k)) {
        Intent::PlaceSearch
    } else if GREETINGS.iter().any(|k| has(k)) {
        Intent::Greeting
    } else {
        Intent::Unknown
    }
}

/// Answer the latest user turn, using the location when one was sent.
pub fn generate_reply(payload: &RequestPayload) -> String {
    let user_msg = payload.last_user_message().map(|m| m.content.trim()).unwrap_or_default();
    let intent = detect_intent(user_msg);
    tracing::debug!(?intent, location = payload.user_location.is_some(), "detected intent");

    match (intent, payload.user_location) {
        (Intent::PlaceSearch, Some(coord)) => {
            format!("Looking for \"{}\" near {}.", user_msg, format_coordinate(&coord))
        }
        (Intent::PlaceSearch, None) => format!(
            "Looking for \"{}\". Share your location or name a city for results nearby.",
            user_msg
        ),
        (Intent::Greeting, _) => "Hi, what are you looking for?".to_string(),
        (Intent::Unknown, _) => format!("I didn't quite catch that: {}", user_msg),
    }
}

fn format_coordinate(coord: &Coordinate) -> String {
    format!("{:.4}, {:.4}", coord.lat(), coord.lng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChatMessage;

    #[test]
    fn greeting_does_not_match_inside_words() {
        assert_eq!(detect_intent("this is a thing"), Intent::Unknown);
        assert_eq!(detect_intent("Hi!"), Intent::Greeting);
    }

    #[test]
    fn place_keywords_match_whole_words_only() {
        assert_eq!(detect_intent("I feel embarrassed"), Intent::Unknown);
        assert_eq!(detect_intent("hand me the crowbar"), Intent::Unknown);
        assert_eq!(detect_intent("Any bar, nearby?"), Intent::PlaceSearch);
        assert_eq!(detect_intent("coffee NEAR me"), Intent::PlaceSearch);
    }

    #[test]
    fn place_search_uses_coordinate() {
        let payload = RequestPayload {
            messages: vec![ChatMessage::user("find a restaurant")],
            user_location: Some(Coordinate::new(40.7128, -74.006).unwrap()),
        };
        assert_eq!(
            generate_reply(&payload),
            "Looking for \"find a restaurant\" near 40.7128, -74.0060."
        );
    }
}

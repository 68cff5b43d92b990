use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One journal entry. Immutable once composed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    pub id: String,
    pub content: String,
    pub author: String,
    pub location: String,
    pub date: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

impl Letter {
    /// Weekday part of the display date (everything before the first comma).
    pub fn day_label(&self) -> &str {
        self.date.split(',').next().unwrap_or_default()
    }

    /// First `chars` characters of the body, for list previews.
    pub fn preview(&self, chars: usize) -> String {
        let head: String = self.content.chars().take(chars).collect();
        format!("{}...", head)
    }
}

// (id, author, location, date, content)
const SAMPLES: [(&str, &str, &str, &str, &str); 4] = [
    (
        "1",
        "Lora Wilson",
        "Australia",
        "Sunday, 12th May, 2025",
        "Dear Me,\n\nIt's been one of those days where everything feels heavier than it should. The world outside was so bright and loud today, but inside, it felt so quiet. Too quiet.\n\nI don't know why, but I kept thinking about Dad. It's been so many years since he passed, yet days like today, the memories feel so fresh it hurts. I was only eight when he died, but I remember the way he used to lift me up like I weighed nothing. I remember sitting on his shoulders while he pointed out constellations, telling me stories about each one as if he had named them himself.\n\nI miss that. Not just him, but the feeling of being someone's little universe.\n\nAfter he passed, everything changed so quickly. Mom couldn't handle it... or maybe she didn't want to. I don't know anymore. She left, and it was just me and Grandma and Grandpa. They did their best, I know they did, but there's always been this quiet space in me that no one ever filled again.",
    ),
    (
        "2",
        "Sarah Chen",
        "Vancouver",
        "Friday, Jun 21",
        "Dear Universe,\n\nTonight the stars feel closer somehow. I walked home through the park and stopped to just... breathe. When did breathing become something I had to remind myself to do?\n\nWork has been relentless. Everyone wants a piece of me, but I'm not sure there's much left to give. I keep showing up, smiling, being the person they need me to be. But who am I when no one's watching?\n\nI found an old photo today. Me at seven, covered in mud, grinning like the world was made of magic. I want to find her again. That wild, fearless girl who believed anything was possible.\n\nMaybe tomorrow I'll try something new. Something small. Like saying no when I mean no.",
    ),
    (
        "3",
        "Marcus",
        "Berlin",
        "Thursday, Jun 19",
        "To whoever reads this,\n\nI made coffee for two people today. Force of habit after three years. She's been gone for six months now, and my hands still don't know it.\n\nThe apartment feels too big. Her books are still on the shelf. I can't bring myself to move them. Sometimes I talk to them, pretending she'll walk in any moment and laugh at me for being so sentimental.\n\nGrief is strange. It's not the big moments that break you. It's the small ones. The empty chair. The silence where her laugh used to be.\n\nBut today I also noticed the sunset. Really noticed it. Orange and pink bleeding into purple. She would have loved it. Maybe that's enough for now.",
    ),
    (
        "4",
        "Anonymous",
        "Tokyo",
        "Wednesday, Jun 18",
        "Dear Future Me,\n\nI hope you're reading this and smiling. I hope you figured out what you want to be. I hope you stopped apologizing for taking up space.\n\nToday was hard. I failed the exam I studied weeks for. Everyone keeps telling me it's okay, that I can try again, but the disappointment in my own eyes is the hardest to face.\n\nI'm learning that failure isn't the opposite of success. It's part of the journey. At least that's what I keep telling myself.\n\nRemember: you are more than your worst day. You are more than one test, one mistake, one moment.\n\nBe gentle with yourself. Please.",
    ),
];

/// The built-in corpus shown after the user's own public letters. Always public, fixed order.
pub fn sample_letters() -> &'static [Letter] {
    static LETTERS: OnceLock<Vec<Letter>> = OnceLock::new();
    LETTERS.get_or_init(|| {
        SAMPLES
            .iter()
            .map(|&(id, author, location, date, content)| Letter {
                id: id.to_string(),
                content: content.to_string(),
                author: author.to_string(),
                location: location.to_string(),
                date: date.to_string(),
                is_public: true,
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_blob_field_names() {
        let letter = Letter {
            id: "17".to_string(),
            content: "Hi\nthere".to_string(),
            author: "Ava".to_string(),
            location: "Your Location".to_string(),
            date: "Sunday, 18 October, 2026".to_string(),
            is_public: false,
        };
        let value = serde_json::to_value(&letter).unwrap();
        assert_eq!(value["isPublic"], serde_json::json!(false));
        assert_eq!(value["content"], serde_json::json!("Hi\nthere"));
        assert!(value.get("is_public").is_none());
    }

    #[test]
    fn samples_are_public_and_ordered() {
        let samples = sample_letters();
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|l| l.is_public));
        let authors: Vec<&str> = samples.iter().map(|l| l.author.as_str()).collect();
        assert_eq!(authors, ["Lora Wilson", "Sarah Chen", "Marcus", "Anonymous"]);
    }

    #[test]
    fn day_label_and_preview() {
        let sample = &sample_letters()[1];
        assert_eq!(sample.day_label(), "Friday");
        assert_eq!(sample.preview(14), "Dear Universe,...");
    }
}

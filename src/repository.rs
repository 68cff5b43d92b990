use crate::letter::{sample_letters, Letter};
use crate::session::Profile;

/// Letters available for reading: the user's public letters (newest first) followed by the
/// sample corpus in its fixed order. Recomputed on every call.
pub fn visible_letters(profile: &Profile) -> Vec<&Letter> {
    profile
        .letters
        .iter()
        .filter(|l| l.is_public)
        .chain(sample_letters())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn authored(id: &str, is_public: bool) -> Letter {
        Letter {
            id: id.to_string(),
            content: format!("letter {}", id),
            author: "Ava".to_string(),
            location: "Your Location".to_string(),
            date: "Sunday, 18 October, 2026".to_string(),
            is_public,
        }
    }

    #[test]
    fn fresh_profile_sees_only_samples() {
        let profile = Profile::new("Ava");
        let visible = visible_letters(&profile);
        assert_eq!(visible.len(), sample_letters().len());
        assert_eq!(visible[0].author, "Lora Wilson");
    }

    #[test]
    fn public_letters_come_first_newest_first_and_private_ones_are_hidden() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut profile = Profile::new("Ava");
        profile.record(authored("1", true), today);
        profile.record(authored("2", false), today);
        profile.record(authored("3", true), today);

        let visible = visible_letters(&profile);

        assert_eq!(visible.len(), profile.public_count() + sample_letters().len());
        let ids: Vec<&str> = visible.iter().take(2).map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["3", "1"]);
        assert!(visible[2..].iter().copied().eq(sample_letters().iter()));
    }
}

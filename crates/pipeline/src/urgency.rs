//! Urgency classification against a user's alert settings.

use database::UserSettings;

/// Why an item counts as urgent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Urgency {
    /// Content contains this alert keyword.
    Keyword(String),
    /// Author is on the VIP list.
    Vip(String),
}

/// Classify an item. Keywords match case-insensitively as substrings;
/// VIPs match the author ID exactly.
pub fn classify(
    content: &str,
    author_id: Option<&str>,
    settings: &UserSettings,
) -> Option<Urgency> {
    let lowered = content.to_lowercase();
    let keyword = settings
        .alert_keywords
        .0
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .find(|k| lowered.contains(&k.to_lowercase()));
    if let Some(keyword) = keyword {
        return Some(Urgency::Keyword(keyword.to_string()));
    }

    let author = author_id?;
    settings
        .vip_user_ids
        .0
        .iter()
        .any(|vip| vip.trim() == author)
        .then(|| Urgency::Vip(author.to_string()))
}

/// Whether an item is urgent for this user.
pub fn is_urgent(content: &str, author_id: Option<&str>, settings: &UserSettings) -> bool {
    classify(content, author_id, settings).is_some()
}

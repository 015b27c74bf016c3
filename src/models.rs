//! Core records: families, children, and quote entries.
//!
//! All three live in the hosted backend; these types mirror its rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A family account. One phone number, one or more children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub id: Uuid,
    pub email: String,
    /// Stored exactly as entered. Inbound SMS attribution is an exact
    /// string match against this field — no country-code normalization —
    /// so a mismatched format silently resolves to "no family found".
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a family at onboarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFamily {
    pub email: String,
    pub phone: String,
}

/// A child profile within a family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub nickname: Option<String>,
    pub color_tag: Option<ColorTag>,
    pub avatar_url: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Child {
    /// Name shown on cards and reminders — nickname when set.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }
}

/// Fields for adding a child during onboarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChild {
    pub name: String,
    pub birthday: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// The fixed color palette for child profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Pink,
    Red,
    Blue,
    Green,
    Cream,
    Plum,
}

impl ColorTag {
    /// Human label shown in the picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pink => "Pink",
            Self::Red => "Coral",
            Self::Blue => "Sky",
            Self::Green => "Olive",
            Self::Cream => "Cream",
            Self::Plum => "Plum",
        }
    }

    /// Swatch color for the UI.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Pink => "#F8D5D3",
            Self::Red => "#ED6228",
            Self::Blue => "#D3E3E6",
            Self::Green => "#BDA632",
            Self::Cream => "#FBE2C4",
            Self::Plum => "#C7A2C9",
        }
    }

    /// All palette entries, picker order.
    pub const ALL: [ColorTag; 6] = [
        Self::Pink,
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Cream,
        Self::Plum,
    ];
}

impl Default for ColorTag {
    fn default() -> Self {
        Self::Pink
    }
}

impl std::fmt::Display for ColorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pink => "pink",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Cream => "cream",
            Self::Plum => "plum",
        };
        write!(f, "{s}")
    }
}

/// How a quote arrived: in reply to a prompt, or unprompted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    Prompt,
    Freeform,
}

impl std::fmt::Display for EntrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prompt => write!(f, "prompt"),
            Self::Freeform => write!(f, "freeform"),
        }
    }
}

/// A saved quote. Written exactly once per recognized inbound SMS and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub family_id: Uuid,
    pub quote: String,
    pub source: EntrySource,
    pub recorded_at: DateTime<Utc>,
}

/// Fields for inserting an entry.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntry {
    pub family_id: Uuid,
    pub quote: String,
    pub source: EntrySource,
}

/// Classify a reply body against the family's children.
///
/// `prompt` iff the trimmed body contains some child's name as a
/// case-insensitive substring. This is a heuristic — it does not compare
/// against the prompt actually sent that day — and is preserved as-is.
/// Returns the classification and the matched child index, if any.
pub fn classify_quote(body: &str, children: &[Child]) -> (EntrySource, Option<usize>) {
    let lowered = body.to_lowercase();
    for (i, child) in children.iter().enumerate() {
        if !child.name.is_empty() && lowered.contains(&child.name.to_lowercase()) {
            return (EntrySource::Prompt, Some(i));
        }
    }
    (EntrySource::Freeform, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(name: &str) -> Child {
        Child {
            id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            name: name.to_string(),
            nickname: None,
            color_tag: None,
            avatar_url: None,
            birthday: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn classify_is_case_insensitive() {
        let kids = [child("Jamie")];
        let (source, idx) = classify_quote("jamie said the sky is purple", &kids);
        assert_eq!(source, EntrySource::Prompt);
        assert_eq!(idx, Some(0));
    }

    #[test]
    fn classify_freeform_when_no_name_present() {
        let kids = [child("Jamie")];
        let (source, idx) = classify_quote("the sky is purple today", &kids);
        assert_eq!(source, EntrySource::Freeform);
        assert_eq!(idx, None);
    }

    #[test]
    fn classify_matches_any_child() {
        let kids = [child("Jamie"), child("Rosa")];
        let (source, idx) = classify_quote("Rosa wants a pet dragon", &kids);
        assert_eq!(source, EntrySource::Prompt);
        assert_eq!(idx, Some(1));
    }

    #[test]
    fn classify_mention_always_counts_as_prompt() {
        // A reply that merely mentions the name is tagged prompt even if
        // no prompt was sent that day.
        let kids = [child("Jamie")];
        let (source, _) = classify_quote("unprompted: Jamie is hilarious", &kids);
        assert_eq!(source, EntrySource::Prompt);
    }

    #[test]
    fn color_tag_serde_matches_display() {
        for tag in ColorTag::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{tag}\""));
        }
    }

    #[test]
    fn display_name_prefers_nickname() {
        let mut kid = child("Rosalind");
        assert_eq!(kid.display_name(), "Rosalind");
        kid.nickname = Some("Roz".to_string());
        assert_eq!(kid.display_name(), "Roz");
    }
}

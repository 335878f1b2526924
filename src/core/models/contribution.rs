//! Contribution model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Title given to contributions logged without one
pub const DEFAULT_TITLE: &str = "Unnamed Contribution";

/// Notes given to contributions logged without any
pub const DEFAULT_NOTES: &str = "No notes";

/// Category of a civic or volunteer action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContributionKind {
    /// Litter picking, tidying public spaces
    Cleanliness,
    /// Planting, watering, gardening
    PlantCare,
    /// Giving money or goods
    Donation,
    /// Helping people directly
    Kindness,
    /// Feeding, rescuing or caring for animals
    AnimalCare,
    /// Anything else; never used as a challenge category
    Other,
}

impl ContributionKind {
    /// Every category in display order
    pub const ALL: [Self; 6] = [
        Self::Cleanliness,
        Self::PlantCare,
        Self::Donation,
        Self::Kindness,
        Self::AnimalCare,
        Self::Other,
    ];

    /// Human-readable name (e.g., "Plant Care")
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Cleanliness => "Cleanliness",
            Self::PlantCare => "Plant Care",
            Self::Donation => "Donation",
            Self::Kindness => "Kindness",
            Self::AnimalCare => "Animal Care",
            Self::Other => "Other",
        }
    }

    /// Stable identifier used in config files and on the command line
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Cleanliness => "cleanliness",
            Self::PlantCare => "plant-care",
            Self::Donation => "donation",
            Self::Kindness => "kindness",
            Self::AnimalCare => "animal-care",
            Self::Other => "other",
        }
    }

    /// Whether challenges may target this category
    #[must_use]
    pub const fn is_challenge_eligible(self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ContributionKind {
    type Err = String;

    /// Accepts the display name, the slug or the compact form, ignoring case
    /// ("Plant Care", "plant-care", "plantcare", "plant_care").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "cleanliness" => Ok(Self::Cleanliness),
            "plantcare" => Ok(Self::PlantCare),
            "donation" => Ok(Self::Donation),
            "kindness" => Ok(Self::Kindness),
            "animalcare" => Ok(Self::AnimalCare),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown contribution type: '{s}'")),
        }
    }
}

/// A logged civic or volunteer action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Unique identifier
    pub id: Uuid,
    /// Short title (e.g., "Litter pick on the high street")
    pub title: String,
    /// Category
    pub kind: ContributionKind,
    /// When the action happened, local wall-clock time
    pub date: NaiveDateTime,
    /// Free-form notes
    pub notes: String,
    /// Paths of attached photos or videos
    #[serde(default)]
    pub media: Vec<String>,
    /// XP earned when the contribution was logged
    pub xp: u32,
}

impl Contribution {
    /// Build a contribution from a draft, applying default title and notes
    #[must_use]
    pub fn from_draft(draft: ContributionDraft, xp: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: or_default(draft.title, DEFAULT_TITLE),
            kind: draft.kind,
            date: draft.date,
            notes: or_default(draft.notes, DEFAULT_NOTES),
            media: draft.media,
            xp,
        }
    }

    /// First eight characters of the id, enough to address it from the CLI
    #[must_use]
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// User input for a new contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionDraft {
    /// Title; blank falls back to [`DEFAULT_TITLE`]
    pub title: String,
    /// Category
    pub kind: ContributionKind,
    /// When the action happened
    pub date: NaiveDateTime,
    /// Notes; blank falls back to [`DEFAULT_NOTES`]
    pub notes: String,
    /// Attached media paths
    pub media: Vec<String>,
}

impl ContributionDraft {
    /// Draft with the given category and date and no other details
    #[must_use]
    pub const fn new(kind: ContributionKind, date: NaiveDateTime) -> Self {
        Self {
            title: String::new(),
            kind,
            date,
            notes: String::new(),
            media: Vec::new(),
        }
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the media paths
    #[must_use]
    pub fn with_media(mut self, media: Vec<String>) -> Self {
        self.media = media;
        self
    }
}

/// Partial update applied by an edit; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionEdit {
    /// New title
    pub title: Option<String>,
    /// New category
    pub kind: Option<ContributionKind>,
    /// New date
    pub date: Option<NaiveDateTime>,
    /// New notes
    pub notes: Option<String>,
    /// Replacement media list
    pub media: Option<Vec<String>>,
}

impl ContributionEdit {
    /// True when the edit would change nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.kind.is_none()
            && self.date.is_none()
            && self.notes.is_none()
            && self.media.is_none()
    }

    /// Apply the edit in place. Edited fields are stored as given.
    pub fn apply(self, contribution: &mut Contribution) {
        if let Some(title) = self.title {
            contribution.title = title;
        }
        if let Some(kind) = self.kind {
            contribution.kind = kind;
        }
        if let Some(date) = self.date {
            contribution.date = date;
        }
        if let Some(notes) = self.notes {
            contribution.notes = notes;
        }
        if let Some(media) = self.media {
            contribution.media = media;
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_kind_parsing_forms() {
        assert_eq!("Plant Care".parse::<ContributionKind>(), Ok(ContributionKind::PlantCare));
        assert_eq!("plant-care".parse::<ContributionKind>(), Ok(ContributionKind::PlantCare));
        assert_eq!("PLANTCARE".parse::<ContributionKind>(), Ok(ContributionKind::PlantCare));
        assert_eq!("animal_care".parse::<ContributionKind>(), Ok(ContributionKind::AnimalCare));
        assert!("gardening".parse::<ContributionKind>().is_err());
    }

    #[test]
    fn test_kind_display_and_slug() {
        assert_eq!(ContributionKind::AnimalCare.to_string(), "Animal Care");
        assert_eq!(ContributionKind::AnimalCare.slug(), "animal-care");
        for kind in ContributionKind::ALL {
            assert_eq!(kind.slug().parse::<ContributionKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_other_is_not_challenge_eligible() {
        let eligible: Vec<_> = ContributionKind::ALL
            .into_iter()
            .filter(|k| k.is_challenge_eligible())
            .collect();
        assert_eq!(eligible.len(), 5);
        assert!(!eligible.contains(&ContributionKind::Other));
    }

    #[test]
    fn test_kind_serializes_as_slug() {
        let json = serde_json::to_string(&ContributionKind::PlantCare).unwrap();
        assert_eq!(json, "\"plant-care\"");
    }

    #[test]
    fn test_draft_defaults() {
        let contribution = Contribution::from_draft(
            ContributionDraft::new(ContributionKind::Kindness, noon()).with_notes("   "),
            6,
        );
        assert_eq!(contribution.title, DEFAULT_TITLE);
        assert_eq!(contribution.notes, DEFAULT_NOTES);
        assert_eq!(contribution.xp, 6);
        assert!(contribution.media.is_empty());
        assert_eq!(contribution.short_id().len(), 8);
    }

    #[test]
    fn test_draft_keeps_given_values() {
        let contribution = Contribution::from_draft(
            ContributionDraft::new(ContributionKind::Donation, noon())
                .with_title("Food bank")
                .with_notes("Two bags")
                .with_media(vec!["/tmp/receipt.jpg".to_string()]),
            4,
        );
        assert_eq!(contribution.title, "Food bank");
        assert_eq!(contribution.notes, "Two bags");
        assert_eq!(contribution.media, vec!["/tmp/receipt.jpg".to_string()]);
    }

    #[test]
    fn test_edit_applies_only_given_fields() {
        let mut contribution = Contribution::from_draft(
            ContributionDraft::new(ContributionKind::Donation, noon()).with_title("Food bank"),
            4,
        );
        let edit = ContributionEdit {
            kind: Some(ContributionKind::Kindness),
            notes: Some("Helped sort".to_string()),
            ..ContributionEdit::default()
        };
        assert!(!edit.is_empty());
        edit.apply(&mut contribution);

        assert_eq!(contribution.title, "Food bank");
        assert_eq!(contribution.kind, ContributionKind::Kindness);
        assert_eq!(contribution.notes, "Helped sort");
        assert_eq!(contribution.date, noon());
        assert!(ContributionEdit::default().is_empty());
    }
}

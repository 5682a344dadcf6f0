//! Domain model for card-sorting studies.
//!
//! These structs mirror the JSON documents exchanged with the outside
//! world: the template a builder exports and the result a session emits.
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{CardId, CategoryId, TemplateId};

/// The current schema version for templates and results.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// How participants are allowed to group cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    /// Participants create their own categories.
    Open,
    /// Categories are predefined; at least one must exist.
    Closed,
    /// Predefined categories plus participant-created ones.
    Hybrid,
}

/// Settings that control how a sorting session behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySettings {
    /// Shuffle the display order of unsorted cards per participant.
    pub randomize_card_order: bool,
    /// Allow participants to create categories during the sort.
    pub allow_create_categories: bool,
    /// Refuse to finalize while any card remains unsorted.
    pub require_all_cards_sorted: bool,
    /// Offer an explicit bucket for cards the participant cannot place.
    pub enable_unsure_bucket: bool,
    /// Display label for the unsure bucket.
    pub unsure_bucket_label: String,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            randomize_card_order: true,
            allow_create_categories: false,
            require_all_cards_sorted: true,
            enable_unsure_bucket: true,
            unsure_bucket_label: "Unsure / Doesn't fit".to_string(),
        }
    }
}

/// Study metadata and behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub title: String,
    pub description: String,
    /// ISO 639-1 language code, optionally with a region ("en", "th", "en-US").
    pub language: String,
    pub sort_type: SortType,
    pub settings: StudySettings,
    pub instructions_markdown: String,
}

/// A category cards can be sorted into.
///
/// Identity is the id; duplicate labels are allowed (they are a builder-UI
/// nudge, not an invariant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub label: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A card to be sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub label: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Open-ended metadata carried through untouched.
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

/// The complete, versioned, exportable definition of a study.
///
/// Immutable once a session starts: the session engine takes the template
/// by value and never hands back a mutable reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTemplate {
    pub schema_version: String,
    pub template_id: TemplateId,
    pub study: Study,
    pub categories: Vec<Category>,
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
}

impl StudyTemplate {
    /// Look up a category by id.
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Look up a card by id.
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }
}

/// Who performed the sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
}

/// Viewport dimensions at completion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub w: u32,
    pub h: u32,
}

/// Timing and environment telemetry for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Derived, clamped to zero on clock skew.
    pub duration_ms: u64,
    /// IANA timezone identifier.
    pub timezone: String,
    pub user_agent: String,
    pub viewport: Viewport,
}

/// Cards stacked into a single category, in visual stacking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputGroup {
    pub category_id: CategoryId,
    pub card_ids_in_order: Vec<CardId>,
}

/// The complete sorting output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub groups: Vec<OutputGroup>,
    pub unsure_card_ids: Vec<CardId>,
}

/// Interaction counters for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub moves_count: u64,
    pub undo_count: u64,
}

/// The exported record of one participant's sort. Write-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyResult {
    pub schema_version: String,
    pub template_id: TemplateId,
    /// Checksum of the exact template content this result was derived from.
    pub template_checksum_sha256: String,
    pub participant: Participant,
    pub session: SessionInfo,
    pub output: Output,
    pub telemetry: Telemetry,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_template() -> StudyTemplate {
        StudyTemplate {
            schema_version: SCHEMA_VERSION.to_string(),
            template_id: TemplateId::parse("tmpl_abcdefghij").unwrap(),
            study: Study {
                title: "Navigation sort".to_string(),
                description: String::new(),
                language: "en".to_string(),
                sort_type: SortType::Closed,
                settings: StudySettings::default(),
                instructions_markdown: String::new(),
            },
            categories: vec![Category {
                id: CategoryId::parse("cat_abcdefghij").unwrap(),
                label: "Settings".to_string(),
                description: String::new(),
                image: None,
            }],
            cards: vec![Card {
                id: CardId::parse("card_abcdefghij").unwrap(),
                label: "Change password".to_string(),
                description: String::new(),
                image: None,
                meta: BTreeMap::new(),
            }],
            created_at: "2026-01-15T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_template_wire_field_names() {
        let json = serde_json::to_value(sample_template()).unwrap();
        assert_eq!(json["schemaVersion"], SCHEMA_VERSION);
        assert_eq!(json["templateId"], "tmpl_abcdefghij");
        assert_eq!(json["study"]["sortType"], "closed");
        assert_eq!(json["study"]["settings"]["randomizeCardOrder"], true);
        assert!(json["createdAt"].is_string());
        // Absent image must not appear on the wire
        assert!(json["cards"][0].get("image").is_none());
    }

    #[test]
    fn test_template_json_roundtrip() {
        let template = sample_template();
        let json = serde_json::to_string(&template).unwrap();
        let back: StudyTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(template, back);
    }

    #[test]
    fn test_card_meta_roundtrip() {
        let mut template = sample_template();
        template.cards[0]
            .meta
            .insert("sourcePage".to_string(), serde_json::json!("/account"));
        let json = serde_json::to_string(&template).unwrap();
        let back: StudyTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cards[0].meta["sourcePage"], "/account");
    }

    #[test]
    fn test_lookups() {
        let template = sample_template();
        let cat = CategoryId::parse("cat_abcdefghij").unwrap();
        assert!(template.category(&cat).is_some());
        let missing = CategoryId::parse("cat_zzzzzzzzzz").unwrap();
        assert!(template.category(&missing).is_none());
    }
}

//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: deterministic templates with
//! predictable ids, settings variants, and a canned session environment.

use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

use cardsort_core::{
    Card, CardId, Category, CategoryId, SortType, Study, StudySettings, StudyTemplate, TemplateId,
    Viewport, SCHEMA_VERSION,
};
use cardsort_session::SessionEnv;

/// A deterministic card id: `card_` + zero-padded index.
pub fn card_id(index: usize) -> CardId {
    CardId::parse(&format!("card_{index:0>10}")).expect("fixture id is well-formed")
}

/// A deterministic category id: `cat_` + zero-padded index.
pub fn category_id(index: usize) -> CategoryId {
    CategoryId::parse(&format!("cat_{index:0>10}")).expect("fixture id is well-formed")
}

/// Build a fixture card.
pub fn card(index: usize) -> Card {
    Card {
        id: card_id(index),
        label: format!("Card {index}"),
        description: String::new(),
        image: None,
        meta: BTreeMap::new(),
    }
}

/// Build a fixture category.
pub fn category(index: usize) -> Category {
    Category {
        id: category_id(index),
        label: format!("Group {index}"),
        description: String::new(),
        image: None,
    }
}

/// Settings with no shuffling and a strict completion gate. Most tests
/// want determinism; opt in to randomization explicitly.
pub fn strict_settings() -> StudySettings {
    StudySettings {
        randomize_card_order: false,
        allow_create_categories: false,
        require_all_cards_sorted: true,
        enable_unsure_bucket: true,
        unsure_bucket_label: "Unsure".to_string(),
    }
}

/// Settings with the completion gate off.
pub fn relaxed_settings() -> StudySettings {
    StudySettings {
        require_all_cards_sorted: false,
        ..strict_settings()
    }
}

/// A fully deterministic template: fixed id, fixed timestamp, `n_categories`
/// fixture categories and `n_cards` fixture cards.
pub fn template(n_categories: usize, n_cards: usize, settings: StudySettings) -> StudyTemplate {
    StudyTemplate {
        schema_version: SCHEMA_VERSION.to_string(),
        template_id: TemplateId::parse("tmpl_fixture001").expect("fixture id is well-formed"),
        study: Study {
            title: "Fixture study".to_string(),
            description: "Deterministic template for tests".to_string(),
            language: "en".to_string(),
            sort_type: SortType::Closed,
            settings,
            instructions_markdown: "Sort the cards.".to_string(),
        },
        categories: (0..n_categories).map(category).collect(),
        cards: (0..n_cards).map(card).collect(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
    }
}

/// A canned session environment.
pub fn sample_env() -> SessionEnv {
    SessionEnv {
        timezone: "Asia/Bangkok".to_string(),
        user_agent: "cardsort-testkit".to_string(),
        viewport: Viewport { w: 1280, h: 720 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsort_core::validate_template;

    #[test]
    fn test_fixture_template_validates() {
        let tmpl = template(2, 3, strict_settings());
        let json = serde_json::to_value(&tmpl).unwrap();
        assert!(validate_template(&json).is_ok());
    }

    #[test]
    fn test_fixture_template_is_deterministic() {
        assert_eq!(
            template(2, 3, strict_settings()),
            template(2, 3, strict_settings())
        );
    }

    #[test]
    fn test_fixture_ids_are_stable() {
        assert_eq!(card_id(7).as_str(), "card_0000000007");
        assert_eq!(category_id(0).as_str(), "cat_0000000000");
    }
}

//! Proptest generators for property-based testing.

use proptest::prelude::*;
use std::collections::BTreeMap;

use cardsort_core::{
    Card, Category, SortType, Study, StudySettings, StudyTemplate, TemplateId, SCHEMA_VERSION,
};

use crate::fixtures::{card_id, category_id};

/// Generate a label within the validation bounds.
pub fn label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,40}".prop_map(String::from)
}

/// Generate a description within the validation bounds.
pub fn description() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,]{0,80}".prop_map(String::from)
}

/// Generate a sort type.
pub fn sort_type() -> impl Strategy<Value = SortType> {
    prop_oneof![
        Just(SortType::Open),
        Just(SortType::Closed),
        Just(SortType::Hybrid),
    ]
}

/// Generate study settings.
pub fn settings() -> impl Strategy<Value = StudySettings> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), label()).prop_map(
        |(randomize, allow_create, require_all, enable_unsure, unsure_label)| StudySettings {
            randomize_card_order: randomize,
            allow_create_categories: allow_create,
            require_all_cards_sorted: require_all,
            enable_unsure_bucket: enable_unsure,
            unsure_bucket_label: unsure_label,
        },
    )
}

/// Generate a study with the given sort type.
pub fn study(sort: SortType) -> impl Strategy<Value = Study> {
    (label(), description(), settings()).prop_map(move |(title, desc, settings)| Study {
        title,
        description: desc,
        language: "en".to_string(),
        sort_type: sort,
        settings,
        instructions_markdown: String::new(),
    })
}

/// Generate a fixture-id category with random text.
pub fn category(index: usize) -> impl Strategy<Value = Category> {
    (label(), description()).prop_map(move |(label, desc)| Category {
        id: category_id(index),
        label,
        description: desc,
        image: None,
    })
}

/// Generate a fixture-id card with random text.
pub fn card(index: usize) -> impl Strategy<Value = Card> {
    (label(), description()).prop_map(move |(label, desc)| Card {
        id: card_id(index),
        label,
        description: desc,
        image: None,
        meta: BTreeMap::new(),
    })
}

/// Generate a whole valid template: 1-5 categories, 1-12 cards, with
/// deterministic fixture ids and random text. Always at least one
/// category, so any sort type validates.
pub fn template() -> impl Strategy<Value = StudyTemplate> {
    (1usize..=5, 1usize..=12)
        .prop_flat_map(|(n_categories, n_cards)| {
            (
                sort_type().prop_flat_map(study),
                (0..n_categories).map(category).collect::<Vec<_>>(),
                (0..n_cards).map(card).collect::<Vec<_>>(),
            )
        })
        .prop_map(|(study, categories, cards)| StudyTemplate {
            schema_version: SCHEMA_VERSION.to_string(),
            template_id: TemplateId::parse("tmpl_proptest00")
                .expect("generator id is well-formed"),
            study,
            categories,
            cards,
            created_at: "2026-01-15T12:00:00Z".parse().expect("valid timestamp"),
        })
}

/// One move against a deck: `(card_index, category_index, mark_unsure)`.
/// A `None` category index is "back to unsorted" (or unsure).
pub fn move_op(n_cards: usize, n_categories: usize) -> impl Strategy<Value = MoveOp> {
    (
        0..n_cards,
        prop_oneof![Just(None::<usize>), (0..n_categories).prop_map(Some)],
        any::<bool>(),
    )
        .prop_map(|(card, category, mark_unsure)| MoveOp {
            card,
            category,
            mark_unsure,
        })
}

/// A sequence of random moves.
pub fn move_sequence(
    n_cards: usize,
    n_categories: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<MoveOp>> {
    proptest::collection::vec(move_op(n_cards, n_categories), 0..=max_len)
}

/// Parameters for one `move_card` call, in fixture-index form.
#[derive(Debug, Clone)]
pub struct MoveOp {
    pub card: usize,
    pub category: Option<usize>,
    pub mark_unsure: bool,
}

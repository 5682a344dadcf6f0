//! Template authoring.
//!
//! A [`TemplateBuilder`] accumulates a study, categories, and cards, and
//! exports a fully validated [`StudyTemplate`]. It is an owned object the
//! application constructs and passes around; nothing here is global.

use chrono::Utc;

use cardsort_core::{
    validate_template, Card, CardId, Category, CategoryId, Study, StudySettings, StudyTemplate,
    TemplateId, ValidationErrors, SCHEMA_VERSION,
};

/// Builder for a study template.
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    study: Study,
    categories: Vec<Category>,
    cards: Vec<Card>,
}

impl TemplateBuilder {
    /// Start from the default study configuration.
    pub fn new() -> Self {
        Self {
            study: default_study(),
            categories: Vec::new(),
            cards: Vec::new(),
        }
    }

    /// Replace the study metadata and settings.
    pub fn set_study(&mut self, study: Study) -> &mut Self {
        self.study = study;
        self
    }

    /// Mutable access to the study, for incremental edits.
    pub fn study_mut(&mut self) -> &mut Study {
        &mut self.study
    }

    pub fn study(&self) -> &Study {
        &self.study
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Add a category with a fresh id; returns the id.
    pub fn add_category(&mut self, label: impl Into<String>) -> CategoryId {
        let id = CategoryId::generate();
        self.categories.push(Category {
            id: id.clone(),
            label: label.into(),
            description: String::new(),
            image: None,
        });
        id
    }

    /// Apply edits to a category in place. Returns false if the id is
    /// unknown.
    pub fn update_category(
        &mut self,
        id: &CategoryId,
        update: impl FnOnce(&mut Category),
    ) -> bool {
        match self.categories.iter_mut().find(|c| &c.id == id) {
            Some(category) => {
                update(category);
                true
            }
            None => false,
        }
    }

    /// Remove a category, returning it so the caller can offer undo.
    pub fn remove_category(&mut self, id: &CategoryId) -> Option<Category> {
        let index = self.categories.iter().position(|c| &c.id == id)?;
        Some(self.categories.remove(index))
    }

    /// Re-insert a previously removed category, at `index` if given and in
    /// range, otherwise at the end.
    pub fn restore_category(&mut self, category: Category, index: Option<usize>) {
        match index {
            Some(i) if i <= self.categories.len() => self.categories.insert(i, category),
            _ => self.categories.push(category),
        }
    }

    /// Move a category from one position to another.
    pub fn reorder_categories(&mut self, from: usize, to: usize) {
        if from < self.categories.len() && to < self.categories.len() {
            let category = self.categories.remove(from);
            self.categories.insert(to, category);
        }
    }

    /// Add a card with a fresh id; returns the id.
    pub fn add_card(&mut self, label: impl Into<String>) -> CardId {
        let id = CardId::generate();
        self.cards.push(Card {
            id: id.clone(),
            label: label.into(),
            description: String::new(),
            image: None,
            meta: Default::default(),
        });
        id
    }

    /// Apply edits to a card in place. Returns false if the id is unknown.
    pub fn update_card(&mut self, id: &CardId, update: impl FnOnce(&mut Card)) -> bool {
        match self.cards.iter_mut().find(|c| &c.id == id) {
            Some(card) => {
                update(card);
                true
            }
            None => false,
        }
    }

    /// Remove a card, returning it so the caller can offer undo.
    pub fn remove_card(&mut self, id: &CardId) -> Option<Card> {
        let index = self.cards.iter().position(|c| &c.id == id)?;
        Some(self.cards.remove(index))
    }

    /// Re-insert a previously removed card, at `index` if given and in
    /// range, otherwise at the end.
    pub fn restore_card(&mut self, card: Card, index: Option<usize>) {
        match index {
            Some(i) if i <= self.cards.len() => self.cards.insert(i, card),
            _ => self.cards.push(card),
        }
    }

    /// Move a card from one position to another.
    pub fn reorder_cards(&mut self, from: usize, to: usize) {
        if from < self.cards.len() && to < self.cards.len() {
            let card = self.cards.remove(from);
            self.cards.insert(to, card);
        }
    }

    /// Discard everything and start over.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Export a validated template with a fresh id and creation timestamp.
    ///
    /// Validation runs on the template's own JSON form, so anything this
    /// method returns will re-validate after an export/import round trip.
    pub fn build(&self) -> Result<StudyTemplate, ValidationErrors> {
        let template = StudyTemplate {
            schema_version: SCHEMA_VERSION.to_string(),
            template_id: TemplateId::generate(),
            study: self.study.clone(),
            categories: self.categories.clone(),
            cards: self.cards.clone(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&template)
            .map_err(|e| ValidationErrors(vec![format!("template is not serializable: {e}")]))?;
        validate_template(&json)
    }
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_study() -> Study {
    Study {
        title: String::new(),
        description: String::new(),
        language: "en".to_string(),
        sort_type: cardsort_core::SortType::Closed,
        settings: StudySettings::default(),
        instructions_markdown:
            "Drag each card into the group that best matches where you'd expect to find it."
                .to_string(),
    }
}

//! Card placements: where each card currently lives during a session.
//!
//! A [`PlacementSet`] holds exactly one record per template card at all
//! times. Records keep insertion order, which is the order participants
//! stacked cards and is preserved into the exported result.

use cardsort_core::{CardId, CategoryId};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// The current location of one card. The three locations are mutually
/// exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CardLocation {
    /// Not yet placed anywhere.
    Unsorted,
    /// Stacked into a category.
    #[serde(rename_all = "camelCase")]
    Assigned { category_id: CategoryId },
    /// Deliberately set aside in the unsure bucket. A terminal placement,
    /// not a pending one.
    Unsure,
}

impl CardLocation {
    /// Whether this location counts as sorted for the completion gate.
    /// Unsure counts: it is an explicit decision.
    pub fn is_sorted(&self) -> bool {
        !matches!(self, CardLocation::Unsorted)
    }
}

/// One card's placement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPlacement {
    pub card_id: CardId,
    pub location: CardLocation,
}

/// The full placement state: one record per card, insertion-ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementSet {
    records: Vec<CardPlacement>,
}

impl PlacementSet {
    /// Create a set with every card unsorted, in the given order.
    pub fn new_unsorted<I: IntoIterator<Item = CardId>>(card_ids: I) -> Self {
        Self {
            records: card_ids
                .into_iter()
                .map(|card_id| CardPlacement {
                    card_id,
                    location: CardLocation::Unsorted,
                })
                .collect(),
        }
    }

    /// Where a card currently is.
    pub fn locate(&self, card_id: &CardId) -> Option<&CardLocation> {
        self.records
            .iter()
            .find(|p| &p.card_id == card_id)
            .map(|p| &p.location)
    }

    /// Move a card to a new location. Fails on unknown cards; never adds
    /// or removes a record.
    pub fn set_location(
        &mut self,
        card_id: &CardId,
        location: CardLocation,
    ) -> Result<(), SessionError> {
        let record = self
            .records
            .iter_mut()
            .find(|p| &p.card_id == card_id)
            .ok_or_else(|| SessionError::UnknownCard(card_id.clone()))?;
        record.location = location;
        Ok(())
    }

    /// Return every card to unsorted, keeping record order.
    pub fn clear(&mut self) {
        for record in &mut self.records {
            record.location = CardLocation::Unsorted;
        }
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CardPlacement> {
        self.records.iter()
    }

    /// Card ids currently unsorted, in insertion order.
    pub fn unsorted(&self) -> Vec<CardId> {
        self.records
            .iter()
            .filter(|p| p.location == CardLocation::Unsorted)
            .map(|p| p.card_id.clone())
            .collect()
    }

    /// Card ids currently in the unsure bucket, in insertion order.
    pub fn unsure(&self) -> Vec<CardId> {
        self.records
            .iter()
            .filter(|p| p.location == CardLocation::Unsure)
            .map(|p| p.card_id.clone())
            .collect()
    }

    /// Card ids currently assigned to the given category, in insertion order.
    pub fn assigned_to(&self, category_id: &CategoryId) -> Vec<CardId> {
        self.records
            .iter()
            .filter(|p| {
                matches!(&p.location, CardLocation::Assigned { category_id: c } if c == category_id)
            })
            .map(|p| p.card_id.clone())
            .collect()
    }

    /// Number of cards not yet sorted.
    pub fn unsorted_count(&self) -> usize {
        self.records
            .iter()
            .filter(|p| p.location == CardLocation::Unsorted)
            .count()
    }

    /// Number of cards sorted (assigned or unsure).
    pub fn sorted_count(&self) -> usize {
        self.records.len() - self.unsorted_count()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All card ids in insertion order.
    pub fn card_ids(&self) -> Vec<CardId> {
        self.records.iter().map(|p| p.card_id.clone()).collect()
    }
}

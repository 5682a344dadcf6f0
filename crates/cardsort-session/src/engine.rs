//! The sorting-session state machine.
//!
//! One engine instance owns one session: the placement of every card, the
//! undo history, the telemetry counters, and the timing needed to derive a
//! [`StudyResult`]. External code reads snapshots and routes every mutation
//! through this API; placements are never handed out mutably, so the undo
//! stack and move counter stay consistent with every change.
//!
//! States: `Uninitialized -> Sorting -> Completed`. A template is "loaded"
//! only once its checksum has been computed; until then the engine stays
//! uninitialized and rejects moves.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

use cardsort_core::{
    CardId, CategoryId, Output, OutputGroup, Participant, SessionId, SessionInfo, Sha256Checksum,
    StudyResult, StudyTemplate, Telemetry, Viewport, SCHEMA_VERSION,
};

use crate::error::{Result, SessionError};
use crate::placement::{CardLocation, PlacementSet};

/// Environment details captured into the result's session block. Supplied
/// by the embedding application.
#[derive(Debug, Clone)]
pub struct SessionEnv {
    /// IANA timezone identifier.
    pub timezone: String,
    pub user_agent: String,
    pub viewport: Viewport,
}

/// The lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No template loaded (or checksum not yet resolved).
    Uninitialized,
    /// A session is underway; moves are accepted.
    Sorting,
    /// A final result was generated; the session is frozen.
    Completed,
}

/// Everything that exists only while a template is loaded.
struct ActiveSession {
    session_id: SessionId,
    template: StudyTemplate,
    /// Captured when the template was loaded; never recomputed, so the
    /// result always refers to the original template content.
    checksum: Sha256Checksum,
    placements: PlacementSet,
    /// Presentation order of cards; shuffled at load when the study asks
    /// for it. Has no effect on placement semantics.
    display_order: Vec<CardId>,
    started_at: DateTime<Utc>,
    moves_count: u64,
    undo_count: u64,
    undo_stack: Vec<PlacementSet>,
    completed: bool,
}

/// The sorting-session engine.
pub struct SessionEngine {
    active: Option<ActiveSession>,
}

impl SessionEngine {
    /// Create an engine with no template loaded.
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Load a validated template, computing its checksum as part of the
    /// load. The engine enters `Sorting` only after the checksum resolves.
    pub fn load_template(&mut self, template: StudyTemplate) -> Result<&SessionId> {
        let checksum = Sha256Checksum::compute(&template)
            .map_err(|e| SessionError::ChecksumUnavailable(e.to_string()))?;
        self.load_template_with_checksum(template, checksum)
    }

    /// Load a template whose checksum was already computed (the import
    /// path does this so the digest is hashed exactly once).
    pub fn load_template_with_checksum(
        &mut self,
        template: StudyTemplate,
        checksum: Sha256Checksum,
    ) -> Result<&SessionId> {
        let card_ids: Vec<CardId> = template.cards.iter().map(|c| c.id.clone()).collect();
        let mut display_order = card_ids.clone();
        if template.study.settings.randomize_card_order {
            display_order.shuffle(&mut rand::thread_rng());
        }

        let session = self.active.insert(ActiveSession {
            session_id: SessionId::generate(),
            placements: PlacementSet::new_unsorted(card_ids),
            display_order,
            checksum,
            started_at: Utc::now(),
            moves_count: 0,
            undo_count: 0,
            undo_stack: Vec::new(),
            completed: false,
            template,
        });
        tracing::debug!(
            session_id = %session.session_id,
            template_id = %session.template.template_id,
            cards = session.placements.len(),
            "session started"
        );
        Ok(&session.session_id)
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SessionState {
        match &self.active {
            None => SessionState::Uninitialized,
            Some(s) if s.completed => SessionState::Completed,
            Some(_) => SessionState::Sorting,
        }
    }

    fn session(&self) -> Result<&ActiveSession> {
        self.active.as_ref().ok_or(SessionError::NoTemplateLoaded)
    }

    /// A session that has not been finalized.
    fn sorting(&self) -> Result<&ActiveSession> {
        let session = self.session()?;
        if session.completed {
            return Err(SessionError::Completed);
        }
        Ok(session)
    }

    /// A session that is still accepting mutations.
    fn sorting_mut(&mut self) -> Result<&mut ActiveSession> {
        let session = self.active.as_mut().ok_or(SessionError::NoTemplateLoaded)?;
        if session.completed {
            return Err(SessionError::Completed);
        }
        Ok(session)
    }

    /// Move one card. `None` + `mark_unsure = false` returns it to
    /// unsorted; `None` + `mark_unsure = true` places it in the unsure
    /// bucket; `Some(category)` stacks it into that category.
    ///
    /// Every call counts as a move, including one that leaves the card
    /// where it already is. That mirrors how drag gestures are counted;
    /// `move_to_same_location_still_counts` pins the behavior.
    pub fn move_card(
        &mut self,
        card_id: &CardId,
        target: Option<&CategoryId>,
        mark_unsure: bool,
    ) -> Result<()> {
        let session = self.sorting_mut()?;

        // A non-null target must exist in the template even when the card
        // ends up unsure: an unknown category is a caller defect either way.
        if let Some(category_id) = target {
            if session.template.category(category_id).is_none() {
                tracing::warn!(%category_id, "move to unknown category");
                return Err(SessionError::UnknownCategory(category_id.clone()));
            }
        }

        let location = if mark_unsure {
            CardLocation::Unsure
        } else {
            match target {
                Some(category_id) => CardLocation::Assigned {
                    category_id: category_id.clone(),
                },
                None => CardLocation::Unsorted,
            }
        };

        let snapshot = session.placements.clone();
        session.placements.set_location(card_id, location)?;
        session.undo_stack.push(snapshot);
        session.moves_count += 1;
        tracing::debug!(%card_id, moves = session.moves_count, "card moved");
        Ok(())
    }

    /// Restore the placements from before the most recent move. Silently
    /// does nothing when there is nothing to undo.
    pub fn undo(&mut self) -> Result<()> {
        let session = self.sorting_mut()?;
        if let Some(previous) = session.undo_stack.pop() {
            session.placements = previous;
            session.undo_count += 1;
            tracing::debug!(undos = session.undo_count, "undo applied");
        }
        Ok(())
    }

    /// Start over: every card back to unsorted, counters and undo history
    /// cleared, the clock re-stamped, and a fresh shuffle if the study
    /// randomizes. Also reopens a completed session.
    pub fn reset(&mut self) -> Result<()> {
        let session = self.active.as_mut().ok_or(SessionError::NoTemplateLoaded)?;
        session.placements.clear();
        session.undo_stack.clear();
        session.moves_count = 0;
        session.undo_count = 0;
        session.started_at = Utc::now();
        session.completed = false;
        if session.template.study.settings.randomize_card_order {
            session.display_order.shuffle(&mut rand::thread_rng());
        }
        tracing::debug!(session_id = %session.session_id, "session reset");
        Ok(())
    }

    /// Whether a final result may be generated. Closed only when the study
    /// requires every card sorted and at least one remains unsorted;
    /// unsure-bucketed cards count as sorted.
    pub fn can_export(&self) -> bool {
        match &self.active {
            None => false,
            Some(session) => {
                !session.template.study.settings.require_all_cards_sorted
                    || session.placements.unsorted_count() == 0
            }
        }
    }

    /// Derive the final result and freeze the session.
    pub fn generate_result(
        &mut self,
        participant_name: &str,
        env: &SessionEnv,
    ) -> Result<StudyResult> {
        let session = self.active.as_mut().ok_or(SessionError::NoTemplateLoaded)?;
        if session.completed {
            return Err(SessionError::Completed);
        }
        if session.template.study.settings.require_all_cards_sorted {
            let unsorted = session.placements.unsorted_count();
            if unsorted > 0 {
                tracing::warn!(unsorted, "export blocked: sort incomplete");
                return Err(SessionError::SortIncomplete { unsorted });
            }
        }
        let result = Self::derive_result(session, participant_name, env);
        session.completed = true;
        tracing::debug!(template_id = %result.template_id, "result generated");
        Ok(result)
    }

    /// Derive a result from the current state without the completion gate
    /// and without freezing the session. The save-progress counterpart of
    /// [`generate_result`](Self::generate_result); both share one derivation.
    /// The final result is the last one: a completed session rejects
    /// further snapshots.
    pub fn save_progress(&self, participant_name: &str, env: &SessionEnv) -> Result<StudyResult> {
        let session = self.sorting()?;
        Ok(Self::derive_result(session, participant_name, env))
    }

    /// The single derivation both export paths use.
    fn derive_result(
        session: &ActiveSession,
        participant_name: &str,
        env: &SessionEnv,
    ) -> StudyResult {
        let completed_at = Utc::now();
        // Clamp: clock skew must not produce a negative duration.
        let duration_ms = (completed_at - session.started_at)
            .num_milliseconds()
            .max(0) as u64;

        let groups = session
            .template
            .categories
            .iter()
            .map(|category| OutputGroup {
                category_id: category.id.clone(),
                card_ids_in_order: session.placements.assigned_to(&category.id),
            })
            .collect();

        StudyResult {
            schema_version: SCHEMA_VERSION.to_string(),
            template_id: session.template.template_id.clone(),
            template_checksum_sha256: session.checksum.to_hex(),
            participant: Participant {
                name: participant_name.to_string(),
            },
            session: SessionInfo {
                started_at: session.started_at,
                completed_at,
                duration_ms,
                timezone: env.timezone.clone(),
                user_agent: env.user_agent.clone(),
                viewport: env.viewport,
            },
            output: Output {
                groups,
                unsure_card_ids: session.placements.unsure(),
            },
            telemetry: Telemetry {
                moves_count: session.moves_count,
                undo_count: session.undo_count,
            },
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read-only snapshots for the presentation layer
    // ─────────────────────────────────────────────────────────────────────

    /// The loaded template.
    pub fn template(&self) -> Result<&StudyTemplate> {
        Ok(&self.session()?.template)
    }

    /// The checksum captured at load time.
    pub fn template_checksum(&self) -> Result<&Sha256Checksum> {
        Ok(&self.session()?.checksum)
    }

    /// This session's id.
    pub fn session_id(&self) -> Result<&SessionId> {
        Ok(&self.session()?.session_id)
    }

    /// When the session started.
    pub fn started_at(&self) -> Result<DateTime<Utc>> {
        Ok(self.session()?.started_at)
    }

    /// Card ids in presentation order (shuffled at load if requested).
    pub fn display_order(&self) -> Result<&[CardId]> {
        Ok(&self.session()?.display_order)
    }

    /// A snapshot of the current placements.
    pub fn placements(&self) -> Result<&PlacementSet> {
        Ok(&self.session()?.placements)
    }

    /// Cards still unsorted, in placement order.
    pub fn unsorted_cards(&self) -> Result<Vec<CardId>> {
        Ok(self.session()?.placements.unsorted())
    }

    /// Cards in the unsure bucket, in placement order.
    pub fn unsure_cards(&self) -> Result<Vec<CardId>> {
        Ok(self.session()?.placements.unsure())
    }

    /// The groups as they would appear in a result derived right now.
    pub fn sorted_groups(&self) -> Result<Vec<OutputGroup>> {
        let session = self.session()?;
        Ok(session
            .template
            .categories
            .iter()
            .map(|category| OutputGroup {
                category_id: category.id.clone(),
                card_ids_in_order: session.placements.assigned_to(&category.id),
            })
            .collect())
    }

    /// `(sorted, total)` card counts.
    pub fn progress(&self) -> Result<(usize, usize)> {
        let placements = &self.session()?.placements;
        Ok((placements.sorted_count(), placements.len()))
    }

    /// Moves performed so far.
    pub fn moves_count(&self) -> u64 {
        self.active.as_ref().map_or(0, |s| s.moves_count)
    }

    /// Undos performed so far.
    pub fn undo_count(&self) -> u64 {
        self.active.as_ref().map_or(0, |s| s.undo_count)
    }

    /// Overwrite the session start time, so tests can simulate clock skew.
    #[cfg(test)]
    fn set_started_at(&mut self, at: DateTime<Utc>) {
        if let Some(session) = self.active.as_mut() {
            session.started_at = at;
        }
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

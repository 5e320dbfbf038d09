//! Set synchronization: persist a set, then materialize its cards one by one.
//!
//! The set write always commits before the first card is processed. Cards are
//! produced by a sequential fold over the inputs, so a failure at card `i`
//! leaves exactly cards `0..i` persisted. Nothing is rolled back.

use std::sync::Arc;

use chrono::Utc;
use futures::{stream, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::constants::{CONTENT_TYPE_RAW, ERR_TITLE_REQUIRED, ERR_TITLE_TOO_LONG, MAX_TITLE_LEN};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::generator::{is_raw, resolve_back, ContentGenerator};
use crate::models::{new_id, parse_id, CardRecord, CardStatus, Flashcard, FlashcardSet, SetRecord};

/// One term/definition pair submitted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct CardInput {
    pub term: String,
    pub definition: String,
}

/// Set metadata plus the cards to (re)create
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub cards: Vec<CardInput>,
    /// Generation style tag; absent or "raw" keeps definitions verbatim
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

/// A persisted set with its cards in order
#[derive(Debug, Clone, Serialize)]
pub struct SetWithCards {
    pub set: FlashcardSet,
    pub cards: Vec<Flashcard>,
}

/// Tag stored on a card; unset types are recorded as raw
fn recorded_content_type(content_type: Option<&str>) -> String {
    if is_raw(content_type) {
        CONTENT_TYPE_RAW.to_string()
    } else {
        content_type.unwrap_or(CONTENT_TYPE_RAW).trim().to_string()
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::InvalidInput(ERR_TITLE_TOO_LONG.to_string()));
    }
    Ok(())
}

/// Load a set by client-supplied id and check that `owner` owns it
///
/// Malformed id → invalid input, unknown id → not found, other owner → forbidden.
pub async fn find_owned_set(store: &Store, owner: &str, raw_id: &str) -> Result<(String, SetRecord)> {
    let set_id = parse_id(raw_id)?;
    let record = store.find_set(&set_id).await?.ok_or(AppError::SetNotFound)?;

    if record.owner != owner {
        tracing::warn!(set_id = %set_id, "Set access by non-owner");
        return Err(AppError::Forbidden);
    }

    Ok((set_id, record))
}

/// Creates and updates sets together with their generated cards
#[derive(Clone)]
pub struct Synchronizer {
    store: Store,
    generator: Arc<dyn ContentGenerator>,
}

impl Synchronizer {
    pub fn new(store: Store, generator: Arc<dyn ContentGenerator>) -> Self {
        Self { store, generator }
    }

    /// Create a new set owned by `owner` and all of its cards
    #[tracing::instrument(skip(self, draft), fields(set_id = tracing::field::Empty, cards = draft.cards.len()))]
    pub async fn create_set(&self, owner: &str, draft: SetDraft) -> Result<SetWithCards> {
        let title = draft.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(AppError::InvalidInput(ERR_TITLE_REQUIRED.to_string()));
        }
        validate_title(title)?;

        let set_id = new_id();
        tracing::Span::current().record("set_id", set_id.as_str());

        let record = SetRecord {
            owner: owner.to_string(),
            title: title.to_string(),
            description: draft.description.unwrap_or_default(),
            created_at: Utc::now().timestamp(),
        };
        self.store.insert_set(&set_id, record.clone()).await?;
        tracing::info!("Set saved");

        let cards = self
            .materialize_cards(owner, &set_id, draft.cards, draft.content_type.as_deref())
            .await?;

        tracing::info!(saved = cards.len(), "Set created");
        Ok(SetWithCards {
            set: FlashcardSet::from_record(&set_id, &record),
            cards,
        })
    }

    /// Update set metadata and replace all of its cards
    ///
    /// Only a non-empty title overwrites the stored one; a provided description
    /// always does. Existing cards are deleted, not diffed.
    #[tracing::instrument(skip(self, draft), fields(cards = draft.cards.len()))]
    pub async fn update_set(&self, owner: &str, set_id: &str, draft: SetDraft) -> Result<SetWithCards> {
        let (set_id, mut record) = find_owned_set(&self.store, owner, set_id).await?;

        let new_title = draft
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty());
        if let Some(title) = new_title {
            validate_title(title)?;
            record.title = title.to_string();
        }
        if let Some(description) = draft.description {
            record.description = description;
        }
        self.store.update_set(&set_id, record.clone()).await?;

        let removed = self.store.delete_cards_by_set(&set_id).await?;
        tracing::debug!(removed, "Existing cards removed");

        let cards = self
            .materialize_cards(owner, &set_id, draft.cards, draft.content_type.as_deref())
            .await?;

        tracing::info!(saved = cards.len(), "Set updated");
        Ok(SetWithCards {
            set: FlashcardSet::from_record(&set_id, &record),
            cards,
        })
    }

    /// Append a single card to an existing set
    #[tracing::instrument(skip(self, input))]
    pub async fn add_card(
        &self,
        owner: &str,
        set_id: &str,
        input: CardInput,
        content_type: Option<&str>,
    ) -> Result<Flashcard> {
        let (set_id, _) = find_owned_set(&self.store, owner, set_id).await?;
        self.create_card(owner, &set_id, 0, input, content_type).await
    }

    /// Persist one card per input, strictly in order, one at a time
    async fn materialize_cards(
        &self,
        owner: &str,
        set_id: &str,
        inputs: Vec<CardInput>,
        content_type: Option<&str>,
    ) -> Result<Vec<Flashcard>> {
        let capacity = inputs.len();
        stream::iter(inputs.into_iter().enumerate().map(Ok::<_, AppError>))
            .try_fold(Vec::with_capacity(capacity), |mut cards, (index, input)| async move {
                let card = self
                    .create_card(owner, set_id, index, input, content_type)
                    .await?;
                cards.push(card);
                Ok::<_, AppError>(cards)
            })
            .await
    }

    async fn create_card(
        &self,
        owner: &str,
        set_id: &str,
        index: usize,
        input: CardInput,
        content_type: Option<&str>,
    ) -> Result<Flashcard> {
        let back = resolve_back(self.generator.as_ref(), &input.definition, content_type).await;
        let generated = back.is_generated();

        let now = Utc::now().timestamp();
        let card_id = new_id();
        let record = CardRecord {
            owner: owner.to_string(),
            set_id: set_id.to_string(),
            front: input.term,
            back: back.into_text(),
            content_type: recorded_content_type(content_type),
            status: CardStatus::Learning,
            next_review_at: now,
            created_at: now,
        };
        self.store.insert_card(&card_id, record.clone()).await?;
        tracing::debug!(index, card_id = %card_id, generated, "Card saved");

        Ok(Flashcard::from_record(&card_id, &record))
    }
}

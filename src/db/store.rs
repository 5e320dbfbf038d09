//! Document store over redb.
//!
//! Every public operation runs in its own write (or read) transaction on the
//! blocking pool, so each call is atomic on its own but nothing spans two
//! calls. Callers that need ordering (the set synchronizer) get it by awaiting
//! one call before issuing the next.

use redb::{Database, ReadableDatabase, ReadableTable, Table};
use serde::{de::DeserializeOwned, Serialize};

use super::{tables, Db};
use crate::error::{AppError, Result};
use crate::models::{CardRecord, SetRecord, UserRecord};

const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();

type RecordTable<'txn> = Table<'txn, &'static str, &'static [u8]>;

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serde::encode_to_vec(value, BINCODE_CONFIG)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (value, _) = bincode::serde::decode_from_slice(bytes, BINCODE_CONFIG)?;
    Ok(value)
}

fn get_record<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> Result<Option<T>> {
    table.get(key)?.map(|guard| decode(guard.value())).transpose()
}

fn put_record<T: Serialize>(table: &mut RecordTable<'_>, key: &str, value: &T) -> Result<()> {
    let bytes = encode(value)?;
    table.insert(key, bytes.as_slice())?;
    Ok(())
}

fn get_ids(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> Result<Vec<String>> {
    Ok(get_record::<Vec<String>>(table, key)?.unwrap_or_default())
}

fn push_id(table: &mut RecordTable<'_>, key: &str, id: &str) -> Result<()> {
    let mut ids = get_ids(&*table, key)?;
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
        put_record(table, key, &ids)?;
    }
    Ok(())
}

fn remove_id(table: &mut RecordTable<'_>, key: &str, id: &str) -> Result<()> {
    let mut ids = get_ids(&*table, key)?;
    let before = ids.len();
    ids.retain(|existing| existing != id);
    if ids.len() != before {
        put_record(table, key, &ids)?;
    }
    Ok(())
}

/// Shared handle to the document store
#[derive(Clone)]
pub struct Store {
    db: Db,
}

impl Store {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Run a blocking database operation off the async executor
    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || op(&db)).await?
    }

    /// Check that a read transaction can be opened
    pub async fn ping(&self) -> Result<()> {
        self.run(|db| {
            db.begin_read()?;
            Ok(())
        })
        .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user, claiming its email in the same transaction
    pub async fn insert_user(&self, id: &str, record: UserRecord) -> Result<()> {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut emails = write_txn.open_table(tables::USER_EMAILS)?;
                if emails.get(record.email.as_str())?.is_some() {
                    return Err(AppError::UserAlreadyExists);
                }
                emails.insert(record.email.as_str(), id.as_str())?;

                let mut users = write_txn.open_table(tables::USERS)?;
                put_record(&mut users, &id, &record)?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    pub async fn find_user(&self, id: &str) -> Result<Option<UserRecord>> {
        let id = id.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let users = read_txn.open_table(tables::USERS)?;
            get_record(&users, &id)
        })
        .await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<(String, UserRecord)>> {
        let email = email.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let emails = read_txn.open_table(tables::USER_EMAILS)?;
            let id = match emails.get(email.as_str())? {
                Some(guard) => guard.value().to_string(),
                None => return Ok(None),
            };
            let users = read_txn.open_table(tables::USERS)?;
            Ok(get_record(&users, &id)?.map(|record| (id, record)))
        })
        .await
    }

    /// Read, change and write back a user record in one write transaction
    ///
    /// `apply` always sees the latest committed record, so concurrent edits of
    /// different fields do not overwrite each other. If `apply` fails nothing
    /// is written. A changed email moves its index entry.
    pub async fn modify_user<R, F>(&self, id: &str, apply: F) -> Result<(UserRecord, R)>
    where
        R: Send + 'static,
        F: FnOnce(&mut UserRecord) -> Result<R> + Send + 'static,
    {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let modified = {
                let mut users = write_txn.open_table(tables::USERS)?;
                let mut record: UserRecord =
                    get_record(&users, &id)?.ok_or(AppError::UserNotFound)?;
                let previous_email = record.email.clone();
                let output = apply(&mut record)?;

                if previous_email != record.email {
                    let mut emails = write_txn.open_table(tables::USER_EMAILS)?;
                    let taken_by_other = emails
                        .get(record.email.as_str())?
                        .map(|guard| guard.value() != id.as_str())
                        .unwrap_or(false);
                    if taken_by_other {
                        return Err(AppError::EmailInUse);
                    }
                    emails.remove(previous_email.as_str())?;
                    emails.insert(record.email.as_str(), id.as_str())?;
                }

                put_record(&mut users, &id, &record)?;
                (record, output)
            };
            write_txn.commit()?;
            Ok(modified)
        })
        .await
    }

    /// Remove a user record and its indexes; owned sets must be removed first
    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let existed = {
                let mut users = write_txn.open_table(tables::USERS)?;
                let record: Option<UserRecord> = get_record(&users, &id)?;
                if let Some(record) = &record {
                    let mut emails = write_txn.open_table(tables::USER_EMAILS)?;
                    emails.remove(record.email.as_str())?;
                    users.remove(id.as_str())?;
                }
                let mut user_sets = write_txn.open_table(tables::USER_SETS)?;
                user_sets.remove(id.as_str())?;
                record.is_some()
            };
            write_txn.commit()?;
            Ok(existed)
        })
        .await
    }

    // =========================================================================
    // Sets
    // =========================================================================

    pub async fn insert_set(&self, id: &str, record: SetRecord) -> Result<()> {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut sets = write_txn.open_table(tables::SETS)?;
                put_record(&mut sets, &id, &record)?;

                let mut user_sets = write_txn.open_table(tables::USER_SETS)?;
                push_id(&mut user_sets, &record.owner, &id)?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    pub async fn find_set(&self, id: &str) -> Result<Option<SetRecord>> {
        let id = id.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let sets = read_txn.open_table(tables::SETS)?;
            get_record(&sets, &id)
        })
        .await
    }

    /// Overwrite set metadata; the owner is never changed by this call
    pub async fn update_set(&self, id: &str, record: SetRecord) -> Result<()> {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut sets = write_txn.open_table(tables::SETS)?;
                let previous: SetRecord = get_record(&sets, &id)?.ok_or(AppError::SetNotFound)?;
                let record = SetRecord {
                    owner: previous.owner,
                    ..record
                };
                put_record(&mut sets, &id, &record)?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    /// Remove a set record and its index entries; its cards must be removed first
    pub async fn delete_set(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let existed = {
                let mut sets = write_txn.open_table(tables::SETS)?;
                let record: Option<SetRecord> = get_record(&sets, &id)?;
                if let Some(record) = &record {
                    let mut user_sets = write_txn.open_table(tables::USER_SETS)?;
                    remove_id(&mut user_sets, &record.owner, &id)?;
                    sets.remove(id.as_str())?;
                }
                let mut set_cards = write_txn.open_table(tables::SET_CARDS)?;
                set_cards.remove(id.as_str())?;
                record.is_some()
            };
            write_txn.commit()?;
            Ok(existed)
        })
        .await
    }

    /// All sets owned by a user, in creation order
    pub async fn find_sets_by_owner(&self, owner: &str) -> Result<Vec<(String, SetRecord)>> {
        let owner = owner.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let user_sets = read_txn.open_table(tables::USER_SETS)?;
            let sets = read_txn.open_table(tables::SETS)?;

            let mut found = Vec::new();
            for id in get_ids(&user_sets, &owner)? {
                if let Some(record) = get_record::<SetRecord>(&sets, &id)? {
                    found.push((id, record));
                }
            }
            Ok(found)
        })
        .await
    }

    // =========================================================================
    // Cards
    // =========================================================================

    /// Insert a card and append it to its set's ordered card index
    pub async fn insert_card(&self, id: &str, record: CardRecord) -> Result<()> {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut cards = write_txn.open_table(tables::CARDS)?;
                put_record(&mut cards, &id, &record)?;

                let mut set_cards = write_txn.open_table(tables::SET_CARDS)?;
                push_id(&mut set_cards, &record.set_id, &id)?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    pub async fn find_card(&self, id: &str) -> Result<Option<CardRecord>> {
        let id = id.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let cards = read_txn.open_table(tables::CARDS)?;
            get_record(&cards, &id)
        })
        .await
    }

    pub async fn update_card(&self, id: &str, record: CardRecord) -> Result<()> {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut cards = write_txn.open_table(tables::CARDS)?;
                if get_record::<CardRecord>(&cards, &id)?.is_none() {
                    return Err(AppError::CardNotFound);
                }
                put_record(&mut cards, &id, &record)?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    /// Cards of a set in insertion order
    pub async fn find_cards_by_set(&self, set_id: &str) -> Result<Vec<(String, CardRecord)>> {
        let set_id = set_id.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let set_cards = read_txn.open_table(tables::SET_CARDS)?;
            let cards = read_txn.open_table(tables::CARDS)?;

            let mut found = Vec::new();
            for id in get_ids(&set_cards, &set_id)? {
                if let Some(record) = get_record::<CardRecord>(&cards, &id)? {
                    found.push((id, record));
                }
            }
            Ok(found)
        })
        .await
    }

    pub async fn count_cards_by_set(&self, set_id: &str) -> Result<usize> {
        let set_id = set_id.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let set_cards = read_txn.open_table(tables::SET_CARDS)?;
            Ok(get_ids(&set_cards, &set_id)?.len())
        })
        .await
    }

    /// Delete every card of a set, returning how many were removed
    pub async fn delete_cards_by_set(&self, set_id: &str) -> Result<u64> {
        let set_id = set_id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let deleted = {
                let mut set_cards = write_txn.open_table(tables::SET_CARDS)?;
                let ids = get_ids(&set_cards, &set_id)?;

                let mut cards = write_txn.open_table(tables::CARDS)?;
                let mut deleted = 0;
                for id in &ids {
                    if cards.remove(id.as_str())?.is_some() {
                        deleted += 1;
                    }
                }
                set_cards.remove(set_id.as_str())?;
                deleted
            };
            write_txn.commit()?;
            Ok(deleted)
        })
        .await
    }

    pub async fn delete_card(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let existed = {
                let mut cards = write_txn.open_table(tables::CARDS)?;
                let record: Option<CardRecord> = get_record(&cards, &id)?;
                if let Some(record) = &record {
                    let mut set_cards = write_txn.open_table(tables::SET_CARDS)?;
                    remove_id(&mut set_cards, &record.set_id, &id)?;
                    cards.remove(id.as_str())?;
                }
                record.is_some()
            };
            write_txn.commit()?;
            Ok(existed)
        })
        .await
    }

    /// Every card owned by a user, across all of their sets
    pub async fn find_cards_by_owner(&self, owner: &str) -> Result<Vec<(String, CardRecord)>> {
        let owner = owner.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let user_sets = read_txn.open_table(tables::USER_SETS)?;
            let set_cards = read_txn.open_table(tables::SET_CARDS)?;
            let cards = read_txn.open_table(tables::CARDS)?;

            let mut found = Vec::new();
            for set_id in get_ids(&user_sets, &owner)? {
                for id in get_ids(&set_cards, &set_id)? {
                    if let Some(record) = get_record::<CardRecord>(&cards, &id)? {
                        found.push((id, record));
                    }
                }
            }
            Ok(found)
        })
        .await
    }
}

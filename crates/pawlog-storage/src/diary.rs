//! SQLite implementation of the DiaryStore port.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;

use pawlog_core::domain::{
    Attachment, AttachmentId, AttachmentKind, ChatId, ChatState, DiaryEntry, EntryCategory,
    EntryId, NewAttachment, NewEntry, NewPet, Pet, PetId, Species,
};
use pawlog_core::storage::DiaryStore;
use pawlog_core::{Error, Result};

use crate::pool::DatabasePool;

pub struct SqliteDiaryStore {
    pool: DatabasePool,
}

impl SqliteDiaryStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn db_err(e: sqlx::Error) -> Error {
    Error::Storage(e.to_string())
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("invalid datetime in database: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::Storage(format!("invalid date in database: {e}")))
}

fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct PetRow {
    id: i64,
    owner_chat_id: i64,
    name: String,
    species: String,
    breed: Option<String>,
    birth_date: Option<String>,
}

impl PetRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_chat_id: row.try_get("owner_chat_id")?,
            name: row.try_get("name")?,
            species: row.try_get("species")?,
            breed: row.try_get("breed")?,
            birth_date: row.try_get("birth_date")?,
        })
    }

    fn into_pet(self) -> Result<Pet> {
        let species = Species::parse(&self.species)
            .ok_or_else(|| Error::Storage(format!("unknown species: {}", self.species)))?;
        let birth_date = self.birth_date.as_deref().map(parse_date).transpose()?;

        Ok(Pet {
            id: PetId(self.id),
            owner_chat_id: ChatId(self.owner_chat_id),
            name: self.name,
            species,
            breed: self.breed,
            birth_date,
        })
    }
}

struct EntryRow {
    id: i64,
    pet_id: i64,
    category: String,
    body: String,
    occurred_on: String,
    created_at: String,
}

impl EntryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            pet_id: row.try_get("pet_id")?,
            category: row.try_get("category")?,
            body: row.try_get("body")?,
            occurred_on: row.try_get("occurred_on")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_entry(self) -> Result<DiaryEntry> {
        let category = EntryCategory::parse(&self.category)
            .ok_or_else(|| Error::Storage(format!("unknown category: {}", self.category)))?;

        Ok(DiaryEntry {
            id: EntryId(self.id),
            pet_id: PetId(self.pet_id),
            category,
            body: self.body,
            occurred_on: parse_date(&self.occurred_on)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct AttachmentRow {
    id: i64,
    entry_id: i64,
    kind: String,
    file_id: String,
    file_unique_id: Option<String>,
}

impl AttachmentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            entry_id: row.try_get("entry_id")?,
            kind: row.try_get("kind")?,
            file_id: row.try_get("file_id")?,
            file_unique_id: row.try_get("file_unique_id")?,
        })
    }

    fn into_attachment(self) -> Result<Attachment> {
        let kind = AttachmentKind::parse(&self.kind)
            .ok_or_else(|| Error::Storage(format!("unknown attachment kind: {}", self.kind)))?;

        Ok(Attachment {
            id: AttachmentId(self.id),
            entry_id: EntryId(self.entry_id),
            kind,
            file_id: self.file_id,
            file_unique_id: self.file_unique_id,
        })
    }
}

fn collect_entries(rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<DiaryEntry>> {
    let mut entries = Vec::with_capacity(rows.len());
    for row in &rows {
        entries.push(EntryRow::from_row(row).map_err(db_err)?.into_entry()?);
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// DiaryStore impl
// ---------------------------------------------------------------------------

#[async_trait]
impl DiaryStore for SqliteDiaryStore {
    async fn ensure_chat(&self, chat_id: ChatId) -> Result<ChatState> {
        sqlx::query(
            "INSERT INTO chats (chat_id, registered_at) VALUES (?, ?)
             ON CONFLICT (chat_id) DO NOTHING",
        )
        .bind(chat_id.0)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(db_err)?;

        let row = sqlx::query("SELECT * FROM chats WHERE chat_id = ?")
            .bind(chat_id.0)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(db_err)?;

        let active_pet_id: Option<i64> = row.try_get("active_pet_id").map_err(db_err)?;
        let registered_at: String = row.try_get("registered_at").map_err(db_err)?;

        Ok(ChatState {
            chat_id,
            active_pet_id: active_pet_id.map(PetId),
            registered_at: parse_datetime(&registered_at)?,
        })
    }

    async fn set_active_pet(&self, chat_id: ChatId, pet_id: PetId) -> Result<()> {
        // Ownership check first; the update itself has no way to tell a
        // missing pet from a foreign one.
        self.get_pet(chat_id, pet_id).await?;

        sqlx::query("UPDATE chats SET active_pet_id = ? WHERE chat_id = ?")
            .bind(pet_id.0)
            .bind(chat_id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn active_pet(&self, chat_id: ChatId) -> Result<Option<Pet>> {
        let row = sqlx::query(
            "SELECT p.* FROM pets p
             JOIN chats c ON c.active_pet_id = p.id
             WHERE c.chat_id = ? AND p.owner_chat_id = ?",
        )
        .bind(chat_id.0)
        .bind(chat_id.0)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => Ok(Some(PetRow::from_row(&row).map_err(db_err)?.into_pet()?)),
            None => Ok(None),
        }
    }

    async fn create_pet(&self, pet: NewPet) -> Result<Pet> {
        // The owner row must exist for the foreign key; creating it here
        // keeps the store usable without a prior ensure_chat call.
        self.ensure_chat(pet.owner_chat_id).await?;

        let result = sqlx::query(
            "INSERT INTO pets (owner_chat_id, name, species, breed, birth_date)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(pet.owner_chat_id.0)
        .bind(&pet.name)
        .bind(pet.species.as_str())
        .bind(&pet.breed)
        .bind(pet.birth_date.as_ref().map(format_date))
        .execute(&self.pool.writer)
        .await
        .map_err(db_err)?;

        Ok(Pet {
            id: PetId(result.last_insert_rowid()),
            owner_chat_id: pet.owner_chat_id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            birth_date: pet.birth_date,
        })
    }

    async fn list_pets(&self, chat_id: ChatId) -> Result<Vec<Pet>> {
        let rows = sqlx::query("SELECT * FROM pets WHERE owner_chat_id = ? ORDER BY id")
            .bind(chat_id.0)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(db_err)?;

        let mut pets = Vec::with_capacity(rows.len());
        for row in &rows {
            pets.push(PetRow::from_row(row).map_err(db_err)?.into_pet()?);
        }
        Ok(pets)
    }

    async fn get_pet(&self, chat_id: ChatId, pet_id: PetId) -> Result<Pet> {
        let row = sqlx::query("SELECT * FROM pets WHERE id = ? AND owner_chat_id = ?")
            .bind(pet_id.0)
            .bind(chat_id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => PetRow::from_row(&row).map_err(db_err)?.into_pet(),
            None => Err(Error::NotFound(format!("pet {}", pet_id.0))),
        }
    }

    async fn delete_pet(&self, chat_id: ChatId, pet_id: PetId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pets WHERE id = ? AND owner_chat_id = ?")
            .bind(pet_id.0)
            .bind(chat_id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_entry(
        &self,
        entry: NewEntry,
        attachments: Vec<NewAttachment>,
    ) -> Result<DiaryEntry> {
        let created_at = Utc::now();

        let mut tx = self.pool.writer.begin().await.map_err(db_err)?;

        let result = sqlx::query(
            "INSERT INTO entries (pet_id, category, body, occurred_on, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.pet_id.0)
        .bind(entry.category.as_str())
        .bind(&entry.body)
        .bind(format_date(&entry.occurred_on))
        .bind(format_datetime(&created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.message().contains("FOREIGN KEY") => {
                Error::NotFound(format!("pet {}", entry.pet_id.0))
            }
            _ => db_err(e),
        })?;

        let entry_id = result.last_insert_rowid();

        for att in &attachments {
            sqlx::query(
                "INSERT INTO attachments (entry_id, kind, file_id, file_unique_id)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(entry_id)
            .bind(att.kind.as_str())
            .bind(&att.file_id)
            .bind(&att.file_unique_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        tracing::debug!(
            entry_id,
            pet_id = entry.pet_id.0,
            attachments = attachments.len(),
            "diary entry committed"
        );

        Ok(DiaryEntry {
            id: EntryId(entry_id),
            pet_id: entry.pet_id,
            category: entry.category,
            body: entry.body,
            occurred_on: entry.occurred_on,
            created_at,
        })
    }

    async fn entries_in_range(
        &self,
        pet_id: PetId,
        start: NaiveDate,
        end: NaiveDate,
        category: Option<EntryCategory>,
    ) -> Result<Vec<DiaryEntry>> {
        // ISO dates compare lexicographically, so BETWEEN on the TEXT column
        // is an inclusive date-range match.
        let rows = match category {
            Some(cat) => {
                sqlx::query(
                    "SELECT * FROM entries
                     WHERE pet_id = ? AND occurred_on BETWEEN ? AND ? AND category = ?
                     ORDER BY occurred_on ASC, id ASC",
                )
                .bind(pet_id.0)
                .bind(format_date(&start))
                .bind(format_date(&end))
                .bind(cat.as_str())
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT * FROM entries
                     WHERE pet_id = ? AND occurred_on BETWEEN ? AND ?
                     ORDER BY occurred_on ASC, id ASC",
                )
                .bind(pet_id.0)
                .bind(format_date(&start))
                .bind(format_date(&end))
                .fetch_all(&self.pool.reader)
                .await
            }
        }
        .map_err(db_err)?;

        collect_entries(rows)
    }

    async fn recent_entries(&self, pet_id: PetId, limit: u32) -> Result<Vec<DiaryEntry>> {
        let rows = sqlx::query(
            "SELECT * FROM entries WHERE pet_id = ?
             ORDER BY occurred_on DESC, id DESC LIMIT ?",
        )
        .bind(pet_id.0)
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(db_err)?;

        collect_entries(rows)
    }

    async fn get_entry(&self, chat_id: ChatId, entry_id: EntryId) -> Result<DiaryEntry> {
        let row = sqlx::query(
            "SELECT e.* FROM entries e
             JOIN pets p ON e.pet_id = p.id
             WHERE e.id = ? AND p.owner_chat_id = ?",
        )
        .bind(entry_id.0)
        .bind(chat_id.0)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => EntryRow::from_row(&row).map_err(db_err)?.into_entry(),
            None => Err(Error::NotFound(format!("entry {}", entry_id.0))),
        }
    }

    async fn attachments_for(&self, entry_id: EntryId) -> Result<Vec<Attachment>> {
        let rows = sqlx::query("SELECT * FROM attachments WHERE entry_id = ? ORDER BY id")
            .bind(entry_id.0)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(db_err)?;

        let mut attachments = Vec::with_capacity(rows.len());
        for row in &rows {
            attachments.push(AttachmentRow::from_row(row).map_err(db_err)?.into_attachment()?);
        }
        Ok(attachments)
    }

    async fn get_attachment(
        &self,
        chat_id: ChatId,
        attachment_id: AttachmentId,
    ) -> Result<Attachment> {
        let row = sqlx::query(
            "SELECT a.* FROM attachments a
             JOIN entries e ON a.entry_id = e.id
             JOIN pets p ON e.pet_id = p.id
             WHERE a.id = ? AND p.owner_chat_id = ?",
        )
        .bind(attachment_id.0)
        .bind(chat_id.0)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => AttachmentRow::from_row(&row).map_err(db_err)?.into_attachment(),
            None => Err(Error::NotFound(format!("attachment {}", attachment_id.0))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteDiaryStore {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        SqliteDiaryStore::new(DatabasePool::new(&url).await.unwrap())
    }

    fn new_pet(chat: i64, name: &str) -> NewPet {
        NewPet {
            owner_chat_id: ChatId(chat),
            name: name.to_string(),
            species: Species::Cat,
            breed: None,
            birth_date: NaiveDate::from_ymd_opt(2020, 5, 1),
        }
    }

    fn new_entry(pet_id: PetId, cat: EntryCategory, body: &str, date: (i32, u32, u32)) -> NewEntry {
        NewEntry {
            pet_id,
            category: cat,
            body: body.to_string(),
            occurred_on: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    fn photo(file_id: &str) -> NewAttachment {
        NewAttachment {
            kind: AttachmentKind::Photo,
            file_id: file_id.to_string(),
            file_unique_id: Some(format!("u-{file_id}")),
        }
    }

    #[tokio::test]
    async fn ensure_chat_is_idempotent() {
        let store = test_store().await;
        let a = store.ensure_chat(ChatId(1)).await.unwrap();
        let b = store.ensure_chat(ChatId(1)).await.unwrap();
        assert_eq!(a.registered_at, b.registered_at);
        assert!(b.active_pet_id.is_none());
    }

    #[tokio::test]
    async fn create_list_and_get_pets() {
        let store = test_store().await;
        let murka = store.create_pet(new_pet(1, "Murka")).await.unwrap();
        let rex = store.create_pet(new_pet(1, "Rex")).await.unwrap();

        let pets = store.list_pets(ChatId(1)).await.unwrap();
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].name, "Murka");
        assert_eq!(pets[1].name, "Rex");

        let got = store.get_pet(ChatId(1), murka.id).await.unwrap();
        assert_eq!(got.name, "Murka");
        assert_eq!(got.birth_date, NaiveDate::from_ymd_opt(2020, 5, 1));

        // Another chat cannot see this pet.
        let err = store.get_pet(ChatId(2), rex.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn active_pet_selection_is_ownership_checked() {
        let store = test_store().await;
        let pet = store.create_pet(new_pet(1, "Murka")).await.unwrap();

        assert!(store.active_pet(ChatId(1)).await.unwrap().is_none());

        store.set_active_pet(ChatId(1), pet.id).await.unwrap();
        let active = store.active_pet(ChatId(1)).await.unwrap().unwrap();
        assert_eq!(active.id, pet.id);

        // A different chat cannot activate someone else's pet.
        store.ensure_chat(ChatId(2)).await.unwrap();
        let err = store.set_active_pet(ChatId(2), pet.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn entry_with_attachments_commits_together() {
        let store = test_store().await;
        let pet = store.create_pet(new_pet(1, "Murka")).await.unwrap();

        let entry = store
            .create_entry(
                new_entry(pet.id, EntryCategory::Vaccination, "Rabies shot", (2024, 3, 1)),
                vec![photo("f1"), photo("f2")],
            )
            .await
            .unwrap();

        assert_eq!(entry.category, EntryCategory::Vaccination);
        assert_eq!(entry.body, "Rabies shot");

        let atts = store.attachments_for(entry.id).await.unwrap();
        assert_eq!(atts.len(), 2);
        assert_eq!(atts[0].file_id, "f1");
        assert_eq!(atts[1].file_id, "f2");

        let got = store.get_entry(ChatId(1), entry.id).await.unwrap();
        assert_eq!(got.occurred_on, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[tokio::test]
    async fn entry_for_missing_pet_is_not_found() {
        let store = test_store().await;
        store.ensure_chat(ChatId(1)).await.unwrap();

        let err = store
            .create_entry(
                new_entry(PetId(999), EntryCategory::Other, "note", (2024, 1, 1)),
                vec![photo("f1")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // Nothing was written, not even the attachment.
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attachments")
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn range_query_is_inclusive_sorted_and_filterable() {
        let store = test_store().await;
        let pet = store.create_pet(new_pet(1, "Murka")).await.unwrap();

        for (cat, body, date) in [
            (EntryCategory::Symptom, "before", (2024, 1, 31)),
            (EntryCategory::Symptom, "first day", (2024, 2, 1)),
            (EntryCategory::Visit, "mid", (2024, 2, 10)),
            (EntryCategory::Symptom, "last day", (2024, 2, 29)),
            (EntryCategory::Symptom, "after", (2024, 3, 1)),
        ] {
            store
                .create_entry(new_entry(pet.id, cat, body, date), vec![])
                .await
                .unwrap();
        }

        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let all = store
            .entries_in_range(pet.id, start, end, None)
            .await
            .unwrap();
        let bodies: Vec<&str> = all.iter().map(|e| e.body.as_str()).collect();
        assert_eq!(bodies, vec!["first day", "mid", "last day"]);

        let symptoms = store
            .entries_in_range(pet.id, start, end, Some(EntryCategory::Symptom))
            .await
            .unwrap();
        assert_eq!(symptoms.len(), 2);
        assert!(symptoms.iter().all(|e| e.category == EntryCategory::Symptom));
    }

    #[tokio::test]
    async fn recent_entries_are_newest_first_and_limited() {
        let store = test_store().await;
        let pet = store.create_pet(new_pet(1, "Murka")).await.unwrap();

        for day in 1..=5 {
            store
                .create_entry(
                    new_entry(pet.id, EntryCategory::Other, &format!("day {day}"), (2024, 1, day)),
                    vec![],
                )
                .await
                .unwrap();
        }

        let recent = store.recent_entries(pet.id, 3).await.unwrap();
        let bodies: Vec<&str> = recent.iter().map(|e| e.body.as_str()).collect();
        assert_eq!(bodies, vec!["day 5", "day 4", "day 3"]);
    }

    #[tokio::test]
    async fn deleting_a_pet_cascades_to_entries_and_attachments() {
        let store = test_store().await;
        let pet = store.create_pet(new_pet(1, "Murka")).await.unwrap();
        store.set_active_pet(ChatId(1), pet.id).await.unwrap();

        store
            .create_entry(
                new_entry(pet.id, EntryCategory::Visit, "Checkup", (2024, 2, 1)),
                vec![photo("f1")],
            )
            .await
            .unwrap();

        assert!(store.delete_pet(ChatId(1), pet.id).await.unwrap());

        let entries: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entries")
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(entries.0, 0);

        let atts: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attachments")
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(atts.0, 0);

        // The dangling active-pet reference was cleared too.
        let chat = store.ensure_chat(ChatId(1)).await.unwrap();
        assert!(chat.active_pet_id.is_none());

        // Deleting again reports nothing removed.
        assert!(!store.delete_pet(ChatId(1), pet.id).await.unwrap());
    }

    #[tokio::test]
    async fn cancelled_dialog_persists_nothing() {
        use pawlog_core::dialog::{Dialog, EntryDialog, EntryInput, EntryOutcome, SessionStore};
        use std::time::Duration;

        let store = test_store().await;
        let pet = store.create_pet(new_pet(1, "Murka")).await.unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        // Drive an entry dialog all the way to the attachments step, with a
        // file already collected, then cancel instead of committing.
        let mut dialog = EntryDialog::new(pet.id);
        for input in [
            EntryInput::Category("symptom"),
            EntryInput::Text("Limping"),
            EntryInput::DateToday,
            EntryInput::Attachment(photo("f1")),
        ] {
            dialog = match dialog.apply(input, today) {
                EntryOutcome::Continue(d) => d,
                other => panic!("expected Continue, got {other:?}"),
            };
        }

        let sessions = SessionStore::new(Duration::from_secs(60));
        sessions.begin(ChatId(1), Dialog::NewEntry(dialog)).await;
        assert!(sessions.clear(ChatId(1)).await);

        // The store never saw the draft.
        let entries: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entries")
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(entries.0, 0);

        let atts: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attachments")
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(atts.0, 0);
    }

    #[tokio::test]
    async fn attachment_lookup_is_ownership_checked() {
        let store = test_store().await;
        let pet = store.create_pet(new_pet(1, "Murka")).await.unwrap();
        let entry = store
            .create_entry(
                new_entry(pet.id, EntryCategory::Visit, "Checkup", (2024, 2, 1)),
                vec![photo("f1")],
            )
            .await
            .unwrap();

        let atts = store.attachments_for(entry.id).await.unwrap();
        let att = store.get_attachment(ChatId(1), atts[0].id).await.unwrap();
        assert_eq!(att.kind, AttachmentKind::Photo);
        assert_eq!(att.file_id, "f1");

        let err = store.get_attachment(ChatId(2), atts[0].id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}

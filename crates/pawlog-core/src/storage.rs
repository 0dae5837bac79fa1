//! Storage port.
//!
//! The SQLite implementation lives in `pawlog-storage`; handlers depend only
//! on this trait so tests can run against a temp database.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Attachment, AttachmentId, ChatId, ChatState, DiaryEntry, EntryCategory, EntryId,
    NewAttachment, NewEntry, NewPet, Pet, PetId,
};
use crate::Result;

#[async_trait]
pub trait DiaryStore: Send + Sync {
    /// Upsert the chat row (created on first contact) and return its state.
    async fn ensure_chat(&self, chat_id: ChatId) -> Result<ChatState>;

    /// Mark a pet as the chat's active one. Fails with NotFound if the pet
    /// does not exist or belongs to another chat.
    async fn set_active_pet(&self, chat_id: ChatId, pet_id: PetId) -> Result<()>;

    /// The chat's active pet, if one is selected and still exists.
    async fn active_pet(&self, chat_id: ChatId) -> Result<Option<Pet>>;

    async fn create_pet(&self, pet: NewPet) -> Result<Pet>;

    /// All pets of the chat, oldest first.
    async fn list_pets(&self, chat_id: ChatId) -> Result<Vec<Pet>>;

    async fn get_pet(&self, chat_id: ChatId, pet_id: PetId) -> Result<Pet>;

    /// Delete a pet and, via cascade, its entries and their attachments.
    /// Returns whether a row was deleted.
    async fn delete_pet(&self, chat_id: ChatId, pet_id: PetId) -> Result<bool>;

    /// Write the entry and all its attachments in one transaction: either
    /// every row appears or none do.
    async fn create_entry(
        &self,
        entry: NewEntry,
        attachments: Vec<NewAttachment>,
    ) -> Result<DiaryEntry>;

    /// Entries with occurred-on in the inclusive `[start, end]` window,
    /// ascending by occurred-on, optionally limited to one category.
    async fn entries_in_range(
        &self,
        pet_id: PetId,
        start: NaiveDate,
        end: NaiveDate,
        category: Option<EntryCategory>,
    ) -> Result<Vec<DiaryEntry>>;

    /// Latest entries for the history view, newest first.
    async fn recent_entries(&self, pet_id: PetId, limit: u32) -> Result<Vec<DiaryEntry>>;

    /// Fetch one entry, checking it belongs to a pet of this chat.
    async fn get_entry(&self, chat_id: ChatId, entry_id: EntryId) -> Result<DiaryEntry>;

    async fn attachments_for(&self, entry_id: EntryId) -> Result<Vec<Attachment>>;

    /// Fetch one attachment, checking ownership through its entry's pet.
    async fn get_attachment(
        &self,
        chat_id: ChatId,
        attachment_id: AttachmentId,
    ) -> Result<Attachment>;
}

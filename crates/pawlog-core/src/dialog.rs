//! Per-chat conversational state machines.
//!
//! Two dialogs exist: adding a pet and adding a diary entry. Both are pure
//! state machines (`apply` consumes the dialog and returns an outcome), with
//! the per-chat lifecycle handled by [`SessionStore`]: a session is created
//! when a dialog starts, cleared on commit/cancel, overwritten by a new
//! dialog for the same chat, and lazily discarded after an idle timeout.

use std::collections::HashMap;

use chrono::{Duration as Days, NaiveDate};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::domain::{
    ChatId, EntryCategory, NewAttachment, NewEntry, PetId, Species,
};
use crate::validate;

// ---------------------------------------------------------------------------
// Entry dialog
// ---------------------------------------------------------------------------

/// Fields accumulated across the entry dialog.
#[derive(Clone, Debug)]
pub struct EntryDraft {
    pub pet_id: PetId,
    pub category: Option<EntryCategory>,
    pub body: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub attachments: Vec<NewAttachment>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStep {
    AwaitingCategory,
    AwaitingBody,
    AwaitingTimestamp,
    AwaitingAttachments,
}

#[derive(Clone, Debug)]
pub struct EntryDialog {
    step: EntryStep,
    draft: EntryDraft,
}

/// One incoming message, normalized by the adapter.
#[derive(Debug)]
pub enum EntryInput<'a> {
    /// A category slug from an inline button.
    Category(&'a str),
    /// Free text.
    Text(&'a str),
    DateToday,
    DateYesterday,
    Attachment(NewAttachment),
    /// "Done" button in the attachments step.
    Done,
}

#[derive(Debug)]
pub enum EntryOutcome {
    /// Dialog advanced (or collected an attachment); keep it alive.
    Continue(EntryDialog),
    /// Input rejected; same state, re-prompt with the message.
    Invalid(EntryDialog, String),
    /// Terminal: the entry and its attachments, ready for one atomic write.
    Commit(NewEntry, Vec<NewAttachment>),
}

impl EntryDialog {
    pub fn new(pet_id: PetId) -> Self {
        Self {
            step: EntryStep::AwaitingCategory,
            draft: EntryDraft {
                pet_id,
                category: None,
                body: None,
                occurred_on: None,
                attachments: Vec::new(),
            },
        }
    }

    pub fn step(&self) -> EntryStep {
        self.step
    }

    pub fn attachment_count(&self) -> usize {
        self.draft.attachments.len()
    }

    /// Advance the state machine by one input. `today` anchors the relative
    /// date choices and future-date validation.
    pub fn apply(mut self, input: EntryInput<'_>, today: NaiveDate) -> EntryOutcome {
        match (self.step, input) {
            (EntryStep::AwaitingCategory, EntryInput::Category(s))
            | (EntryStep::AwaitingCategory, EntryInput::Text(s)) => {
                match EntryCategory::parse(s) {
                    Some(cat) => {
                        self.draft.category = Some(cat);
                        self.step = EntryStep::AwaitingBody;
                        EntryOutcome::Continue(self)
                    }
                    None => EntryOutcome::Invalid(
                        self,
                        "Please pick one of the categories on the buttons.".to_string(),
                    ),
                }
            }

            (EntryStep::AwaitingBody, EntryInput::Text(s)) => {
                match validate::validate_entry_body(s) {
                    Ok(body) => {
                        self.draft.body = Some(body);
                        self.step = EntryStep::AwaitingTimestamp;
                        EntryOutcome::Continue(self)
                    }
                    Err(e) => EntryOutcome::Invalid(self, e.to_string()),
                }
            }

            (EntryStep::AwaitingTimestamp, EntryInput::DateToday) => {
                self.set_date(today)
            }
            (EntryStep::AwaitingTimestamp, EntryInput::DateYesterday) => {
                self.set_date(today - Days::days(1))
            }
            (EntryStep::AwaitingTimestamp, EntryInput::Text(s)) => {
                // Empty/"skip" falls back to today, per the optional-timestamp rule.
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("skip") {
                    return self.set_date(today);
                }
                match validate::parse_entry_date(trimmed, today) {
                    Ok(date) => self.set_date(date),
                    Err(e) => EntryOutcome::Invalid(self, e.to_string()),
                }
            }

            (EntryStep::AwaitingAttachments, EntryInput::Attachment(att)) => {
                let dup = att.file_unique_id.is_some()
                    && self
                        .draft
                        .attachments
                        .iter()
                        .any(|a| a.file_unique_id == att.file_unique_id);
                if dup {
                    return EntryOutcome::Invalid(
                        self,
                        "That file is already attached.".to_string(),
                    );
                }
                self.draft.attachments.push(att);
                EntryOutcome::Continue(self)
            }
            (EntryStep::AwaitingAttachments, EntryInput::Done) => self.commit(),
            (EntryStep::AwaitingAttachments, EntryInput::Text(s)) => {
                let t = s.trim();
                if t.eq_ignore_ascii_case("done") || t.eq_ignore_ascii_case("skip") {
                    self.commit()
                } else {
                    EntryOutcome::Invalid(
                        self,
                        "Send a photo or a document, or press Done to save the entry."
                            .to_string(),
                    )
                }
            }

            // Anything else does not fit the current state: re-prompt.
            (EntryStep::AwaitingAttachments, _) => EntryOutcome::Invalid(
                self,
                "Send a photo or a document, or press Done to save the entry."
                    .to_string(),
            ),
            (EntryStep::AwaitingCategory, _) => EntryOutcome::Invalid(
                self,
                "Please pick a category first.".to_string(),
            ),
            (EntryStep::AwaitingBody, _) => EntryOutcome::Invalid(
                self,
                "Please send the entry text first.".to_string(),
            ),
            (EntryStep::AwaitingTimestamp, _) => EntryOutcome::Invalid(
                self,
                "Please choose a date, type one as YYYY-MM-DD, or send \"skip\"."
                    .to_string(),
            ),
        }
    }

    fn set_date(mut self, date: NaiveDate) -> EntryOutcome {
        self.draft.occurred_on = Some(date);
        self.step = EntryStep::AwaitingAttachments;
        EntryOutcome::Continue(self)
    }

    fn commit(self) -> EntryOutcome {
        // Category/body/date are always present by the time attachments are
        // reachable; the unwrap-free match keeps that invariant checkable.
        let pet_id = self.draft.pet_id;
        let EntryDraft {
            category: Some(category),
            body: Some(body),
            occurred_on: Some(occurred_on),
            attachments,
            ..
        } = self.draft
        else {
            return EntryOutcome::Invalid(
                EntryDialog::new(pet_id),
                "Something went wrong with this entry, let's start over.".to_string(),
            );
        };

        EntryOutcome::Commit(
            NewEntry {
                pet_id,
                category,
                body,
                occurred_on,
            },
            attachments,
        )
    }
}

// ---------------------------------------------------------------------------
// Add-pet dialog
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub enum PetDialog {
    AwaitingName,
    AwaitingSpecies { name: String },
    AwaitingBreed { name: String, species: Species },
}

#[derive(Debug)]
pub enum PetInput<'a> {
    Text(&'a str),
    /// Species slug from an inline button.
    Species(&'a str),
    SkipBreed,
}

#[derive(Debug)]
pub enum PetOutcome {
    Continue(PetDialog),
    Invalid(PetDialog, String),
    /// Terminal: fields for the new pet; the handler adds the owning chat.
    Create {
        name: String,
        species: Species,
        breed: Option<String>,
    },
}

impl PetDialog {
    pub fn apply(self, input: PetInput<'_>) -> PetOutcome {
        match (self, input) {
            (PetDialog::AwaitingName, PetInput::Text(s)) => {
                match validate::validate_pet_name(s) {
                    Ok(name) => PetOutcome::Continue(PetDialog::AwaitingSpecies { name }),
                    Err(e) => PetOutcome::Invalid(PetDialog::AwaitingName, e.to_string()),
                }
            }

            (PetDialog::AwaitingSpecies { name }, PetInput::Species(s))
            | (PetDialog::AwaitingSpecies { name }, PetInput::Text(s)) => {
                match Species::parse(s) {
                    Some(species) => {
                        PetOutcome::Continue(PetDialog::AwaitingBreed { name, species })
                    }
                    None => PetOutcome::Invalid(
                        PetDialog::AwaitingSpecies { name },
                        "Please pick a species from the list.".to_string(),
                    ),
                }
            }

            (PetDialog::AwaitingBreed { name, species }, PetInput::SkipBreed) => {
                PetOutcome::Create {
                    name,
                    species,
                    breed: None,
                }
            }
            (PetDialog::AwaitingBreed { name, species }, PetInput::Text(s)) => {
                match validate::validate_breed(Some(s)) {
                    Ok(breed) => PetOutcome::Create {
                        name,
                        species,
                        breed,
                    },
                    Err(e) => PetOutcome::Invalid(
                        PetDialog::AwaitingBreed { name, species },
                        e.to_string(),
                    ),
                }
            }

            (state @ PetDialog::AwaitingName, _) => PetOutcome::Invalid(
                state,
                "Please send the pet's name first.".to_string(),
            ),
            (state @ PetDialog::AwaitingSpecies { .. }, _) => PetOutcome::Invalid(
                state,
                "Please pick a species from the list.".to_string(),
            ),
            (state @ PetDialog::AwaitingBreed { .. }, _) => PetOutcome::Invalid(
                state,
                "Type the breed or press Skip.".to_string(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Session store
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub enum Dialog {
    AddPet(PetDialog),
    NewEntry(EntryDialog),
}

struct Session {
    dialog: Dialog,
    last_activity: Instant,
}

/// Process-wide dialog sessions keyed by chat id.
///
/// Only one dialog may be in flight per chat; starting a new one overwrites
/// an abandoned prior session. `take` removes the session, so the caller
/// either re-inserts the advanced dialog via `resume` or lets it end.
pub struct SessionStore {
    idle_timeout: Duration,
    inner: Mutex<HashMap<i64, Session>>,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub async fn begin(&self, chat_id: ChatId, dialog: Dialog) {
        let mut map = self.inner.lock().await;
        map.insert(
            chat_id.0,
            Session {
                dialog,
                last_activity: Instant::now(),
            },
        );
    }

    /// Remove and return the chat's dialog, if any. Sessions idle for longer
    /// than the timeout are dropped here rather than by a background task.
    pub async fn take(&self, chat_id: ChatId) -> Option<Dialog> {
        let mut map = self.inner.lock().await;
        let session = map.remove(&chat_id.0)?;
        if session.last_activity.elapsed() >= self.idle_timeout {
            tracing::debug!(chat_id = chat_id.0, "discarding expired dialog session");
            return None;
        }
        Some(session.dialog)
    }

    /// Put an advanced dialog back, refreshing the idle timer.
    pub async fn resume(&self, chat_id: ChatId, dialog: Dialog) {
        self.begin(chat_id, dialog).await;
    }

    /// Discard the chat's session. Returns whether one existed.
    pub async fn clear(&self, chat_id: ChatId) -> bool {
        self.inner.lock().await.remove(&chat_id.0).is_some()
    }

    pub async fn is_active(&self, chat_id: ChatId) -> bool {
        let map = self.inner.lock().await;
        map.get(&chat_id.0)
            .map(|s| s.last_activity.elapsed() < self.idle_timeout)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttachmentKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    fn continue_or_panic(outcome: EntryOutcome) -> EntryDialog {
        match outcome {
            EntryOutcome::Continue(d) => d,
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    fn photo(file_id: &str) -> NewAttachment {
        NewAttachment {
            kind: AttachmentKind::Photo,
            file_id: file_id.to_string(),
            file_unique_id: Some(format!("u-{file_id}")),
        }
    }

    #[test]
    fn entry_happy_path_with_attachments() {
        let d = EntryDialog::new(PetId(1));
        let d = continue_or_panic(d.apply(EntryInput::Category("vaccination"), today()));
        assert_eq!(d.step(), EntryStep::AwaitingBody);
        let d = continue_or_panic(d.apply(EntryInput::Text("Rabies shot"), today()));
        assert_eq!(d.step(), EntryStep::AwaitingTimestamp);
        let d = continue_or_panic(d.apply(EntryInput::Text("2024-03-01"), today()));
        assert_eq!(d.step(), EntryStep::AwaitingAttachments);
        let d = continue_or_panic(d.apply(EntryInput::Attachment(photo("f1")), today()));
        assert_eq!(d.attachment_count(), 1);

        match d.apply(EntryInput::Done, today()) {
            EntryOutcome::Commit(entry, atts) => {
                assert_eq!(entry.pet_id, PetId(1));
                assert_eq!(entry.category, EntryCategory::Vaccination);
                assert_eq!(entry.body, "Rabies shot");
                assert_eq!(
                    entry.occurred_on,
                    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
                );
                assert_eq!(atts, vec![photo("f1")]);
            }
            other => panic!("expected Commit, got {other:?}"),
        }
    }

    #[test]
    fn invalid_category_repeats_the_same_state() {
        let d = EntryDialog::new(PetId(1));
        match d.apply(EntryInput::Text("walk"), today()) {
            EntryOutcome::Invalid(d, _) => assert_eq!(d.step(), EntryStep::AwaitingCategory),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_reprompts_and_skip_defaults_to_today() {
        let d = EntryDialog::new(PetId(1));
        let d = continue_or_panic(d.apply(EntryInput::Category("symptom"), today()));
        let d = continue_or_panic(d.apply(EntryInput::Text("Limping"), today()));

        let d = match d.apply(EntryInput::Text("03/01/2024"), today()) {
            EntryOutcome::Invalid(d, _) => {
                assert_eq!(d.step(), EntryStep::AwaitingTimestamp);
                d
            }
            other => panic!("expected Invalid, got {other:?}"),
        };

        let d = continue_or_panic(d.apply(EntryInput::Text("skip"), today()));
        match d.apply(EntryInput::Done, today()) {
            EntryOutcome::Commit(entry, atts) => {
                assert_eq!(entry.occurred_on, today());
                assert!(atts.is_empty());
            }
            other => panic!("expected Commit, got {other:?}"),
        }
    }

    #[test]
    fn yesterday_button_backdates_one_day() {
        let d = EntryDialog::new(PetId(3));
        let d = continue_or_panic(d.apply(EntryInput::Category("meds"), today()));
        let d = continue_or_panic(d.apply(EntryInput::Text("Dewormer"), today()));
        let d = continue_or_panic(d.apply(EntryInput::DateYesterday, today()));
        match d.apply(EntryInput::Done, today()) {
            EntryOutcome::Commit(entry, _) => {
                assert_eq!(entry.occurred_on, today() - Days::days(1));
            }
            other => panic!("expected Commit, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_attachment_is_rejected() {
        let d = EntryDialog::new(PetId(1));
        let d = continue_or_panic(d.apply(EntryInput::Category("visit"), today()));
        let d = continue_or_panic(d.apply(EntryInput::Text("Checkup"), today()));
        let d = continue_or_panic(d.apply(EntryInput::DateToday, today()));
        let d = continue_or_panic(d.apply(EntryInput::Attachment(photo("f1")), today()));
        match d.apply(EntryInput::Attachment(photo("f1")), today()) {
            EntryOutcome::Invalid(d, _) => assert_eq!(d.attachment_count(), 1),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn date_buttons_during_attachments_reprompt() {
        let d = EntryDialog::new(PetId(1));
        let d = continue_or_panic(d.apply(EntryInput::Category("visit"), today()));
        let d = continue_or_panic(d.apply(EntryInput::Text("Checkup"), today()));
        let d = continue_or_panic(d.apply(EntryInput::DateToday, today()));
        let d = continue_or_panic(d.apply(EntryInput::Attachment(photo("f1")), today()));

        // Stray taps on earlier keyboards must not disturb the draft.
        let d = match d.apply(EntryInput::DateYesterday, today()) {
            EntryOutcome::Invalid(d, _) => {
                assert_eq!(d.step(), EntryStep::AwaitingAttachments);
                d
            }
            other => panic!("expected Invalid, got {other:?}"),
        };
        let d = match d.apply(EntryInput::Category("symptom"), today()) {
            EntryOutcome::Invalid(d, _) => d,
            other => panic!("expected Invalid, got {other:?}"),
        };

        match d.apply(EntryInput::Done, today()) {
            EntryOutcome::Commit(entry, atts) => {
                assert_eq!(entry.category, EntryCategory::Visit);
                assert_eq!(entry.occurred_on, today());
                assert_eq!(atts.len(), 1);
            }
            other => panic!("expected Commit, got {other:?}"),
        }
    }

    #[test]
    fn attachment_in_wrong_state_reprompts() {
        let d = EntryDialog::new(PetId(1));
        match d.apply(EntryInput::Attachment(photo("f1")), today()) {
            EntryOutcome::Invalid(d, _) => assert_eq!(d.step(), EntryStep::AwaitingCategory),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn pet_dialog_happy_path() {
        let d = PetDialog::AwaitingName;
        let d = match d.apply(PetInput::Text(" Murka ")) {
            PetOutcome::Continue(d) => d,
            other => panic!("expected Continue, got {other:?}"),
        };
        let d = match d.apply(PetInput::Species("cat")) {
            PetOutcome::Continue(d) => d,
            other => panic!("expected Continue, got {other:?}"),
        };
        match d.apply(PetInput::SkipBreed) {
            PetOutcome::Create {
                name,
                species,
                breed,
            } => {
                assert_eq!(name, "Murka");
                assert_eq!(species, Species::Cat);
                assert_eq!(breed, None);
            }
            other => panic!("expected Create, got {other:?}"),
        }
    }

    #[test]
    fn pet_dialog_rejects_unknown_species() {
        let d = PetDialog::AwaitingSpecies {
            name: "Rex".to_string(),
        };
        match d.apply(PetInput::Species("dragon")) {
            PetOutcome::Invalid(PetDialog::AwaitingSpecies { name }, _) => {
                assert_eq!(name, "Rex");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn species_button_during_breed_step_reprompts() {
        let d = PetDialog::AwaitingBreed {
            name: "Rex".to_string(),
            species: Species::Dog,
        };
        match d.apply(PetInput::Species("cat")) {
            PetOutcome::Invalid(PetDialog::AwaitingBreed { name, species }, _) => {
                assert_eq!(name, "Rex");
                assert_eq!(species, Species::Dog);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn new_dialog_overwrites_the_previous_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let chat = ChatId(7);

        store
            .begin(chat, Dialog::AddPet(PetDialog::AwaitingName))
            .await;
        store
            .begin(chat, Dialog::NewEntry(EntryDialog::new(PetId(1))))
            .await;

        match store.take(chat).await {
            Some(Dialog::NewEntry(_)) => {}
            other => panic!("expected the entry dialog, got {other:?}"),
        }
        // take removed it
        assert!(store.take(chat).await.is_none());
    }

    #[tokio::test]
    async fn expired_session_is_discarded() {
        let store = SessionStore::new(Duration::ZERO);
        let chat = ChatId(9);
        store
            .begin(chat, Dialog::AddPet(PetDialog::AwaitingName))
            .await;
        assert!(!store.is_active(chat).await);
        assert!(store.take(chat).await.is_none());
    }

    #[tokio::test]
    async fn clear_reports_whether_a_session_existed() {
        let store = SessionStore::new(Duration::from_secs(60));
        let chat = ChatId(5);
        assert!(!store.clear(chat).await);
        store
            .begin(chat, Dialog::AddPet(PetDialog::AwaitingName))
            .await;
        assert!(store.clear(chat).await);
        assert!(!store.is_active(chat).await);
    }
}

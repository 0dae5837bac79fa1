use chrono::{DateTime, NaiveDate, Utc};

/// Telegram chat id (numeric). One chat owns its pets and their diary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PetId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttachmentId(pub i64);

/// Diary entry category. Closed enumeration so validation is exhaustive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryCategory {
    Symptom,
    Visit,
    Vaccination,
    Medication,
    Other,
}

impl EntryCategory {
    pub const ALL: [EntryCategory; 5] = [
        EntryCategory::Symptom,
        EntryCategory::Visit,
        EntryCategory::Vaccination,
        EntryCategory::Medication,
        EntryCategory::Other,
    ];

    /// Stable identifier used in the database and in callback payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryCategory::Symptom => "symptom",
            EntryCategory::Visit => "visit",
            EntryCategory::Vaccination => "vaccination",
            EntryCategory::Medication => "medication",
            EntryCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "symptom" => Some(EntryCategory::Symptom),
            "visit" => Some(EntryCategory::Visit),
            "vaccination" | "vaccine" => Some(EntryCategory::Vaccination),
            "medication" | "meds" => Some(EntryCategory::Medication),
            "other" => Some(EntryCategory::Other),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EntryCategory::Symptom => "🤒",
            EntryCategory::Visit => "🏥",
            EntryCategory::Vaccination => "💉",
            EntryCategory::Medication => "💊",
            EntryCategory::Other => "📝",
        }
    }

    /// User-facing label with icon.
    pub fn label(&self) -> &'static str {
        match self {
            EntryCategory::Symptom => "🤒 Symptom",
            EntryCategory::Visit => "🏥 Vet visit",
            EntryCategory::Vaccination => "💉 Vaccination",
            EntryCategory::Medication => "💊 Medication",
            EntryCategory::Other => "📝 Note",
        }
    }
}

impl std::fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Species {
    Cat,
    Dog,
    Other,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Cat => "cat",
            Species::Dog => "dog",
            Species::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cat" => Some(Species::Cat),
            "dog" => Some(Species::Dog),
            "other" => Some(Species::Other),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Species::Cat => "🐱",
            Species::Dog => "🐶",
            Species::Other => "🐾",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Species::Cat => "Cat",
            Species::Dog => "Dog",
            Species::Other => "Other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Photo,
    Document,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photo",
            AttachmentKind::Document => "document",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(AttachmentKind::Photo),
            "document" => Some(AttachmentKind::Document),
            _ => None,
        }
    }
}

/// Per-chat state row. Created on first contact.
#[derive(Clone, Debug)]
pub struct ChatState {
    pub chat_id: ChatId,
    pub active_pet_id: Option<PetId>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Pet {
    pub id: PetId,
    pub owner_chat_id: ChatId,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct NewPet {
    pub owner_chat_id: ChatId,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// One timestamped health record. Immutable once written.
#[derive(Clone, Debug)]
pub struct DiaryEntry {
    pub id: EntryId,
    pub pet_id: PetId,
    pub category: EntryCategory,
    pub body: String,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewEntry {
    pub pet_id: PetId,
    pub category: EntryCategory,
    pub body: String,
    pub occurred_on: NaiveDate,
}

/// File reference associated with one entry. The binary content stays on the
/// messaging platform; we keep only its opaque file id.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub id: AttachmentId,
    pub entry_id: EntryId,
    pub kind: AttachmentKind,
    pub file_id: String,
    pub file_unique_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAttachment {
    pub kind: AttachmentKind,
    pub file_id: String,
    pub file_unique_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrip_and_aliases() {
        for cat in EntryCategory::ALL {
            assert_eq!(EntryCategory::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(
            EntryCategory::parse("vaccine"),
            Some(EntryCategory::Vaccination)
        );
        assert_eq!(
            EntryCategory::parse("MEDS"),
            Some(EntryCategory::Medication)
        );
        assert_eq!(EntryCategory::parse("walk"), None);
    }

    #[test]
    fn species_roundtrip() {
        for sp in [Species::Cat, Species::Dog, Species::Other] {
            assert_eq!(Species::parse(sp.as_str()), Some(sp));
        }
        assert_eq!(Species::parse("hamster"), None);
    }
}

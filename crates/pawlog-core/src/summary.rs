//! Time-windowed summary builder.
//!
//! Pure: the adapter queries the store for the entries and this module only
//! validates the window and renders the report text.

use chrono::{Duration, NaiveDate};

use crate::domain::{DiaryEntry, EntryCategory, PetId};
use crate::formatting::escape_html;
use crate::{Error, Result};

/// Summary periods offered on the inline keyboard, in days.
pub const SUMMARY_PERIODS: [i64; 3] = [7, 30, 90];

#[derive(Clone, Debug)]
pub struct SummaryRequest {
    pub pet_id: PetId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub category: Option<EntryCategory>,
}

impl SummaryRequest {
    /// Window covering the last `days` days up to and including `today`.
    pub fn last_days(pet_id: PetId, days: i64, today: NaiveDate) -> Self {
        Self {
            pet_id,
            start: today - Duration::days(days),
            end: today,
            category: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(Error::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Render the report: entries grouped by category, each group sorted by
/// occurred-on ascending (the store returns them ascending already).
///
/// An empty result is not an error; it renders an explicit no-entries line.
pub fn render_summary(pet_name: &str, req: &SummaryRequest, entries: &[DiaryEntry]) -> String {
    let pet = escape_html(pet_name);

    if entries.is_empty() {
        return format!(
            "No entries for <b>{pet}</b> between {} and {}.",
            req.start, req.end
        );
    }

    let mut out = format!(
        "Summary for <b>{pet}</b>\nPeriod: {} — {}\n",
        req.start, req.end
    );

    for cat in EntryCategory::ALL {
        if let Some(filter) = req.category {
            if cat != filter {
                continue;
            }
        }
        let group: Vec<&DiaryEntry> = entries.iter().filter(|e| e.category == cat).collect();
        if group.is_empty() {
            continue;
        }

        out.push_str(&format!("\n{}\n", cat.label()));
        for e in group {
            out.push_str(&format!("{} · {}\n", e.occurred_on, escape_html(&e.body)));
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryId;
    use chrono::Utc;

    fn entry(id: i64, cat: EntryCategory, body: &str, date: (i32, u32, u32)) -> DiaryEntry {
        DiaryEntry {
            id: EntryId(id),
            pet_id: PetId(1),
            category: cat,
            body: body.to_string(),
            occurred_on: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn req(start: (i32, u32, u32), end: (i32, u32, u32)) -> SummaryRequest {
        SummaryRequest {
            pet_id: PetId(1),
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            category: None,
        }
    }

    #[test]
    fn reversed_range_is_invalid() {
        let r = req((2024, 3, 1), (2024, 1, 1));
        assert!(matches!(
            r.validate(),
            Err(Error::InvalidRange { .. })
        ));
        assert!(req((2024, 1, 1), (2024, 1, 1)).validate().is_ok());
    }

    #[test]
    fn last_days_window_is_inclusive_of_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let r = SummaryRequest::last_days(PetId(1), 7, today);
        assert_eq!(r.end, today);
        assert_eq!(r.start, NaiveDate::from_ymd_opt(2026, 8, 22).unwrap());
    }

    #[test]
    fn empty_result_renders_explicit_message() {
        let text = render_summary("Murka", &req((2024, 1, 1), (2024, 3, 1)), &[]);
        assert!(text.contains("No entries"));
        assert!(text.contains("Murka"));
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("2024-03-01"));
    }

    #[test]
    fn groups_by_category_in_fixed_order() {
        let entries = vec![
            entry(1, EntryCategory::Medication, "Dewormer", (2024, 1, 5)),
            entry(2, EntryCategory::Symptom, "Limping", (2024, 1, 2)),
            entry(3, EntryCategory::Symptom, "Sneezing", (2024, 1, 9)),
        ];
        let text = render_summary("Rex", &req((2024, 1, 1), (2024, 1, 31)), &entries);

        let symptom_pos = text.find("Symptom").unwrap();
        let meds_pos = text.find("Medication").unwrap();
        assert!(symptom_pos < meds_pos, "symptoms must come first:\n{text}");
        assert!(text.contains("2024-01-02 · Limping"));
        assert!(text.contains("2024-01-09 · Sneezing"));
        assert!(text.contains("2024-01-05 · Dewormer"));
    }

    #[test]
    fn category_filter_limits_groups() {
        let entries = vec![
            entry(1, EntryCategory::Vaccination, "Rabies shot", (2024, 3, 1)),
            entry(2, EntryCategory::Visit, "Checkup", (2024, 3, 2)),
        ];
        let mut r = req((2024, 3, 1), (2024, 3, 31));
        r.category = Some(EntryCategory::Vaccination);
        let text = render_summary("Rex", &r, &entries);
        assert!(text.contains("Rabies shot"));
        assert!(!text.contains("Checkup"));
    }

    #[test]
    fn body_html_is_escaped() {
        let entries = vec![entry(
            1,
            EntryCategory::Other,
            "<script>alert(1)</script>",
            (2024, 1, 1),
        )];
        let text = render_summary("Rex", &req((2024, 1, 1), (2024, 1, 31)), &entries);
        assert!(text.contains("&lt;script&gt;"));
        assert!(!text.contains("<script>"));
    }
}

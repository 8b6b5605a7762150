//! In-memory calendar data: districts and years.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::{Event, WasteType};

/// Result of an edit against a district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    Applied,
    AlreadyExists,
    NotFound,
}

impl EditOutcome {
    pub fn is_applied(self) -> bool {
        self == EditOutcome::Applied
    }
}

/// Events of one district, always in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    #[serde(default)]
    pub events: Vec<Event>,
}

impl District {
    pub fn new() -> Self {
        District::default()
    }

    pub fn find(&self, date: NaiveDate, waste_type: WasteType) -> Option<&Event> {
        self.events.iter().find(|e| e.matches(date, waste_type))
    }

    /// Insert an event unless one with the same `(date, type)` exists.
    pub fn add(&mut self, event: Event) -> EditOutcome {
        if self.find(event.date, event.waste_type).is_some() {
            return EditOutcome::AlreadyExists;
        }
        self.events.push(event);
        self.sort();
        EditOutcome::Applied
    }

    pub fn remove(&mut self, date: NaiveDate, waste_type: WasteType) -> EditOutcome {
        let before = self.events.len();
        self.events.retain(|e| !e.matches(date, waste_type));
        if self.events.len() == before {
            EditOutcome::NotFound
        } else {
            EditOutcome::Applied
        }
    }

    /// Take an event out of the district, returning it.
    pub fn take(&mut self, date: NaiveDate, waste_type: WasteType) -> Option<Event> {
        let idx = self.events.iter().position(|e| e.matches(date, waste_type))?;
        Some(self.events.remove(idx))
    }

    /// Change an event's date within this district.
    ///
    /// Refuses to create a second event with the target `(date, type)`.
    pub fn move_event(
        &mut self,
        old_date: NaiveDate,
        new_date: NaiveDate,
        waste_type: WasteType,
    ) -> EditOutcome {
        if old_date != new_date && self.find(new_date, waste_type).is_some() {
            return EditOutcome::AlreadyExists;
        }
        match self.events.iter_mut().find(|e| e.matches(old_date, waste_type)) {
            Some(event) => {
                event.date = new_date;
                self.sort();
                EditOutcome::Applied
            }
            None => EditOutcome::NotFound,
        }
    }

    /// Stable sort by date.
    pub fn sort(&mut self) {
        self.events.sort_by_key(|e| e.date);
    }

    pub fn is_sorted(&self) -> bool {
        self.events.windows(2).all(|w| w[0].date <= w[1].date)
    }
}

/// All districts of one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearData {
    pub year: i32,
    #[serde(default)]
    pub districts: BTreeMap<String, District>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl YearData {
    pub fn new(year: i32) -> Self {
        YearData {
            year,
            districts: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn district(&self, name: &str) -> Option<&District> {
        self.districts.get(name)
    }

    /// District by name, created empty on first use.
    pub fn district_mut(&mut self, name: &str) -> &mut District {
        self.districts.entry(name.to_string()).or_default()
    }

    pub fn event_count(&self) -> usize {
        self.districts.values().map(|d| d.events.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_add_keeps_events_sorted() {
        let mut district = District::new();
        district.add(Event::labelled(date(3, 1), WasteType::Restmuell));
        district.add(Event::labelled(date(1, 15), WasteType::Biotonne));
        district.add(Event::labelled(date(2, 10), WasteType::Papiertonne));

        let dates: Vec<_> = district.events.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(1, 15), date(2, 10), date(3, 1)]);
    }

    #[test]
    fn test_add_same_key_twice_reports_already_exists() {
        let mut district = District::new();
        let event = Event::labelled(date(4, 2), WasteType::Biotonne);

        assert_eq!(district.add(event.clone()), EditOutcome::Applied);
        assert_eq!(district.add(event), EditOutcome::AlreadyExists);
        assert_eq!(district.events.len(), 1);
    }

    #[test]
    fn test_same_date_different_type_is_a_distinct_event() {
        let mut district = District::new();
        district.add(Event::labelled(date(4, 2), WasteType::Biotonne));
        assert_eq!(
            district.add(Event::labelled(date(4, 2), WasteType::Restmuell)),
            EditOutcome::Applied
        );
        assert_eq!(district.events.len(), 2);
    }

    #[test]
    fn test_stable_order_for_equal_dates() {
        let mut district = District::new();
        district.add(Event::labelled(date(5, 5), WasteType::Papiertonne));
        district.add(Event::labelled(date(5, 5), WasteType::Altkleider));
        district.add(Event::labelled(date(1, 1), WasteType::Restmuell));

        let types: Vec<_> = district.events.iter().map(|e| e.waste_type).collect();
        assert_eq!(
            types,
            vec![WasteType::Restmuell, WasteType::Papiertonne, WasteType::Altkleider]
        );
    }

    #[test]
    fn test_remove_and_missing_remove() {
        let mut district = District::new();
        district.add(Event::labelled(date(6, 1), WasteType::Sondermuell));

        assert_eq!(district.remove(date(6, 2), WasteType::Sondermuell), EditOutcome::NotFound);
        assert_eq!(district.remove(date(6, 1), WasteType::Sondermuell), EditOutcome::Applied);
        assert!(district.events.is_empty());
    }

    #[test]
    fn test_move_resorts() {
        let mut district = District::new();
        district.add(Event::labelled(date(1, 10), WasteType::Restmuell));
        district.add(Event::labelled(date(2, 10), WasteType::Restmuell));
        district.add(Event::labelled(date(3, 10), WasteType::Restmuell));

        let outcome = district.move_event(date(1, 10), date(2, 20), WasteType::Restmuell);
        assert_eq!(outcome, EditOutcome::Applied);
        assert!(district.is_sorted());
        assert_eq!(district.events[1].date, date(2, 20));
    }

    #[test]
    fn test_move_onto_existing_key_is_refused() {
        let mut district = District::new();
        district.add(Event::labelled(date(1, 10), WasteType::Biotonne));
        district.add(Event::labelled(date(1, 24), WasteType::Biotonne));

        let outcome = district.move_event(date(1, 10), date(1, 24), WasteType::Biotonne);
        assert_eq!(outcome, EditOutcome::AlreadyExists);
        assert_eq!(district.events.len(), 2);
        assert_eq!(district.events[0].date, date(1, 10));
    }

    #[test]
    fn test_mixed_edit_sequence_stays_sorted() {
        let mut district = District::new();
        let days = [17, 3, 29, 8, 22, 1, 14];
        for (i, d) in days.iter().enumerate() {
            district.add(Event::labelled(date(7, *d), WasteType::ALL[i % 6]));
            assert!(district.is_sorted());
        }
        district.move_event(date(7, 1), date(7, 30), WasteType::ALL[5]);
        assert!(district.is_sorted());
        district.remove(date(7, 17), WasteType::ALL[0]);
        assert!(district.is_sorted());
        district.move_event(date(7, 29), date(7, 2), WasteType::ALL[2]);
        assert!(district.is_sorted());
    }

    #[test]
    fn test_district_mut_creates_lazily() {
        let mut year = YearData::new(2025);
        assert!(year.district("Silbach").is_none());
        year.district_mut("Silbach")
            .add(Event::labelled(date(1, 2), WasteType::Restmuell));
        assert_eq!(year.event_count(), 1);
    }
}

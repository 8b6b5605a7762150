//! The calendar store: every loaded year, kept in sync with its files.
//!
//! One `RwLock` guards the whole year map. Readers clone what they need and
//! release the lock; writers hold it across both the in-memory change and
//! the file write that reflects it, so nobody observes one without the other.
//!
//! Memory is authoritative for an open store. A year whose draft could not
//! be written is tracked as unsaved and still counts as pending; commit
//! rewrites the draft from memory before promoting it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::codec;
use crate::draft::Drafts;
use crate::durable;
use crate::error::{StoreError, StoreResult};
use crate::event::{Event, WasteType};
use crate::layout::DataLayout;
use crate::year::{District, EditOutcome, YearData};

type Years = BTreeMap<i32, YearData>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Read-only; drafts on disk are ignored.
    Serve,
    /// Edits allowed; drafts are preferred over committed files when loading.
    Edit,
}

/// What `load_all` found on disk.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<i32>,
    /// Years loaded from a draft left by an earlier session.
    pub recovered: Vec<i32>,
    pub skipped: Vec<(PathBuf, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub mode: Mode,
    pub years: Vec<i32>,
    pub pending_years: Vec<i32>,
    pub current_year: i32,
}

pub struct Store {
    layout: DataLayout,
    mode: Mode,
    years: RwLock<Years>,
    /// Years changed in memory whose draft write failed. Only modified while
    /// the `years` write lock is held.
    unsaved: Mutex<BTreeSet<i32>>,
}

impl Store {
    /// An empty store; call `load_all` to read the data directory.
    pub fn new(layout: DataLayout, mode: Mode) -> Self {
        Store {
            layout,
            mode,
            years: RwLock::new(BTreeMap::new()),
            unsaved: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn open(layout: DataLayout, mode: Mode) -> StoreResult<Self> {
        let store = Store::new(layout, mode);
        store.load_all()?;
        Ok(store)
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    fn drafts(&self) -> Drafts<'_> {
        Drafts::new(&self.layout)
    }

    fn require_edit(&self) -> StoreResult<()> {
        match self.mode {
            Mode::Edit => Ok(()),
            Mode::Serve => Err(StoreError::ReadOnly),
        }
    }

    // LOADING:

    /// Replace the in-memory state with what is on disk.
    ///
    /// In edit mode a year's draft wins over its committed file. Files that
    /// fail to decode are logged and skipped. Nothing is created on disk; the
    /// data directory appears with the first draft.
    pub fn load_all(&self) -> StoreResult<LoadReport> {
        let data_dir = self.layout.data_dir();
        let drafts = self.drafts();
        let mut candidates: BTreeSet<i32> = self.layout.committed_years().into_iter().collect();
        if self.mode == Mode::Edit {
            candidates.extend(drafts.pending_years());
        }

        let mut years = Years::new();
        let mut report = LoadReport::default();

        for year in candidates {
            let from_draft = self.mode == Mode::Edit && drafts.exists(year);
            let path = if from_draft {
                self.layout.draft_path(year)
            } else {
                self.layout.committed_path(year)
            };

            let data = match codec::read_file(&path) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping calendar file");
                    report.skipped.push((path, e.to_string()));
                    continue;
                }
            };

            if data.year != year {
                let reason = format!("file declares year {}", data.year);
                tracing::warn!(path = %path.display(), %reason, "skipping calendar file");
                report.skipped.push((path, reason));
                continue;
            }

            if from_draft {
                tracing::warn!(year, path = %path.display(), "loaded unsaved changes from draft");
                report.recovered.push(year);
            }
            tracing::debug!(year, districts = data.districts.len(), "loaded calendar");
            report.loaded.push(year);
            years.insert(year, data);
        }

        if self.mode == Mode::Serve && years.is_empty() {
            return Err(StoreError::NoCalendarData(data_dir.to_path_buf()));
        }

        tracing::info!(years = ?report.loaded, "loaded calendar years");
        let mut guard = self.years.write();
        *guard = years;
        self.unsaved.lock().clear();
        Ok(report)
    }

    // READS:

    pub fn get_year(&self, year: i32) -> Option<YearData> {
        self.years.read().get(&year).cloned()
    }

    pub fn year(&self, year: i32) -> StoreResult<YearData> {
        self.get_year(year).ok_or(StoreError::YearNotFound(year))
    }

    /// Events of one district in one year; empty if the district has none.
    pub fn district_events(&self, year: i32, district: &str) -> StoreResult<Vec<Event>> {
        let years = self.years.read();
        let data = years.get(&year).ok_or(StoreError::YearNotFound(year))?;
        Ok(data
            .district(district)
            .map(|d| d.events.clone())
            .unwrap_or_default())
    }

    /// Events of one district across every loaded year, by date.
    pub fn all_events(&self, district: &str) -> Vec<Event> {
        let mut events: Vec<Event> = {
            let years = self.years.read();
            years
                .values()
                .filter_map(|y| y.district(district))
                .flat_map(|d| d.events.iter().cloned())
                .collect()
        };
        events.sort_by_key(|e| e.date);
        events
    }

    pub fn available_years(&self) -> Vec<i32> {
        self.years.read().keys().copied().collect()
    }

    /// The year a caller should show by default, relative to today.
    pub fn current_year(&self) -> i32 {
        self.current_year_at(Local::now().year())
    }

    /// Today's year if loaded, else the next loaded year after it, else the
    /// latest loaded year, else `today` itself.
    pub fn current_year_at(&self, today: i32) -> i32 {
        let years = self.available_years();
        if years.contains(&today) {
            return today;
        }
        years
            .iter()
            .copied()
            .find(|&y| y > today)
            .or_else(|| years.last().copied())
            .unwrap_or(today)
    }

    pub fn has_draft(&self, year: i32) -> bool {
        self.drafts().exists(year)
    }

    /// Whether any year has a draft or an edit that could not be saved.
    pub fn has_pending_changes(&self) -> bool {
        self.drafts().any() || !self.unsaved.lock().is_empty()
    }

    /// Years with a draft or an unsaved edit, ascending.
    pub fn pending_years(&self) -> Vec<i32> {
        let mut years: BTreeSet<i32> = self.drafts().pending_years().into_iter().collect();
        years.extend(self.unsaved.lock().iter().copied());
        years.into_iter().collect()
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus {
            mode: self.mode,
            years: self.available_years(),
            pending_years: self.pending_years(),
            current_year: self.current_year(),
        }
    }

    // EDITS:

    /// Apply `edit` to a district of `year` and persist the year's draft.
    ///
    /// The year and district are created if absent, and dropped again if
    /// `edit` reports anything other than `Applied`. If the draft cannot be
    /// written the change stays in memory and `PersistFailed` is returned.
    pub fn mutate<F>(&self, year: i32, district: &str, edit: F) -> StoreResult<EditOutcome>
    where
        F: FnOnce(&mut District) -> EditOutcome,
    {
        self.require_edit()?;
        let mut years = self.years.write();

        let outcome = apply(&mut years, year, district, edit);
        if outcome.is_applied() {
            self.persist(&years, year)?;
        }
        Ok(outcome)
    }

    /// Add an event to the year of its date.
    pub fn add_event(&self, district: &str, event: Event) -> StoreResult<EditOutcome> {
        self.mutate(event.year(), district, |d| d.add(event))
    }

    pub fn delete_event(
        &self,
        district: &str,
        date: NaiveDate,
        waste_type: WasteType,
    ) -> StoreResult<EditOutcome> {
        self.require_edit()?;
        let year = date.year();
        let mut years = self.years.write();
        if !years.contains_key(&year) {
            return Err(StoreError::YearNotFound(year));
        }

        let outcome = apply(&mut years, year, district, |d| d.remove(date, waste_type));
        if outcome.is_applied() {
            self.persist(&years, year)?;
        }
        Ok(outcome)
    }

    /// Move an event to another date, possibly in another year.
    ///
    /// A cross-year move takes the event out of the old year and adds it to
    /// the new one (created if needed); both years get a draft.
    pub fn move_event(
        &self,
        district: &str,
        old_date: NaiveDate,
        new_date: NaiveDate,
        waste_type: WasteType,
    ) -> StoreResult<EditOutcome> {
        self.require_edit()?;
        let (from, to) = (old_date.year(), new_date.year());
        let mut years = self.years.write();
        if !years.contains_key(&from) {
            return Err(StoreError::YearNotFound(from));
        }

        if from == to {
            let outcome = apply(&mut years, from, district, |d| {
                d.move_event(old_date, new_date, waste_type)
            });
            if outcome.is_applied() {
                self.persist(&years, from)?;
            }
            return Ok(outcome);
        }

        let target_taken = years
            .get(&to)
            .and_then(|y| y.district(district))
            .is_some_and(|d| d.find(new_date, waste_type).is_some());
        if target_taken {
            return Ok(EditOutcome::AlreadyExists);
        }

        let taken = years
            .get_mut(&from)
            .and_then(|y| y.districts.get_mut(district))
            .and_then(|d| d.take(old_date, waste_type));
        let Some(mut event) = taken else {
            return Ok(EditOutcome::NotFound);
        };

        event.date = new_date;
        apply(&mut years, to, district, |d| d.add(event));

        let first = self.persist(&years, from);
        let second = self.persist(&years, to);
        first.and(second)?;
        Ok(EditOutcome::Applied)
    }

    fn persist(&self, years: &Years, year: i32) -> StoreResult<()> {
        let data = years.get(&year).ok_or(StoreError::YearNotFound(year))?;
        match self.drafts().save(data) {
            Ok(()) => {
                self.unsaved.lock().remove(&year);
                Ok(())
            }
            Err(e) => {
                tracing::error!(year, error = %e, "failed to save draft");
                self.unsaved.lock().insert(year);
                Err(StoreError::PersistFailed {
                    year,
                    source: Box::new(e),
                })
            }
        }
    }

    // COMMIT / REVERT:

    /// Promote the year's draft to its committed file, backing up the old one.
    pub fn commit(&self, year: i32) -> StoreResult<()> {
        self.require_edit()?;
        let mut years = self.years.write();
        self.commit_locked(&mut years, year)
    }

    /// Commit every year with a draft, oldest first.
    ///
    /// Stops at the first failure. Years already committed stay committed and
    /// are listed in the returned `Batch` error.
    pub fn commit_all(&self) -> StoreResult<Vec<i32>> {
        self.require_edit()?;
        let mut years = self.years.write();
        let mut completed = Vec::new();

        for year in self.pending_years() {
            if let Err(e) = self.commit_locked(&mut years, year) {
                tracing::error!(year, error = %e, ?completed, "commit stopped");
                return Err(StoreError::Batch {
                    completed,
                    failures: vec![(year, e)],
                });
            }
            completed.push(year);
        }

        Ok(completed)
    }

    fn commit_locked(&self, years: &mut Years, year: i32) -> StoreResult<()> {
        let drafts = self.drafts();
        let unsaved = self.unsaved.lock().contains(&year);
        if !unsaved && !drafts.exists(year) {
            return Err(StoreError::NoDraft(year));
        }

        // Bring the draft up to date with memory first, so an edit whose
        // draft save failed is what gets committed.
        if years.contains_key(&year) {
            self.persist(years, year)?;
        }

        let bytes = drafts.read(year)?;
        let data = codec::decode(&bytes, &self.layout.draft_path(year))?;

        durable::write_atomically(
            &self.layout.committed_path(year),
            &bytes,
            self.layout.backup_dir(),
            year,
        )?;
        drafts.discard(year)?;

        years.insert(year, data);
        tracing::info!(year, "changes committed");
        Ok(())
    }

    /// Drop the year's draft and reload it from the committed file.
    ///
    /// A year that only ever existed as a draft disappears from memory.
    pub fn revert(&self, year: i32) -> StoreResult<()> {
        self.require_edit()?;
        let mut years = self.years.write();
        self.revert_locked(&mut years, year)
    }

    /// Revert every year with a draft. Failures are logged and the remaining
    /// years are still reverted; any failures come back in a `Batch` error.
    pub fn revert_all(&self) -> StoreResult<Vec<i32>> {
        self.require_edit()?;
        let mut years = self.years.write();
        let mut completed = Vec::new();
        let mut failures = Vec::new();

        for year in self.pending_years() {
            match self.revert_locked(&mut years, year) {
                Ok(()) => completed.push(year),
                Err(e) => {
                    tracing::warn!(year, error = %e, "failed to revert");
                    failures.push((year, e));
                }
            }
        }

        if failures.is_empty() {
            Ok(completed)
        } else {
            Err(StoreError::Batch {
                completed,
                failures,
            })
        }
    }

    fn revert_locked(&self, years: &mut Years, year: i32) -> StoreResult<()> {
        let drafts = self.drafts();
        let has_draft = drafts.exists(year);
        if !has_draft && !self.unsaved.lock().contains(&year) {
            return Err(StoreError::NoDraft(year));
        }

        // Read the committed state before touching the draft so a bad file
        // leaves everything as it was.
        let committed = self.layout.committed_path(year);
        let data = if committed.exists() {
            Some(codec::read_file(&committed)?)
        } else {
            None
        };

        if has_draft {
            drafts.discard(year)?;
        }
        self.unsaved.lock().remove(&year);
        match data {
            Some(data) => {
                years.insert(year, data);
            }
            None => {
                years.remove(&year);
            }
        }

        tracing::info!(year, "changes reverted");
        Ok(())
    }
}

/// Run `edit` on a district, creating the year and district on demand and
/// removing them again if nothing was applied.
fn apply<F>(years: &mut Years, year: i32, district: &str, edit: F) -> EditOutcome
where
    F: FnOnce(&mut District) -> EditOutcome,
{
    let year_existed = years.contains_key(&year);

    let outcome = {
        let data = years.entry(year).or_insert_with(|| YearData::new(year));
        let district_existed = data.districts.contains_key(district);

        let outcome = edit(data.district_mut(district));
        if outcome.is_applied() {
            data.district_mut(district).sort();
        } else if !district_existed {
            data.districts.remove(district);
        }
        outcome
    };

    if !outcome.is_applied() && !year_existed {
        years.remove(&year);
    }
    outcome
}

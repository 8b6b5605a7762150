//! Per-year draft files holding unsaved edits.
//!
//! A draft shadows its committed file and is rewritten after every accepted
//! edit. Its existence is the only record that a year has pending changes.

use crate::codec;
use crate::durable;
use crate::error::{StoreError, StoreResult};
use crate::layout::DataLayout;
use crate::year::YearData;

pub struct Drafts<'a> {
    layout: &'a DataLayout,
}

impl<'a> Drafts<'a> {
    pub fn new(layout: &'a DataLayout) -> Self {
        Drafts { layout }
    }

    /// Write the year's current state to its draft file.
    ///
    /// Drafts are working state, so no backup is taken, but the temp-file
    /// rename still applies. Creates the data directory if needed.
    pub fn save(&self, year: &YearData) -> StoreResult<()> {
        let bytes = codec::encode(year)?;
        std::fs::create_dir_all(self.layout.data_dir())?;
        durable::write_replacing(&self.layout.draft_path(year.year), &bytes)
    }

    pub fn exists(&self, year: i32) -> bool {
        self.layout.draft_path(year).is_file()
    }

    pub fn any(&self) -> bool {
        !self.pending_years().is_empty()
    }

    pub fn pending_years(&self) -> Vec<i32> {
        self.layout.draft_years()
    }

    /// Raw bytes of the draft as it is on disk.
    pub fn read(&self, year: i32) -> StoreResult<Vec<u8>> {
        match std::fs::read(self.layout.draft_path(year)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NoDraft(year)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn load(&self, year: i32) -> StoreResult<YearData> {
        let bytes = self.read(year)?;
        codec::decode(&bytes, &self.layout.draft_path(year))
    }

    pub fn discard(&self, year: i32) -> StoreResult<()> {
        match std::fs::remove_file(self.layout.draft_path(year)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NoDraft(year)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, WasteType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DataLayout) {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path().join("data"), dir.path().join("backup"));
        std::fs::create_dir_all(layout.data_dir()).unwrap();
        (dir, layout)
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, layout) = setup();
        let drafts = Drafts::new(&layout);
        let mut year = YearData::new(2025);
        year.district_mut("Niedersfeld").add(Event::labelled(
            NaiveDate::from_ymd_opt(2025, 9, 9).unwrap(),
            WasteType::Papiertonne,
        ));

        assert!(!drafts.exists(2025));
        drafts.save(&year).unwrap();

        assert!(drafts.exists(2025));
        assert!(drafts.any());
        assert_eq!(drafts.pending_years(), vec![2025]);
        assert_eq!(drafts.load(2025).unwrap(), year);
        assert!(!layout.committed_path(2025).exists());
        assert!(!layout.backup_dir().exists());
    }

    #[test]
    fn test_discard_without_draft_is_no_draft() {
        let (_dir, layout) = setup();
        let drafts = Drafts::new(&layout);

        assert!(matches!(drafts.discard(2025), Err(StoreError::NoDraft(2025))));
        assert!(matches!(drafts.read(2025), Err(StoreError::NoDraft(2025))));
    }

    #[test]
    fn test_discard_removes_file() {
        let (_dir, layout) = setup();
        let drafts = Drafts::new(&layout);
        drafts.save(&YearData::new(2027)).unwrap();

        drafts.discard(2027).unwrap();

        assert!(!drafts.exists(2027));
        assert!(!drafts.any());
    }
}

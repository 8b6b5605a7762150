use anyhow::Result;
use owo_colors::OwoColorize;
use wastecal_core::{Store, StoreStatus};

pub fn run(store: &Store) -> Result<()> {
    print!("{}", render(&store.status()));
    Ok(())
}

fn render(status: &StoreStatus) -> String {
    let mut out = format!(
        "{} {}\n",
        "Showing by default:".dimmed(),
        status.current_year.bold()
    );

    if status.pending_years.is_empty() {
        out.push_str(&format!("{}\n", "No unsaved changes".dimmed()));
        return out;
    }

    out.push_str("Unsaved changes:\n");
    for year in &status.pending_years {
        out.push_str(&format!("   {}\n", year.yellow()));
    }
    out.push_str(&format!(
        "\n{}\n",
        "Run `wastecal commit` to save them or `wastecal revert` to discard them.".dimmed()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wastecal_core::{DataLayout, Event, Mode, WasteType, parse_date};

    #[test]
    fn test_status_lists_pending_years_without_touching_disk() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path().join("data"), dir.path().join("backup"));

        let store = Store::open(layout.clone(), Mode::Edit).unwrap();
        assert!(render(&store.status()).contains("No unsaved changes"));
        assert!(!layout.data_dir().exists());

        store
            .add_event(
                "Silbach",
                Event::labelled(parse_date("2026-02-03").unwrap(), WasteType::Biotonne),
            )
            .unwrap();
        let out = render(&store.status());
        assert!(out.contains("Unsaved changes"));
        assert!(out.contains("2026"));
    }
}

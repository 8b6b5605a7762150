use anyhow::Result;
use owo_colors::OwoColorize;
use wastecal_core::Store;

pub fn run(store: &Store) -> Result<()> {
    let years = store.available_years();
    if years.is_empty() {
        println!("{}", "No calendar years found".dimmed());
        return Ok(());
    }

    let current = store.current_year();
    let pending = store.pending_years();

    for year in years {
        let marker = if year == current { "*" } else { " " };
        let events = store.year(year).map(|y| y.event_count()).unwrap_or(0);
        let mut line = format!("{} {}  {}", marker, year.bold(), format!("{} events", events).dimmed());
        if pending.contains(&year) {
            line.push_str(&format!("  {}", "unsaved changes".yellow()));
        }
        println!("{}", line);
    }

    Ok(())
}

use anyhow::Result;
use owo_colors::OwoColorize;
use wastecal_core::Store;

use super::report_batch;

pub fn run(store: &Store, year: Option<i32>) -> Result<()> {
    if let Some(year) = year {
        store.commit(year)?;
        println!("{} {}", year, "committed".green());
        return Ok(());
    }

    match store.commit_all() {
        Ok(years) if years.is_empty() => {
            println!("{}", "Nothing to commit".dimmed());
            Ok(())
        }
        Ok(years) => {
            for year in years {
                println!("{} {}", year, "committed".green());
            }
            Ok(())
        }
        Err(e) => report_batch("committed", e),
    }
}

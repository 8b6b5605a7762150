use anyhow::Result;
use owo_colors::OwoColorize;
use wastecal_core::Store;

use super::report_batch;

pub fn run(store: &Store, year: Option<i32>) -> Result<()> {
    if let Some(year) = year {
        store.revert(year)?;
        println!("{} {}", year, "reverted".green());
        return Ok(());
    }

    match store.revert_all() {
        Ok(years) if years.is_empty() => {
            println!("{}", "Nothing to revert".dimmed());
            Ok(())
        }
        Ok(years) => {
            for year in years {
                println!("{} {}", year, "reverted".green());
            }
            Ok(())
        }
        Err(e) => report_batch("reverted", e),
    }
}

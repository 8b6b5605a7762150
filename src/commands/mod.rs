pub mod commit;
pub mod edit;
pub mod revert;
pub mod show;
pub mod status;
pub mod years;

use anyhow::Result;
use owo_colors::OwoColorize;
use wastecal_core::StoreError;

/// Print what a multi-year commit/revert managed before failing, then fail.
fn report_batch(verb: &str, err: StoreError) -> Result<()> {
    if let StoreError::Batch {
        completed,
        failures,
    } = &err
    {
        for year in completed {
            println!("{} {}", year, verb.green());
        }
        for (year, e) in failures {
            println!("{} {}", year, e.to_string().red());
        }
    }
    Err(err.into())
}

use anyhow::Result;
use owo_colors::OwoColorize;
use wastecal_core::Store;

use crate::render::{Render, render_district};

pub fn run(store: &Store, year: Option<i32>, district: Option<&str>, json: bool) -> Result<()> {
    let year = year.unwrap_or_else(|| store.current_year());
    let data = store.year(year)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let districts: Vec<_> = match district {
        Some(name) => data
            .districts
            .get_key_value(name)
            .into_iter()
            .collect(),
        None => data.districts.iter().collect(),
    };

    if districts.is_empty() {
        println!("{}", format!("No events in {}", year).dimmed());
        return Ok(());
    }

    for (i, (name, district)) in districts.iter().enumerate() {
        println!("{}", render_district(name));
        for event in &district.events {
            println!("   {}", event.render());
        }

        if i < districts.len() - 1 {
            println!();
        }
    }

    Ok(())
}

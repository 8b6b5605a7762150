//! Event editing commands. Every accepted edit lands in the year's draft.

use anyhow::Result;
use wastecal_core::{EditOutcome, Event, Store, WasteType, parse_date};

use crate::render::Render;

pub fn add(
    store: &Store,
    district: &str,
    date: &str,
    waste_type: &str,
    description: Option<String>,
) -> Result<()> {
    let outcome = add_event(store, district, date, waste_type, description)?;
    println!("{}", outcome.render());
    Ok(())
}

pub fn delete(store: &Store, district: &str, date: &str, waste_type: &str) -> Result<()> {
    let date = parse_date(date)?;
    let waste_type: WasteType = waste_type.parse()?;

    let outcome = store.delete_event(district, date, waste_type)?;
    println!("{}", outcome.render());
    Ok(())
}

pub fn move_event(
    store: &Store,
    district: &str,
    old_date: &str,
    new_date: &str,
    waste_type: &str,
) -> Result<()> {
    let old_date = parse_date(old_date)?;
    let new_date = parse_date(new_date)?;
    let waste_type: WasteType = waste_type.parse()?;

    let outcome = store.move_event(district, old_date, new_date, waste_type)?;
    println!("{}", outcome.render());
    Ok(())
}

fn add_event(
    store: &Store,
    district: &str,
    date: &str,
    waste_type: &str,
    description: Option<String>,
) -> Result<EditOutcome> {
    let date = parse_date(date)?;
    let waste_type: WasteType = waste_type.parse()?;
    let event = match description {
        Some(description) => Event::new(date, waste_type, description),
        None => Event::labelled(date, waste_type),
    };

    Ok(store.add_event(district, event)?)
}

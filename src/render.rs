//! Colored terminal rendering for store types.

use owo_colors::OwoColorize;
use wastecal_core::{EditOutcome, Event, WasteType};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for WasteType {
    fn render(&self) -> String {
        match self {
            WasteType::Restmuell => self.label().dimmed().to_string(),
            WasteType::Biotonne => self.label().green().to_string(),
            WasteType::Papiertonne => self.label().blue().to_string(),
            WasteType::GelberSack => self.label().yellow().to_string(),
            WasteType::Sondermuell => self.label().red().to_string(),
            WasteType::Altkleider => self.label().magenta().to_string(),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let date = self.date.format("%a %Y-%m-%d").to_string();
        if self.description == self.waste_type.label() {
            format!("{}  {}", date, self.waste_type.render())
        } else {
            format!(
                "{}  {} {}",
                date,
                self.waste_type.render(),
                format!("({})", self.description).dimmed()
            )
        }
    }
}

impl Render for EditOutcome {
    fn render(&self) -> String {
        match self {
            EditOutcome::Applied => "Saved to draft".green().to_string(),
            EditOutcome::AlreadyExists => "Already exists, nothing changed".yellow().to_string(),
            EditOutcome::NotFound => "No such event, nothing changed".yellow().to_string(),
        }
    }
}

pub fn render_district(name: &str) -> String {
    format!("🗑  {}", name.bold())
}

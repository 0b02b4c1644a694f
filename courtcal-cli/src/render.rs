//! Colored terminal rendering for core types.

use courtcal_core::diff::{DiffKind, EventDiff};
use courtcal_core::sync::SyncReport;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        let symbol = self.symbol();
        match self {
            DiffKind::Create => symbol.green().to_string(),
            DiffKind::Update => symbol.yellow().to_string(),
            DiffKind::Delete => symbol.red().to_string(),
        }
    }
}

impl Render for EventDiff {
    fn render(&self) -> String {
        let event = self.event();
        let time = event.start.format("%a %b %d %H:%M").to_string();
        format!("{} {} {}", self.kind.render(), event.summary, time.dimmed())
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        let team = format!("📅 {}", self.team);
        match &self.error {
            Some(error) => format!("{}\n   {}", team, error.red()),
            None => {
                let changes = format!(
                    "{} {} {}",
                    format!("+{}", self.added).green(),
                    format!("~{}", self.updated).yellow(),
                    format!("-{}", self.removed).red(),
                );
                format!("{} {}", team, changes)
            }
        }
    }
}

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

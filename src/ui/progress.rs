use crate::ui::theme;
use crate::ui::Icons;
use indicatif::{HumanDuration, ProgressBar};
use owo_colors::OwoColorize;
use std::time::Duration;

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        if console::Term::stdout().is_term() {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        Self { pb }
    }

    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    pub fn finish_with_message(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }

    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

/// End-of-run banner: elapsed time plus the headline counts.
pub fn finish_summary(duration: Duration, locations: usize, variables: usize, warnings: usize) {
    if crate::ui::is_quiet() {
        return;
    }
    println!();
    println!(
        "{} {}",
        Icons::CHECK.style(theme().success.clone()),
        format!("Analyzed in {}", HumanDuration(duration)).style(theme().success.clone())
    );
    crate::ui::summary_row(&format!("{} Locations", Icons::PIN), &locations.to_string());
    crate::ui::summary_row(&format!("{} Variables", Icons::PACKAGE), &variables.to_string());
    crate::ui::summary_row(&format!("{} Warnings", Icons::WARN), &warnings.to_string());
}

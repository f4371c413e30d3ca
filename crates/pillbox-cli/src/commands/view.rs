//! Today and History views.

use pillbox_core::view::{EMPTY_HISTORY, EMPTY_TODAY};
use pillbox_core::Config;

use super::{open_app, App};

pub fn render_today(app: &App) -> String {
    let mut out = format!("Pill Reminder\n{}\n\n", app.clock_label());
    if let Some(error) = app.error() {
        out.push_str(&format!("! {error}\n\n"));
    }

    let items = app.today();
    if items.is_empty() {
        out.push_str(EMPTY_TODAY);
        out.push('\n');
        out.push_str("Run `pillbox-cli med add` to add your first medication.\n");
        return out;
    }

    for item in items {
        out.push_str(&format!(
            "[{}] {} ({})\n    {} • {}\n    Time: {}\n    Last taken: {}\n\n",
            item.status.label(),
            item.name,
            item.id,
            item.dose,
            item.frequency,
            item.schedule,
            item.last_taken,
        ));
    }
    out
}

pub fn render_history(app: &App) -> String {
    let mut out = String::from("Medication History\n\n");
    if let Some(error) = app.error() {
        out.push_str(&format!("! {error}\n\n"));
    }

    let entries = app.history();
    if entries.is_empty() {
        out.push_str(EMPTY_HISTORY);
        out.push('\n');
        return out;
    }

    for entry in entries {
        out.push_str(&format!(
            "{} ({})\n    Last taken: {}\n\n",
            entry.name, entry.dose, entry.last_taken
        ));
    }
    out
}

pub fn today(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let app = open_app(&config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&app.today())?);
    } else {
        print!("{}", render_today(&app));
    }
    Ok(())
}

pub fn history(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let app = open_app(&config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&app.history())?);
    } else {
        print!("{}", render_history(&app));
    }
    Ok(())
}

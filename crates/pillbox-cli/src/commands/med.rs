//! Medication management commands for CLI.

use clap::Subcommand;
use pillbox_core::{Config, Frequency, MedicationPatch, NewMedication};

use super::{open_app, open_repository, App};

#[derive(Subcommand)]
pub enum MedAction {
    /// Add a medication
    Add {
        /// Medication name (e.g. "Lisinopril")
        name: String,
        /// Dosage (e.g. "10mg")
        #[arg(long)]
        dose: String,
        /// Once daily, Twice daily, Three times daily, Every 6 hours,
        /// Every 8 hours or As needed
        #[arg(long, default_value = "Once daily")]
        frequency: String,
        /// Comma-separated HH:MM dose times
        #[arg(long, default_value = "08:00")]
        time: String,
    },
    /// List medications as JSON
    List,
    /// Get medication details
    Get {
        /// Medication ID
        id: u64,
    },
    /// Record a dose taken now
    Take {
        /// Medication ID
        id: u64,
    },
    /// Update a medication
    Update {
        /// Medication ID
        id: u64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New dosage
        #[arg(long)]
        dose: Option<String>,
        /// New frequency label
        #[arg(long)]
        frequency: Option<String>,
        /// New comma-separated HH:MM dose times
        #[arg(long)]
        time: Option<String>,
    },
    /// Delete a medication
    Delete {
        /// Medication ID
        id: u64,
    },
}

fn loaded_app(config: &Config) -> Result<App, Box<dyn std::error::Error>> {
    let app = open_app(config)?;
    if let Some(message) = app.error() {
        return Err(message.into());
    }
    Ok(app)
}

pub fn run(action: MedAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        MedAction::Add {
            name,
            dose,
            frequency,
            time,
        } => {
            let input = NewMedication::new(name, dose)
                .with_frequency(frequency.parse::<Frequency>()?)
                .with_time(time);
            let mut app = loaded_app(&config)?;
            let event = app.add(input)?;
            if let Some(added) = app.medications().last() {
                println!("Medication added: {}", added.id);
            }
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        MedAction::List => {
            let repo = open_repository(&config)?;
            println!("{}", serde_json::to_string_pretty(&repo.list())?);
        }
        MedAction::Get { id } => {
            let repo = open_repository(&config)?;
            match repo.get(id) {
                Some(med) => println!("{}", serde_json::to_string_pretty(&med)?),
                None => return Err(format!("Medication not found: {id}").into()),
            }
        }
        MedAction::Take { id } => {
            let mut app = loaded_app(&config)?;
            let event = app.take(id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        MedAction::Update {
            id,
            name,
            dose,
            frequency,
            time,
        } => {
            let patch = MedicationPatch {
                name,
                dose,
                frequency: frequency.map(|f| f.parse::<Frequency>()).transpose()?,
                time,
                last_taken: None,
            };
            if patch.is_empty() {
                return Err(
                    "nothing to update: pass at least one of --name, --dose, --frequency, --time"
                        .into(),
                );
            }
            let mut repo = open_repository(&config)?;
            let med = repo.require_update(id, patch)?;
            println!("Medication updated:");
            println!("{}", serde_json::to_string_pretty(&med)?);
        }
        MedAction::Delete { id } => {
            let mut app = loaded_app(&config)?;
            let event = app.delete(id)?;
            println!("Medication deleted: {id}");
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}

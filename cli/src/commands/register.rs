//! Register and validate commands

use crate::{output::OutputFormat, GuestArgs};
use colored::Colorize;
use guestdesk_client::controller::SUCCESS_MESSAGE;
use guestdesk_client::{
    ClientConfig, GuestRegistry, Route, SubmissionController, SubmitOutcome, Validation,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Submit a guest through the form controller, then show the guest list
pub async fn register(guest: GuestArgs, config: &ClientConfig, format: OutputFormat) -> Result<(), String> {
    let registry = Arc::new(super::registry(config)?);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = SubmissionController::new(registry.clone(), Arc::new(tx))
        .with_navigation_delay(config.navigation_delay());

    for (field, value) in guest.to_draft().iter() {
        controller.update_field(field, value);
    }

    match controller.submit().await {
        SubmitOutcome::Succeeded => {
            let message = controller.success_message().unwrap_or(SUCCESS_MESSAGE);
            println!("{}", message.green());
        }
        SubmitOutcome::Invalid => {
            format.print_errors(&controller.errors());
            return Err("guest details are invalid".into());
        }
        SubmitOutcome::Failed => {
            let message = controller.general_error().unwrap_or_default();
            return Err(message);
        }
        SubmitOutcome::Ignored => return Err("a submission is already running".into()),
    }

    match rx.recv().await {
        Some(Route::GuestList) => {
            let guests = registry.list_guests().await.map_err(|e| e.to_string())?;
            format.print_guests(&guests);
        }
        None => tracing::debug!("Form closed before navigation"),
    }
    Ok(())
}

/// Run the schema only; nothing is sent
pub fn validate(guest: GuestArgs, format: OutputFormat) -> Result<(), String> {
    match guestdesk_client::validate(&guest.to_draft()) {
        Validation::Valid(record) => {
            match format {
                OutputFormat::Table => println!("{}", "Guest details are valid".green()),
                _ => format.print(&record),
            }
            Ok(())
        }
        Validation::Invalid(errors) => {
            format.print_errors(&errors);
            Err(format!("{} invalid field(s)", errors.len()))
        }
    }
}

//! Guest listing and maintenance commands

use crate::{output::OutputFormat, GuestArgs};
use guestdesk_client::{ClientConfig, GuestRegistry, Validation};

pub async fn list(config: &ClientConfig, format: OutputFormat) -> Result<(), String> {
    let guests = super::registry(config)?
        .list_guests()
        .await
        .map_err(|e| e.to_string())?;
    format.print_guests(&guests);
    Ok(())
}

pub async fn get(id: u64, config: &ClientConfig, format: OutputFormat) -> Result<(), String> {
    let guest = super::registry(config)?
        .get_guest(id)
        .await
        .map_err(|e| e.to_string())?;
    format.print_guests(std::slice::from_ref(&guest));
    Ok(())
}

/// Merge the given flags over the stored guest and send the result
pub async fn update(id: u64, guest: GuestArgs, config: &ClientConfig, format: OutputFormat) -> Result<(), String> {
    let registry = super::registry(config)?;
    let current = registry.get_guest(id).await.map_err(|e| e.to_string())?;

    let mut draft = current.to_draft();
    guest.apply_to(&mut draft);

    let record = match guestdesk_client::validate(&draft) {
        Validation::Valid(record) => record,
        Validation::Invalid(errors) => {
            format.print_errors(&errors);
            return Err("guest details are invalid".into());
        }
    };

    let updated = registry
        .update_guest(id, &record)
        .await
        .map_err(|e| e.to_string())?;
    format.print_guests(std::slice::from_ref(&updated));
    Ok(())
}

pub async fn delete(id: u64, config: &ClientConfig) -> Result<(), String> {
    let guest = super::registry(config)?
        .delete_guest(id)
        .await
        .map_err(|e| e.to_string())?;
    println!("Deleted guest {} ({})", guest.id, guest.name);
    Ok(())
}

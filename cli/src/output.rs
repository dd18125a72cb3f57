//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use guestdesk_client::{ErrorMap, GuestEntry};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn print<T: Serialize>(&self, data: &T) {
        match self {
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
        }
    }

    pub fn print_guests(&self, guests: &[GuestEntry]) {
        match self {
            OutputFormat::Table => {
                if guests.is_empty() {
                    println!("No guests registered yet");
                } else {
                    println!("{}", guest_table(guests));
                }
            }
            _ => self.print(&guests),
        }
    }

    pub fn print_errors(&self, errors: &ErrorMap) {
        match self {
            OutputFormat::Table => {
                for (key, message) in errors.iter() {
                    eprintln!("  {} {}", format!("{}:", key).bold(), message.red());
                }
            }
            _ => self.print(errors),
        }
    }
}

#[derive(Tabled)]
struct GuestRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "ID Card")]
    id_card: String,
    #[tabled(rename = "Remark")]
    remark: String,
    #[tabled(rename = "Registered")]
    registered: String,
}

impl From<&GuestEntry> for GuestRow {
    fn from(guest: &GuestEntry) -> Self {
        Self {
            id: guest.id,
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone: guest.phone.clone(),
            id_card: guest.id_card.clone(),
            remark: guest.remark.clone(),
            registered: guest.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn guest_table(guests: &[GuestEntry]) -> String {
    Table::new(guests.iter().map(GuestRow::from)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> GuestEntry {
        serde_json::from_value(serde_json::json!({
            "ID": 3,
            "CreatedAt": "2024-05-01T09:30:00Z",
            "UpdatedAt": "2024-05-01T09:30:00Z",
            "name": "Jane Doe",
            "email": "jane@x.com",
            "phone": "0812345678",
            "id_card": "123456789012",
            "remark": "Delivery",
            "status": "active"
        }))
        .unwrap()
    }

    #[test]
    fn test_guest_table() {
        let table = guest_table(&[entry()]);
        assert!(table.contains("ID Card"));
        assert!(table.contains("jane@x.com"));
        assert!(table.contains("2024-05-01 09:30"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_str("yaml", true), Ok(OutputFormat::Yaml));
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}

//! Guest domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Form field of a guest registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "idCard", alias = "id_card")]
    IdCard,
    #[serde(rename = "remark")]
    Remark,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::IdCard,
        Field::Remark,
    ];

    /// Form name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::IdCard => "idCard",
            Field::Remark => "remark",
        }
    }

    /// Human label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Email => "Email",
            Field::Phone => "Phone Number",
            Field::IdCard => "ID Card Number",
            Field::Remark => "Remark of Visit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "phone" => Ok(Field::Phone),
            "idCard" | "id_card" => Ok(Field::IdCard),
            "remark" => Ok(Field::Remark),
            other => Err(format!("unknown field: {}", other)),
        }
    }
}

/// Reason of visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Remark {
    Meeting,
    Interview,
    Delivery,
    Other,
}

impl Remark {
    pub const ALL: [Remark; 4] = [
        Remark::Meeting,
        Remark::Interview,
        Remark::Delivery,
        Remark::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Remark::Meeting => "Meeting",
            Remark::Interview => "Interview",
            Remark::Delivery => "Delivery",
            Remark::Other => "Other",
        }
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Remark {
    type Err = String;

    /// Case-sensitive: `meeting` is not a remark.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Remark::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown remark: {}", s))
    }
}

/// A fully validated guest, ready to be sent to the registry.
///
/// # Invariants
/// - Only built by [`crate::schema::validate`] once every field passed
/// - Values are kept exactly as typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestRecord {
    name: String,
    email: String,
    phone: String,
    id_card: String,
    remark: Remark,
}

impl GuestRecord {
    pub(crate) fn from_validated(
        name: String,
        email: String,
        phone: String,
        id_card: String,
        remark: Remark,
    ) -> Self {
        Self { name, email, phone, id_card, remark }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn id_card(&self) -> &str {
        &self.id_card
    }

    pub fn remark(&self) -> Remark {
        self.remark
    }
}

/// Registry-side lifecycle of a guest row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestStatus {
    #[default]
    Active,
    Deleted,
}

impl fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestStatus::Active => f.write_str("active"),
            GuestStatus::Deleted => f.write_str("deleted"),
        }
    }
}

/// A guest as stored by the registry: record fields plus metadata.
///
/// Registry rows are not re-validated, so the record fields stay raw strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestEntry {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "DeletedAt", default)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub id_card: String,
    pub remark: String,
    #[serde(default)]
    pub status: GuestStatus,
}

impl GuestEntry {
    pub fn is_active(&self) -> bool {
        self.status == GuestStatus::Active && self.deleted_at.is_none()
    }

    /// Pre-fill a draft from this entry, e.g. for an edit form.
    pub fn to_draft(&self) -> crate::draft::DraftState {
        let mut draft = crate::draft::DraftState::new();
        draft.set(Field::Name, self.name.clone());
        draft.set(Field::Email, self.email.clone());
        draft.set(Field::Phone, self.phone.clone());
        draft.set(Field::IdCard, self.id_card.clone());
        draft.set(Field::Remark, self.remark.clone());
        draft
    }
}

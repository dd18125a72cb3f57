//! Guest validation schema
//!
//! Every rule is a pure predicate over the raw draft value. [`validate`]
//! runs all of them and collects every violation before answering, so a
//! form can show all of its problems at once.

use crate::draft::DraftState;
use crate::error_map::ErrorMap;
use crate::guest::{Field, GuestRecord, Remark};
use regex::Regex;
use std::sync::OnceLock;

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_INVALID: &str = "Invalid email format";
pub const PHONE_INVALID: &str = "Phone must be 10-13 digits";
pub const ID_CARD_TOO_SHORT: &str = "ID Card must be at least 12 characters";
pub const ID_CARD_TOO_LONG: &str = "ID Card must be at most 20 characters";
pub const REMARK_INVALID: &str = "Remark must be one of: Meeting, Interview, Delivery, Other";

pub const ID_CARD_MIN_LEN: usize = 12;
pub const ID_CARD_MAX_LEN: usize = 20;

/// Outcome of running the schema over a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(GuestRecord),
    Invalid(ErrorMap),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn into_result(self) -> Result<GuestRecord, ErrorMap> {
        match self {
            Validation::Valid(record) => Ok(record),
            Validation::Invalid(errors) => Err(errors),
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `\d` is Unicode-aware in the regex crate; only ASCII digits are allowed.
    RE.get_or_init(|| Regex::new(r"^[0-9]{10,13}$").expect("phone pattern is valid"))
}

/// Check one raw value against its field rule.
///
/// Returns the message to show under the input, or `None` when the value
/// is acceptable. Absent values should be passed as `""`.
pub fn validate_field(field: Field, value: &str) -> Option<&'static str> {
    match field {
        Field::Name => value.is_empty().then_some(NAME_REQUIRED),
        Field::Email => (!email_regex().is_match(value)).then_some(EMAIL_INVALID),
        Field::Phone => (!phone_regex().is_match(value)).then_some(PHONE_INVALID),
        Field::IdCard => {
            let len = value.chars().count();
            if len < ID_CARD_MIN_LEN {
                Some(ID_CARD_TOO_SHORT)
            } else if len > ID_CARD_MAX_LEN {
                Some(ID_CARD_TOO_LONG)
            } else {
                None
            }
        }
        Field::Remark => value.parse::<Remark>().is_err().then_some(REMARK_INVALID),
    }
}

/// Validate a whole draft.
pub fn validate(draft: &DraftState) -> Validation {
    let mut errors = ErrorMap::new();
    for field in Field::ALL {
        if let Some(message) = validate_field(field, draft.value_or_empty(field)) {
            errors.insert(field, message);
        }
    }

    let remark = draft.value_or_empty(Field::Remark).parse::<Remark>();
    match remark {
        Ok(remark) if errors.is_empty() => {
            let value = |field: Field| draft.value_or_empty(field).to_string();
            Validation::Valid(GuestRecord::from_validated(
                value(Field::Name),
                value(Field::Email),
                value(Field::Phone),
                value(Field::IdCard),
                remark,
            ))
        }
        _ => Validation::Invalid(errors),
    }
}

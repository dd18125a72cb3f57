//! GuestDesk Client - Guest Registration Core
//!
//! Validation and submission pipeline for visitor registration, plus the
//! client for the guest registry API.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        GUESTDESK CLIENT                           │
//! │                                                                   │
//! │   user edits ──▶ ┌──────────────────────┐                         │
//! │                  │ SubmissionController │──▶ Navigator            │
//! │                  │ draft/errors/status  │    (guest list)         │
//! │                  └───┬──────────────┬───┘                         │
//! │                      │              │                             │
//! │           ┌──────────▼───┐   ┌──────▼─────────┐                   │
//! │           │  Validation  │   │ GuestRegistry  │                   │
//! │           │    Schema    │   │ (HTTP / memory)│                   │
//! │           └──────────────┘   └────────────────┘                   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod draft;
pub mod error_map;
pub mod guest;
pub mod memory;
pub mod schema;

use thiserror::Error;

pub use api::{ApiError, CreateReceipt, GuestRegistry, HttpGuestRegistry};
pub use config::ClientConfig;
pub use controller::{
    FormState, Navigator, Route, SubmissionController, SubmissionStatus, SubmitOutcome,
};
pub use draft::DraftState;
pub use error_map::{ErrorKey, ErrorMap};
pub use guest::{Field, GuestEntry, GuestRecord, GuestStatus, Remark};
pub use memory::InMemoryGuestRegistry;
pub use schema::{validate, validate_field, Validation};

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    #[error("config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

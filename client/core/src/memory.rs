//! In-memory guest registry (for testing and development)

use crate::api::{ApiError, ApiResult, CreateReceipt, GuestRegistry};
use crate::guest::{GuestEntry, GuestRecord, GuestStatus};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Number of calls received per operation
#[derive(Debug, Default)]
pub struct CallCounts {
    pub create: AtomicUsize,
    pub list: AtomicUsize,
    pub get: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

/// Registry kept in process memory.
///
/// Mirrors the remote registry closely enough for tests: email and ID card
/// are unique, delete is a soft delete. Failures and latency can be scripted.
pub struct InMemoryGuestRegistry {
    guests: RwLock<Vec<GuestEntry>>,
    created: RwLock<Vec<GuestRecord>>,
    failure: RwLock<Option<ApiError>>,
    rejection: RwLock<Option<String>>,
    latency: RwLock<Option<Duration>>,
    calls: CallCounts,
}

impl InMemoryGuestRegistry {
    pub fn new() -> Self {
        Self {
            guests: RwLock::new(Vec::new()),
            created: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
            rejection: RwLock::new(None),
            latency: RwLock::new(None),
            calls: CallCounts::default(),
        }
    }

    /// Make every following call fail with `error`
    pub fn fail_with(&self, error: ApiError) {
        *self.failure.write() = Some(error);
    }

    /// Answer creates with `success: false` and this message
    pub fn reject_creates(&self, message: impl Into<String>) {
        *self.rejection.write() = Some(message.into());
    }

    /// Delay every answer
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = Some(latency);
    }

    pub fn recover(&self) {
        *self.failure.write() = None;
        *self.rejection.write() = None;
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    pub fn create_calls(&self) -> usize {
        self.calls.create.load(Ordering::SeqCst)
    }

    /// Records received by `create_guest`, in order
    pub fn created_records(&self) -> Vec<GuestRecord> {
        self.created.read().clone()
    }

    async fn answer(&self) -> ApiResult<()> {
        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.failure.read().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn find(&self, id: u64) -> ApiResult<GuestEntry> {
        self.guests
            .read()
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 500,
                message: "Failed to fetch guest record".into(),
            })
    }

    fn conflicts(&self, record: &GuestRecord, except: Option<u64>) -> bool {
        self.guests.read().iter().any(|g| {
            Some(g.id) != except && (g.email == record.email() || g.id_card == record.id_card())
        })
    }
}

impl Default for InMemoryGuestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GuestRegistry for InMemoryGuestRegistry {
    async fn create_guest(&self, record: &GuestRecord) -> ApiResult<CreateReceipt> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.created.write().push(record.clone());
        self.answer().await?;

        if let Some(message) = self.rejection.read().clone() {
            return Ok(CreateReceipt { success: false, guest: None, error: Some(message) });
        }
        if self.conflicts(record, None) {
            return Err(ApiError::Status {
                status: 500,
                message: "Failed to create guest record".into(),
            });
        }

        let now = Utc::now();
        let entry = {
            let mut guests = self.guests.write();
            let entry = GuestEntry {
                id: guests.len() as u64 + 1,
                created_at: now,
                updated_at: now,
                deleted_at: None,
                name: record.name().to_string(),
                email: record.email().to_string(),
                phone: record.phone().to_string(),
                id_card: record.id_card().to_string(),
                remark: record.remark().to_string(),
                status: GuestStatus::Active,
            };
            guests.push(entry.clone());
            entry
        };

        Ok(CreateReceipt { success: true, guest: Some(entry), error: None })
    }

    async fn list_guests(&self) -> ApiResult<Vec<GuestEntry>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        self.answer().await?;
        Ok(self.guests.read().iter().filter(|g| g.is_active()).cloned().collect())
    }

    async fn get_guest(&self, id: u64) -> ApiResult<GuestEntry> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.answer().await?;
        self.find(id)
    }

    async fn update_guest(&self, id: u64, record: &GuestRecord) -> ApiResult<GuestEntry> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.answer().await?;
        self.find(id)?;
        if self.conflicts(record, Some(id)) {
            return Err(ApiError::Status {
                status: 500,
                message: "Failed to update guest record".into(),
            });
        }

        let mut guests = self.guests.write();
        let guest = guests
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| ApiError::Decode("guest vanished during update".into()))?;
        guest.name = record.name().to_string();
        guest.email = record.email().to_string();
        guest.phone = record.phone().to_string();
        guest.id_card = record.id_card().to_string();
        guest.remark = record.remark().to_string();
        guest.status = GuestStatus::Active;
        guest.updated_at = Utc::now();
        Ok(guest.clone())
    }

    async fn delete_guest(&self, id: u64) -> ApiResult<GuestEntry> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.answer().await?;

        let mut guests = self.guests.write();
        let guest = guests
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 500,
                message: "Failed to fetch guest record".into(),
            })?;
        guest.status = GuestStatus::Deleted;
        guest.updated_at = Utc::now();
        Ok(guest.clone())
    }
}

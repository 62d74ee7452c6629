use super::snapshot::{RequisitionId, RequisitionRecord};
use super::stages::StageId;
use std::collections::HashMap;
use std::sync::Mutex;

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("requisition already exists")]
    Conflict,
    #[error("requisition not found")]
    NotFound,
    #[error("stage changed since validation (expected {expected}, found {found})")]
    StageConflict { expected: StageId, found: StageId },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for requisitions.
///
/// Stage changes go through `commit_stage`, which takes the stage the caller
/// validated against and refuses the write if the stored stage no longer
/// matches. That turns validate-then-write into a conditional compare-and-swap
/// on the persisted stage field.
pub trait RequisitionStore: Send + Sync {
    fn insert(&self, record: RequisitionRecord) -> Result<RequisitionRecord, StoreError>;
    fn fetch(&self, id: &RequisitionId) -> Result<Option<RequisitionRecord>, StoreError>;
    fn list(&self) -> Result<Vec<RequisitionRecord>, StoreError>;
    /// Overwrite a record without a stage precondition. Used by side actions
    /// that touch snapshot fields but not the stage.
    fn save(&self, record: RequisitionRecord) -> Result<(), StoreError>;
    /// Write `record` only if the stored stage still equals `expected`.
    fn commit_stage(
        &self,
        expected: StageId,
        record: RequisitionRecord,
    ) -> Result<RequisitionRecord, StoreError>;
}

/// Mutex-guarded map store used by the service and the tests.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<HashMap<RequisitionId, RequisitionRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequisitionStore for InMemoryStore {
    fn insert(&self, record: RequisitionRecord) -> Result<RequisitionRecord, StoreError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &RequisitionId) -> Result<Option<RequisitionRecord>, StoreError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<RequisitionRecord>, StoreError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<RequisitionRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.0.cmp(&b.id.0)));
        Ok(all)
    }

    fn save(&self, record: RequisitionRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if !records.contains_key(&record.id) {
            return Err(StoreError::NotFound);
        }
        records.insert(record.id.clone(), record);
        Ok(())
    }

    fn commit_stage(
        &self,
        expected: StageId,
        record: RequisitionRecord,
    ) -> Result<RequisitionRecord, StoreError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let stored = records.get(&record.id).ok_or(StoreError::NotFound)?;
        if stored.stage != expected {
            return Err(StoreError::StageConflict {
                expected,
                found: stored.stage,
            });
        }
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}

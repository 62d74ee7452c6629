use super::stages::StageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for screened applications attached to a requisition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for requisitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequisitionId(pub String);

impl std::fmt::Display for RequisitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Committee decision recorded after the interview round. Its presence on the
/// snapshot is what gates the move to presidential approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewResult {
    pub passed: bool,
    #[serde(default)]
    pub score: Option<u16>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Personally-identifying fields that must not be retained on a requisition.
/// The security auditor reports on exactly these two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub id_card: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// The mutable field set the transition validator reads. Every field defaults
/// to falsy/absent so partially-filled requisitions validate without ceremony.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSnapshot {
    pub approved_by_vp: bool,
    pub has_applications: bool,
    pub selected_applications: Vec<ApplicationId>,
    pub approved_by_faculty: bool,
    pub interview_result: Option<InterviewResult>,
    pub approved_by_president: bool,
    pub position: Option<String>,
    pub personal_info: Option<PersonalInfo>,
}

/// One staffing requisition as held by the store: the submission details, the
/// current stage, the validator-visible snapshot, and the flags and timestamps
/// accrued by entry effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequisitionRecord {
    pub id: RequisitionId,
    pub faculty: String,
    pub headcount: u32,
    pub justification: String,
    pub stage: StageId,
    pub snapshot: RequestSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub vp_approved_at: Option<DateTime<Utc>>,
    pub recruiting_started_at: Option<DateTime<Utc>>,
    pub screening_completed: bool,
    pub interview_completed: bool,
    pub notified_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
}

impl RequisitionRecord {
    /// A freshly submitted requisition: initial stage, all flags false.
    pub fn new(
        id: RequisitionId,
        position: String,
        faculty: String,
        headcount: u32,
        justification: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            faculty,
            headcount,
            justification,
            stage: StageId::Submitted,
            snapshot: RequestSnapshot {
                position: Some(position),
                ..RequestSnapshot::default()
            },
            created_at: now,
            updated_at: now,
            vp_approved_at: None,
            recruiting_started_at: None,
            screening_completed: false,
            interview_completed: false,
            notified_at: None,
            confirmed_at: None,
            rejected_at: None,
        }
    }
}

use super::snapshot::RequisitionRecord;
use super::stages::StageId;
use chrono::{DateTime, Utc};

/// Approval flag implied by entering a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEffect {
    VpApproved,
    RecruitingStarted,
    ScreeningCompleted,
    FacultyApproved,
    InterviewCompleted,
    PresidentApproved,
    CandidateNotified,
}

/// The single declarative table of "entering stage X implies flags {...}".
/// Every write path (service transitions and the HTTP status patch alike)
/// consumes this table so the derived flags cannot drift.
pub const fn on_entry(stage: StageId) -> &'static [EntryEffect] {
    match stage {
        StageId::VpHr => &[EntryEffect::VpApproved],
        StageId::Recruiting => &[EntryEffect::RecruitingStarted],
        StageId::ApplicationReview => &[EntryEffect::ScreeningCompleted],
        StageId::InterviewScheduled => &[EntryEffect::FacultyApproved],
        StageId::President => &[EntryEffect::InterviewCompleted],
        StageId::Notified => &[EntryEffect::PresidentApproved, EntryEffect::CandidateNotified],
        _ => &[],
    }
}

fn apply(record: &mut RequisitionRecord, effect: EntryEffect, now: DateTime<Utc>) {
    match effect {
        EntryEffect::VpApproved => {
            record.snapshot.approved_by_vp = true;
            record.vp_approved_at = Some(now);
        }
        EntryEffect::RecruitingStarted => {
            record.recruiting_started_at = Some(now);
        }
        EntryEffect::ScreeningCompleted => {
            record.screening_completed = true;
        }
        EntryEffect::FacultyApproved => {
            record.snapshot.approved_by_faculty = true;
        }
        EntryEffect::InterviewCompleted => {
            record.interview_completed = true;
        }
        EntryEffect::PresidentApproved => {
            record.snapshot.approved_by_president = true;
        }
        EntryEffect::CandidateNotified => {
            record.notified_at = Some(now);
        }
    }
}

/// Apply every flag implied by entering `stage` to the record.
pub fn apply_entry_effects(record: &mut RequisitionRecord, stage: StageId, now: DateTime<Utc>) {
    for effect in on_entry(stage) {
        apply(record, *effect, now);
    }
}

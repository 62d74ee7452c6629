use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::audit::{audit, AuditReport};
use super::classifier::{classify, documents_for, ApplicantCategory};
use super::effects::apply_entry_effects;
use super::guidance::guidance_for;
use super::snapshot::{ApplicationId, InterviewResult, RequisitionId, RequisitionRecord};
use super::stages::StageId;
use super::store::{RequisitionStore, StoreError};
use super::transition::{TransitionOutcome, TransitionValidator};
use crate::security::rate_limit::RateLimiter;

static REQUISITION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_requisition_id() -> RequisitionId {
    let id = REQUISITION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequisitionId(format!("req-{id:06}"))
}

/// Submission payload for a new staffing requisition.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRequisition {
    pub position: String,
    pub faculty: String,
    #[serde(default = "default_headcount")]
    pub headcount: u32,
    #[serde(default)]
    pub justification: String,
}

fn default_headcount() -> u32 {
    1
}

/// Which stages a requisition may be rejected from. University policy differs
/// per deployment, so this is configuration: the default permits rejection
/// from any non-terminal stage.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectPolicy {
    AnyStage,
    From(Vec<StageId>),
}

impl RejectPolicy {
    pub fn allows(&self, stage: StageId) -> bool {
        match self {
            Self::AnyStage => !stage.is_terminal(),
            Self::From(stages) => stages.contains(&stage),
        }
    }
}

impl Default for RejectPolicy {
    fn default() -> Self {
        Self::AnyStage
    }
}

/// What came back from a proposed stage change: the validator's outcome, and
/// the committed record when the change was actually written.
#[derive(Debug)]
pub struct TransitionReceipt {
    pub outcome: TransitionOutcome,
    pub record: Option<RequisitionRecord>,
}

/// Error raised by the requisition service. Validation verdicts are not
/// errors; they travel inside `TransitionReceipt`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("requisition {id} already reached terminal stage {stage}")]
    Terminal { id: RequisitionId, stage: StageId },
    #[error("rejection is not allowed from stage {stage}")]
    RejectionNotAllowed { stage: StageId },
    #[error("confirmation requires the candidate to have been notified (stage is {stage})")]
    ConfirmationNotAllowed { stage: StageId },
}

/// Guidance payload for a requisition's stage, joined with the applicant
/// category and its required-document checklist.
#[derive(Debug, serde::Serialize)]
pub struct GuidanceView {
    pub stage: StageId,
    pub stage_label: &'static str,
    pub title: &'static str,
    pub steps: Vec<&'static str>,
    pub notes: &'static str,
    pub applicant_category: ApplicantCategory,
    pub required_documents: Vec<&'static str>,
}

/// Service composing the transition validator, the store, and the entry-effect
/// table. All stage writes go through the store's compare-and-swap commit.
pub struct RequisitionService<S> {
    validator: TransitionValidator,
    store: Arc<S>,
    reject_policy: RejectPolicy,
}

impl<S> RequisitionService<S>
where
    S: RequisitionStore + 'static,
{
    pub fn new(validator: TransitionValidator, store: Arc<S>, reject_policy: RejectPolicy) -> Self {
        Self {
            validator,
            store,
            reject_policy,
        }
    }

    pub fn validator(&self) -> &TransitionValidator {
        &self.validator
    }

    /// Create a new requisition at the `submitted` stage with all flags false.
    pub fn submit(&self, submission: NewRequisition) -> Result<RequisitionRecord, ServiceError> {
        let record = RequisitionRecord::new(
            next_requisition_id(),
            submission.position,
            submission.faculty,
            submission.headcount,
            submission.justification,
            Utc::now(),
        );
        let stored = self.store.insert(record)?;
        info!(id = %stored.id.0, "requisition submitted");
        Ok(stored)
    }

    pub fn get(&self, id: &RequisitionId) -> Result<RequisitionRecord, ServiceError> {
        let record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<RequisitionRecord>, ServiceError> {
        Ok(self.store.list()?)
    }

    /// Validate `current -> proposed` and, only when the validator approves,
    /// commit the new stage plus its implied flags. The commit carries the
    /// stage that was validated against, so a concurrent writer that moved the
    /// requisition first surfaces as a stage conflict instead of a lost
    /// update or a skipped step.
    pub fn propose_transition(
        &self,
        id: &RequisitionId,
        proposed: &str,
    ) -> Result<TransitionReceipt, ServiceError> {
        let record = self.fetch_active(id)?;
        let outcome = self
            .validator
            .validate(record.stage.as_str(), proposed, &record.snapshot);

        if !outcome.can_proceed {
            return Ok(TransitionReceipt {
                outcome,
                record: None,
            });
        }

        // Validation succeeded, so the proposed tag resolves in the registry.
        let Some(step) = self.validator.registry().find(proposed) else {
            return Ok(TransitionReceipt {
                outcome,
                record: None,
            });
        };

        let now = Utc::now();
        let mut updated = record.clone();
        updated.stage = step.id;
        updated.updated_at = now;
        apply_entry_effects(&mut updated, step.id, now);

        let committed = self.store.commit_stage(record.stage, updated)?;
        info!(
            id = %committed.id.0,
            from = record.stage.as_str(),
            to = committed.stage.as_str(),
            "requisition stage committed"
        );

        Ok(TransitionReceipt {
            outcome,
            record: Some(committed),
        })
    }

    /// Side action: applications arrived from the announcement channels.
    pub fn mark_applications_received(
        &self,
        id: &RequisitionId,
    ) -> Result<RequisitionRecord, ServiceError> {
        self.mutate_snapshot(id, |record| {
            record.snapshot.has_applications = true;
        })
    }

    /// Side action: the screening selection to forward to the home faculty.
    pub fn select_applications(
        &self,
        id: &RequisitionId,
        selected: Vec<ApplicationId>,
    ) -> Result<RequisitionRecord, ServiceError> {
        self.mutate_snapshot(id, |record| {
            record.snapshot.selected_applications = selected;
        })
    }

    pub fn record_vp_approval(&self, id: &RequisitionId) -> Result<RequisitionRecord, ServiceError> {
        self.mutate_snapshot(id, |record| {
            record.snapshot.approved_by_vp = true;
            record.vp_approved_at = Some(record.updated_at);
        })
    }

    pub fn record_faculty_approval(
        &self,
        id: &RequisitionId,
    ) -> Result<RequisitionRecord, ServiceError> {
        self.mutate_snapshot(id, |record| {
            record.snapshot.approved_by_faculty = true;
        })
    }

    pub fn record_president_approval(
        &self,
        id: &RequisitionId,
    ) -> Result<RequisitionRecord, ServiceError> {
        self.mutate_snapshot(id, |record| {
            record.snapshot.approved_by_president = true;
        })
    }

    pub fn record_interview_result(
        &self,
        id: &RequisitionId,
        result: InterviewResult,
    ) -> Result<RequisitionRecord, ServiceError> {
        self.mutate_snapshot(id, |record| {
            record.snapshot.interview_result = Some(result);
        })
    }

    /// Side channel: the candidate followed the confirmation link. Only valid
    /// once the requisition has reached `notified`.
    pub fn confirm(&self, id: &RequisitionId) -> Result<RequisitionRecord, ServiceError> {
        let record = self.fetch_active(id)?;
        if record.stage != StageId::Notified {
            return Err(ServiceError::ConfirmationNotAllowed {
                stage: record.stage,
            });
        }

        let now = Utc::now();
        let mut updated = record.clone();
        updated.stage = StageId::Confirmed;
        updated.updated_at = now;
        updated.confirmed_at = Some(now);
        Ok(self.store.commit_stage(record.stage, updated)?)
    }

    /// Side channel: HR abandons the requisition. Governed by the configured
    /// rejection policy.
    pub fn reject(&self, id: &RequisitionId) -> Result<RequisitionRecord, ServiceError> {
        let record = self.fetch_active(id)?;
        if !self.reject_policy.allows(record.stage) {
            return Err(ServiceError::RejectionNotAllowed {
                stage: record.stage,
            });
        }

        let now = Utc::now();
        let mut updated = record.clone();
        updated.stage = StageId::Rejected;
        updated.updated_at = now;
        updated.rejected_at = Some(now);
        Ok(self.store.commit_stage(record.stage, updated)?)
    }

    pub fn audit(&self, id: &RequisitionId) -> Result<AuditReport, ServiceError> {
        let record = self.get(id)?;
        Ok(audit(&record.snapshot))
    }

    pub fn guidance(&self, id: &RequisitionId) -> Result<GuidanceView, ServiceError> {
        let record = self.get(id)?;
        let entry = guidance_for(record.stage);
        let category = classify(record.snapshot.position.as_deref());
        Ok(GuidanceView {
            stage: record.stage,
            stage_label: record.stage.label(),
            title: entry.title,
            steps: entry.steps,
            notes: entry.notes,
            applicant_category: category,
            required_documents: documents_for(category),
        })
    }

    fn fetch_active(&self, id: &RequisitionId) -> Result<RequisitionRecord, ServiceError> {
        let record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        if record.stage.is_terminal() {
            return Err(ServiceError::Terminal {
                id: record.id.clone(),
                stage: record.stage,
            });
        }
        Ok(record)
    }

    fn mutate_snapshot(
        &self,
        id: &RequisitionId,
        mutate: impl FnOnce(&mut RequisitionRecord),
    ) -> Result<RequisitionRecord, ServiceError> {
        let mut record = self.fetch_active(id)?;
        record.updated_at = Utc::now();
        mutate(&mut record);
        self.store.save(record.clone())?;
        Ok(record)
    }
}

struct ApiState<S> {
    service: Arc<RequisitionService<S>>,
    limiter: RateLimiter,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

/// Router builder exposing the requisition endpoints. Mutating routes pass
/// the caller identity through the injected rate limiter.
pub fn requisition_router<S>(service: Arc<RequisitionService<S>>, limiter: RateLimiter) -> Router
where
    S: RequisitionStore + 'static,
{
    let state = ApiState { service, limiter };
    Router::new()
        .route(
            "/api/v1/requisitions",
            post(create_handler::<S>).get(list_handler::<S>),
        )
        .route("/api/v1/requisitions/:id", get(get_handler::<S>))
        .route(
            "/api/v1/requisitions/:id/status",
            patch(status_handler::<S>),
        )
        .route(
            "/api/v1/requisitions/:id/guidance",
            get(guidance_handler::<S>),
        )
        .route("/api/v1/requisitions/:id/audit", get(audit_handler::<S>))
        .route(
            "/api/v1/requisitions/:id/applications",
            post(applications_handler::<S>),
        )
        .route(
            "/api/v1/requisitions/:id/selections",
            post(selections_handler::<S>),
        )
        .route(
            "/api/v1/requisitions/:id/approvals",
            post(approval_handler::<S>),
        )
        .route(
            "/api/v1/requisitions/:id/interview-result",
            post(interview_result_handler::<S>),
        )
        .route(
            "/api/v1/requisitions/:id/confirm",
            post(confirm_handler::<S>),
        )
        .route("/api/v1/requisitions/:id/reject", post(reject_handler::<S>))
        .with_state(state)
}

fn caller_identity(headers: &HeaderMap) -> String {
    headers
        .get("x-caller-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("anonymous")
        .to_string()
}

fn throttled(limiter: &RateLimiter, headers: &HeaderMap) -> Option<Response> {
    let caller = caller_identity(headers);
    if limiter.allow(&caller) {
        None
    } else {
        let payload = json!({ "error": "too many requests" });
        Some((StatusCode::TOO_MANY_REQUESTS, Json(payload)).into_response())
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::Conflict)
        | ServiceError::Store(StoreError::StageConflict { .. })
        | ServiceError::Terminal { .. }
        | ServiceError::RejectionNotAllowed { .. }
        | ServiceError::ConfirmationNotAllowed { .. } => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

fn record_response(status: StatusCode, record: &RequisitionRecord) -> Response {
    let payload = json!({
        "id": record.id.0.clone(),
        "stage": record.stage.as_str(),
        "requisition": record,
    });
    (status, Json(payload)).into_response()
}

async fn create_handler<S>(
    State(state): State<ApiState<S>>,
    headers: HeaderMap,
    Json(submission): Json<NewRequisition>,
) -> Response
where
    S: RequisitionStore + 'static,
{
    if let Some(blocked) = throttled(&state.limiter, &headers) {
        return blocked;
    }
    match state.service.submit(submission) {
        Ok(record) => record_response(StatusCode::CREATED, &record),
        Err(error) => error_response(error),
    }
}

async fn list_handler<S>(State(state): State<ApiState<S>>) -> Response
where
    S: RequisitionStore + 'static,
{
    match state.service.list() {
        Ok(records) => (StatusCode::OK, Json(json!({ "requisitions": records }))).into_response(),
        Err(error) => error_response(error),
    }
}

async fn get_handler<S>(State(state): State<ApiState<S>>, Path(id): Path<String>) -> Response
where
    S: RequisitionStore + 'static,
{
    match state.service.get(&RequisitionId(id)) {
        Ok(record) => record_response(StatusCode::OK, &record),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct StatusPatch {
    status: String,
}

async fn status_handler<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<StatusPatch>,
) -> Response
where
    S: RequisitionStore + 'static,
{
    if let Some(blocked) = throttled(&state.limiter, &headers) {
        return blocked;
    }
    match state
        .service
        .propose_transition(&RequisitionId(id), &patch.status)
    {
        Ok(receipt) => {
            let stage = receipt
                .record
                .as_ref()
                .map(|record| record.stage.as_str());
            let payload = json!({
                "can_proceed": receipt.outcome.can_proceed,
                "message": receipt.outcome.message,
                "warnings": receipt.outcome.warnings,
                "stage": stage,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn guidance_handler<S>(State(state): State<ApiState<S>>, Path(id): Path<String>) -> Response
where
    S: RequisitionStore + 'static,
{
    match state.service.guidance(&RequisitionId(id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn audit_handler<S>(State(state): State<ApiState<S>>, Path(id): Path<String>) -> Response
where
    S: RequisitionStore + 'static,
{
    match state.service.audit(&RequisitionId(id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn applications_handler<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: RequisitionStore + 'static,
{
    if let Some(blocked) = throttled(&state.limiter, &headers) {
        return blocked;
    }
    match state.service.mark_applications_received(&RequisitionId(id)) {
        Ok(record) => record_response(StatusCode::OK, &record),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct SelectionBody {
    selected: Vec<ApplicationId>,
}

async fn selections_handler<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<SelectionBody>,
) -> Response
where
    S: RequisitionStore + 'static,
{
    if let Some(blocked) = throttled(&state.limiter, &headers) {
        return blocked;
    }
    match state
        .service
        .select_applications(&RequisitionId(id), body.selected)
    {
        Ok(record) => record_response(StatusCode::OK, &record),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ApprovalKind {
    Vp,
    Faculty,
    President,
}

#[derive(Debug, Deserialize)]
struct ApprovalBody {
    approver: ApprovalKind,
}

async fn approval_handler<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ApprovalBody>,
) -> Response
where
    S: RequisitionStore + 'static,
{
    if let Some(blocked) = throttled(&state.limiter, &headers) {
        return blocked;
    }
    let id = RequisitionId(id);
    let result = match body.approver {
        ApprovalKind::Vp => state.service.record_vp_approval(&id),
        ApprovalKind::Faculty => state.service.record_faculty_approval(&id),
        ApprovalKind::President => state.service.record_president_approval(&id),
    };
    match result {
        Ok(record) => record_response(StatusCode::OK, &record),
        Err(error) => error_response(error),
    }
}

async fn interview_result_handler<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(result): Json<InterviewResult>,
) -> Response
where
    S: RequisitionStore + 'static,
{
    if let Some(blocked) = throttled(&state.limiter, &headers) {
        return blocked;
    }
    match state
        .service
        .record_interview_result(&RequisitionId(id), result)
    {
        Ok(record) => record_response(StatusCode::OK, &record),
        Err(error) => error_response(error),
    }
}

async fn confirm_handler<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: RequisitionStore + 'static,
{
    if let Some(blocked) = throttled(&state.limiter, &headers) {
        return blocked;
    }
    match state.service.confirm(&RequisitionId(id)) {
        Ok(record) => record_response(StatusCode::OK, &record),
        Err(error) => error_response(error),
    }
}

async fn reject_handler<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: RequisitionStore + 'static,
{
    if let Some(blocked) = throttled(&state.limiter, &headers) {
        return blocked;
    }
    match state.service.reject(&RequisitionId(id)) {
        Ok(record) => record_response(StatusCode::OK, &record),
        Err(error) => error_response(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::requisition::store::InMemoryStore;

    fn service() -> RequisitionService<InMemoryStore> {
        RequisitionService::new(
            TransitionValidator::standard(),
            Arc::new(InMemoryStore::new()),
            RejectPolicy::default(),
        )
    }

    fn submission(position: &str) -> NewRequisition {
        NewRequisition {
            position: position.to_string(),
            faculty: "Faculty of Engineering".to_string(),
            headcount: 1,
            justification: "Replacement for retirement".to_string(),
        }
    }

    #[test]
    fn submit_starts_at_submitted() {
        let service = service();
        let record = service.submit(submission("Senior Lecturer")).expect("submit");
        assert_eq!(record.stage, StageId::Submitted);
        assert!(record.id.0.starts_with("req-"));
    }

    #[test]
    fn blocked_transition_returns_the_outcome_without_writing() {
        let service = service();
        let record = service.submit(submission("Staff Officer")).expect("submit");

        let receipt = service
            .propose_transition(&record.id, "vp_hr")
            .expect("receipt");
        assert!(!receipt.outcome.can_proceed);
        assert!(receipt.record.is_none());

        let stored = service.get(&record.id).expect("stored");
        assert_eq!(stored.stage, StageId::Submitted);
    }

    #[test]
    fn approved_transition_commits_stage_and_entry_effects() {
        let service = service();
        let record = service.submit(submission("Staff Officer")).expect("submit");

        service
            .propose_transition(&record.id, "hr_review")
            .expect("to hr_review");
        let receipt = service
            .propose_transition(&record.id, "vp_hr")
            .expect("to vp_hr");

        let committed = receipt.record.expect("committed record");
        assert_eq!(committed.stage, StageId::VpHr);
        assert!(committed.snapshot.approved_by_vp);
        assert!(committed.vp_approved_at.is_some());
    }

    #[test]
    fn side_actions_feed_the_next_gate() {
        let service = service();
        let record = service.submit(submission("Staff Officer")).expect("submit");
        for stage in ["hr_review", "vp_hr", "recruiting", "sourcing"] {
            let receipt = service
                .propose_transition(&record.id, stage)
                .expect("advance");
            assert!(receipt.outcome.can_proceed, "{stage}");
        }

        // The screening gate is closed until applications arrive.
        let receipt = service
            .propose_transition(&record.id, "screening")
            .expect("receipt");
        assert!(!receipt.outcome.can_proceed);

        service
            .mark_applications_received(&record.id)
            .expect("applications recorded");
        let receipt = service
            .propose_transition(&record.id, "screening")
            .expect("receipt");
        assert!(receipt.outcome.can_proceed);
        assert!(!receipt.outcome.warnings.is_empty());
    }

    #[test]
    fn confirm_requires_the_notified_stage() {
        let service = service();
        let record = service.submit(submission("Staff Officer")).expect("submit");

        match service.confirm(&record.id) {
            Err(ServiceError::ConfirmationNotAllowed { stage }) => {
                assert_eq!(stage, StageId::Submitted);
            }
            other => panic!("expected confirmation refusal, got {other:?}"),
        }
    }

    #[test]
    fn reject_policy_restricts_the_reject_side_channel() {
        let service = RequisitionService::new(
            TransitionValidator::standard(),
            Arc::new(InMemoryStore::new()),
            RejectPolicy::From(vec![StageId::President, StageId::Notified]),
        );
        let record = service.submit(submission("Staff Officer")).expect("submit");

        match service.reject(&record.id) {
            Err(ServiceError::RejectionNotAllowed { stage }) => {
                assert_eq!(stage, StageId::Submitted);
            }
            other => panic!("expected rejection refusal, got {other:?}"),
        }
    }

    #[test]
    fn rejected_requisitions_are_never_mutated_again() {
        let service = service();
        let record = service.submit(submission("Staff Officer")).expect("submit");
        let rejected = service.reject(&record.id).expect("default policy rejects");
        assert_eq!(rejected.stage, StageId::Rejected);
        assert!(rejected.rejected_at.is_some());

        match service.mark_applications_received(&record.id) {
            Err(ServiceError::Terminal { stage, .. }) => assert_eq!(stage, StageId::Rejected),
            other => panic!("expected terminal error, got {other:?}"),
        }
        match service.propose_transition(&record.id, "hr_review") {
            Err(ServiceError::Terminal { .. }) => {}
            other => panic!("expected terminal error, got {other:?}"),
        }
    }

    #[test]
    fn guidance_view_joins_checklist_and_documents() {
        let service = service();
        let record = service.submit(submission("Senior Lecturer")).expect("submit");

        let view = service.guidance(&record.id).expect("guidance");
        assert_eq!(view.stage, StageId::Submitted);
        assert_eq!(view.applicant_category, ApplicantCategory::Lecturer);
        assert!(view
            .required_documents
            .contains(&"Academic works and publication list"));
        assert!(!view.steps.is_empty());
    }

    #[test]
    fn audit_reports_on_the_stored_snapshot() {
        let service = service();
        let record = service.submit(submission("Staff Officer")).expect("submit");
        let report = service.audit(&record.id).expect("audit");
        assert!(report.is_valid);
    }

    #[tokio::test]
    async fn status_handler_reports_blocked_transitions_as_ok_payloads() {
        let service = Arc::new(service());
        let record = service.submit(submission("Staff Officer")).expect("submit");
        let state = ApiState {
            service,
            limiter: RateLimiter::new(16, std::time::Duration::from_secs(60)),
        };

        let response = status_handler(
            State(state),
            Path(record.id.0.clone()),
            HeaderMap::new(),
            Json(StatusPatch {
                status: "vp_hr".to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["can_proceed"], serde_json::Value::Bool(false));
        assert!(payload["stage"].is_null());
    }

    #[tokio::test]
    async fn status_handler_returns_404_for_unknown_requisitions() {
        let state = ApiState {
            service: Arc::new(service()),
            limiter: RateLimiter::new(16, std::time::Duration::from_secs(60)),
        };

        let response = status_handler(
            State(state),
            Path("req-missing".to_string()),
            HeaderMap::new(),
            Json(StatusPatch {
                status: "hr_review".to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn mutating_handlers_honor_the_rate_limiter() {
        let service = Arc::new(service());
        let record = service.submit(submission("Staff Officer")).expect("submit");
        let state = ApiState {
            service,
            limiter: RateLimiter::new(1, std::time::Duration::from_secs(60)),
        };

        let first = applications_handler(
            State(state.clone()),
            Path(record.id.0.clone()),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = applications_handler(
            State(state),
            Path(record.id.0.clone()),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}

use serde::{Deserialize, Serialize};

/// Lifecycle stages of a staffing requisition.
///
/// The first twelve variants form the ordered approval pipeline. `Confirmed`
/// and `Rejected` are terminal absorbing states reached through side-channel
/// actions (candidate confirmation, HR rejection), never through the ordered
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Submitted,
    HrReview,
    VpHr,
    Recruiting,
    Sourcing,
    Screening,
    ApplicationReview,
    InterviewScheduled,
    Interview,
    InterviewResult,
    President,
    Notified,
    Confirmed,
    Rejected,
}

impl StageId {
    pub const fn pipeline() -> [Self; 12] {
        [
            Self::Submitted,
            Self::HrReview,
            Self::VpHr,
            Self::Recruiting,
            Self::Sourcing,
            Self::Screening,
            Self::ApplicationReview,
            Self::InterviewScheduled,
            Self::Interview,
            Self::InterviewResult,
            Self::President,
            Self::Notified,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::HrReview => "HR Review",
            Self::VpHr => "VP of HR Approval",
            Self::Recruiting => "Recruiting",
            Self::Sourcing => "Candidate Sourcing",
            Self::Screening => "Resume Screening",
            Self::ApplicationReview => "Faculty Application Review",
            Self::InterviewScheduled => "Interview Scheduled",
            Self::Interview => "Interview",
            Self::InterviewResult => "Interview Result",
            Self::President => "Presidential Approval",
            Self::Notified => "Candidate Notified",
            Self::Confirmed => "Confirmed",
            Self::Rejected => "Rejected",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::HrReview => "hr_review",
            Self::VpHr => "vp_hr",
            Self::Recruiting => "recruiting",
            Self::Sourcing => "sourcing",
            Self::Screening => "screening",
            Self::ApplicationReview => "application_review",
            Self::InterviewScheduled => "interview_scheduled",
            Self::Interview => "interview",
            Self::InterviewResult => "interview_result",
            Self::President => "president",
            Self::Notified => "notified",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a raw stage tag. Unknown tags are caller data errors, so this
    /// returns `None` rather than failing.
    pub fn parse(raw: &str) -> Option<Self> {
        let all = [
            Self::Submitted,
            Self::HrReview,
            Self::VpHr,
            Self::Recruiting,
            Self::Sourcing,
            Self::Screening,
            Self::ApplicationReview,
            Self::InterviewScheduled,
            Self::Interview,
            Self::InterviewResult,
            Self::President,
            Self::Notified,
            Self::Confirmed,
            Self::Rejected,
        ];
        all.into_iter().find(|stage| stage.as_str() == raw.trim())
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Rejected)
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One position in the canonical approval sequence.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WorkflowStep {
    pub id: StageId,
    pub label: &'static str,
    pub order: usize,
}

/// Ordered, immutable catalog of the pipeline stages. Read-only after
/// construction.
#[derive(Debug, Clone)]
pub struct StageRegistry {
    steps: Vec<WorkflowStep>,
}

impl StageRegistry {
    pub fn standard() -> Self {
        let steps = StageId::pipeline()
            .into_iter()
            .enumerate()
            .map(|(order, id)| WorkflowStep {
                id,
                label: id.label(),
                order,
            })
            .collect();

        Self { steps }
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    /// Position of a stage in the pipeline. Terminal stages and unknown ids
    /// are not in the ordered sequence and yield `None`.
    pub fn index_of(&self, id: StageId) -> Option<usize> {
        self.steps.iter().find(|step| step.id == id).map(|step| step.order)
    }

    pub fn step_at(&self, order: usize) -> Option<&WorkflowStep> {
        self.steps.get(order)
    }

    /// Resolve a raw stage tag to its pipeline step.
    pub fn find(&self, raw: &str) -> Option<&WorkflowStep> {
        let id = StageId::parse(raw)?;
        self.steps.iter().find(|step| step.id == id)
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

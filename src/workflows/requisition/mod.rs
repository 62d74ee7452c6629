pub mod audit;
pub mod classifier;
pub mod effects;
pub mod guidance;
mod service;
pub mod snapshot;
pub mod stages;
mod store;
mod transition;

pub use service::{
    requisition_router, GuidanceView, NewRequisition, RejectPolicy, RequisitionService,
    ServiceError, TransitionReceipt,
};
pub use snapshot::{
    ApplicationId, InterviewResult, PersonalInfo, RequestSnapshot, RequisitionId,
    RequisitionRecord,
};
pub use stages::{StageId, StageRegistry, WorkflowStep};
pub use store::{InMemoryStore, RequisitionStore, StoreError};
pub use transition::{TransitionOutcome, TransitionValidator};

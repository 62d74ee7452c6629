use super::stages::StageId;
use serde::Serialize;

/// Static checklist shown after a successful transition into a stage.
#[derive(Debug, Clone, Serialize)]
pub struct GuidanceEntry {
    pub title: &'static str,
    pub steps: Vec<&'static str>,
    pub notes: &'static str,
}

/// Checklist for a stage. The twelve pipeline stages have authored entries;
/// `confirmed` and `rejected` fall back to an empty entry, which callers must
/// treat as expected rather than as an error.
pub fn guidance_for(stage: StageId) -> GuidanceEntry {
    match stage {
        StageId::Submitted => GuidanceEntry {
            title: "Review the submitted requisition",
            steps: vec![
                "Check the position details, headcount, and justification for completeness.",
                "Confirm the requesting faculty referenced an approved staffing plan line.",
                "Assign an HR owner and move the request into HR review.",
            ],
            notes: "Incomplete requests should be returned to the faculty rather than advanced.",
        },
        StageId::HrReview => GuidanceEntry {
            title: "Complete the HR review",
            steps: vec![
                "Verify the position against the staffing plan and budget line.",
                "Draft or refine the job description with the requesting faculty.",
                "Prepare the approval summary for the Vice President of Human Resources.",
            ],
            notes: "Attach the finalized job description before requesting VP approval.",
        },
        StageId::VpHr => GuidanceEntry {
            title: "Obtain VP of HR approval",
            steps: vec![
                "Present the requisition summary and budget impact to the VP of HR.",
                "Record the approval decision and date on the requisition.",
            ],
            notes: "Recruiting preparation may run in parallel while the paperwork completes.",
        },
        StageId::Recruiting => GuidanceEntry {
            title: "Start recruiting",
            steps: vec![
                "Publish the job announcement on the university channels.",
                "Set the application window and the screening criteria.",
            ],
            notes: "Use the required-document checklist for the applicant category.",
        },
        StageId::Sourcing => GuidanceEntry {
            title: "Source candidates",
            steps: vec![
                "Collect applications from every announcement channel.",
                "Log each application against the requisition before the window closes.",
            ],
            notes: "Screening cannot begin until at least one application is logged.",
        },
        StageId::Screening => GuidanceEntry {
            title: "Screen the applications",
            steps: vec![
                "Run the resume screening and record the scores.",
                "Select the applications to forward to the home faculty.",
            ],
            notes: "Only selected applications move forward to faculty review.",
        },
        StageId::ApplicationReview => GuidanceEntry {
            title: "Faculty application review",
            steps: vec![
                "Send the selected applications to the home faculty.",
                "Record the faculty's approval or requested changes.",
            ],
            notes: "Interviews cannot be scheduled until the faculty approves.",
        },
        StageId::InterviewScheduled => GuidanceEntry {
            title: "Schedule the interviews",
            steps: vec![
                "Agree interview dates with the faculty committee.",
                "Invite the candidates and confirm attendance.",
            ],
            notes: "Reserve rooms and equipment ahead of the confirmed dates.",
        },
        StageId::Interview => GuidanceEntry {
            title: "Conduct the interviews",
            steps: vec![
                "Run the interview with the appointed committee.",
                "Collect the committee score sheets.",
            ],
            notes: "Every committee member must submit a score sheet.",
        },
        StageId::InterviewResult => GuidanceEntry {
            title: "Record the interview result",
            steps: vec![
                "Enter the committee decision and scores on the requisition.",
                "Prepare the appointment proposal for the president.",
            ],
            notes: "The proposal cannot be sent until the result is recorded.",
        },
        StageId::President => GuidanceEntry {
            title: "Obtain presidential approval",
            steps: vec![
                "Submit the appointment proposal to the president.",
                "Record the presidential decision and date.",
            ],
            notes: "The candidate may only be notified after the president approves.",
        },
        StageId::Notified => GuidanceEntry {
            title: "Notify the candidate",
            steps: vec![
                "Send the offer notification with the confirmation link.",
                "Track the candidate's confirmation deadline.",
            ],
            notes: "The requisition completes when the candidate confirms.",
        },
        StageId::Confirmed | StageId::Rejected => GuidanceEntry {
            title: "no guidance available",
            steps: Vec::new(),
            notes: "",
        },
    }
}

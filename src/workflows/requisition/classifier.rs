use serde::{Deserialize, Serialize};

/// Applicant category derived from the position title, used to pick the
/// required-document checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantCategory {
    Lecturer,
    Staff,
}

impl ApplicantCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lecturer => "Lecturer",
            Self::Staff => "Staff",
        }
    }
}

// Tokens that mark an academic position. The Thai token covers titles
// submitted in Thai by the faculties.
const LECTURER_TOKENS: [&str; 3] = ["อาจารย์", "lecturer", "professor"];

/// Categorize a position title. Case-insensitive substring match; a missing
/// title or no match defaults to `Staff`. Total over all inputs.
pub fn classify(position: Option<&str>) -> ApplicantCategory {
    let title = position.unwrap_or_default().to_lowercase();
    if LECTURER_TOKENS.iter().any(|token| title.contains(token)) {
        ApplicantCategory::Lecturer
    } else {
        ApplicantCategory::Staff
    }
}

const BASELINE_DOCUMENTS: [&str; 5] = [
    "Job application form",
    "Resume or curriculum vitae",
    "Copies of educational certificates and transcripts",
    "Employment certificates from previous employers",
    "Recent photograph",
];

const LECTURER_EXTRA_DOCUMENT: &str = "Academic works and publication list";

/// Ordered list of documents required for an applicant category: a common
/// baseline, plus one lecturer-specific item.
pub fn documents_for(category: ApplicantCategory) -> Vec<&'static str> {
    let mut documents = BASELINE_DOCUMENTS.to_vec();
    if category == ApplicantCategory::Lecturer {
        documents.push(LECTURER_EXTRA_DOCUMENT);
    }
    documents
}

use super::snapshot::RequestSnapshot;
use serde::Serialize;

/// Report from the data-protection scan. Advisory only; nothing is redacted.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

/// Scan a requisition snapshot for personally-identifying fields that must not
/// be retained. Exactly two fields are checked under `personal_info`: the ID
/// card number and the address.
pub fn audit(snapshot: &RequestSnapshot) -> AuditReport {
    let mut issues = Vec::new();

    if let Some(personal_info) = &snapshot.personal_info {
        if personal_info.id_card.is_some() {
            issues.push(
                "requisition retains a national ID card number; remove it per data protection policy"
                    .to_string(),
            );
        }
        if personal_info.address.is_some() {
            issues.push(
                "requisition retains a personal address; remove it per data protection policy"
                    .to_string(),
            );
        }
    }

    AuditReport {
        is_valid: issues.is_empty(),
        issues,
    }
}

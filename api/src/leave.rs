//! Leave requests as exchanged with the backend.

use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use crate::error::ErrorBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    #[serde(rename = "en attente")]
    Pending,
    #[serde(rename = "validé")]
    Approved,
    #[serde(rename = "refusé")]
    Rejected,
    #[serde(other)]
    Unknown,
}

impl LeaveStatus {
    /// Only pending requests may still be edited or withdrawn.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: u64,
    #[serde(rename = "type_demande", default)]
    pub kind: String,
    #[serde(rename = "date_debut")]
    pub start: String,
    #[serde(rename = "date_fin")]
    pub end: String,
    pub status: LeaveStatus,
    #[serde(rename = "demi_jour", default)]
    pub half_day: bool,
    #[serde(rename = "commentaire", default)]
    pub comment: String,
    #[serde(rename = "date_soumission", default)]
    pub submitted_at: String,
}

/// `GET employe/dashboard/` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(rename = "solde", default)]
    pub balance: f64,
    #[serde(rename = "demandes", default)]
    pub requests: Vec<LeaveRequest>,
}

/// A request being filled in. Dates are `YYYY-MM-DD`, empty when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveDraft {
    #[serde(rename = "type_demande")]
    pub kind: String,
    #[serde(rename = "date_debut")]
    pub start: String,
    #[serde(rename = "date_fin")]
    pub end: String,
    #[serde(rename = "demi_jour")]
    pub half_day: bool,
    #[serde(rename = "commentaire")]
    pub comment: String,
}

impl LeaveDraft {
    pub const DEFAULT_KIND: &'static str = "congé";

    pub fn new() -> Self {
        Self {
            kind: Self::DEFAULT_KIND.to_string(),
            ..Self::default()
        }
    }

    /// Draft prefilled from an existing request, for editing.
    pub fn from_request(request: &LeaveRequest) -> Self {
        Self {
            kind: request.kind.clone(),
            start: request.start.clone(),
            end: request.end.clone(),
            half_day: request.half_day,
            comment: request.comment.clone(),
        }
    }

    /// Checks the draft against `today` and returns every problem at once.
    pub fn validate(&self, today: Date) -> Result<(), ErrorBody> {
        let mut errors = Vec::new();
        if self.start.trim().is_empty() {
            errors.push("La date de début est obligatoire");
        }
        if self.end.trim().is_empty() {
            errors.push("La date de fin est obligatoire");
        }
        if self.comment.trim().is_empty() {
            errors.push("Le commentaire est obligatoire");
        }

        let start = parse_date(&self.start);
        let end = parse_date(&self.end);
        if !self.start.trim().is_empty() && start.is_none() {
            errors.push("La date de début est invalide");
        }
        if !self.end.trim().is_empty() && end.is_none() {
            errors.push("La date de fin est invalide");
        }
        if start.is_some_and(|start| start < today) {
            errors.push("La date de début ne peut pas être dans le passé");
        }
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                errors.push("La date de fin doit être après la date de début");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ErrorBody::MessageList(
                errors.into_iter().map(str::to_string).collect(),
            ))
        }
    }

    /// Body sent to the backend: the comment is trimmed.
    pub fn payload(&self) -> Self {
        Self {
            comment: self.comment.trim().to_string(),
            ..self.clone()
        }
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn draft(start: &str, end: &str, comment: &str) -> LeaveDraft {
        LeaveDraft {
            start: start.into(),
            end: end.into(),
            comment: comment.into(),
            ..LeaveDraft::new()
        }
    }

    #[test]
    fn a_complete_future_request_is_valid() {
        let today = date!(2024 - 02 - 01);
        assert!(draft("2024-02-05", "2024-02-09", "Vacances").validate(today).is_ok());
        assert!(draft("2024-02-01", "2024-02-01", "Rendez-vous").validate(today).is_ok());
    }

    #[test]
    fn every_problem_is_reported() {
        let today = date!(2024 - 02 - 01);
        let err = draft("", "", "   ").validate(today).unwrap_err();
        assert_eq!(
            err.messages(),
            [
                "La date de début est obligatoire",
                "La date de fin est obligatoire",
                "Le commentaire est obligatoire",
            ]
        );
    }

    #[test]
    fn past_start_and_inverted_range() {
        let today = date!(2024 - 02 - 10);
        let err = draft("2024-02-05", "2024-02-01", "x").validate(today).unwrap_err();
        assert_eq!(
            err.messages(),
            [
                "La date de début ne peut pas être dans le passé",
                "La date de fin doit être après la date de début",
            ]
        );
    }

    #[test]
    fn statuses_use_backend_labels() {
        let raw = r#"{"solde": 12.5, "demandes": [
            {"id": 3, "type_demande": "congé", "date_debut": "2024-02-05", "date_fin": "2024-02-09",
             "status": "validé", "demi_jour": false, "commentaire": "Ski", "date_soumission": "2024-01-20"},
            {"id": 4, "date_debut": "2024-03-01", "date_fin": "2024-03-01", "status": "archivé"}
        ]}"#;
        let dashboard: Dashboard = serde_json::from_str(raw).unwrap();
        assert_eq!(dashboard.balance, 12.5);
        assert_eq!(dashboard.requests[0].status, LeaveStatus::Approved);
        assert_eq!(dashboard.requests[1].status, LeaveStatus::Unknown);
        assert!(!dashboard.requests[0].status.is_editable());
    }

    #[test]
    fn editing_starts_from_the_stored_request() {
        let request = LeaveRequest {
            id: 9,
            kind: "absence".into(),
            start: "2024-03-04".into(),
            end: "2024-03-05".into(),
            status: LeaveStatus::Pending,
            half_day: true,
            comment: "Déménagement".into(),
            submitted_at: "2024-02-20".into(),
        };
        let draft = LeaveDraft::from_request(&request);
        assert_eq!(draft.kind, "absence");
        assert_eq!((draft.start.as_str(), draft.end.as_str()), ("2024-03-04", "2024-03-05"));
        assert!(draft.half_day);

        let body = serde_json::to_value(draft.payload()).unwrap();
        assert_eq!(body["type_demande"], "absence");
        assert_eq!(body["date_debut"], "2024-03-04");
        assert_eq!(body["date_fin"], "2024-03-05");
        assert_eq!(body["demi_jour"], true);
        assert_eq!(body["commentaire"], "Déménagement");
    }

    #[test]
    fn payload_trims_the_comment() {
        let body = serde_json::to_value(draft("2024-02-05", "2024-02-06", "  Ski  ").payload()).unwrap();
        assert_eq!(body["commentaire"], "Ski");
        assert_eq!(body["type_demande"], "congé");
    }
}

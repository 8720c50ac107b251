use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JustificationType {
    Medical,
    ExcusedAbsence,
    Compensatory,
    Other,
}

impl JustificationType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            JustificationType::Medical => "medical",
            JustificationType::ExcusedAbsence => "excused-absence",
            JustificationType::Compensatory => "compensatory",
            JustificationType::Other => "other",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "medical" => Some(JustificationType::Medical),
            "excused-absence" => Some(JustificationType::ExcusedAbsence),
            "compensatory" => Some(JustificationType::Compensatory),
            "other" => Some(JustificationType::Other),
            _ => None,
        }
    }

    pub fn from_input(s: &str) -> Option<Self> {
        Self::from_db_str(&s.trim().to_lowercase().replace('_', "-"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JustificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl JustificationStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            JustificationStatus::Pending => "pending",
            JustificationStatus::Approved => "approved",
            JustificationStatus::Rejected => "rejected",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JustificationStatus::Pending),
            "approved" => Some(JustificationStatus::Approved),
            "rejected" => Some(JustificationStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, JustificationStatus::Pending)
    }
}

/// Channel a justification request arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    System,
    Manual,
    Email,
    Whatsapp,
}

impl Channel {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Channel::System => "system",
            Channel::Manual => "manual",
            Channel::Email => "email",
            Channel::Whatsapp => "whatsapp",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Channel::System),
            "manual" => Some(Channel::Manual),
            "email" => Some(Channel::Email),
            "whatsapp" => Some(Channel::Whatsapp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Justification {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub kind: JustificationType,
    pub reason: String,
    pub status: JustificationStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub channel: Channel,
    pub created_at: String,
}

impl Justification {
    /// Short text used in day observations.
    pub fn describe(&self) -> String {
        format!("justification: {} - {}", self.kind.to_db_str(), self.reason)
    }
}

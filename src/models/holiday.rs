use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayScope {
    National,
    Regional,
    Local,
}

impl HolidayScope {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            HolidayScope::National => "national",
            HolidayScope::Regional => "regional",
            HolidayScope::Local => "local",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "national" => Some(HolidayScope::National),
            "regional" => Some(HolidayScope::Regional),
            "local" => Some(HolidayScope::Local),
            _ => None,
        }
    }

    /// Helper: convert CLI input (any case)
    pub fn from_input(s: &str) -> Option<Self> {
        HolidayScope::from_db_str(&s.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Holiday {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub scope: HolidayScope,
    pub active: bool,
}

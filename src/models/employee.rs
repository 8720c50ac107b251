use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    /// Registration number printed by the time clocks.
    pub registration: String,
    pub active: bool,
    pub created_at: String,
    pub department_id: Option<i64>,
}

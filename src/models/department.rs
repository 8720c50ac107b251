use serde::Serialize;

/// Municipal department (secretariat) employees belong to.
#[derive(Debug, Clone, Serialize)]
pub struct Department {
    pub id: i64,
    /// Short unique code, e.g. `SEMED`.
    pub code: String,
    pub name: String,
    pub active: bool,
    pub created_at: String,
}

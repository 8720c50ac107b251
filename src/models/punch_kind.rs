use serde::Serialize;

/// Kind hint carried by a raw punch. The reconciliation engine never trusts
/// it; processed punches are re-labelled by position.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PunchKind {
    In,
    Out,
    BreakStart,
    BreakEnd,
}

impl PunchKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchKind::In => "in",
            PunchKind::Out => "out",
            PunchKind::BreakStart => "break-start",
            PunchKind::BreakEnd => "break-end",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(PunchKind::In),
            "out" => Some(PunchKind::Out),
            "break-start" => Some(PunchKind::BreakStart),
            "break-end" => Some(PunchKind::BreakEnd),
            _ => None,
        }
    }

    /// Lenient parse for CLI input.
    pub fn from_input(s: &str) -> Option<Self> {
        Self::from_db_str(&s.trim().to_lowercase().replace('_', "-"))
    }

    /// Alternating in/out label for the punch at `position` within a day.
    pub fn by_position(position: usize) -> Self {
        if position % 2 == 0 {
            PunchKind::In
        } else {
            PunchKind::Out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_position_alternates() {
        let kinds: Vec<_> = (0..5).map(PunchKind::by_position).collect();
        assert_eq!(
            kinds,
            vec![
                PunchKind::In,
                PunchKind::Out,
                PunchKind::In,
                PunchKind::Out,
                PunchKind::In
            ]
        );
    }

    #[test]
    fn test_from_input() {
        assert_eq!(PunchKind::from_input("Break_Start"), Some(PunchKind::BreakStart));
        assert_eq!(PunchKind::from_input("OUT"), Some(PunchKind::Out));
        assert_eq!(PunchKind::from_input("lunch"), None);
    }
}

use chrono::TimeDelta;

/// Split `worked - quota` into (extra, short); at most one of them is non-zero.
pub fn split_surplus(worked: TimeDelta, quota: TimeDelta) -> (TimeDelta, TimeDelta) {
    let diff = worked - quota;
    (diff.max(TimeDelta::zero()), (-diff).max(TimeDelta::zero()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        let q = TimeDelta::hours(8);
        assert_eq!(
            split_surplus(TimeDelta::minutes(540), q),
            (TimeDelta::hours(1), TimeDelta::zero())
        );
        assert_eq!(
            split_surplus(TimeDelta::minutes(420), q),
            (TimeDelta::zero(), TimeDelta::hours(1))
        );
        assert_eq!(split_surplus(q, q), (TimeDelta::zero(), TimeDelta::zero()));
    }
}

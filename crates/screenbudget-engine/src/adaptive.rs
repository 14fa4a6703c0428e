use screenbudget_common::Tier;

/// How many of the most recent outcomes count toward the success rate.
const PERFORMANCE_WINDOW: usize = 5;

/// Success rate over the last [`PERFORMANCE_WINDOW`] outcomes,
/// most-recent-last. With no history the user is assumed to be at 0.5.
pub fn success_rate(outcomes: &[bool]) -> f64 {
    let recent = &outcomes[outcomes.len().saturating_sub(PERFORMANCE_WINDOW)..];
    if recent.is_empty() {
        return 0.5;
    }

    let correct = recent.iter().filter(|&&c| c).count();
    correct as f64 / recent.len() as f64
}

/// Resolve a requested tier against recent performance. `auto` adapts on
/// the success rate; explicit tiers pass through; anything else lands on
/// medium.
pub fn resolve_tier(requested: &str, outcomes: &[bool]) -> Tier {
    if let Some(tier) = Tier::try_from_key(requested) {
        return tier;
    }

    if requested == "auto" {
        let rate = success_rate(outcomes);
        if rate > 0.8 {
            Tier::Hard
        } else if rate < 0.4 {
            Tier::Easy
        } else {
            Tier::Medium
        }
    } else {
        Tier::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_defaults_to_half() {
        assert_eq!(success_rate(&[]), 0.5);
    }

    #[test]
    fn success_rate_uses_last_five_only() {
        // Five failures followed by five successes: only the successes count.
        let outcomes = [false, false, false, false, false, true, true, true, true, true];
        assert_eq!(success_rate(&outcomes), 1.0);
    }

    #[test]
    fn success_rate_with_short_history() {
        assert_eq!(success_rate(&[true, false]), 0.5);
        assert_eq!(success_rate(&[true]), 1.0);
    }

    #[test]
    fn auto_escalates_on_high_success() {
        // 0.9 is not reachable with 5 samples; 5/5 > 0.8 is.
        let outcomes = [true, true, true, true, true];
        assert_eq!(resolve_tier("auto", &outcomes), Tier::Hard);
    }

    #[test]
    fn auto_relaxes_on_low_success() {
        let outcomes = [false, false, false, false, true];
        assert_eq!(resolve_tier("auto", &outcomes), Tier::Easy);
    }

    #[test]
    fn auto_holds_medium_in_the_middle() {
        let outcomes = [true, false, true, false, true];
        assert_eq!(resolve_tier("auto", &outcomes), Tier::Medium);

        // Boundary values stay medium: the thresholds are strict.
        let at_point_eight = [true, true, true, true, false];
        assert_eq!(resolve_tier("auto", &at_point_eight), Tier::Medium);
        let at_point_four = [true, true, false, false, false];
        assert_eq!(resolve_tier("auto", &at_point_four), Tier::Medium);
    }

    #[test]
    fn auto_with_no_history_is_medium() {
        assert_eq!(resolve_tier("auto", &[]), Tier::Medium);
    }

    #[test]
    fn explicit_tiers_pass_through() {
        let perfect = [true, true, true, true, true];
        assert_eq!(resolve_tier("easy", &perfect), Tier::Easy);
        assert_eq!(resolve_tier("medium", &perfect), Tier::Medium);
        assert_eq!(resolve_tier("hard", &[]), Tier::Hard);
    }

    #[test]
    fn garbage_resolves_to_medium() {
        assert_eq!(resolve_tier("impossible", &[true, true, true, true, true]), Tier::Medium);
        assert_eq!(resolve_tier("", &[]), Tier::Medium);
    }
}

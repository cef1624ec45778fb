//! Recency window and elapsed-time labels.

use crate::clock::MILLIS_PER_DAY;
use crate::model::site::Site;

/// Default width of the "recent" window.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Whether `site` was created within the default window before `now`.
pub fn is_recent(site: &Site, now: i64) -> bool {
    is_recent_within(site, now, RECENT_WINDOW_DAYS)
}

/// Whether `now - site.created_at <= window_days` days.
///
/// Sites stamped in the future (clock skew) count as recent.
pub fn is_recent_within(site: &Site, now: i64, window_days: i64) -> bool {
    now.saturating_sub(site.created_at) <= window_days.saturating_mul(MILLIS_PER_DAY)
}

/// Recent sites, newest first. Ties keep input order.
pub fn recent_sites(sites: &[Site], now: i64) -> Vec<&Site> {
    recent_sites_within(sites, now, RECENT_WINDOW_DAYS)
}

pub fn recent_sites_within(sites: &[Site], now: i64, window_days: i64) -> Vec<&Site> {
    let mut recent = sites
        .iter()
        .filter(|site| is_recent_within(site, now, window_days))
        .collect::<Vec<_>>();
    recent.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    recent
}

/// Humanizes the time between `then` and `now` in whole days.
///
/// | days      | label            |
/// |-----------|------------------|
/// | <= 0      | `Today`          |
/// | 1         | `Yesterday`      |
/// | 2..=6     | `n days ago`     |
/// | 7..=29    | `n weeks ago`    |
/// | 30..=364  | `n months ago`   |
/// | >= 365    | `n years ago`    |
pub fn humanize_elapsed(now: i64, then: i64) -> String {
    let days = now.saturating_sub(then).div_euclid(MILLIS_PER_DAY);
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => format!("{} years ago", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::{humanize_elapsed, is_recent, recent_sites};
    use crate::clock::MILLIS_PER_DAY;
    use crate::model::identity::IdentityId;
    use crate::model::site::{Site, SiteDraft};

    const NOW: i64 = 1_760_000_000_000;

    fn created_days_ago(name: &str, days: i64) -> Site {
        SiteDraft::new(name, "dig").into_site(
            name.to_string(),
            NOW - days * MILLIS_PER_DAY,
            IdentityId::anonymous(),
        )
    }

    #[test]
    fn humanize_fixed_points() {
        assert_eq!(humanize_elapsed(NOW, NOW), "Today");
        assert_eq!(humanize_elapsed(NOW, NOW - MILLIS_PER_DAY), "Yesterday");
        assert_eq!(humanize_elapsed(NOW, NOW - 3 * MILLIS_PER_DAY), "3 days ago");
        assert_eq!(humanize_elapsed(NOW, NOW - 10 * MILLIS_PER_DAY), "1 weeks ago");
        assert_eq!(humanize_elapsed(NOW, NOW - 45 * MILLIS_PER_DAY), "1 months ago");
        assert_eq!(humanize_elapsed(NOW, NOW - 400 * MILLIS_PER_DAY), "1 years ago");
    }

    #[test]
    fn humanize_partial_days_round_down_and_future_is_today() {
        assert_eq!(humanize_elapsed(NOW, NOW - MILLIS_PER_DAY + 1), "Today");
        assert_eq!(humanize_elapsed(NOW, NOW + 5 * MILLIS_PER_DAY), "Today");
    }

    #[test]
    fn recency_window_is_inclusive_at_seven_days() {
        assert!(is_recent(&created_days_ago("edge", 7), NOW));
        let mut past = created_days_ago("past", 7);
        past.created_at -= 1;
        assert!(!is_recent(&past, NOW));
    }

    #[test]
    fn recent_sites_newest_first() {
        let sites = vec![
            created_days_ago("three", 3),
            created_days_ago("old", 30),
            created_days_ago("today", 0),
            created_days_ago("six", 6),
        ];
        let names = recent_sites(&sites, NOW)
            .into_iter()
            .map(|site| site.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["today", "three", "six"]);
    }
}

//! Explore view projection.

use crate::config::CatalogConfig;
use crate::model::site::{Site, SiteId};
use crate::search::filter::filter_sites;
use crate::search::recency::{
    humanize_elapsed, is_recent_within, recent_sites_within, RECENT_WINDOW_DAYS,
};

pub const LOCATION_NOT_SPECIFIED: &str = "Location not specified";

/// One row of the explore list.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteListItem {
    pub id: SiteId,
    pub name: String,
    pub location: String,
    pub period: String,
    pub added: String,
    pub is_new: bool,
    pub artifact_count: usize,
}

/// Filtered list plus the recent highlight list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExploreView {
    pub items: Vec<SiteListItem>,
    /// Ids of recent sites, newest first, independent of the query.
    pub recent: Vec<SiteId>,
}

/// Joins address, region and country with `", "`.
pub fn location_label(site: &Site) -> String {
    let location = &site.location;
    let parts = [&location.address, &location.region, &location.country]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>();
    if parts.is_empty() {
        return LOCATION_NOT_SPECIFIED.to_string();
    }
    parts.join(", ")
}

pub fn explore(sites: &[Site], query: &str, now: i64) -> ExploreView {
    explore_within(sites, query, now, RECENT_WINDOW_DAYS)
}

/// Builds the explore view with the recency window from `catalog`.
pub fn explore_with(
    sites: &[Site],
    query: &str,
    now: i64,
    catalog: &CatalogConfig,
) -> ExploreView {
    explore_within(sites, query, now, catalog.recent_window_days)
}

/// Builds the explore view with a custom recency window.
pub fn explore_within(sites: &[Site], query: &str, now: i64, window_days: i64) -> ExploreView {
    let items = filter_sites(sites, query)
        .into_iter()
        .map(|site| SiteListItem {
            id: site.id.clone(),
            name: site.name.clone(),
            location: location_label(site),
            period: site.period.clone(),
            added: humanize_elapsed(now, site.created_at),
            is_new: is_recent_within(site, now, window_days),
            artifact_count: site.artifacts.len(),
        })
        .collect();
    let recent = recent_sites_within(sites, now, window_days)
        .into_iter()
        .map(|site| site.id.clone())
        .collect();
    ExploreView { items, recent }
}

#[cfg(test)]
mod tests {
    use super::{explore, explore_with, location_label, LOCATION_NOT_SPECIFIED};
    use crate::clock::MILLIS_PER_DAY;
    use crate::config::CatalogConfig;
    use crate::model::identity::IdentityId;
    use crate::model::site::{Location, Site, SiteDraft};

    const NOW: i64 = 1_760_000_000_000;

    fn site(id: &str, name: &str, location: Location, days_ago: i64) -> Site {
        let mut draft = SiteDraft::new(name, "excavation");
        draft.location = location;
        draft.into_site(id.to_string(), NOW - days_ago * MILLIS_PER_DAY, IdentityId::anonymous())
    }

    #[test]
    fn location_label_joins_present_parts() {
        let full = site(
            "s1",
            "Forum",
            Location {
                address: Some("Via Sacra".to_string()),
                region: Some("Lazio".to_string()),
                country: Some("Italy".to_string()),
                ..Location::default()
            },
            0,
        );
        assert_eq!(location_label(&full), "Via Sacra, Lazio, Italy");

        let bare = site("s2", "Unknown", Location::default(), 0);
        assert_eq!(location_label(&bare), LOCATION_NOT_SPECIFIED);
    }

    #[test]
    fn recent_list_ignores_the_query() {
        let sites = vec![
            site("s1", "Roman Villa", Location::default(), 2),
            site("s2", "Hill Fort", Location::default(), 1),
            site("s3", "Old Mound", Location::default(), 90),
        ];
        let view = explore(&sites, "roman", NOW);

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, "s1");
        assert!(view.items[0].is_new);
        assert_eq!(view.items[0].added, "2 days ago");
        assert_eq!(view.recent, vec!["s2".to_string(), "s1".to_string()]);
    }

    #[test]
    fn configured_window_widens_recent_set() {
        let sites = vec![
            site("s1", "Cairn", Location::default(), 20),
            site("s2", "Barrow", Location::default(), 45),
        ];
        assert!(explore(&sites, "", NOW).recent.is_empty());

        let catalog = CatalogConfig {
            recent_window_days: 30,
        };
        let view = explore_with(&sites, "", NOW, &catalog);
        assert_eq!(view.recent, vec!["s1".to_string()]);
        assert!(view.items[0].is_new);
        assert!(!view.items[1].is_new);
        assert_eq!(view.items[1].added, "1 months ago");
    }
}

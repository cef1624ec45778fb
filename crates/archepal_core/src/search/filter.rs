//! Text filter over sites.

use crate::model::site::Site;

/// Returns the sites matching `query`, in input order.
///
/// A blank query (empty after trimming) returns every site. Otherwise a site
/// matches when its name, address, country, region or description contains
/// the query, ignoring case.
pub fn filter_sites<'a>(sites: &'a [Site], query: &str) -> Vec<&'a Site> {
    if query.trim().is_empty() {
        return sites.iter().collect();
    }
    let needle = query.to_lowercase();
    sites
        .iter()
        .filter(|site| site_matches(site, &needle))
        .collect()
}

/// Whether `site` matches an already lowercased `needle`.
pub fn site_matches(site: &Site, needle: &str) -> bool {
    let location = &site.location;
    [
        Some(site.name.as_str()),
        location.address.as_deref(),
        location.country.as_deref(),
        location.region.as_deref(),
        Some(site.description.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::filter_sites;
    use crate::model::identity::IdentityId;
    use crate::model::site::{Location, Site, SiteDraft};

    fn site(name: &str, country: Option<&str>, description: &str) -> Site {
        let mut draft = SiteDraft::new(name, description);
        draft.location = Location {
            country: country.map(str::to_string),
            ..Location::default()
        };
        draft.into_site(name.to_lowercase(), 0, IdentityId::anonymous())
    }

    fn names(sites: Vec<&Site>) -> Vec<&str> {
        sites.into_iter().map(|site| site.name.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_all_in_order() {
        let sites = vec![
            site("Knossos", Some("Greece"), "palace"),
            site("Roman Villa", Some("Italy"), "villa"),
        ];
        assert_eq!(names(filter_sites(&sites, "")), vec!["Knossos", "Roman Villa"]);
        assert_eq!(names(filter_sites(&sites, "   ")), vec!["Knossos", "Roman Villa"]);
    }

    #[test]
    fn match_is_case_insensitive() {
        let sites = vec![
            site("Knossos", Some("Greece"), "palace"),
            site("Roman Villa", Some("Italy"), "villa"),
        ];
        assert_eq!(names(filter_sites(&sites, "roman")), vec!["Roman Villa"]);
        assert_eq!(names(filter_sites(&sites, "GREECE")), vec!["Knossos"]);
    }

    #[test]
    fn description_and_absent_location_fields() {
        let sites = vec![
            site("A", None, "Bronze age hill fort"),
            site("B", None, "harbour"),
        ];
        assert_eq!(names(filter_sites(&sites, "hill")), vec!["A"]);
        assert!(filter_sites(&sites, "italy").is_empty());
    }
}

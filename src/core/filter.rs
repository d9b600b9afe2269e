use crate::domain::model::Venue;

/// Case-insensitive substring match on the venue name or, when present, its
/// first address line. An empty filter matches everything.
pub fn matches(venue: &Venue, filter: &str) -> bool {
    let needle = filter.to_lowercase();
    if venue.name.to_lowercase().contains(&needle) {
        return true;
    }
    venue
        .first_address_line()
        .is_some_and(|line| line.to_lowercase().contains(&needle))
}

/// Indices of the venues matching `filter`, in list order.
pub fn matching_indices(venues: &[Venue], filter: &str) -> Vec<usize> {
    venues
        .iter()
        .enumerate()
        .filter(|(_, venue)| matches(venue, filter))
        .map(|(i, _)| i)
        .collect()
}

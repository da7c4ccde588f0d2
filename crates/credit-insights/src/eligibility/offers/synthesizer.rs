use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::catalog::product_catalog;
use super::{CustomerId, Offer, OfferId, OfferType};
use crate::eligibility::profile::Profile;

/// Offers the rule table grants to `profile`, in evaluation order.
pub fn fresh_offers(
    profile: &Profile,
    customer_id: &CustomerId,
    now: DateTime<Utc>,
) -> Vec<Offer> {
    product_catalog()
        .iter()
        .filter(|product| product.is_eligible(profile))
        .map(|product| Offer::from_product(product, customer_id, now))
        .collect()
}

/// Merge persisted offers with freshly synthesized ones.
///
/// Persisted offers are kept only while active, visible, unexpired and
/// non-promotional, newest first and once per id. Synthesized offers follow in rule order,
/// minus any whose id already exists in the persisted records (the customer
/// has already seen and possibly answered it) or whose product type is
/// already covered by a surfaced persisted offer.
pub fn synthesize_offers(
    profile: &Profile,
    customer_id: &CustomerId,
    persisted: &[Offer],
    now: DateTime<Utc>,
) -> Vec<Offer> {
    let owned: Vec<&Offer> = persisted
        .iter()
        .filter(|offer| offer.customer_id == *customer_id)
        .collect();

    let mut surfaced: Vec<Offer> = owned
        .iter()
        .filter(|offer| offer.is_visible(now) && !offer.offer_type.is_promotional())
        .map(|offer| (*offer).clone())
        .collect();
    surfaced.sort_by(|left, right| right.issued_at.cmp(&left.issued_at));
    let mut seen_ids: HashSet<OfferId> = HashSet::new();
    surfaced.retain(|offer| seen_ids.insert(offer.id.clone()));

    let known_ids: HashSet<&OfferId> = owned.iter().map(|offer| &offer.id).collect();
    let covered: HashSet<OfferType> = surfaced.iter().map(|offer| offer.offer_type).collect();

    let fresh: Vec<Offer> = fresh_offers(profile, customer_id, now)
        .into_iter()
        .filter(|offer| !known_ids.contains(&offer.id) && !covered.contains(&offer.offer_type))
        .collect();

    debug!(
        customer = %customer_id,
        persisted = owned.len(),
        surfaced = surfaced.len(),
        synthesized = fresh.len(),
        "merged offers"
    );

    surfaced.extend(fresh);
    surfaced
}

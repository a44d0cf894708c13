use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::dataset::RawRecord;

use super::allocation::{AllocationPlan, group_by_genre};

/// Draw up to `target` records from `bucket`, preserving its genre mix.
///
/// A bucket that already fits is returned whole and untouched. Otherwise each
/// genre contributes exactly its [`AllocationPlan`] quota, drawn uniformly
/// without replacement; genres are visited in first-seen order so the same
/// input and seed always produce the same output.
pub fn stratified_sample<'a, R: Rng + ?Sized>(
    bucket: &[&'a RawRecord],
    target: usize,
    rng: &mut R,
) -> Vec<&'a RawRecord> {
    if bucket.len() <= target {
        return bucket.to_vec();
    }

    let groups = group_by_genre(bucket);
    let sizes: Vec<(&str, usize)> = groups.iter().map(|g| (g.genre, g.records.len())).collect();
    let plan = AllocationPlan::compute(&sizes, target);
    debug!("Allocation for {} records, target {}: {:?}", bucket.len(), target, plan);

    let mut sampled = Vec::with_capacity(plan.total());
    for group in &groups {
        let count = plan.quota(group.genre).unwrap_or(0);
        if count == 0 {
            continue;
        }
        if count >= group.records.len() {
            sampled.extend(group.records.iter().copied());
        } else {
            sampled.extend(group.records.choose_multiple(rng, count).copied());
        }
    }
    sampled
}

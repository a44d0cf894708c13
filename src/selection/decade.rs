use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use crate::config::DecadeQuota;
use crate::dataset::RawRecord;

use super::sampler::stratified_sample;

/// What one decade contributed to the selection.
#[derive(Debug, Clone)]
pub struct DecadePick<'a> {
    pub decade: u16,
    pub quota: usize,
    /// Unused records in the decade bucket when it was sampled.
    pub available: usize,
    pub records: Vec<&'a RawRecord>,
}

/// Records chosen across all decades; no identifier appears twice.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    pub decades: Vec<DecadePick<'a>>,
    pub used_ids: HashSet<&'a str>,
}

impl<'a> Selection<'a> {
    /// Selected records, decade by decade in configured order.
    pub fn records(&self) -> impl Iterator<Item = &'a RawRecord> + '_ {
        self.decades.iter().flat_map(|d| d.records.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.decades.iter().map(|d| d.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fill every decade quota, in the order given, from `records`.
///
/// Each decade is stratified-sampled by genre; if that comes up short the gap
/// is backfilled with a uniform draw from the rest of the bucket. Picked ids
/// are marked used before the next decade is considered.
pub fn select_by_decade<'a, R: Rng + ?Sized>(
    records: &'a [RawRecord],
    quotas: &[DecadeQuota],
    rng: &mut R,
) -> Selection<'a> {
    let mut selection = Selection::default();

    for &DecadeQuota { decade, quota } in quotas {
        let bucket: Vec<&RawRecord> = records
            .iter()
            .filter(|r| r.decade == decade && !selection.used_ids.contains(r.track_id.as_str()))
            .collect();
        if bucket.is_empty() {
            warn!("No records available for the {}s", decade);
            continue;
        }

        let mut picks = stratified_sample(&bucket, quota, rng);
        // Allocation plans sum to the target whenever the bucket is larger,
        // so this only runs if that stops holding.
        if picks.len() < quota {
            let picked: HashSet<&str> = picks.iter().map(|r| r.track_id.as_str()).collect();
            let remaining: Vec<&RawRecord> = bucket
                .iter()
                .copied()
                .filter(|r| !picked.contains(r.track_id.as_str()))
                .collect();
            let needed = (quota - picks.len()).min(remaining.len());
            if needed > 0 {
                debug!("Backfilling {} records for the {}s", needed, decade);
                picks.extend(remaining.choose_multiple(rng, needed).copied());
            }
        }
        picks.truncate(quota);

        if picks.len() < quota {
            warn!(
                "The {}s only have {} of {} requested records",
                decade,
                picks.len(),
                quota
            );
        } else {
            info!("Selected {} records for the {}s", picks.len(), decade);
        }

        selection
            .used_ids
            .extend(picks.iter().map(|&r| r.track_id.as_str()));
        selection.decades.push(DecadePick {
            decade,
            quota,
            available: bucket.len(),
            records: picks,
        });
    }

    selection
}

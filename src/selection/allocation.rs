use crate::dataset::RawRecord;

/// All records of one genre inside a bucket, in bucket order.
#[derive(Debug, Clone)]
pub struct GenreGroup<'a> {
    pub genre: &'a str,
    pub records: Vec<&'a RawRecord>,
}

/// Group a bucket by `playlist_genre`, keeping genres in first-seen order.
pub fn group_by_genre<'a>(bucket: &[&'a RawRecord]) -> Vec<GenreGroup<'a>> {
    let mut groups: Vec<GenreGroup<'a>> = Vec::new();
    for record in bucket {
        let genre = record.playlist_genre.as_str();
        match groups.iter_mut().find(|g| g.genre == genre) {
            Some(group) => group.records.push(record),
            None => groups.push(GenreGroup {
                genre,
                records: vec![record],
            }),
        }
    }
    groups
}

/// Per-genre quotas for one bucket, in first-seen genre order.
///
/// Quotas start as each genre's rounded proportional share of the target,
/// floored at 1 and capped at the genre's size, and are then reconciled so
/// they add up to the target. Every tie is broken by first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    quotas: Vec<(String, usize)>,
}

impl AllocationPlan {
    /// Build a plan from `(genre, available)` pairs.
    pub fn compute(sizes: &[(&str, usize)], target: usize) -> Self {
        let total: usize = sizes.iter().map(|(_, n)| n).sum();
        let mut quotas: Vec<usize> = sizes
            .iter()
            .map(|&(_, size)| proportional_share(target, size, total).max(1).min(size))
            .collect();

        let current: usize = quotas.iter().sum();
        if current < target {
            fill_shortfall(&mut quotas, sizes, target - current);
        } else if current > target {
            trim_overflow(&mut quotas, sizes, current - target);
        }

        Self {
            quotas: sizes
                .iter()
                .zip(quotas)
                .map(|(&(genre, _), q)| (genre.to_string(), q))
                .collect(),
        }
    }

    pub fn quota(&self, genre: &str) -> Option<usize> {
        self.quotas.iter().find(|(g, _)| g == genre).map(|(_, q)| *q)
    }

    pub fn total(&self) -> usize {
        self.quotas.iter().map(|(_, q)| q).sum()
    }
}

/// `round(target * size / total)`, rounding half to even.
fn proportional_share(target: usize, size: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let share = target as f64 * size as f64 / total as f64;
    share.round_ties_even() as usize
}

/// Hand out `missing` units to the genres with the most headroom (then the
/// largest genres), filling each one before moving to the next.
fn fill_shortfall(quotas: &mut [usize], sizes: &[(&str, usize)], mut missing: usize) {
    let mut order: Vec<usize> = (0..quotas.len()).collect();
    // Stable sort: equal keys keep first-seen order.
    order.sort_by(|&a, &b| {
        let key = |i: usize| (sizes[i].1 - quotas[i], sizes[i].1);
        key(b).cmp(&key(a))
    });

    for i in order {
        if missing == 0 {
            break;
        }
        let headroom = sizes[i].1 - quotas[i];
        let add = missing.min(headroom);
        quotas[i] += add;
        missing -= add;
    }
}

/// Take `excess` units back from the largest quotas first without pushing
/// any genre below 1. If there are more genres than target slots, the
/// smallest genres (latest first-seen on ties) are then dropped to 0.
fn trim_overflow(quotas: &mut [usize], sizes: &[(&str, usize)], mut excess: usize) {
    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| quotas[b].cmp(&quotas[a]));

    for &i in &order {
        if excess == 0 {
            return;
        }
        let removable = excess.min(quotas[i].saturating_sub(1));
        quotas[i] -= removable;
        excess -= removable;
    }

    let mut smallest_first: Vec<usize> = (0..quotas.len()).rev().collect();
    smallest_first.sort_by_key(|&i| sizes[i].1);
    for i in smallest_first {
        if excess == 0 {
            return;
        }
        if quotas[i] > 0 {
            quotas[i] -= 1;
            excess -= 1;
        }
    }
}

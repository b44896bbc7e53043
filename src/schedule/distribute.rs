use std::collections::VecDeque;

use crate::foundation::error::{StrokeError, StrokeResult};

/// Capacity and wrap-around controls for [`distribute`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DistributeOpts {
    /// Maximum items per bucket. `None` is unbounded.
    pub limit: Option<usize>,
    /// Treat the sequence as cyclic: the last item does not land on the last
    /// bucket, leaving room for the wrap back to the first.
    pub cyclic: bool,
}

/// Spread item indices `0..len` over `buckets` ordered buckets.
///
/// Item `i` goes to bucket `min(floor(i * buckets / span), buckets - 1)` where
/// `span` is `len` for cyclic sequences and `len - 1` otherwise. A bucket that
/// overflows `limit` pushes its oldest item into the neighboring bucket toward
/// the middle, cascading until an item finds room; a cascade running off
/// either end turns around.
///
/// Concatenating the returned buckets yields every index exactly once.
/// Fails with [`StrokeError::InfeasibleDistribution`] when
/// `len > buckets * limit`, before any assignment.
pub fn distribute(len: usize, buckets: usize, opts: DistributeOpts) -> StrokeResult<Vec<Vec<usize>>> {
    let limit = opts.limit.unwrap_or(usize::MAX);
    if len == 0 {
        return Ok(vec![Vec::new(); buckets]);
    }
    if buckets == 0 || buckets.checked_mul(limit).is_some_and(|cap| len > cap) {
        return Err(StrokeError::InfeasibleDistribution {
            items: len,
            buckets,
            limit,
        });
    }

    let span = if opts.cyclic { len } else { len - 1 };
    let mut slots: Vec<VecDeque<usize>> = vec![VecDeque::new(); buckets];
    for item in 0..len {
        let at = if span == 0 {
            0
        } else {
            // u128 keeps `item * buckets` exact for any usize inputs.
            let scaled = (item as u128 * buckets as u128) / span as u128;
            usize::try_from(scaled).map_or(buckets - 1, |b| b.min(buckets - 1))
        };
        insert_cascading(&mut slots, item, at, limit);
    }

    Ok(slots.into_iter().map(Vec::from).collect())
}

/// Push `item` into `slots[at]`, evicting oldest items toward the middle
/// while buckets overflow.
///
/// Terminates whenever some bucket has room: a cascade sweeps the whole range
/// at most twice.
fn insert_cascading(slots: &mut [VecDeque<usize>], item: usize, at: usize, limit: usize) {
    let n = slots.len();
    let mut dir: isize = if 2 * at < n { 1 } else { -1 };
    let (mut item, mut at) = (item, at);
    loop {
        let slot = &mut slots[at];
        slot.push_back(item);
        if slot.len() <= limit {
            return;
        }
        let Some(evicted) = slot.pop_front() else {
            return;
        };
        if n == 1 {
            slot.push_back(evicted);
            return;
        }
        let mut next = at as isize + dir;
        if next < 0 || next >= n as isize {
            dir = -dir;
            next = at as isize + dir;
        }
        tracing::trace!(item = evicted, from = at, to = next, "bucket overflow");
        item = evicted;
        at = next as usize;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/distribute.rs"]
mod tests;

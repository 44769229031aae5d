//! Job orderings. In every ordering, [`Ordering::Less`] means "schedule first".

use marshal_base::{Job, PoolName};
use std::cmp::Ordering;

/// A total order over jobs.
pub trait JobComparator {
    fn compare(&self, a: &Job, b: &Job) -> Ordering;
}

impl<F: Fn(&Job, &Job) -> Ordering> JobComparator for F {
    fn compare(&self, a: &Job, b: &Job) -> Ordering {
        self(a, b)
    }
}

/// A total order over jobs that depends on the pool being scheduled.
pub trait PoolJobComparator {
    fn compare(&self, pool: &PoolName, a: &Job, b: &Job) -> Ordering;
}

impl<F: Fn(&PoolName, &Job, &Job) -> Ordering> PoolJobComparator for F {
    fn compare(&self, pool: &PoolName, a: &Job, b: &Job) -> Ordering {
        self(pool, a, b)
    }
}

/// The default scheduling order:
///   1. higher priority-class priority,
///   2. running jobs before queued ones, longest running first,
///   3. lower job priority,
///   4. earlier submission,
///   5. job id.
///
/// Jobs with the same id always compare equal.
#[derive(Clone, Copy, Debug, Default)]
pub struct SchedulingOrder;

impl JobComparator for SchedulingOrder {
    fn compare(&self, a: &Job, b: &Job) -> Ordering {
        if a.id() == b.id() {
            return Ordering::Equal;
        }
        b.priority_class_priority()
            .cmp(&a.priority_class_priority())
            .then_with(|| running_first(a, b))
            .then_with(|| a.priority().cmp(&b.priority()))
            .then_with(|| a.submit_time().cmp(&b.submit_time()))
            .then_with(|| a.id().cmp(b.id()))
    }
}

/// The market scheduling order for a pool:
///   1. higher bid price in the pool,
///   2. running jobs before queued ones, longest running first,
///   3. earlier submission,
///   4. job id.
///
/// Jobs with the same id always compare equal.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarketSchedulingOrder;

impl MarketSchedulingOrder {
    /// The market order for `pool` alone, usable wherever a [`JobComparator`] is expected.
    pub fn for_pool(pool: impl Into<PoolName>) -> PoolMarketSchedulingOrder {
        PoolMarketSchedulingOrder { pool: pool.into() }
    }
}

impl PoolJobComparator for MarketSchedulingOrder {
    fn compare(&self, pool: &PoolName, a: &Job, b: &Job) -> Ordering {
        market_scheduling_order_compare(pool, a, b)
    }
}

/// [`MarketSchedulingOrder`] bound to one pool. See [`MarketSchedulingOrder::for_pool`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolMarketSchedulingOrder {
    pool: PoolName,
}

impl PoolMarketSchedulingOrder {
    pub fn pool(&self) -> &PoolName {
        &self.pool
    }
}

impl JobComparator for PoolMarketSchedulingOrder {
    fn compare(&self, a: &Job, b: &Job) -> Ordering {
        market_scheduling_order_compare(&self.pool, a, b)
    }
}

pub fn market_scheduling_order_compare(pool: &PoolName, a: &Job, b: &Job) -> Ordering {
    if a.id() == b.id() {
        return Ordering::Equal;
    }
    b.bid_price(pool)
        .cmp(&a.bid_price(pool))
        .then_with(|| running_first(a, b))
        .then_with(|| a.submit_time().cmp(&b.submit_time()))
        .then_with(|| a.id().cmp(b.id()))
}

fn running_first(a: &Job, b: &Job) -> Ordering {
    // A running job without a recorded run is treated as having started last.
    let started = |job: &Job| job.latest_run().map_or(i64::MAX, |run| run.created);
    match (a.queued(), b.queued()) {
        (true, true) => Ordering::Equal,
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => started(a).cmp(&started(b)),
    }
}

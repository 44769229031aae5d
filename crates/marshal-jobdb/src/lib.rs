//! The job store as seen by the scheduler: per-queue sequences of queued jobs, and the orderings
//! jobs are scheduled in.

mod comparison;
mod db;

pub use comparison::{
    market_scheduling_order_compare, JobComparator, MarketSchedulingOrder,
    PoolJobComparator, PoolMarketSchedulingOrder, SchedulingOrder,
};
pub use db::{JobDb, JobDbIterator};

use anyhow::Result;
use marshal_base::{Job, PoolName, QueueName};
use std::sync::Arc;
use strum::Display;

/// The order the store hands out a queue's jobs in.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum JobSortOrder {
    /// [`SchedulingOrder`].
    #[default]
    FairShare,
    /// [`MarketSchedulingOrder`] for the requested pool.
    Price,
}

/// The store's native sequence of jobs. `Ok(None)` means the sequence is exhausted.
pub trait JobIterator {
    fn next(&mut self) -> Result<Option<Arc<Job>>>;
}

impl<T: JobIterator + ?Sized> JobIterator for Box<T> {
    fn next(&mut self) -> Result<Option<Arc<Job>>> {
        (**self).next()
    }
}

/// A source of queued jobs.
pub trait JobRepository {
    type Iter: JobIterator;

    /// The queued jobs of `queue` that may run in `pool`, in `order`.
    fn queued_jobs(&self, queue: &QueueName, pool: &PoolName, order: JobSortOrder) -> Self::Iter;
}

impl<T: JobRepository + ?Sized> JobRepository for Arc<T> {
    type Iter = T::Iter;

    fn queued_jobs(&self, queue: &QueueName, pool: &PoolName, order: JobSortOrder) -> Self::Iter {
        (**self).queued_jobs(queue, pool, order)
    }
}

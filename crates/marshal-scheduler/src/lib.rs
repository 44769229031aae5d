//! Job selection for a scheduling round: deciding the order in which pending jobs are offered to
//! the scheduler for one pool.
//!
//! A round builds a tree of [`JobContextIterator`]s and pulls from its root until resources run
//! out or the tree is exhausted. Leaves read from an [`InMemoryJobRepository`] snapshot or from the
//! job store; interior nodes either chain their children in strict priority
//! ([`MultiJobsIterator`]) or merge two children by bid price
//! ([`MarketDrivenMultiJobsIterator`]).

pub mod builder;
pub mod config;
pub mod context;
pub mod iteration;
pub mod repository;
pub mod round;

#[cfg(test)]
mod test_util;

pub use builder::queue_job_iterator;
pub use config::{ConfigError, PoolConfig, SchedulingConfig};
pub use context::JobSchedulingContext;
pub use iteration::{
    BoxJobContextIterator, Contexts, InMemoryJobIterator, JobContextIterator,
    JobContextIteratorExt, MarketDrivenMultiJobsIterator, MultiJobsIterator, QueuedJobsIterator,
};
pub use repository::InMemoryJobRepository;
pub use round::{RoundCancelled, RoundContext};

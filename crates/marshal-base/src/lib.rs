//! Core data model shared by the job store, the scheduler, and their tests. Jobs are immutable
//! once built: every `with_*` method consumes the job and returns an updated copy.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Deserialize, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                Debug::fmt(&self.0, f)
            }
        }
    };
}

string_id! {
    /// Globally unique identity of a job.
    JobId
}

string_id! {
    /// Name of a queue. Jobs in the same queue share ownership and scheduling priority.
    QueueName
}

string_id! {
    /// Name of a pool: a partition of compute resources targeted by one scheduling round.
    PoolName
}

string_id! {
    /// Identity of a single attempt at running a job.
    RunId
}

/// Suffix appended to a queue's name to form its away queue.
pub const AWAY_QUEUE_SUFFIX: &str = "-away";

/// The synthetic queue a job is filed under when its most recent placement lies outside the pool
/// being scheduled.
pub fn away_queue_name(queue: &QueueName) -> QueueName {
    QueueName(format!("{}{AWAY_QUEUE_SUFFIX}", queue.0))
}

/// The amount a job bids to run in a given pool. Ordered totally, so `NaN` sorts above every other
/// value rather than poisoning comparisons.
#[derive(Clone, Copy, Default, Display, From)]
pub struct BidPrice(f64);

impl BidPrice {
    pub const ZERO: Self = Self(0.0);

    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl Debug for BidPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl PartialEq for BidPrice {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BidPrice {}

impl PartialOrd for BidPrice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BidPrice {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A single attempt at running a job. Only the placement is of interest when ordering jobs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobRun {
    pub id: RunId,
    pub pool: PoolName,
    pub node: Option<String>,
    /// Nanoseconds since the Unix epoch.
    pub created: i64,
}

impl JobRun {
    pub fn new(id: impl Into<RunId>, pool: impl Into<PoolName>, created: i64) -> Self {
        JobRun {
            id: id.into(),
            pool: pool.into(),
            node: None,
            created,
        }
    }

    pub fn node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}

/// A job as the job store knows it.
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    id: JobId,
    queue: QueueName,
    priority: u32,
    priority_class_priority: i32,
    submit_time: i64,
    queued: bool,
    pools: Vec<PoolName>,
    bid_prices: BTreeMap<PoolName, BidPrice>,
    latest_run: Option<JobRun>,
}

impl Job {
    /// A queued job with default priorities, no bids, and no runs.
    pub fn new(id: impl Into<JobId>, queue: impl Into<QueueName>) -> Self {
        Job {
            id: id.into(),
            queue: queue.into(),
            priority: 0,
            priority_class_priority: 0,
            submit_time: 0,
            queued: true,
            pools: Vec::new(),
            bid_prices: BTreeMap::new(),
            latest_run: None,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn queue(&self) -> &QueueName {
        &self.queue
    }

    /// Lower values are more urgent.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Higher values are more important.
    pub fn priority_class_priority(&self) -> i32 {
        self.priority_class_priority
    }

    /// Nanoseconds since the Unix epoch.
    pub fn submit_time(&self) -> i64 {
        self.submit_time
    }

    pub fn queued(&self) -> bool {
        self.queued
    }

    /// The pools this job may be scheduled into. An empty list means any pool.
    pub fn pools(&self) -> &[PoolName] {
        &self.pools
    }

    pub fn is_eligible_for(&self, pool: &PoolName) -> bool {
        self.pools.is_empty() || self.pools.contains(pool)
    }

    pub fn bid_price(&self, pool: &PoolName) -> BidPrice {
        self.bid_prices.get(pool).copied().unwrap_or(BidPrice::ZERO)
    }

    pub fn latest_run(&self) -> Option<&JobRun> {
        self.latest_run.as_ref()
    }

    pub fn latest_run_pool(&self) -> Option<&PoolName> {
        self.latest_run.as_ref().map(|run| &run.pool)
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_priority_class_priority(mut self, priority: i32) -> Self {
        self.priority_class_priority = priority;
        self
    }

    pub fn with_submit_time(mut self, submit_time: i64) -> Self {
        self.submit_time = submit_time;
        self
    }

    pub fn with_queued(mut self, queued: bool) -> Self {
        self.queued = queued;
        self
    }

    pub fn with_pools<I, T>(mut self, pools: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PoolName>,
    {
        self.pools = pools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bid_price(mut self, pool: impl Into<PoolName>, price: impl Into<BidPrice>) -> Self {
        self.bid_prices.insert(pool.into(), price.into());
        self
    }

    pub fn with_latest_run(mut self, run: JobRun) -> Self {
        self.latest_run = Some(run);
        self
    }
}

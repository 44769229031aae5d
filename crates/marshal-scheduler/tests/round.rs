//! Drives whole scheduling rounds through the public API: configuration, the round context, the
//! job store, the repository of evicted jobs, and a tree of iterators per pool.

use anyhow::Result;
use indoc::indoc;
use maplit::hashmap;
use marshal_base::{Job, QueueName};
use marshal_jobdb::{JobComparator, JobDb, MarketSchedulingOrder, SchedulingOrder};
use marshal_scheduler::{
    queue_job_iterator, InMemoryJobRepository, JobContextIterator, JobContextIteratorExt as _,
    JobSchedulingContext, MultiJobsIterator, PoolConfig, RoundCancelled, SchedulingConfig,
};
use marshal_test::*;
use marshal_util::log::test_logger;
use std::{collections::HashMap, sync::Arc};

fn config() -> SchedulingConfig {
    SchedulingConfig::from_toml_str(indoc! {r#"
        log-level = "debug"
        round-timeout-ms = 600000

        [[pools]]
        name = "cpu"

        [[pools]]
        name = "gpu"
        market-driven = true
    "#})
    .unwrap()
}

fn job_db() -> JobDb {
    let db = JobDb::new();
    db.upsert([
        job!["a1", "A", priority: 1, bid: ("gpu", 2.0)],
        job!["a2", "A", priority: 2, bid: ("gpu", 6.0)],
        job!["b1", "B", priority: 1, bid: ("gpu", 5.0)],
        job!["b2", "B", priority: 3, bid: ("gpu", 1.0), pools: ["gpu"]],
        job!["c1", "C", priority: 0, bid: ("gpu", 4.0), pools: ["cpu"]],
    ]);
    db
}

fn evicted() -> Vec<Job> {
    vec![
        job!["a0", "A", queued: false, bid: ("gpu", 3.0), run: ("r0", "cpu", 0)],
        job!["b0", "B", queued: false, bid: ("gpu", 3.0), run: ("r1", "gpu", 0)],
        job!["b9", "B", queued: false, bid: ("gpu", 8.0), run: ("r9", "gpu", 5)],
    ]
}

fn repository<CompT: JobComparator>(
    pool: &PoolConfig,
    comparator: CompT,
) -> InMemoryJobRepository<CompT> {
    let repo = InMemoryJobRepository::new(pool.name.clone(), comparator, test_logger());
    repo.enqueue_many(
        evicted()
            .into_iter()
            .map(|job| Arc::new(JobSchedulingContext::from_job(job))),
    );
    repo
}

fn ids(jctxs: &[Arc<JobSchedulingContext>]) -> Vec<String> {
    jctxs.iter().map(|jctx| jctx.job_id().to_string()).collect()
}

/// Queues in strict priority order, each queue drawing evicted jobs and queued jobs as its pool
/// dictates. Evicted jobs are held in a repository ordered by `comparator`.
fn round(
    pool_name: &str,
    comparator: impl JobComparator,
    queues: &[QueueName],
) -> Result<Vec<Arc<JobSchedulingContext>>> {
    let config = config();
    let pool = config.pool(&pool![pool_name]).unwrap();
    let ctx = config.round_context(test_logger());
    let db = job_db();
    let repo = repository(pool, comparator);

    MultiJobsIterator::new(
        queues
            .iter()
            .map(|queue| queue_job_iterator(&ctx, pool, queue, &repo, &db)),
    )
    .contexts()
    .collect()
}

#[test]
fn ordinary_pool_round() {
    let queues = [queue!["B"], queue!["A"], queue!["C"], queue!["A-away"]];
    let order = round("cpu", SchedulingOrder, &queues).unwrap();
    assert_eq!(ids(&order), ["b1", "a0", "a1", "a2", "c1"]);
}

#[test]
fn away_queues_hold_jobs_that_ran_elsewhere() {
    let order = round("cpu", SchedulingOrder, &[queue!["B-away"]]).unwrap();
    assert_eq!(ids(&order), ["b0", "b9"]);
}

fn assert_market_driven_round(comparator: impl JobComparator + Clone) {
    let expected: HashMap<QueueName, Vec<&str>> = hashmap! {
        queue!["A"] => vec!["a2", "a1"],
        queue!["B"] => vec!["b9", "b1", "b0", "b2"],
        queue!["A-away"] => vec!["a0"],
        queue!["C"] => vec![],
    };
    for (queue, jobs) in expected {
        let order = round("gpu", comparator.clone(), &[queue.clone()]).unwrap();
        assert_eq!(ids(&order), jobs, "queue {queue}");
    }
}

#[test]
fn market_driven_pool_round() {
    assert_market_driven_round(MarketSchedulingOrder::for_pool("gpu"));
}

#[test]
fn market_driven_pool_round_ignores_repository_order() {
    assert_market_driven_round(SchedulingOrder);
}

#[test]
fn cancelled_round_surfaces_error_after_evicted_jobs() {
    let config = config();
    let pool = config.pool(&pool!["cpu"]).unwrap();
    let out = SharedWriter::default();
    let ctx = config.round_context(config.logger(out.clone()));
    let db = job_db();
    let repo = repository(pool, SchedulingOrder);

    let mut it = queue_job_iterator(&ctx, pool, &queue!["A"], &repo, &db);
    ctx.cancel();
    assert_eq!(it.next().unwrap().unwrap().job_id(), &job_id!["a0"]);
    let err = it.next().unwrap_err();
    assert_eq!(err.downcast_ref::<RoundCancelled>(), Some(&RoundCancelled::Cancelled));
    assert!(it.next().is_err());

    drop(it);
    drop(ctx);
    let contents = out.contents();
    assert!(contents.contains("building queue iterator"));
    assert_eq!(contents.matches("stopped reading queued jobs").count(), 1);
}

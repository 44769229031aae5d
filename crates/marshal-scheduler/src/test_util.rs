//! Test doubles for iterators and job sources.

use crate::{context::JobSchedulingContext, iteration::JobContextIterator};
use anyhow::{anyhow, Result};
use marshal_base::Job;
use marshal_jobdb::JobIterator;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

pub fn jctx(job: Job) -> Arc<JobSchedulingContext> {
    Arc::new(JobSchedulingContext::from_job(job))
}

pub fn jctxs(jobs: impl IntoIterator<Item = Job>) -> Vec<Arc<JobSchedulingContext>> {
    jobs.into_iter().map(jctx).collect()
}

/// Drain `it`, returning the ids of the jobs it yielded.
pub fn drain_ids(mut it: impl JobContextIterator) -> Vec<String> {
    let mut ids = vec![];
    while let Some(jctx) = it.next().unwrap() {
        ids.push(jctx.job_id().to_string());
    }
    ids
}

/// Counts how many times a scripted iterator has been pulled.
#[derive(Clone, Default)]
pub struct Pulls(Arc<AtomicUsize>);

impl Pulls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn incr(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Yields a scripted sequence of jobs and failures, then `Ok(None)` forever.
#[derive(Default)]
pub struct ScriptedIterator {
    steps: VecDeque<Result<Arc<Job>, &'static str>>,
    pulls: Pulls,
}

impl ScriptedIterator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(mut self, job: Job) -> Self {
        self.steps.push_back(Ok(Arc::new(job)));
        self
    }

    pub fn fail(mut self, message: &'static str) -> Self {
        self.steps.push_back(Err(message));
        self
    }

    pub fn build(self) -> (Self, Pulls) {
        let pulls = self.pulls.clone();
        (self, pulls)
    }

    fn step(&mut self) -> Result<Option<Arc<Job>>> {
        self.pulls.incr();
        match self.steps.pop_front() {
            None => Ok(None),
            Some(Ok(job)) => Ok(Some(job)),
            Some(Err(message)) => Err(anyhow!(message)),
        }
    }
}

impl JobContextIterator for ScriptedIterator {
    fn next(&mut self) -> Result<Option<Arc<JobSchedulingContext>>> {
        Ok(self
            .step()?
            .map(|job| Arc::new(JobSchedulingContext::from_job(job))))
    }
}

impl JobIterator for ScriptedIterator {
    fn next(&mut self) -> Result<Option<Arc<Job>>> {
        self.step()
    }
}

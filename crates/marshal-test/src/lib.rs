use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

#[macro_export]
macro_rules! job_id {
    [$n:expr] => {
        marshal_base::JobId::from($n.to_string())
    };
}

#[macro_export]
macro_rules! queue {
    [$n:expr] => {
        marshal_base::QueueName::from($n.to_string())
    };
}

#[macro_export]
macro_rules! pool {
    [$n:expr] => {
        marshal_base::PoolName::from($n.to_string())
    };
}

/// A queued job with the given id in the given queue. Extra `name: value` pairs are applied with
/// the matching builder method. Each value must be a single token tree.
#[macro_export]
macro_rules! job {
    (@fields $job:expr) => { $job };
    (@fields $job:expr, priority: $value:tt $(, $field:ident: $rest:tt)*) => {
        $crate::job!(@fields $job.with_priority($value) $(, $field: $rest)*)
    };
    (@fields $job:expr, priority_class: $value:tt $(, $field:ident: $rest:tt)*) => {
        $crate::job!(@fields $job.with_priority_class_priority($value) $(, $field: $rest)*)
    };
    (@fields $job:expr, submitted: $value:tt $(, $field:ident: $rest:tt)*) => {
        $crate::job!(@fields $job.with_submit_time($value) $(, $field: $rest)*)
    };
    (@fields $job:expr, queued: $value:tt $(, $field:ident: $rest:tt)*) => {
        $crate::job!(@fields $job.with_queued($value) $(, $field: $rest)*)
    };
    (@fields $job:expr, pools: $value:tt $(, $field:ident: $rest:tt)*) => {
        $crate::job!(@fields $job.with_pools($value) $(, $field: $rest)*)
    };
    (@fields $job:expr, bid: ($pool:expr, $price:expr) $(, $field:ident: $rest:tt)*) => {
        $crate::job!(@fields
            $job.with_bid_price($crate::pool![$pool], $price)
            $(, $field: $rest)*)
    };
    (@fields $job:expr, run: ($run:expr, $pool:expr, $created:expr)
        $(, $field:ident: $rest:tt)*) => {
        $crate::job!(@fields
            $job.with_latest_run(marshal_base::JobRun::new(
                $run.to_string(),
                $crate::pool![$pool],
                $created,
            ))
            $(, $field: $rest)*)
    };
    [$id:expr, $queue:expr $(, $field:ident: $value:tt)* $(,)?] => {
        $crate::job!(@fields
            marshal_base::Job::new($crate::job_id![$id], $crate::queue![$queue])
            $(, $field: $value)*)
    };
}

/// An in-memory writer whose clones all append to the same buffer. Handy for checking what a
/// logger wrote.
#[derive(Clone, Default)]
pub struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl SharedWriter {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

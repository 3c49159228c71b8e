#![allow(dead_code)]

use std::thread;
use std::time::Duration;

use workerctl::{LaunchStrategy, Worker};
use workerctl_test_utils::builders::WorkerConfigBuilder;

pub use workerctl_test_utils::{init_tracing, wait_until};

/// Worker whose callback spins until the cancellation token is set.
pub fn spinning_worker(strategy: LaunchStrategy) -> Worker<(), ()> {
    let mut worker = WorkerConfigBuilder::new()
        .name("spinner")
        .strategy(strategy)
        .build_worker();
    worker.on_work(|ctx| {
        while !ctx.is_cancelled() {
            thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    });
    worker
}

mod common;
use crate::common::{init_tracing, spinning_worker, wait_until};

use std::thread;
use std::time::Duration;

use workerctl::LaunchStrategy;
use workerctl_test_utils::builders::{ALL_STRATEGIES, WorkerConfigBuilder};
use workerctl_test_utils::recorders::Flag;

#[test]
fn callback_observes_cancellation_pending_after_stop_begins() {
    init_tracing();

    for strategy in ALL_STRATEGIES {
        let saw_pending = Flag::new();
        let pending_at_start = Flag::new();

        let mut worker = WorkerConfigBuilder::new().strategy(strategy).build_worker();
        {
            let saw_pending = saw_pending.clone();
            let pending_at_start = pending_at_start.clone();
            worker.on_work(move |ctx| {
                if ctx.cancellation_pending() {
                    pending_at_start.set();
                }
                while !ctx.cancellation_pending() {
                    thread::sleep(Duration::from_millis(1));
                }
                saw_pending.set();
                Ok(())
            });
        }

        worker.start((), ());
        assert!(wait_until(Duration::from_secs(2), || worker.is_running()));
        assert!(!worker.cancellation_pending());

        worker.stop().unwrap();

        assert!(saw_pending.is_set(), "{strategy}: abort never observed");
        assert!(!pending_at_start.is_set(), "{strategy}: abort set before stop");
        assert!(worker.cancellation_pending());
    }
}

#[test]
fn start_hands_out_fresh_signals() {
    init_tracing();

    let mut worker = spinning_worker(LaunchStrategy::Dedicated);

    worker.start((), ());
    worker.stop().unwrap();
    assert!(worker.is_cancelled());
    assert!(worker.cancellation_pending());

    worker.start((), ());
    assert!(!worker.is_cancelled());
    assert!(!worker.cancellation_pending());

    worker.stop().unwrap();
}

#[test]
fn cancellation_is_monotonic_within_a_run() {
    init_tracing();

    let regressed = Flag::new();
    let mut worker = WorkerConfigBuilder::new().build_worker();
    {
        let regressed = regressed.clone();
        worker.on_work(move |ctx| {
            while !ctx.is_cancelled() {
                thread::sleep(Duration::from_millis(1));
            }
            for _ in 0..20 {
                if !ctx.is_cancelled() {
                    regressed.set();
                }
                thread::sleep(Duration::from_millis(1));
            }
            Ok(())
        });
    }

    worker.start((), ());
    worker.stop().unwrap();

    assert!(!regressed.is_set());
}

#[test]
fn callback_can_await_cancellation() {
    init_tracing();

    let woke = Flag::new();
    let mut worker = WorkerConfigBuilder::new()
        .strategy(LaunchStrategy::Dedicated)
        .build_worker();
    {
        let woke = woke.clone();
        worker.on_work(move |ctx| {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let token = ctx.cancel_token().clone();
            rt.block_on(async move {
                tokio::time::timeout(Duration::from_secs(5), token.cancelled()).await
            })?;
            woke.set();
            Ok(())
        });
    }

    worker.start((), ());
    assert!(wait_until(Duration::from_secs(2), || worker.is_running()));
    worker.stop().unwrap();

    assert!(woke.is_set());
    assert!(worker.last_fault().is_none());
}

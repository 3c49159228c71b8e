mod common;
use crate::common::{init_tracing, wait_until};

use std::thread;
use std::time::Duration;

use workerctl::StartOptions;
use workerctl_test_utils::builders::{ALL_STRATEGIES, WorkerConfigBuilder};
use workerctl_test_utils::recorders::Flag;

#[test]
fn callback_waits_for_initial_delay() {
    init_tracing();

    for strategy in ALL_STRATEGIES {
        let flag = Flag::new();
        let mut worker = WorkerConfigBuilder::new().strategy(strategy).build_worker();
        {
            let flag = flag.clone();
            worker.on_work(move |_ctx| {
                flag.set();
                Ok(())
            });
        }

        worker.start_with(
            (),
            (),
            StartOptions::new().initial_delay(Duration::from_millis(200)),
        );

        thread::sleep(Duration::from_millis(50));
        assert!(!flag.is_set(), "{strategy}: callback ran before the delay elapsed");
        assert!(worker.is_running(), "{strategy}: running not set during the delay");

        thread::sleep(Duration::from_millis(250));
        assert!(flag.is_set(), "{strategy}: callback did not run by +300ms");

        worker.stop().unwrap();
    }
}

#[test]
fn stop_during_initial_delay_waits_for_the_delay() {
    init_tracing();

    let flag = Flag::new();
    let mut worker = WorkerConfigBuilder::new().build_worker();
    {
        let flag = flag.clone();
        worker.on_work(move |ctx| {
            // The delay does not consult cancellation, so the callback still
            // runs and sees the request.
            if ctx.is_cancelled() {
                flag.set();
            }
            Ok(())
        });
    }

    worker.start_with(
        (),
        (),
        StartOptions::new().initial_delay(Duration::from_millis(100)),
    );
    assert!(wait_until(Duration::from_secs(1), || worker.is_running()));
    worker.stop().unwrap();

    assert!(flag.is_set());
    assert!(worker.is_done());
}

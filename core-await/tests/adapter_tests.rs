//! Integration tests for the await adapter.
//!
//! The caller of this crate is synchronous, so every test is a plain
//! `#[test]` that owns a multi-threaded Tokio runtime acting as the host.

use bridge_tokio::{RuntimeScheduler, SharedTask, ThreadPoolScheduler};
use bridge_traits::{failure, AggregateFailure, ContinuationScheduler, Failure, TaskOutcome};
use core_await::{
    from_awaitable, AdapterError, AdapterOptions, AwaitAdapter, Awaitable, Strategy,
    StrategyPreference, TaskAwaitAdapter,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

const DELAY: Duration = Duration::from_millis(100);
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
#[error("expected {expected} rows, found {found}")]
struct RowCountMismatch {
    expected: usize,
    found: usize,
}

fn host_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

fn scheduler(rt: &Runtime) -> Arc<dyn ContinuationScheduler> {
    Arc::new(RuntimeScheduler::new(rt.handle().clone()))
}

fn legacy_options(rt: &Runtime) -> AdapterOptions {
    AdapterOptions::default()
        .with_strategy(StrategyPreference::Legacy)
        .with_scheduler(scheduler(rt))
}

fn succeed() -> TaskOutcome {
    Ok(())
}

fn delayed(rt: &Runtime, outcome: TaskOutcome) -> JoinHandle<TaskOutcome> {
    rt.spawn(async move {
        tokio::time::sleep(DELAY).await;
        outcome
    })
}

fn settled<T: Send + 'static>(handle: JoinHandle<T>) -> JoinHandle<T> {
    while !handle.is_finished() {
        thread::sleep(Duration::from_millis(1));
    }
    handle
}

fn adapter_for<T: Send + 'static>(awaitable: T, options: &AdapterOptions) -> TaskAwaitAdapter {
    from_awaitable(Some(Awaitable::new(awaitable)), options).unwrap()
}

// ============================================================================
// Factory
// ============================================================================

#[test]
fn test_null_awaitable_is_rejected() {
    let err = from_awaitable(None, &AdapterOptions::default()).unwrap_err();
    assert!(matches!(err, AdapterError::InvalidInput));
}

#[test]
fn test_type_erased_unrecognised_task_is_rejected() {
    let rt = host_runtime();
    let future_value = rt.spawn(async { 42_u32 });

    let err = TaskAwaitAdapter::from_awaitable(Some(Awaitable::new(future_value))).unwrap_err();
    match err {
        AdapterError::UnsupportedAwaitable { type_name } => {
            assert!(type_name.contains("JoinHandle<u32>"), "{type_name}")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_typed_task_with_own_error_type() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let handle = rt.spawn(async {
            tokio::time::sleep(DELAY).await;
            Err::<(), _>(RowCountMismatch {
                expected: 3,
                found: 2,
            })
        });

        let adapter = from_awaitable(Some(Awaitable::task(handle)), &options).unwrap();
        let err = adapter.block_until_completed().unwrap_err();

        let mismatch = err.downcast_ref::<RowCountMismatch>();
        assert!(mismatch.is_some(), "{name}: {err}");
        assert_eq!(mismatch.map(|m| (m.expected, m.found)), Some((3, 2)), "{name}");
    }
}

#[test]
fn test_discarding_task_ignores_its_value() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let handle = settled(rt.spawn(async { 42_u32 }));

        let adapter = from_awaitable(Some(Awaitable::discarding(handle)), &options).unwrap();
        assert!(adapter.is_completed(), "{name}");
        assert!(adapter.block_until_completed().is_ok(), "{name}");
    }
}

#[test]
fn test_tokio_tasks_select_native_strategy() {
    let rt = host_runtime();

    let outcome_task = adapter_for(rt.spawn(async { succeed() }), &AdapterOptions::default());
    let unit_task = adapter_for(rt.spawn(async {}), &AdapterOptions::default());

    assert_eq!(outcome_task.strategy(), Strategy::Native);
    assert_eq!(unit_task.strategy(), Strategy::Native);
}

#[test]
fn test_shared_task_selects_legacy_strategy() {
    let rt = host_runtime();
    let task = SharedTask::spawn(async { Ok(()) }, scheduler(&rt).as_ref());

    let options = AdapterOptions::default().with_scheduler(scheduler(&rt));
    let adapter = adapter_for(task, &options);

    assert_eq!(adapter.strategy(), Strategy::Legacy);
    assert!(adapter.block_until_completed().is_ok());
}

#[test]
fn test_legacy_without_scheduler_is_capability_missing() {
    let rt = host_runtime();
    let options = AdapterOptions::default().with_strategy(StrategyPreference::Legacy);

    let err = from_awaitable(Some(Awaitable::new(rt.spawn(async {}))), &options).unwrap_err();
    match err {
        AdapterError::CapabilityMissing { capability, .. } => {
            assert_eq!(capability, "ContinuationScheduler")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_legacy_falls_back_to_ambient_runtime() {
    let rt = host_runtime();
    let options = AdapterOptions::default().with_strategy(StrategyPreference::Legacy);
    let handle = rt.spawn(async { succeed() });

    let adapter = rt
        .block_on(async { from_awaitable(Some(Awaitable::new(handle)), &options) })
        .unwrap();

    assert_eq!(adapter.strategy(), Strategy::Legacy);
    assert!(adapter.block_until_completed().is_ok());
}

// ============================================================================
// Both strategies
// ============================================================================

fn strategies(rt: &Runtime) -> Vec<(&'static str, AdapterOptions)> {
    vec![
        ("native", AdapterOptions::default()),
        ("legacy", legacy_options(rt)),
    ]
}

#[test]
fn test_settled_success_returns_immediately() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let adapter = adapter_for(settled(rt.spawn(async { succeed() })), &options);
        assert!(adapter.is_completed(), "{name}");

        let start = Instant::now();
        assert!(adapter.block_until_completed().is_ok(), "{name}");
        assert!(start.elapsed() < DELAY, "{name}");
    }
}

#[test]
fn test_delayed_success_blocks_for_the_delay() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let start = Instant::now();
        let adapter = adapter_for(delayed(&rt, Ok(())), &options);
        assert!(!adapter.is_completed(), "{name}");

        assert!(adapter.block_until_completed().is_ok(), "{name}");

        let elapsed = start.elapsed();
        assert!(elapsed >= DELAY, "{name}: {elapsed:?}");
        assert!(elapsed < DELAY * 20, "{name}: {elapsed:?}");
    }
}

#[test]
fn test_is_completed_turns_true_after_delay() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let adapter = adapter_for(delayed(&rt, Ok(())), &options);
        assert!(!adapter.is_completed(), "{name}");

        let deadline = Instant::now() + RECV_TIMEOUT;
        while !adapter.is_completed() {
            assert!(Instant::now() < deadline, "{name}: never settled");
            thread::sleep(Duration::from_millis(5));
        }
    }
}

#[test]
fn test_delayed_single_failure_is_surfaced_verbatim() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let original = failure(RowCountMismatch {
            expected: 3,
            found: 2,
        });
        let adapter = adapter_for(delayed(&rt, Err(Arc::clone(&original))), &options);

        let start = Instant::now();
        let err = adapter.block_until_completed().unwrap_err();

        assert!(start.elapsed() >= DELAY / 2, "{name}");
        assert!(Arc::ptr_eq(&err, &original), "{name}");

        let mismatch = err.downcast_ref::<RowCountMismatch>().unwrap();
        assert_eq!((mismatch.expected, mismatch.found), (3, 2), "{name}");
    }
}

#[test]
fn test_null_callback_is_a_no_op() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let mut adapter = adapter_for(delayed(&rt, Ok(())), &options);
        adapter.on_completed(None);
        assert!(adapter.block_until_completed().is_ok(), "{name}");
    }
}

#[test]
fn test_callback_on_settled_awaitable_fires_once() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();

        let mut adapter = adapter_for(settled(rt.spawn(async { succeed() })), &options);
        let counter = Arc::clone(&calls);
        adapter.on_completed(Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            tx.send(()).unwrap();
        })));

        rx.recv_timeout(RECV_TIMEOUT).unwrap();
        assert!(rx.recv_timeout(DELAY).is_err(), "{name}");
        assert_eq!(calls.load(Ordering::SeqCst), 1, "{name}");
    }
}

#[test]
fn test_callback_runs_only_after_settlement() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let (tx, rx) = mpsc::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let mut adapter = adapter_for(
            rt.spawn(async move {
                let _ = release_rx.await;
                succeed()
            }),
            &options,
        );

        adapter.on_completed(Some(Box::new(move || {
            tx.send(Instant::now()).unwrap();
        })));

        assert!(rx.recv_timeout(DELAY).is_err(), "{name}: fired while pending");

        let released_at = Instant::now();
        release_tx.send(()).unwrap();

        let fired_at = rx.recv_timeout(RECV_TIMEOUT).unwrap();
        assert!(fired_at >= released_at, "{name}");
        assert!(adapter.is_completed(), "{name}");
    }
}

#[test]
fn test_callback_then_block_both_observe_failure_settlement() {
    let rt = host_runtime();

    for (name, options) in strategies(&rt) {
        let (tx, rx) = mpsc::channel();
        let original = failure(RowCountMismatch {
            expected: 1,
            found: 0,
        });

        let mut adapter = adapter_for(delayed(&rt, Err(Arc::clone(&original))), &options);
        adapter.on_completed(Some(Box::new(move || tx.send(()).unwrap())));

        let err = adapter.block_until_completed().unwrap_err();
        assert!(Arc::ptr_eq(&err, &original), "{name}");
        rx.recv_timeout(RECV_TIMEOUT).unwrap();
    }
}

// ============================================================================
// Strategy specifics
// ============================================================================

#[test]
fn test_native_resumes_original_panic() {
    let rt = host_runtime();
    let adapter = adapter_for(
        rt.spawn(async {
            panic!("fixture setup exploded");
        }),
        &AdapterOptions::default(),
    );

    let payload = panic::catch_unwind(AssertUnwindSafe(|| adapter.block_until_completed()))
        .unwrap_err();

    assert_eq!(
        payload.downcast_ref::<&str>().copied(),
        Some("fixture setup exploded")
    );
}

#[test]
fn test_legacy_surfaces_multiple_failures_as_aggregate() {
    let rt = host_runtime();
    let scheduler = scheduler(&rt);

    let first: Failure = failure(RowCountMismatch {
        expected: 1,
        found: 0,
    });
    let second: Failure = failure(RowCountMismatch {
        expected: 2,
        found: 0,
    });

    let task = SharedTask::join_all(
        vec![
            delayed(&rt, Err(Arc::clone(&first))),
            delayed(&rt, Err(Arc::clone(&second))),
        ],
        scheduler.as_ref(),
    );

    let options = AdapterOptions::default().with_scheduler(scheduler);
    let err = adapter_for(task, &options).block_until_completed().unwrap_err();

    let aggregate = err.downcast_ref::<AggregateFailure>().unwrap();
    assert_eq!(aggregate.len(), 2);
    assert!(Arc::ptr_eq(&aggregate.failures()[0], &first));
    assert!(Arc::ptr_eq(&aggregate.failures()[1], &second));
}

#[test]
fn test_legacy_unwraps_single_failure_from_join_all() {
    let rt = host_runtime();
    let scheduler = scheduler(&rt);
    let only: Failure = failure(RowCountMismatch {
        expected: 5,
        found: 4,
    });

    let task = SharedTask::join_all(
        vec![delayed(&rt, Ok(())), delayed(&rt, Err(Arc::clone(&only)))],
        scheduler.as_ref(),
    );

    let options = AdapterOptions::default().with_scheduler(scheduler);
    let err = adapter_for(task, &options).block_until_completed().unwrap_err();

    assert!(Arc::ptr_eq(&err, &only));
    assert!(err.downcast_ref::<AggregateFailure>().is_none());
}

#[test]
fn test_legacy_continuation_on_thread_pool() {
    let rt = host_runtime();
    let pool: Arc<dyn ContinuationScheduler> = Arc::new(ThreadPoolScheduler::new(
        futures::executor::ThreadPool::new().unwrap(),
    ));

    let options = AdapterOptions::default()
        .with_strategy(StrategyPreference::Legacy)
        .with_scheduler(pool);

    let (tx, rx) = mpsc::channel();
    let mut adapter = adapter_for(delayed(&rt, Ok(())), &options);
    adapter.on_completed(Some(Box::new(move || {
        tx.send(thread::current().id()).unwrap();
    })));

    let continuation_thread = rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_ne!(continuation_thread, thread::current().id());
    assert!(adapter.block_until_completed().is_ok());
}

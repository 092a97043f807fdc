//! Tests for the series/io toggle and sequential execution

use async_af::{array, wrap, Function, Policy, Value};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Sleeps `n * 100ms`, then records `n`.
fn sleepy_recorder(log: &Arc<Mutex<Vec<f64>>>) -> Function {
    let log = log.clone();
    Function::from_async(move |call| {
        let log = log.clone();
        async move {
            let n = call.arg(0).to_number();
            sleep(Duration::from_millis(n as u64 * 100)).await;
            log.lock().push(n);
            Ok(Value::from(n))
        }
    })
}

fn is_even_recording(log: &Arc<Mutex<Vec<f64>>>) -> Function {
    let log = log.clone();
    Function::from_async(move |call| {
        let log = log.clone();
        async move {
            let n = call.arg(0).to_number();
            sleep(Duration::from_millis(10)).await;
            log.lock().push(n);
            Ok(Value::from(n % 2.0 == 0.0))
        }
    })
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callbacks_finish_by_duration() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let start = Instant::now();

    let out = wrap(vec![3, 2, 1]).for_each_af(sleepy_recorder(&log)).await;

    assert!(out.is_ok());
    assert_eq!(*log.lock(), vec![1.0, 2.0, 3.0]);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(300) && elapsed < Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_series_callbacks_run_in_index_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let start = Instant::now();

    let out = wrap(vec![3, 2, 1]).series().for_each_af(sleepy_recorder(&log)).await;

    assert!(out.is_ok());
    assert_eq!(*log.lock(), vec![3.0, 2.0, 1.0]);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(600) && elapsed < Duration::from_millis(700));
}

#[tokio::test(start_paused = true)]
async fn test_io_is_an_alias_for_series() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let out = wrap(vec![2, 1]).io().map_af(sleepy_recorder(&log)).await;

    assert_eq!(out.ok(), Some(Value::from(vec![2, 1])));
    assert_eq!(*log.lock(), vec![2.0, 1.0]);
}

#[test]
fn test_toggle_flips_and_is_consumed() {
    let wrapper = wrap(vec![1]);
    assert!(!wrapper.in_series());
    assert_eq!(wrapper.policy(), Policy::Concurrent);

    let toggled = wrapper.series();
    assert!(toggled.in_series());
    assert_eq!(toggled.policy(), Policy::Sequential);
    assert!(!toggled.clone().series().in_series());

    let identity = Function::new(|call| Ok(call.arg(0).clone()));
    let next = toggled.map_af(identity);
    assert!(!next.in_series());
}

#[tokio::test(start_paused = true)]
async fn test_toggle_applies_to_one_call_only() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let identity = Function::new(|call| Ok(call.arg(0).clone()));

    let out = wrap(vec![3, 2, 1])
        .series()
        .map_af(identity)
        .for_each_af(sleepy_recorder(&log))
        .await;

    assert!(out.is_ok());
    assert_eq!(*log.lock(), vec![1.0, 2.0, 3.0]);
}

#[tokio::test(start_paused = true)]
async fn test_series_find_short_circuits() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let out = wrap(vec![1, 2, 3, 4]).series().find_af(is_even_recording(&log)).await;

    assert_eq!(out.ok(), Some(Value::from(2)));
    assert_eq!(*log.lock(), vec![1.0, 2.0]);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_find_evaluates_everything() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let out = wrap(vec![1, 2, 3, 4]).find_af(is_even_recording(&log)).await;

    assert_eq!(out.ok(), Some(Value::from(2)));
    assert_eq!(log.lock().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_series_every_and_some_stop_early() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let out = wrap(vec![2, 3, 4]).series().every_af(is_even_recording(&log)).await;
    assert_eq!(out.ok(), Some(Value::Bool(false)));
    assert_eq!(*log.lock(), vec![2.0, 3.0]);

    let log = Arc::new(Mutex::new(Vec::new()));
    let out = wrap(vec![1, 4, 5]).series().some_af(is_even_recording(&log)).await;
    assert_eq!(out.ok(), Some(Value::Bool(true)));
    assert_eq!(*log.lock(), vec![1.0, 4.0]);
}

#[tokio::test(start_paused = true)]
async fn test_series_find_index_skips_nothing_before_match() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let out = wrap(array![1, _, 4]).series().find_index_af(is_even_recording(&log)).await;

    assert_eq!(out.ok(), Some(Value::from(2)));
    assert_eq!(log.lock().len(), 3);
}

#[tokio::test]
async fn test_series_callback_sees_pending_look_ahead() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = {
        let seen = seen.clone();
        Function::new(move |call| {
            let array = call.arg(2).as_array().cloned().unwrap_or_default();
            let pending: Vec<bool> = array.iter().map(|slot| slot.as_ref().is_some_and(Value::is_pending)).collect();
            seen.lock().push(pending);
            Ok(Value::Undefined)
        })
    };
    let source = vec![
        Value::promise(async { Ok(Value::from(1)) }),
        Value::promise(async { Ok(Value::from(2)) }),
    ];

    let out = wrap(source.clone()).series().for_each_af(record.clone()).await;
    assert!(out.is_ok());
    assert_eq!(*seen.lock(), vec![vec![false, true], vec![false, false]]);

    seen.lock().clear();
    let out = wrap(source).for_each_af(record).await;
    assert!(out.is_ok());
    assert_eq!(*seen.lock(), vec![vec![false, false], vec![false, false]]);
}

#[tokio::test(start_paused = true)]
async fn test_series_reduce_settles_elements_in_turn() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let element = |n: i32, ms: u64| {
        let order = order.clone();
        Value::promise(async move {
            sleep(Duration::from_millis(ms)).await;
            order.lock().push(n);
            Ok(Value::from(n))
        })
    };
    let source = vec![element(1, 30), element(2, 20), element(3, 10)];
    let sum = Function::new(|call| Ok(Value::from(call.arg(0).to_number() + call.arg(1).to_number())));

    let out = wrap(source).series().reduce_af(sum, None).await;
    assert_eq!(out.ok(), Some(Value::from(6)));
    assert_eq!(*order.lock(), vec![1, 2, 3]);
}

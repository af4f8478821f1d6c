use std::panic::{catch_unwind, AssertUnwindSafe};

use emberlink_altstack::{AltStack, AltStackError, StackProxy, MIN_CAPACITY};

/// Burn stack with a chain of non-inlined frames. The pad is black-boxed so
/// each frame really occupies memory.
#[inline(never)]
fn burn(depth: usize) -> usize {
    let mut pad = [0u8; 256];
    std::hint::black_box(&mut pad);
    if depth == 0 {
        pad[0] as usize
    } else {
        burn(depth - 1) + 1
    }
}

#[test]
fn undersized_region_is_rejected_at_init() {
    match AltStack::new(64) {
        Err(AltStackError::CapacityTooSmall { capacity, min }) => {
            assert_eq!(capacity, 64);
            assert_eq!(min, MIN_CAPACITY);
        }
        Ok(_) => panic!("64-byte region must be rejected"),
        Err(other) => panic!("expected CapacityTooSmall, got {other:?}"),
    }
}

#[test]
fn proxied_call_returns_its_value() {
    let mut stack = AltStack::new(64 * 1024).unwrap();
    assert_eq!(stack.run(|| 2 + 2).unwrap(), 4);
}

#[test]
fn proxied_call_runs_inside_the_region() {
    let mut stack = AltStack::new(64 * 1024).unwrap();
    let span = stack.region_span();
    let probe_addr = stack
        .run(|| {
            let probe = 0u8;
            std::hint::black_box(&probe as *const u8 as usize)
        })
        .unwrap();
    assert!(
        span.contains(&probe_addr),
        "frame at {probe_addr:#x} outside {span:?}"
    );
}

#[test]
fn usage_grows_with_depth_and_peak_dominates() {
    let mut stack = AltStack::new(64 * 1024).unwrap();
    assert_eq!(stack.usage().unwrap(), 0);

    stack.run(|| burn(4)).unwrap();
    let shallow = stack.usage().unwrap();
    assert!(shallow > 0);

    stack.run(|| burn(40)).unwrap();
    let deep = stack.usage().unwrap();
    assert!(deep > shallow, "deep={deep} shallow={shallow}");

    let peak = stack.peak().unwrap();
    assert!(peak >= deep);
    assert!(peak <= stack.capacity());
}

#[test]
fn usage_is_monotonic_across_shallower_calls() {
    let mut stack = AltStack::new(64 * 1024).unwrap();
    stack.run(|| burn(40)).unwrap();
    let after_deep = stack.usage().unwrap();
    stack.run(|| burn(2)).unwrap();
    // The canary is consumed, not restored: a later shallow call cannot
    // lower the reading.
    assert!(stack.usage().unwrap() >= after_deep);
}

#[test]
fn guards_survive_a_deep_workload() {
    let mut stack = AltStack::new(512 * 1024).unwrap();
    stack.run(|| burn(200)).unwrap();
    assert!(stack.stats().is_ok());
}

#[test]
fn panic_propagates_after_the_primary_stack_is_restored() {
    let mut stack = AltStack::new(512 * 1024).unwrap();
    let caught = catch_unwind(AssertUnwindSafe(|| {
        let _ = stack.run(|| -> usize { panic!("boom") });
    }))
    .expect_err("panic should propagate");
    assert_eq!(caught.downcast_ref::<&str>(), Some(&"boom"));

    // The proxy stays usable after an unwound call.
    assert_eq!(stack.run(|| 7).unwrap(), 7);
    assert!(stack.usage().unwrap() > 0);
}

#[test]
fn proxy_lifecycle_reports_not_initialized() {
    let mut proxy = StackProxy::new();
    assert_eq!(proxy.usage(), Err(AltStackError::NotInitialized));
    assert_eq!(
        proxy.run(|| 1).unwrap_err(),
        AltStackError::NotInitialized
    );

    proxy.init(64 * 1024).unwrap();
    assert!(proxy.is_initialized());
    assert_eq!(proxy.run(|| 21 * 2).unwrap(), 42);
    assert!(proxy.stats().unwrap().peak > 0);

    proxy.deinit().unwrap();
    assert_eq!(proxy.usage(), Err(AltStackError::NotInitialized));
    assert_eq!(proxy.deinit(), Err(AltStackError::NotInitialized));
}

#[test]
fn reinit_resets_the_counters() {
    let mut proxy = StackProxy::new();
    proxy.init(64 * 1024).unwrap();
    proxy.run(|| burn(20)).unwrap();
    assert!(proxy.peak().unwrap() > 0);

    proxy.init(64 * 1024).unwrap();
    assert_eq!(proxy.usage().unwrap(), 0);
    assert_eq!(proxy.peak().unwrap(), 0);
}

#[test]
fn closures_can_borrow_from_the_caller() {
    let mut stack = AltStack::new(64 * 1024).unwrap();
    let mut tally = 0usize;
    stack.run(|| tally += burn(8)).unwrap();
    assert!(tally > 0);
}

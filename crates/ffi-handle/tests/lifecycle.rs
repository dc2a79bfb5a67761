//! Lifecycle tests driving the exported C functions the way a foreign
//! caller would.

use std::thread;

use ffi_handle::{
    create_dog, destroy_dog, dog_clear_error, dog_ctor, dog_dctor, dog_distance, dog_last_error,
    dog_run, get_dog_distance, run_dog, HandleError, HandleErrorCode,
};
use pretty_assertions::assert_eq;

#[test]
fn query_after_create_is_zero() {
    let dog = dog_ctor();
    assert_eq!(dog_distance(dog), 0);
    dog_dctor(dog);
}

#[test]
fn query_returns_sum_of_increments() {
    let amounts = [3, -7, 12, 0, 1_000, -999, 42];
    let dog = dog_ctor();
    for amount in amounts {
        dog_run(dog, amount);
    }
    assert_eq!(dog_distance(dog), amounts.iter().sum::<i32>());
    dog_dctor(dog);
}

#[test]
fn run_five_back_two() {
    let dog = dog_ctor();
    dog_run(dog, 5);
    dog_run(dog, -2);
    assert_eq!(dog_distance(dog), 3);
    dog_dctor(dog);
}

#[test]
fn handles_are_independent() {
    let a = dog_ctor();
    let b = dog_ctor();
    dog_run(a, 10);
    dog_run(b, -4);

    assert_eq!(dog_distance(a), 10);
    assert_eq!(dog_distance(b), -4);

    dog_dctor(a);
    assert_eq!(dog_distance(b), -4);
    dog_dctor(b);
}

#[test]
fn every_operation_after_destroy_is_rejected() {
    let dog = create_dog().unwrap();
    let raw = dog.as_raw();
    destroy_dog(raw).unwrap();

    assert_eq!(run_dog(raw, 1), Err(HandleError::invalid(raw)));
    assert_eq!(get_dog_distance(raw), Err(HandleError::invalid(raw)));
    assert_eq!(destroy_dog(raw), Err(HandleError::invalid(raw)));

    dog_clear_error();
    dog_run(raw, 1);
    assert_eq!(
        HandleErrorCode::from_raw(dog_last_error()),
        HandleErrorCode::InvalidHandle
    );
}

#[test]
fn concurrent_runs_on_one_handle() {
    let dog = dog_ctor();

    let workers: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(move || {
                for _ in 0..1_000 {
                    dog_run(dog, 1);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(dog_distance(dog), 8_000);
    dog_dctor(dog);
}

#[test]
fn last_error_is_per_thread() {
    dog_run(0, 1);
    assert_eq!(dog_last_error(), HandleErrorCode::NullHandle.as_raw());

    let other = thread::spawn(|| dog_last_error()).join().unwrap();
    assert_eq!(other, 0);
    dog_clear_error();
}

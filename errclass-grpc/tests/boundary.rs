//! End-to-end: compose errors on one side, translate them at the boundary

use errclass::{join, kind_of, wrap, Error, ErrorKind, SharedError};
use errclass_grpc::{from_status, status_of, to_status};
use std::sync::Arc;
use tonic::{Code, Status};

fn status(err: &SharedError) -> &Status {
    err.downcast_ref::<Status>().expect("error should be a status")
}

#[test]
fn test_single_member_join_translates() {
    let err = join([None, Some(Error::not_found("x").into_shared()), None]);
    let err = err.unwrap();
    assert!(err.is::<errclass::Wrapped>());

    let translated = to_status(err).unwrap();
    assert_eq!(status(&translated).code(), Code::NotFound);
    assert!(status(&translated).message().contains('x'));
}

#[test]
fn test_sibling_kinds_resolve_by_priority() {
    let err = join([
        Error::conflict("a").into_shared(),
        Error::data_loss("b").into_shared(),
    ])
    .unwrap();

    assert_eq!(err.to_string(), "a\nb");
    // walk order finds the first member
    assert_eq!(kind_of(&*err), Some(ErrorKind::Conflict));

    let translated = to_status(err).unwrap();
    assert_eq!(status(&translated).code(), Code::FailedPrecondition);
    assert_eq!(status(&translated).message(), "a\nb");

    // member order does not change the outcome
    let err = join([
        Error::data_loss("b").into_shared(),
        Error::conflict("a").into_shared(),
    ])
    .unwrap();
    assert_eq!(kind_of(&*err), Some(ErrorKind::DataLoss));
    let translated = to_status(err).unwrap();
    assert_eq!(status(&translated).code(), Code::FailedPrecondition);
}

#[test]
fn test_conflict_and_precondition_share_a_status() {
    let conflict_first = join([
        Error::conflict("lease").into_shared(),
        Error::failed_precondition("state").into_shared(),
    ]);
    let precondition_first = join([
        Error::failed_precondition("state").into_shared(),
        Error::conflict("lease").into_shared(),
    ]);

    let a = to_status(conflict_first).unwrap();
    let b = to_status(precondition_first).unwrap();
    assert_eq!(status(&a).code(), status(&b).code());
    assert_eq!(status(&a).code(), Code::FailedPrecondition);
}

#[test]
fn test_wrapped_error_hides_stack_in_status() {
    let err = wrap(Error::already_exists("namespace default").into_shared(), "create").unwrap();
    let translated = to_status(err).unwrap();

    assert_eq!(status(&translated).code(), Code::AlreadyExists);
    assert_eq!(status(&translated).message(), "create: namespace default");
}

#[test]
fn test_translation_is_idempotent_across_hops() {
    let once = to_status(Error::out_of_range("offset 9").into_shared()).unwrap();
    let twice = to_status(once.clone()).unwrap();
    assert!(Arc::ptr_eq(&once, &twice));

    // the receiving side can classify again
    let received = from_status(status(&twice)).unwrap();
    assert_eq!(received.kind(), ErrorKind::OutOfRange);
    assert_eq!(status_of(&received.into_shared()).code(), Code::OutOfRange);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_errors_are_shared_across_tasks() {
    let err = join([
        Error::unavailable("snapshotter").into_shared(),
        errclass::capture(0),
    ])
    .unwrap();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let err = err.clone();
        handles.push(tokio::spawn(async move {
            let translated = to_status(err).unwrap();
            status(&translated).code()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Code::Unavailable);
    }
}

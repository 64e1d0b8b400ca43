//! Integration tests for the fleet controller against real child processes

#![cfg(unix)]

mod common;

use common::{pid_exists, run_with_default_timeout, script_controller, QUICK, SLEEPER};
use fleet_core::{CoreError, FleetController, InvocationPlan, ProcessLauncher, StopTarget};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

fn listed_ids(controller: &FleetController) -> Vec<u32> {
    controller.list().iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn test_list_matches_started_children() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        assert!(controller.list().is_empty());

        let mut started = Vec::new();
        for _ in 0..3 {
            let child = controller.start(SLEEPER).expect("start");
            assert_eq!(child.display_name, "sh");
            started.push(child.id);
        }
        assert_eq!(listed_ids(&controller), started);

        let stopped = controller.stop(StopTarget::Single(started[1]), true).await;
        assert_eq!(stopped.len(), 1);
        assert_eq!(stopped[0].as_ref().unwrap().id, started[1]);
        assert_eq!(listed_ids(&controller), vec![started[0], started[2]]);

        controller.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_stop_without_selector_targets_most_recent() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let ids: Vec<u32> = (0..3)
            .map(|_| controller.start(SLEEPER).expect("start").id)
            .collect();

        let outcome = controller.stop(StopTarget::MostRecent, true).await;
        assert_eq!(outcome[0].as_ref().unwrap().id, ids[2]);
        assert!(!pid_exists(ids[2]));

        let outcome = controller.stop(StopTarget::MostRecent, false).await;
        assert_eq!(outcome[0].as_ref().unwrap().id, ids[1]);
        assert_eq!(listed_ids(&controller), vec![ids[0]]);

        controller.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_stop_twice_reports_not_found() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let keep = controller.start(SLEEPER).expect("start").id;
        let id = controller.start(SLEEPER).expect("start").id;

        let first = controller.stop(StopTarget::Single(id), true).await;
        assert!(first[0].is_ok());

        let second = controller.stop(StopTarget::Single(id), true).await;
        match &second[0] {
            Err(CoreError::ProcessNotFound(missing)) => assert_eq!(*missing, id),
            other => panic!("Expected ProcessNotFound, got: {:?}", other),
        }
        assert_eq!(listed_ids(&controller), vec![keep]);

        controller.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_stop_on_empty_fleet() {
    let (_tmp, controller) = script_controller();
    for target in [
        StopTarget::MostRecent,
        StopTarget::Single(1),
        StopTarget::Many(vec![1, 2]),
    ] {
        let outcome = controller.stop(target, false).await;
        assert_eq!(outcome.len(), 1);
        assert!(matches!(outcome[0], Err(CoreError::NoProcesses)));
    }
}

#[tokio::test]
async fn test_failed_start_registers_nothing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let launcher = ProcessLauncher::with_plan(tmp.path(), InvocationPlan::Direct);
    let controller = FleetController::new(launcher);

    match controller.start("no-such-binary") {
        Err(CoreError::ProcessSpawn(_)) => {}
        other => panic!("Expected ProcessSpawn, got: {:?}", other),
    }
    assert!(controller.is_empty());
}

#[tokio::test]
async fn test_batch_with_already_exited_member() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let a = controller.start(SLEEPER).expect("start a").id;
        let b = controller.start(QUICK).expect("start b").id;
        let c = controller.start(SLEEPER).expect("start c").id;

        // Let `b` finish on its own
        tokio::time::sleep(Duration::from_millis(500)).await;

        let outcomes = controller.stop(StopTarget::Many(vec![a, b, c]), true).await;
        let stopped: BTreeSet<u32> = outcomes
            .iter()
            .map(|o| o.as_ref().expect("every member stops").id)
            .collect();
        assert_eq!(stopped, BTreeSet::from([a, b, c]));
        assert!(controller.is_empty());
        assert!(!pid_exists(a));
        assert!(!pid_exists(c));
    })
    .await;
}

#[tokio::test]
async fn test_batch_skips_unknown_ids() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let a = controller.start(SLEEPER).expect("start").id;
        let b = controller.start(SLEEPER).expect("start").id;
        let unknown = 4_000_000;

        let outcomes = controller
            .stop(StopTarget::Many(vec![unknown, a]), false)
            .await;
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], Err(CoreError::ProcessNotFound(id)) if id == unknown));
        assert_eq!(outcomes[1].as_ref().unwrap().id, a);
        assert_eq!(listed_ids(&controller), vec![b]);

        controller.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_shutdown_waits_for_every_child() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let ids: Vec<u32> = (0..5)
            .map(|_| controller.start(SLEEPER).expect("start").id)
            .collect();

        let outcomes = controller.shutdown().await;
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes.iter().all(|o| o.is_ok()));
        for id in ids {
            assert!(!pid_exists(id), "process {} still exists after shutdown", id);
        }
    })
    .await;
}

#[tokio::test]
async fn test_shutdown_skips_exited_children() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let live = controller.start(SLEEPER).expect("start").id;
        controller.start(QUICK).expect("start");
        tokio::time::sleep(Duration::from_millis(500)).await;

        let outcomes = controller.shutdown().await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].as_ref().unwrap().id, live);
    })
    .await;
}

#[tokio::test]
async fn test_start_list_stop_round_trip() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let id = controller.start(SLEEPER).expect("start").id;
        assert!(listed_ids(&controller).contains(&id));

        let outcome = controller.stop(StopTarget::Single(id), true).await;
        assert!(outcome[0].is_ok());
        assert!(!listed_ids(&controller).contains(&id));
    })
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_disjoint_batches() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let ids: Vec<u32> = (0..12)
            .map(|_| controller.start(SLEEPER).expect("start").id)
            .collect();
        let controller = Arc::new(controller);

        // Three batches of three ids each, issued at the same time
        let batches: Vec<Vec<u32>> = ids[..9].chunks(3).map(|c| c.to_vec()).collect();
        let tasks: Vec<_> = batches
            .into_iter()
            .map(|batch| {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { controller.stop(StopTarget::Many(batch), true).await })
            })
            .collect();

        for task in tasks {
            let outcomes = task.await.expect("batch task");
            assert_eq!(outcomes.len(), 3);
            assert!(outcomes.iter().all(|o| o.is_ok()), "{:?}", outcomes);
        }

        assert_eq!(listed_ids(&controller), ids[9..].to_vec());

        let controller = Arc::try_unwrap(controller).expect("sole owner");
        controller.shutdown().await;
    })
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_batches_remove_once() {
    run_with_default_timeout(async {
        let (_tmp, controller) = script_controller();
        let id = controller.start(SLEEPER).expect("start").id;
        let controller = Arc::new(controller);

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { controller.stop(StopTarget::Many(vec![id]), true).await })
            })
            .collect();

        let mut removed = 0;
        for task in tasks {
            for outcome in task.await.expect("batch task") {
                match outcome {
                    Ok(child) => {
                        assert_eq!(child.id, id);
                        removed += 1;
                    }
                    Err(CoreError::ProcessNotFound(_)) | Err(CoreError::NoProcesses) => {}
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
        }
        assert_eq!(removed, 1);
        assert!(controller.is_empty());
    })
    .await;
}

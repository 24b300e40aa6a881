//! Integration tests for persisting a layout and restoring it after relaunch

use super::common::{hit_at, TestEnv};
use placekeep::codec::{encode, encode_position, CodecError};
use placekeep::session::EntryFailure;
use placekeep::{
    AppStateStore, Collection, HeadlessScene, HeadlessTracker, Position, ScreenPoint,
    SessionController, SessionState, Transform,
};

fn launch(env: &TestEnv) -> (SessionController, HeadlessTracker, HeadlessScene) {
    let db = env.open();
    let mut tracker = HeadlessTracker::default();
    let mut scene = HeadlessScene::default();
    let (controller, _report) =
        SessionController::start(AppStateStore::new(db.connection()), &mut tracker, &mut scene)
            .expect("Failed to start session");
    (controller, tracker, scene)
}

fn tap(
    controller: &mut SessionController,
    tracker: &mut HeadlessTracker,
    scene: &mut HeadlessScene,
    hit: Transform,
) {
    tracker.set_hit(Some(hit));
    controller
        .handle_touch(ScreenPoint::new(160.0, 240.0), tracker, scene)
        .expect("Touch failed");
}

/// Markers placed in one launch come back in the same order in the next
#[test]
fn test_layout_restored_in_order_after_relaunch() {
    let env = TestEnv::new();
    let hits = [hit_at(0.1, 0.0, -1.0), hit_at(0.2, 0.0, -1.0), hit_at(0.3, 0.0, -1.0)];

    {
        let (mut controller, mut tracker, mut scene) = launch(&env);
        for hit in hits {
            tap(&mut controller, &mut tracker, &mut scene, hit);
        }
    }

    let (controller, tracker, scene) = launch(&env);
    let expected: Vec<Position> = hits.iter().map(Transform::translation).collect();
    assert_eq!(scene.markers(), expected.as_slice());
    assert_eq!(tracker.anchors(), &hits);
    assert_eq!(controller.state().markers().len(), 3);
}

/// Appending after a relaunch extends the restored collection by one
#[test]
fn test_append_after_relaunch_grows_by_one() {
    let env = TestEnv::new();
    {
        let (mut controller, mut tracker, mut scene) = launch(&env);
        tap(&mut controller, &mut tracker, &mut scene, hit_at(1.0, 1.0, 1.0));
    }

    let (mut controller, mut tracker, mut scene) = launch(&env);
    tap(&mut controller, &mut tracker, &mut scene, hit_at(2.0, 2.0, 2.0));

    let db = env.open();
    let markers =
        SessionState::read_collection(&AppStateStore::new(db.connection()), Collection::Markers)
            .unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(
        markers.last(),
        Some(&encode_position(&Position::new(2.0, 2.0, 2.0)))
    );
}

/// A malformed anchor is skipped without stopping the ones after it
#[test]
fn test_malformed_anchor_is_isolated() {
    let env = TestEnv::new();
    let valid_a = hit_at(1.0, 0.0, 0.0);
    let valid_b = hit_at(0.0, 0.0, 1.0);
    let mut malformed = encode(&hit_at(5.0, 5.0, 5.0));
    malformed.remove("m44");

    let db = env.open();
    AppStateStore::new(db.connection())
        .set(
            Collection::Anchors.key(),
            &serde_json::to_string(&[encode(&valid_a), malformed, encode(&valid_b)]).unwrap(),
        )
        .unwrap();

    let mut tracker = HeadlessTracker::default();
    let mut scene = HeadlessScene::default();
    let (_controller, report) =
        SessionController::start(AppStateStore::new(db.connection()), &mut tracker, &mut scene)
            .unwrap();

    assert_eq!(tracker.anchors(), &[valid_a, valid_b]);
    assert_eq!(report.anchors.restored, 2);
    assert_eq!(
        report.anchors.failures,
        vec![EntryFailure {
            index: 1,
            error: CodecError::MissingComponent { key: "m44" },
        }]
    );
}

/// The device ordinal resumes from the last logged viewpoint
#[test]
fn test_device_ordinal_resumes_across_relaunch() {
    let env = TestEnv::new();
    {
        let (mut controller, mut tracker, _) = launch(&env);
        tracker.set_camera(Some(hit_at(0.0, 1.6, 0.0)));
        controller.record_viewpoint(&tracker).unwrap();
        controller.advance_device();
        controller.advance_device();
        controller.record_viewpoint(&tracker).unwrap();
    }

    let (controller, _, _) = launch(&env);
    assert_eq!(controller.device(), 3);

    let devices: Vec<u32> = controller
        .viewpoint_log()
        .into_iter()
        .map(|entry| entry.unwrap().device)
        .collect();
    assert_eq!(devices, vec![1, 3]);
}

/// Reset survives relaunch: nothing is reconstructed afterwards
#[test]
fn test_reset_is_durable() {
    let env = TestEnv::new();
    {
        let (mut controller, mut tracker, mut scene) = launch(&env);
        tap(&mut controller, &mut tracker, &mut scene, hit_at(1.0, 2.0, 3.0));
        tracker.set_camera(Some(Transform::identity()));
        controller.record_viewpoint(&tracker).unwrap();
        controller.reset_all().unwrap();
    }

    let (controller, tracker, scene) = launch(&env);
    assert!(scene.markers().is_empty());
    assert!(tracker.anchors().is_empty());
    for collection in Collection::ALL {
        assert!(controller.state().entries(collection).is_empty());
    }
    assert_eq!(controller.device(), 1);
}

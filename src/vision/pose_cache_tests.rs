use super::*;
use std::{sync::Arc, thread};

#[test]
fn when_creating_a_cache_it_should_not_have_a_pose() {
    let cache = PoseCache::new();

    assert_eq!(cache.state(), PoseState::NotYetObserved);
    assert_eq!(cache.snapshot(), None);
    assert_eq!(cache.generation(), 0);
}

#[test]
fn when_updating_with_a_pose_it_should_return_that_pose() {
    let cache = PoseCache::new();
    let pose = Pose::planar(0.5, 1.5, 0.1);

    cache.update(Some(pose));

    assert_eq!(cache.snapshot(), Some(pose));
    assert_eq!(cache.generation(), 1);
}

#[test]
fn when_updating_with_none_it_should_be_unavailable() {
    let cache = PoseCache::new();
    cache.update(Some(Pose::planar(0.5, 1.5, 0.1)));

    cache.update(None);

    assert_eq!(cache.state(), PoseState::Unavailable);
    assert_eq!(cache.snapshot(), None);
    assert_eq!(cache.generation(), 2);
}

#[test]
fn when_updating_at_a_time_it_should_record_the_observation_time() {
    let cache = PoseCache::new();
    let pose = Pose::planar(0.0, 1.0, 0.0);
    let observed_at = Instant::now();

    cache.update_at(Some(pose), observed_at);

    assert_eq!(cache.state(), PoseState::LastKnown { pose, observed_at });
}

#[test]
fn when_the_pose_is_older_than_the_maximum_age_it_should_not_be_returned() {
    let cache = PoseCache::new();
    let pose = Pose::planar(0.0, 1.0, 0.0);
    let observed_at = Instant::now();
    cache.update_at(Some(pose), observed_at);

    let max_age = Duration::from_millis(100);
    assert_eq!(cache.snapshot_within(max_age, observed_at), Some(pose));
    assert_eq!(
        cache.snapshot_within(max_age, observed_at + Duration::from_millis(100)),
        Some(pose)
    );
    assert_eq!(
        cache.snapshot_within(max_age, observed_at + Duration::from_millis(101)),
        None
    );
}

#[test]
fn when_no_pose_was_observed_a_fresh_snapshot_should_be_none() {
    let cache = PoseCache::new();
    assert_eq!(
        cache.snapshot_within(Duration::from_secs(10), Instant::now()),
        None
    );
}

#[test]
fn when_many_threads_write_concurrently_it_should_hold_one_of_the_written_poses() {
    let cache = Arc::new(PoseCache::new());
    let writer_count = 8;
    let writes_per_thread = 1000;

    let handles: Vec<_> = (0..writer_count)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..writes_per_thread {
                    // Every component carries the same marker so a torn write would show up
                    // as a pose with mixed markers.
                    let marker = (t * writes_per_thread + i) as f64;
                    cache.update(Some(Pose::new(marker, marker, marker, marker, marker, marker)));

                    if let Some(pose) = cache.snapshot() {
                        let m = pose.x();
                        assert_eq!(pose, Pose::new(m, m, m, m, m, m));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let pose = cache.snapshot().unwrap();
    let m = pose.x();
    assert_eq!(pose, Pose::new(m, m, m, m, m, m));
    assert!(m >= 0.0 && m < (writer_count * writes_per_thread) as f64);
    assert_eq!(m.fract(), 0.0);
    assert_eq!(cache.generation(), (writer_count * writes_per_thread) as u64);
}

#[test]
fn when_reading_the_state_with_the_generation_it_should_match_the_last_update() {
    let cache = PoseCache::new();
    assert_eq!(cache.state_with_generation(), (PoseState::NotYetObserved, 0));

    let pose = Pose::planar(0.0, 1.0, 0.0);
    let observed_at = Instant::now();
    cache.update_at(Some(pose), observed_at);
    cache.update_at(Some(pose), observed_at);

    assert_eq!(
        cache.state_with_generation(),
        (PoseState::LastKnown { pose, observed_at }, 2)
    );
}

#[test]
fn when_asking_a_state_for_a_recent_pose_it_should_apply_the_maximum_age() {
    let pose = Pose::planar(0.0, 1.0, 0.0);
    let observed_at = Instant::now();
    let state = PoseState::LastKnown { pose, observed_at };
    let max_age = Duration::from_millis(50);

    assert_eq!(state.pose_within(max_age, observed_at + Duration::from_millis(50)), Some(pose));
    assert_eq!(state.pose_within(max_age, observed_at + Duration::from_millis(51)), None);
    assert_eq!(PoseState::Unavailable.pose_within(max_age, observed_at), None);
}

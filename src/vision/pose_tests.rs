use super::*;

#[test]
fn test_new_pose() {
    let pose = Pose::new(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);

    assert_eq!(pose.x(), 1.0);
    assert_eq!(pose.y(), 2.0);
    assert_eq!(pose.z(), 3.0);
    assert_eq!(pose.roll(), 0.1);
    assert_eq!(pose.pitch(), 0.2);
    assert_eq!(pose.yaw(), 0.3);
    assert_eq!(pose.translation(), &Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn when_creating_a_planar_pose_it_should_zero_the_unused_components() {
    let pose = Pose::planar(1.0, 2.0, 0.5);

    assert_eq!(pose, Pose::new(1.0, 0.0, 2.0, 0.0, 0.0, 0.5));
}

#[test]
fn when_creating_a_pose_with_finite_values_it_should_succeed() {
    let result = Pose::try_new(0.5, -0.1, 2.0, 0.0, 0.0, -0.3);
    assert!(result.is_ok());
}

#[test]
fn when_creating_a_pose_with_a_nan_it_should_fail() {
    let result = Pose::try_new(0.5, -0.1, f64::NAN, 0.0, 0.0, -0.3);
    assert!(matches!(result, Err(Error::NonFinitePose)));

    let result = Pose::try_new(0.5, -0.1, 1.0, 0.0, 0.0, f64::INFINITY);
    assert!(matches!(result, Err(Error::NonFinitePose)));
}

#[test]
fn when_a_component_is_not_finite_the_pose_should_not_be_finite() {
    assert!(Pose::planar(1.0, 1.0, 0.0).is_finite());
    assert!(!Pose::new(1.0, f64::NEG_INFINITY, 1.0, 0.0, 0.0, 0.0).is_finite());
    assert!(!Pose::new(1.0, 0.0, 1.0, f64::NAN, 0.0, 0.0).is_finite());
}

#[test]
fn when_displaying_a_pose_it_should_write_out_all_components() {
    let pose = Pose::new(1.0, 0.0, 2.5, 0.0, 0.0, -0.5);
    assert_eq!(
        format!("{}", pose),
        "Pose [x: 1.000, y: 0.000, z: 2.500, roll: 0.000, pitch: 0.000, yaw: -0.500]"
    );
}

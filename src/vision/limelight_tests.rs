use super::*;
use float_cmp::{ApproxEq, F64Margin};

const EMPTY_RESULTS: &str = r#"
{
    "Classifier": [],
    "Detector": [],
    "Fiducial": [],
    "Retro": [],
    "pID": 0,
    "tl": 19.78130340576172,
    "ts": 3284447.910569,
    "v": 1
}
"#;

const TARGET_RESULTS: &str = r#"
{
    "Classifier": [],
    "Detector": [],
    "Fiducial": [
        {
            "fID": 2,
            "fam": "16H5C",
            "pts": [],
            "skew": [],
            "t6c_ts": [0.33247368976801916, -0.05672695778305914, -2.5042031405987144, -4.680849607956358, -5.171154989721864, 4.528697946312339],
            "t6r_fs": [4.738896418276903, -1.5926603672041666, 0.5194469577830592, 4.522658587661256, 4.258580454853879, 5.5236539893713275],
            "t6t_rs": [-0.09991902572799474, -0.1234042720218289, 2.5218203039582496, 4.278368708252767, 5.508508005282244, -4.1112864453027775],
            "ta": 0.005711808800697327,
            "tx": -2.0525293350219727,
            "ty": 2.7294836044311523
        }
    ],
    "Retro": [],
    "pID": 0,
    "tl": 19.78130340576172,
    "ts": 3284447.910569,
    "v": 1
}
"#;

struct CannedFetcher {
    response: Option<Result<Option<String>, String>>,
    timeouts: Vec<Duration>,
}

impl CannedFetcher {
    fn returning(body: Option<&str>) -> Self {
        Self {
            response: Some(Ok(body.map(|b| b.to_string()))),
            timeouts: Vec::new(),
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            response: Some(Err(reason.to_string())),
            timeouts: Vec::new(),
        }
    }
}

impl ResultsFetcher for CannedFetcher {
    fn fetch_results(&mut self, timeout: Duration) -> Result<Option<String>, Error> {
        self.timeouts.push(timeout);
        match &self.response {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => Err(Error::FetchFailed {
                reason: reason.clone(),
            }),
            None => Ok(None),
        }
    }
}

fn margin() -> F64Margin {
    F64Margin {
        ulps: 2,
        epsilon: 1e-12,
    }
}

#[test]
fn when_decoding_results_without_targets_it_should_return_none() {
    assert!(decode_results(EMPTY_RESULTS).unwrap().is_none());
}

#[test]
fn when_decoding_results_without_a_fiducial_list_it_should_return_none() {
    assert!(decode_results(r#"{ "v": 0 }"#).unwrap().is_none());
}

#[test]
fn when_decoding_results_with_a_target_it_should_return_the_robot_space_pose() {
    let pose = decode_results(TARGET_RESULTS).unwrap().unwrap();

    assert!(pose.x().approx_eq(-0.09991902572799474, margin()));
    assert!(pose.y().approx_eq(-0.1234042720218289, margin()));
    assert!(pose.z().approx_eq(2.5218203039582496, margin()));
    assert!(pose.pitch().approx_eq(4.278368708252767_f64.to_radians(), margin()));
    assert!(pose.yaw().approx_eq(5.508508005282244_f64.to_radians(), margin()));
    assert!(pose.roll().approx_eq((-4.1112864453027775_f64).to_radians(), margin()));
}

#[test]
fn when_decoding_results_with_several_targets_it_should_use_the_first() {
    let json = r#"{ "Fiducial": [
        { "fID": 7, "t6t_rs": [0.5, 0.0, 1.0, 0.0, 0.0, 0.0] },
        { "fID": 8, "t6t_rs": [-0.5, 0.0, 3.0, 0.0, 0.0, 0.0] }
    ] }"#;

    let pose = decode_results(json).unwrap().unwrap();

    assert_eq!(pose.x(), 0.5);
    assert_eq!(pose.z(), 1.0);
}

#[test]
fn when_decoding_invalid_json_it_should_fail() {
    let result = decode_results("not json");

    assert!(matches!(result, Err(Error::MalformedPayload { .. })));
}

#[test]
fn when_decoding_a_short_pose_array_it_should_fail() {
    let result = decode_results(r#"{ "Fiducial": [ { "fID": 2, "t6t_rs": [0.1, 0.2, 0.3] } ] }"#);

    match result {
        Err(Error::MalformedPayload { reason }) => assert!(reason.contains("found 3")),
        other => panic!("Expected a malformed payload error, got {:?}", other),
    }
}

#[test]
fn when_decoding_a_pose_with_the_wrong_types_it_should_fail() {
    let result = decode_results(r#"{ "Fiducial": [ { "t6t_rs": ["a", 0, 0, 0, 0, 0] } ] }"#);

    assert!(matches!(result, Err(Error::MalformedPayload { .. })));
}

// LimelightSource

#[test]
fn when_fetching_from_the_camera_it_should_decode_the_payload() {
    let mut source = LimelightSource::new(
        CannedFetcher::returning(Some(TARGET_RESULTS)),
        Duration::from_millis(500),
    );

    let pose = source.fetch().unwrap().unwrap();

    assert!(pose.x().approx_eq(-0.09991902572799474, margin()));
    assert_eq!(source.fetcher.timeouts, vec![Duration::from_millis(500)]);
    assert_eq!(source.timeout(), Duration::from_millis(500));
}

#[test]
fn when_the_camera_returns_no_body_it_should_return_none() {
    let mut source = LimelightSource::new(CannedFetcher::returning(None), Duration::from_millis(500));

    assert!(source.fetch().unwrap().is_none());
}

#[test]
fn when_the_camera_cannot_be_reached_it_should_fail() {
    let mut source = LimelightSource::new(
        CannedFetcher::failing("connection refused"),
        Duration::from_millis(500),
    );

    assert!(matches!(source.fetch(), Err(Error::FetchFailed { .. })));
}

#[test]
fn when_the_camera_returns_garbage_it_should_fail() {
    let mut source = LimelightSource::new(CannedFetcher::returning(Some("{")), Duration::from_millis(500));

    assert!(matches!(source.fetch(), Err(Error::MalformedPayload { .. })));
}

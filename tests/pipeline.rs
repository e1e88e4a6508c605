use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use swingcoach::bounce::{extend_with_bounce_and_roll, BounceConfig};
use swingcoach::classify::{classify, UNKNOWN_CLUSTER};
use swingcoach::face_model::{compute_cumulative_contributions, FaceBaseline, FacePhases};
use swingcoach::impact::{correct, StrikeCondition};
use swingcoach::trajectory::{initial_velocity, simulate};
use swingcoach::{
    AnalysisError, AnalyzerConfig, ClubType, FaceModelCoefficients, LaunchConditions,
    ReferenceData, SixAxis, SwingAnalyzer, SwingMeasurement, TrajectoryConfig,
};

const FIXTURE: &str = r#"{
    "clusters": [
        {
            "id": 3,
            "name": "wide",
            "clubType": "D",
            "ranges": {
                "estimateCarry": [0, 100],
                "impactHeadSpeed": [20, 30],
                "impactGripSpeed": [2, 4],
                "impactFaceAngle": [-10, -5],
                "impactClubPath": [5, 10],
                "impactAttackAngle": [-10, -5],
                "impactRelativeFaceAngle": [-20, -10]
            }
        },
        {
            "id": 7,
            "name": "fixture",
            "clubType": "D",
            "ranges": {
                "estimateCarry": [200, 240],
                "impactHeadSpeed": [40, 50],
                "impactGripSpeed": [5, 8],
                "impactFaceAngle": [0, 3],
                "impactClubPath": [-3, 0],
                "impactAttackAngle": [0, 5],
                "impactRelativeFaceAngle": [1, 4]
            }
        }
    ]
}"#;

fn launch(carry: f64, attack: f64, impact_y: Option<f64>) -> LaunchConditions {
    LaunchConditions {
        carry_yd: carry,
        attack_deg: attack,
        face_deg: 0.0,
        path_deg: 0.0,
        club: ClubType::Driver,
        loft_deg: None,
        impact_x_cm: None,
        impact_y_cm: impact_y,
    }
}

#[test]
fn swing_inside_every_range_gets_that_cluster() {
    let reference = ReferenceData::from_json_str(FIXTURE).unwrap();
    let swing = SwingMeasurement {
        estimate_carry: Some(220.0),
        impact_head_speed: Some(45.0),
        impact_grip_speed: Some(6.0),
        impact_face_angle: Some(1.2),
        impact_club_path: Some(-1.0),
        impact_attack_angle: Some(3.0),
        impact_relative_face_angle: Some(2.2),
        ..Default::default()
    };

    let result = classify(&swing, &reference.clusters);
    assert!(result.is_exact());
    assert_eq!(result.cluster_id(), 7);
}

#[test]
fn classification_is_total_for_finite_swings() {
    let reference = ReferenceData::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..500 {
        let swing = SwingMeasurement {
            club_type: if rng.gen_bool(0.5) { ClubType::Driver } else { ClubType::Iron },
            estimate_carry: Some(rng.gen_range(-50.0..500.0)),
            impact_head_speed: Some(rng.gen_range(0.0..70.0)),
            impact_grip_speed: Some(rng.gen_range(0.0..12.0)),
            impact_face_angle: Some(rng.gen_range(-30.0..30.0)),
            impact_club_path: Some(rng.gen_range(-30.0..30.0)),
            impact_attack_angle: Some(rng.gen_range(-20.0..20.0)),
            impact_relative_face_angle: Some(rng.gen_range(-40.0..40.0)),
            ..Default::default()
        };
        let id = classify(&swing, &reference.clusters).cluster_id();
        assert!(id == UNKNOWN_CLUSTER || reference.cluster(id).is_some());
        assert_ne!(id, UNKNOWN_CLUSTER, "all features present, a cluster must be chosen");
    }
}

#[test]
fn negative_carry_is_invalid_input() {
    let result = simulate(&launch(-5.0, 2.0, None), &TrajectoryConfig::default());
    assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));
}

#[test]
fn steep_attack_low_strike_drops_launch_and_carry() {
    let clean = correct(&launch(200.0, 6.0, None)).unwrap();
    let topped = correct(&launch(200.0, 6.0, Some(-2.0))).unwrap();

    assert_eq!(clean.condition, StrikeCondition::Clean);
    assert_eq!(topped.condition, StrikeCondition::Top);
    assert!((topped.launch_deg - (clean.launch_deg - 5.0)).abs() < 1e-9);
    assert!((topped.carry_yd - clean.carry_yd * 0.90).abs() < 1e-9);
}

#[test]
fn heights_never_negative() {
    let config = TrajectoryConfig::default();
    let bounce = BounceConfig::default();

    for carry in [5.0, 60.0, 150.0, 240.0, 330.0, 450.0] {
        for attack in [-12.0, -7.0, 0.0, 4.0, 9.0] {
            for y in [None, Some(-2.5), Some(0.0), Some(2.5)] {
                let cond = LaunchConditions {
                    face_deg: 3.0,
                    path_deg: -6.0,
                    impact_x_cm: Some(1.0),
                    ..launch(carry, attack, y)
                };
                let flight = simulate(&cond, &config).unwrap();
                assert!(flight.points.len() >= 3);
                assert!(flight.points.iter().all(|p| p.y >= 0.0));

                for extreme in [-89.0, attack, 89.0] {
                    let full = extend_with_bounce_and_roll(
                        &flight.points,
                        flight.adjustment.carry_yd,
                        extreme,
                        &bounce,
                    )
                    .unwrap();
                    assert!(full.iter().all(|p| p.y >= 0.0));
                }
            }
        }
    }
}

#[test]
fn launch_speed_grows_with_carry_until_cap() {
    let config = TrajectoryConfig::default();
    let mut previous = 0.0;
    for step in 1..=45 {
        let v0 = initial_velocity(step as f64 * 10.0, 4.0, &config).unwrap();
        if previous < config.max_v0 {
            assert!(v0 > previous, "carry {} did not increase v0", step * 10);
        } else {
            assert_eq!(v0, config.max_v0);
        }
        assert!(v0 <= config.max_v0);
        previous = v0;
    }
    assert_eq!(previous, config.max_v0);
}

#[test]
fn six_axis_scores_stay_in_bounds() {
    let reference = ReferenceData::builtin().unwrap();
    for axis in SixAxis::ALL {
        for club in [ClubType::Driver, ClubType::Iron] {
            for value in [f64::NEG_INFINITY, -1e12, -90.0, 0.0, 90.0, 1e12, f64::INFINITY, f64::NAN] {
                let score = reference.six_axis.score(axis, value, club);
                assert!((0.0..=100.0).contains(&score), "{axis:?} {value} -> {score}");
            }
        }
    }
}

#[test]
fn waterfalls_end_at_measured_face_angles() {
    let coef = FaceModelCoefficients::default();
    let yours = FacePhases {
        closure_angle: 31.7,
        shaft_rotation_delta: 512.3,
        halfway_down_face: 7.9,
        hand_first: -4.1,
        lie_delta: 2.6,
    };
    let baseline = FaceBaseline {
        phases: FacePhases {
            closure_angle: 24.0,
            shaft_rotation_delta: 480.0,
            halfway_down_face: 9.0,
            hand_first: -3.0,
            lie_delta: 1.5,
        },
        impact_face_angle: 0.37,
    };

    let waterfall = compute_cumulative_contributions(&coef, &yours, -1.234567, &baseline);
    assert_eq!(waterfall.yours.last().unwrap().cumulative, -1.234567);
    assert_eq!(waterfall.model.last().unwrap().cumulative, 0.37);
    assert_eq!(waterfall.yours.first().unwrap().cumulative, coef.intercept);
}

#[test]
fn analysis_is_deterministic() {
    let analyzer = SwingAnalyzer::new(
        ReferenceData::builtin().unwrap(),
        AnalyzerConfig {
            bounce: Some(BounceConfig::default()),
            ..Default::default()
        },
    );
    let swing: SwingMeasurement = serde_json::from_str(
        r#"{
            "clubType": "7I",
            "estimateCarry": 150,
            "impactHeadSpeed": 36,
            "impactGripSpeed": 5.1,
            "impactFaceAngle": -1.5,
            "impactClubPath": 2.0,
            "impactAttackAngle": -4.0,
            "impactRelativeFaceAngle": -3.5,
            "impactPointY": 2.4
        }"#,
    )
    .unwrap();

    let a = analyzer.analyze(&swing).unwrap();
    let b = analyzer.analyze(&swing).unwrap();
    assert_eq!(a.club_type, ClubType::Iron);
    assert_eq!(a.flight.adjustment.condition, StrikeCondition::Flyer);
    assert_eq!(a.classification, b.classification);
    assert_eq!(a.flight, b.flight);
    assert_eq!(a.full_path, b.full_path);
}

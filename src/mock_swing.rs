use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::source::SwingSource;
use crate::swing::{ClubType, SwingMeasurement};

/// Mock sensor that produces plausible swings on a background thread.
pub struct MockSwingSource {
    swing_rx: mpsc::Receiver<SwingMeasurement>,
    interval: Duration,
    limit: Option<usize>,
    received: usize,
}

impl MockSwingSource {
    /// `seed` makes the sequence reproducible; `limit` stops after that many.
    pub fn new(interval_secs: f64, seed: Option<u64>, limit: Option<usize>) -> Self {
        let (swing_tx, swing_rx) = mpsc::channel();
        let interval = Duration::from_secs_f64(interval_secs.max(0.0));

        thread::spawn(move || {
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };
            let mut swing_number = 0usize;

            loop {
                if limit.is_some_and(|n| swing_number >= n) {
                    break;
                }
                thread::sleep(interval);
                swing_number += 1;
                log::info!("[MOCK] Simulating swing #{}", swing_number);

                if swing_tx.send(generate_swing(&mut rng, swing_number)).is_err() {
                    break; // Receiver dropped
                }
            }
        });

        Self { swing_rx, interval, limit, received: 0 }
    }
}

/// One synthetic swing. Every 4th is an iron, every 5th a mishit.
pub fn generate_swing(rng: &mut impl Rng, swing_number: usize) -> SwingMeasurement {
    let club = if swing_number % 4 == 0 { ClubType::Iron } else { ClubType::Driver };
    let mishit = swing_number % 5 == 0;

    let (head_speed, carry_per_speed, attack, loft) = match club {
        ClubType::Driver => (
            rng.gen_range(38.0..50.0),
            rng.gen_range(4.6..5.2),
            rng.gen_range(-2.0..5.0),
            rng.gen_range(-8.0..2.0),
        ),
        ClubType::Iron => (
            rng.gen_range(30.0..40.0),
            rng.gen_range(3.8..4.4),
            rng.gen_range(-7.0..-1.0),
            rng.gen_range(6.0..16.0),
        ),
    };

    let face: f64 = rng.gen_range(-4.0..4.0);
    let path: f64 = rng.gen_range(-4.0..3.0);
    let impact_y = if mishit {
        // low or high on the face
        if rng.gen_bool(0.5) { rng.gen_range(-2.8..-1.7) } else { rng.gen_range(2.2..2.8) }
    } else {
        rng.gen_range(-1.2..1.6)
    };

    let address_lie = rng.gen_range(54.0..60.0);
    let sr_min = rng.gen_range(250.0..380.0);
    let hd = rng.gen_range(4.0..18.0);

    SwingMeasurement {
        club_type: club,
        swing_date: Some(chrono::Utc::now().date_naive()),
        estimate_carry: Some(head_speed * carry_per_speed),
        impact_head_speed: Some(head_speed),
        impact_grip_speed: Some(head_speed * rng.gen_range(0.13..0.16)),
        impact_face_angle: Some(face),
        impact_attack_angle: Some(attack),
        impact_loft_angle: Some(loft),
        impact_club_path: Some(path),
        impact_relative_face_angle: Some(face - path),
        impact_point_x: Some(rng.gen_range(-1.5..1.5)),
        impact_point_y: Some(impact_y),
        address_hand_first: Some(rng.gen_range(-2.0..6.0)),
        address_lie_angle: Some(address_lie),
        halfwayback_face_angle_to_vertical: Some(rng.gen_range(-20.0..4.0)),
        top_face_angle_to_horizontal: Some(hd + rng.gen_range(12.0..40.0)),
        halfwaydown_face_angle_to_vertical: Some(hd),
        down_swing_shaft_rotation_max: Some(sr_min + rng.gen_range(300.0..650.0)),
        down_swing_shaft_rotation_min: Some(sr_min),
        impact_hand_first: Some(rng.gen_range(-9.0..2.0)),
        impact_lie_angle: Some(address_lie + rng.gen_range(-1.0..4.5)),
    }
}

impl SwingSource for MockSwingSource {
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_info(&mut self) -> Result<HashMap<String, String>> {
        let mut info = HashMap::new();
        info.insert("Source".to_string(), "SWING-MOCK".to_string());
        info.insert("Mode".to_string(), "Simulation".to_string());
        info.insert(
            "Interval".to_string(),
            format!("{:.1}s", self.interval.as_secs_f64()),
        );
        if let Some(n) = self.limit {
            info.insert("Swings".to_string(), n.to_string());
        }
        Ok(info)
    }

    fn read_swing(&mut self) -> Result<Option<SwingMeasurement>> {
        // Non-blocking read from channel
        match self.swing_rx.try_recv() {
            Ok(swing) => {
                self.received += 1;
                Ok(Some(swing))
            }
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => {
                if self.is_exhausted() {
                    Ok(None)
                } else {
                    Err(anyhow::anyhow!("Mock swing channel disconnected"))
                }
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.limit.is_some_and(|n| self.received >= n)
    }
}

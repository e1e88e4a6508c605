pub mod analysis;
pub mod bounce;
pub mod classify;
pub mod error;
pub mod face_model;
pub mod impact;
pub mod mock_swing;
pub mod monitor;
pub mod reference;
pub mod renderer;
pub mod six_axis;
pub mod source;
pub mod success;
pub mod swing;
pub mod trajectory;

pub use analysis::{AnalyzerConfig, SwingAnalyzer, SwingReport};
pub use bounce::{extend_with_bounce_and_roll, BounceConfig};
pub use classify::{classify, Classification};
pub use error::{AnalysisError, Result};
pub use face_model::{FaceModelCoefficients, FacePhases};
pub use impact::{ImpactAdjustment, LaunchConditions, StrikeCondition};
pub use reference::ReferenceData;
pub use six_axis::{SixAxis, SixAxisStats};
pub use swing::{ClubType, MeasureField, SwingMeasurement};
pub use trajectory::{FlightPath, TrajectoryConfig, TrajectoryPoint};

//! Swing analysis models
//!
//! `SwingInput` is the athlete form collected locally. Everything under
//! `AnalysisReport` is computed by the analysis service and only deserialized here;
//! fields the service leaves out fall back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::video::Video;

/// Bat weight sent when the athlete doesn't provide one (ounces)
pub const DEFAULT_BAT_WEIGHT_OZ: u32 = 30;

/// Maximum number of demo videos the service attaches to each drill
pub const MAX_VIDEOS_PER_DRILL: u32 = 3;

/// Upper bound of the video analysis scores
const MAX_SCORE: u32 = 100;

/// Errors raised when the athlete form is incomplete or out of range
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    /// A ground/engine/weapon score outside 0-100
    #[error("{field} must be between 0 and 100, got {value}")]
    ScoreOutOfRange { field: &'static str, value: u32 },

    /// A measurement that must be a positive number
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// A measurement that must not be negative
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// Age of zero is treated as missing
    #[error("age is required")]
    MissingAge,
}

/// Athlete and swing measurements submitted for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SwingInput {
    /// Ground score from video analysis (0-100)
    pub ground_score: u32,
    /// Engine score from video analysis (0-100)
    pub engine_score: u32,
    /// Weapon score from video analysis (0-100)
    pub weapon_score: u32,
    pub height_inches: f64,
    pub wingspan_inches: Option<f64>,
    pub weight_lbs: f64,
    pub age: u32,
    /// Defaults to 30 oz when absent
    pub bat_weight_oz: Option<u32>,
    pub actual_bat_speed_mph: Option<f64>,
    pub rotation_ke_joules: Option<f64>,
    pub translation_ke_joules: Option<f64>,
}

impl SwingInput {
    /// Built-in sample athlete used to demo the analysis
    pub fn sample() -> Self {
        Self {
            ground_score: 38,
            engine_score: 58,
            weapon_score: 55,
            height_inches: 68.0,
            wingspan_inches: Some(69.0),
            weight_lbs: 190.0,
            age: 33,
            bat_weight_oz: Some(DEFAULT_BAT_WEIGHT_OZ),
            actual_bat_speed_mph: Some(67.0),
            rotation_ke_joules: Some(3743.0),
            translation_ke_joules: Some(421.0),
        }
    }

    /// Checks that required fields are present and every value is in range
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("ground_score", self.ground_score),
            ("engine_score", self.engine_score),
            ("weapon_score", self.weapon_score),
        ] {
            if value > MAX_SCORE {
                return Err(InputError::ScoreOutOfRange { field, value });
            }
        }

        positive("height_inches", self.height_inches)?;
        positive("weight_lbs", self.weight_lbs)?;
        if self.age == 0 {
            return Err(InputError::MissingAge);
        }

        if let Some(wingspan) = self.wingspan_inches {
            positive("wingspan_inches", wingspan)?;
        }
        if self.bat_weight_oz == Some(0) {
            return Err(InputError::NotPositive {
                field: "bat_weight_oz",
                value: 0.0,
            });
        }
        for (field, value) in [
            ("actual_bat_speed_mph", self.actual_bat_speed_mph),
            ("rotation_ke_joules", self.rotation_ke_joules),
            ("translation_ke_joules", self.translation_ke_joules),
        ] {
            if let Some(value) = value {
                non_negative(field, value)?;
            }
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InputError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::Negative { field, value })
    }
}

/// Request body for `POST /analyze/enhanced`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub ground_score: u32,
    pub engine_score: u32,
    pub weapon_score: u32,
    pub height_inches: f64,
    pub wingspan_inches: Option<f64>,
    pub weight_lbs: f64,
    pub age: u32,
    pub bat_weight_oz: u32,
    pub actual_bat_speed_mph: Option<f64>,
    pub rotation_ke_joules: Option<f64>,
    pub translation_ke_joules: Option<f64>,
    pub include_videos: bool,
    pub max_videos_per_drill: u32,
}

impl From<&SwingInput> for AnalysisRequest {
    fn from(input: &SwingInput) -> Self {
        Self {
            ground_score: input.ground_score,
            engine_score: input.engine_score,
            weapon_score: input.weapon_score,
            height_inches: input.height_inches,
            wingspan_inches: input.wingspan_inches,
            weight_lbs: input.weight_lbs,
            age: input.age,
            bat_weight_oz: input.bat_weight_oz.unwrap_or(DEFAULT_BAT_WEIGHT_OZ),
            actual_bat_speed_mph: input.actual_bat_speed_mph,
            rotation_ke_joules: input.rotation_ke_joules,
            translation_ke_joules: input.translation_ke_joules,
            include_videos: true,
            max_videos_per_drill: MAX_VIDEOS_PER_DRILL,
        }
    }
}

/// Wrapper the service puts around a report: `{"status": "success", "data": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Option<AnalysisReport>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Full biomechanics report returned by the analysis service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisReport {
    pub motor_preference: MotorPreferenceResult,
    pub scores_adjusted: AdjustedScores,
    pub capacity: KineticCapacity,
    pub performance: Performance,
    /// Passed through untouched; the service's shape for this section varies
    pub energy_leaks: Value,
    pub correction_plan: CorrectionPlan,
    /// Sections this client doesn't model, kept so `--json` output stays complete
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Motor-preference classes the service assigns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MotorPreference {
    Spinner,
    Glider,
    Launcher,
    /// A class this client doesn't know yet, kept verbatim
    Other(String),
}

impl Default for MotorPreference {
    fn default() -> Self {
        MotorPreference::Other(String::new())
    }
}

impl From<String> for MotorPreference {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "spinner" => MotorPreference::Spinner,
            "glider" => MotorPreference::Glider,
            "launcher" => MotorPreference::Launcher,
            _ => MotorPreference::Other(value),
        }
    }
}

impl From<MotorPreference> for String {
    fn from(value: MotorPreference) -> Self {
        match value {
            MotorPreference::Spinner => "SPINNER".to_string(),
            MotorPreference::Glider => "GLIDER".to_string(),
            MotorPreference::Launcher => "LAUNCHER".to_string(),
            MotorPreference::Other(other) => other,
        }
    }
}

impl fmt::Display for MotorPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorPreference::Spinner => f.write_str("SPINNER"),
            MotorPreference::Glider => f.write_str("GLIDER"),
            MotorPreference::Launcher => f.write_str("LAUNCHER"),
            MotorPreference::Other(other) if other.is_empty() => f.write_str("UNKNOWN"),
            MotorPreference::Other(other) => f.write_str(&other.to_uppercase()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorPreferenceResult {
    pub preference: MotorPreference,
    /// Classifier confidence in 0-1
    pub confidence: f64,
    pub coaching_focus: String,
    pub avoid_coaching: String,
}

/// One score before and after the motor-aware adjustment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreAdjustment {
    pub raw: f64,
    pub adjusted: f64,
    pub adjustment: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustedScores {
    pub ground: ScoreAdjustment,
    pub engine: ScoreAdjustment,
    pub weapon: ScoreAdjustment,
    /// Percentage
    pub overall_efficiency: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatSpeedRange {
    pub min_mph: f64,
    pub max_mph: f64,
    pub midpoint_mph: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticCapacity {
    pub bat_speed_range: BatSpeedRange,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Performance {
    pub predicted_bat_speed_mph: f64,
    pub actual_bat_speed_mph: Option<f64>,
    pub gap_to_capacity_max_mph: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionPlan {
    /// Free-text estimate, e.g. "6-8 weeks"
    pub timeline: String,
    pub issues: Vec<Issue>,
    pub drills: Vec<Drill>,
    pub success_metrics: SuccessMetrics,
}

/// A mechanical issue found in the swing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub name: String,
    /// CRITICAL, HIGH, MEDIUM or LOW
    pub priority: String,
    pub potential_gain_mph: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Drill {
    pub drill_id: String,
    pub drill_name: String,
    pub stage: String,
    pub description: String,
    pub how_it_works: String,
    pub coaching_cues: Vec<String>,
    pub sets_reps: String,
    pub equipment: Vec<String>,
    pub integration_with_tools: Option<String>,
    pub expected_outcome: String,
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessMetrics {
    pub target_ground_score: f64,
    pub target_engine_score: f64,
    pub target_weapon_score: f64,
    pub expected_bat_speed_gain_mph: f64,
}

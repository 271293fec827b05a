//! Wire models for the swing analysis service
//!
//! `analysis` covers the athlete form and the biomechanics report; `video` covers the
//! video library endpoints.

pub mod analysis;
pub mod video;

pub use analysis::{
    AdjustedScores, AnalysisEnvelope, AnalysisReport, AnalysisRequest, BatSpeedRange,
    CorrectionPlan, Drill, InputError, Issue, KineticCapacity, MotorPreference,
    MotorPreferenceResult, Performance, ScoreAdjustment, SuccessMetrics, SwingInput,
};
pub use video::{
    short_stage, CorrectionPlanVideos, DrillStage, TagList, Video, VideoCategory, VideoList,
    VideoQuery,
};

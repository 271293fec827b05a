//! Video library models
//!
//! Mirrors the payloads served under `/videos` by the analysis service, plus the
//! query builder used for `/videos/search`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single video in the library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// Hosting source, e.g. "youtube" or "vimeo"
    pub source: String,
    pub source_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<u32>,
    pub category: String,
    pub tags: Vec<String>,
    /// Drills this video demonstrates
    pub drill_ids: Vec<String>,
    pub drill_stage: Option<String>,
    pub coaching_points: Vec<String>,
    pub equipment: Vec<String>,
    pub view_count: u64,
    pub featured: bool,
}

/// A page of videos together with the server-side total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoList {
    pub total: usize,
    pub videos: Vec<Video>,
}

/// Every distinct tag in the library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagList {
    pub total: usize,
    pub tags: Vec<String>,
}

/// Videos grouped by drill for a whole correction plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionPlanVideos {
    pub drill_ids: Vec<String>,
    pub videos_by_drill: BTreeMap<String, Vec<Video>>,
    pub total_videos: usize,
}

/// Video categories understood by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCategory {
    Drill,
    Technique,
    Concept,
    Assessment,
    Exercise,
    Interview,
    CaseStudy,
}

impl VideoCategory {
    /// Returns a slice containing all category variants.
    pub fn all() -> &'static [VideoCategory] {
        &[
            VideoCategory::Drill,
            VideoCategory::Technique,
            VideoCategory::Concept,
            VideoCategory::Assessment,
            VideoCategory::Exercise,
            VideoCategory::Interview,
            VideoCategory::CaseStudy,
        ]
    }

    /// Wire value sent as the `category` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCategory::Drill => "drill",
            VideoCategory::Technique => "technique",
            VideoCategory::Concept => "concept",
            VideoCategory::Assessment => "assessment",
            VideoCategory::Exercise => "exercise",
            VideoCategory::Interview => "interview",
            VideoCategory::CaseStudy => "case_study",
        }
    }

    /// Parses a category name, accepting `case-study` as well as `case_study`.
    ///
    /// Returns `None` if the input doesn't match any category.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<VideoCategory> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        VideoCategory::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
    }
}

impl fmt::Display for VideoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drill progression stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillStage {
    /// Foundation/Isolation
    Stage1,
    /// Integration/Combination
    Stage2,
    /// Game-Speed Application
    Stage3,
}

impl DrillStage {
    /// Full label, which is also the wire value for the `stage` query parameter
    pub fn label(&self) -> &'static str {
        match self {
            DrillStage::Stage1 => "Stage 1: Foundation/Isolation",
            DrillStage::Stage2 => "Stage 2: Integration/Combination",
            DrillStage::Stage3 => "Stage 3: Game-Speed Application",
        }
    }

    /// Parses `1`, `s1`, `stage1`, `stage 1` or a full label.
    ///
    /// Returns `None` if the input doesn't match any stage.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<DrillStage> {
        let lowered = s.trim().to_lowercase();
        let head = lowered.split(':').next().unwrap_or_default();
        let compact: String = head.chars().filter(|c| !c.is_whitespace()).collect();
        let number = compact
            .strip_prefix("stage")
            .or_else(|| compact.strip_prefix('s'))
            .unwrap_or(compact.as_str());

        match number {
            "1" => Some(DrillStage::Stage1),
            "2" => Some(DrillStage::Stage2),
            "3" => Some(DrillStage::Stage3),
            _ => None,
        }
    }
}

/// Shortens a stage label for compact listings: "Stage 1: Foundation" -> "S1: Foundation"
pub fn short_stage(stage: &str) -> String {
    stage.replacen("Stage ", "S", 1)
}

/// Filters for `/videos/search`; empty filters are left off the query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoQuery {
    /// Free text matched against title and description
    pub text: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<VideoCategory>,
    pub stage: Option<DrillStage>,
    pub featured_only: bool,
}

impl VideoQuery {
    /// Query-string pairs for the search endpoint
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            params.push(("q", text.to_string()));
        }

        let tags: Vec<&str> = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            params.push(("tags", tags.join(",")));
        }

        if let Some(category) = self.category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(stage) = self.stage {
            params.push(("stage", stage.label().to_string()));
        }
        if self.featured_only {
            params.push(("featured_only", "true".to_string()));
        }

        params
    }
}

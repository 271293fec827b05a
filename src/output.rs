//! Plain-text summaries printed by the CLI

use crate::api::DataSource;
use crate::data::{
    short_stage, AnalysisReport, CorrectionPlanVideos, ScoreAdjustment, TagList, Video, VideoList,
};

/// Formats seconds as `m:ss`
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Formats a score adjustment with an explicit sign: `+7`, `-2`, `0`
pub fn format_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", value)
    } else {
        format!("{}", value)
    }
}

/// One line telling the user the data came from the cache, if it did
pub fn source_note(source: &DataSource) -> Option<String> {
    match source {
        DataSource::Network => None,
        DataSource::Cache {
            cached_at,
            is_expired,
        } => Some(format!(
            "Offline: showing {}cached data from {}",
            if *is_expired { "expired " } else { "" },
            cached_at.format("%Y-%m-%d %H:%M UTC")
        )),
    }
}

fn score_line(name: &str, score: &ScoreAdjustment) -> String {
    let mut line = format!("  {:<8} {} → {}", name, score.raw, score.adjusted);
    if score.adjustment != 0.0 {
        line.push_str(&format!(" ({})", format_signed(score.adjustment)));
    }
    line
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Full text report for an analysis
pub fn render_report(report: &AnalysisReport) -> String {
    let mut lines = Vec::new();

    let motor = &report.motor_preference;
    lines.push("Motor Preference".to_string());
    lines.push(format!("  {}", motor.preference));
    lines.push(format!("  Confidence: {:.1}%", motor.confidence * 100.0));
    if !motor.coaching_focus.is_empty() {
        lines.push(format!("  Coaching focus: {}", motor.coaching_focus));
    }
    if !motor.avoid_coaching.is_empty() {
        lines.push(format!("  Avoid: {}", motor.avoid_coaching));
    }

    let scores = &report.scores_adjusted;
    lines.push(String::new());
    lines.push("Adjusted Scores".to_string());
    lines.push(score_line("Ground", &scores.ground));
    lines.push(score_line("Engine", &scores.engine));
    lines.push(score_line("Weapon", &scores.weapon));
    lines.push(format!(
        "  Overall efficiency: {:.1}%",
        scores.overall_efficiency
    ));

    let range = &report.capacity.bat_speed_range;
    let performance = &report.performance;
    lines.push(String::new());
    lines.push("Kinetic Capacity".to_string());
    lines.push(format!(
        "  Bat speed capacity: {:.1}-{:.1} mph",
        range.min_mph, range.max_mph
    ));
    lines.push(format!("  Midpoint: {:.1} mph", range.midpoint_mph));
    lines.push(format!(
        "  Predicted bat speed: {:.1} mph",
        performance.predicted_bat_speed_mph
    ));
    if let Some(actual) = performance.actual_bat_speed_mph {
        lines.push(format!("  Actual bat speed: {:.1} mph", actual));
    }
    lines.push(format!(
        "  Gap to capacity: {:.1} mph",
        performance.gap_to_capacity_max_mph
    ));

    let plan = &report.correction_plan;
    lines.push(String::new());
    lines.push("Correction Plan".to_string());
    if !plan.timeline.is_empty() {
        lines.push(format!("  Timeline: {}", plan.timeline));
    }
    for issue in &plan.issues {
        lines.push(format!(
            "  ! {} [{}] +{:.1} mph",
            issue.name, issue.priority, issue.potential_gain_mph
        ));
    }

    if !plan.drills.is_empty() {
        lines.push(String::new());
        lines.push("Drill Progression".to_string());
        for (index, drill) in plan.drills.iter().enumerate() {
            let mut line = format!("  {}. {}", index + 1, drill.drill_name);
            if !drill.stage.is_empty() {
                line.push_str(&format!(" ({})", short_stage(&drill.stage)));
            }
            if !drill.videos.is_empty() {
                line.push_str(&format!(" - {}", plural(drill.videos.len(), "video")));
            }
            lines.push(line);
            if !drill.drill_id.is_empty() {
                lines.push(format!("     id: {}", drill.drill_id));
            }
            if !drill.description.is_empty() {
                lines.push(format!("     {}", drill.description));
            }
        }
    }

    let metrics = &plan.success_metrics;
    lines.push(String::new());
    lines.push("Success Metrics".to_string());
    lines.push(format!("  Target Ground: {}", metrics.target_ground_score));
    lines.push(format!("  Target Engine: {}", metrics.target_engine_score));
    lines.push(format!("  Target Weapon: {}", metrics.target_weapon_score));
    lines.push(format!(
        "  Expected Gain: +{:.1} mph",
        metrics.expected_bat_speed_gain_mph
    ));

    lines.join("\n")
}

fn video_summary(video: &Video) -> String {
    let mut line = format!("{}  {}", video.video_id, video.title);
    if let Some(seconds) = video.duration_seconds {
        line.push_str(&format!(" ({})", format_duration(seconds)));
    }
    if video.featured {
        line.push_str(" *");
    }
    line
}

/// One line per video with a total header
pub fn render_video_list(list: &VideoList) -> String {
    if list.videos.is_empty() {
        return "No videos found.".to_string();
    }

    let mut lines = vec![format!(
        "Showing {} of {}",
        list.videos.len(),
        plural(list.total, "video")
    )];
    lines.extend(list.videos.iter().map(video_summary));
    lines.join("\n")
}

/// Detailed view of a single video
pub fn render_video(video: &Video) -> String {
    let mut lines = vec![video.title.clone()];
    if !video.description.is_empty() {
        lines.push(video.description.clone());
    }
    lines.push(String::new());
    lines.push(format!("Watch: {}", video.source_url));
    if let Some(seconds) = video.duration_seconds {
        lines.push(format!("Length: {}", format_duration(seconds)));
    }
    if !video.category.is_empty() {
        lines.push(format!("Category: {}", video.category));
    }
    if let Some(stage) = &video.drill_stage {
        lines.push(format!("Stage: {}", stage));
    }
    if !video.tags.is_empty() {
        lines.push(format!("Tags: {}", video.tags.join(", ")));
    }
    if !video.equipment.is_empty() {
        lines.push(format!("Equipment: {}", video.equipment.join(", ")));
    }
    if !video.coaching_points.is_empty() {
        lines.push("Coaching points:".to_string());
        lines.extend(video.coaching_points.iter().map(|p| format!("  • {}", p)));
    }
    lines.push(format!("Views: {}", video.view_count));
    lines.join("\n")
}

/// Videos grouped under each drill of a correction plan
pub fn render_plan_videos(plan: &CorrectionPlanVideos) -> String {
    let mut lines = vec![format!(
        "{} across {}",
        plural(plan.total_videos, "video"),
        plural(plan.drill_ids.len(), "drill")
    )];
    for drill_id in &plan.drill_ids {
        lines.push(String::new());
        lines.push(drill_id.clone());
        match plan.videos_by_drill.get(drill_id) {
            Some(videos) if !videos.is_empty() => {
                lines.extend(videos.iter().map(|v| format!("  {}", video_summary(v))));
            }
            _ => lines.push("  (no videos)".to_string()),
        }
    }
    lines.join("\n")
}

pub fn render_tags(tags: &TagList) -> String {
    if tags.tags.is_empty() {
        return "No tags.".to_string();
    }
    tags.tags.join("\n")
}

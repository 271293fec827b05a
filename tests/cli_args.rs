//! Integration tests for CLI argument handling
//!
//! Runs the binary for argument errors and offline behaviour; nothing here needs a
//! live analysis service. Unreachable calls point at the discard port on localhost.

use std::process::Command;

use swingcoach::api::CACHE_KEY_FEATURED;
use swingcoach::cache::CacheManager;
use swingcoach::data::{Video, VideoList};
use tempfile::TempDir;

const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_swingcoach"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SWINGCOACH_API_URL")
        .env_remove("SWINGCOACH_CACHE_DIR")
        .output()
        .expect("Failed to execute swingcoach")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("swingcoach"), "Help should mention swingcoach");
    assert!(stdout.contains("analyze"), "Help should list the analyze command");
    assert!(stdout.contains("videos"), "Help should list the videos command");
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_category_prints_error_and_exits() {
    let output = run_cli(&[
        "videos",
        "search",
        "--category",
        "bloopers",
        "--api-url",
        UNREACHABLE_URL,
        "--no-cache",
    ]);
    assert!(!output.status.success(), "Expected invalid category to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid category"),
        "Should print error message about invalid category: {}",
        stderr
    );
}

#[test]
fn test_analyze_without_fields_reports_missing_field() {
    let output = run_cli(&["analyze", "--api-url", UNREACHABLE_URL, "--no-cache"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing required field"), "stderr: {}", stderr);
}

#[test]
fn test_analyze_out_of_range_score_is_rejected_locally() {
    let output = run_cli(&[
        "analyze",
        "--sample",
        "--ground",
        "150",
        "--api-url",
        UNREACHABLE_URL,
        "--no-cache",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ground_score must be between 0 and 100"), "stderr: {}", stderr);
}

#[test]
fn test_conflicting_cache_flags_fail() {
    let output = run_cli(&["--no-cache", "--prefer-cache", "status"]);
    assert!(!output.status.success());
}

#[test]
fn test_status_reports_offline() {
    let output = run_cli(&["status", "--api-url", UNREACHABLE_URL, "--no-cache"]);
    assert!(!output.status.success(), "Offline status should exit non-zero");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Offline"), "stdout: {}", stdout);
}

#[test]
fn test_cache_clear_in_empty_directory() {
    let cache_dir = TempDir::new().unwrap();
    let dir = cache_dir.path().to_str().unwrap();

    let output = run_cli(&["cache", "clear", "--cache-dir", dir]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Removed 0"), "stdout: {}", stdout);
}

#[test]
fn test_featured_videos_served_from_cache_when_offline() {
    let cache_dir = TempDir::new().unwrap();
    let cached = VideoList {
        total: 1,
        videos: vec![Video {
            video_id: "vid_cached".to_string(),
            title: "Cached Drill".to_string(),
            ..Default::default()
        }],
    };
    CacheManager::with_dir(cache_dir.path().to_path_buf())
        .write(CACHE_KEY_FEATURED, &cached)
        .unwrap();

    let dir = cache_dir.path().to_str().unwrap();
    let output = run_cli(&["videos", "featured", "--api-url", UNREACHABLE_URL, "--cache-dir", dir]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("vid_cached  Cached Drill"), "stdout: {}", stdout);
    assert!(stderr.contains("Offline: showing cached data"), "stderr: {}", stderr);
}

#[test]
fn test_featured_videos_json_output_from_cache() {
    let cache_dir = TempDir::new().unwrap();
    let cached = VideoList {
        total: 1,
        videos: vec![Video {
            video_id: "vid_json".to_string(),
            ..Default::default()
        }],
    };
    CacheManager::with_dir(cache_dir.path().to_path_buf())
        .write(CACHE_KEY_FEATURED, &cached)
        .unwrap();

    let dir = cache_dir.path().to_str().unwrap();
    let output = run_cli(&[
        "videos",
        "featured",
        "--json",
        "--api-url",
        UNREACHABLE_URL,
        "--cache-dir",
        dir,
    ]);

    assert!(output.status.success());
    let parsed: VideoList = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(parsed, cached);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use swingcoach::cli::{parse_category_arg, parse_stage_arg, Cli, Command, VideoCommand};
    use swingcoach::data::{DrillStage, VideoCategory};
    use swingcoach::{ClientConfig, FetchPolicy};

    #[test]
    fn test_cli_analyze_sample() {
        let cli = Cli::parse_from(["swingcoach", "analyze", "--sample"]);
        match cli.command {
            Command::Analyze(args) => assert!(args.sample),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_video_show() {
        let cli = Cli::parse_from(["swingcoach", "videos", "show", "vid_001"]);
        match cli.command {
            Command::Videos(VideoCommand::Show { video_id }) => assert_eq!(video_id, "vid_001"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_category_arg_returns_category() {
        assert_eq!(parse_category_arg("technique").unwrap(), VideoCategory::Technique);
    }

    #[test]
    fn test_parse_stage_arg_returns_stage() {
        assert_eq!(parse_stage_arg("stage 3").unwrap(), DrillStage::Stage3);
    }

    #[test]
    fn test_no_cache_flag_disables_cache() {
        let cli = Cli::parse_from(["swingcoach", "--no-cache", "videos", "tags"]);
        let config = cli.client_config(ClientConfig::default());
        assert!(config.cache_manager().is_none());
        assert_eq!(config.policy, FetchPolicy::NetworkFirst);
    }
}

//! Command-line interface parsing for swingcoach
//!
//! This module handles parsing of CLI arguments using clap: global connection and
//! cache flags, the `analyze` form, and the video library and cache subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::{ClientConfig, FetchPolicy};
use crate::data::{DrillStage, SwingInput, VideoCategory, VideoQuery};

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// The specified category name is not recognized
    #[error("Invalid category: '{0}'. Valid categories: drill, technique, concept, assessment, exercise, interview, case_study")]
    InvalidCategory(String),

    /// The specified stage is not recognized
    #[error("Invalid stage: '{0}'. Valid stages: 1, 2, 3")]
    InvalidStage(String),

    /// A required analysis field was not given and `--sample` was not used
    #[error("Missing required field: --{0} (or use --sample)")]
    MissingField(&'static str),
}

/// swingcoach - Swing analysis reports and the drill video library
#[derive(Parser, Debug)]
#[command(name = "swingcoach")]
#[command(about = "Swing analysis reports, correction plans and the drill video library")]
#[command(version)]
pub struct Cli {
    /// Base URL of the analysis service
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// How long cached responses stay fresh, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub cache_ttl: Option<u64>,

    /// Directory for cached responses
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Never read or write the response cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Serve fresh cached responses without calling the service
    #[arg(long, global = true, conflicts_with = "no_cache")]
    pub prefer_cache: bool,

    /// Serve expired cached responses when the service is unreachable
    #[arg(long, global = true)]
    pub allow_stale: bool,

    /// Print raw JSON instead of a text summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit swing measurements and print the biomechanics report
    ///
    /// Examples:
    ///   swingcoach analyze --sample
    ///   swingcoach analyze --sample --age 17 --bat-weight 29
    ///   swingcoach analyze --ground 40 --engine 60 --weapon 52 --height 70 --weight 175 --age 19
    Analyze(AnalyzeArgs),

    /// Browse the video library
    #[command(subcommand)]
    Videos(VideoCommand),

    /// Manage the local response cache
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Check whether the analysis service is reachable
    Status,
}

/// Athlete form; flags override `--sample` values
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Start from the built-in sample athlete
    #[arg(long)]
    pub sample: bool,

    /// Ground score from video analysis
    #[arg(long, value_name = "0-100")]
    pub ground: Option<u32>,

    /// Engine score from video analysis
    #[arg(long, value_name = "0-100")]
    pub engine: Option<u32>,

    /// Weapon score from video analysis
    #[arg(long, value_name = "0-100")]
    pub weapon: Option<u32>,

    #[arg(long, value_name = "INCHES")]
    pub height: Option<f64>,

    #[arg(long, value_name = "INCHES")]
    pub wingspan: Option<f64>,

    #[arg(long, value_name = "LBS")]
    pub weight: Option<f64>,

    #[arg(long)]
    pub age: Option<u32>,

    /// Bat weight (defaults to 30 oz)
    #[arg(long, value_name = "OZ")]
    pub bat_weight: Option<u32>,

    /// Measured bat speed
    #[arg(long, value_name = "MPH")]
    pub bat_speed: Option<f64>,

    /// Rotational kinetic energy
    #[arg(long, value_name = "JOULES")]
    pub rotation_ke: Option<f64>,

    /// Translational kinetic energy
    #[arg(long, value_name = "JOULES")]
    pub translation_ke: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum VideoCommand {
    /// Featured videos
    Featured,

    /// Page through the whole library
    List {
        #[arg(long, default_value_t = 100)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Search by text, tags, category or drill stage
    Search(SearchArgs),

    /// Every video in a category
    Category {
        /// drill, technique, concept, assessment, exercise, interview or case_study
        category: String,
    },

    /// Show one video
    Show { video_id: String },

    /// Videos demonstrating a drill
    Drill { drill_id: String },

    /// Videos for every drill of a correction plan
    Plan {
        /// Drill IDs, space or comma separated
        #[arg(required = true, value_delimiter = ',')]
        drill_ids: Vec<String>,
    },

    /// Every tag in the library
    Tags,

    /// Record that a video was watched
    View { video_id: String },
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Text matched against title and description
    #[arg(short, long)]
    pub query: Option<String>,

    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// drill, technique, concept, assessment, exercise, interview or case_study
    #[arg(long)]
    pub category: Option<String>,

    /// Drill stage: 1, 2 or 3
    #[arg(long)]
    pub stage: Option<String>,

    /// Only featured videos
    #[arg(long)]
    pub featured_only: bool,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Delete every cached response
    Clear,
}

/// Parses a category argument into a VideoCategory.
pub fn parse_category_arg(s: &str) -> Result<VideoCategory, CliError> {
    VideoCategory::from_str(s).ok_or_else(|| CliError::InvalidCategory(s.to_string()))
}

/// Parses a stage argument into a DrillStage.
pub fn parse_stage_arg(s: &str) -> Result<DrillStage, CliError> {
    DrillStage::from_str(s).ok_or_else(|| CliError::InvalidStage(s.to_string()))
}

impl Cli {
    /// Applies the global flags on top of `base` (usually [`ClientConfig::from_env`])
    pub fn client_config(&self, base: ClientConfig) -> ClientConfig {
        let mut config = base;
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout_secs(secs);
        }
        if let Some(secs) = self.cache_ttl {
            config = config.with_cache_ttl_secs(secs);
        }
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir.clone());
        }
        if self.no_cache {
            config = config.without_cache();
        }
        if self.prefer_cache {
            config = config.with_policy(FetchPolicy::CacheFirst);
        }
        if self.allow_stale {
            config = config.with_serve_stale(true);
        }
        config
    }
}

impl AnalyzeArgs {
    /// Builds the athlete form from flags, filling gaps from the sample when requested
    ///
    /// Range checks are left to [`SwingInput::validate`].
    pub fn to_input(&self) -> Result<SwingInput, CliError> {
        let base = self.sample.then(SwingInput::sample);
        let base = base.as_ref();

        Ok(SwingInput {
            ground_score: self
                .ground
                .or(base.map(|b| b.ground_score))
                .ok_or(CliError::MissingField("ground"))?,
            engine_score: self
                .engine
                .or(base.map(|b| b.engine_score))
                .ok_or(CliError::MissingField("engine"))?,
            weapon_score: self
                .weapon
                .or(base.map(|b| b.weapon_score))
                .ok_or(CliError::MissingField("weapon"))?,
            height_inches: self
                .height
                .or(base.map(|b| b.height_inches))
                .ok_or(CliError::MissingField("height"))?,
            wingspan_inches: self.wingspan.or(base.and_then(|b| b.wingspan_inches)),
            weight_lbs: self
                .weight
                .or(base.map(|b| b.weight_lbs))
                .ok_or(CliError::MissingField("weight"))?,
            age: self
                .age
                .or(base.map(|b| b.age))
                .ok_or(CliError::MissingField("age"))?,
            bat_weight_oz: self.bat_weight.or(base.and_then(|b| b.bat_weight_oz)),
            actual_bat_speed_mph: self.bat_speed.or(base.and_then(|b| b.actual_bat_speed_mph)),
            rotation_ke_joules: self.rotation_ke.or(base.and_then(|b| b.rotation_ke_joules)),
            translation_ke_joules: self
                .translation_ke
                .or(base.and_then(|b| b.translation_ke_joules)),
        })
    }
}

impl SearchArgs {
    pub fn to_query(&self) -> Result<VideoQuery, CliError> {
        Ok(VideoQuery {
            text: self.query.clone(),
            tags: self.tags.clone(),
            category: self.category.as_deref().map(parse_category_arg).transpose()?,
            stage: self.stage.as_deref().map(parse_stage_arg).transpose()?,
            featured_only: self.featured_only,
        })
    }
}

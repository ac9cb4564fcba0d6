use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use scorecard_api::Score;

#[derive(Parser, Debug)]
#[command(name = "scorecard", version, about = "Submit project evaluations, online or offline")]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, global = true, default_value = "scorecard.yaml")]
    pub config: PathBuf,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit one evaluation, queueing it if the server cannot be reached
    Submit(SubmitArgs),

    /// Send every pending evaluation now
    Flush,

    /// List evaluations waiting to be synced
    Pending {
        /// Print the queue as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep syncing whenever connectivity comes back, until Ctrl-C
    Watch {
        /// Seconds between reachability probes
        #[arg(long, default_value_t = 15)]
        interval: u64,
    },

    /// Show the evaluation criteria and allowed scores
    Criteria,
}

/// Scores accept a label (`regular`, `good`, `excellent`) or a number (`0.3`, `0.7`, `1`).
#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[arg(long)]
    pub evaluator: String,

    #[arg(long)]
    pub class: String,

    #[arg(long)]
    pub group: String,

    /// Functionality
    #[arg(long = "c1", value_parser = parse_score)]
    pub c1: Option<f64>,

    /// Usability and visual
    #[arg(long = "c2", value_parser = parse_score)]
    pub c2: Option<f64>,

    /// Originality
    #[arg(long = "c3", value_parser = parse_score)]
    pub c3: Option<f64>,

    /// Completion level
    #[arg(long = "c4", value_parser = parse_score)]
    pub c4: Option<f64>,

    /// Presentation and delivery
    #[arg(long = "c5", value_parser = parse_score)]
    pub c5: Option<f64>,

    #[arg(long, default_value = "")]
    pub note: String,
}

impl SubmitArgs {
    pub fn scores(&self) -> [Option<f64>; 5] {
        [self.c1, self.c2, self.c3, self.c4, self.c5]
    }
}

fn parse_score(raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if let Some(score) = Score::ALL
        .into_iter()
        .find(|s| s.label().eq_ignore_ascii_case(raw))
    {
        return Ok(score.value());
    }
    raw.parse::<f64>()
        .map_err(|_| format!("'{}' is not a score (use regular, good, excellent or a number)", raw))
}

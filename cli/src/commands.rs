//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use council_domain::Vote;
use std::path::PathBuf;

/// CLI arguments for review-council
#[derive(Parser, Debug)]
#[command(name = "review-council")]
#[command(author, version, about = "Review council - Multiple agents review a proposal and reach consensus")]
#[command(long_about = r#"
Review council coordinates a planner, reviewer and arbiter agents around a
proposed change.

A task is classified into expertise areas, roles are assigned, and the
proposal moves through draft -> pending_review -> (revision | disputed |
escalated) -> approved / rejected -> implemented as votes arrive.

Configuration files are loaded from (in priority order):
1. COUNCIL_* env      e.g. COUNCIL_REVIEW__MAX_ITERATIONS=5
2. --config <path>    Explicit config file
3. ./council.toml     Project-level config
4. ~/.config/review-council/config.toml   Global config

Example:
  review-council classify "Add JWT auth" -f src/auth/jwt.rs
  review-council --planner claude-opus --reviewer gpt-5 --reviewer gemini-pro \
      simulate "Add JWT auth" --vote gpt-5=approve --vote gemini-pro=reject --human yes
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Append audit events to this JSONL file
    #[arg(long, value_name = "PATH", global = true)]
    pub audit_log: Option<PathBuf>,

    /// Also write diagnostic logs to a daily-rolling file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Planner identity (overrides roles.planner)
    #[arg(long, value_name = "NAME", global = true)]
    pub planner: Option<String>,

    /// Reviewer identities (can be specified multiple times; overrides roles.reviewers)
    #[arg(long = "reviewer", value_name = "NAME", global = true)]
    pub reviewers: Vec<String>,

    /// Arbiter candidates (can be specified multiple times; overrides roles.arbiters)
    #[arg(long = "arbiter", value_name = "NAME", global = true)]
    pub arbiters: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank expertise areas for a task
    Classify(TaskArgs),

    /// Show planner, reviewers and the provisional arbiter for a task
    Assign(TaskArgs),

    /// Drive one proposal through the lifecycle with scripted votes
    Simulate(SimulateArgs),

    /// Show configuration sources and the effective configuration
    ShowConfig,
}

#[derive(Args, Debug)]
pub struct TaskArgs {
    /// Task description
    pub task: String,

    /// Files the task touches (can be specified multiple times)
    #[arg(short, long = "file", value_name = "FILE")]
    pub files: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub task: TaskArgs,

    /// Reviewer votes in arrival order (e.g. gpt-5=approve)
    #[arg(long = "vote", value_name = "AGENT=VOTE", value_parser = parse_agent_vote)]
    pub votes: Vec<(String, Vote)>,

    /// Arbiter decision if the proposal ends up disputed
    #[arg(long, value_name = "VOTE")]
    pub arbiter_vote: Option<Vote>,

    /// Human decision if the proposal is disputed or escalated
    #[arg(long, value_name = "yes|no", value_parser = parse_yes_no)]
    pub human: Option<bool>,

    /// How many revision requests the planner answers (default: all)
    #[arg(long, value_name = "N")]
    pub revisions: Option<u32>,

    /// Mark the proposal implemented once approved
    #[arg(long)]
    pub implement: bool,
}

fn parse_agent_vote(s: &str) -> Result<(String, Vote), String> {
    let (agent, vote) = s
        .split_once('=')
        .ok_or_else(|| format!("expected AGENT=VOTE, got '{}'", s))?;
    let agent = agent.trim();
    if agent.is_empty() {
        return Err(format!("missing agent name in '{}'", s));
    }
    let vote = vote.parse::<Vote>().map_err(|e| e.to_string())?;
    Ok((agent.to_string(), vote))
}

fn parse_yes_no(s: &str) -> Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" | "approve" | "true" => Ok(true),
        "no" | "n" | "reject" | "false" => Ok(false),
        other => Err(format!("expected yes or no, got '{}'", other)),
    }
}

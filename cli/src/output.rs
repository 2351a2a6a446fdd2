//! Console output for council commands

use crate::simulate::{SimulationReport, SimulationStep};
use colored::Colorize;
use council_application::CouncilConfig;
use council_domain::config::{ConfigIssue, Severity};
use council_domain::util::truncate_str;
use council_domain::{
    Decision, DecisionOutcome, Directive, ExpertiseMatch, RoleAssignment, RoleSlot, TransitionOutcome,
};
use serde::Serialize;

const PREVIEW_BYTES: usize = 160;

/// Formats council results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Ranked expertise matches for a task
    pub fn format_matches(task: &str, matches: &[ExpertiseMatch]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Task Classification"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Task:".cyan().bold(), task));

        output.push_str(&Self::section_header("Expertise"));
        for (rank, m) in matches.iter().enumerate() {
            output.push_str(&format!(
                "{:>2}. {} {}\n",
                rank + 1,
                m.name.yellow().bold(),
                format!("(score {})", m.score).dimmed()
            ));
            if !m.matched_keywords.is_empty() {
                output.push_str(&format!("    keywords: {}\n", m.matched_keywords.join(", ")));
            }
            if !m.matched_patterns.is_empty() {
                output.push_str(&format!("    patterns: {}\n", m.matched_patterns.join(", ")));
            }
            output.push_str(&format!("    focus:    {}\n", m.focus));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Planner, reviewers and provisional arbiter
    pub fn format_assignment(task: &str, assignment: &RoleAssignment) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Role Assignment"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Task:".cyan().bold(), task));

        output.push_str(&Self::section_header("Roles"));
        output.push_str(&Self::slot("Planner", &assignment.planner));
        for reviewer in &assignment.reviewers {
            output.push_str(&Self::slot("Reviewer", reviewer));
        }

        match &assignment.arbiter {
            Some(selection) => {
                let mut line = format!(
                    "{:<9} {} {}",
                    "Arbiter",
                    selection.arbiter.name().yellow().bold(),
                    format!("(prior arbitrations: {})", selection.prior_arbitrations).dimmed()
                );
                if selection.fallback {
                    line.push_str(&format!(" {}", "[same family fallback]".red()));
                }
                output.push_str(&line);
                output.push('\n');
            }
            None => output.push_str(&format!(
                "{:<9} {}\n",
                "Arbiter",
                "none configured, disputes go to a human".dimmed()
            )),
        }

        output.push_str(&Self::footer());
        output
    }

    /// Every simulated event plus the final proposal state
    pub fn format_simulation(report: &SimulationReport) -> String {
        let mut output = String::new();
        let proposal = &report.proposal;

        output.push_str(&Self::header("Review Simulation"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Proposal:".cyan().bold(), proposal.id));
        output.push_str(&format!("{} {}\n", "Title:".cyan().bold(), proposal.title));
        if let Some(top) = report.matches.first() {
            output.push_str(&format!("{} {}\n", "Expertise:".cyan().bold(), top.name));
        }

        output.push_str(&Self::section_header("Events"));
        for step in &report.steps {
            output.push_str(&Self::step(step));
        }

        if !report.decisions.is_empty() {
            output.push_str(&Self::section_header("Decisions"));
            for decision in &report.decisions {
                output.push_str(&Self::decision(decision));
            }
        }

        let counted = report.reviews.iter().filter(|r| r.counted).count();
        output.push_str(&format!(
            "\n{} {} ({} counted, {} late or duplicate)\n",
            "Reviews:".cyan().bold(),
            report.reviews.len(),
            counted,
            report.reviews.len() - counted
        ));
        output.push_str(&format!(
            "{} {} after {} revision(s)\n",
            "Status:".cyan().bold(),
            proposal.status().display_name().bold(),
            proposal.iterations()
        ));

        output.push_str(&Self::section_header("Next"));
        output.push_str(&Self::format_directive(&report.directive));

        output.push_str(&Self::footer());
        output
    }

    /// A single directive, one line plus a preview of the instructions
    pub fn format_directive(directive: &Directive) -> String {
        let target = directive
            .target_agent
            .as_ref()
            .map(|a| format!(" -> {}", a.name()))
            .unwrap_or_default();
        format!(
            "{}{}\n{}\n",
            directive.action.as_str().green().bold(),
            target,
            Self::indent(truncate_str(&directive.instructions, PREVIEW_BYTES), "  ")
        )
    }

    /// Effective role and review settings
    pub fn format_config(sources: &[String], config: &CouncilConfig) -> String {
        let mut output = String::new();

        output.push_str(&sources.join("\n"));
        output.push('\n');

        let roles = config.roles();
        output.push_str(&Self::section_header("Roles"));
        output.push_str(&format!("{:<16} {}\n", "planner", roles.planner()));
        output.push_str(&format!(
            "{:<16} {}\n",
            "reviewers",
            Self::names(roles.reviewers().iter().map(|a| a.name()))
        ));
        output.push_str(&format!(
            "{:<16} {}\n",
            "arbiters",
            Self::names(roles.arbiters().iter().map(|a| a.name()))
        ));
        output.push_str(&format!(
            "{:<16} {}\n",
            "arbiter_strategy",
            roles.strategy().as_str()
        ));

        output.push_str(&Self::section_header("Review"));
        output.push_str(&format!("{:<16} {}\n", "max_iterations", roles.max_iterations()));
        output.push_str(&format!("{:<16} {}\n", "consensus_mode", roles.consensus_mode()));
        output.push_str(&format!("{:<16} {}\n", "min_votes", roles.min_votes()));

        output.push_str(&Self::section_header("Expertise"));
        for profile in config.profiles() {
            output.push_str(&format!(
                "{:<16} {} keywords, {} patterns\n",
                profile.name,
                profile.keywords.len(),
                profile.file_patterns.len()
            ));
        }

        output
    }

    /// Configuration problems, errors first
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<&ConfigIssue> = issues.iter().collect();
        sorted.sort_by_key(|i| i.severity != Severity::Error);

        sorted
            .into_iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format any result as JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn slot(role: &str, slot: &RoleSlot) -> String {
        format!(
            "{:<9} {} {}\n",
            role,
            slot.identity.name().yellow().bold(),
            format!("[{}]", slot.expertise).dimmed()
        )
    }

    fn step(step: &SimulationStep) -> String {
        let mut line = match &step.outcome {
            TransitionOutcome::Applied {
                from,
                to,
                consensus,
            } => {
                let mut line = format!("{:<32} {} -> {}", step.event, from, to.to_string().bold());
                if let Some(consensus) = consensus {
                    line.push_str(&format!(" {}", consensus.summary.dimmed()));
                }
                line
            }
            TransitionOutcome::Ignored { state, reason, .. } => format!(
                "{:<32} {} {}",
                step.event,
                state,
                format!("ignored: {}", reason.as_str()).red()
            ),
        };

        if let Some(selection) = &step.arbiter {
            line.push_str(&format!("\n{:<32} arbiter {}", "", selection.arbiter.name().yellow()));
        }
        line.push('\n');
        line
    }

    fn decision(decision: &Decision) -> String {
        let label = decision.outcome.as_str();
        let outcome = match decision.outcome {
            DecisionOutcome::Approved => label.green().bold(),
            DecisionOutcome::Rejected => label.red().bold(),
            DecisionOutcome::Deferred => label.yellow().bold(),
        };
        format!(
            "{} {} {}\n",
            outcome,
            format!("({})", decision.source.as_str()).dimmed(),
            decision.summary
        )
    }

    fn names<'a>(names: impl Iterator<Item = &'a str>) -> String {
        let names: Vec<&str> = names.collect();
        if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

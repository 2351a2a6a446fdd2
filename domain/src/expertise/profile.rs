//! Expertise profiles

use serde::{Deserialize, Serialize};

/// A named domain focus used to route review attention.
///
/// Profiles are immutable configuration, loaded once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertiseProfile {
    pub name: String,
    /// Matched case-insensitively as substrings of the task text
    pub keywords: Vec<String>,
    /// Glob patterns matched against the task's file list
    pub file_patterns: Vec<String>,
    /// Guidance handed to whoever reviews with this focus
    pub focus: String,
}

impl ExpertiseProfile {
    pub fn new(name: impl Into<String>, focus: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
            file_patterns: Vec::new(),
            focus: focus.into(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn with_file_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// A profile with nothing to match can never score
    pub fn is_empty(&self) -> bool {
        self.keywords.iter().all(|k| k.trim().is_empty())
            && self.file_patterns.iter().all(|p| p.trim().is_empty())
    }

    /// Built-in profiles used when configuration supplies none
    pub fn defaults() -> Vec<ExpertiseProfile> {
        vec![
            ExpertiseProfile::new(
                "security",
                "Look for authentication and authorization flaws, injection, secret handling and unsafe input validation.",
            )
            .with_keywords([
                "auth", "jwt", "token", "password", "secret", "crypt", "permission", "oauth",
                "session", "xss", "csrf", "injection",
            ])
            .with_file_patterns(["**/auth/**", "**/*auth*", "**/security/**", "**/*.pem"]),
            ExpertiseProfile::new(
                "performance",
                "Check hot paths, allocation patterns, algorithmic complexity, caching and blocking calls.",
            )
            .with_keywords([
                "performance", "latency", "cache", "optimiz", "throughput", "memory", "slow",
                "benchmark",
            ])
            .with_file_patterns(["**/benches/**", "**/*bench*", "**/cache/**"]),
            ExpertiseProfile::new(
                "database",
                "Review schema changes, migrations, query correctness, indexes and transaction boundaries.",
            )
            .with_keywords([
                "database", "sql", "query", "migration", "schema", "index", "transaction",
                "postgres",
            ])
            .with_file_patterns(["**/migrations/**", "**/*.sql", "**/db/**"]),
            ExpertiseProfile::new(
                "api",
                "Check endpoint contracts, backwards compatibility, error responses and versioning.",
            )
            .with_keywords(["api", "endpoint", "rest", "graphql", "route", "handler", "grpc"])
            .with_file_patterns(["**/api/**", "**/routes/**", "**/handlers/**", "**/*.proto"]),
            ExpertiseProfile::new(
                "testing",
                "Verify coverage of new behaviour, edge cases, flaky patterns and test isolation.",
            )
            .with_keywords(["test", "coverage", "mock", "fixture", "regression"])
            .with_file_patterns(["**/tests/**", "**/*_test.*", "**/*.test.*", "**/*.spec.*"]),
            ExpertiseProfile::new(
                "frontend",
                "Review component structure, state handling, accessibility and rendering cost.",
            )
            .with_keywords(["user interface", "frontend", "component", "css", "react", "layout", "render"])
            .with_file_patterns(["**/*.tsx", "**/*.jsx", "**/*.css", "**/*.vue"]),
            ExpertiseProfile::new(
                "infrastructure",
                "Check deployment, CI, container and configuration changes for safety and rollback.",
            )
            .with_keywords(["deploy", "docker", "kubernetes", "ci/cd", "pipeline", "terraform"])
            .with_file_patterns([
                "**/Dockerfile",
                "**/.github/**",
                "**/*.tf",
                "**/k8s/**",
            ]),
            ExpertiseProfile::new(
                "documentation",
                "Check that docs, comments and changelogs match the behaviour being changed.",
            )
            .with_keywords(["doc", "readme", "changelog", "guide"])
            .with_file_patterns(["**/*.md", "**/docs/**"]),
        ]
    }
}

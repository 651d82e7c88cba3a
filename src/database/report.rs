use std::fmt;

use crate::config::{Backend, DATABASE_NAME};
use crate::error::FailureKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Connect,
    CreateDatabase,
    SelectDatabase,
    CreateTable(String),
    SeedAdmin,
    Commit,
    Close,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Connect => "connect",
            Step::CreateDatabase => "create_database",
            Step::SelectDatabase => "select_database",
            Step::CreateTable(_) => "create_table",
            Step::SeedAdmin => "seed_admin",
            Step::Commit => "commit",
            Step::Close => "close",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    AlreadyExists,
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub backend: Backend,
    pub step: Step,
    pub outcome: Outcome,
}

impl StepReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.step, &self.outcome) {
            (Step::CreateTable(name), Outcome::Done) => {
                write!(f, "Table '{}' created successfully.", name)
            }
            (Step::CreateTable(name), Outcome::AlreadyExists) => {
                write!(f, "Table '{}' already exists.", name)
            }
            (Step::CreateTable(name), Outcome::Failed { message, .. }) => {
                write!(f, "Failed creating table '{}': {}", name, message)
            }
            (_, Outcome::Failed { message, .. }) => write!(f, "Database error: {}", message),
            (Step::Connect, _) => write!(f, "Connected to {}.", self.backend),
            (Step::CreateDatabase, _) => write!(
                f,
                "Database '{}' created successfully or already exists.",
                DATABASE_NAME
            ),
            (Step::SelectDatabase, _) => write!(f, "Using database '{}'.", DATABASE_NAME),
            (Step::SeedAdmin, _) => write!(f, "Default admin created (if didn't exist)."),
            (Step::Commit, _) => write!(f, "Changes committed."),
            (Step::Close, _) => write!(f, "{} connection closed.", self.backend),
        }
    }
}

/// Every step the provisioner attempted, in order.
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    pub steps: Vec<StepReport>,
    halted: bool,
}

impl ProvisionReport {
    pub fn push(&mut self, report: StepReport) {
        self.steps.push(report);
    }

    pub(crate) fn mark_halted(&mut self) {
        self.halted = true;
    }

    /// True when no step failed; "already exists" counts as success.
    pub fn is_success(&self) -> bool {
        !self.steps.iter().any(StepReport::is_failure)
    }

    /// True when a failure stopped the run before the commit step.
    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn failed_tables(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match (&s.step, &s.outcome) {
                (Step::CreateTable(name), Outcome::Failed { .. }) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn outcome_of(&self, step: &Step) -> Option<&Outcome> {
        self.steps
            .iter()
            .find(|s| &s.step == step)
            .map(|s| &s.outcome)
    }

    /// The status lines as printed during the run.
    pub fn lines(&self) -> Vec<String> {
        self.steps.iter().map(ToString::to_string).collect()
    }
}

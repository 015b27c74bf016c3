//! Wizard steps — tracks where a new family is in signup.

use serde::{Deserialize, Serialize};

/// The steps of the onboarding wizard.
///
/// Progresses linearly: Account → Kids → Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    /// Email and phone collected; family record created.
    Account,
    /// At least one child added.
    Kids,
    /// Done; dashboard is next.
    Complete,
}

impl OnboardingStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        use OnboardingStep::*;
        matches!((self, target), (Account, Kids) | (Kids, Complete))
    }

    /// Whether this step is terminal (the wizard is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The next step in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        match self {
            Self::Account => Some(Self::Kids),
            Self::Kids => Some(Self::Complete),
            Self::Complete => None,
        }
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::Account
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Account => "account",
            Self::Kids => "kids",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

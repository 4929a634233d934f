use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validash_core::AppError;

/// Named target environment of a simulated request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Development sandbox.
    #[default]
    Development,
    /// Pre-release staging.
    Staging,
    /// User acceptance testing.
    Uat,
    /// Live production surface.
    Production,
}

impl Environment {
    /// Returns the stable identifier of this environment.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Uat => "uat",
            Self::Production => "production",
        }
    }

    /// Returns the human readable environment name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Staging => "Staging",
            Self::Uat => "UAT",
            Self::Production => "Production",
        }
    }

    /// Returns the base address the simulated response reports.
    #[must_use]
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Development => "https://dev-api.example.com",
            Self::Staging => "https://staging-api.example.com",
            Self::Uat => "https://uat-api.example.com",
            Self::Production => "https://api.example.com",
        }
    }

    /// Returns all known environments in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Environment] = &[
            Environment::Development,
            Environment::Staging,
            Environment::Uat,
            Environment::Production,
        ];

        ALL
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|environment| environment.id() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown environment '{value}'")))
    }
}

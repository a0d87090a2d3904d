use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Risk tier used to pick a cold-start rule list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 3] = [
        RiskTolerance::Low,
        RiskTolerance::Medium,
        RiskTolerance::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        }
    }

    /// Parses an optional raw value, defaulting to `Medium` when absent or blank
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(RiskTolerance::Medium),
            Some(value) => value.parse(),
        }
    }
}

impl Default for RiskTolerance {
    fn default() -> Self {
        RiskTolerance::Medium
    }
}

impl Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTolerance {
    type Err = AppError;

    /// Accepts the API vocabulary (`low`, `medium`, `high`) and the
    /// dashboard's risk profile labels (`Conservative`, `Balanced`, `Aggressive`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "conservative" => Ok(RiskTolerance::Low),
            "medium" | "balanced" => Ok(RiskTolerance::Medium),
            "high" | "aggressive" => Ok(RiskTolerance::High),
            _ => Err(AppError::InvalidRiskTolerance(s.to_string())),
        }
    }
}

/// A validated recommendation subject, built from request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: String,
    pub risk_tolerance: RiskTolerance,
    /// Whether the trained model has interaction history for this user
    pub has_history: bool,
}

/// Trims the raw identifier and rejects it when nothing is left
pub fn normalize_user_id(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::MissingUserId);
    }
    Ok(trimmed.to_string())
}

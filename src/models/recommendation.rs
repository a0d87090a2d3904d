use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::normalize_user_id;

/// Which path produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rationale {
    Model,
    Rule,
}

/// Which path produced a whole response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Model,
    ColdStart,
}

impl RecommendationSource {
    /// The rationale every recommendation in a response from this source carries
    pub fn rationale(&self) -> Rationale {
        match self {
            RecommendationSource::Model => Rationale::Model,
            RecommendationSource::ColdStart => Rationale::Rule,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationSource::Model => "model",
            RecommendationSource::ColdStart => "cold_start",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRecommendation {
    pub asset_id: String,
    pub score: f64,
    pub rationale: Rationale,
}

/// Ranked recommendations for one user, all from a single source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub user_id: String,
    pub source: RecommendationSource,
    pub recommendations: Vec<AssetRecommendation>,
}

impl RecommendationResponse {
    /// Builds a response, tagging every entry with the source's rationale.
    /// `ranked` must already be sorted by descending score.
    pub fn from_ranked(
        user_id: String,
        source: RecommendationSource,
        ranked: Vec<(String, f64)>,
    ) -> Self {
        let rationale = source.rationale();
        let recommendations = ranked
            .into_iter()
            .map(|(asset_id, score)| AssetRecommendation {
                asset_id,
                score,
                rationale,
            })
            .collect();

        Self {
            user_id,
            source,
            recommendations,
        }
    }

    pub fn asset_ids(&self) -> Vec<&str> {
        self.recommendations
            .iter()
            .map(|r| r.asset_id.as_str())
            .collect()
    }
}

/// Request body for `POST /recommend` and query string for `GET /recommend`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, alias = "risk_profile")]
    pub risk_tolerance: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Untyped view of a recommendation request as it arrives on the wire.
///
/// Fields are checked one by one in `into_request`, so a value of the wrong
/// type is reported with that field's error code instead of a deserializer message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecommendationRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default, alias = "risk_profile")]
    pub risk_tolerance: Option<Value>,
    #[serde(default)]
    pub top_k: Option<Value>,
}

impl RawRecommendationRequest {
    pub fn into_request(self) -> AppResult<RecommendationRequest> {
        let user_id = match self.user_id {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(normalize_user_id(&s)?),
            // numeric ids typed into a form arrive as JSON numbers
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(_) => return Err(AppError::MissingUserId),
        };

        let risk_tolerance = match self.risk_tolerance {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => return Err(AppError::InvalidRiskTolerance(other.to_string())),
        };

        let top_k = match self.top_k {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(
                n.as_u64()
                    .and_then(|k| usize::try_from(k).ok())
                    .ok_or_else(|| AppError::InvalidTopK(n.to_string()))?,
            ),
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(
                s.trim()
                    .parse::<usize>()
                    .map_err(|_| AppError::InvalidTopK(s.clone()))?,
            ),
            Some(other) => return Err(AppError::InvalidTopK(other.to_string())),
        };

        Ok(RecommendationRequest {
            user_id,
            risk_tolerance,
            top_k,
        })
    }
}

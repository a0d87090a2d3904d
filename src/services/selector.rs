use std::{cmp::Ordering, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{
        normalize_user_id, RecommendationResponse, RecommendationSource, RiskTolerance,
        ScoredAsset, UserProfile,
    },
    services::{rules::RuleTable, scorer::Scorer},
};

/// Hybrid recommendation selector
///
/// Dispatches each request either to the trained model (warm-start, for users
/// the model has history for) or to the static rule table (cold-start). A
/// response never mixes the two paths. Holds only read-only state, so one
/// instance is shared by every request.
#[derive(Clone)]
pub struct RecommendationSelector {
    scorer: Option<Arc<dyn Scorer>>,
    rules: Arc<RuleTable>,
    default_top_k: usize,
    max_top_k: usize,
}

impl RecommendationSelector {
    pub fn new(
        scorer: Option<Arc<dyn Scorer>>,
        rules: Arc<RuleTable>,
        default_top_k: usize,
        max_top_k: usize,
    ) -> Self {
        Self {
            scorer,
            rules,
            default_top_k,
            max_top_k,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.scorer.is_some()
    }

    /// Validates raw request input into a profile and a result size.
    /// Runs before any dispatch so invalid input never produces a partial result.
    pub fn profile(
        &self,
        user_id: Option<&str>,
        risk_tolerance: Option<&str>,
        top_k: Option<usize>,
    ) -> AppResult<(UserProfile, usize)> {
        let user_id = normalize_user_id(user_id.unwrap_or_default())?;
        let risk_tolerance = RiskTolerance::parse_optional(risk_tolerance)?;

        let top_k = top_k.unwrap_or(self.default_top_k);
        if top_k == 0 || top_k > self.max_top_k {
            return Err(AppError::InvalidTopK(format!(
                "{} (allowed 1..={})",
                top_k, self.max_top_k
            )));
        }

        let has_history = self
            .scorer
            .as_ref()
            .is_some_and(|scorer| scorer.knows_user(&user_id));

        Ok((
            UserProfile {
                user_id,
                risk_tolerance,
                has_history,
            },
            top_k,
        ))
    }

    /// Produces recommendations for raw request input
    pub async fn recommend(
        &self,
        user_id: Option<&str>,
        risk_tolerance: Option<&str>,
        top_k: Option<usize>,
    ) -> AppResult<RecommendationResponse> {
        let (profile, top_k) = self.profile(user_id, risk_tolerance, top_k)?;
        Ok(self.recommend_for(profile, top_k).await)
    }

    /// Dispatches a validated profile. Model failures fall back to cold-start.
    pub async fn recommend_for(&self, profile: UserProfile, top_k: usize) -> RecommendationResponse {
        if let Some(scorer) = self.scorer.as_ref().filter(|_| profile.has_history) {
            match self.warm_start(scorer.as_ref(), &profile.user_id, top_k).await {
                Ok(ranked) if !ranked.is_empty() => {
                    tracing::info!(
                        user_id = %profile.user_id,
                        scorer = scorer.name(),
                        count = ranked.len(),
                        "Serving model recommendations"
                    );
                    return RecommendationResponse::from_ranked(
                        profile.user_id,
                        RecommendationSource::Model,
                        ranked,
                    );
                }
                Ok(_) => {
                    tracing::info!(
                        user_id = %profile.user_id,
                        scorer = scorer.name(),
                        "Model returned no scores for warm user; using cold-start rules"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %profile.user_id,
                        scorer = scorer.name(),
                        error = %e,
                        "Model scoring failed; using cold-start rules"
                    );
                }
            }
        }

        let ranked = self.rules.ranked(profile.risk_tolerance, top_k);

        tracing::info!(
            user_id = %profile.user_id,
            risk_tolerance = %profile.risk_tolerance,
            count = ranked.len(),
            "Serving cold-start recommendations"
        );

        RecommendationResponse::from_ranked(profile.user_id, RecommendationSource::ColdStart, ranked)
    }

    async fn warm_start(
        &self,
        scorer: &dyn Scorer,
        user_id: &str,
        top_k: usize,
    ) -> AppResult<Vec<ScoredAsset>> {
        let scores = scorer.score(user_id).await?;
        Ok(rank_top_k(scores, top_k))
    }
}

/// Sorts by descending score (ties by ascending asset id) and keeps the first `top_k`.
/// Non-finite scores are dropped.
pub fn rank_top_k(mut scores: Vec<ScoredAsset>, top_k: usize) -> Vec<ScoredAsset> {
    scores.retain(|(_, score)| score.is_finite());
    scores.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scores.truncate(top_k);
    scores
}

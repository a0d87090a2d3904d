/// Recommendation model abstraction
///
/// The selector only needs two capabilities from a trained model: whether it
/// has seen a user, and a ranked list of asset scores for that user. Keeping
/// them behind a trait lets the model backend change without touching the
/// dispatch logic.
use crate::{error::AppResult, models::ScoredAsset};

pub mod latent_factor;

pub use latent_factor::LatentFactorModel;

/// Trait for trained recommendation models
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Scorer: Send + Sync {
    /// Whether the model has interaction history for this user (warm-start eligible)
    fn knows_user(&self, user_id: &str) -> bool;

    /// Scores assets for a known user
    ///
    /// Returns `(asset_id, score)` pairs. Order is not guaranteed; the selector ranks them.
    /// Fails with `ModelUnavailable` when the model cannot score this user.
    async fn score(&self, user_id: &str) -> AppResult<Vec<ScoredAsset>>;

    /// Model name for logging and debugging
    fn name(&self) -> &'static str;
}

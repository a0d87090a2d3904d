pub mod asset;
pub mod profile;
pub mod recommendation;

pub use asset::Asset;
pub use profile::{normalize_user_id, RiskTolerance, UserProfile};
pub use recommendation::{
    AssetRecommendation, Rationale, RawRecommendationRequest, RecommendationRequest,
    RecommendationResponse, RecommendationSource,
};

/// An asset id paired with its score, as produced by a scorer
pub type ScoredAsset = (String, f64);

pub mod catalog;
pub mod rules;
pub mod scorer;
pub mod selector;

pub use catalog::AssetCatalog;
pub use rules::RuleTable;
pub use scorer::{LatentFactorModel, Scorer};
pub use selector::RecommendationSelector;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{AssetCatalog, LatentFactorModel, RecommendationSelector, RuleTable, Scorer};

/// Shared application state
///
/// Everything here is loaded once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub selector: RecommendationSelector,
    pub catalog: Arc<AssetCatalog>,
}

impl AppState {
    pub fn new(selector: RecommendationSelector, catalog: Arc<AssetCatalog>) -> Self {
        Self { selector, catalog }
    }

    /// Loads the catalog, rule table and model described by the config.
    ///
    /// A missing or broken model is not fatal: the service starts in
    /// cold-start only mode. A broken catalog is.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (catalog, rules) = match &config.catalog_path {
            Some(path) => {
                let catalog = AssetCatalog::load(path)?;
                let rules = RuleTable::from_catalog(&catalog)?;
                (catalog, rules)
            }
            None => {
                tracing::info!("CATALOG_PATH not set; using built-in rule table");
                (AssetCatalog::default(), RuleTable::builtin())
            }
        };

        let scorer: Option<Arc<dyn Scorer>> = match &config.model_path {
            Some(path) => match LatentFactorModel::load(path) {
                Ok(model) => {
                    let universe = catalog.assets().iter().map(|a| a.asset_id.clone());
                    Some(Arc::new(model.with_universe(universe)) as Arc<dyn Scorer>)
                }
                Err(e) => {
                    let error = format!("{:#}", e);
                    tracing::error!(
                        error = %error,
                        "Model failed to load; starting in cold-start only mode"
                    );
                    None
                }
            },
            None => {
                tracing::warn!("MODEL_PATH not set; starting in cold-start only mode");
                None
            }
        };

        let selector = RecommendationSelector::new(
            scorer,
            Arc::new(rules),
            config.default_top_k,
            config.max_top_k,
        );

        Ok(Self::new(selector, Arc::new(catalog)))
    }
}

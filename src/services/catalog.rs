use std::{collections::HashSet, path::Path};

use anyhow::Context;

use crate::models::Asset;

/// The asset universe known to the service, in catalog order
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    /// Builds a catalog, keeping the first occurrence of duplicate ids
    pub fn new(assets: Vec<Asset>) -> Self {
        let mut seen = HashSet::new();
        let total = assets.len();
        let assets: Vec<Asset> = assets
            .into_iter()
            .filter(|asset| seen.insert(asset.asset_id.clone()))
            .collect();

        if assets.len() != total {
            tracing::warn!(
                duplicates = total - assets.len(),
                "Dropped duplicate asset ids from catalog"
            );
        }

        Self { assets }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let assets: Vec<Asset> =
            serde_json::from_str(json).context("Failed to parse asset catalog")?;
        Ok(Self::new(assets))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read asset catalog {}", path.display()))?;
        let catalog = Self::from_json(&json)?;

        tracing::info!(
            path = %path.display(),
            assets = catalog.len(),
            "Asset catalog loaded"
        );

        Ok(catalog)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.asset_id == asset_id)
    }

    /// Asset ids whose category is one of `categories`, in catalog order
    pub fn ids_in_categories(&self, categories: &[&str]) -> Vec<String> {
        self.assets
            .iter()
            .filter(|asset| categories.iter().any(|c| asset.is_category(c)))
            .map(|asset| asset.asset_id.clone())
            .collect()
    }
}

/// Latent-factor (SVD style) collaborative-filtering model
///
/// The model is trained offline and exported as JSON. Loading it only reads
/// the learned parameters; the estimate for a (user, asset) pair is
///
/// ```text
/// r̂ = μ + b_u + b_i + p_u · q_i
/// ```
///
/// clipped to the rating scale when one is present. Assets the model never
/// saw during training are estimated from the baseline `μ + b_u` alone.
use std::{collections::HashMap, path::Path};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::ScoredAsset,
    services::scorer::Scorer,
};

/// Learned bias and factor vector for one user or one asset
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FactorRow {
    #[serde(default)]
    pub bias: f64,
    pub factors: Vec<f64>,
}

/// Serialized model artifact
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub global_mean: f64,
    #[serde(default)]
    pub rating_scale: Option<(f64, f64)>,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
    pub user_factors: HashMap<String, FactorRow>,
    pub item_factors: HashMap<String, FactorRow>,
}

#[derive(Debug, Clone)]
pub struct LatentFactorModel {
    global_mean: f64,
    rating_scale: Option<(f64, f64)>,
    users: HashMap<String, FactorRow>,
    items: HashMap<String, FactorRow>,
    /// Assets scored for every user, sorted so output order is deterministic
    universe: Vec<String>,
}

impl LatentFactorModel {
    /// Builds a model from a parsed artifact, checking factor dimensions agree
    pub fn from_artifact(artifact: ModelArtifact) -> anyhow::Result<Self> {
        let dimension = artifact
            .user_factors
            .values()
            .chain(artifact.item_factors.values())
            .map(|row| row.factors.len())
            .next()
            .unwrap_or(0);

        for (kind, rows) in [
            ("user", &artifact.user_factors),
            ("item", &artifact.item_factors),
        ] {
            if let Some((id, row)) = rows.iter().find(|(_, row)| row.factors.len() != dimension) {
                anyhow::bail!(
                    "{} factor for {} has dimension {}, expected {}",
                    kind,
                    id,
                    row.factors.len(),
                    dimension
                );
            }
        }

        if let Some((lo, hi)) = artifact.rating_scale {
            anyhow::ensure!(lo <= hi, "rating scale lower bound {} exceeds upper bound {}", lo, hi);
        }

        let mut universe: Vec<String> = artifact.item_factors.keys().cloned().collect();
        universe.sort();

        tracing::info!(
            users = artifact.user_factors.len(),
            items = artifact.item_factors.len(),
            dimension,
            trained_at = ?artifact.trained_at,
            "Latent-factor model loaded"
        );

        Ok(Self {
            global_mean: artifact.global_mean,
            rating_scale: artifact.rating_scale,
            users: artifact.user_factors,
            items: artifact.item_factors,
            universe,
        })
    }

    /// Scores `asset_ids` instead of only the assets present in the artifact.
    /// An empty list keeps the artifact's own items.
    pub fn with_universe<I>(mut self, asset_ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut universe: Vec<String> = asset_ids.into_iter().collect();
        if universe.is_empty() {
            return self;
        }
        universe.sort();
        universe.dedup();

        let unmodelled = universe
            .iter()
            .filter(|id| !self.items.contains_key(id.as_str()))
            .count();
        tracing::info!(
            assets = universe.len(),
            unmodelled,
            "Model scoring universe set from catalog"
        );

        self.universe = universe;
        self
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).context("Failed to parse model artifact")?;
        Self::from_artifact(artifact)
    }

    /// Loads the model artifact from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Estimated rating for a user row and an item row, if the model has one
    fn estimate(&self, user: &FactorRow, item: Option<&FactorRow>) -> f64 {
        let raw = match item {
            Some(item) => {
                let dot: f64 = user
                    .factors
                    .iter()
                    .zip(&item.factors)
                    .map(|(p, q)| p * q)
                    .sum();
                self.global_mean + user.bias + item.bias + dot
            }
            None => self.global_mean + user.bias,
        };

        match self.rating_scale {
            Some((lo, hi)) => raw.clamp(lo, hi),
            None => raw,
        }
    }

    fn score_user(&self, user_id: &str) -> AppResult<Vec<ScoredAsset>> {
        let user = self.users.get(user_id).ok_or_else(|| {
            AppError::ModelUnavailable(format!("user {} is not in the training set", user_id))
        })?;

        Ok(self
            .universe
            .iter()
            .map(|asset_id| {
                let score = self.estimate(user, self.items.get(asset_id));
                (asset_id.clone(), score)
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl Scorer for LatentFactorModel {
    fn knows_user(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    async fn score(&self, user_id: &str) -> AppResult<Vec<ScoredAsset>> {
        self.score_user(user_id)
    }

    fn name(&self) -> &'static str {
        "latent_factor"
    }
}

use std::collections::HashMap;

use crate::{
    models::{
        asset::{CATEGORY_BOND, CATEGORY_FUND, CATEGORY_STOCK},
        RiskTolerance, ScoredAsset,
    },
    services::catalog::AssetCatalog,
};

const BUILTIN_LOW: &[&str] = &[
    "GR0114028534",
    "GR0124034688",
    "GR0128014803",
    "GR0133011248",
    "GR0138014809",
];

const BUILTIN_MEDIUM: &[&str] = &[
    "GRS003003035",
    "GRF000153004",
    "GRS015003007",
    "GRS419003009",
    "GRF000148004",
];

const BUILTIN_HIGH: &[&str] = &[
    "GRS003003035",
    "GRS015003007",
    "GRS419003009",
    "GRS260333000",
    "GRS323003012",
];

/// Immutable cold-start mapping from risk tier to an ordered asset list
///
/// Built once at startup and shared read-only across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    tiers: HashMap<RiskTolerance, Vec<String>>,
}

impl RuleTable {
    /// Builds a table from explicit tier lists. Every tier must be present and non-empty.
    pub fn new(tiers: HashMap<RiskTolerance, Vec<String>>) -> anyhow::Result<Self> {
        for tier in RiskTolerance::ALL {
            let assets = tiers.get(&tier);
            anyhow::ensure!(
                assets.is_some_and(|a| !a.is_empty()),
                "rule table has no assets for risk tier {}",
                tier
            );
        }
        Ok(Self { tiers })
    }

    /// Table shipped with the service, used when no catalog is configured
    pub fn builtin() -> Self {
        let to_vec = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let tiers = HashMap::from([
            (RiskTolerance::Low, to_vec(BUILTIN_LOW)),
            (RiskTolerance::Medium, to_vec(BUILTIN_MEDIUM)),
            (RiskTolerance::High, to_vec(BUILTIN_HIGH)),
        ]);
        Self { tiers }
    }

    /// Derives tiers from catalog categories: bonds for low risk, stocks for
    /// high risk, stocks and mutual funds for medium. Catalog order is kept.
    pub fn from_catalog(catalog: &AssetCatalog) -> anyhow::Result<Self> {
        let tiers = RiskTolerance::ALL
            .into_iter()
            .map(|tier| (tier, catalog.ids_in_categories(Self::categories_for(tier))))
            .collect();
        Self::new(tiers)
    }

    fn categories_for(tier: RiskTolerance) -> &'static [&'static str] {
        match tier {
            RiskTolerance::Low => &[CATEGORY_BOND],
            RiskTolerance::Medium => &[CATEGORY_STOCK, CATEGORY_FUND],
            RiskTolerance::High => &[CATEGORY_STOCK],
        }
    }

    /// Full ordered list for a tier
    pub fn assets_for(&self, tier: RiskTolerance) -> &[String] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First `top_k` assets of a tier with rank-derived scores.
    ///
    /// Scores are `(len - rank) / len` over the truncated list, so the head scores
    /// 1.0 and every following entry scores strictly less.
    pub fn ranked(&self, tier: RiskTolerance, top_k: usize) -> Vec<ScoredAsset> {
        let assets = self.assets_for(tier);
        let take = assets.len().min(top_k);

        assets
            .iter()
            .take(take)
            .enumerate()
            .map(|(rank, asset_id)| {
                let score = (take - rank) as f64 / take as f64;
                (asset_id.clone(), score)
            })
            .collect()
    }
}

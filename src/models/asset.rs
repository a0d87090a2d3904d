use serde::{Deserialize, Serialize};

/// Asset category labels used by the catalog
pub const CATEGORY_BOND: &str = "Bond";
pub const CATEGORY_STOCK: &str = "Stock";
pub const CATEGORY_FUND: &str = "MTF";

/// One entry of the asset catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    /// Asset identifier (ISIN in the shipped catalog)
    #[serde(alias = "ISIN", alias = "assetId")]
    pub asset_id: String,
    #[serde(default, alias = "assetName")]
    pub name: Option<String>,
    #[serde(alias = "assetCategory")]
    pub category: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub risk: Option<String>,
}

impl Asset {
    /// Display label: the name when present, otherwise the identifier
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.asset_id)
    }

    pub fn is_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

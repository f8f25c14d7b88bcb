//! Catalog
//!
//! Garments and household items the shop prices, as returned by the catalog
//! collaborator. Each item carries one price per [`ServiceType`] and an
//! optional set of volume discount tiers.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::ids::TypedId;

/// Catalog item id.
pub type ItemId = TypedId<CatalogItem>;

/// Category id.
pub type CategoryId = TypedId<Category>;

/// Marker for category ids; categories themselves are not modelled here.
#[derive(Debug)]
pub struct Category;

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog document could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Pricing tier selected per cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Standard turnaround.
    #[default]
    Regular,

    /// Expedited turnaround.
    Express,

    /// Hand-finished care for fragile garments.
    Delicate,
}

impl ServiceType {
    /// All service tiers, in display order.
    pub const ALL: [Self; 3] = [Self::Regular, Self::Express, Self::Delicate];

    /// Wire name of the tier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Express => "express",
            Self::Delicate => "delicate",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One price point per service tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServicePrices {
    /// Regular tier price.
    #[serde(with = "rust_decimal::serde::float")]
    pub regular: Decimal,

    /// Express tier price.
    #[serde(with = "rust_decimal::serde::float")]
    pub express: Decimal,

    /// Delicate tier price.
    #[serde(with = "rust_decimal::serde::float")]
    pub delicate: Decimal,
}

impl ServicePrices {
    /// Same price for every tier.
    pub const fn flat(price: Decimal) -> Self {
        Self {
            regular: price,
            express: price,
            delicate: price,
        }
    }

    /// Price for the given tier.
    pub const fn price(&self, service: ServiceType) -> Decimal {
        match service {
            ServiceType::Regular => self.regular,
            ServiceType::Express => self.express,
            ServiceType::Delicate => self.delicate,
        }
    }
}

/// Quantity threshold unlocking a percentage off a single line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeDiscountRule {
    /// Smallest line quantity the tier applies to.
    pub min_quantity: u32,

    /// Discount in percent points (`10` is 10%).
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
}

impl VolumeDiscountRule {
    /// Create a rule from a threshold and percent points.
    pub const fn new(min_quantity: u32, discount_percent: Decimal) -> Self {
        Self {
            min_quantity,
            discount_percent,
        }
    }

    /// Whether the rule can ever apply.
    ///
    /// Zero thresholds and negative percentages are data errors upstream and
    /// are skipped rather than rejected.
    pub fn is_usable(&self) -> bool {
        self.min_quantity > 0 && self.discount_percent >= Decimal::ZERO
    }

    /// Whether a line of `quantity` units qualifies for this tier.
    pub fn qualifies(&self, quantity: u32) -> bool {
        self.is_usable() && self.min_quantity <= quantity
    }

    /// Discount as a fraction, capped at 100%.
    pub fn percentage(&self) -> Percentage {
        percent_points(self.discount_percent)
    }
}

/// Convert percent points (`10` is 10%) into a fraction clamped to `[0, 1]`.
pub fn percent_points(points: Decimal) -> Percentage {
    Percentage::from(points.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED)
}

/// Volume rules for a single item; most items have at most a few tiers.
pub type VolumeDiscounts = SmallVec<[VolumeDiscountRule; 4]>;

/// A priceable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Item id.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Owning category.
    pub category_id: CategoryId,

    /// Price per service tier.
    pub prices: ServicePrices,

    /// Volume discount tiers.
    #[serde(default, deserialize_with = "nullable_rules")]
    pub volume_discounts: VolumeDiscounts,

    /// Parent item, for variants such as "Shirt / Silk".
    #[serde(default)]
    pub parent_id: Option<ItemId>,

    /// Whether the item is offered for new lines.
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Variants, each separately selectable.
    #[serde(default, deserialize_with = "nullable_children")]
    pub children: Vec<CatalogItem>,
}

const fn default_active() -> bool {
    true
}

fn nullable_rules<'de, D>(deserializer: D) -> Result<VolumeDiscounts, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<VolumeDiscounts>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_children<'de, D>(deserializer: D) -> Result<Vec<CatalogItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<CatalogItem>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogItem {
    /// Create an active item with no volume tiers.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        category_id: impl Into<CategoryId>,
        prices: ServicePrices,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: category_id.into(),
            prices,
            volume_discounts: VolumeDiscounts::new(),
            parent_id: None,
            is_active: true,
            children: Vec::new(),
        }
    }

    /// Attach volume tiers.
    #[must_use]
    pub fn with_volume_discounts(
        mut self,
        rules: impl IntoIterator<Item = VolumeDiscountRule>,
    ) -> Self {
        self.volume_discounts = rules.into_iter().collect();
        self
    }

    /// Attach child variants.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = CatalogItem>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Price for the given tier.
    pub const fn price(&self, service: ServiceType) -> Decimal {
        self.prices.price(service)
    }

    /// Best volume tier for `quantity`: the highest threshold not exceeding
    /// it. Tiers do not stack.
    pub fn best_volume_rule(&self, quantity: u32) -> Option<&VolumeDiscountRule> {
        self.volume_discounts
            .iter()
            .filter(|rule| rule.qualifies(quantity))
            .max_by_key(|rule| rule.min_quantity)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    items: Vec<CatalogItem>,
}

/// Item lookup with children flattened alongside their parents.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: FxHashMap<ItemId, CatalogItem>,
}

impl Catalog {
    /// Build a catalog from the collaborator's item tree.
    ///
    /// Later duplicates of an id replace earlier ones.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut catalog = Self::default();

        for item in items {
            catalog.insert(item);
        }

        catalog
    }

    /// Parse a YAML catalog document with a top-level `items` list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] when the document is malformed.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_norway::from_str(contents)?;

        Ok(Self::from_items(document.items))
    }

    fn insert(&mut self, mut item: CatalogItem) {
        for mut child in std::mem::take(&mut item.children) {
            if child.parent_id.is_none() {
                child.parent_id = Some(item.id.clone());
            }

            self.insert(child);
        }

        self.items.insert(item.id.clone(), item);
    }

    /// Look up an item; missing ids are not an error.
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    /// Items that may be added to a cart, sorted by name.
    pub fn selectable(&self) -> Vec<&CatalogItem> {
        let mut items: Vec<_> = self.items.values().filter(|item| item.is_active).collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        items
    }

    /// Number of items, children included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

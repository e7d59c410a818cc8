//! Catalog read models: menu items, categories, dashboard and offer banners.
//!
//! The cart only ever holds a copy of a [`MenuItemRef`] taken when the item was
//! added. Identity is the backend's opaque string id ([`MenuItemId`]), never a
//! value derived from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for catalog items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub String);

impl MenuItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MenuItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MenuItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog item as the cart and menu views need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRef {
    #[serde(rename = "_id")]
    pub id: MenuItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_veg: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub packaging_cost: Option<Decimal>,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
}

fn available_by_default() -> bool {
    true
}

impl MenuItemRef {
    /// Creates a menu item with the fields the cart cares about.
    ///
    /// Remaining fields start empty; use struct update syntax to fill them.
    pub fn new(id: impl Into<MenuItemId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image: String::new(),
            is_veg: false,
            category: String::new(),
            packaging_cost: None,
            is_available: true,
        }
    }

    /// Dietary label shown on menu cards.
    pub fn diet_label(&self) -> &'static str {
        if self.is_veg {
            "Veg"
        } else {
            "Non Veg"
        }
    }
}

/// A menu category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Server-side filters for the menu listing.
///
/// Unset options are omitted from the query string. A category of `"All"` is
/// treated as no category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuFilters {
    pub page: u32,
    pub limit: u32,
    pub is_available: Option<bool>,
    pub is_veg: Option<bool>,
    pub category_name: Option<String>,
}

impl Default for MenuFilters {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            is_available: None,
            is_veg: None,
            category_name: None,
        }
    }
}

impl MenuFilters {
    /// Query pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(available) = self.is_available {
            pairs.push(("isAvailable", available.to_string()));
        }
        if let Some(veg) = self.is_veg {
            pairs.push(("isVeg", veg.to_string()));
        }
        if let Some(category) = self.category_name.as_deref() {
            if !category.is_empty() && category != "All" {
                pairs.push(("categoryName", category.to_string()));
            }
        }
        pairs
    }
}

/// Facet counts returned alongside a menu page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCounts {
    #[serde(default)]
    pub vegetarian: u32,
    #[serde(default)]
    pub non_vegetarian: u32,
    #[serde(default)]
    pub unavailable: u32,
}

/// One page of the filtered menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuPage {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub counts: MenuCounts,
    #[serde(default)]
    pub menus: Vec<MenuItemRef>,
}

/// One page of categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPage {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Reporting window for the revenue dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardRange {
    Today,
    #[default]
    Weekly,
    Monthly,
}

impl DashboardRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardRange::Today => "today",
            DashboardRange::Weekly => "weekly",
            DashboardRange::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    #[serde(default)]
    pub today: Decimal,
    #[serde(default)]
    pub weekly: Decimal,
    #[serde(default)]
    pub monthly: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSales {
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingItem {
    pub menu_details: MenuItemRef,
    #[serde(default)]
    pub total_quantity: u32,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub average_price: Decimal,
    #[serde(default)]
    pub this_week: PeriodSales,
    #[serde(default)]
    pub last_week: PeriodSales,
    #[serde(default)]
    pub week_growth: Decimal,
    #[serde(default)]
    pub revenue_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(default)]
    pub total: Decimal,
}

/// Home page dashboard: revenue and best sellers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default)]
    pub revenue: Revenue,
    #[serde(default)]
    pub top_selling_items: Vec<TopSellingItem>,
    #[serde(default)]
    pub top_categories: Vec<CategoryTotal>,
}

/// A promotional banner shown in the offers carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferBanner {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub image_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "available_by_default")]
    pub is_active: bool,
}

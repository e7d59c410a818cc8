//! # Menu Client
//!
//! Read-only catalog endpoints: menu listing, categories, the home dashboard
//! and offer banners. None of them are session scoped.

use crate::clients::api::{ApiError, HttpCore};
use crate::model::{CategoryPage, Dashboard, DashboardRange, MenuFilters, MenuPage, OfferBanner};
use reqwest::{Method, Url};
use tracing::{debug, instrument};

pub const DEFAULT_CATEGORY_PAGE: u32 = 1;
pub const DEFAULT_CATEGORY_LIMIT: u32 = 90;

#[derive(Clone)]
pub struct MenuClient {
    http: HttpCore,
}

impl MenuClient {
    pub fn new(http: HttpCore) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn menu_items(&self, filters: &MenuFilters) -> Result<MenuPage, ApiError> {
        let request = self
            .http
            .request(Method::GET, "/menu/getAllMenuItems")
            .query(&filters.query_pairs());
        let page: MenuPage = self.http.fetch(request).await?;
        debug!(total = page.total, returned = page.menus.len(), "Menu page fetched");
        Ok(page)
    }

    #[instrument(skip(self))]
    pub async fn categories(&self, page: u32, limit: u32) -> Result<CategoryPage, ApiError> {
        let request = self
            .http
            .request(Method::GET, "/category/getAllCategory")
            .query(&[("page", page), ("limit", limit)]);
        self.http.fetch(request).await
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self, range: DashboardRange) -> Result<Dashboard, ApiError> {
        let request = self
            .http
            .request(Method::GET, "/dashboard/RevenueDashboard")
            .query(&[("range", range.as_str())]);
        self.http.fetch(request).await
    }

    /// Active promotional banners, in backend order.
    #[instrument(skip(self))]
    pub async fn offer_banners(&self) -> Result<Vec<OfferBanner>, ApiError> {
        let request = self.http.request(Method::GET, "/offer/getOfferBanners");
        let banners: Vec<OfferBanner> = self.http.fetch(request).await?;
        Ok(banners.into_iter().filter(|banner| banner.is_active).collect())
    }
}

/// Normalises an image reference from the catalog.
///
/// Empty input yields `None`. Site-relative paths are kept as they are.
/// Absolute URLs are kept only if they parse and their host is in `allowed_hosts`.
pub fn image_url(raw: &str, allowed_hosts: &[String]) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with('/') {
        return Some(raw.to_string());
    }

    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    if allowed_hosts.iter().any(|allowed| allowed.eq_ignore_ascii_case(host)) {
        Some(raw.to_string())
    } else {
        debug!(host, "Image host not allowed");
        None
    }
}

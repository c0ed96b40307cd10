//! Filter → catalog lookup translation
//!
//! The assistant handler never talks to the product store directly; it turns
//! an extracted [`Filter`] into a [`CatalogQuery`] and hands the query pairs
//! to the catalog listing endpoint. The same query can be evaluated in
//! process against a list of [`ProductSummary`] records with the catalog's
//! matching and paging rules.

use serde::{Deserialize, Serialize};

use crate::filters::Filter;
use crate::vocabulary::Category;

/// Page size the assistant requests from the catalog
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Catalog listing lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-indexed page number
    pub page: u32,
    pub limit: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            search: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Product fields the catalog matches against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub seller_name: String,
}

/// One page of a catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<ProductSummary>,
    /// Matching records across all pages
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl CatalogQuery {
    /// Lookup for an extracted filter (first page, default page size)
    pub fn from_filter(filter: &Filter) -> Self {
        let search = filter.search.trim();
        Self {
            category: filter.category,
            min_price: filter.min_price,
            max_price: filter.max_price,
            search: (!search.is_empty()).then(|| search.to_string()),
            ..Default::default()
        }
    }

    /// Same lookup without the category constraint
    ///
    /// Returns `None` when there is no category to relax; the assistant only
    /// retries when a category-constrained lookup comes back empty.
    pub fn without_category(&self) -> Option<Self> {
        self.category?;
        Some(Self {
            category: None,
            ..self.clone()
        })
    }

    /// Query-string pairs using the catalog's parameter names
    ///
    /// Absent values are omitted rather than sent empty.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category", category.as_str().to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }

    /// Number of records to skip for this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Total pages for `total` matching records
    pub fn pages(&self, total: u64) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        total.div_ceil(u64::from(self.limit))
    }

    /// Catalog matching rules
    ///
    /// Category equality, inclusive price bounds, and a case-insensitive
    /// substring match of the search string against title, description or
    /// seller name.
    pub fn matches(&self, product: &ProductSummary) -> bool {
        if let Some(category) = self.category {
            if product.category != category.as_str() {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < f64::from(min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > f64::from(max) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [&product.title, &product.description, &product.seller_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Evaluate the lookup against `products`
    ///
    /// Input order is kept; callers pass products newest first, as the
    /// catalog lists them.
    pub fn run(&self, products: &[ProductSummary]) -> CatalogPage {
        let matching: Vec<&ProductSummary> =
            products.iter().filter(|p| self.matches(p)).collect();
        let total = matching.len() as u64;
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(self.limit as usize)
            .cloned()
            .collect();

        CatalogPage {
            items,
            total,
            page: self.page,
            pages: self.pages(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::extract_filters;

    fn product(title: &str, price: f64, category: &str) -> ProductSummary {
        ProductSummary {
            title: title.to_string(),
            description: String::new(),
            price,
            category: category.to_string(),
            seller_name: "Meera Crafts".to_string(),
        }
    }

    #[test]
    fn test_from_filter_copies_bounds() {
        let query = CatalogQuery::from_filter(&extract_filters("necklace between 300 and 800"));
        assert_eq!(query.category, Some(Category::Jewelry));
        assert_eq!(query.min_price, Some(300));
        assert_eq!(query.max_price, Some(800));
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_empty_filter_has_no_search() {
        let query = CatalogQuery::from_filter(&Filter::default());
        assert_eq!(query.search, None);
        assert_eq!(
            query.to_query_pairs(),
            vec![("page", "1".to_string()), ("limit", "24".to_string())]
        );
    }

    #[test]
    fn test_without_category() {
        let query = CatalogQuery {
            category: Some(Category::Textiles),
            max_price: Some(900),
            ..Default::default()
        };
        let relaxed = query.without_category().unwrap();
        assert_eq!(relaxed.category, None);
        assert_eq!(relaxed.max_price, Some(900));
        assert!(relaxed.without_category().is_none());
    }

    #[test]
    fn test_matches_price_bounds_inclusive() {
        let query = CatalogQuery {
            min_price: Some(200),
            max_price: Some(500),
            ..Default::default()
        };
        assert!(query.matches(&product("Mug", 200.0, "crafts")));
        assert!(query.matches(&product("Mug", 500.0, "crafts")));
        assert!(!query.matches(&product("Mug", 500.5, "crafts")));
    }

    #[test]
    fn test_matches_search_on_seller_name() {
        let query = CatalogQuery {
            search: Some("meera".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&product("Vase", 300.0, "pottery")));
        let query = CatalogQuery {
            search: Some("brass".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&product("Vase", 300.0, "pottery")));
    }

    #[test]
    fn test_run_pages_matching_products() {
        let products: Vec<ProductSummary> = (1..=5u32)
            .map(|i| product(&format!("Ring {i}"), 100.0 * f64::from(i), "jewelry"))
            .chain(std::iter::once(product("Scarf", 150.0, "textiles")))
            .collect();
        let query = CatalogQuery {
            category: Some(Category::Jewelry),
            max_price: Some(400),
            page: 2,
            limit: 3,
            ..Default::default()
        };

        let page = query.run(&products);
        assert_eq!(page.total, 4);
        assert_eq!(page.pages, 2);
        assert_eq!(page.page, 2);
        let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Ring 4"]);
    }

    #[test]
    fn test_run_past_last_page_is_empty() {
        let query = CatalogQuery {
            page: 9,
            ..Default::default()
        };
        let page = query.run(&[product("Mug", 200.0, "crafts")]);
        assert_eq!(page.total, 1);
        assert_eq!(page.pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_pagination() {
        let query = CatalogQuery {
            page: 3,
            ..Default::default()
        };
        assert_eq!(query.offset(), 48);
        assert_eq!(query.pages(49), 3);
        assert_eq!(query.pages(0), 0);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendorclub_core::{DomainError, DomainResult, Money, ProductId, WholesalerId, required};

use crate::stock::{StockStatus, validate_stock};

/// A catalog product owned by one wholesaler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub wholesaler_id: WholesalerId,
    pub name: String,
    pub category: Option<String>,
    pub price: Money,
    pub stock: i64,
    pub status: StockStatus,
    pub group_buy_eligible: bool,
    pub image_path: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product from a validated draft.
    pub fn create(
        id: ProductId,
        wholesaler_id: WholesalerId,
        draft: ProductDraft,
        image_path: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wholesaler_id,
            status: draft.status(),
            name: draft.name,
            category: draft.category,
            price: draft.price,
            stock: draft.stock,
            group_buy_eligible: true,
            image_path,
            views: 0,
            likes: 0,
            created_at,
        }
    }

    /// Set the stock count and recompute the status label.
    pub fn set_stock(&mut self, stock: i64) -> DomainResult<StockStatus> {
        self.stock = validate_stock(stock)?;
        self.status = StockStatus::from_stock(self.stock);
        Ok(self.status)
    }

    /// Apply an edit. The image is only replaced when a new one is given.
    pub fn apply_edit(&mut self, draft: ProductDraft, new_image: Option<String>) {
        self.status = draft.status();
        self.name = draft.name;
        self.category = draft.category;
        self.price = draft.price;
        self.stock = draft.stock;
        if new_image.is_some() {
            self.image_path = new_image;
        }
    }

    pub fn is_owned_by(&self, wholesaler_id: WholesalerId) -> bool {
        self.wholesaler_id == wholesaler_id
    }
}

/// Raw add/edit product form fields.
///
/// The category arrives as `main_category` from the current form and as
/// `category` from older clients; `subcategory` is accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub main_category: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: String,
    pub stock: String,
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category: Option<String>,
    pub price: Money,
    pub stock: i64,
}

impl ProductDraft {
    pub fn status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }
}

impl ProductForm {
    pub fn validate(self) -> DomainResult<ProductDraft> {
        let name = required("name", &self.name)?;

        let category = [self.main_category, self.category]
            .into_iter()
            .flatten()
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty());

        let price = Money::parse(&self.price)?;

        let stock: i64 = self
            .stock
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid stock: '{}'", self.stock.trim())))?;
        let stock = validate_stock(stock)?;

        Ok(ProductDraft {
            name,
            category,
            price,
            stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(stock: &str) -> ProductForm {
        ProductForm {
            name: "Organic Tomatoes".into(),
            main_category: Some("Vegetables".into()),
            category: None,
            subcategory: Some("Tomatoes".into()),
            price: "45".into(),
            stock: stock.into(),
        }
    }

    fn product(stock: &str) -> Product {
        Product::create(
            ProductId::new(),
            WholesalerId::new(),
            form(stock).validate().unwrap(),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn create_derives_status_from_stock() {
        assert_eq!(product("500").status, StockStatus::InStock);
        assert_eq!(product("20").status, StockStatus::LowStock);
        assert_eq!(product("0").status, StockStatus::OutOfStock);
    }

    #[test]
    fn setting_stock_to_zero_marks_out_of_stock() {
        let mut p = product("500");
        let status = p.set_stock(0).unwrap();
        assert_eq!(status, StockStatus::OutOfStock);
        assert_eq!(p.stock, 0);
        assert_eq!(p.status, StockStatus::OutOfStock);
    }

    #[test]
    fn negative_stock_leaves_product_untouched() {
        let mut p = product("30");
        assert!(p.set_stock(-5).is_err());
        assert_eq!(p.stock, 30);
        assert_eq!(p.status, StockStatus::LowStock);
    }

    #[test]
    fn category_prefers_main_category_then_legacy_field() {
        let draft = form("10").validate().unwrap();
        assert_eq!(draft.category.as_deref(), Some("Vegetables"));

        let mut legacy = form("10");
        legacy.main_category = Some("  ".into());
        legacy.category = Some("Grains & Cereals".into());
        assert_eq!(legacy.validate().unwrap().category.as_deref(), Some("Grains & Cereals"));

        let mut none = form("10");
        none.main_category = None;
        assert_eq!(none.validate().unwrap().category, None);
    }

    #[test]
    fn rejects_bad_price_and_stock() {
        let mut f = form("10");
        f.price = "forty".into();
        assert!(f.validate().is_err());

        assert!(form("ten").validate().is_err());
        assert!(form("-3").validate().is_err());
        assert!(form("2.5").validate().is_err());
    }

    #[test]
    fn edit_keeps_image_unless_replaced() {
        let mut p = product("10");
        p.image_path = Some("uploads/old.png".into());

        p.apply_edit(form("60").validate().unwrap(), None);
        assert_eq!(p.image_path.as_deref(), Some("uploads/old.png"));
        assert_eq!(p.status, StockStatus::InStock);

        p.apply_edit(form("60").validate().unwrap(), Some("uploads/new.png".into()));
        assert_eq!(p.image_path.as_deref(), Some("uploads/new.png"));
    }
}

//! # Catalog
//!
//! Product CRUD and stock adjustment on [`StoreState`].
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_product(id, draft)    validate → barcode unique → push            │
//! │  update_product(product)   validate → must exist → replace in place    │
//! │  delete_product(id)        must exist → remove                         │
//! │  apply_stock_delta(id, n)  crate-internal; only the ledger commit      │
//! │                            calls it                                     │
//! │                                                                         │
//! │  product / find_by_barcode / search_products    read-only lookups      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::state::StoreState;
use crate::types::{NewProduct, Product};
use crate::validation::{
    validate_barcode, validate_new_product, validate_price, validate_product_name,
    validate_search_query, validate_stock,
};

impl StoreState {
    // =========================================================================
    // Reads
    // =========================================================================

    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a product by exact barcode. Empty barcodes never match.
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        if barcode.is_empty() {
            return None;
        }
        self.products.iter().find(|p| p.barcode == barcode)
    }

    /// Products whose name contains `term` (case-insensitive) or whose
    /// barcode contains `term`. An empty term matches everything.
    pub fn search_products(&self, term: &str) -> CoreResult<Vec<&Product>> {
        let term = validate_search_query(term)?;
        let needle = term.to_lowercase();

        Ok(self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle) || p.barcode.contains(&term))
            .collect())
    }

    /// Number of products with stock below `threshold`.
    pub fn low_stock_count(&self, threshold: i64) -> usize {
        self.products
            .iter()
            .filter(|p| p.is_low_stock(threshold))
            .count()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends a new product under `id`.
    ///
    /// ## Errors
    /// - `Validation` for an invalid draft or a barcode already in use
    pub fn add_product(&mut self, id: String, draft: NewProduct) -> CoreResult<Product> {
        validate_new_product(&draft)?;
        self.ensure_barcode_free(&draft.barcode, None)?;

        let product = Product::from_draft(id, draft);
        self.products.push(product.clone());
        Ok(product)
    }

    /// Replaces the product with the same id, keeping its position.
    ///
    /// A stock value is only checked when it differs from the stored one.
    ///
    /// ## Errors
    /// - `ProductNotFound` if no product has this id
    /// - `Validation` for invalid fields or a barcode used by another product
    pub fn update_product(&mut self, product: Product) -> CoreResult<()> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == product.id)
            .ok_or_else(|| CoreError::ProductNotFound(product.id.clone()))?;

        validate_product_name(&product.name)?;
        validate_price(product.price)?;
        // Oversold products keep their negative stock through unrelated edits.
        if product.stock != self.products[index].stock {
            validate_stock(product.stock)?;
        }
        validate_barcode(&product.barcode)?;
        self.ensure_barcode_free(&product.barcode, Some(&product.id))?;

        self.products[index] = product;
        Ok(())
    }

    /// Removes a product. Sales that reference it are left untouched.
    pub fn delete_product(&mut self, id: &str) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        Ok(self.products.remove(index))
    }

    /// Decrements stock of `product_id` by `quantity`.
    ///
    /// Returns `false` and changes nothing when no product has this id.
    pub(crate) fn apply_stock_delta(&mut self, product_id: &str, quantity: i64) -> bool {
        match self.products.iter_mut().find(|p| p.id == product_id) {
            Some(product) => {
                product.stock = product.stock.saturating_sub(quantity);
                true
            }
            None => false,
        }
    }

    fn ensure_barcode_free(&self, barcode: &str, owner: Option<&str>) -> CoreResult<()> {
        if barcode.is_empty() {
            return Ok(());
        }

        let taken = self
            .products
            .iter()
            .any(|p| p.barcode == barcode && Some(p.id.as_str()) != owner);

        if taken {
            return Err(ValidationError::Duplicate {
                field: "barcode".to_string(),
                value: barcode.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

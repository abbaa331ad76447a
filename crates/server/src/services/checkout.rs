//! The checkout engine.
//!
//! Converts a user's cart into a committed purchase: validates stock for
//! every line, decrements stock, records one itemized history entry, and
//! drains the cart - all inside a single transaction, or not at all.
//!
//! Two properties carry the whole design:
//!
//! - **Validate all before mutating any.** Duplicate cart lines for the same
//!   product are summed into one demand before the stock comparison, so two
//!   lines that individually fit cannot jointly oversell. If any summed
//!   demand exceeds stock, no row is touched.
//! - **Row locks close the read-check-decrement race.** Demanded products
//!   are loaded `FOR UPDATE` in id order; a concurrent checkout on the same
//!   product blocks until this transaction commits or rolls back, so stock
//!   can never be driven negative by interleaved reads.
//!
//! Planning (demand summation, stock comparison, itemization) is pure and
//! unit-tested without a database; the async half only sequences SQL.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use market_lane_core::{ProductId, UserId};

use crate::db::checkout::{self, LockedProduct};
use crate::db::{CheckoutRepository, RepositoryError};
use crate::models::{CartLine, CheckoutItem, CheckoutRecord};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user's cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references a product that no longer exists.
    #[error("product {0} not found")]
    ProductMissing(ProductId),

    /// Summed demand for a product exceeds its available stock.
    #[error("not enough stock for product ID {product_id}")]
    InsufficientStock {
        /// The offending product.
        product_id: ProductId,
        /// Total units requested across all cart lines.
        requested: i64,
        /// Units actually available.
        available: i32,
    },

    /// Storage failure; the transaction was rolled back.
    #[error("storage failure: {0}")]
    Repository(#[from] RepositoryError),
}

/// The fully validated outcome of planning a checkout.
///
/// Produced only when every demand fits in stock; applying it cannot
/// violate the non-negative stock invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckoutPlan {
    /// Per-product stock decrements, in id order.
    pub(crate) decrements: Vec<(ProductId, i32)>,
    /// Itemized snapshot, one entry per cart line.
    pub(crate) items: Vec<CheckoutItem>,
    /// Aggregate amount across all items.
    pub(crate) total_amount: Decimal,
}

/// Sum cart lines into per-product demand.
///
/// The map is ordered by product id; callers rely on that for a consistent
/// lock-acquisition order. Sums are `i64` so pathological carts cannot
/// overflow before the stock comparison rejects them.
pub(crate) fn demand_by_product(lines: &[CartLine]) -> BTreeMap<ProductId, i64> {
    let mut demand = BTreeMap::new();
    for line in lines {
        *demand.entry(line.product_id).or_insert(0_i64) += i64::from(line.quantity.get());
    }
    demand
}

/// Validate every demand against locked stock and build the plan.
///
/// Fails without producing any mutation if any product is missing or any
/// summed demand exceeds stock - including demands that would individually
/// have fit.
pub(crate) fn build_plan(
    lines: &[CartLine],
    demand: &BTreeMap<ProductId, i64>,
    products: &BTreeMap<ProductId, LockedProduct>,
) -> Result<CheckoutPlan, CheckoutError> {
    let mut decrements = Vec::with_capacity(demand.len());
    for (&product_id, &requested) in demand {
        let product = products
            .get(&product_id)
            .ok_or(CheckoutError::ProductMissing(product_id))?;

        if requested > i64::from(product.stock) {
            return Err(CheckoutError::InsufficientStock {
                product_id,
                requested,
                available: product.stock,
            });
        }

        // requested <= stock <= i32::MAX at this point
        decrements.push((product_id, i32::try_from(requested).unwrap_or(i32::MAX)));
    }

    let mut items = Vec::with_capacity(lines.len());
    let mut total_amount = Decimal::ZERO;
    for line in lines {
        let product = products
            .get(&line.product_id)
            .ok_or(CheckoutError::ProductMissing(line.product_id))?;

        let quantity = line.quantity.get();
        let amount = product.price * Decimal::from(quantity);
        total_amount += amount;
        items.push(CheckoutItem {
            product_id: line.product_id,
            quantity,
            price: product.price,
            amount,
        });
    }

    Ok(CheckoutPlan {
        decrements,
        items,
        total_amount,
    })
}

/// The checkout engine.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into a committed purchase.
    ///
    /// All-or-nothing: on any failure the transaction rolls back and no
    /// stock counter or cart row has observably changed. An aborted request
    /// (client disconnect before commit) drops the transaction guard, which
    /// likewise rolls back.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines,
    /// `CheckoutError::ProductMissing` if a referenced product was deleted,
    /// `CheckoutError::InsufficientStock` if any summed demand exceeds
    /// stock, and `CheckoutError::Repository` on storage failure.
    pub async fn checkout(&self, user_id: UserId) -> Result<CheckoutRecord, CheckoutError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let lines = checkout::lines_for_user(&mut tx, user_id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let demand = demand_by_product(&lines);
        let product_ids: Vec<ProductId> = demand.keys().copied().collect();
        let products = checkout::products_for_update(&mut tx, &product_ids).await?;

        let plan = build_plan(&lines, &demand, &products)?;

        for &(product_id, by) in &plan.decrements {
            checkout::decrement_stock(&mut tx, product_id, by).await?;
        }

        let record =
            checkout::insert_record(&mut tx, user_id, &plan.items, plan.total_amount).await?;
        let drained = checkout::clear_cart(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            user_id = %user_id,
            checkout_id = %record.id,
            lines = drained,
            total = %record.total_amount,
            "checkout committed"
        );

        Ok(record)
    }

    /// The user's checkout records, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` on storage failure.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<CheckoutRecord>, CheckoutError> {
        let records = CheckoutRepository::new(self.pool)
            .history_for_user(user_id)
            .await?;
        Ok(records)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use market_lane_core::{CartLineId, Quantity};

    use super::*;

    fn line(id: i32, product_id: i32, quantity: i32) -> CartLine {
        CartLine {
            id: CartLineId::new(id),
            user_id: UserId::new(1),
            product_id: ProductId::new(product_id),
            quantity: Quantity::new(quantity).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn locked(id: i32, price: &str, stock: i32) -> (ProductId, LockedProduct) {
        let product_id = ProductId::new(id);
        (
            product_id,
            LockedProduct {
                id: product_id,
                price: price.parse().unwrap(),
                stock,
            },
        )
    }

    fn plan_for(
        lines: &[CartLine],
        products: &BTreeMap<ProductId, LockedProduct>,
    ) -> Result<CheckoutPlan, CheckoutError> {
        let demand = demand_by_product(lines);
        build_plan(lines, &demand, products)
    }

    #[test]
    fn test_demand_sums_duplicate_lines() {
        let lines = vec![line(1, 10, 2), line(2, 11, 1), line(3, 10, 3)];
        let demand = demand_by_product(&lines);

        assert_eq!(demand.get(&ProductId::new(10)), Some(&5));
        assert_eq!(demand.get(&ProductId::new(11)), Some(&1));
        assert_eq!(demand.len(), 2);
    }

    #[test]
    fn test_plan_succeeds_when_demand_fits() {
        let lines = vec![line(1, 10, 2), line(2, 10, 2)];
        let products = BTreeMap::from([locked(10, "3.50", 5)]);

        let plan = plan_for(&lines, &products).unwrap();

        assert_eq!(plan.decrements, vec![(ProductId::new(10), 4)]);
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.total_amount, "14.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_duplicate_lines_summed_before_stock_check() {
        // Each line individually fits (3 <= 5) but the sum (6) does not.
        let lines = vec![line(1, 10, 3), line(2, 10, 3)];
        let products = BTreeMap::from([locked(10, "1.00", 5)]);

        let err = plan_for(&lines, &products).unwrap_err();
        match err {
            CheckoutError::InsufficientStock {
                product_id,
                requested,
                available,
            } => {
                assert_eq!(product_id, ProductId::new(10));
                assert_eq!(requested, 6);
                assert_eq!(available, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_one_short_product_fails_entire_plan() {
        // Product 11 fits; product 10 does not. Nothing may be decremented,
        // so planning fails outright.
        let lines = vec![line(1, 10, 9), line(2, 11, 1)];
        let products = BTreeMap::from([locked(10, "1.00", 5), locked(11, "2.00", 100)]);

        assert!(matches!(
            plan_for(&lines, &products),
            Err(CheckoutError::InsufficientStock {
                product_id,
                ..
            }) if product_id == ProductId::new(10)
        ));
    }

    #[test]
    fn test_missing_product_fails_plan() {
        let lines = vec![line(1, 10, 1), line(2, 99, 1)];
        let products = BTreeMap::from([locked(10, "1.00", 5)]);

        assert!(matches!(
            plan_for(&lines, &products),
            Err(CheckoutError::ProductMissing(id)) if id == ProductId::new(99)
        ));
    }

    #[test]
    fn test_demand_exactly_equal_to_stock_passes() {
        let lines = vec![line(1, 10, 5)];
        let products = BTreeMap::from([locked(10, "2.00", 5)]);

        let plan = plan_for(&lines, &products).unwrap();
        assert_eq!(plan.decrements, vec![(ProductId::new(10), 5)]);
    }

    #[test]
    fn test_items_snapshot_price_and_amount_per_line() {
        let lines = vec![line(1, 10, 2), line(2, 11, 3)];
        let products = BTreeMap::from([locked(10, "1.25", 10), locked(11, "0.40", 10)]);

        let plan = plan_for(&lines, &products).unwrap();

        assert_eq!(plan.items[0].product_id, ProductId::new(10));
        assert_eq!(plan.items[0].quantity, 2);
        assert_eq!(plan.items[0].price, "1.25".parse::<Decimal>().unwrap());
        assert_eq!(plan.items[0].amount, "2.50".parse::<Decimal>().unwrap());

        assert_eq!(plan.items[1].amount, "1.20".parse::<Decimal>().unwrap());
        assert_eq!(plan.total_amount, "3.70".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_worked_example_from_stock_five() {
        // stock=5; two lines of 2 succeed leaving 1...
        let products = BTreeMap::from([locked(10, "1.00", 5)]);
        let two_lines = vec![line(1, 10, 2), line(2, 10, 2)];
        let plan = plan_for(&two_lines, &products).unwrap();
        assert_eq!(plan.decrements, vec![(ProductId::new(10), 4)]);

        // ...while a third line of 2 (sum 6) fails and plans nothing.
        let three_lines = vec![line(1, 10, 2), line(2, 10, 2), line(3, 10, 2)];
        assert!(matches!(
            plan_for(&three_lines, &products),
            Err(CheckoutError::InsufficientStock { requested: 6, available: 5, .. })
        ));
    }

    #[test]
    fn test_empty_lines_yield_empty_demand() {
        assert!(demand_by_product(&[]).is_empty());
    }
}

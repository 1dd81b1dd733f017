//! Admin dispatch board: grouping outstanding order items and allocating
//! dispatched quantities back onto individual orders.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// One aggregated row of outstanding quantity for a hostel and product.
#[derive(Debug, Clone)]
pub struct PendingLine {
    pub hostel: String,
    pub category_id: Option<DbId>,
    pub category_name: String,
    pub product_id: DbId,
    pub product_name: String,
    pub pending_quantity: i64,
    pub order_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductGroup {
    pub product_id: DbId,
    pub product_name: String,
    pub pending_quantity: i64,
    pub order_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category_id: Option<DbId>,
    pub category_name: String,
    pub pending_quantity: i64,
    pub products: Vec<ProductGroup>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HostelGroup {
    pub hostel: String,
    pub pending_quantity: i64,
    pub categories: Vec<CategoryGroup>,
}

/// Group outstanding lines hostel -> category -> product.
///
/// Hostels and categories are sorted by name, products by name within a
/// category. Lines with no outstanding quantity are skipped.
pub fn group_by_hostel(lines: Vec<PendingLine>) -> Vec<HostelGroup> {
    let mut tree: BTreeMap<String, BTreeMap<(String, Option<DbId>), Vec<ProductGroup>>> =
        BTreeMap::new();

    for line in lines.into_iter().filter(|l| l.pending_quantity > 0) {
        tree.entry(line.hostel)
            .or_default()
            .entry((line.category_name, line.category_id))
            .or_default()
            .push(ProductGroup {
                product_id: line.product_id,
                product_name: line.product_name,
                pending_quantity: line.pending_quantity,
                order_count: line.order_count,
            });
    }

    tree.into_iter()
        .map(|(hostel, categories)| {
            let categories: Vec<CategoryGroup> = categories
                .into_iter()
                .map(|((category_name, category_id), mut products)| {
                    products.sort_by(|a, b| a.product_name.cmp(&b.product_name));
                    CategoryGroup {
                        category_id,
                        category_name,
                        pending_quantity: products.iter().map(|p| p.pending_quantity).sum(),
                        products,
                    }
                })
                .collect();
            HostelGroup {
                hostel,
                pending_quantity: categories.iter().map(|c| c.pending_quantity).sum(),
                categories,
            }
        })
        .collect()
}

/// An order item that still has undispatched units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingItem {
    pub order_item_id: DbId,
    pub order_id: DbId,
    pub remaining: i32,
}

/// Units to mark as dispatched on one order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub order_item_id: DbId,
    pub order_id: DbId,
    pub quantity: i32,
}

/// Spread `quantity` dispatched units over outstanding items in the given
/// order (callers pass them oldest order first).
///
/// Fails when `quantity` is not positive or exceeds the total outstanding.
pub fn allocate(items: &[OutstandingItem], quantity: i32) -> Result<Vec<Allocation>, CoreError> {
    if quantity <= 0 {
        return Err(CoreError::Validation("quantity must be positive".into()));
    }
    let outstanding: i64 = items.iter().map(|i| i64::from(i.remaining.max(0))).sum();
    if i64::from(quantity) > outstanding {
        return Err(CoreError::Validation(format!(
            "Cannot dispatch {quantity} units; only {outstanding} outstanding"
        )));
    }

    let mut left = quantity;
    let mut allocations = Vec::new();
    for item in items {
        if left == 0 {
            break;
        }
        let take = item.remaining.max(0).min(left);
        if take > 0 {
            allocations.push(Allocation {
                order_item_id: item.order_item_id,
                order_id: item.order_id,
                quantity: take,
            });
            left -= take;
        }
    }
    Ok(allocations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(hostel: &str, category: &str, product_id: DbId, name: &str, qty: i64) -> PendingLine {
        PendingLine {
            hostel: hostel.into(),
            category_id: Some(1),
            category_name: category.into(),
            product_id,
            product_name: name.into(),
            pending_quantity: qty,
            order_count: 1,
        }
    }

    #[test]
    fn groups_nest_and_sum() {
        let groups = group_by_hostel(vec![
            pending("Hostel B", "Cakes", 1, "Red Velvet", 2),
            pending("Hostel A", "Cakes", 2, "Black Forest", 3),
            pending("Hostel A", "Cakes", 1, "Red Velvet", 1),
            pending("Hostel A", "Cakes", 3, "Empty", 0),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].hostel, "Hostel A");
        assert_eq!(groups[0].pending_quantity, 4);
        let products = &groups[0].categories[0].products;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_name, "Black Forest");
        assert_eq!(groups[1].pending_quantity, 2);
    }

    #[test]
    fn allocation_fills_oldest_first() {
        let items = vec![
            OutstandingItem { order_item_id: 10, order_id: 1, remaining: 2 },
            OutstandingItem { order_item_id: 11, order_id: 2, remaining: 3 },
        ];
        let allocations = allocate(&items, 4).unwrap();
        assert_eq!(
            allocations,
            vec![
                Allocation { order_item_id: 10, order_id: 1, quantity: 2 },
                Allocation { order_item_id: 11, order_id: 2, quantity: 2 },
            ]
        );
    }

    #[test]
    fn allocation_rejects_overdispatch() {
        let items = vec![OutstandingItem { order_item_id: 10, order_id: 1, remaining: 2 }];
        assert!(allocate(&items, 3).is_err());
        assert!(allocate(&items, 0).is_err());
    }
}

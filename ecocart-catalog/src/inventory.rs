use crate::product::{CatalogError, ConditionTier, ExpiryTier, Item, ItemDraft};
use tracing::info;

/// Session-scoped shelf of items, most recently added first
#[derive(Debug, Clone)]
pub struct Inventory {
    items: Vec<Item>,
    next_id: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// The two items the storefront opens with
    pub fn with_demo_items() -> Self {
        let demo = [
            ("Organic Milk", "Dairy", 500, ExpiryTier::Fresh, ConditionTier::Perfect),
            ("Sourdough Bread", "Bakery", 450, ExpiryTier::Medium, ConditionTier::Perfect),
        ];

        let items: Vec<Item> = demo
            .into_iter()
            .zip(1u64..)
            .map(|((name, category, cents, expiry, condition), id)| {
                Item::from_draft(id, ItemDraft {
                    name: name.to_string(),
                    category: category.to_string(),
                    base_price_cents: cents,
                    expiry_tier: expiry,
                    condition_tier: condition,
                })
            })
            .collect();

        Self {
            next_id: items.len() as u64 + 1,
            items,
        }
    }

    /// Replace any item with the same name and put the new record on top
    pub fn add_or_replace(&mut self, draft: ItemDraft) -> Item {
        let before = self.items.len();
        self.items.retain(|i| i.name != draft.name);
        let replaced = before != self.items.len();

        let item = Item::from_draft(self.next_id, draft);
        self.next_id += 1;
        self.items.insert(0, item.clone());

        info!(
            item_id = item.id,
            name = %item.name,
            replaced,
            "Inventory updated"
        );
        item
    }

    pub fn list(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Result<&Item, CatalogError> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or(CatalogError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, cents: i64) -> ItemDraft {
        ItemDraft::new(name, "Groceries", cents, ExpiryTier::Fresh, ConditionTier::Perfect).unwrap()
    }

    #[test]
    fn test_demo_inventory() {
        let inventory = Inventory::with_demo_items();
        let names: Vec<_> = inventory.list().iter().map(|i| (i.id, i.name.as_str())).collect();
        assert_eq!(names, vec![(1, "Organic Milk"), (2, "Sourdough Bread")]);

        let mut inventory = inventory;
        assert_eq!(inventory.add_or_replace(draft("Farm Eggs", 300)).id, 3);
    }

    #[test]
    fn test_add_or_replace_lifecycle() {
        let mut inventory = Inventory::new();

        let milk = inventory.add_or_replace(draft("Amul Gold Milk", 400));
        let eggs = inventory.add_or_replace(draft("Farm Eggs", 300));
        assert_eq!((milk.id, eggs.id), (1, 2));

        // Most recent first
        assert_eq!(inventory.list()[0].name, "Farm Eggs");

        // Re-adding replaces the record and assigns a fresh id
        let milk_again = inventory.add_or_replace(draft("Amul Gold Milk", 450));
        assert_eq!(milk_again.id, 3);
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.list()[0].base_price_cents, 450);
        assert_eq!(inventory.get(1), Err(CatalogError::NotFound(1)));
        assert!(inventory.get(3).is_ok());
    }
}

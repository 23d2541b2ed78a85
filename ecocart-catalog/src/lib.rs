pub mod product;
pub mod inventory;
pub mod persona;

pub use product::{CatalogError, ConditionTier, ExpiryTier, Item, ItemDraft, MAX_BASE_PRICE_CENTS};
pub use inventory::Inventory;
pub use persona::{Persona, PersonaType};

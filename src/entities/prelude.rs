pub use super::dining_tables::Entity as DiningTables;
pub use super::menu_categories::Entity as MenuCategories;
pub use super::menu_items::Entity as MenuItems;
pub use super::merchants::Entity as Merchants;
pub use super::order_items::Entity as OrderItems;
pub use super::orders::Entity as Orders;
pub use super::restaurants::Entity as Restaurants;

//! Domain types exchanged with the Apliiq API.

pub mod order;
pub mod product;

pub use order::{ApliiqLineItem, ApliiqOrder, ApliiqOrderResponse, ShippingAddress};
pub use product::Product;

// storefront/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart_item;
pub mod image;
pub mod product;
pub mod user;

// Re-export the model structs for convenient access
pub use cart_item::CartItem;
pub use image::Image;
pub use product::{NewProduct, Product, ProductChanges, ProductWithSeller};
pub use user::{NewUser, User};

pub mod health;
pub mod recipe;

pub use health::health_check;
pub use recipe::generate_recipe;

pub mod client;
pub mod error;
pub mod model;

pub use client::FoodShareApi;
pub use error::{FieldErrors, FoodShareError};
pub use model::*;

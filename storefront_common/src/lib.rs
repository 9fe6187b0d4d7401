pub mod helpers;
mod price;
mod secret;
mod slug;

pub use price::{Price, PriceParseError};
pub use secret::Secret;
pub use slug::slugify;

mod purchase_link;
mod serde_helpers;
mod upload_key;

pub use purchase_link::purchase_link;
pub use serde_helpers::double_option;
pub use upload_key::{upload_key, UploadKeyError};

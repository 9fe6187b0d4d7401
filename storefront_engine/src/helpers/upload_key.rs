use chrono::Utc;
use storefront_common::slugify;
use thiserror::Error;

const DEFAULT_FOLDER: &str = "products";
const MAX_EXTENSION_LEN: usize = 8;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cannot derive a storage key from file name '{0}'")]
pub struct UploadKeyError(pub String);

/// Generates a fresh object storage key of the form `{folder}/{unix_millis}-{random}.{ext}`.
///
/// The extension is taken from `file_name` and the folder is reduced to a slug so that user input cannot escape the
/// bucket prefix.
pub fn upload_key(folder: &str, file_name: &str) -> Result<String, UploadKeyError> {
    let folder = match slugify(folder) {
        f if f.is_empty() => DEFAULT_FOLDER.to_string(),
        f => f,
    };
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= MAX_EXTENSION_LEN && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or_else(|| UploadKeyError(file_name.to_string()))?;
    let millis = Utc::now().timestamp_millis();
    let suffix = to_base36(rand::random::<u64>());
    Ok(format!("{folder}/{millis}-{suffix}.{ext}"))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::with_capacity(13);
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

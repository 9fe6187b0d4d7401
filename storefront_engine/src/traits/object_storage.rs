use std::future::Future;

use bytes::Bytes;

use crate::traits::RemoteError;

pub trait ObjectStorage {
    /// Stores `data` under `key` and returns the public URL of the stored object.
    fn upload_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

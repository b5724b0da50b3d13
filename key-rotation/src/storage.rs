// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ServerSideEncryption;

use crate::constants::{CREDENTIAL_FILE_EXTENSION, CREDENTIAL_FILE_HEADER};
use crate::errors::AppError;
use crate::models::NewAccessKey;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket objects are written to.
    fn bucket(&self) -> &str;

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<(), AppError>;
}

/// Object key of the credential file for `access_key_id`.
pub fn credential_object_key(access_key_id: &str) -> String {
    format!("{access_key_id}.{CREDENTIAL_FILE_EXTENSION}")
}

/// Two-column CSV with a header row: key identifier and secret.
///
/// The buffer is handed to the store as is and is not wiped afterwards.
pub fn credential_file_contents(key: &NewAccessKey) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CREDENTIAL_FILE_HEADER)?;
    writer.write_record([key.access_key_id.as_str(), key.secret_access_key.as_str()])?;

    writer
        .into_inner()
        .map_err(|err| AppError::Io(err.error().to_string()))
}

/// Writes the credential file of a new key and returns its `bucket/key` location.
#[tracing::instrument(skip(store, key), fields(access_key_id = %key.access_key_id))]
pub async fn store_credentials(
    store: &dyn ObjectStore,
    key: &NewAccessKey,
) -> Result<String, AppError> {
    let object_key = credential_object_key(&key.access_key_id);
    let contents = credential_file_contents(key)?;

    store.put_object(&object_key, contents).await?;

    Ok(format!("{}/{}", store.bucket(), object_key))
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    #[tracing::instrument(skip(self, body))]
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("text/csv")
            .server_side_encryption(ServerSideEncryption::Aes256)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| AppError::Storage {
                location: format!("{}/{}", self.bucket, key),
                detail: aws_sdk_s3::error::DisplayErrorContext(&err).to_string(),
            })?;

        tracing::debug!("[rotation] wrote s3://{}/{}", self.bucket, key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        objects: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        fn bucket(&self) -> &str {
            "access-keys"
        }

        async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<(), AppError> {
            self.objects.lock().unwrap().push((key.to_string(), body));
            Ok(())
        }
    }

    fn new_key() -> NewAccessKey {
        NewAccessKey {
            access_key_id: "AKIANEW".to_string(),
            secret_access_key: "s3cr3t".to_string(),
        }
    }

    #[test]
    fn test_credential_object_key() {
        assert_eq!(credential_object_key("AKIANEW"), "AKIANEW.csv");
    }

    #[test]
    fn test_credential_file_contents() {
        let contents = credential_file_contents(&new_key()).unwrap();
        let text = String::from_utf8(contents).unwrap();
        assert_eq!(text, "AccessKeyId,SecretAccessKey\nAKIANEW,s3cr3t\n");
    }

    #[tokio::test]
    async fn test_store_credentials_uploads_file_body() {
        let store = RecordingStore::default();

        let location = store_credentials(&store, &new_key()).await.unwrap();

        assert_eq!(location, "access-keys/AKIANEW.csv");
        let objects = store.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].0, "AKIANEW.csv");
        assert_eq!(objects[0].1, b"AccessKeyId,SecretAccessKey\nAKIANEW,s3cr3t\n");
    }
}

//! Folder and file operations for StretchFS.

use crate::error::{Result, StretchFsError};
use crate::path::{sanitize_folder, sanitize_path, split_file_path};
use crate::request::Api;
use crate::types::{FileLinkRequest, PathRequest};
use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde_json::Value;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};
use url::Url;

/// Byte stream returned by [`FileClient::download_stream`].
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// File client for StretchFS.
pub struct FileClient<'a> {
    api: Api<'a>,
}

impl<'a> FileClient<'a> {
    pub(crate) fn new(api: Api<'a>) -> Self {
        Self { api }
    }

    // =========================================================================
    // Folders
    // =========================================================================

    pub async fn folder_create(&self, path: &str) -> Result<Value> {
        let path = sanitize_path(path);
        debug!(path = %path, "Creating folder");
        self.api
            .post_json("file/folderCreate", &PathRequest { path })
            .await
    }

    /// Remove a folder. Uses the same endpoint as [`delete`](Self::delete).
    pub async fn folder_delete(&self, path: &str) -> Result<Value> {
        self.remove(path).await
    }

    /// List the contents of a folder.
    pub async fn list(&self, path: &str) -> Result<Value> {
        let path = sanitize_path(path);
        debug!(path = %path, "Listing folder");
        self.api.get_json("file/list", &[("path", path)]).await
    }

    // =========================================================================
    // Files
    // =========================================================================

    pub async fn detail(&self, path: &str) -> Result<Value> {
        let path = sanitize_path(path);
        debug!(path = %path, "Fetching file detail");
        self.api.get_json("file/detail", &[("path", path)]).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.remove(path).await
    }

    /// Link content produced by a job into the file tree at `path`.
    pub async fn link(&self, handle: &str, hash: &str, path: &str) -> Result<Value> {
        let path = sanitize_path(path);
        debug!(handle = %handle, hash = %hash, path = %path, "Linking job content");
        self.api
            .post_json("file/link", &FileLinkRequest { handle, hash, path })
            .await
    }

    async fn remove(&self, path: &str) -> Result<Value> {
        let path = sanitize_path(path);
        debug!(path = %path, "Removing");
        self.api.post_json("file/remove", &PathRequest { path }).await
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Upload a local file into `folder` (which must end in `/`).
    ///
    /// The file is streamed, not read into memory. Fails with
    /// `FileNotFound` before any request is made if `local_path` is missing.
    pub async fn upload(&self, local_path: &Path, folder: &str) -> Result<Value> {
        if !local_path.is_file() {
            return Err(StretchFsError::FileNotFound(
                local_path.display().to_string(),
            ));
        }

        let name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StretchFsError::InvalidPath(local_path.display().to_string()))?
            .to_string();

        let file = File::open(local_path).await?;
        let size = file.metadata().await?.len();

        debug!(file = %local_path.display(), size, "Uploading file");
        let body = Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, size).file_name(name);
        self.upload_part(part, folder).await
    }

    /// Upload from any async reader under the given file name.
    pub async fn upload_from_reader<R>(&self, reader: R, name: &str, folder: &str) -> Result<Value>
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        let body = Body::wrap_stream(ReaderStream::new(reader));
        let part = Part::stream(body).file_name(name.to_string());
        self.upload_part(part, folder).await
    }

    /// Upload in-memory contents to a full remote file path.
    ///
    /// The folder is everything up to the last `/` of `path`.
    pub async fn upload_from_string(&self, path: &str, contents: impl Into<Vec<u8>>) -> Result<Value> {
        let (folder, name) = split_file_path(path)?;
        let part = Part::bytes(contents.into()).file_name(name);
        self.upload_part(part, &folder).await
    }

    async fn upload_part(&self, part: Part, folder: &str) -> Result<Value> {
        let folder = sanitize_folder(folder)?;
        let form = Form::new().part("file", part);

        let response = self
            .api
            .post_multipart("file/upload", &[("path", folder.as_str())], form)
            .await?;

        info!(folder = %folder, "File uploaded");
        Ok(response)
    }

    // =========================================================================
    // Download
    // =========================================================================

    /// Request a temporary download URL for `path`.
    ///
    /// Returns the server's envelope verbatim; pass it to
    /// [`download`](Self::download), [`download_stream`](Self::download_stream)
    /// or [`download_to_file`](Self::download_to_file).
    pub async fn download_url(&self, path: &str, life: Option<u64>) -> Result<Value> {
        let path = sanitize_path(path);
        debug!(path = %path, life = ?life, "Requesting download URL");

        let mut query = vec![
            ("path", path),
            ("token", self.api.token().unwrap_or_default().to_string()),
        ];
        if let Some(life) = life {
            query.push(("life", life.to_string()));
        }

        self.api.get_json("file/download", &query).await
    }

    /// Fetch the whole file named by a download envelope.
    pub async fn download(&self, envelope: &Value) -> Result<Bytes> {
        let url = self.envelope_url(envelope)?;
        let response = self.api.get_raw(url).await?;
        Ok(response.bytes().await?)
    }

    /// Stream the file named by a download envelope.
    pub async fn download_stream(&self, envelope: &Value) -> Result<ByteStream> {
        let url = self.envelope_url(envelope)?;
        let response = self.api.get_raw(url).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(StretchFsError::from))
            .boxed())
    }

    /// Stream the file named by a download envelope to `dest`.
    ///
    /// Returns the number of bytes written. A transfer that fails partway
    /// removes `dest` rather than leaving a truncated file behind.
    pub async fn download_to_file(&self, envelope: &Value, dest: &Path) -> Result<u64> {
        let stream = self.download_stream(envelope).await?;
        let downloaded = write_to_file(stream, dest).await?;

        info!(dest = %dest.display(), size = downloaded, "File downloaded");
        Ok(downloaded)
    }

    fn envelope_url(&self, envelope: &Value) -> Result<Url> {
        let raw = envelope
            .get("url")
            .and_then(Value::as_str)
            .ok_or(StretchFsError::MissingField("url"))?;
        self.api.resolve(raw)
    }
}

async fn write_to_file<S>(mut stream: S, dest: &Path) -> Result<u64>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = File::create(dest).await?;
    match copy_stream(&mut stream, &mut file).await {
        Ok(written) => Ok(written),
        Err(err) => {
            drop(file);
            if let Err(remove_err) = tokio::fs::remove_file(dest).await {
                warn!(dest = %dest.display(), error = %remove_err, "Failed to remove partial download");
            }
            Err(err)
        }
    }
}

async fn copy_stream<S>(stream: &mut S, file: &mut File) -> Result<u64>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn test_write_to_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a").join("b.bin");
        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ]);

        let written = write_to_file(chunks, &dest).await.unwrap();
        assert_eq!(written, 11);
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_failed_transfer_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("partial.bin");
        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"first chunk")),
            Err(StretchFsError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            ))),
        ]);

        let result = write_to_file(chunks, &dest).await;
        assert!(matches!(result, Err(StretchFsError::Io(_))));
        assert!(!dest.exists());
    }
}

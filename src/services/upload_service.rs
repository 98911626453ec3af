//! UploadService: stores uploaded videos on local disk.
//!
//! Files land directly in `upload_dir`. The stored filename depends on the
//! configured [`NamingPolicy`]:
//! - `Verbatim`: the client filename as given; the identifier is the download URI.
//! - `Randomized`: `<stem>_<code>.mp4` with a 5-character alphanumeric code;
//!   the identifier is the code.

use bytes::Bytes;
use clap::ValueEnum;
use futures::{Stream, StreamExt, pin_mut};
use rand::{Rng, distr::Alphanumeric};
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Route prefix under which stored videos are served.
pub const DOWNLOAD_URI_PREFIX: &str = "/drone/downloadVideo/";

const VIDEO_EXTENSION: &str = ".mp4";
const FILE_CODE_LEN: usize = 5;
const MAX_FILENAME_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NamingPolicy {
    #[default]
    Verbatim,
    Randomized,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Param must have a video.")]
    MissingVideo,
    #[error("invalid filename `{0}`")]
    InvalidFilename(String),
    #[error("video `{0}` not found")]
    NotFound(String),
    #[error("failed to store video: {0}")]
    Io(#[source] io::Error),
}

pub type UploadResult<T> = Result<T, UploadError>;

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedVideo {
    /// Download URI (verbatim) or random file code (randomized).
    pub identifier: String,
    /// Name of the file inside the upload directory.
    pub stored_name: String,
}

impl SavedVideo {
    pub fn download_uri(&self) -> String {
        format!("{}{}", DOWNLOAD_URI_PREFIX, self.stored_name)
    }
}

#[derive(Clone, Debug)]
pub struct UploadService {
    upload_dir: PathBuf,
    naming: NamingPolicy,
}

impl UploadService {
    pub fn new(upload_dir: impl Into<PathBuf>, naming: NamingPolicy) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            naming,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Reject names that could escape the upload directory.
    fn ensure_filename_safe(&self, filename: &str) -> UploadResult<()> {
        let invalid = filename.is_empty()
            || filename.len() > MAX_FILENAME_LEN
            || filename == "."
            || filename == ".."
            || filename
                .chars()
                .any(|c| c == '/' || c == '\\' || c.is_control());
        if invalid {
            return Err(UploadError::InvalidFilename(filename.to_string()));
        }
        Ok(())
    }

    fn target_name(&self, filename: &str) -> (String, String) {
        match self.naming {
            NamingPolicy::Verbatim => (
                format!("{}{}", DOWNLOAD_URI_PREFIX, filename),
                filename.to_string(),
            ),
            NamingPolicy::Randomized => {
                let code = random_file_code();
                let stem = filename.strip_suffix(VIDEO_EXTENSION).unwrap_or(filename);
                let stored = format!("{}_{}{}", stem, code, VIDEO_EXTENSION);
                (code, stored)
            }
        }
    }

    /// Copy `stream` into the upload directory, replacing any file of the same name.
    ///
    /// Bytes go to a temporary file that is renamed into place once the stream
    /// is exhausted. A failed upload leaves nothing under the final name.
    pub async fn save_file<S>(&self, filename: &str, stream: S) -> UploadResult<SavedVideo>
    where
        S: Stream<Item = io::Result<Bytes>>,
    {
        self.ensure_filename_safe(filename)?;
        let (identifier, stored_name) = self.target_name(filename);
        let file_path = self.upload_dir.join(&stored_name);

        let result = self.write_stream(&file_path, stream).await;
        match result {
            Ok(size_bytes) => {
                info!(
                    "stored video {} ({} bytes)",
                    file_path.display(),
                    size_bytes
                );
                Ok(SavedVideo {
                    identifier,
                    stored_name,
                })
            }
            Err(err) => Err(self.classify(err)),
        }
    }

    /// Verbatim uploads report any copy failure as a missing video, randomized
    /// uploads wrap the underlying I/O error.
    fn classify(&self, err: io::Error) -> UploadError {
        debug!("upload failed: {}", err);
        match self.naming {
            NamingPolicy::Verbatim => UploadError::MissingVideo,
            NamingPolicy::Randomized => UploadError::Io(err),
        }
    }

    async fn write_stream<S>(&self, file_path: &Path, stream: S) -> io::Result<u64>
    where
        S: Stream<Item = io::Result<Bytes>>,
    {
        fs::create_dir_all(&self.upload_dir).await?;
        let tmp_path = self.upload_dir.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;

        let mut size_bytes: u64 = 0;
        pin_mut!(stream);
        while let Some(chunk_res) = stream.next().await {
            let chunk = match chunk_res {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(err);
                }
            };
            size_bytes += chunk.len() as u64;
            if let Err(err) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(err);
            }
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err);
        }
        drop(file);

        if let Err(err) = fs::rename(&tmp_path, file_path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                let replaced = match fs::remove_file(file_path).await {
                    Ok(()) => fs::rename(&tmp_path, file_path).await,
                    Err(err) => Err(err),
                };
                if let Err(err) = replaced {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(err);
                }
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(err);
            }
        }
        Ok(size_bytes)
    }

    /// Open a stored video for streaming back to a client.
    pub async fn open(&self, filename: &str) -> UploadResult<(File, u64)> {
        self.ensure_filename_safe(filename)?;
        let file_path = self.upload_dir.join(filename);
        let not_found = |err: io::Error| {
            if err.kind() == ErrorKind::NotFound {
                UploadError::NotFound(filename.to_string())
            } else {
                UploadError::Io(err)
            }
        };
        let file = File::open(&file_path).await.map_err(not_found)?;
        let metadata = file.metadata().await.map_err(not_found)?;
        if !metadata.is_file() {
            return Err(UploadError::NotFound(filename.to_string()));
        }
        Ok((file, metadata.len()))
    }
}

fn random_file_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(FILE_CODE_LEN)
        .map(char::from)
        .collect()
}

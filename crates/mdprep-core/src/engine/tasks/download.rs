use crate::core::models::ids::StructureId;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const CHUNK_SIZE: usize = 64 * 1024;

/// Fetches a structure file by identifier.
pub trait StructureSource {
    /// Stores the structure identified by `id` at `destination` and returns
    /// the written path.
    ///
    /// # Errors
    ///
    /// Fails when the remote resource is unavailable or cannot be stored.
    fn fetch(
        &self,
        id: &StructureId,
        destination: &Path,
        reporter: &ProgressReporter,
    ) -> Result<PathBuf, EngineError>;
}

/// Downloads PDB-format entries from the RCSB file service.
pub struct RcsbDownloader {
    client: Client,
    base_url: String,
}

impl RcsbDownloader {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mdprep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| EngineError::Download {
                id: String::new(),
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, id: &StructureId) -> String {
        format!("{}/{}.pdb", self.base_url, id)
    }
}

impl StructureSource for RcsbDownloader {
    fn fetch(
        &self,
        id: &StructureId,
        destination: &Path,
        reporter: &ProgressReporter,
    ) -> Result<PathBuf, EngineError> {
        let url = self.url_for(id);
        info!("Downloading structure {} from {}", id, url);

        let download_err = |source| EngineError::Download {
            id: id.to_string(),
            url: url.clone(),
            source,
        };
        let mut response = self.client.get(&url).send().map_err(download_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Unavailable {
                id: id.to_string(),
                url,
                status: status.as_u16(),
            });
        }

        let io_err = |source| EngineError::Io {
            path: destination.to_path_buf(),
            source,
        };
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut writer = BufWriter::new(File::create(destination).map_err(io_err)?);

        reporter.report(Progress::TaskStart {
            total_steps: response.content_length(),
        });
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut downloaded: u64 = 0;
        loop {
            let read = response
                .read(&mut buffer)
                .map_err(|source| EngineError::Transfer {
                    id: id.to_string(),
                    url: url.clone(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            writer.write_all(&buffer[..read]).map_err(io_err)?;
            downloaded += read as u64;
            reporter.report(Progress::TaskIncrement {
                amount: read as u64,
            });
        }
        writer.flush().map_err(io_err)?;
        reporter.report(Progress::TaskFinish);

        debug!("Wrote {} bytes to {:?}", downloaded, destination);
        info!("Saved structure {} as {:?}", id, destination);
        Ok(destination.to_path_buf())
    }
}

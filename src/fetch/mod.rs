// src/fetch/mod.rs
use reqwest::Client;
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use thiserror::Error;
use tokio::fs;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or a non-success HTTP status.
    #[error("downloading {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("writing download to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build the HTTP client used for the download. No timeout unless one is given.
pub fn build_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder.build()
}

/// GET `url` and write the raw body to `dest`, replacing whatever was there.
/// Returns the number of bytes written.
#[tracing::instrument(level = "info", skip(client, dest), fields(dest = %dest.as_ref().display()))]
pub async fn download_file(
    client: &Client,
    url: &str,
    dest: impl AsRef<Path>,
) -> Result<u64, FetchError> {
    let dest = dest.as_ref();
    let start = Instant::now();

    let bytes = match fetch_body(client, url).await {
        Ok(b) => b,
        Err(source) => {
            error!(error = %source, "failed to download spreadsheet");
            return Err(FetchError::Network {
                url: url.to_string(),
                source,
            });
        }
    };

    if let Err(source) = write_body(dest, &bytes).await {
        error!(error = %source, "failed to save spreadsheet");
        return Err(FetchError::Io {
            path: dest.to_path_buf(),
            source,
        });
    }

    info!(bytes = bytes.len(), elapsed = ?start.elapsed(), "downloaded spreadsheet");
    Ok(bytes.len() as u64)
}

async fn fetch_body(client: &Client, url: &str) -> reqwest::Result<Vec<u8>> {
    let resp = client.get(url).send().await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

async fn write_body(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(dest, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_client_with_and_without_timeout() {
        assert!(build_client(None).is_ok());
        assert!(build_client(Some(Duration::from_secs(5))).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("out.csv");
        let client = build_client(Some(Duration::from_secs(5))).unwrap();

        // grab a free port, then close it so the connect is refused
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{}/sheet.csv", port);
        let err = download_file(&client, &url, &dest).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert!(!dest.exists());
    }
}

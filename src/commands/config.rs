use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

use super::paths::default_config_dir;
use crate::{
    credential::FileCredentialStore,
    http::{ReqwestTransport, RequestClient},
    runtime::Runtime,
};

/// Backend address used when neither `--api-url` nor `TRIPMATE_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub type CliClient<R> = RequestClient<ReqwestTransport, FileCredentialStore<R>>;

pub struct Config<R: Runtime> {
    pub runtime: Arc<R>,
    pub client: CliClient<R>,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, api_url: Option<String>, config_dir: Option<PathBuf>) -> Result<Self> {
        let runtime = Arc::new(runtime);
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => default_config_dir(runtime.as_ref())?,
        };
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        debug!("API {} with credentials in {}", api_url, config_dir.display());

        let http = Client::builder()
            .user_agent(concat!("tripmate-cli/", env!("TRIPMATE_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let client = RequestClient::new(
            api_url,
            ReqwestTransport::new(http),
            FileCredentialStore::new(runtime.clone(), config_dir),
        )?;

        Ok(Self { runtime, client })
    }
}

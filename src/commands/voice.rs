use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::{
    credential::CredentialStore,
    http::{RequestClient, Transport},
    runtime::Runtime,
};

/// Transcribe an audio file
#[tracing::instrument(skip(runtime, client))]
pub async fn recognize<R: Runtime, T: Transport, S: CredentialStore>(
    runtime: &R,
    client: &RequestClient<T, S>,
    file: &Path,
) -> Result<()> {
    let audio = runtime.read(file)?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid audio file name: {}", file.display()))?;
    debug!("Uploading {} ({} bytes)", file_name, audio.len());

    let transcript = client.recognize_voice(file_name, audio).await?;
    match transcript.confidence {
        Some(confidence) => println!("{} (confidence {:.2})", transcript.text, confidence),
        None => println!("{}", transcript.text),
    }
    Ok(())
}

/// Extract trip details from free text
pub async fn parse<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    text: &str,
) -> Result<()> {
    let parsed = client.parse_voice_query(text).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&parsed).context("Failed to format response")?
    );
    Ok(())
}

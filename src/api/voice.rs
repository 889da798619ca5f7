use anyhow::Result;
use serde_json::{Value, json};

use super::decode;
use super::types::Transcript;
use crate::credential::CredentialStore;
use crate::http::{FormPayload, Method, RequestClient, RequestDescriptor, Transport};

impl<T: Transport, S: CredentialStore> RequestClient<T, S> {
    /// Uploads an audio file for transcription as the multipart field `audio`.
    #[tracing::instrument(skip(self, audio))]
    pub async fn recognize_voice(&self, file_name: &str, audio: Vec<u8>) -> Result<Transcript> {
        let form = FormPayload::new().file("audio", file_name, audio);
        decode(self.upload("/voice/recognize", form).await?, "transcript")
    }

    /// Transcribes base64-encoded audio sent inline as JSON.
    #[tracing::instrument(skip(self, audio_data))]
    pub async fn recognize_voice_base64(&self, audio_data: &str, format: &str) -> Result<Transcript> {
        let body = json!({ "audio_data": audio_data, "format": format });
        decode(self.post("/voice/recognize-base64", &body).await?, "transcript")
    }

    /// Extracts trip fields (destination, dates, budget, ...) from free text.
    ///
    /// The server reads `text` from the query string, not the body.
    #[tracing::instrument(skip(self))]
    pub async fn parse_voice_query(&self, text: &str) -> Result<Value> {
        let descriptor = RequestDescriptor::new(Method::Post, "/voice/parse-query")
            .with_query([("text", text)])
            .with_body(json!({}));
        decode(self.execute(&descriptor).await?, "parsed query")
    }
}

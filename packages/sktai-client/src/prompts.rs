//! Prompt service endpoints.

use reqwest::Method;

use crate::error::Result;
use crate::types::InferencePrompt;
use crate::SktaiClient;

impl SktaiClient {
    pub async fn get_inference_prompt(&self, prompt_id: &str) -> Result<InferencePrompt> {
        let path = format!("/api/v1/agent/inference-prompts/{}", prompt_id);
        Self::send_json(self.request(Method::GET, &path)).await
    }
}

// Résumé analysis: prompt construction, the model call and the upload endpoint.
// All model traffic goes through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod prompts;

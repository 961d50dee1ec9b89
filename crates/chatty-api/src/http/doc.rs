//! OpenAPI document served behind Swagger UI.

use utoipa::OpenApi;

use crate::http::handlers::chat;
use crate::http::schemas::{HistoryResponse, MessageResponse, SaveMessageRequest};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "chatty",
        description = "Per-user chat history API",
        version = env!("CARGO_PKG_VERSION")
    ),
    paths(chat::save_message, chat::get_history, chat::list_messages),
    components(schemas(SaveMessageRequest, MessageResponse, HistoryResponse)),
    tags((name = "chat", description = "Save and read back chat messages"))
)]
pub struct ApiDoc;

pub fn api_docs() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_version_tracks_crate() {
        let doc = api_docs();
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/{user_id}/history"));
    }
}

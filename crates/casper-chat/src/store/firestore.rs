//! Cloud Firestore sink over the REST `documents:commit` endpoint.
//!
//! Each session is one document, `{collection}/{session_id}`, holding
//! `chat_history` (array of `{origin, message}` maps) and `timestamp`
//! (set by the server at request time). Every save replaces the document.

use async_trait::async_trait;
use casper_common::SessionId;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::oauth::FirestoreAuth;
use super::{ConversationSink, StoreError};
use crate::message::Message;

/// Which database and collection receive the chat logs.
#[derive(Debug, Clone)]
pub struct FirestoreTarget {
    pub api_base: String,
    pub project_id: String,
    pub database: String,
    pub collection: String,
}

impl FirestoreTarget {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            api_base: "https://firestore.googleapis.com/v1".into(),
            project_id: project_id.into(),
            database: "(default)".into(),
            collection: "chat_logs".into(),
        }
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/{}", self.project_id, self.database)
    }

    /// Full resource name of the document for `session_id`.
    pub fn document_name(&self, session_id: &SessionId) -> String {
        format!(
            "{}/documents/{}/{}",
            self.database_path(),
            self.collection,
            session_id
        )
    }

    pub fn commit_url(&self) -> String {
        format!(
            "{}/{}/documents:commit",
            self.api_base.trim_end_matches('/'),
            self.database_path()
        )
    }
}

#[derive(Deserialize)]
struct ServiceAccount {
    project_id: String,
}

/// Read `project_id` out of a service-account credentials JSON document.
pub fn project_id_from_credentials(creds_json: &str) -> Result<String, StoreError> {
    let account: ServiceAccount = serde_json::from_str(creds_json)
        .map_err(|e| StoreError::Credentials(format!("invalid service-account JSON: {e}")))?;
    if account.project_id.trim().is_empty() {
        return Err(StoreError::Credentials(
            "service-account JSON has an empty project_id".into(),
        ));
    }
    Ok(account.project_id)
}

/// Writes conversation snapshots to Firestore.
pub struct FirestoreSink {
    http: reqwest::Client,
    target: FirestoreTarget,
    auth: FirestoreAuth,
}

impl std::fmt::Debug for FirestoreSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreSink")
            .field("target", &self.target)
            .field("auth", &self.auth)
            .finish()
    }
}

impl FirestoreSink {
    pub fn new(http: reqwest::Client, target: FirestoreTarget, auth: FirestoreAuth) -> Self {
        Self { http, target, auth }
    }

    pub fn target(&self) -> &FirestoreTarget {
        &self.target
    }

    /// Commit request that replaces the session document.
    pub fn build_commit_body(&self, session_id: &SessionId, conversation: &[Message]) -> Value {
        let history: Vec<Value> = conversation
            .iter()
            .map(|message| {
                json!({
                    "mapValue": {
                        "fields": {
                            "origin": { "stringValue": message.origin().as_str() },
                            "message": { "stringValue": message.text() }
                        }
                    }
                })
            })
            .collect();

        json!({
            "writes": [{
                "update": {
                    "name": self.target.document_name(session_id),
                    "fields": {
                        "chat_history": { "arrayValue": { "values": history } }
                    }
                },
                "updateTransforms": [{
                    "fieldPath": "timestamp",
                    "setToServerValue": "REQUEST_TIME"
                }]
            }]
        })
    }
}

#[async_trait]
impl ConversationSink for FirestoreSink {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn save(
        &self,
        session_id: &SessionId,
        conversation: &[Message],
    ) -> Result<(), StoreError> {
        let body = self.build_commit_body(session_id, conversation);
        let url = self.target.commit_url();
        let token = self.auth.bearer(&self.http).await?;

        debug!(session = %session_id, collection = %self.target.collection, "Firestore commit");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::Credentials(format!("HTTP {status}: {text}")));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(format!("HTTP {status}: {text}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ServiceAccount;
    use crate::test_http::serve_once;

    fn token() -> FirestoreAuth {
        FirestoreAuth::Token("token".into())
    }

    fn sink() -> FirestoreSink {
        FirestoreSink::new(
            reqwest::Client::new(),
            FirestoreTarget::new("demo-project"),
            token(),
        )
    }

    fn sink_at(base_url: &str, auth: FirestoreAuth) -> FirestoreSink {
        let mut target = FirestoreTarget::new("demo-project");
        target.api_base = format!("{base_url}/v1");
        FirestoreSink::new(reqwest::Client::new(), target, auth)
    }

    #[test]
    fn document_lives_under_chat_logs() {
        let sid = SessionId::new();
        let target = FirestoreTarget::new("demo-project");
        assert_eq!(
            target.document_name(&sid),
            format!("projects/demo-project/databases/(default)/documents/chat_logs/{sid}")
        );
        assert_eq!(
            target.commit_url(),
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents:commit"
        );
    }

    #[test]
    fn commit_body_encodes_history_and_server_timestamp() {
        let sid = SessionId::new();
        let body = sink().build_commit_body(&sid, &[Message::ai("Hello"), Message::user("Hi")]);

        let write = &body["writes"][0];
        let values = write["update"]["fields"]["chat_history"]["arrayValue"]["values"]
            .as_array()
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["mapValue"]["fields"]["origin"]["stringValue"], "ai");
        assert_eq!(values[1]["mapValue"]["fields"]["message"]["stringValue"], "Hi");
        assert_eq!(write["updateTransforms"][0]["fieldPath"], "timestamp");
        assert_eq!(write["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
    }

    #[test]
    fn project_id_is_read_from_credentials() {
        let creds = r#"{"type": "service_account", "project_id": "casper-logs", "client_email": "x@y"}"#;
        assert_eq!(project_id_from_credentials(creds).unwrap(), "casper-logs");
    }

    #[test]
    fn bad_credentials_are_reported() {
        assert!(matches!(
            project_id_from_credentials("not json"),
            Err(StoreError::Credentials(_))
        ));
        assert!(matches!(
            project_id_from_credentials(r#"{"project_id": " "}"#),
            Err(StoreError::Credentials(_))
        ));
    }

    #[test]
    fn debug_hides_token() {
        assert!(!format!("{:?}", sink()).contains("\"token\""));
    }

    #[tokio::test]
    async fn unreachable_store_is_a_network_error() {
        let mut target = FirestoreTarget::new("demo-project");
        target.api_base = "http://127.0.0.1:1/v1".into();
        let sink = FirestoreSink::new(reqwest::Client::new(), target, token());
        let err = sink
            .save(&SessionId::new(), &[Message::ai("Hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));
    }

    #[tokio::test]
    async fn accepted_commit_sends_bearer_token() {
        let server = serve_once(200, "{}").await;
        let sid = SessionId::new();
        sink_at(&server.base_url, token())
            .save(&sid, &[Message::ai("Hello")])
            .await
            .unwrap();

        let request = server.request.await.unwrap();
        assert!(request
            .starts_with("POST /v1/projects/demo-project/databases/(default)/documents:commit"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer token"));
        assert!(request.contains(&format!("chat_logs/{sid}")));
    }

    #[tokio::test]
    async fn forbidden_is_a_credentials_error() {
        let server = serve_once(403, r#"{"error": {"status": "PERMISSION_DENIED"}}"#).await;
        let err = sink_at(&server.base_url, token())
            .save(&SessionId::new(), &[Message::ai("Hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Credentials(msg) if msg.contains("403")));
    }

    #[tokio::test]
    async fn server_error_is_a_rejected_write() {
        let server = serve_once(500, r#"{"error": {"status": "INTERNAL"}}"#).await;
        let err = sink_at(&server.base_url, token())
            .save(&SessionId::new(), &[Message::ai("Hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn failed_token_exchange_skips_the_commit() {
        let token_server = serve_once(401, r#"{"error": "invalid_client"}"#).await;
        let account =
            ServiceAccount::from_json(include_str!("../../testdata/service_account.json"))
                .unwrap()
                .with_token_uri(format!("{}/token", token_server.base_url));

        let err = sink_at("http://127.0.0.1:1", FirestoreAuth::ServiceAccount(account))
            .save(&SessionId::new(), &[Message::ai("Hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Credentials(_)));
    }
}

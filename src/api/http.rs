//! reqwest-backed client for the bot backend

use super::types::{Ack, ConfigSnapshot, Created, LogTail, MessageStats, NewProfile, ProfileList,
    RenameProfile};
use super::Backend;
use crate::error::{ClientError, ClientResult};
use crate::panel::settings::Settings;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url` (e.g. `http://127.0.0.1:5000`)
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::validation(format!("Invalid server URL {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::validation(format!(
                "Invalid server URL {base_url:?}"
            )));
        }

        // Every request is a small JSON exchange; no pooling tweaks needed
        let client = Client::builder()
            .user_agent(concat!("graphite/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Build `<base>/<segments...>`; segments are percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Decode a JSON body regardless of status: the backend reports logical
    /// failures as `{success: false}` with a 4xx code
    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!("Undecodable {} response: {}", status, e);
            ClientError::Transport(format!("unexpected response ({status}): {e}"))
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_config(&self) -> ClientResult<ConfigSnapshot> {
        let response = self
            .client
            .get(self.endpoint(&["api", "config"]))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn save_config(&self, settings: &Settings) -> ClientResult<Ack> {
        let response = self
            .client
            .post(self.endpoint(&["api", "config"]))
            .json(settings)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn start(&self) -> ClientResult<Ack> {
        let response = self
            .client
            .post(self.endpoint(&["api", "start"]))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn stop(&self) -> ClientResult<Ack> {
        let response = self
            .client
            .post(self.endpoint(&["api", "stop"]))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn logs(&self) -> ClientResult<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint(&["api", "logs"]))
            .send()
            .await?;
        let tail: LogTail = Self::decode(response).await?;
        Ok(tail.logs)
    }

    async fn list_profiles(&self) -> ClientResult<ProfileList> {
        let response = self
            .client
            .get(self.endpoint(&["api", "accounts"]))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_profile(
        &self,
        name: &str,
        config: Option<&Settings>,
    ) -> ClientResult<Created> {
        let response = self
            .client
            .post(self.endpoint(&["api", "accounts"]))
            .json(&NewProfile { name, config })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn activate_profile(&self, id: &str) -> ClientResult<Ack> {
        let response = self
            .client
            .post(self.endpoint(&["api", "accounts", id, "activate"]))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn rename_profile(&self, id: &str, name: &str) -> ClientResult<Ack> {
        let response = self
            .client
            .put(self.endpoint(&["api", "accounts", id]))
            .json(&RenameProfile { name })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_profile(&self, id: &str) -> ClientResult<Ack> {
        let response = self
            .client
            .delete(self.endpoint(&["api", "accounts", id]))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn message_stats(&self) -> ClientResult<HashMap<String, u64>> {
        let response = self
            .client
            .get(self.endpoint(&["api", "message-stats"]))
            .send()
            .await?;
        let stats: MessageStats = Self::decode(response).await?;
        Ok(stats.stats)
    }

    async fn reset_message_stats(&self) -> ClientResult<()> {
        self.client
            .delete(self.endpoint(&["api", "message-stats"]))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{DELETE, GET, POST, PUT};
    use httpmock::MockServer;
    use serde_json::json;

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpBackend::new("not a url").is_err());
        assert!(HttpBackend::new("mailto:bot@example.com").is_err());
    }

    #[test]
    fn endpoint_joins_and_encodes_segments() {
        let backend = HttpBackend::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(
            backend.endpoint(&["api", "accounts", "a b", "activate"]).as_str(),
            "http://127.0.0.1:5000/api/accounts/a%20b/activate"
        );
    }

    #[tokio::test]
    async fn get_config_decodes_settings_and_run_state() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/config");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "token": "tok",
                        "channel_id": "42",
                        "messages": ["hello"],
                        "mode": "random_window",
                        "bot_running": true
                    }));
            })
            .await;

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        let snapshot = backend.get_config().await.unwrap();

        mock.assert_async().await;
        assert!(snapshot.bot_running);
        assert_eq!(snapshot.settings.channel_id, "42");
        assert_eq!(snapshot.settings.messages, vec!["hello"]);
    }

    #[tokio::test]
    async fn save_config_posts_exact_settings_shape() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/config")
                    .header("content-type", "application/json")
                    .json_body_includes(r#"{"min_delay": "", "spam_interval": 60, "mode": "spam"}"#);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"success": true, "message": "Configuration updated"}));
            })
            .await;

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        let ack = backend.save_config(&Settings::default()).await.unwrap();

        mock.assert_async().await;
        assert!(ack.success);
    }

    #[tokio::test]
    async fn rejection_with_error_status_is_still_decoded() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/accounts/missing/activate");
                then.status(404)
                    .header("content-type", "application/json")
                    .json_body(json!({"success": false, "message": "Account not found"}));
            })
            .await;

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        let ack = backend.activate_profile("missing").await.unwrap();

        assert!(!ack.success);
        assert_eq!(ack.message.as_deref(), Some("Account not found"));
    }

    #[tokio::test]
    async fn profile_crud_hits_expected_routes() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/accounts")
                    .json_body(json!({"name": "Config 2"}));
                then.status(200).json_body(json!({
                    "success": true,
                    "account": {"id": "id-2", "name": "Config 2", "config": {}}
                }));
            })
            .await;
        let rename = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/accounts/id-2")
                    .json_body(json!({"name": "Main"}));
                then.status(200).json_body(json!({"success": true}));
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/accounts/id-2");
                then.status(200).json_body(json!({"success": true}));
            })
            .await;

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        let created = backend.create_profile("Config 2", None).await.unwrap();
        assert_eq!(created.account.unwrap().id, "id-2");
        assert!(backend.rename_profile("id-2", "Main").await.unwrap().success);
        assert!(backend.delete_profile("id-2").await.unwrap().success);

        create.assert_async().await;
        rename.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn logs_and_stats_unwrap_their_envelopes() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/logs");
                then.status(200).json_body(json!({"logs": ["a", "b"]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/message-stats");
                then.status(200).json_body(json!({"stats": {"hi": 3}}));
            })
            .await;

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        assert_eq!(backend.logs().await.unwrap(), vec!["a", "b"]);
        assert_eq!(backend.message_stats().await.unwrap().get("hi"), Some(&3));
    }

    #[tokio::test]
    async fn failed_stats_reset_is_an_error() {
        let server = MockServer::start_async().await;
        let mut reset = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/message-stats");
                then.status(500).body("Internal Server Error");
            })
            .await;

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        let err = backend.reset_message_stats().await.unwrap_err();
        assert!(err.is_transport());
        reset.assert_async().await;

        reset.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/message-stats");
                then.status(200).json_body(json!({"success": true}));
            })
            .await;
        backend.reset_message_stats().await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) is almost never listening
        let backend = HttpBackend::new("http://127.0.0.1:9").unwrap();
        let err = backend.get_config().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.user_message(), crate::error::NETWORK_ERROR);
    }
}

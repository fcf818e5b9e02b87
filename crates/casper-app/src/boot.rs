//! One-time setup: build the generator, biography, and sinks from config.
//!
//! Credential problems never abort startup. They become notices shown to
//! the user, and the affected collaborator is replaced by a degraded one.

use std::sync::Arc;
use std::time::Duration;

use casper_ai::{DisabledGenerator, GeminiClient, GeminiConfig, TextGenerator};
use casper_chat::{
    load_biography, project_id_from_credentials, BiographySource, ChatSession, ConversationSink,
    FirestoreAuth, FirestoreSink, FirestoreTarget, JsonFileSink, RefusalPolicy, ResponseGenerator,
    ServiceAccount, StoreError,
};
use casper_common::{CasperError, Result};
use casper_config::{CasperConfig, ResolvedSecrets};
use tracing::{info, warn};

/// A ready session plus anything the user should be told about setup.
pub struct Boot {
    pub session: ChatSession,
    pub notices: Vec<String>,
}

pub async fn build_session(
    config: &CasperConfig,
    secrets: &ResolvedSecrets,
) -> Result<Boot> {
    let mut notices = Vec::new();

    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.gemini.connect_timeout_secs))
        .timeout(Duration::from_secs(config.gemini.request_timeout_secs))
        .build()
        .map_err(|e| CasperError::Network(format!("failed to build HTTP client: {e}")))?;

    let generator = build_generator(config, secrets, &mut notices);
    let biography = load_biography(&biography_source(config, secrets), &http).await;
    if biography.is_empty() {
        notices.push("Biography could not be loaded; answers will lack details.".into());
    }

    let mut responder = ResponseGenerator::new(generator, biography).with_refusal(
        RefusalPolicy::new(
            config.persona.refusal_keywords.iter().cloned(),
            config.persona.refusal_message.clone(),
        ),
    );
    if let Some(instructions) = &config.persona.instructions {
        responder = responder.with_instructions(instructions.clone());
    }

    let sinks = build_sinks(config, secrets, &http, &mut notices);
    info!(sinks = sinks.len(), "session dependencies ready");

    let session = ChatSession::new(config.persona.greeting.clone(), responder).with_sinks(sinks);
    Ok(Boot { session, notices })
}

fn build_generator(
    config: &CasperConfig,
    secrets: &ResolvedSecrets,
    notices: &mut Vec<String>,
) -> Arc<dyn TextGenerator> {
    let Some(api_key) = &secrets.api_key else {
        let reason = format!(
            "no API key configured (set {} or add api_key to the secrets file)",
            config.secrets.api_key_env
        );
        warn!("{reason}");
        notices.push(format!("Error initializing model: {reason}"));
        return Arc::new(DisabledGenerator::new(reason));
    };

    let gemini = GeminiConfig::new(api_key.clone())
        .with_model(config.gemini.model.clone())
        .with_api_base(config.gemini.api_base.clone())
        .with_max_tokens(config.gemini.max_tokens)
        .with_temperature(config.gemini.temperature)
        .with_timeouts(
            Duration::from_secs(config.gemini.connect_timeout_secs),
            Duration::from_secs(config.gemini.request_timeout_secs),
        );

    match GeminiClient::new(gemini) {
        Ok(client) => {
            info!(model = client.model(), "Gemini client ready");
            Arc::new(client)
        }
        Err(e) => {
            warn!("failed to create Gemini client: {e}");
            notices.push(format!("Error initializing model: {e}"));
            Arc::new(DisabledGenerator::new(e.to_string()))
        }
    }
}

pub(crate) fn biography_source(
    config: &CasperConfig,
    secrets: &ResolvedSecrets,
) -> BiographySource {
    if let Some(text) = &config.biography.text {
        BiographySource::Inline(text.clone())
    } else if let Some(path) = &config.biography.path {
        BiographySource::File(path.clone())
    } else if let Some(url) = &secrets.details_url {
        BiographySource::Url(url.clone())
    } else {
        BiographySource::None
    }
}

pub(crate) fn build_sinks(
    config: &CasperConfig,
    secrets: &ResolvedSecrets,
    http: &reqwest::Client,
    notices: &mut Vec<String>,
) -> Vec<Arc<dyn ConversationSink>> {
    let mut sinks: Vec<Arc<dyn ConversationSink>> = Vec::new();

    if config.storage.json_file.enabled {
        sinks.push(Arc::new(JsonFileSink::new(config.storage.json_file.path.clone())));
    }

    if config.storage.firestore.enabled {
        match firestore_sink(config, secrets, http) {
            Ok(sink) => sinks.push(Arc::new(sink)),
            Err(e) => {
                warn!("Firestore disabled: {e}");
                notices.push(format!("Error initializing Firestore: {e}"));
            }
        }
    }

    sinks
}

fn firestore_sink(
    config: &CasperConfig,
    secrets: &ResolvedSecrets,
    http: &reqwest::Client,
) -> Result<FirestoreSink> {
    let settings = &config.storage.firestore;
    let storage = |e: StoreError| CasperError::Storage(e.to_string());

    let auth = match (&secrets.firestore_token, &secrets.firestore_creds) {
        (Some(token), _) => FirestoreAuth::Token(token.clone()),
        (None, Some(creds)) => {
            let account = ServiceAccount::from_json(creds).map_err(storage)?;
            info!(account = account.client_email(), "Firestore using service-account key");
            FirestoreAuth::ServiceAccount(account)
        }
        (None, None) => {
            return Err(CasperError::Storage(format!(
                "no credentials (set {} to a service-account key or {} to an access token)",
                config.secrets.firestore_creds_env, config.secrets.firestore_token_env
            )))
        }
    };

    let project_id = match (&settings.project_id, &secrets.firestore_creds) {
        (Some(id), _) => id.clone(),
        (None, Some(creds)) => project_id_from_credentials(creds).map_err(storage)?,
        (None, None) => {
            return Err(CasperError::Storage(format!(
                "no project_id configured and {} is not set",
                config.secrets.firestore_creds_env
            )))
        }
    };

    let target = FirestoreTarget {
        api_base: settings.api_base.clone(),
        project_id,
        database: settings.database.clone(),
        collection: settings.collection.clone(),
    };
    Ok(FirestoreSink::new(http.clone(), target, auth))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets() -> ResolvedSecrets {
        ResolvedSecrets::default()
    }

    #[test]
    fn biography_text_wins_over_path_and_url() {
        let mut config = CasperConfig::default();
        config.biography.text = Some("Name: X".into());
        config.biography.path = Some("details.txt".into());
        let mut secrets = secrets();
        secrets.details_url = Some("https://example.com/details".into());

        assert_eq!(
            biography_source(&config, &secrets),
            BiographySource::Inline("Name: X".into())
        );

        config.biography.text = None;
        assert_eq!(
            biography_source(&config, &secrets),
            BiographySource::File("details.txt".into())
        );

        config.biography.path = None;
        assert_eq!(
            biography_source(&config, &secrets),
            BiographySource::Url("https://example.com/details".into())
        );
    }

    #[test]
    fn default_storage_is_json_file_only() {
        let mut notices = Vec::new();
        let sinks = build_sinks(
            &CasperConfig::default(),
            &secrets(),
            &reqwest::Client::new(),
            &mut notices,
        );
        assert_eq!(sinks.len(), 1);
        assert_eq!(sinks[0].name(), "json_file");
        assert!(notices.is_empty());
    }

    const SERVICE_ACCOUNT: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../casper-chat/testdata/service_account.json"
    ));

    #[test]
    fn firestore_without_credentials_is_skipped_with_notice() {
        let mut config = CasperConfig::default();
        config.storage.json_file.enabled = false;
        config.storage.firestore.enabled = true;
        config.storage.firestore.project_id = Some("demo".into());

        let mut notices = Vec::new();
        let sinks = build_sinks(&config, &secrets(), &reqwest::Client::new(), &mut notices);
        assert!(sinks.is_empty());
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("FIREBASE_CREDS"));
        assert!(notices[0].contains("FIREBASE_TOKEN"));
    }

    #[test]
    fn service_account_key_alone_enables_firestore() {
        let mut config = CasperConfig::default();
        config.storage.json_file.enabled = false;
        config.storage.firestore.enabled = true;
        let mut secrets = secrets();
        secrets.firestore_creds = Some(SERVICE_ACCOUNT.into());

        let mut notices = Vec::new();
        let sinks = build_sinks(&config, &secrets, &reqwest::Client::new(), &mut notices);
        assert!(notices.is_empty(), "{notices:?}");
        assert_eq!(sinks.len(), 1);
        assert_eq!(sinks[0].name(), "firestore");

        let sink = firestore_sink(&config, &secrets, &reqwest::Client::new()).unwrap();
        assert_eq!(sink.target().project_id, "casper-test");
    }

    #[test]
    fn unusable_service_account_key_is_a_storage_error() {
        let mut config = CasperConfig::default();
        config.storage.firestore.enabled = true;
        let mut secrets = secrets();
        secrets.firestore_creds = Some(r#"{"project_id": "p"}"#.into());

        let err = firestore_sink(&config, &secrets, &reqwest::Client::new()).unwrap_err();
        assert!(matches!(err, CasperError::Storage(_)));
    }

    #[test]
    fn firestore_project_comes_from_credentials() {
        let mut config = CasperConfig::default();
        config.storage.firestore.enabled = true;
        let mut secrets = secrets();
        secrets.firestore_creds = Some(r#"{"project_id": "from-creds"}"#.into());
        secrets.firestore_token = Some("token".into());

        let sink = firestore_sink(&config, &secrets, &reqwest::Client::new()).unwrap();
        assert_eq!(sink.target().project_id, "from-creds");
        assert_eq!(sink.target().collection, "chat_logs");
    }

    #[tokio::test]
    async fn missing_api_key_boots_degraded() {
        let mut config = CasperConfig::default();
        config.biography.text = Some("Name: X".into());
        config.storage.json_file.enabled = false;

        let mut boot = build_session(&config, &secrets()).await.unwrap();
        assert!(boot
            .notices
            .iter()
            .any(|n| n.contains("Error initializing model")));

        let err = boot.session.submit("hello").await.unwrap_err();
        assert!(err.to_string().contains("Generation unavailable"));
        assert_eq!(boot.session.conversation().len(), 2);
    }
}

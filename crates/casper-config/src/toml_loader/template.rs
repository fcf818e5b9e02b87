//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Casper Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[persona]
# name = "Casper"
# greeting = "Hello..! I'm Casper, What's your name? Ask me anything about my owner or Data Science?"
# instructions = "..."   # omit to use the built-in template
# refusal_keywords = []  # case-insensitive substrings that trigger a refusal
# refusal_message = "Sorry, I cannot answer personal queries."

[biography]
# Checked in order: text, path, url.
# text = "Name: ..."
# path = "details.txt"
# url = "https://example.com/details.txt"

[gemini]
# model = "gemini-1.5-flash"
# api_key = ""           # prefer the API_KEY env var or the secrets file
# max_tokens = 2048      # 1-8192
# temperature = 0.7      # 0.0-2.0
# connect_timeout_secs = 10
# request_timeout_secs = 120

[secrets]
# file = "secrets.toml"  # keys: api_key, firestore_creds, firestore_token, details_url
# api_key_env = "API_KEY"
# firestore_creds_env = "FIREBASE_CREDS"
# firestore_token_env = "FIREBASE_TOKEN"
# details_url_env = "DETAILS_URL"

[storage.json_file]
# enabled = true
# path = "chat_history.json"

[storage.firestore]
# enabled = false
# project_id = ""        # defaults to project_id from the service-account credentials
# database = "(default)"
# collection = "chat_logs"

[logging]
# filter = "casper=info"
"##
    .to_string()
}

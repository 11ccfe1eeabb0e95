// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stage 3: optional JSON body parsing (spec §4.4). When enabled,
//! each physical line is parsed as a JSON object; the configured
//! `message_key` (default `"message"`) supplies the text that continues
//! down the pipeline, the remaining keys merge into `decoded_fields`, and
//! an in-payload `@timestamp` overrides the producer wall clock.

use serde_json::{Map, Value};
use tailer_config::JsonConfig;

pub struct JsonParsed {
    pub text: String,
    pub fields: Map<String, Value>,
    pub timestamp_override: Option<std::time::SystemTime>,
    pub doc_id: Option<String>,
}

pub fn parse_line(config: &JsonConfig, line: &str) -> JsonParsed {
    let message_key = config.message_key.as_deref().unwrap_or("message");

    let parsed: Option<Value> = serde_json::from_str(line).ok();
    let Some(Value::Object(mut object)) = parsed else {
        let mut fields = Map::new();
        if config.add_error_key {
            fields.insert(
                "error.message".to_string(),
                Value::String("json decoding failed".to_string()),
            );
        }
        return JsonParsed {
            text: line.to_string(),
            fields,
            timestamp_override: None,
            doc_id: None,
        };
    };

    let text = match object.remove(message_key) {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => line.to_string(),
    };

    let timestamp_override = object
        .get("@timestamp")
        .and_then(Value::as_str)
        .and_then(|s| humantime::parse_rfc3339(s).ok());
    if timestamp_override.is_some() {
        object.remove("@timestamp");
    }

    let doc_id = config
        .document_id
        .as_ref()
        .and_then(|key| object.get(key))
        .and_then(Value::as_str)
        .map(str::to_string);

    // `overwrite_keys` governs precedence once these fields are merged into
    // an event that may already carry same-named keys (the pipeline's
    // caller), not parsing itself.
    JsonParsed {
        text,
        fields: object,
        timestamp_override,
        doc_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JsonConfig {
        JsonConfig {
            enabled: true,
            message_key: None,
            overwrite_keys: false,
            add_error_key: true,
            document_id: None,
        }
    }

    #[test]
    fn extracts_default_message_key() {
        let parsed = parse_line(&config(), r#"{"message":"hello","level":"info"}"#);
        assert_eq!(parsed.text, "hello");
        assert_eq!(parsed.fields.get("level").unwrap(), "info");
        assert!(parsed.fields.get("message").is_none());
    }

    #[test]
    fn custom_message_key_is_honored() {
        let mut cfg = config();
        cfg.message_key = Some("log".to_string());
        let parsed = parse_line(&cfg, r#"{"log":"hi there","stream":"stdout"}"#);
        assert_eq!(parsed.text, "hi there");
        assert_eq!(parsed.fields.get("stream").unwrap(), "stdout");
    }

    #[test]
    fn non_json_line_falls_back_to_raw_text_with_error_key() {
        let parsed = parse_line(&config(), "not json at all");
        assert_eq!(parsed.text, "not json at all");
        assert!(parsed.fields.contains_key("error.message"));
    }

    #[test]
    fn timestamp_override_is_parsed_and_removed_from_fields() {
        let parsed = parse_line(
            &config(),
            r#"{"message":"hi","@timestamp":"2024-01-01T00:00:00Z"}"#,
        );
        assert!(parsed.timestamp_override.is_some());
        assert!(!parsed.fields.contains_key("@timestamp"));
    }

    #[test]
    fn document_id_is_extracted_when_configured() {
        let mut cfg = config();
        cfg.document_id = Some("id".to_string());
        let parsed = parse_line(&cfg, r#"{"message":"hi","id":"abc-123"}"#);
        assert_eq!(parsed.doc_id.as_deref(), Some("abc-123"));
    }
}

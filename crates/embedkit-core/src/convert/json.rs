//! JSON grammar: an explicit schema walk over `serde_json::Value`.
//!
//! Every member is checked by name and type before a draft is built, so a
//! mistyped or unknown key is reported with its path instead of being dropped.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::ConvertError;
use crate::embed::limits::MAX_COLOR;
use crate::embed::{EmbedAuthor, EmbedDraft, EmbedField, EmbedFooter, EmbedMedia};

const EMBED_KEYS: &[&str] = &[
    "type",
    "title",
    "description",
    "color",
    "author",
    "footer",
    "image",
    "thumbnail",
    "timestamp",
    "fields",
];
const AUTHOR_KEYS: &[&str] = &["name", "icon_url", "url"];
const FOOTER_KEYS: &[&str] = &["text", "icon_url"];
const MEDIA_KEYS: &[&str] = &["url"];
const FIELD_KEYS: &[&str] = &["name", "value", "inline"];

/// Parses JSON text into an unvalidated draft.
pub(crate) fn parse_draft(text: &str) -> Result<EmbedDraft, ConvertError> {
    let value: Value = serde_json::from_str(text)?;
    let object = unwrap_envelope(&value)?;
    draft_from_object(object)
}

/// Accepts a bare embed object or `{"embed": {...}}` / `{"embeds": [{...}]}`.
fn unwrap_envelope(value: &Value) -> Result<&Map<String, Value>, ConvertError> {
    let object = as_object(value, "embed")?;

    if object.len() == 1 {
        if let Some(inner) = object.get("embed") {
            return as_object(inner, "embed");
        }
        if let Some(list) = object.get("embeds") {
            let list = list
                .as_array()
                .ok_or_else(|| type_error("embeds", "an array", list))?;
            return match list.as_slice() {
                [] => Err(ConvertError::schema(
                    "embeds",
                    "must contain exactly one embed, found none",
                )),
                [single] => as_object(single, "embeds[0]"),
                many => Err(ConvertError::schema(
                    "embeds",
                    format!("must contain exactly one embed, found {}", many.len()),
                )),
            };
        }
    }

    Ok(object)
}

fn draft_from_object(object: &Map<String, Value>) -> Result<EmbedDraft, ConvertError> {
    check_keys(object, EMBED_KEYS, "")?;

    if let Some(kind) = opt_string(object, "type", "type")? {
        if kind != "rich" {
            return Err(ConvertError::schema(
                "type",
                format!("only `rich` embeds can be authored, found `{kind}`"),
            ));
        }
    }

    Ok(EmbedDraft {
        title: opt_string(object, "title", "title")?,
        description: opt_string(object, "description", "description")?,
        color: opt_color(object)?,
        author: opt_author(object)?,
        footer: opt_footer(object)?,
        image: opt_media(object, "image")?,
        thumbnail: opt_media(object, "thumbnail")?,
        timestamp: opt_timestamp(object)?,
        fields: fields(object)?,
    })
}

fn opt_color(object: &Map<String, Value>) -> Result<Option<u32>, ConvertError> {
    match present(object, "color") {
        None => Ok(None),
        Some(Value::Number(number)) => {
            let color = number
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .filter(|c| *c <= MAX_COLOR)
                .ok_or_else(|| {
                    ConvertError::schema("color", format!("{number} is not a 24-bit RGB value"))
                })?;
            Ok(Some(color))
        }
        Some(Value::String(text)) => parse_color(text).map(Some),
        Some(other) => Err(type_error("color", "an integer or a hex string", other)),
    }
}

/// Parses `#RRGGBB`, `0xRRGGBB` or a decimal integer.
pub(crate) fn parse_color(text: &str) -> Result<u32, ConvertError> {
    let trimmed = text.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        trimmed.parse::<u32>().ok()
    };

    parsed.filter(|c| *c <= MAX_COLOR).ok_or_else(|| {
        ConvertError::schema(
            "color",
            format!("`{text}` is not a 24-bit color (use #RRGGBB, 0xRRGGBB or an integer)"),
        )
    })
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ConvertError> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            ConvertError::schema("timestamp", format!("`{text}` is not an RFC 3339 timestamp: {e}"))
        })
}

fn opt_timestamp(object: &Map<String, Value>) -> Result<Option<DateTime<Utc>>, ConvertError> {
    opt_string(object, "timestamp", "timestamp")?
        .map(|text| parse_timestamp(&text))
        .transpose()
}

fn opt_author(object: &Map<String, Value>) -> Result<Option<EmbedAuthor>, ConvertError> {
    let Some(value) = present(object, "author") else {
        return Ok(None);
    };
    let author = as_object(value, "author")?;
    check_keys(author, AUTHOR_KEYS, "author")?;

    Ok(Some(EmbedAuthor {
        name: req_string(author, "name", "author.name")?,
        icon_url: opt_string(author, "icon_url", "author.icon_url")?,
        url: opt_string(author, "url", "author.url")?,
    }))
}

fn opt_footer(object: &Map<String, Value>) -> Result<Option<EmbedFooter>, ConvertError> {
    let Some(value) = present(object, "footer") else {
        return Ok(None);
    };
    let footer = as_object(value, "footer")?;
    check_keys(footer, FOOTER_KEYS, "footer")?;

    Ok(Some(EmbedFooter {
        text: req_string(footer, "text", "footer.text")?,
        icon_url: opt_string(footer, "icon_url", "footer.icon_url")?,
    }))
}

fn opt_media(object: &Map<String, Value>, key: &str) -> Result<Option<EmbedMedia>, ConvertError> {
    let Some(value) = present(object, key) else {
        return Ok(None);
    };
    let media = as_object(value, key)?;
    check_keys(media, MEDIA_KEYS, key)?;

    Ok(Some(EmbedMedia {
        url: req_string(media, "url", &format!("{key}.url"))?,
    }))
}

fn fields(object: &Map<String, Value>) -> Result<Vec<EmbedField>, ConvertError> {
    let Some(value) = present(object, "fields") else {
        return Ok(Vec::new());
    };
    let list = value
        .as_array()
        .ok_or_else(|| type_error("fields", "an array", value))?;

    list.iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("fields[{i}]");
            let field = as_object(item, &path)?;
            check_keys(field, FIELD_KEYS, &path)?;

            let inline = match present(field, "inline") {
                None => false,
                Some(Value::Bool(b)) => *b,
                Some(other) => {
                    return Err(type_error(&format!("{path}.inline"), "a boolean", other));
                }
            };

            Ok(EmbedField {
                name: req_string(field, "name", &format!("{path}.name"))?,
                value: req_string(field, "value", &format!("{path}.value"))?,
                inline,
            })
        })
        .collect()
}

// ============================================================================
// Value helpers
// ============================================================================

/// Returns the member unless it is missing or `null`.
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ConvertError> {
    value
        .as_object()
        .ok_or_else(|| type_error(path, "an object", value))
}

fn opt_string(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<String>, ConvertError> {
    match present(object, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(type_error(path, "a string", other)),
    }
}

fn req_string(object: &Map<String, Value>, key: &str, path: &str) -> Result<String, ConvertError> {
    opt_string(object, key, path)?.ok_or_else(|| ConvertError::schema(path, "is required"))
}

fn check_keys(object: &Map<String, Value>, allowed: &[&str], prefix: &str) -> Result<(), ConvertError> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        None => Ok(()),
        Some(key) => {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            Err(ConvertError::schema(
                path,
                format!("unknown field (expected one of {})", allowed.join(", ")),
            ))
        }
    }
}

fn type_error(path: &str, expected: &str, found: &Value) -> ConvertError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    ConvertError::schema(path, format!("expected {expected}, found {found}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_object() {
        let draft = parse_draft(
            r##"{
                "title": "Hello",
                "description": "World",
                "color": "#ff0000",
                "author": {"name": "Mod", "icon_url": "https://example.com/a.png"},
                "footer": {"text": "bye"},
                "image": {"url": "https://example.com/i.png"},
                "timestamp": "2024-05-01T12:00:00+02:00",
                "fields": [{"name": "a", "value": "b", "inline": true}, {"name": "c", "value": "d"}]
            }"##,
        )
        .unwrap();

        assert_eq!(draft.title.as_deref(), Some("Hello"));
        assert_eq!(draft.color, Some(0xFF0000));
        assert_eq!(draft.author.unwrap().name, "Mod");
        assert_eq!(draft.fields.len(), 2);
        assert!(draft.fields[0].inline);
        assert!(!draft.fields[1].inline);
        assert_eq!(
            draft.timestamp.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_unknown_key_is_named() {
        let err = parse_draft(r#"{"title": "x", "colour": 5}"#).unwrap_err();
        assert!(err.is_schema_violation_on("colour"));
    }

    #[test]
    fn test_nested_unknown_key_is_named() {
        let err = parse_draft(r#"{"author": {"name": "x", "avatar": "y"}}"#).unwrap_err();
        assert!(err.is_schema_violation_on("author.avatar"));
    }

    #[test]
    fn test_mistyped_member_is_not_coerced() {
        let err = parse_draft(r#"{"title": 42}"#).unwrap_err();
        assert!(err.is_schema_violation_on("title"));
        assert!(err.to_string().contains("expected a string, found a number"));

        let err = parse_draft(r#"{"fields": [{"name": "a", "value": "b", "inline": "yes"}]}"#)
            .unwrap_err();
        assert!(err.is_schema_violation_on("fields[0].inline"));
    }

    #[test]
    fn test_missing_required_member() {
        let err = parse_draft(r#"{"fields": [{"name": "a"}]}"#).unwrap_err();
        assert!(err.is_schema_violation_on("fields[0].value"));
    }

    #[test]
    fn test_null_means_absent() {
        let draft = parse_draft(r#"{"title": "x", "footer": null, "color": null}"#).unwrap();
        assert!(draft.footer.is_none());
        assert!(draft.color.is_none());
    }

    #[test]
    fn test_envelopes() {
        let draft = parse_draft(r#"{"embed": {"title": "a"}}"#).unwrap();
        assert_eq!(draft.title.as_deref(), Some("a"));

        let draft = parse_draft(r#"{"embeds": [{"title": "b"}]}"#).unwrap();
        assert_eq!(draft.title.as_deref(), Some("b"));

        let err = parse_draft(r#"{"embeds": []}"#).unwrap_err();
        assert!(err.is_schema_violation_on("embeds"));

        let err = parse_draft(r#"{"embeds": [{"title": "a"}, {"title": "b"}]}"#).unwrap_err();
        assert!(err.is_schema_violation_on("embeds"));
    }

    #[test]
    fn test_non_rich_type_rejected() {
        assert!(parse_draft(r#"{"type": "rich", "title": "a"}"#).is_ok());
        let err = parse_draft(r#"{"type": "video", "title": "a"}"#).unwrap_err();
        assert!(err.is_schema_violation_on("type"));
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = parse_draft("[1, 2]").unwrap_err();
        assert!(err.is_schema_violation_on("embed"));
    }

    #[test]
    fn test_syntax_error_is_malformed() {
        let err = parse_draft("{\"title\": \"x\",}").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput { line: Some(1), .. }));
    }

    #[test]
    fn test_color_forms() {
        assert_eq!(parse_color("#00ff00").unwrap(), 0x00FF00);
        assert_eq!(parse_color("0x0000FF").unwrap(), 0x0000FF);
        assert_eq!(parse_color("16777215").unwrap(), 0xFFFFFF);
        assert!(parse_color("16777216").is_err());
        assert!(parse_color("red").is_err());

        let err = parse_draft(r#"{"title": "x", "color": -1}"#).unwrap_err();
        assert!(err.is_schema_violation_on("color"));
        let err = parse_draft(r#"{"title": "x", "color": 1.5}"#).unwrap_err();
        assert!(err.is_schema_violation_on("color"));
    }

    #[test]
    fn test_bad_timestamp() {
        let err = parse_draft(r#"{"title": "x", "timestamp": "yesterday"}"#).unwrap_err();
        assert!(err.is_schema_violation_on("timestamp"));
    }
}

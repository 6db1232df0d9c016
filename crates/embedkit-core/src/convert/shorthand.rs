//! Line-oriented shorthand grammar.
//!
//! ```text
//! title: Server rules
//! description: Please read carefully.
//! description: Breaking them gets you muted.
//! color: #5865F2
//! author: Mod Team | https://example.com/icon.png
//! field: Rule 1 | Be kind | inline
//! footer: Updated weekly
//! ```
//!
//! Lines starting with `#` are comments. `description` may repeat; its lines
//! are joined with newlines. Every other key may appear once, except `field`.

use super::ConvertError;
use super::json::{parse_color, parse_timestamp};
use crate::embed::{EmbedAuthor, EmbedDraft, EmbedField, EmbedFooter, EmbedMedia};

pub(crate) fn parse_draft(text: &str) -> Result<EmbedDraft, ConvertError> {
    let mut draft = EmbedDraft::default();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or_else(|| {
            ConvertError::malformed(
                format!("expected `key: value`, found `{line}`"),
                Some(line_no),
                None,
            )
        })?;
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "title" => set_once(&mut draft.title, "title", value.to_string())?,
            "description" => {
                let description = draft.description.get_or_insert_with(String::new);
                if !description.is_empty() {
                    description.push('\n');
                }
                description.push_str(value);
            }
            "color" | "colour" => set_once(&mut draft.color, "color", parse_color(value)?)?,
            "image" => set_once(
                &mut draft.image,
                "image",
                EmbedMedia {
                    url: value.to_string(),
                },
            )?,
            "thumbnail" => set_once(
                &mut draft.thumbnail,
                "thumbnail",
                EmbedMedia {
                    url: value.to_string(),
                },
            )?,
            "timestamp" => set_once(&mut draft.timestamp, "timestamp", parse_timestamp(value)?)?,
            "author" => {
                let parts = split_parts(value, "author", 1, 3)?;
                let author = EmbedAuthor {
                    name: parts[0].to_string(),
                    icon_url: optional_part(&parts, 1),
                    url: optional_part(&parts, 2),
                };
                set_once(&mut draft.author, "author", author)?;
            }
            "footer" => {
                let parts = split_parts(value, "footer", 1, 2)?;
                let footer = EmbedFooter {
                    text: parts[0].to_string(),
                    icon_url: optional_part(&parts, 1),
                };
                set_once(&mut draft.footer, "footer", footer)?;
            }
            "field" => {
                let path = format!("fields[{}]", draft.fields.len());
                let parts = split_parts(value, &path, 2, 3)?;
                let inline = match parts.get(2).copied() {
                    None | Some("") | Some("false") | Some("no") => false,
                    Some("true") | Some("yes") | Some("inline") => true,
                    Some(other) => {
                        return Err(ConvertError::schema(
                            format!("{path}.inline"),
                            format!("`{other}` is not one of true, false, inline"),
                        ));
                    }
                };
                draft
                    .fields
                    .push(EmbedField::new(parts[0], parts[1], inline));
            }
            other => {
                return Err(ConvertError::schema(
                    other,
                    format!(
                        "unknown key on line {line_no} (expected one of title, description, \
                         color, author, footer, image, thumbnail, timestamp, field)"
                    ),
                ));
            }
        }
    }

    Ok(draft)
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<(), ConvertError> {
    if slot.is_some() {
        return Err(ConvertError::schema(key, "given more than once"));
    }
    *slot = Some(value);
    Ok(())
}

fn split_parts<'a>(
    value: &'a str,
    key: &str,
    min: usize,
    max: usize,
) -> Result<Vec<&'a str>, ConvertError> {
    let parts: Vec<&str> = value.split('|').map(str::trim).collect();
    if parts.len() < min || parts.len() > max {
        return Err(ConvertError::schema(
            key,
            format!(
                "expected {min} to {max} `|`-separated parts, found {}",
                parts.len()
            ),
        ));
    }
    Ok(parts)
}

fn optional_part(parts: &[&str], index: usize) -> Option<String> {
    parts
        .get(index)
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_directives() {
        let draft = parse_draft(
            "title: Rules\n\
             # a comment\n\
             description: one\n\
             description: two\n\
             color: #00FF00\n\
             author: Mods | https://example.com/a.png\n\
             field: A | B | inline\n\
             field: C | D\n\
             footer: bye | https://example.com/f.png\n\
             image: https://example.com/i.png\n\
             timestamp: 2024-01-01T00:00:00Z",
        )
        .unwrap();

        assert_eq!(draft.title.as_deref(), Some("Rules"));
        assert_eq!(draft.description.as_deref(), Some("one\ntwo"));
        assert_eq!(draft.color, Some(0x00FF00));
        let author = draft.author.unwrap();
        assert_eq!(author.name, "Mods");
        assert_eq!(author.icon_url.as_deref(), Some("https://example.com/a.png"));
        assert!(author.url.is_none());
        assert_eq!(draft.fields.len(), 2);
        assert!(draft.fields[0].inline);
        assert!(!draft.fields[1].inline);
        assert_eq!(draft.footer.unwrap().text, "bye");
        assert!(draft.image.is_some());
        assert!(draft.timestamp.is_some());
    }

    #[test]
    fn test_line_without_colon_reports_line() {
        let err = parse_draft("title: ok\njust some words").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput { line: Some(2), .. }));
    }

    #[test]
    fn test_unknown_key() {
        let err = parse_draft("subtitle: nope").unwrap_err();
        assert!(err.is_schema_violation_on("subtitle"));
    }

    #[test]
    fn test_duplicate_title() {
        let err = parse_draft("title: a\ntitle: b").unwrap_err();
        assert!(err.is_schema_violation_on("title"));
    }

    #[test]
    fn test_field_needs_name_and_value() {
        let err = parse_draft("field: lonely").unwrap_err();
        assert!(err.is_schema_violation_on("fields[0]"));
    }

    #[test]
    fn test_colon_inside_value_is_kept() {
        let draft = parse_draft("description: time: 10:00").unwrap();
        assert_eq!(draft.description.as_deref(), Some("time: 10:00"));
    }
}

// src/formatting/properties/mod.rs
//! Normalizes Notion page properties into plain JSON values.
//!
//! Each raw property object (`{"id", "type", "<type>": ...}`) becomes a
//! value a client can use without knowing Notion's envelope. Types without
//! a rule here, and properties whose payload does not have the expected
//! shape, are passed through untouched.

use crate::constants::UNTITLED_DOCUMENT_TITLE;
use crate::model::DocumentProperties;
use crate::types::{plain_text, RichTextItem};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct SelectOption {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    id: String,
    name: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct FileLink {
    name: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireFile {
    #[serde(default)]
    name: String,
    #[serde(flatten)]
    hosting: Value,
}

#[derive(Debug, Deserialize)]
struct RelationRef {
    id: String,
}

/// Normalizes every property, keeping the page's property order.
pub fn extract_properties(raw: &IndexMap<String, Value>) -> DocumentProperties {
    raw.iter()
        .map(|(name, property)| (name.clone(), normalize_property(name, property)))
        .collect()
}

/// The document title: the text of the `title` property, or the fallback.
pub fn document_title(raw: &IndexMap<String, Value>) -> String {
    raw.values()
        .find(|property| property_type(property) == Some("title"))
        .and_then(|property| property.get("title").cloned())
        .and_then(|value| serde_json::from_value::<Vec<RichTextItem>>(value).ok())
        .map(|items| plain_text(&items))
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| UNTITLED_DOCUMENT_TITLE.to_string())
}

fn property_type(property: &Value) -> Option<&str> {
    property.get("type").and_then(Value::as_str)
}

/// Normalizes one raw property object.
pub fn normalize_property(name: &str, property: &Value) -> Value {
    let Some(kind) = property_type(property) else {
        return property.clone();
    };
    let payload = property.get(kind).cloned().unwrap_or(Value::Null);

    match normalize_payload(kind, payload) {
        Ok(value) => value,
        Err(e) => {
            log::debug!(
                "Property '{}' of type '{}' kept raw: {}",
                name,
                kind,
                e
            );
            property.clone()
        }
    }
}

fn normalize_payload(kind: &str, payload: Value) -> Result<Value, serde_json::Error> {
    let value = match kind {
        "title" | "rich_text" => {
            let items: Vec<RichTextItem> = serde_json::from_value(payload)?;
            Value::String(plain_text(&items))
        }
        "number" | "checkbox" | "url" | "email" | "phone_number" | "date" => payload,
        "select" => {
            let option: Option<SelectOption> = serde_json::from_value(payload)?;
            option.map_or(Value::Null, |option| Value::String(option.name))
        }
        "multi_select" => {
            let options: Vec<SelectOption> = serde_json::from_value(payload)?;
            Value::Array(
                options
                    .into_iter()
                    .map(|option| Value::String(option.name))
                    .collect(),
            )
        }
        "people" => {
            let users: Vec<WireUser> = serde_json::from_value(payload)?;
            let people: Vec<Person> = users
                .into_iter()
                .map(|user| Person {
                    id: user.id,
                    name: user.name,
                    avatar_url: user.avatar_url,
                })
                .collect();
            serde_json::to_value(people)?
        }
        "files" => {
            let files: Vec<WireFile> = serde_json::from_value(payload)?;
            let links: Vec<FileLink> = files
                .into_iter()
                .map(|file| FileLink {
                    url: crate::api::parser::file_url(&file.hosting),
                    name: file.name,
                })
                .collect();
            serde_json::to_value(links)?
        }
        "relation" => {
            let relations: Vec<RelationRef> = serde_json::from_value(payload)?;
            Value::Array(
                relations
                    .into_iter()
                    .map(|relation| Value::String(relation.id))
                    .collect(),
            )
        }
        _ => {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "no normalization rule",
            ))
        }
    };
    Ok(value)
}

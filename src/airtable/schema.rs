use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::models::Category;

/// Response of `GET /meta/bases/{base}/tables`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseSchema {
    #[serde(default)]
    pub tables: Vec<TableSchema>,
}

impl BaseSchema {
    pub fn table(&self, table_id: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.id == table_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    SingleSelect { choices: Vec<String> },
    MultilineText,
    SingleLineText,
    Number { precision: u8 },
    Checkbox,
    DateTime,
}

impl FieldKind {
    pub fn api_type(&self) -> &'static str {
        match self {
            FieldKind::SingleSelect { .. } => "singleSelect",
            FieldKind::MultilineText => "multilineText",
            FieldKind::SingleLineText => "singleLineText",
            FieldKind::Number { .. } => "number",
            FieldKind::Checkbox => "checkbox",
            FieldKind::DateTime => "dateTime",
        }
    }

    /// Kind-specific `options` object, if the kind takes one.
    pub fn options(&self) -> Option<Value> {
        match self {
            FieldKind::SingleSelect { choices } => Some(json!({
                "choices": choices.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>()
            })),
            FieldKind::Number { precision } => Some(json!({ "precision": precision })),
            FieldKind::Checkbox => Some(json!({ "color": "greenBright", "icon": "check" })),
            FieldKind::DateTime => Some(json!({
                "dateFormat": { "name": "iso", "format": "YYYY-MM-DD" },
                "timeFormat": { "name": "24hour", "format": "HH:mm" },
                "timeZone": "client"
            })),
            FieldKind::MultilineText | FieldKind::SingleLineText => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

/// Body of `POST /meta/bases/{base}/tables/{table}/fields`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl FieldDescriptor {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }

    pub fn to_config(&self) -> FieldConfig {
        FieldConfig {
            name: self.name.clone(),
            field_type: self.kind.api_type(),
            options: self.kind.options(),
        }
    }
}

/// The fields every uploaded row needs.
pub fn required_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(
            "Category",
            FieldKind::SingleSelect {
                choices: Category::ALL.iter().map(|c| c.to_string()).collect(),
            },
        ),
        FieldDescriptor::new("Content", FieldKind::MultilineText),
        FieldDescriptor::new("Author", FieldKind::SingleLineText),
        FieldDescriptor::new("Votes", FieldKind::Number { precision: 0 }),
        FieldDescriptor::new("Hearted", FieldKind::Checkbox),
        FieldDescriptor::new("Has_Replies", FieldKind::Checkbox),
        FieldDescriptor::new("Last_Updated", FieldKind::DateTime),
    ]
}

/// Required fields with no existing field of exactly the same name.
///
/// The match is case-sensitive and ignores field types: a same-named field of
/// another type counts as present.
pub fn missing_fields(required: &[FieldDescriptor], table: &TableSchema) -> Vec<FieldDescriptor> {
    let existing: HashSet<&str> = table.fields.iter().map(|f| f.name.as_str()).collect();

    required
        .iter()
        .filter(|f| !existing.contains(f.name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(fields: &[(&str, &str)]) -> TableSchema {
        TableSchema {
            id: "tblTest".to_string(),
            name: "Comments".to_string(),
            fields: fields
                .iter()
                .map(|(name, field_type)| FieldSchema {
                    id: None,
                    name: name.to_string(),
                    field_type: field_type.to_string(),
                })
                .collect(),
        }
    }

    fn names(fields: &[FieldDescriptor]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_all_missing_on_empty_table() {
        let missing = missing_fields(&required_fields(), &table_with(&[]));
        assert_eq!(
            names(&missing),
            ["Category", "Content", "Author", "Votes", "Hearted", "Has_Replies", "Last_Updated"]
        );
    }

    #[test]
    fn test_name_match_is_case_sensitive() {
        let table = table_with(&[("category", "singleSelect"), ("Content", "multilineText")]);
        let missing = missing_fields(&required_fields(), &table);

        assert!(names(&missing).contains(&"Category"));
        assert!(!names(&missing).contains(&"Content"));
    }

    #[test]
    fn test_field_type_is_not_reconciled() {
        let table = table_with(&[("Votes", "singleLineText")]);
        let missing = missing_fields(&required_fields(), &table);
        assert!(!names(&missing).contains(&"Votes"));
    }

    #[test]
    fn test_field_configs() {
        let fields = required_fields();

        let category = serde_json::to_value(fields[0].to_config()).unwrap();
        assert_eq!(
            category,
            json!({
                "name": "Category",
                "type": "singleSelect",
                "options": {"choices": [
                    {"name": "tutorial_ideas"},
                    {"name": "use_cases"},
                    {"name": "technical_questions"},
                    {"name": "problem_statements"}
                ]}
            })
        );

        let content = serde_json::to_value(fields[1].to_config()).unwrap();
        assert_eq!(content, json!({"name": "Content", "type": "multilineText"}));

        let votes = serde_json::to_value(fields[3].to_config()).unwrap();
        assert_eq!(votes["options"], json!({"precision": 0}));

        let hearted = serde_json::to_value(fields[4].to_config()).unwrap();
        assert_eq!(hearted["options"]["icon"], json!("check"));

        let updated = serde_json::to_value(fields[6].to_config()).unwrap();
        assert_eq!(updated["type"], json!("dateTime"));
        assert_eq!(updated["options"]["timeZone"], json!("client"));
    }

    #[test]
    fn test_locate_table_by_id() {
        let schema: BaseSchema = serde_json::from_value(json!({
            "tables": [
                {"id": "tblOther", "name": "Other", "fields": []},
                {"id": "tblTest", "name": "Comments", "fields": [
                    {"id": "fld1", "name": "Content", "type": "multilineText"}
                ]}
            ]
        }))
        .unwrap();

        let table = schema.table("tblTest").unwrap();
        assert_eq!(table.name, "Comments");
        assert_eq!(table.fields[0].field_type, "multilineText");
        assert!(schema.table("tblMissing").is_none());
    }
}

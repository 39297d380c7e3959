#![forbid(unsafe_code)]

use crate::ids::{CustomFieldId, CustomFieldOptionId, CustomFieldValueId, ProjectId, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Dropdown,
    Boolean,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        Self::Text,
        Self::Number,
        Self::Date,
        Self::Dropdown,
        Self::Boolean,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Dropdown => "dropdown",
            Self::Boolean => "boolean",
        }
    }

    /// Returns `None` for names outside the type table; callers treat that as fatal.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field_type| field_type.as_str() == value)
    }

    /// The one value slot a field of this type may populate.
    pub fn value_slot(self) -> ValueSlot {
        match self {
            Self::Text => ValueSlot::Text,
            Self::Number => ValueSlot::Number,
            Self::Date => ValueSlot::Date,
            Self::Dropdown => ValueSlot::Text,
            Self::Boolean => ValueSlot::Boolean,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSlot {
    Text,
    Number,
    Date,
    Boolean,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(i64),
    Boolean(bool),
}

impl FieldValue {
    pub fn slot(&self) -> ValueSlot {
        match self {
            Self::Text(_) => ValueSlot::Text,
            Self::Number(_) => ValueSlot::Number,
            Self::Date(_) => ValueSlot::Date,
            Self::Boolean(_) => ValueSlot::Boolean,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldOption {
    pub id: CustomFieldOptionId,
    pub value: String,
    pub color: Option<String>,
    pub position: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: CustomFieldId,
    pub project_id: ProjectId,
    pub name: String,
    pub field_type: FieldType,
    pub created_at_ms: i64,
    pub options: Vec<CustomFieldOption>,
}

impl CustomField {
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewFieldOption {
    pub value: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

impl NewFieldOption {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            color: None,
            position: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewCustomField {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Vec<NewFieldOption>,
}

/// Client payload for a task value: one slot per storage column, all optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CustomFieldValuePayload {
    #[serde(default)]
    pub value_text: Option<String>,
    #[serde(default)]
    pub value_number: Option<f64>,
    #[serde(default)]
    pub value_date: Option<i64>,
    #[serde(default)]
    pub value_boolean: Option<bool>,
}

impl CustomFieldValuePayload {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value_text: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            value_number: Some(value),
            ..Self::default()
        }
    }

    pub fn date(value_ms: i64) -> Self {
        Self {
            value_date: Some(value_ms),
            ..Self::default()
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            value_boolean: Some(value),
            ..Self::default()
        }
    }

    pub fn populated_slots(&self) -> Vec<ValueSlot> {
        let mut slots = Vec::new();
        if self.value_text.is_some() {
            slots.push(ValueSlot::Text);
        }
        if self.value_number.is_some() {
            slots.push(ValueSlot::Number);
        }
        if self.value_date.is_some() {
            slots.push(ValueSlot::Date);
        }
        if self.value_boolean.is_some() {
            slots.push(ValueSlot::Boolean);
        }
        slots
    }

    pub fn slot_value(&self, slot: ValueSlot) -> Option<FieldValue> {
        match slot {
            ValueSlot::Text => self.value_text.clone().map(FieldValue::Text),
            ValueSlot::Number => self.value_number.map(FieldValue::Number),
            ValueSlot::Date => self.value_date.map(FieldValue::Date),
            ValueSlot::Boolean => self.value_boolean.map(FieldValue::Boolean),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub id: CustomFieldValueId,
    pub task_id: TaskId,
    pub custom_field_id: CustomFieldId,
    pub value: FieldValue,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

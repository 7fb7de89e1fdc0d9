mod description;
mod instructions;
mod json;

pub use self::description::{word_count, MAX_DESCRIPTION_WORDS};
pub use self::json::extract_object;

use crate::config::{DescriptionPolicy, InstructionPolicy, ValidationConfig};
use crate::error::{ExtractError, ValidationError};
use crate::model::{Ingredient, Recipe, NOT_AVAILABLE};
use log::debug;
use serde_json::{Map, Value};

/// At most this many tags are kept
pub const MAX_TAGS: usize = 3;

/// Turns raw model output into a [`Recipe`], repairing what it safely can.
///
/// Fields are checked in schema order (name, tags, description, ingredients,
/// instructions) and the first unrepairable one is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator {
    description_policy: DescriptionPolicy,
    instruction_policy: InstructionPolicy,
}

impl ResponseValidator {
    pub fn new(description_policy: DescriptionPolicy, instruction_policy: InstructionPolicy) -> Self {
        ResponseValidator {
            description_policy,
            instruction_policy,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.description_policy, config.instruction_policy)
    }

    pub fn validate(&self, raw_output: &str) -> Result<Recipe, ExtractError> {
        let object = extract_object(raw_output)?;
        Ok(self.validate_object(&object)?)
    }

    pub fn validate_object(&self, object: &Map<String, Value>) -> Result<Recipe, ValidationError> {
        let name = validate_name(object.get("name"))?;
        let tags = validate_tags(object.get("tags"))?;
        let description = match optional_str(object.get("description"), "description")? {
            Some(text) => description::enforce_limit(text, self.description_policy)?,
            None => String::new(),
        };
        let ingredients = validate_ingredients(object.get("ingredients"))?;
        let instructions = self.validate_instructions(object.get("instructions"))?;

        Ok(Recipe {
            name,
            tags,
            description,
            ingredients,
            instructions,
        })
    }

    fn validate_instructions(&self, value: Option<&Value>) -> Result<String, ValidationError> {
        let text = match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            // Some models answer with one array entry per step
            Some(Value::Array(steps)) => steps
                .iter()
                .map(|step| step.as_str().ok_or(INSTRUCTIONS_TYPE))
                .collect::<Result<Vec<&str>, _>>()?
                .join("\n"),
            Some(_) => return Err(INSTRUCTIONS_TYPE),
        };

        instructions::normalize_steps(&text, self.instruction_policy)
    }
}

const INSTRUCTIONS_TYPE: ValidationError = ValidationError::InvalidField {
    field: "instructions",
    expected: "a string of numbered steps",
};

fn validate_name(value: Option<&Value>) -> Result<String, ValidationError> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingName)
}

fn validate_tags(value: Option<&Value>) -> Result<Vec<String>, ValidationError> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ValidationError::InvalidField {
                field: "tags",
                expected: "an array of strings",
            })
        }
    };

    let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);
    for tag in entries
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
    {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }

    if tags.len() > MAX_TAGS {
        debug!("Dropping {} tags over the limit", tags.len() - MAX_TAGS);
        tags.truncate(MAX_TAGS);
    }
    Ok(tags)
}

fn optional_str<'a>(
    value: Option<&'a Value>,
    field: &'static str,
) -> Result<Option<&'a str>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn validate_ingredients(value: Option<&Value>) -> Result<Vec<Ingredient>, ValidationError> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ValidationError::InvalidField {
                field: "ingredients",
                expected: "an array of objects",
            })
        }
    };

    let ingredients: Vec<Ingredient> = entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let name = scalar_text(entry.get("ingredient"))?;
            Some(Ingredient::new(
                name,
                scalar_text(entry.get("amount")).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                scalar_text(entry.get("unit")).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ))
        })
        .collect();

    if ingredients.len() < entries.len() {
        debug!(
            "Dropped {} ingredient entries without a name",
            entries.len() - ingredients.len()
        );
    }
    Ok(ingredients)
}

/// Non-blank text of a string or number value
fn scalar_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

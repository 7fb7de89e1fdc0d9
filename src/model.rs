use serde::{Deserialize, Serialize};

/// Placeholder for an amount or unit the transcript never mentions
pub const NOT_AVAILABLE: &str = "N/A";

/// A validated recipe, ready to be handed to whatever stores it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub tags: Vec<String>,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    /// Numbered steps, one per line: "1. ...\n2. ...\n"
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub ingredient: String,
    pub amount: String,
    pub unit: String,
}

impl Ingredient {
    /// Create an ingredient, falling back to "N/A" for blank amount or unit
    pub fn new(
        ingredient: impl Into<String>,
        amount: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Ingredient {
            ingredient: ingredient.into(),
            amount: or_not_available(amount.into()),
            unit: or_not_available(unit.into()),
        }
    }
}

fn or_not_available(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

//! schema.org `Recipe` extraction from JSON-LD script blocks.

use serde_json::Value;

use crate::types::RecipeSchema;

/// Return the first `Recipe` node found across the given JSON-LD blocks.
///
/// Each block may be a single object, a top-level array, or an object with a
/// `@graph` array. Blocks that are not valid JSON are skipped.
pub(crate) fn extract_recipe_schema<'a, I>(blocks: I) -> Option<RecipeSchema>
where
    I: IntoIterator<Item = &'a str>,
{
    for block in blocks {
        let value: Value = match serde_json::from_str(block.trim()) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparseable JSON-LD block");
                continue;
            }
        };

        let mut candidates: Vec<&Value> = match &value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let graph_items: Vec<&Value> = candidates
            .iter()
            .filter_map(|item| item.get("@graph").and_then(Value::as_array))
            .flatten()
            .collect();
        candidates.extend(graph_items);

        if let Some(recipe) = candidates.into_iter().find(|item| is_recipe(item)) {
            return Some(to_schema(recipe));
        }
    }

    None
}

/// `@type` may be a plain string or an array of strings.
fn is_recipe(item: &Value) -> bool {
    match item.get("@type") {
        Some(Value::String(s)) => s == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

fn to_schema(item: &Value) -> RecipeSchema {
    let text = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let ingredients = item
        .get("recipeIngredient")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let mut instructions = Vec::new();
    if let Some(node) = item.get("recipeInstructions") {
        flatten_instructions(node, &mut instructions);
    }

    RecipeSchema {
        name: text("name"),
        description: text("description"),
        prep_time: text("prepTime"),
        cook_time: text("cookTime"),
        total_time: text("totalTime"),
        recipe_yield: item.get("recipeYield").and_then(yield_text),
        ingredients,
        instructions,
    }
}

/// `recipeYield` shows up as a string, a bare number, or a list of both.
fn yield_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(yield_text),
        _ => None,
    }
}

fn flatten_instructions(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::String(s) => {
            let step = s.trim();
            if !step.is_empty() {
                out.push(step.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten_instructions(item, out);
            }
        }
        Value::Object(map) => {
            // HowToSection
            if let Some(children) = map.get("itemListElement") {
                flatten_instructions(children, out);
                return;
            }
            // HowToStep
            if let Some(step) = map
                .get("text")
                .or_else(|| map.get("name"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
            {
                out.push(step.to_string());
            }
        }
        _ => {}
    }
}

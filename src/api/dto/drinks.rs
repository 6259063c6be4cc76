/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short (公開一覧: color + parts のみ) / long (詳細: name も含む) の 2 表現
 * - recipe は単体 / 配列のどちらでも受け付け、常に配列で保存する
 */
use serde::{Deserialize, Serialize};

use crate::repos::{DrinkRow, RecipePart};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<RecipePart>),
    One(RecipePart),
}

impl RecipeInput {
    pub fn into_parts(self) -> Vec<RecipePart> {
        match self {
            RecipeInput::Many(parts) => parts,
            RecipeInput::One(part) => vec![part],
        }
    }
}

fn validate_parts(parts: &[RecipePart]) -> Result<(), &'static str> {
    if parts.is_empty() {
        return Err("recipe must have at least one part");
    }
    if parts
        .iter()
        .any(|p| p.name.trim().is_empty() || p.color.trim().is_empty())
    {
        return Err("recipe parts need a name and a color");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

impl CreateDrinkRequest {
    pub fn validate(self) -> Result<(String, Vec<RecipePart>), &'static str> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("title is required");
        }

        let recipe = self.recipe.into_parts();
        validate_parts(&recipe)?;

        Ok((title, recipe))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn validate(self) -> Result<(Option<String>, Option<Vec<RecipePart>>), &'static str> {
        let title = match self.title {
            Some(title) if title.trim().is_empty() => return Err("title cannot be empty"),
            Some(title) => Some(title.trim().to_string()),
            None => None,
        };

        let recipe = self.recipe.map(RecipeInput::into_parts);
        if let Some(parts) = &recipe {
            validate_parts(parts)?;
        }

        Ok((title, recipe))
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ShortRecipePart {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortRecipePart>,
}

impl From<DrinkRow> for DrinkShort {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row
                .recipe
                .into_iter()
                .map(|p| ShortRecipePart {
                    color: p.color,
                    parts: p.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

impl From<DrinkRow> for DrinkLong {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_recipe_part_is_wrapped() {
        let req: CreateDrinkRequest = serde_json::from_value(json!({
            "title": "water",
            "recipe": { "name": "water", "color": "blue", "parts": 1 }
        }))
        .unwrap();

        let (title, recipe) = req.validate().unwrap();
        assert_eq!(title, "water");
        assert_eq!(recipe.len(), 1);
    }

    #[test]
    fn blank_title_is_rejected() {
        let req: CreateDrinkRequest = serde_json::from_value(json!({
            "title": "  ",
            "recipe": [{ "name": "water", "color": "blue", "parts": 1 }]
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_recipe_is_rejected() {
        let req: UpdateDrinkRequest =
            serde_json::from_value(json!({ "recipe": [] })).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn short_form_drops_ingredient_names() {
        let row = DrinkRow {
            id: 1,
            title: "latte".into(),
            recipe: vec![RecipePart {
                color: "#334455".into(),
                name: "latte".into(),
                parts: 2,
            }],
        };

        let short = serde_json::to_value(DrinkShort::from(row)).unwrap();
        assert_eq!(
            short,
            json!({ "id": 1, "title": "latte", "recipe": [{ "color": "#334455", "parts": 2 }] })
        );
    }
}

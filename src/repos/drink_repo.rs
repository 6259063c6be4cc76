/*
 * Responsibility
 * - drinks CRUD (in-memory)
 * - title は一意 (重複は RepoError::DuplicateTitle)
 * - 見つからない id は Ok(None) / Ok(false) で返す
 */
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePart {
    pub color: String,
    pub name: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

#[async_trait]
pub trait DrinkRepo: Send + Sync {
    /// All drinks ordered by id.
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError>;

    async fn create(&self, title: &str, recipe: Vec<RecipePart>) -> Result<DrinkRow, RepoError>;

    /// `None` fields are left unchanged.
    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<Vec<RecipePart>>,
    ) -> Result<Option<DrinkRow>, RepoError>;

    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

#[derive(Debug, Default)]
struct Drinks {
    last_id: i64,
    rows: BTreeMap<i64, DrinkRow>,
}

impl Drinks {
    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|row| row.title == title && Some(row.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDrinkRepo {
    drinks: RwLock<Drinks>,
}

impl InMemoryDrinkRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkRepo for InMemoryDrinkRepo {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError> {
        Ok(self.drinks.read().await.rows.values().cloned().collect())
    }

    async fn create(&self, title: &str, recipe: Vec<RecipePart>) -> Result<DrinkRow, RepoError> {
        let mut drinks = self.drinks.write().await;
        if drinks.title_taken(title, None) {
            return Err(RepoError::DuplicateTitle(title.to_string()));
        }

        drinks.last_id += 1;
        let row = DrinkRow {
            id: drinks.last_id,
            title: title.to_string(),
            recipe,
        };
        drinks.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<Vec<RecipePart>>,
    ) -> Result<Option<DrinkRow>, RepoError> {
        let mut drinks = self.drinks.write().await;
        if !drinks.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(title) = title
            && drinks.title_taken(title, Some(id))
        {
            return Err(RepoError::DuplicateTitle(title.to_string()));
        }

        let Some(row) = drinks.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            row.title = title.to_string();
        }
        if let Some(recipe) = recipe {
            row.recipe = recipe;
        }

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.drinks.write().await.rows.remove(&id).is_some())
    }
}

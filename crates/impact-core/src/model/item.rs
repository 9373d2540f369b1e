use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A named item in the generic items collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or renaming an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewItem {
    pub name: String,
}

impl NewItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Checks that the name is present.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("name", "Path `name` is required."));
        }
        Ok(())
    }

    /// Builds a new item stamped at `now`.
    pub fn into_item(self, id: impl Into<String>, now: DateTime<Utc>) -> Result<Item> {
        self.validate()?;
        Ok(Item {
            id: id.into(),
            name: self.name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Renames an existing item.
    pub fn apply_to(self, item: &Item, now: DateTime<Utc>) -> Result<Item> {
        self.validate()?;
        Ok(Item {
            id: item.id.clone(),
            name: self.name,
            created_at: item.created_at,
            updated_at: now,
        })
    }
}

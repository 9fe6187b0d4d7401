use serde::{Deserialize, Serialize};

use crate::db_types::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// A row in one of the catalog collections was written.
///
/// Product image changes are reported against [`Entity::Products`] with the image id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogChangedEvent {
    pub entity: Entity,
    pub action: ChangeAction,
    pub id: String,
}

impl CatalogChangedEvent {
    pub fn new<S: Into<String>>(entity: Entity, action: ChangeAction, id: S) -> Self {
        Self { entity, action, id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUploadedEvent {
    pub key: String,
    pub public_url: String,
}

use std::{collections::BTreeMap, fmt::Display};

use crate::db_types::Entity;

/// Identifies one cached read. Parameters live in a sorted map, so the order they were added in does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    entity: Entity,
    params: BTreeMap<String, String>,
}

impl Fingerprint {
    pub fn new(entity: Entity) -> Self {
        Self { entity, params: BTreeMap::new() }
    }

    pub fn with_param<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// True if this fingerprint is the entity of `prefix` and carries every parameter of `prefix` with the same value.
    pub fn matches(&self, prefix: &FingerprintPrefix) -> bool {
        self.entity == prefix.entity && prefix.params.iter().all(|(k, v)| self.params.get(k) == Some(v))
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{", self.entity)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

/// Selects a group of fingerprints for invalidation: an entity, optionally narrowed by some parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintPrefix {
    entity: Entity,
    params: BTreeMap<String, String>,
}

impl FingerprintPrefix {
    pub fn new(entity: Entity) -> Self {
        Self { entity, params: BTreeMap::new() }
    }

    pub fn with_param<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }
}

impl From<Entity> for FingerprintPrefix {
    fn from(entity: Entity) -> Self {
        Self::new(entity)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn param_order_is_irrelevant() {
        let a = Fingerprint::new(Entity::Products).with_param("sort", "recent").with_param("category", "camisas");
        let b = Fingerprint::new(Entity::Products).with_param("category", "camisas").with_param("sort", "recent");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "products{category=camisas,sort=recent}");
    }

    #[test]
    fn prefixes() {
        let fp = Fingerprint::new(Entity::Products).with_param("view", "catalog").with_param("category", "camisas");
        assert!(fp.matches(&Entity::Products.into()));
        assert!(fp.matches(&FingerprintPrefix::new(Entity::Products).with_param("category", "camisas")));
        assert!(!fp.matches(&FingerprintPrefix::new(Entity::Products).with_param("category", "calcas")));
        assert!(!fp.matches(&FingerprintPrefix::new(Entity::Products).with_param("slug", "camisas")));
        assert!(!fp.matches(&Entity::Banners.into()));
    }
}

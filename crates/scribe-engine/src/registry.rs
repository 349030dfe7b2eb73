use crate::config::CollisionPolicy;
use crate::naming::MAX_NAME_LEN;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::warn;

/// Prefix stored in front of every raw XPath in the locator map.
pub const XPATH_PREFIX: &str = "xpath=";

/// Result of a successful `bind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub element_id: String,
    /// The name actually stored; differs from the requested one when a
    /// collision was disambiguated.
    pub name: String,
    pub locator: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindResult {
    Bound(Binding),
    /// The element id already had a binding; nothing changed.
    AlreadyBound { existing_name: String },
}

/// Owner of the two permanent mappings: element id to name, and name to
/// locator expression.
///
/// Entries are never removed. The name map keeps insertion order so that
/// snapshots are stable across rewrites.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    names_by_id: HashMap<String, String>,
    locators_by_name: IndexMap<String, String>,
    collision_policy: CollisionPolicy,
}

impl ElementRegistry {
    pub fn new(collision_policy: CollisionPolicy) -> Self {
        Self {
            names_by_id: HashMap::new(),
            locators_by_name: IndexMap::new(),
            collision_policy,
        }
    }

    /// Insert both mappings for `element_id`.
    ///
    /// `locator` is the raw XPath; it is stored as `xpath=<locator>`.
    pub fn bind(&mut self, element_id: &str, name: &str, locator: &str) -> BindResult {
        if let Some(existing) = self.names_by_id.get(element_id) {
            return BindResult::AlreadyBound {
                existing_name: existing.clone(),
            };
        }

        let expression = format!("{}{}", XPATH_PREFIX, locator);
        let name = self.resolve_name(name, &expression);

        self.locators_by_name.insert(name.clone(), expression);
        self.names_by_id.insert(element_id.to_string(), name.clone());

        BindResult::Bound(Binding {
            element_id: element_id.to_string(),
            name,
            locator: locator.to_string(),
        })
    }

    fn resolve_name(&self, name: &str, expression: &str) -> String {
        match self.locators_by_name.get(name) {
            None => name.to_string(),
            Some(existing) if existing == expression => name.to_string(),
            Some(existing) => match self.collision_policy {
                CollisionPolicy::Overwrite => {
                    warn!(
                        "Name '{}' already maps to {}; overwriting with {}",
                        name, existing, expression
                    );
                    name.to_string()
                }
                CollisionPolicy::Suffix => {
                    let unique = self.next_free_name(name, expression);
                    warn!(
                        "Name '{}' already maps to {}; storing {} as '{}'",
                        name, existing, expression, unique
                    );
                    unique
                }
            },
        }
    }

    /// `base_N` for the smallest free N. The base is cut short when needed so
    /// the result stays under [`MAX_NAME_LEN`].
    fn next_free_name(&self, base: &str, expression: &str) -> String {
        (2..)
            .map(|n| {
                let suffix = format!("_{}", n);
                let keep = MAX_NAME_LEN.saturating_sub(suffix.len() + 1);
                let stem: String = base.chars().take(keep).collect();
                format!("{}{}", stem, suffix)
            })
            .find(|candidate| match self.locators_by_name.get(candidate) {
                None => true,
                Some(existing) => existing == expression,
            })
            .unwrap_or_else(|| base.to_string())
    }

    pub fn lookup_name(&self, element_id: &str) -> Option<&str> {
        self.names_by_id.get(element_id).map(String::as_str)
    }

    pub fn contains_id(&self, element_id: &str) -> bool {
        self.names_by_id.contains_key(element_id)
    }

    /// Locator expression (`xpath=...`) currently stored under `name`.
    pub fn locator_of(&self, name: &str) -> Option<&str> {
        self.locators_by_name.get(name).map(String::as_str)
    }

    /// Ordered `name -> locator expression` view, as persisted.
    pub fn snapshot(&self) -> &IndexMap<String, String> {
        &self.locators_by_name
    }

    /// Number of locator entries.
    pub fn len(&self) -> usize {
        self.locators_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators_by_name.is_empty()
    }

    pub fn binding_count(&self) -> usize {
        self.names_by_id.len()
    }
}

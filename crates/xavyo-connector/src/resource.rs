//! Governance resource model.
//!
//! Resources, assignment entitlements and grants as the governance side
//! sees them. Connectors build these from target-system records; the ids
//! of entitlements and grants are derived deterministically from the
//! objects they join so the same edge always renders the same id.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::annotations::{Annotation, Annotations};

/// Resource type id for human users.
pub const USER_RESOURCE_TYPE: &str = "user";

/// Resource type id for roles.
pub const ROLE_RESOURCE_TYPE: &str = "role";

/// Capability a resource type advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTrait {
    /// Resource represents an identity.
    User,
    /// Resource represents a permission bundle.
    Role,
}

/// Kind of resource a connector synchronizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: String,
    pub display_name: String,
    pub traits: Vec<ResourceTrait>,
}

impl ResourceType {
    /// The `user` resource type.
    #[must_use]
    pub fn user() -> Self {
        Self {
            id: USER_RESOURCE_TYPE.to_string(),
            display_name: "User".to_string(),
            traits: vec![ResourceTrait::User],
        }
    }

    /// The `role` resource type.
    #[must_use]
    pub fn role() -> Self {
        Self {
            id: ROLE_RESOURCE_TYPE.to_string(),
            display_name: "Role".to_string(),
            traits: vec![ResourceTrait::Role],
        }
    }
}

/// Typed reference to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    pub resource_type: String,
    pub resource: String,
}

impl ResourceId {
    /// Create a new resource id.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource: resource.into(),
        }
    }

    /// Whether this id refers to a resource of the given type.
    #[must_use]
    pub fn is_type(&self, resource_type: &str) -> bool {
        self.resource_type == resource_type
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource)
    }
}

/// Free-form profile data attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(BTreeMap<String, Value>);

impl Profile {
    /// Create an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Whether the profile holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A synchronized object: a user, a role, ...
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub display_name: String,
    pub description: Option<String>,
    pub profile: Profile,
    pub annotations: Annotations,
}

impl Resource {
    /// Create a resource of the given type.
    #[must_use]
    pub fn new(
        resource_type: &ResourceType,
        id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ResourceId::new(resource_type.id.clone(), id),
            display_name: display_name.into(),
            description: None,
            profile: Profile::new(),
            annotations: Annotations::new(),
        }
    }

    /// Create a user resource.
    #[must_use]
    pub fn user(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(&ResourceType::user(), id, display_name)
    }

    /// Create a role resource.
    #[must_use]
    pub fn role(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(&ResourceType::role(), id, display_name)
    }

    /// Set the profile.
    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.update(annotation);
        self
    }
}

/// Why an entitlement exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementPurpose {
    /// Holding the entitlement means being assigned to the resource.
    Assignment,
    /// Holding the entitlement grants a permission on the resource.
    Permission,
}

/// Something a principal can be granted on a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Entitlement {
    pub id: String,
    pub resource: Resource,
    pub slug: String,
    pub display_name: String,
    pub description: Option<String>,
    pub purpose: EntitlementPurpose,
    pub grantable_to: Vec<String>,
    pub annotations: Annotations,
}

impl Entitlement {
    /// Create an assignment entitlement on `resource`.
    ///
    /// The id is `"{resource_type}:{resource_id}:{slug}"`.
    pub fn assignment(
        resource: Resource,
        slug: impl Into<String>,
        grantable_to: &[&ResourceType],
    ) -> Self {
        let slug = slug.into();
        Self {
            id: format!("{}:{}", resource.id, slug),
            display_name: slug.clone(),
            resource,
            slug,
            description: None,
            purpose: EntitlementPurpose::Assignment,
            grantable_to: grantable_to.iter().map(|rt| rt.id.clone()).collect(),
            annotations: Annotations::new(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.update(annotation);
        self
    }
}

/// A principal holding an entitlement.
#[derive(Debug, Clone, PartialEq)]
pub struct Grant {
    pub id: String,
    pub entitlement: Entitlement,
    pub principal: Resource,
    pub annotations: Annotations,
}

impl Grant {
    /// Create a grant of `entitlement` to `principal`.
    ///
    /// The id is `"{entitlement_id}:{principal_type}:{principal_id}"`.
    #[must_use]
    pub fn new(entitlement: Entitlement, principal: Resource) -> Self {
        Self {
            id: format!("{}:{}", entitlement.id, principal.id),
            entitlement,
            principal,
            annotations: Annotations::new(),
        }
    }

    /// Add an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.update(annotation);
        self
    }
}

//! Annotations attached to resources, entitlements, grants and results.
//!
//! An [`Annotations`] list holds at most one annotation of each kind;
//! [`Annotations::update`] replaces an existing annotation of the same kind.

use std::mem::discriminant;

/// A single piece of out-of-band information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Stable identifier used for cross-referencing with external systems.
    V1Identifier(String),
    /// Link to the object in the target system.
    ExternalLink(String),
    /// A grant request was already satisfied; nothing was written.
    GrantAlreadyExists,
    /// A revoke request was already satisfied; nothing was written.
    GrantAlreadyRevoked,
}

/// Ordered set of annotations, one per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    /// Create an empty annotation list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an annotation, replacing any existing annotation of the same kind.
    pub fn update(&mut self, annotation: Annotation) {
        let kind = discriminant(&annotation);
        if let Some(slot) = self.0.iter_mut().find(|a| discriminant(*a) == kind) {
            *slot = annotation;
        } else {
            self.0.push(annotation);
        }
    }

    /// Builder-style [`update`](Self::update).
    #[must_use]
    pub fn with(mut self, annotation: Annotation) -> Self {
        self.update(annotation);
        self
    }

    /// The `V1Identifier`, if present.
    #[must_use]
    pub fn v1_identifier(&self) -> Option<&str> {
        self.0.iter().find_map(|a| match a {
            Annotation::V1Identifier(id) => Some(id.as_str()),
            _ => None,
        })
    }

    /// The `ExternalLink`, if present.
    #[must_use]
    pub fn external_link(&self) -> Option<&str> {
        self.0.iter().find_map(|a| match a {
            Annotation::ExternalLink(url) => Some(url.as_str()),
            _ => None,
        })
    }

    /// Whether the annotations report an already-existing grant.
    #[must_use]
    pub fn grant_already_exists(&self) -> bool {
        self.0.contains(&Annotation::GrantAlreadyExists)
    }

    /// Whether the annotations report an already-revoked grant.
    #[must_use]
    pub fn grant_already_revoked(&self) -> bool {
        self.0.contains(&Annotation::GrantAlreadyRevoked)
    }

    /// Iterate over the annotations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    /// Number of annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no annotations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Annotation> for Annotations {
    fn from(annotation: Annotation) -> Self {
        Self(vec![annotation])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_replaces_same_kind() {
        let mut annos = Annotations::new();
        annos.update(Annotation::V1Identifier("a".into()));
        annos.update(Annotation::ExternalLink("https://example.com".into()));
        annos.update(Annotation::V1Identifier("b".into()));

        assert_eq!(annos.len(), 2);
        assert_eq!(annos.v1_identifier(), Some("b"));
        assert_eq!(annos.external_link(), Some("https://example.com"));
    }

    #[test]
    fn test_grant_signals_are_distinct() {
        let granted = Annotations::from(Annotation::GrantAlreadyExists);
        assert!(granted.grant_already_exists());
        assert!(!granted.grant_already_revoked());

        let revoked = Annotations::new().with(Annotation::GrantAlreadyRevoked);
        assert!(revoked.grant_already_revoked());
        assert!(!revoked.grant_already_exists());

        assert!(Annotations::new().is_empty());
    }
}

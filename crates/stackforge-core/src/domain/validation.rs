use std::collections::HashMap;

use crate::domain::{
    common::table_name,
    entities::{EntityDescriptor, Manifest},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Checks that span more than one value live here, not on the entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Entity names must be unique within a run, compared by table name.
    /// `BlogPost` and `blog_post` name the same entity, and so do `Post`
    /// and `Posts`.
    pub fn validate_entities(entities: &[EntityDescriptor]) -> Result<(), DomainError> {
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(entities.len());
        for entity in entities {
            if seen
                .insert(table_name(entity.name()), entity.name())
                .is_some()
            {
                return Err(DomainError::DuplicateEntity {
                    name: entity.name().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn validate_manifest(manifest: &Manifest) -> Result<(), DomainError> {
        manifest.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_entities_are_rejected() {
        let entities = [
            EntityDescriptor::new("BlogPost").unwrap(),
            EntityDescriptor::new("Tag").unwrap(),
            EntityDescriptor::new("blog_post").unwrap(),
        ];
        assert_eq!(
            DomainValidator::validate_entities(&entities),
            Err(DomainError::DuplicateEntity {
                name: "blog_post".into()
            })
        );
    }

    #[test]
    fn entities_sharing_a_table_are_rejected() {
        let entities = [
            EntityDescriptor::new("Post").unwrap(),
            EntityDescriptor::new("Posts").unwrap(),
        ];
        assert_eq!(
            DomainValidator::validate_entities(&entities),
            Err(DomainError::DuplicateEntity {
                name: "Posts".into()
            })
        );
    }

    #[test]
    fn distinct_entities_pass() {
        let entities = [
            EntityDescriptor::new("User").unwrap(),
            EntityDescriptor::new("Post").unwrap(),
        ];
        assert!(DomainValidator::validate_entities(&entities).is_ok());
    }
}

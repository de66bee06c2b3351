//! Error taxonomy shared by the adapter, attribute types and record models.

use thiserror::Error;

/// Boxed error raised by a third-party model descriptor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The input resolved to neither null nor an instance under the `raise` policy.
    #[error("failed to cast {input} to {type_tag}")]
    BadCast { input: String, type_tag: String },
    #[error("attribute `{name}` is not registered on {type_tag}")]
    AttributeNotFound { name: String, type_tag: String },
    #[error("key path must name at least one attribute")]
    EmptyKeyPath,
    #[error("{type_tag} attribute cannot resolve nested key path segment `{segment}`")]
    NotNested { segment: String, type_tag: String },
    #[error("unknown attribute `{key}` for {type_tag}")]
    UnknownAttribute { key: String, type_tag: String },
    #[error("cannot cast {input} to {expected} for attribute `{attribute}`")]
    InvalidAttribute {
        attribute: String,
        expected: &'static str,
        input: String,
    },
    #[error("store key `{store_key}` is used by more than one attribute of {type_tag}")]
    DuplicateStoreKey { store_key: String, type_tag: String },
    #[error("invalid record schema: {0}")]
    InvalidSchema(#[from] serde_json::Error),
    #[error(transparent)]
    Collaborator(BoxError),
}

impl AdapterError {
    /// Wraps an error raised by an external descriptor without altering its message.
    pub fn collaborator(err: impl Into<BoxError>) -> Self {
        Self::Collaborator(err.into())
    }

    /// Scalar attribute casts don't know the attribute name they serve;
    /// [`AttributeDefinition::cast`](crate::AttributeDefinition::cast) fills it in.
    pub(crate) fn with_attribute(self, name: &str) -> Self {
        match self {
            Self::InvalidAttribute {
                attribute,
                expected,
                input,
            } if attribute.is_empty() => Self::InvalidAttribute {
                attribute: name.to_string(),
                expected,
                input,
            },
            other => other,
        }
    }
}

pub type Result<T, E = AdapterError> = std::result::Result<T, E>;

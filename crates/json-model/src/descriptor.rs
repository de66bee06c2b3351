//! The model capability a [`ValueAdapter`](crate::ValueAdapter) is built on.

use crate::attribute::AttributeRegistry;
use crate::error::Result;
use crate::input::Mapping;
use crate::policy::BadCastPolicy;

/// Describes one model type: its attributes, how instances are built from
/// a serializable mapping, and how they turn back into one.
///
/// Errors returned by [`new_from_serializable`](Self::new_from_serializable)
/// and [`serializable_hash`](Self::serializable_hash) reach adapter callers
/// as-is. Descriptors with their own error types can wrap them with
/// [`AdapterError::collaborator`](crate::AdapterError::collaborator).
pub trait ModelDescriptor: Send + Sync {
    type Instance;

    /// Name of the model type, used in errors.
    fn type_tag(&self) -> &str;

    fn bad_cast_policy(&self) -> BadCastPolicy {
        BadCastPolicy::Raise
    }

    /// Nominal check for instances of dynamically typed models, where one
    /// Rust type backs several model types. Statically typed models keep
    /// the default.
    fn is_instance(&self, _instance: &Self::Instance) -> bool {
        true
    }

    /// Representation of an instance rejected by [`is_instance`](Self::is_instance).
    fn inspect(&self, _instance: &Self::Instance) -> String {
        format!("<{} instance>", self.type_tag())
    }

    fn attributes(&self) -> &AttributeRegistry;

    fn new_from_serializable(&self, mapping: Mapping) -> Result<Self::Instance>;

    fn serializable_hash(&self, instance: &Self::Instance) -> Result<Mapping>;
}

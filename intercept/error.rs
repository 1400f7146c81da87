/// A rejected [`wrap`](crate::wrap) configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
   #[error("cannot specify both a mapping and a replacement exception kind")]
   MappingWithReplacement,

   #[error("no replacement exception kind given for {original}")]
   MissingReplacement { original: String },

   #[error("not an exception kind: {name}")]
   NotAnException { name: &'static str },

   #[error("not an exception kind (or tuple): {name}")]
   NotAnOriginal { name: String },

   #[error("specify at most one of 'message', 'prefix', or 'format'")]
   ConflictingMessage,

   #[error("invalid format template {template:?}: {reason}")]
   Template {
      template: String,
      reason:   &'static str,
   },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

use std::{
   fmt,
   result,
   sync::Arc,
};

use derive_more::From;
use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::{
   Exception,
   Kind,
   error::{
      ConfigError,
      Result,
   },
   template::{
      self,
      Template,
   },
};

/// The kinds a single mapping entry applies to.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Original {
   Kind(&'static Kind),
   Kinds(Vec<&'static Kind>),
}

impl<const N: usize> From<[&'static Kind; N]> for Original {
   fn from(kinds: [&'static Kind; N]) -> Self {
      Self::Kinds(kinds.into())
   }
}

impl fmt::Display for Original {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Original::Kind(kind) => write!(writer, "{kind}"),
         Original::Kinds(kinds) => write!(writer, "({})", kinds.iter().join(", ")),
      }
   }
}

/// What a [`Wrapper`] intercepts: either a single [`Original`] that is paired
/// with a separately given replacement, or a whole mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
   Original(Original),
   Mapping(Vec<(Original, &'static Kind)>),
}

impl From<Original> for Target {
   fn from(original: Original) -> Self {
      Self::Original(original)
   }
}

impl From<&'static Kind> for Target {
   fn from(kind: &'static Kind) -> Self {
      Self::Original(Original::Kind(kind))
   }
}

impl From<Vec<&'static Kind>> for Target {
   fn from(kinds: Vec<&'static Kind>) -> Self {
      Self::Original(Original::Kinds(kinds))
   }
}

impl<const N: usize> From<[&'static Kind; N]> for Target {
   fn from(kinds: [&'static Kind; N]) -> Self {
      Self::Original(kinds.into())
   }
}

impl<O: Into<Original>> From<Vec<(O, &'static Kind)>> for Target {
   fn from(mapping: Vec<(O, &'static Kind)>) -> Self {
      Self::Mapping(
         mapping
            .into_iter()
            .map(|(original, replacement)| (original.into(), replacement))
            .collect(),
      )
   }
}

impl<O: Into<Original>, const N: usize> From<[(O, &'static Kind); N]> for Target {
   fn from(mapping: [(O, &'static Kind); N]) -> Self {
      Vec::from(mapping).into()
   }
}

/// A fixed replacement message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
   /// Construct the replacement without any message.
   Omit,
   /// Use this text, braces included, as the message.
   Text(String),
}

impl From<&str> for Message {
   fn from(text: &str) -> Self {
      Self::Text(text.to_owned())
   }
}

impl From<String> for Message {
   fn from(text: String) -> Self {
      Self::Text(text)
   }
}

/// Creates a [`Wrapper`] that replaces exceptions of the target kinds.
///
/// With neither `message`, `prefix` nor `format` set, the replacement carries
/// the original message verbatim. At most one of them can be set, except that
/// [`Message::Omit`] combines with the other two.
///
/// # Example
///
/// ```rs
/// let wrapper = wrap(&KEY_ERROR, Some(&CONFIG_ERROR))
///    .prefix("missing setting")
///    .build()?;
///
/// wrapper.guard(|| settings.get("port"))?;
/// ```
#[bon::builder(finish_fn(name = "build"))]
pub fn wrap(
   #[builder(start_fn)] target: impl Into<Target>,
   #[builder(start_fn)] replacement: Option<&'static Kind>,
   #[builder(into)] message: Option<Message>,
   #[builder(into)] prefix: Option<String>,
   #[builder(into)] format: Option<String>,
   #[builder(default = true)] set_cause: bool,
   #[builder(default)] suppress_context: bool,
) -> Result<Wrapper> {
   let wrapper = flatten(target.into(), replacement).and_then(|mapping| {
      let template = shape_message(message, prefix, format)?;

      Ok(Wrapper {
         mapping: Arc::new(mapping),
         template: template.map(Arc::new),
         set_cause,
         suppress_context,
      })
   });

   wrapper.inspect_err(|error| tracing::debug!("rejected wrap configuration: {error}"))
}

fn flatten(
   target: Target,
   replacement: Option<&'static Kind>,
) -> Result<IndexMap<&'static Kind, &'static Kind>> {
   let entries = match (target, replacement) {
      (Target::Mapping(_), Some(_)) => return Err(ConfigError::MappingWithReplacement),
      (Target::Mapping(entries), None) => entries,

      (Target::Original(original), Some(replacement)) => vec![(original, replacement)],
      (Target::Original(original), None) => {
         return Err(ConfigError::MissingReplacement {
            original: original.to_string(),
         });
      },
   };

   let mut mapping = IndexMap::with_capacity(entries.len());

   for (original, replacement) in entries {
      if !replacement.is_exception() {
         return Err(ConfigError::NotAnException {
            name: replacement.name(),
         });
      }

      match original {
         Original::Kind(kind) if kind.is_exception() => {
            mapping.insert(kind, replacement);
         },

         Original::Kinds(kinds) if kinds.iter().all(|kind| kind.is_exception()) => {
            for kind in kinds {
               mapping.insert(kind, replacement);
            }
         },

         original => {
            return Err(ConfigError::NotAnOriginal {
               name: original.to_string(),
            });
         },
      }
   }

   Ok(mapping)
}

fn shape_message(
   message: Option<Message>,
   prefix: Option<String>,
   format: Option<String>,
) -> Result<Option<Template>> {
   let given = [
      matches!(message, Some(Message::Text(_))),
      prefix.is_some(),
      format.is_some(),
   ]
   .into_iter()
   .filter(|given| *given)
   .count();

   if given > 1 {
      return Err(ConfigError::ConflictingMessage);
   }

   let template = match (format, prefix, message) {
      (Some(format), ..) => format,
      (None, Some(prefix), _) => format!("{}: {{}}", template::escape(&prefix)),
      (None, None, Some(Message::Text(text))) => template::escape(&text),
      (None, None, Some(Message::Omit)) => return Ok(None),
      (None, None, None) => "{}".to_owned(),
   };

   Template::parse(&template).map(Some)
}

/// Replaces exceptions with new exceptions of a mapped kind.
///
/// The replacement is picked by walking the ancestors of the exception's kind,
/// most specific first, and taking the first one present in the mapping.
#[derive(Clone)]
pub struct Wrapper {
   mapping:          Arc<IndexMap<&'static Kind, &'static Kind>>,
   template:         Option<Arc<Template>>,
   set_cause:        bool,
   suppress_context: bool,
}

impl Wrapper {
   pub fn enter(&self) {}

   /// Translates the exception the region just exited with, if any.
   ///
   /// `Ok(())` means the region exited cleanly. Otherwise the returned error
   /// is either the replacement or, when nothing is mapped, the original.
   pub fn exit(&self, exception: Option<Exception>) -> result::Result<(), Exception> {
      match exception {
         None => Ok(()),
         Some(exception) => Err(self.translate(exception)),
      }
   }

   /// The replacement kind for exceptions of `kind`.
   #[must_use]
   pub fn replacement_for(&self, kind: &'static Kind) -> Option<&'static Kind> {
      kind
         .ancestors()
         .iter()
         .find_map(|ancestor| self.mapping.get(ancestor).copied())
   }

   /// Returns the replacement for `exception`, or `exception` itself if its
   /// kind is not mapped.
   #[must_use]
   pub fn translate(&self, exception: Exception) -> Exception {
      let Some(replacement) = self.replacement_for(exception.kind()) else {
         return exception;
      };

      tracing::trace!(
         from = %exception.kind(),
         to = %replacement,
         "translated exception: {exception}"
      );

      let translated = match self.template {
         None => Exception::new(replacement),
         Some(ref template) => {
            Exception::with_message(replacement, template.render(&exception.to_string()))
         },
      };

      let original = Arc::new(exception);

      let translated = if self.set_cause {
         translated.with_cause(Arc::clone(&original))
      } else {
         translated
      };

      translated
         .with_suppressed_context(self.suppress_context)
         .with_context(original)
   }

   /// Runs `region` inside the guard, translating its exception.
   pub fn guard<T>(
      &self,
      region: impl FnOnce() -> result::Result<T, Exception>,
   ) -> result::Result<T, Exception> {
      self.enter();
      region().map_err(|exception| self.translate(exception))
   }

   /// Wraps `function` so that every invocation runs inside the guard.
   pub fn decorate<A, T, F>(
      &self,
      function: F,
   ) -> impl Fn(A) -> result::Result<T, Exception> + use<A, T, F>
   where
      F: Fn(A) -> result::Result<T, Exception>,
   {
      let wrapper = self.clone();
      move |arguments| wrapper.guard(|| function(arguments))
   }
}

impl fmt::Display for Wrapper {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      let smallest = self
         .mapping
         .iter()
         .min_by_key(|(original, _)| original.name());

      match smallest {
         None => write!(writer, "wrap({{}}, ...)"),
         Some((original, replacement)) if self.mapping.len() == 1 => {
            write!(writer, "wrap({original}, {replacement}, ...)")
         },
         Some((original, replacement)) => {
            write!(writer, "wrap({{{original}: {replacement}, ...}}, ...)")
         },
      }
   }
}

impl fmt::Debug for Wrapper {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      fmt::Display::fmt(self, writer)
   }
}

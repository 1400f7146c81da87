use std::{
   fmt,
   sync::Arc,
};

use itertools::Itertools as _;

use crate::{
   Exception,
   Kind,
};

/// Creates a [`Suppressor`] for the given kinds.
///
/// # Example
///
/// ```rs
/// let value = suppress([&KEY_ERROR]).guard(|| lookup("missing"))?;
/// assert_eq!(value, None);
/// ```
pub fn suppress(kinds: impl IntoIterator<Item = &'static Kind>) -> Suppressor {
   Suppressor {
      kinds: kinds.into_iter().collect(),
   }
}

/// Silently discards exceptions of the configured kinds.
#[derive(Clone)]
pub struct Suppressor {
   kinds: Arc<[&'static Kind]>,
}

impl Suppressor {
   #[must_use]
   pub fn kinds(&self) -> &[&'static Kind] {
      &self.kinds
   }

   pub fn enter(&self) {}

   /// Whether the region that just exited with `exception` is handled.
   ///
   /// A region that exited without an exception is always handled.
   #[must_use]
   pub fn exit(&self, exception: Option<&Exception>) -> bool {
      let Some(exception) = exception else {
         return true;
      };

      let suppressed = exception.kind().is_any(&self.kinds);
      if suppressed {
         tracing::trace!(kind = %exception.kind(), "suppressed exception: {exception}");
      }

      suppressed
   }

   /// Runs `region` inside the guard, returning `None` if it failed with a
   /// suppressed exception.
   pub fn guard<T>(
      &self,
      region: impl FnOnce() -> Result<T, Exception>,
   ) -> Result<Option<T>, Exception> {
      self.enter();

      match region() {
         Ok(value) => Ok(Some(value)),
         Err(exception) if self.exit(Some(&exception)) => Ok(None),
         Err(exception) => Err(exception),
      }
   }

   /// Wraps `function` so that every invocation runs inside the guard.
   pub fn decorate<A, T, F>(
      &self,
      function: F,
   ) -> impl Fn(A) -> Result<Option<T>, Exception> + use<A, T, F>
   where
      F: Fn(A) -> Result<T, Exception>,
   {
      let suppressor = self.clone();
      move |arguments| suppressor.guard(|| function(arguments))
   }
}

impl fmt::Display for Suppressor {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(writer, "suppress({})", self.kinds.iter().join(", "))
   }
}

impl fmt::Debug for Suppressor {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      fmt::Display::fmt(self, writer)
   }
}

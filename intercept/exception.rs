use std::{
   error,
   fmt,
   iter,
   sync::Arc,
};

use crate::Kind;

/// An error value of some [`Kind`].
///
/// A replacement produced by a [`Wrapper`](crate::Wrapper) remembers the
/// error it replaced twice: always as its implicit context, and as its cause
/// unless told otherwise. [`source`](error::Error::source) and
/// [`chain`](Exception::chain) prefer the cause, then fall back to the
/// context unless it is suppressed.
///
/// Links are shared, so cloning an exception or storing the same predecessor
/// as both cause and context does not copy its history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exception {
   kind:             &'static Kind,
   message:          Option<String>,
   cause:            Option<Arc<Exception>>,
   context:          Option<Arc<Exception>>,
   suppress_context: bool,
}

impl Exception {
   /// Creates an exception without a message.
   #[must_use]
   pub fn new(kind: &'static Kind) -> Self {
      Self {
         kind,
         message: None,
         cause: None,
         context: None,
         suppress_context: false,
      }
   }

   #[must_use]
   pub fn with_message(kind: &'static Kind, message: impl Into<String>) -> Self {
      Self {
         message: Some(message.into()),
         ..Self::new(kind)
      }
   }

   /// Sets the explicit cause.
   ///
   /// This does not touch the suppress-context flag. A cause already takes
   /// precedence over the context in [`predecessor`](Exception::predecessor),
   /// so check [`cause`](Exception::cause) rather than
   /// [`is_context_suppressed`](Exception::is_context_suppressed) to learn
   /// whether the context is shown.
   #[must_use]
   pub fn with_cause(self, cause: impl Into<Arc<Exception>>) -> Self {
      Self {
         cause: Some(cause.into()),
         ..self
      }
   }

   #[must_use]
   pub fn with_context(self, context: impl Into<Arc<Exception>>) -> Self {
      Self {
         context: Some(context.into()),
         ..self
      }
   }

   #[must_use]
   pub fn with_suppressed_context(self, suppress_context: bool) -> Self {
      Self {
         suppress_context,
         ..self
      }
   }

   #[must_use]
   pub fn kind(&self) -> &'static Kind {
      self.kind
   }

   #[must_use]
   pub fn message(&self) -> Option<&str> {
      self.message.as_deref()
   }

   #[must_use]
   pub fn cause(&self) -> Option<&Exception> {
      self.cause.as_deref()
   }

   /// The exception that was being handled when this one was created, even
   /// if it is suppressed for display.
   #[must_use]
   pub fn context(&self) -> Option<&Exception> {
      self.context.as_deref()
   }

   /// The flag as it was set, independent of whether a cause exists.
   #[must_use]
   pub fn is_context_suppressed(&self) -> bool {
      self.suppress_context
   }

   /// Whether this exception's kind is `kind` or one of its descendants.
   #[must_use]
   pub fn is(&self, kind: &Kind) -> bool {
      self.kind.is(kind)
   }

   /// The exception this one was derived from, as shown in a report.
   #[must_use]
   pub fn predecessor(&self) -> Option<&Exception> {
      self.cause().or_else(|| {
         if self.suppress_context {
            None
         } else {
            self.context()
         }
      })
   }

   /// Iterates over this exception and its predecessors, newest first.
   pub fn chain(&self) -> impl Iterator<Item = &Exception> {
      iter::successors(Some(self), |exception| exception.predecessor())
   }
}

impl fmt::Display for Exception {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      writer.write_str(self.message.as_deref().unwrap_or_default())
   }
}

impl error::Error for Exception {
   fn source(&self) -> Option<&(dyn error::Error + 'static)> {
      self
         .predecessor()
         .map(|predecessor| predecessor as &(dyn error::Error + 'static))
   }
}

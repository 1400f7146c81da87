use std::fmt;

use crate::{
   Exception,
   Kind,
   standard,
};

/// Creates a [`Raiser`]. The kind defaults to
/// [`EXCEPTION`](standard::EXCEPTION).
///
/// # Example
///
/// ```rs
/// let missing = raiser().kind(&KEY_ERROR).message("no such key").build();
/// let value: Result<u32, _> = missing.call(("ignored", 42));
/// ```
#[bon::builder(finish_fn(name = "build"))]
pub fn raiser(
   #[builder(default = &standard::EXCEPTION)] kind: &'static Kind,
   #[builder(into)] message: Option<String>,
) -> Raiser {
   Raiser { kind, message }
}

/// A callable that fails every time it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raiser {
   kind:    &'static Kind,
   message: Option<String>,
}

impl Raiser {
   #[must_use]
   pub fn kind(&self) -> &'static Kind {
      self.kind
   }

   /// Returns a fresh exception as an error.
   pub fn raise<T>(&self) -> Result<T, Exception> {
      Err(match self.message {
         Some(ref message) => Exception::with_message(self.kind, message.clone()),
         None => Exception::new(self.kind),
      })
   }

   /// Like [`raise`](Raiser::raise), ignoring `arguments`.
   pub fn call<A, T>(&self, _arguments: A) -> Result<T, Exception> {
      self.raise()
   }

   pub fn into_fn<A, T>(self) -> impl Fn(A) -> Result<T, Exception> {
      move |arguments| self.call(arguments)
   }
}

impl fmt::Display for Raiser {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      if self.message.is_some() {
         write!(writer, "raiser({}, ...)", self.kind)
      } else {
         write!(writer, "raiser({})", self.kind)
      }
   }
}

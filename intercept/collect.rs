use std::{
   fmt,
   slice,
   vec,
};

use derive_more::{
   IsVariant,
   TryUnwrap,
};
use itertools::Itertools as _;

use crate::{
   Exception,
   Kind,
};

/// Creates a [`Collector`] for the given kinds.
pub fn collect<T>(kinds: impl IntoIterator<Item = &'static Kind>) -> Collector<T> {
   Collector {
      kinds:    kinds.into_iter().collect(),
      outcomes: Vec::new(),
   }
}

/// The recorded result of one guarded invocation.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant, TryUnwrap)]
#[try_unwrap(ref)]
pub enum Outcome<T> {
   Value(T),
   Exception(Exception),
}

impl<T> Outcome<T> {
   #[must_use]
   pub fn value(&self) -> Option<&T> {
      self.try_unwrap_value_ref().ok()
   }

   #[must_use]
   pub fn exception(&self) -> Option<&Exception> {
      self.try_unwrap_exception_ref().ok()
   }

   /// Returns the outcome as a pair where exactly one side is populated.
   #[must_use]
   pub fn as_pair(&self) -> (Option<&T>, Option<&Exception>) {
      (self.value(), self.exception())
   }

   pub fn into_result(self) -> Result<T, Exception> {
      match self {
         Outcome::Value(value) => Ok(value),
         Outcome::Exception(exception) => Err(exception),
      }
   }
}

/// Records the outcome of every guarded invocation, intercepting exceptions
/// of the configured kinds.
///
/// Exceptions of other kinds propagate and leave the log untouched.
pub struct Collector<T = ()> {
   kinds:    Box<[&'static Kind]>,
   outcomes: Vec<Outcome<T>>,
}

impl<T> Collector<T> {
   pub fn enter(&mut self) -> &mut Self {
      self
   }

   /// Records the result of the region that just exited.
   ///
   /// Values are recorded and returned by reference to their log entry.
   /// Matching exceptions are recorded and swallowed, every other exception is
   /// returned as is.
   pub fn exit(&mut self, result: Result<T, Exception>) -> Result<Option<&T>, Exception> {
      match result {
         Ok(value) => {
            self.outcomes.push(Outcome::Value(value));
            Ok(self.outcomes.last().and_then(Outcome::value))
         },

         Err(exception) if exception.kind().is_any(&self.kinds) => {
            tracing::trace!(
               kind = %exception.kind(),
               index = self.outcomes.len(),
               "collected exception: {exception}"
            );

            self.outcomes.push(Outcome::Exception(exception));
            Ok(None)
         },

         Err(exception) => Err(exception),
      }
   }

   /// Runs `region` inside the guard.
   pub fn guard(
      &mut self,
      region: impl FnOnce() -> Result<T, Exception>,
   ) -> Result<Option<&T>, Exception> {
      self.enter().exit(region())
   }

   /// Invokes `function` with `arguments` once inside the guard.
   pub fn run<A>(
      &mut self,
      function: impl FnOnce(A) -> Result<T, Exception>,
      arguments: A,
   ) -> Result<Option<&T>, Exception> {
      self.guard(|| function(arguments))
   }

   #[must_use]
   pub fn kinds(&self) -> &[&'static Kind] {
      &self.kinds
   }

   /// Iterates over the recorded outcomes in invocation order.
   pub fn iter(&self) -> slice::Iter<'_, Outcome<T>> {
      self.outcomes.iter()
   }

   pub fn values(&self) -> impl Iterator<Item = &T> {
      self.outcomes.iter().filter_map(Outcome::value)
   }

   pub fn exceptions(&self) -> impl Iterator<Item = &Exception> {
      self.outcomes.iter().filter_map(Outcome::exception)
   }

   #[must_use]
   pub fn len(&self) -> usize {
      self.outcomes.len()
   }

   #[must_use]
   pub fn is_empty(&self) -> bool {
      self.outcomes.is_empty()
   }
}

impl<'a, T> IntoIterator for &'a Collector<T> {
   type IntoIter = slice::Iter<'a, Outcome<T>>;
   type Item = &'a Outcome<T>;

   fn into_iter(self) -> Self::IntoIter {
      self.iter()
   }
}

impl<T> IntoIterator for Collector<T> {
   type IntoIter = vec::IntoIter<Outcome<T>>;
   type Item = Outcome<T>;

   fn into_iter(self) -> Self::IntoIter {
      self.outcomes.into_iter()
   }
}

impl<T> fmt::Display for Collector<T> {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(writer, "collect({})", self.kinds.iter().join(", "))
   }
}

impl<T> fmt::Debug for Collector<T> {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      fmt::Display::fmt(self, writer)
   }
}

#[cfg(test)]
mod tests {
   use proptest::prelude::*;

   use super::*;
   use crate::standard::*;

   fn parse(input: &str) -> Result<u32, Exception> {
      match input {
         "" => Err(Exception::with_message(&KEY_ERROR, "empty input")),
         "?" => Err(Exception::with_message(&TYPE_ERROR, "not a number")),
         _ => {
            input
               .parse()
               .map_err(|error| Exception::with_message(&VALUE_ERROR, format!("{error}")))
         },
      }
   }

   #[test]
   fn records_every_outcome_in_order() {
      let mut collector = collect([&VALUE_ERROR, &KEY_ERROR]);

      assert_eq!(collector.run(parse, "0"), Ok(Some(&0)));
      assert_eq!(collector.run(parse, "x"), Ok(None));
      assert_eq!(collector.run(parse, "7"), Ok(Some(&7)));
      assert_eq!(collector.run(parse, ""), Ok(None));

      let pairs = collector
         .iter()
         .map(|outcome| {
            let (value, exception) = outcome.as_pair();
            (value.copied(), exception.map(Exception::kind))
         })
         .collect::<Vec<_>>();

      assert_eq!(pairs, [
         (Some(0), None),
         (None, Some(&VALUE_ERROR)),
         (Some(7), None),
         (None, Some(&KEY_ERROR)),
      ]);
   }

   #[test]
   fn zero_is_not_a_failure() {
      let mut collector = collect([&VALUE_ERROR]);
      collector.run(parse, "0").expect("parsing zero should succeed");

      let outcome = collector.iter().next().expect("an outcome should be recorded");
      assert!(outcome.is_value());
      assert_eq!(outcome.value(), Some(&0));
      assert_eq!(outcome.exception(), None);
   }

   #[test]
   fn unmatched_exceptions_propagate_unrecorded() {
      let mut collector = collect([&VALUE_ERROR]);

      let error = collector
         .run(parse, "?")
         .expect_err("type error should propagate");

      assert_eq!(error.kind(), &TYPE_ERROR);
      assert!(collector.is_empty());
   }

   #[test]
   fn guard_records_regions() {
      let mut collector = collect::<()>([&LOOKUP_ERROR]);

      for index in 0..3_usize {
         collector
            .guard(|| {
               if index % 2 == 0 {
                  Err(Exception::with_message(&INDEX_ERROR, index.to_string()))
               } else {
                  Ok(())
               }
            })
            .expect("lookup errors should be collected");
      }

      let messages = collector
         .exceptions()
         .filter_map(Exception::message)
         .collect::<Vec<_>>();
      assert_eq!(messages, ["0", "2"]);
      assert_eq!(collector.values().count(), 1);
   }

   #[test]
   fn enter_and_exit() {
      let mut collector = collect([&KEY_ERROR]);

      let guard = collector.enter();
      assert_eq!(guard.exit(parse("")), Ok(None));
      assert_eq!(guard.exit(parse("3")), Ok(Some(&3)));

      let outcomes = collector
         .into_iter()
         .map(Outcome::into_result)
         .collect::<Vec<_>>();
      assert_eq!(outcomes, [
         Err(Exception::with_message(&KEY_ERROR, "empty input")),
         Ok(3),
      ]);
   }

   #[test]
   fn values_need_not_be_clone() {
      #[derive(Debug, PartialEq, Eq)]
      struct Handle(u32);

      let mut collector = collect([&VALUE_ERROR]);

      let handle = collector
         .run(|input| parse(input).map(Handle), "5")
         .expect("parsing should succeed");
      assert_eq!(handle, Some(&Handle(5)));

      assert_eq!(collector.run(|input| parse(input).map(Handle), "x"), Ok(None));
      assert_eq!(collector.values().collect::<Vec<_>>(), [&Handle(5)]);
   }

   #[test]
   fn display_lists_kinds() {
      assert_eq!(
         collect::<()>([&KEY_ERROR, &INDEX_ERROR]).to_string(),
         "collect(KeyError, IndexError)"
      );
   }

   proptest! {
      #[test]
      fn log_follows_invocation_order(
         inputs in prop::collection::vec(
            prop_oneof![
               Just(String::new()),
               "[0-9]{1,3}",
               Just("x".to_owned()),
               Just("?".to_owned()),
            ],
            0..32,
         ),
      ) {
         let mut collector = collect([&VALUE_ERROR, &KEY_ERROR]);

         for input in &inputs {
            let result = collector.run(parse, input.as_str());

            if input == "?" {
               prop_assert_eq!(result.map_err(|error| error.kind()), Err(&TYPE_ERROR));
            } else {
               prop_assert!(result.is_ok());
            }
         }

         let recorded = inputs
            .iter()
            .filter(|input| *input != "?")
            .collect::<Vec<_>>();

         prop_assert_eq!(collector.len(), recorded.len());

         for (input, outcome) in recorded.into_iter().zip(&collector) {
            prop_assert_eq!(outcome.clone().into_result(), parse(input));
         }
      }
   }
}

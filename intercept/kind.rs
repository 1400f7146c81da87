use std::{
   fmt,
   hash,
   ptr,
   sync::OnceLock,
};

use crate::standard;

/// Declares a [`Kind`] as a `static` item.
///
/// Parents are listed most significant first and decide the ancestor order
/// used for matching.
///
/// # Example
///
/// ```rs
/// kind! {
///    /// Raised when a config key is missing.
///    pub static MISSING_KEY = "MissingKey": KEY_ERROR, CONFIG_ERROR;
/// }
/// ```
#[macro_export]
macro_rules! kind {
   ($(
      $(#[$attribute:meta])*
      $visibility:vis static $identifier:ident = $name:literal $(: $($parent:path),+ $(,)?)?;
   )*) => {$(
      $(#[$attribute])*
      $visibility static $identifier: $crate::Kind = {
         static PARENTS: &[&$crate::Kind] = &[$($(&$parent),+)?];
         $crate::Kind::new($name, PARENTS)
      };
   )*};
}

/// An error category. Kinds form a hierarchy through their parents, and an
/// [`Exception`](crate::Exception) matches a kind when its own kind is that
/// kind or one of its descendants.
///
/// Kinds are compared by address, so they must be declared as `static` items,
/// preferably through [`kind!`](crate::kind).
pub struct Kind {
   name:      &'static str,
   parents:   &'static [&'static Kind],
   ancestors: OnceLock<Box<[&'static Kind]>>,
}

impl Kind {
   #[must_use]
   pub const fn new(name: &'static str, parents: &'static [&'static Kind]) -> Self {
      Self {
         name,
         parents,
         ancestors: OnceLock::new(),
      }
   }

   #[must_use]
   pub fn name(&self) -> &'static str {
      self.name
   }

   #[must_use]
   pub fn parents(&self) -> &'static [&'static Kind] {
      self.parents
   }

   /// Returns this kind followed by all of its ancestors, most specific
   /// first.
   ///
   /// The order is the C3 linearization of the hierarchy. An inconsistent
   /// hierarchy still yields every ancestor exactly once.
   ///
   /// Statics may refer to each other, so a hierarchy can contain cycles. A
   /// parent that leads back to a kind already being linearized is skipped,
   /// which makes a kind listed as its own parent contribute nothing and
   /// lets each kind of a cycle see the others as its ancestors.
   pub fn ancestors(&'static self) -> &'static [&'static Kind] {
      self
         .ancestors
         .get_or_init(|| linearize(self, &mut Vec::new()))
   }

   /// Whether this kind is `other` or one of its descendants.
   pub fn is(&'static self, other: &Kind) -> bool {
      self.ancestors().iter().any(|ancestor| *ancestor == other)
   }

   /// Whether this kind is any of `kinds` or one of their descendants.
   pub fn is_any(&'static self, kinds: &[&'static Kind]) -> bool {
      kinds.iter().any(|kind| self.is(kind))
   }

   /// Whether this kind belongs to the exception family rooted at
   /// [`BASE_EXCEPTION`](standard::BASE_EXCEPTION).
   pub fn is_exception(&'static self) -> bool {
      self.is(&standard::BASE_EXCEPTION)
   }
}

/// Never enters another kind's cache, so concurrent or cyclic lookups cannot
/// wait on each other.
fn linearize(kind: &'static Kind, visiting: &mut Vec<&'static Kind>) -> Box<[&'static Kind]> {
   visiting.push(kind);

   let parents = kind
      .parents
      .iter()
      .copied()
      .filter(|parent| !visiting.contains(parent))
      .collect::<Vec<_>>();

   let mut sequences = Vec::with_capacity(parents.len() + 1);

   for parent in &parents {
      let ancestors = match parent.ancestors.get() {
         Some(ancestors) => ancestors.to_vec(),
         None => linearize(parent, visiting).into_vec(),
      };

      sequences.push(
         ancestors
            .into_iter()
            .filter(|ancestor| !visiting.contains(ancestor))
            .collect::<Vec<_>>(),
      );
   }

   sequences.push(parents);

   visiting.pop();

   let mut linearization = vec![kind];

   loop {
      sequences.retain(|sequence| !sequence.is_empty());

      let Some(first) = sequences.first().and_then(|sequence| sequence.first()) else {
         return linearization.into_boxed_slice();
      };

      let head = sequences
         .iter()
         .filter_map(|sequence| sequence.first().copied())
         .find(|candidate| {
            !sequences
               .iter()
               .any(|sequence| sequence[1..].contains(candidate))
         })
         .unwrap_or(*first);

      linearization.push(head);

      for sequence in &mut sequences {
         sequence.retain(|kind| *kind != head);
      }
   }
}

impl PartialEq for Kind {
   fn eq(&self, other: &Self) -> bool {
      ptr::eq(self, other)
   }
}

impl Eq for Kind {}

impl hash::Hash for Kind {
   fn hash<H: hash::Hasher>(&self, state: &mut H) {
      ptr::hash(self, state);
   }
}

impl fmt::Debug for Kind {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      writer.write_str(self.name)
   }
}

impl fmt::Display for Kind {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      writer.write_str(self.name)
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::standard::*;

   kind! {
      static ROOT = "Root";
      static LEFT = "Left": ROOT;
      static RIGHT = "Right": ROOT;
      static DIAMOND = "Diamond": LEFT, RIGHT;

      static FIRST = "First": ROOT;
      static SECOND = "Second": ROOT;
      static FORWARD = "Forward": FIRST, SECOND;
      static BACKWARD = "Backward": SECOND, FIRST;
      static TANGLED = "Tangled": FORWARD, BACKWARD;

      static PING = "Ping": PONG;
      static PONG = "Pong": PING, ROOT;
      static OUROBOROS = "Ouroboros": OUROBOROS, ROOT;
   }

   fn names(kinds: &[&Kind]) -> Vec<&'static str> {
      kinds.iter().map(|kind| kind.name()).collect()
   }

   #[test]
   fn ancestors_are_most_specific_first() {
      assert_eq!(names(KEY_ERROR.ancestors()), [
         "KeyError",
         "LookupError",
         "Exception",
         "BaseException",
      ]);

      assert_eq!(names(BASE_EXCEPTION.ancestors()), ["BaseException"]);
   }

   #[test]
   fn diamond_is_linearized() {
      assert_eq!(names(DIAMOND.ancestors()), [
         "Diamond", "Left", "Right", "Root",
      ]);
   }

   #[test]
   fn inconsistent_hierarchy_does_not_repeat() {
      let ancestors = names(TANGLED.ancestors());

      assert_eq!(ancestors.first(), Some(&"Tangled"));
      assert_eq!(ancestors.len(), 6);

      for name in ["Forward", "Backward", "First", "Second", "Root"] {
         assert_eq!(ancestors.iter().filter(|other| **other == name).count(), 1);
      }
   }

   #[test]
   fn cycles_terminate() {
      assert_eq!(names(PING.ancestors()), ["Ping", "Pong", "Root"]);
      assert_eq!(names(PONG.ancestors()), ["Pong", "Ping", "Root"]);

      assert!(PING.is(&PONG));
      assert!(PONG.is(&PING));
      assert!(!PING.is_exception());
   }

   #[test]
   fn own_parent_is_skipped() {
      assert_eq!(names(OUROBOROS.ancestors()), ["Ouroboros", "Root"]);
      assert!(OUROBOROS.is(&ROOT));
      assert!(!OUROBOROS.is_any(&[&LEFT, &RIGHT]));
   }

   #[test]
   fn subkinds() {
      assert!(INDEX_ERROR.is(&LOOKUP_ERROR));
      assert!(INDEX_ERROR.is(&INDEX_ERROR));
      assert!(!LOOKUP_ERROR.is(&INDEX_ERROR));
      assert!(!KEY_ERROR.is(&INDEX_ERROR));

      assert!(ZERO_DIVISION_ERROR.is_any(&[&VALUE_ERROR, &ARITHMETIC_ERROR]));
      assert!(!ZERO_DIVISION_ERROR.is_any(&[]));
   }

   #[test]
   fn exception_family() {
      assert!(KEY_ERROR.is_exception());
      assert!(BASE_EXCEPTION.is_exception());
      assert!(!ROOT.is_exception());
      assert!(!DIAMOND.is_exception());
   }

   #[test]
   fn identity() {
      assert_eq!(KEY_ERROR, KEY_ERROR);
      assert_ne!(KEY_ERROR, INDEX_ERROR);
      assert_eq!(KEY_ERROR.to_string(), "KeyError");
      assert_eq!(format!("{:?}", LOOKUP_ERROR), "LookupError");
   }
}

//! The standard kind hierarchy.
//!
//! Every kind declared here descends from [`BASE_EXCEPTION`]. Declare your own
//! kinds with [`kind!`](crate::kind) and give them one of these as a parent to
//! make them usable with [`wrap`](crate::wrap).

crate::kind! {
   /// The root of the exception family.
   pub static BASE_EXCEPTION = "BaseException";

   /// The parent of all ordinary errors.
   pub static EXCEPTION = "Exception": BASE_EXCEPTION;

   pub static LOOKUP_ERROR = "LookupError": EXCEPTION;
   /// A mapping key was not found.
   pub static KEY_ERROR = "KeyError": LOOKUP_ERROR;
   /// A sequence index was out of range.
   pub static INDEX_ERROR = "IndexError": LOOKUP_ERROR;

   /// An argument had the right type but an inappropriate value.
   pub static VALUE_ERROR = "ValueError": EXCEPTION;
   pub static UNICODE_ERROR = "UnicodeError": VALUE_ERROR;

   /// An operation was applied to a value of the wrong type.
   pub static TYPE_ERROR = "TypeError": EXCEPTION;

   pub static ARITHMETIC_ERROR = "ArithmeticError": EXCEPTION;
   pub static ZERO_DIVISION_ERROR = "ZeroDivisionError": ARITHMETIC_ERROR;
   pub static OVERFLOW_ERROR = "OverflowError": ARITHMETIC_ERROR;

   pub static RUNTIME_ERROR = "RuntimeError": EXCEPTION;
   pub static NOT_IMPLEMENTED_ERROR = "NotImplementedError": RUNTIME_ERROR;

   pub static ATTRIBUTE_ERROR = "AttributeError": EXCEPTION;

   /// An operating system or I/O operation failed.
   pub static OS_ERROR = "OsError": EXCEPTION;
}

//! Guards that suppress, collect and translate errors by [`Kind`].
//!
//! A guarded region is a closure returning `Result<T, Exception>`. Every guard
//! also exposes its `enter` and `exit` hooks so it can bracket code that is not
//! shaped like a closure.
//!
//! # Example
//!
//! ```rs
//! kind! {
//!    pub static CONFIG_ERROR = "ConfigError": EXCEPTION;
//! }
//!
//! let port = wrap(&LOOKUP_ERROR, Some(&CONFIG_ERROR))
//!    .prefix("missing setting")
//!    .build()?
//!    .guard(|| settings.get("port"))?;
//! ```

mod collect;
pub use collect::{
   Collector,
   Outcome,
   collect,
};

mod error;
pub use error::ConfigError;

mod exception;
pub use exception::Exception;

mod kind;
pub use kind::Kind;

mod raise;
pub use raise::{
   Raiser,
   raiser,
};

pub mod standard;

mod suppress;
pub use suppress::{
   Suppressor,
   suppress,
};

pub mod template;

mod wrap;
pub use wrap::{
   Message,
   Original,
   Target,
   Wrapper,
   wrap,
};

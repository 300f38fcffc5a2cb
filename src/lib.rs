#![forbid(unsafe_code)]

//! Composables for component trees
//!
//! - [`inject`] resolves a value published by an ancestor [`Context`], failing with a
//!   descriptive [`InjectError`] instead of handing back an empty value.
//! - [`use_state`] creates a reactive cell and returns a read handle paired with its
//!   [`Setter`]. [`use_state_writable`] returns a writable handle instead.
//!
//! ```
//! use composables::{inject, use_state, Context, ReadSignal};
//!
//! let mut app = Context::new();
//! let (count, set_count) = use_state(0);
//! app.provide("count", count);
//!
//! let widget = app.scoped();
//! let count = inject::<ReadSignal<i32>>(&widget, "count").unwrap();
//!
//! set_count.update(|n| n + 1);
//! assert_eq!(count.get(), 1);
//! ```

pub use composables_core::{
    Context, ProvideError, Provider, ReadSignal, Signal, Subscription, WithdrawError,
};

mod cached;
mod error;
mod inject;
mod key;
mod logging;
mod state;

pub use cached::{Cached, FromFn};
pub use error::InjectError;
pub use inject::{expect_inject, inject, inject_or_else};
pub use key::Key;
pub use state::{provide_state, use_state, use_state_empty, use_state_writable, Setter, Update};

use std::rc::Rc;

/// Type hint to the rust compiler to treat appropriately typed closures as providers.
///
/// This may become unnecessary once type inference improves a bit, but for now it's useful to have.
#[inline(always)]
pub fn provider_fn<T, F>(func: F) -> FromFn<F, T>
where
    T: 'static,
    F: Fn(&Context) -> Option<Rc<T>> + 'static,
{
    FromFn::new(func)
}

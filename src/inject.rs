use std::rc::Rc;

use composables_core::Context;

use crate::{logging::debug, InjectError};

/// Resolve the value published under `key` by `cx` or one of its ancestors
///
/// The returned [`Rc`] is the same allocation the provider published. Absent values are treated
/// like missing keys, so a successful injection is never empty.
///
/// ```
/// # use composables::{inject, Context, InjectError};
/// let mut root = Context::new();
/// root.provide("user", String::from("John"));
///
/// let child = root.scoped();
/// assert_eq!(*inject::<String>(&child, "user").unwrap(), "John");
///
/// let err = inject::<String>(&child, "missing").unwrap_err();
/// assert!(err.to_string().contains("missing"));
/// ```
pub fn inject<T: 'static>(cx: &Context, key: &str) -> Result<Rc<T>, InjectError> {
    let Some(value) = cx.lookup(key) else {
        debug!(key, "injection not found");
        return Err(InjectError::not_provided(key));
    };

    value
        .downcast::<T>()
        .map_err(|_| InjectError::type_mismatch::<T>(key))
}

/// Resolve the value published under `key`
///
/// # Panics
/// If the key cannot be injected. The panic message is the [`InjectError`] message.
#[track_caller]
pub fn expect_inject<T: 'static>(cx: &Context, key: &str) -> Rc<T> {
    match inject(cx, key) {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}

/// Resolve the value published under `key`, falling back to `default` if nothing is published
///
/// A value of the wrong type is still an error.
pub fn inject_or_else<T: 'static>(
    cx: &Context,
    key: &str,
    default: impl FnOnce() -> T,
) -> Result<Rc<T>, InjectError> {
    match inject(cx, key) {
        Err(InjectError::NotProvided { .. }) => Ok(Rc::new(default())),
        res => res,
    }
}

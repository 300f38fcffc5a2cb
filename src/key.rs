use std::{fmt, marker::PhantomData, rc::Rc};

use composables_core::{Context, ProvideError, Provider};

use crate::InjectError;

/// A string key bound to the type of the value published under it
///
/// Providing and injecting through the same `Key` cannot disagree on the value type.
///
/// ```
/// # use composables::{Context, Key};
/// struct Theme {
///     dark: bool,
/// }
///
/// const THEME: Key<Theme> = Key::new("theme");
///
/// let mut cx = Context::new();
/// THEME.provide(&mut cx, Theme { dark: true });
///
/// assert!(THEME.inject(&cx.scoped()).unwrap().dark);
/// ```
pub struct Key<T> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Key<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Publish `value` under this key
    ///
    /// # Panics
    /// If the key is already published in this scope
    #[track_caller]
    pub fn provide(&self, cx: &mut Context, value: T) {
        cx.provide(self.name, value)
    }

    /// Publish the value built by `provider` under this key
    #[track_caller]
    pub fn provide_with(&self, cx: &mut Context, provider: impl Provider<T>) {
        cx.provide_with(self.name, provider)
    }

    pub fn try_provide(&self, cx: &mut Context, value: T) -> Result<(), ProvideError> {
        cx.try_provide(self.name, value)
    }

    /// See [`inject`](crate::inject)
    pub fn inject(&self, cx: &Context) -> Result<Rc<T>, InjectError> {
        crate::inject(cx, self.name)
    }

    /// See [`expect_inject`](crate::expect_inject)
    #[track_caller]
    pub fn expect_inject(&self, cx: &Context) -> Rc<T> {
        crate::expect_inject(cx, self.name)
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

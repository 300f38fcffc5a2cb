use std::{marker::PhantomData, rc::Rc};

use once_cell::unsync::OnceCell;

use composables_core::{Context, Provider};

use crate::provider_fn;

/// Cached provider
///
/// A provider that calls the underlying provider on the first lookup and hands out the result of
/// that on every later lookup, including an absent result.
///
/// The underlying provider must not look up its own key; doing so panics.
pub struct Cached<T, P> {
    provider: P,
    cache: OnceCell<Option<Rc<T>>>,
}

impl<T, P> Cached<T, P>
where
    T: 'static,
    P: Provider<T>,
{
    /// Create a new cached provider
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: OnceCell::new(),
        }
    }

    /// Whether the underlying provider already ran
    pub fn is_initialized(&self) -> bool {
        self.cache.get().is_some()
    }
}

impl<T, F> Cached<T, FromFn<F, T>>
where
    T: 'static,
    F: Fn(&Context) -> Option<Rc<T>> + 'static,
{
    /// Equivalent to calling [`Cached::new`] with a provider wrapped in a
    /// [`provider_fn`](crate::provider_fn) type hint
    #[inline(always)]
    pub fn new_fn(provider: F) -> Self {
        Self::new(provider_fn(provider))
    }
}

impl<T, P> Provider<T> for Cached<T, P>
where
    T: 'static,
    P: Provider<T>,
{
    fn provide(&self, cx: &Context) -> Option<Rc<T>> {
        self.cache.get_or_init(|| self.provider.provide(cx)).clone()
    }
}

impl<T, P> Default for Cached<T, P>
where
    T: 'static,
    P: Provider<T> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(P::default())
    }
}

/// Provider built from a closure by [`provider_fn`](crate::provider_fn)
pub struct FromFn<F, T> {
    func: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<F, T> FromFn<F, T> {
    pub(crate) fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, T> Provider<T> for FromFn<F, T>
where
    T: 'static,
    F: Fn(&Context) -> Option<Rc<T>> + 'static,
{
    #[inline(always)]
    fn provide(&self, cx: &Context) -> Option<Rc<T>> {
        (self.func)(cx)
    }
}

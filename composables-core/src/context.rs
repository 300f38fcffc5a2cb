use std::{
    any::{type_name, Any},
    borrow::Cow,
    collections::HashMap,
    fmt,
    marker::PhantomData,
    rc::Rc,
};

use crate::{
    logging::{debug, trace},
    ProvideError, Provider, WithdrawError,
};

/// A scope in a component tree in which values are published under string keys
///
/// Descendant scopes are created with [`Context::scoped`] and see everything their ancestors
/// publish. A key published in a descendant shadows the same key further up the chain, and is
/// never visible to the ancestors themselves.
pub struct Context<'pcx> {
    /// The scope this one was created from, if any
    parent: Option<&'pcx Context<'pcx>>,

    /// Map keys to a type-erased provider
    providers: HashMap<Cow<'static, str>, DynProvider>,
}

impl<'pcx> Context<'pcx> {
    /// Create an empty root context
    pub fn new() -> Self {
        Self {
            parent: None,
            providers: HashMap::new(),
        }
    }

    /// Create a sub-context
    ///
    /// The returned context resolves keys from itself first and then from `self` and its
    /// ancestors. Anything published on the sub-context is dropped along with it.
    pub fn scoped(&self) -> Context<'_> {
        Context {
            parent: Some(self),
            providers: HashMap::new(),
        }
    }

    /// Number of ancestors of this scope. A root context has a depth of `0`.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Publish `value` under `key` in this scope
    ///
    /// # Panics
    /// If `key` is already published in this scope
    #[track_caller]
    pub fn provide<T: 'static>(&mut self, key: impl Into<Cow<'static, str>>, value: T) {
        if let Err(err) = self.try_provide(key, value) {
            panic!("{}", err)
        }
    }

    /// Publish the value built by `provider` under `key` in this scope
    ///
    /// # Panics
    /// If `key` is already published in this scope
    #[track_caller]
    pub fn provide_with<T: 'static>(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        provider: impl Provider<T>,
    ) {
        if let Err(err) = self.try_provide_with(key, provider) {
            panic!("{}", err)
        }
    }

    /// Publish an absent value of type `T` under `key`
    ///
    /// Lookups treat an absent value exactly like a key that was never published, but the key
    /// still shadows any ancestor publishing the same key.
    #[track_caller]
    pub fn provide_null<T: 'static>(&mut self, key: impl Into<Cow<'static, str>>) {
        self.provide_with::<T>(key, None::<Rc<T>>)
    }

    /// Delete the value published under `key` in this scope
    ///
    /// # Panics
    /// If `key` is not published in this scope
    #[track_caller]
    pub fn withdraw(&mut self, key: &str) {
        if let Err(err) = self.try_withdraw(key) {
            panic!("{}", err)
        }
    }

    /// Publish `value` under `key` in this scope
    pub fn try_provide<T: 'static>(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        value: T,
    ) -> Result<(), ProvideError> {
        self.try_provide_with::<T>(key, Rc::new(value))
    }

    /// Publish the value built by `provider` under `key` in this scope
    pub fn try_provide_with<T: 'static>(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        provider: impl Provider<T>,
    ) -> Result<(), ProvideError> {
        use std::collections::hash_map::Entry::*;
        let key = key.into();
        match self.providers.entry(key) {
            Vacant(e) => {
                trace!(key = %e.key(), ty = type_name::<T>(), "provide");
                e.insert(DynProvider::new(provider));
                Ok(())
            }
            Occupied(e) => Err(ProvideError::AlreadyProvided(e.key().to_string())),
        }
    }

    /// Delete the value published under `key` in this scope
    ///
    /// Ancestors are left untouched, so a shadowed value becomes visible again.
    pub fn try_withdraw(&mut self, key: &str) -> Result<(), WithdrawError> {
        match self.providers.remove(key) {
            Some(_) => {
                trace!(key, "withdraw");
                Ok(())
            }
            None => Err(WithdrawError::NotProvided(key.to_owned())),
        }
    }

    /// Look `key` up in this scope and its ancestors
    ///
    /// Returns `None` both when no scope publishes `key` and when the nearest scope publishing it
    /// published an absent value.
    pub fn lookup(&self, key: &str) -> Option<Rc<dyn Any>> {
        let Some((owner, provider)) = self.find(key) else {
            debug!(key, depth = self.depth(), "lookup miss: key not provided");
            return None;
        };

        let value = provider.provide(owner);
        if value.is_none() {
            debug!(key, ty = provider.type_name, "lookup miss: provided value is absent");
        }
        value
    }

    /// Whether looking `key` up from this scope yields a value
    ///
    /// This runs the provider, so it may build a fresh value or initialize a lazy one. Use
    /// [`Context::is_provided`] to check for a key without building anything.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Whether this scope or one of its ancestors publishes `key`, absent values included
    ///
    /// No provider runs.
    pub fn is_provided(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Find the nearest scope publishing `key`, together with its provider
    fn find(&self, key: &str) -> Option<(&Context<'pcx>, &DynProvider)> {
        self.ancestors()
            .find_map(|cx| cx.providers.get(key).map(|provider| (cx, provider)))
    }

    /// Iterate over this scope followed by its ancestors, nearest first
    fn ancestors(&self) -> impl Iterator<Item = &Context<'pcx>> {
        std::iter::successors(Some(self), |cx| cx.parent)
    }
}

impl Default for Context<'_> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .field(
                "providers",
                &self
                    .providers
                    .iter()
                    .map(|(key, provider)| (key, provider.type_name))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A provider with its value type erased
struct DynProvider {
    inner: Box<dyn ErasedProvider>,

    /// Name of the published type, for diagnostics
    type_name: &'static str,
}

impl DynProvider {
    fn new<T, P>(provider: P) -> Self
    where
        T: 'static,
        P: Provider<T>,
    {
        Self {
            inner: Box::new(Erased {
                provider,
                _phantom: PhantomData::<fn() -> T>,
            }),
            type_name: type_name::<T>(),
        }
    }

    /// Run the provider against the scope that owns it
    fn provide(&self, cx: &Context) -> Option<Rc<dyn Any>> {
        self.inner.provide_any(cx)
    }
}

trait ErasedProvider {
    fn provide_any(&self, cx: &Context) -> Option<Rc<dyn Any>>;
}

struct Erased<T, P> {
    provider: P,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, P> ErasedProvider for Erased<T, P>
where
    T: 'static,
    P: Provider<T>,
{
    fn provide_any(&self, cx: &Context) -> Option<Rc<dyn Any>> {
        self.provider.provide(cx).map(|value| value as Rc<dyn Any>)
    }
}

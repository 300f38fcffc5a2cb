use std::rc::Rc;

use crate::{Context, Provider};

/// An already built value. Every lookup yields the same allocation.
impl<T: 'static> Provider<T> for Rc<T> {
    #[inline(always)]
    fn provide(&self, _cx: &Context) -> Option<Rc<T>> {
        Some(Rc::clone(self))
    }
}

/// An optional provider. `None` publishes an absent value.
impl<T, P> Provider<T> for Option<P>
where
    T: 'static,
    P: Provider<T>,
{
    fn provide(&self, cx: &Context) -> Option<Rc<T>> {
        self.as_ref().and_then(|p| p.provide(cx))
    }
}

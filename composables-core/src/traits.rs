use std::rc::Rc;

use crate::Context;

/// Something that can publish a value of type `T` into a [`Context`].
///
/// The provider runs every time the value is looked up, against the scope it was published in.
/// Returning `None` publishes an absent value, which lookups treat exactly like a missing key.
///
/// ```
/// # use composables_core::{Context, Provider};
/// # use std::rc::Rc;
/// struct Greeting;
///
/// impl Provider<String> for Greeting {
///     fn provide(&self, cx: &Context) -> Option<Rc<String>> {
///         let name = cx.lookup("name")?.downcast::<String>().ok()?;
///         Some(Rc::new(format!("hello, {name}")))
///     }
/// }
///
/// let mut cx = Context::new();
/// cx.provide("name", String::from("world"));
/// cx.provide_with("greeting", Greeting);
///
/// let greeting = cx.lookup("greeting").unwrap().downcast::<String>().unwrap();
/// assert_eq!(*greeting, "hello, world");
/// ```
pub trait Provider<T: 'static>: 'static {
    /// Build the published value
    fn provide(&self, cx: &Context) -> Option<Rc<T>>;
}

//! Paired state: a handle to a reactive cell together with its setter
//!
//! [`use_state`] hands out a [`ReadSignal`], so only the [`Setter`] can write:
//!
//! ```
//! # use composables::{use_state, Update};
//! let (count, set_count) = use_state(1);
//!
//! set_count.set(5);
//! assert_eq!(count.get(), 5);
//!
//! set_count.set(Update::map(|prev: &i32| prev + 1));
//! assert_eq!(count.get(), 6);
//! ```
//!
//! [`use_state_writable`] hands out the [`Signal`] itself, which may also be written directly.

use std::{fmt, rc::Rc};

use composables_core::{ReadSignal, Signal};

/// The argument of a [`Setter`]
///
/// Whether the new value is given directly or computed from the previous one is decided by the
/// variant, never by the type of the value. A cell holding closures can therefore still be
/// assigned a closure with [`Update::Replace`].
pub enum Update<T> {
    /// Store this value
    Replace(T),

    /// Store the result of calling this function with the current value
    Map(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    pub fn map(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Self::Map(Box::new(f))
    }
}

impl<T> From<T> for Update<T> {
    #[inline(always)]
    fn from(value: T) -> Self {
        Self::Replace(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            Self::Map(_) => f.write_str("Map(..)"),
        }
    }
}

/// The write half of a paired state
///
/// Writes go to the underlying cell no matter which kind of handle was handed out alongside it.
/// A setter may be called from a subscriber of its own cell or from inside an updater; such
/// writes are queued and applied in order once the current one completes.
pub struct Setter<T> {
    cell: Signal<T>,
}

impl<T> Setter<T> {
    /// Apply `update` to the cell
    pub fn set(&self, update: impl Into<Update<T>>) {
        match update.into() {
            Update::Replace(value) => self.cell.set(value),
            Update::Map(f) => self.cell.update(f),
        }
    }

    /// Compute the new value from the current one
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.cell.update(f)
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("version", &self.cell.version())
            .finish()
    }
}

/// Create a cell holding `initial`, returning a read-only handle and its setter
pub fn use_state<T>(initial: T) -> (ReadSignal<T>, Setter<T>) {
    let (cell, setter) = use_state_writable(initial);
    (cell.into(), setter)
}

/// Create a cell holding `initial`, returning a writable handle and its setter
///
/// ```
/// # use composables::use_state_writable;
/// let (point, set_point) = use_state_writable((1, 1));
///
/// point.set((2, 2));
/// set_point.update(|&(x, y)| (x + 1, y));
/// assert_eq!(point.get(), (3, 2));
/// ```
pub fn use_state_writable<T>(initial: T) -> (Signal<T>, Setter<T>) {
    let cell = Signal::new(initial);
    let setter = Setter { cell: cell.clone() };
    (cell, setter)
}

/// Create a cell with no value, returning a read-only handle and its setter
pub fn use_state_empty<T>() -> (ReadSignal<Option<T>>, Setter<Option<T>>) {
    use_state(None)
}

/// Paired state whose current value is also published into a [`Context`](crate::Context)
///
/// Descendants can [`inject`](crate::inject) the `ReadSignal` under `key` and observe every
/// write made through the returned setter.
#[track_caller]
pub fn provide_state<T: 'static>(
    cx: &mut crate::Context,
    key: &'static str,
    initial: T,
) -> (ReadSignal<T>, Setter<T>) {
    let (read, setter) = use_state(initial);
    cx.provide_with(key, Rc::new(read.clone()));
    (read, setter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_debug_hides_closure() {
        assert_eq!(format!("{:?}", Update::Replace(3)), "Replace(3)");
        assert_eq!(format!("{:?}", Update::<i32>::map(|v| v + 1)), "Map(..)");
    }

    #[test]
    fn setter_clones_share_the_cell() {
        let (value, set_a) = use_state(0u8);
        let set_b = set_a.clone();

        set_a.set(1u8);
        set_b.update(|v| v + 1);
        assert_eq!(value.get(), 2);
        assert_eq!(value.version(), 2);
    }
}

//! Single-threaded reactive cells
//!
//! A [`Signal`] owns a value shared between every clone of the handle. Writes bump a version
//! counter and notify subscribers, in registration order, once the new value is in place.
//! [`ReadSignal`] is a projection of the same cell that only exposes reads:
//!
//! ```compile_fail
//! use composables_core::Signal;
//!
//! let read = Signal::new(0).read_only();
//! read.set(1);
//! ```
//!
//! A write made while the value is borrowed (from a subscriber, an updater closure or a
//! [`Signal::with`] callback) is queued. Queued writes are applied in order, each with its own
//! version bump and notification, as soon as the borrow is released.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    rc::{Rc, Weak},
};

use crate::logging::trace;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,

    /// Bumped exactly once per applied write
    version: Cell<u64>,

    /// Writes not yet stored in `value`, oldest first
    pending: RefCell<VecDeque<T>>,

    /// Set while some frame is draining `pending`
    flushing: Cell<bool>,

    subscribers: RefCell<Vec<(u64, Callback<T>)>>,
    next_subscriber: Cell<u64>,
}

impl<T> Inner<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let out = f(&self.value.borrow());
        self.flush();
        out
    }

    fn notify(&self) {
        // Snapshot so callbacks can subscribe or unsubscribe while we iterate
        let callbacks: Vec<_> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        let value = self.value.borrow();
        for callback in callbacks {
            callback(&value);
        }
    }

    fn write(&self, value: T) {
        self.pending.borrow_mut().push_back(value);
        self.flush();
    }

    /// Apply queued writes until the queue is empty or the value is borrowed elsewhere
    fn flush(&self) {
        if self.flushing.get() {
            return;
        }
        let _guard = FlushGuard::enter(&self.flushing);

        loop {
            let Ok(mut slot) = self.value.try_borrow_mut() else {
                break;
            };
            let Some(next) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            let old = std::mem::replace(&mut *slot, next);
            drop(slot);
            drop(old);

            self.version.set(self.version.get() + 1);
            trace!(version = self.version.get(), "signal write");
            self.notify();
        }
    }
}

/// Clears the `flushing` flag on exit, including when a subscriber panics
struct FlushGuard<'a>(&'a Cell<bool>);

impl<'a> FlushGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A shared, mutable reactive cell
///
/// Cloning a `Signal` creates another handle to the **same** cell.
pub struct Signal<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Signal<T> {
    /// Create a cell holding `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                version: Cell::new(0),
                pending: RefCell::new(VecDeque::new()),
                flushing: Cell::new(false),
                subscribers: RefCell::new(Vec::new()),
                next_subscriber: Cell::new(0),
            }),
        }
    }

    /// A read-only handle to this cell
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Clone the current value out of the cell
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.with(T::clone)
    }

    /// Borrow the current value
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    /// Number of writes since creation
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Overwrite the value
    pub fn set(&self, value: T) {
        self.inner.write(value);
    }

    /// Compute a new value from the current one
    ///
    /// `f` is called exactly once with the value stored at the time of the call, and its result
    /// is stored before any subscriber runs. Writes `f` itself makes are applied first.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.inner.value.borrow());
        self.set(next);
    }

    /// Whether both handles point to the same cell
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: 'static> Signal<T> {
    /// Run `callback` with the new value after every write
    ///
    /// The callback stays registered for as long as the returned [`Subscription`] is alive.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        subscribe(&self.inner, callback)
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

/// A read-only projection of a [`Signal`]
///
/// The cell stays writable through the `Signal` it was projected from.
pub struct ReadSignal<T> {
    inner: Rc<Inner<T>>,
}

impl<T> ReadSignal<T> {
    /// Clone the current value out of the cell
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.with(T::clone)
    }

    /// Borrow the current value
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    /// Number of writes since creation
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Whether both handles point to the same cell
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: 'static> ReadSignal<T> {
    /// Run `callback` with the new value after every write
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        subscribe(&self.inner, callback)
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> From<Signal<T>> for ReadSignal<T> {
    fn from(signal: Signal<T>) -> Self {
        Self {
            inner: signal.inner,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSignal")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

fn subscribe<T: 'static>(inner: &Rc<Inner<T>>, callback: impl Fn(&T) + 'static) -> Subscription {
    let id = inner.next_subscriber.get();
    inner.next_subscriber.set(id + 1);
    inner
        .subscribers
        .borrow_mut()
        .push((id, Rc::new(callback)));

    let weak: Weak<Inner<T>> = Rc::downgrade(inner);
    Subscription {
        unsubscribe: Some(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.borrow_mut().retain(|(sub, _)| *sub != id);
            }
        })),
    }
}

/// RAII guard for a subscriber registered with [`Signal::subscribe`]
///
/// Dropping the guard removes the subscriber. An outstanding subscription does not keep the
/// cell alive.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keep the subscriber registered for as long as the cell lives
    pub fn forget(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_see_writes() {
        let signal = Signal::new(1);
        let read = signal.read_only();

        signal.set(5);
        assert_eq!(read.get(), 5);
        assert_eq!(signal.get(), 5);
        assert_eq!(read.version(), 1);
    }

    #[test]
    fn update_sees_previous_value_once() {
        let signal = Signal::new(10);
        let calls = Cell::new(0);

        signal.update(|prev| {
            calls.set(calls.get() + 1);
            prev * 2
        });

        assert_eq!(calls.get(), 1);
        assert_eq!(signal.get(), 20);
        assert_eq!(signal.version(), 1);
    }

    #[test]
    fn write_inside_with_is_applied_after_borrow() {
        let signal = Signal::new(String::from("a"));

        let len = signal.with(|s| {
            signal.set(String::from("bc"));
            assert_eq!(signal.version(), 0);
            s.len()
        });

        assert_eq!(len, 1);
        assert_eq!(signal.with(|s| s.clone()), "bc");
        assert_eq!(signal.version(), 1);
    }

    #[test]
    fn subscriber_writes_are_queued_in_order() {
        let signal = Signal::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let sub = {
            let signal = signal.clone();
            let log = Rc::clone(&log);
            signal.clone().subscribe(move |v| {
                log.borrow_mut().push(*v);
                if *v == 1 {
                    signal.set(2);
                    signal.set(3);
                }
            })
        };

        signal.set(1);
        assert_eq!(*log.borrow(), [1, 2, 3]);
        assert_eq!(signal.get(), 3);
        assert_eq!(signal.version(), 3);
        drop(sub);
    }

    #[test]
    fn panicking_subscriber_does_not_wedge_the_cell() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let signal = Signal::new(0);
        let sub = signal.subscribe(|v| assert!(*v < 5, "too big"));

        assert!(catch_unwind(AssertUnwindSafe(|| signal.set(7))).is_err());
        drop(sub);

        signal.set(1);
        assert_eq!(signal.get(), 1);
    }

    #[test]
    fn subscribers_run_in_order_with_new_value() {
        let signal = Signal::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let log = Rc::clone(&log);
            signal.subscribe(move |v| log.borrow_mut().push(("first", *v)))
        };
        let second = {
            let log = Rc::clone(&log);
            signal.read_only().subscribe(move |v| log.borrow_mut().push(("second", *v)))
        };

        signal.set(3);
        assert_eq!(*log.borrow(), [("first", 3), ("second", 3)]);

        drop(first);
        signal.set(4);
        assert_eq!(*log.borrow(), [("first", 3), ("second", 3), ("second", 4)]);

        drop(second);
    }

    #[test]
    fn subscribers_may_read_during_notification() {
        let signal = Signal::new(1);
        let seen = Rc::new(Cell::new(0));

        let reader = signal.read_only();
        let sub = {
            let seen = Rc::clone(&seen);
            signal.subscribe(move |_| seen.set(reader.get()))
        };

        signal.set(9);
        assert_eq!(seen.get(), 9);
        drop(sub);
    }

    #[test]
    fn forgotten_subscription_stays_registered() {
        let signal = Signal::new(0);
        let count = Rc::new(Cell::new(0));

        {
            let count = Rc::clone(&count);
            signal.subscribe(move |_| count.set(count.get() + 1)).forget();
        }

        signal.set(1);
        signal.set(2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn subscription_outliving_cell_is_inert() {
        let signal = Signal::new(0);
        let sub = signal.subscribe(|_| {});
        drop(signal);
        drop(sub);
    }

    #[test]
    fn independent_cells() {
        let a = Signal::new(0);
        let b = Signal::new(0);

        a.set(1);
        assert_eq!(b.get(), 0);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }
}

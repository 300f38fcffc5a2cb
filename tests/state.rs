use std::{cell::RefCell, rc::Rc};

use composables::{
    inject, provide_state, use_state, use_state_empty, use_state_writable, Context, ReadSignal,
    Update,
};
use rand::Rng;

#[test]
fn starts_with_initial_value() {
    let (value, _set) = use_state(String::from("init"));
    assert_eq!(value.get(), "init");
    assert_eq!(value.version(), 0);
}

#[test]
fn empty_state_is_none() {
    let (value, set_value) = use_state_empty::<u32>();
    assert_eq!(value.get(), None);

    set_value.set(Some(4u32));
    assert_eq!(value.get(), Some(4));
}

#[test]
fn literal_set() {
    let (value, set_value) = use_state(0i32);
    set_value.set(5);
    assert_eq!(value.get(), 5);
}

#[test]
fn repeated_identical_sets_are_stable() {
    let (value, set_value) = use_state(0i32);
    for _ in 0..3 {
        set_value.set(8);
        assert_eq!(value.get(), 8);
    }
}

#[test]
fn functional_update() {
    let (value, set_value) = use_state(1i32);
    set_value.set(Update::map(|prev: &i32| prev + 1));
    assert_eq!(value.get(), 2);
}

#[test]
fn updater_receives_previous_value_once() {
    let (value, set_value) = use_state(vec![1, 2]);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    set_value.set(Update::map(move |prev: &Vec<i32>| {
        log.borrow_mut().push(prev.clone());
        let mut next = prev.clone();
        next.push(3);
        next
    }));

    assert_eq!(*seen.borrow(), [vec![1, 2]]);
    assert_eq!(value.get(), [1, 2, 3]);
}

#[test]
fn writable_handle_assignment_is_shared() {
    #[derive(Debug, Clone, PartialEq)]
    struct A {
        a: i32,
    }

    let (value, set_value) = use_state_writable(A { a: 1 });
    value.set(A { a: 2 });
    assert_eq!(value.get(), A { a: 2 });

    let mut prev = None;
    set_value.update(|current| {
        prev = Some(current.clone());
        A { a: current.a * 10 }
    });
    assert_eq!(prev, Some(A { a: 2 }));
    assert_eq!(value.get(), A { a: 20 });
}

#[test]
fn cells_can_hold_functions() {
    type Op = Rc<dyn Fn(i32) -> i32>;

    let (op, set_op) = use_state::<Op>(Rc::new(|x: i32| x + 1));
    assert_eq!((op.get())(1), 2);

    set_op.set(Update::Replace(Rc::new(|x: i32| x * 2) as Op));
    assert_eq!((op.get())(4), 8);
}

#[test]
fn independent_cells() {
    let (a, set_a) = use_state(0i32);
    let (b, _set_b) = use_state(0i32);

    set_a.set(1);
    assert_eq!(a.get(), 1);
    assert_eq!(b.get(), 0);
    assert!(!a.ptr_eq(&b));
}

#[test]
fn subscribers_observe_setter_writes() {
    let (value, set_value) = use_state(0i32);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    let _sub = value.subscribe(move |v| log.borrow_mut().push(*v));

    set_value.set(1);
    set_value.update(|v| v + 1);
    set_value.set(10);

    assert_eq!(*seen.borrow(), [1, 2, 10]);
}

#[test]
fn subscriber_can_clamp_its_own_cell() {
    let (value, set_value) = use_state(0i32);

    let clamp = set_value.clone();
    let _sub = value.subscribe(move |v| {
        if *v > 10 {
            clamp.set(10);
        }
    });

    set_value.set(50);
    assert_eq!(value.get(), 10);
    assert_eq!(value.version(), 2);

    set_value.set(Update::map(|v: &i32| v * 3));
    assert_eq!(value.get(), 10);
}

#[test]
fn updater_may_call_its_own_setter() {
    let (value, set_value) = use_state(0i32);

    let nested = set_value.clone();
    set_value.set(Update::map(move |v: &i32| {
        nested.set(100);
        v + 1
    }));

    // the nested write lands first, the updater's result last
    assert_eq!(value.get(), 1);
    assert_eq!(value.version(), 2);
}

#[test]
fn published_state_is_injectable() {
    let mut root = Context::new();
    let (_value, set_value) = provide_state(&mut root, "counter", 0u64);

    let child = root.scoped();
    let counter = inject::<ReadSignal<u64>>(&child, "counter").unwrap();

    set_value.update(|n| n + 3);
    assert_eq!(counter.get(), 3);
}

#[test]
fn random_update_sequences() {
    let mut rng = rand::thread_rng();
    let (value, set_value) = use_state(0i64);
    let mut expected = 0i64;

    for _ in 0..100 {
        let n: i64 = rng.gen_range(-1000..1000);
        if rng.gen_bool(0.5) {
            set_value.set(n);
            expected = n;
        } else {
            set_value.update(move |prev| prev.wrapping_add(n));
            expected = expected.wrapping_add(n);
        }
        assert_eq!(value.get(), expected);
    }
    assert_eq!(value.version(), 100);
}

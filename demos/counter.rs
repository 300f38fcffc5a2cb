use composables::{inject, use_state, Context, InjectError, Key, ReadSignal, Setter};

#[derive(Debug)]
struct Theme {
    accent: &'static str,
}

const THEME: Key<Theme> = Key::new("theme");

/// A component rendering the shared count with the inherited theme
fn counter_label(cx: &Context) -> Result<String, InjectError> {
    let theme = THEME.inject(cx)?;
    let count = inject::<ReadSignal<u32>>(cx, "count")?;
    Ok(format!("[{}] count = {}", theme.accent, count.get()))
}

/// A component bumping the shared count
fn increment_button(cx: &Context) -> Result<(), InjectError> {
    let set_count = inject::<Setter<u32>>(cx, "set-count")?;
    set_count.update(|n| n + 1);
    Ok(())
}

fn main() -> Result<(), InjectError> {
    let mut app = Context::new();
    THEME.provide(&mut app, Theme { accent: "blue" });

    let (count, set_count) = use_state(0u32);
    let _log = count.subscribe(|n| println!("count changed to {n}"));
    app.provide("count", count);
    app.provide("set-count", set_count);

    let panel = app.scoped();
    for _ in 0..3 {
        increment_button(&panel.scoped())?;
    }
    println!("{}", counter_label(&panel)?);

    // A detached tree has no theme to inherit
    let detached = Context::new();
    if let Err(err) = counter_label(&detached) {
        println!("error: {err}");
    }

    Ok(())
}

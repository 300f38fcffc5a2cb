#![forbid(unsafe_code)]

mod context;
mod error;
mod impls;
mod logging;
mod signal;
mod traits;

pub use context::*;
pub use error::*;
pub use signal::*;
pub use traits::*;

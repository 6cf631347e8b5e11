//! Host module - the HTTP process the worker runs inside.

mod routes;
mod runtime;

pub use runtime::run;

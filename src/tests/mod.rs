//! Tests that should be completed in-crate.
//! This allows reaching the weld pool, location index and buffers directly,
//! which are not part of the public interface.
//! Tests in a `tests/` folder at the repository root are treated as external
//! to the crate, and thus the crate is _not_ compiled with `test`.

mod buffers;
mod locations;

//! Generic structures, free of solver specifics.

pub mod index_heap;
pub mod luby;
pub mod minimal_pcg;

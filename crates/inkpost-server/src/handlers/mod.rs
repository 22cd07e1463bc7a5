//! Request handlers.

pub(crate) mod pages;

//! Static site generation for inkpost.
//!
//! [`BatchGenerator`] renders every page once inside a single rendering
//! environment and writes the result below the output directory:
//!
//! ```text
//! {out_dir}/index.html            list page
//! {out_dir}/post/{slug}.html      one page per document
//! ```
//!
//! The shell is read from `{out_dir}/index.html`, which the preparation phase
//! leaves behind. Generation overwrites that file, so the shell and the page
//! written over it are remembered in [`SHELL_STATE_FILE`] outside the output
//! directory. A later run reuses that shell only while `index.html` is still
//! the page it wrote.

mod error;
mod generator;

pub use error::BuildError;
pub use generator::{BatchGenerator, BuildReport, SHELL_STATE_FILE};

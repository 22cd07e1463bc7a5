//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod generate;
pub(crate) mod prepare;
pub(crate) mod preview;
pub(crate) mod serve;

pub(crate) use build::BuildArgs;
pub(crate) use generate::GenerateArgs;
pub(crate) use prepare::PrepareArgs;
pub(crate) use preview::PreviewArgs;
pub(crate) use serve::ServeArgs;

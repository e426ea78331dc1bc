//! Value objects - immutable types that represent domain concepts

mod capability;

pub use capability::Capability;

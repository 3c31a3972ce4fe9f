use crate::error::Result;

/// Validate the size invariants of configured control data.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

use serde::{
    Deserialize,
    Serialize
};

/// How grid points are shifted and scaled before raising them to a power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentKind {
    /// `x^d`
    #[default]
    Raw,
    /// `(x - mean)^d`
    Central,
    /// `((x - mean) / std)^d`
    Standardized,
}

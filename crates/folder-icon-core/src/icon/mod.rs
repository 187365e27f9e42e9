//! Conversion of source images into multi-resolution ICO containers.

pub mod sizes;
pub mod synth;

pub use sizes::{fit_within, variant_sizes, CANONICAL_SIZES, MAX_ICON_EDGE};
pub use synth::{synthesize, IconContainer, IconVariant};

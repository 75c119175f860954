//! Static doctrine tables.
//!
//! Everything in this module is compile-time constant data with no
//! initialization-order dependencies. Engine code reads these tables; it
//! never mutates them.

pub mod combinations;
pub mod relations;
pub mod seasonal;

pub use combinations::{
    combination_for, is_stem_clash, partner_of, StemCombination, STEM_CLASHES, STEM_COMBINATIONS,
};
pub use relations::{
    partial_harmony_note, three_harmony_trio_containing, HarmonyTrio, BREAKS, CLASHES,
    DIRECTIONAL_TRIOS, HARMS, PUNISHMENT_PAIRS, PUNISHMENT_TRIOS, RESENTMENTS, SIX_HARMONIES,
    THREE_HARMONY_TRIOS,
};
pub use seasonal::supports_transformation;

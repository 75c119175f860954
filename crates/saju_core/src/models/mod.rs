//! Domain model: stems, branches, elements, ten gods and the four-pillar chart.

pub mod branch;
pub mod element;
pub mod pillar;
pub mod stem;
pub mod ten_god;

pub use branch::{Branch, HiddenStem};
pub use element::{Element, Polarity};
pub use pillar::{FourPillars, Pillar, PillarPosition};
pub use stem::Stem;
pub use ten_god::{TenGod, TenGodGroup};

//! 천간합 and 천간충 constant tables.

use crate::models::{Element, Stem};

/// One fixed stem combination (천간합). Symmetric: order of the pair never
/// matters, and each stem belongs to exactly one combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemCombination {
    pub pair: (Stem, Stem),
    pub result_element: Element,
    /// 전통 명칭 (예: 갑기합토)
    pub name: &'static str,
}

/// The five 천간합 combinations.
pub static STEM_COMBINATIONS: [StemCombination; 5] = [
    StemCombination { pair: (Stem::Gap, Stem::Gi), result_element: Element::Earth, name: "갑기합토" },
    StemCombination { pair: (Stem::Eul, Stem::Gyeong), result_element: Element::Metal, name: "을경합금" },
    StemCombination { pair: (Stem::Byeong, Stem::Sin), result_element: Element::Water, name: "병신합수" },
    StemCombination { pair: (Stem::Jeong, Stem::Im), result_element: Element::Wood, name: "정임합목" },
    StemCombination { pair: (Stem::Mu, Stem::Gye), result_element: Element::Fire, name: "무계합화" },
];

/// Look up the combination containing both stems, in either order.
pub fn combination_for(a: Stem, b: Stem) -> Option<&'static StemCombination> {
    STEM_COMBINATIONS
        .iter()
        .find(|c| (c.pair.0 == a && c.pair.1 == b) || (c.pair.0 == b && c.pair.1 == a))
}

/// The combination partner of a stem and the pair's result element.
pub fn partner_of(stem: Stem) -> (Stem, Element) {
    let combo = STEM_COMBINATIONS
        .iter()
        .find(|c| c.pair.0 == stem || c.pair.1 == stem)
        .expect("every stem belongs to exactly one combination");
    let partner = if combo.pair.0 == stem { combo.pair.1 } else { combo.pair.0 };
    (partner, combo.result_element)
}

/// 천간충 pairs (갑경, 을신, 병임, 정계).
pub const STEM_CLASHES: [(Stem, Stem); 4] = [
    (Stem::Gap, Stem::Gyeong),
    (Stem::Eul, Stem::Sin),
    (Stem::Byeong, Stem::Im),
    (Stem::Jeong, Stem::Gye),
];

/// True when the two stems clash, in either order.
pub fn is_stem_clash(a: Stem, b: Stem) -> bool {
    STEM_CLASHES.iter().any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
}

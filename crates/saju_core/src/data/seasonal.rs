//! 월령 지원표: whether a month branch reinforces a transformation element.
//!
//! 60-entry constant table (12 branches x 5 elements) from the classical
//! 왕상휴수사 doctrine with 당령 taken strictly: the month commands an element
//! only when the branch's 본기 is that element. The Earth column is therefore
//! true exactly for the four vault months (축/진/미/술).
//!
//! Kept as explicit data rather than a formula so a school that reads 당령
//! differently can be accommodated by editing rows, not code.

use crate::models::{Branch, Element};

/// Rows in canonical branch order (자..해), columns Wood/Fire/Earth/Metal/Water.
#[rustfmt::skip]
const SEASONAL_SUPPORT: [[bool; 5]; 12] = [
    //          목     화     토     금     수
    /* 자 */ [false, false, false, false, true ],
    /* 축 */ [false, false, true,  false, false],
    /* 인 */ [true,  false, false, false, false],
    /* 묘 */ [true,  false, false, false, false],
    /* 진 */ [false, false, true,  false, false],
    /* 사 */ [false, true,  false, false, false],
    /* 오 */ [false, true,  false, false, false],
    /* 미 */ [false, false, true,  false, false],
    /* 신 */ [false, false, false, true,  false],
    /* 유 */ [false, false, false, true,  false],
    /* 술 */ [false, false, true,  false, false],
    /* 해 */ [false, false, false, false, true ],
];

/// True when the month branch reinforces transformation into `element`.
pub fn supports_transformation(month_branch: Branch, element: Element) -> bool {
    SEASONAL_SUPPORT[month_branch.index()][element.index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_earth_column_is_the_four_vaults() {
        for branch in Branch::iter() {
            assert_eq!(
                supports_transformation(branch, Element::Earth),
                branch.is_vault(),
                "earth support mismatch for {:?}",
                branch
            );
        }
    }

    #[test]
    fn test_each_month_supports_exactly_one_element() {
        for branch in Branch::iter() {
            let supported: Vec<Element> = Element::iter()
                .filter(|e| supports_transformation(branch, *e))
                .collect();
            assert_eq!(supported.len(), 1, "{:?} should command one element", branch);
            assert_eq!(supported[0], branch.element());
        }
    }

    #[test]
    fn test_spot_checks() {
        assert!(supports_transformation(Branch::Jin, Element::Earth));
        assert!(supports_transformation(Branch::Ja, Element::Water));
        assert!(supports_transformation(Branch::O, Element::Fire));
        assert!(!supports_transformation(Branch::Ja, Element::Earth));
        assert!(!supports_transformation(Branch::In, Element::Fire));
    }
}

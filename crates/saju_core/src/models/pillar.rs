//! 사주 기둥 (pillars): 연/월/일/시 four-pillar chart structure.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::models::{Branch, Element, Stem};

/// Fixed pillar positions, ordered 연 → 월 → 일 → 시.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarPosition {
    pub const ALL: [PillarPosition; 4] =
        [PillarPosition::Year, PillarPosition::Month, PillarPosition::Day, PillarPosition::Hour];

    pub fn index(&self) -> usize {
        match self {
            PillarPosition::Year => 0,
            PillarPosition::Month => 1,
            PillarPosition::Day => 2,
            PillarPosition::Hour => 3,
        }
    }

    /// Adjacent means position-index distance 1 (연-월, 월-일, 일-시).
    pub fn is_adjacent_to(&self, other: PillarPosition) -> bool {
        self.index().abs_diff(other.index()) == 1
    }

    /// 한글 이름
    pub fn korean_name(&self) -> &'static str {
        match self {
            PillarPosition::Year => "연주",
            PillarPosition::Month => "월주",
            PillarPosition::Day => "일주",
            PillarPosition::Hour => "시주",
        }
    }
}

/// One pillar: a (천간, 지지) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }
}

/// A complete four-pillar chart at fixed 연/월/일/시 positions.
///
/// Construction is the structural validation boundary: once a value exists it
/// is well-formed and the cascade performs no re-validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FourPillars {
    year: Pillar,
    month: Pillar,
    day: Pillar,
    hour: Pillar,
}

impl FourPillars {
    pub fn new(year: Pillar, month: Pillar, day: Pillar, hour: Pillar) -> Self {
        Self { year, month, day, hour }
    }

    /// Build from a slice; anything other than exactly four pillars is a
    /// structural error.
    pub fn from_slice(pillars: &[Pillar]) -> Result<Self> {
        match pillars {
            [year, month, day, hour] => Ok(Self::new(*year, *month, *day, *hour)),
            _ => Err(AnalysisError::InvalidPillarCount { expected: 4, found: pillars.len() }),
        }
    }

    pub fn pillar(&self, position: PillarPosition) -> &Pillar {
        match position {
            PillarPosition::Year => &self.year,
            PillarPosition::Month => &self.month,
            PillarPosition::Day => &self.day,
            PillarPosition::Hour => &self.hour,
        }
    }

    /// 일간 (day master)
    pub fn day_master(&self) -> Stem {
        self.day.stem
    }

    /// 월지 (month branch)
    pub fn month_branch(&self) -> Branch {
        self.month.branch
    }

    pub fn stems(&self) -> [Stem; 4] {
        [self.year.stem, self.month.stem, self.day.stem, self.hour.stem]
    }

    pub fn branches(&self) -> [Branch; 4] {
        [self.year.branch, self.month.branch, self.day.branch, self.hour.branch]
    }

    /// Every position whose branch equals `branch` (a branch may repeat).
    pub fn branch_positions(&self, branch: Branch) -> Vec<PillarPosition> {
        PillarPosition::ALL
            .iter()
            .copied()
            .filter(|pos| self.pillar(*pos).branch == branch)
            .collect()
    }

    /// True when some occurrence of `a` sits next to some occurrence of `b`.
    pub fn branches_adjacent(&self, a: Branch, b: Branch) -> bool {
        for pa in self.branch_positions(a) {
            for pb in self.branch_positions(b) {
                if pa.is_adjacent_to(pb) {
                    return true;
                }
            }
        }
        false
    }

    /// Element occupancy over the eight visible slots
    /// (four stems + four branch principal elements), indexed Wood..Water.
    pub fn element_counts(&self) -> [u8; 5] {
        let mut counts = [0u8; 5];
        for stem in self.stems() {
            counts[stem.element().index()] += 1;
        }
        for branch in self.branches() {
            counts[branch.element().index()] += 1;
        }
        counts
    }

    /// 지장간 day weight of `element` summed across all four branches.
    pub fn hidden_element_days(&self, element: Element) -> f64 {
        self.branches()
            .iter()
            .flat_map(|b| b.hidden_stems())
            .filter(|h| h.stem.element() == element)
            .map(|h| h.days)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FourPillars {
        FourPillars::new(
            Pillar::new(Stem::Gap, Branch::Ja),
            Pillar::new(Stem::Gi, Branch::Jin),
            Pillar::new(Stem::Byeong, Branch::O),
            Pillar::new(Stem::Jeong, Branch::Yu),
        )
    }

    #[test]
    fn test_adjacency_is_distance_one() {
        assert!(PillarPosition::Year.is_adjacent_to(PillarPosition::Month));
        assert!(PillarPosition::Month.is_adjacent_to(PillarPosition::Day));
        assert!(PillarPosition::Day.is_adjacent_to(PillarPosition::Hour));
        assert!(!PillarPosition::Year.is_adjacent_to(PillarPosition::Day));
        assert!(!PillarPosition::Year.is_adjacent_to(PillarPosition::Hour));
        assert!(!PillarPosition::Month.is_adjacent_to(PillarPosition::Hour));
        assert!(!PillarPosition::Day.is_adjacent_to(PillarPosition::Day));
    }

    #[test]
    fn test_from_slice_rejects_wrong_count() {
        let p = Pillar::new(Stem::Gap, Branch::Ja);
        let err = FourPillars::from_slice(&[p, p, p]).unwrap_err();
        match err {
            AnalysisError::InvalidPillarCount { expected, found } => {
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_day_master_and_month_branch() {
        let pillars = sample();
        assert_eq!(pillars.day_master(), Stem::Byeong);
        assert_eq!(pillars.month_branch(), Branch::Jin);
    }

    #[test]
    fn test_element_counts_cover_eight_slots() {
        let counts = sample().element_counts();
        let total: u8 = counts.iter().sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_branch_positions_with_duplicates() {
        let pillars = FourPillars::new(
            Pillar::new(Stem::Gap, Branch::Ja),
            Pillar::new(Stem::Gi, Branch::O),
            Pillar::new(Stem::Byeong, Branch::Ja),
            Pillar::new(Stem::Jeong, Branch::Yu),
        );
        assert_eq!(
            pillars.branch_positions(Branch::Ja),
            vec![PillarPosition::Year, PillarPosition::Day]
        );
        // 자(일주)와 유(시주)는 인접
        assert!(pillars.branches_adjacent(Branch::Ja, Branch::Yu));
        // 축은 차트에 없으므로 어떤 인접쌍도 만들 수 없다
        assert!(!pillars.branches_adjacent(Branch::Ja, Branch::Chuk));
    }
}

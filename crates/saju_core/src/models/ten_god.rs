//! 십신 (ten gods): the relational role of a stem relative to the day master.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{Element, Polarity, Stem};

/// 십신 (Ten Gods)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TenGod {
    Bigyeon,   // 비견
    Geopjae,   // 겁재
    Siksin,    // 식신
    Sangwan,   // 상관
    Pyeonjae,  // 편재
    Jeongjae,  // 정재
    Pyeongwan, // 편관 (칠살)
    Jeonggwan, // 정관
    Pyeonin,   // 편인
    Jeongin,   // 정인
}

/// 십신 5대 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TenGodGroup {
    Bigyeop,   // 비겁 (peer)
    Siksang,   // 식상 (output)
    Jaeseong,  // 재성 (wealth)
    Gwanseong, // 관성 (authority)
    Inseong,   // 인성 (resource)
}

impl TenGod {
    /// Classify `other` relative to the day master.
    pub fn of(day_master: Stem, other: Stem) -> TenGod {
        TenGod::of_element(day_master, other.element(), other.polarity())
    }

    /// Classify an (element, polarity) pair relative to the day master.
    ///
    /// Split out so a transformed stem can be reclassified at its combination
    /// result element while keeping its own polarity.
    pub fn of_element(day_master: Stem, element: Element, polarity: Polarity) -> TenGod {
        let dm_element = day_master.element();
        let same_polarity = day_master.polarity() == polarity;

        if element == dm_element {
            if same_polarity {
                TenGod::Bigyeon
            } else {
                TenGod::Geopjae
            }
        } else if dm_element.generates() == element {
            if same_polarity {
                TenGod::Siksin
            } else {
                TenGod::Sangwan
            }
        } else if dm_element.controls() == element {
            if same_polarity {
                TenGod::Pyeonjae
            } else {
                TenGod::Jeongjae
            }
        } else if element.controls() == dm_element {
            if same_polarity {
                TenGod::Pyeongwan
            } else {
                TenGod::Jeonggwan
            }
        } else {
            // 남은 관계는 생아자 (element generates dm_element)
            if same_polarity {
                TenGod::Pyeonin
            } else {
                TenGod::Jeongin
            }
        }
    }

    pub fn group(&self) -> TenGodGroup {
        match self {
            TenGod::Bigyeon | TenGod::Geopjae => TenGodGroup::Bigyeop,
            TenGod::Siksin | TenGod::Sangwan => TenGodGroup::Siksang,
            TenGod::Pyeonjae | TenGod::Jeongjae => TenGodGroup::Jaeseong,
            TenGod::Pyeongwan | TenGod::Jeonggwan => TenGodGroup::Gwanseong,
            TenGod::Pyeonin | TenGod::Jeongin => TenGodGroup::Inseong,
        }
    }

    /// 한글 이름
    pub fn korean_name(&self) -> &'static str {
        match self {
            TenGod::Bigyeon => "비견",
            TenGod::Geopjae => "겁재",
            TenGod::Siksin => "식신",
            TenGod::Sangwan => "상관",
            TenGod::Pyeonjae => "편재",
            TenGod::Jeongjae => "정재",
            TenGod::Pyeongwan => "편관",
            TenGod::Jeonggwan => "정관",
            TenGod::Pyeonin => "편인",
            TenGod::Jeongin => "정인",
        }
    }
}

impl TenGodGroup {
    /// Classify an element group relative to the day master's element.
    pub fn of_element(dm_element: Element, element: Element) -> TenGodGroup {
        if element == dm_element {
            TenGodGroup::Bigyeop
        } else if dm_element.generates() == element {
            TenGodGroup::Siksang
        } else if dm_element.controls() == element {
            TenGodGroup::Jaeseong
        } else if element.controls() == dm_element {
            TenGodGroup::Gwanseong
        } else {
            TenGodGroup::Inseong
        }
    }

    /// 비겁/인성 support the day master; 식상/재성/관성 oppose it.
    pub fn supports_day_master(&self) -> bool {
        matches!(self, TenGodGroup::Bigyeop | TenGodGroup::Inseong)
    }

    /// The element that plays this role for the given day master.
    pub fn element_for(&self, dm_element: Element) -> Element {
        match self {
            TenGodGroup::Bigyeop => dm_element,
            TenGodGroup::Siksang => dm_element.generates(),
            TenGodGroup::Jaeseong => dm_element.controls(),
            TenGodGroup::Gwanseong => dm_element.controlled_by(),
            TenGodGroup::Inseong => dm_element.generated_by(),
        }
    }

    /// 한글 이름
    pub fn korean_name(&self) -> &'static str {
        match self {
            TenGodGroup::Bigyeop => "비겁",
            TenGodGroup::Siksang => "식상",
            TenGodGroup::Jaeseong => "재성",
            TenGodGroup::Gwanseong => "관성",
            TenGodGroup::Inseong => "인성",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_classic_pairs_for_gap_day_master() {
        // 갑목 일간 기준의 대표 조합들
        assert_eq!(TenGod::of(Stem::Gap, Stem::Gap), TenGod::Bigyeon);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Eul), TenGod::Geopjae);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Byeong), TenGod::Siksin);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Jeong), TenGod::Sangwan);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Mu), TenGod::Pyeonjae);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Gi), TenGod::Jeongjae);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Gyeong), TenGod::Pyeongwan);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Sin), TenGod::Jeonggwan);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Im), TenGod::Pyeonin);
        assert_eq!(TenGod::of(Stem::Gap, Stem::Gye), TenGod::Jeongin);
    }

    #[test]
    fn test_every_day_master_sees_all_ten_gods() {
        for day_master in Stem::iter() {
            let mut seen = std::collections::HashSet::new();
            for other in Stem::iter() {
                seen.insert(TenGod::of(day_master, other));
            }
            assert_eq!(seen.len(), 10, "day master {:?} should see 10 distinct roles", day_master);
        }
    }

    #[test]
    fn test_group_element_roundtrip() {
        for dm in Stem::iter() {
            for group in [
                TenGodGroup::Bigyeop,
                TenGodGroup::Siksang,
                TenGodGroup::Jaeseong,
                TenGodGroup::Gwanseong,
                TenGodGroup::Inseong,
            ] {
                let element = group.element_for(dm.element());
                assert_eq!(TenGodGroup::of_element(dm.element(), element), group);
            }
        }
    }

    #[test]
    fn test_supportive_groups() {
        assert!(TenGodGroup::Bigyeop.supports_day_master());
        assert!(TenGodGroup::Inseong.supports_day_master());
        assert!(!TenGodGroup::Siksang.supports_day_master());
        assert!(!TenGodGroup::Jaeseong.supports_day_master());
        assert!(!TenGodGroup::Gwanseong.supports_day_master());
    }
}

//! 지지 (twelve earthly branches) and their hidden-stem content.
//!
//! Hidden stems (지장간) follow the 월률분야 day allocation: each branch
//! holds up to three stems weighted by the number of days each commands
//! within a 30-day month. The final entry is the 정기 (principal qi), which
//! acts as the branch's commanding stem.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::models::{Element, Polarity, Stem};

/// One hidden-stem entry with its 월률분야 day weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HiddenStem {
    pub stem: Stem,
    pub days: f64,
}

const fn hs(stem: Stem, days: f64) -> HiddenStem {
    HiddenStem { stem, days }
}

/// 지지 (Twelve Earthly Branches)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Branch {
    Ja,   // 자 (수)
    Chuk, // 축 (토)
    In,   // 인 (목)
    Myo,  // 묘 (목)
    Jin,  // 진 (토)
    Sa,   // 사 (화)
    O,    // 오 (화)
    Mi,   // 미 (토)
    Sin,  // 신 (금)
    Yu,   // 유 (금)
    Sul,  // 술 (토)
    Hae,  // 해 (수)
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Ja,
        Branch::Chuk,
        Branch::In,
        Branch::Myo,
        Branch::Jin,
        Branch::Sa,
        Branch::O,
        Branch::Mi,
        Branch::Sin,
        Branch::Yu,
        Branch::Sul,
        Branch::Hae,
    ];

    /// 본기 (principal element) of the branch
    pub fn element(&self) -> Element {
        match self {
            Branch::Ja | Branch::Hae => Element::Water,
            Branch::In | Branch::Myo => Element::Wood,
            Branch::Sa | Branch::O => Element::Fire,
            Branch::Sin | Branch::Yu => Element::Metal,
            Branch::Chuk | Branch::Jin | Branch::Mi | Branch::Sul => Element::Earth,
        }
    }

    /// Polarity by canonical order parity (자=양, 축=음, ...)
    pub fn polarity(&self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Eum
        }
    }

    /// 지장간 (hidden stems) in 여기 → 중기 → 정기 order with day weights.
    /// Day weights per branch always sum to 30.
    pub fn hidden_stems(&self) -> &'static [HiddenStem] {
        const JA: &[HiddenStem] = &[hs(Stem::Im, 10.0), hs(Stem::Gye, 20.0)];
        const CHUK: &[HiddenStem] = &[hs(Stem::Gye, 9.0), hs(Stem::Sin, 3.0), hs(Stem::Gi, 18.0)];
        const IN: &[HiddenStem] = &[hs(Stem::Mu, 7.0), hs(Stem::Byeong, 7.0), hs(Stem::Gap, 16.0)];
        const MYO: &[HiddenStem] = &[hs(Stem::Gap, 10.0), hs(Stem::Eul, 20.0)];
        const JIN: &[HiddenStem] = &[hs(Stem::Eul, 9.0), hs(Stem::Gye, 3.0), hs(Stem::Mu, 18.0)];
        const SA: &[HiddenStem] = &[hs(Stem::Mu, 7.0), hs(Stem::Gyeong, 7.0), hs(Stem::Byeong, 16.0)];
        const O: &[HiddenStem] = &[hs(Stem::Byeong, 10.0), hs(Stem::Gi, 9.0), hs(Stem::Jeong, 11.0)];
        const MI: &[HiddenStem] = &[hs(Stem::Jeong, 9.0), hs(Stem::Eul, 3.0), hs(Stem::Gi, 18.0)];
        const SIN: &[HiddenStem] = &[hs(Stem::Mu, 7.0), hs(Stem::Im, 7.0), hs(Stem::Gyeong, 16.0)];
        const YU: &[HiddenStem] = &[hs(Stem::Gyeong, 10.0), hs(Stem::Sin, 20.0)];
        const SUL: &[HiddenStem] = &[hs(Stem::Sin, 9.0), hs(Stem::Jeong, 3.0), hs(Stem::Mu, 18.0)];
        const HAE: &[HiddenStem] = &[hs(Stem::Mu, 7.0), hs(Stem::Gap, 7.0), hs(Stem::Im, 16.0)];
        match self {
            Branch::Ja => JA,
            Branch::Chuk => CHUK,
            Branch::In => IN,
            Branch::Myo => MYO,
            Branch::Jin => JIN,
            Branch::Sa => SA,
            Branch::O => O,
            Branch::Mi => MI,
            Branch::Sin => SIN,
            Branch::Yu => YU,
            Branch::Sul => SUL,
            Branch::Hae => HAE,
        }
    }

    /// 정기 (commanding hidden stem): the last 월률분야 entry.
    pub fn commanding_stem(&self) -> Stem {
        self.hidden_stems().last().expect("every branch has hidden stems").stem
    }

    /// 고지 (vault branches): 진술축미
    pub fn is_vault(&self) -> bool {
        matches!(self, Branch::Jin | Branch::Sul | Branch::Chuk | Branch::Mi)
    }

    /// 한글 이름
    pub fn korean_name(&self) -> &'static str {
        match self {
            Branch::Ja => "자",
            Branch::Chuk => "축",
            Branch::In => "인",
            Branch::Myo => "묘",
            Branch::Jin => "진",
            Branch::Sa => "사",
            Branch::O => "오",
            Branch::Mi => "미",
            Branch::Sin => "신",
            Branch::Yu => "유",
            Branch::Sul => "술",
            Branch::Hae => "해",
        }
    }

    /// Stable index for constant-table lookups (자=0 .. 해=11)
    pub(crate) fn index(&self) -> usize {
        match self {
            Branch::Ja => 0,
            Branch::Chuk => 1,
            Branch::In => 2,
            Branch::Myo => 3,
            Branch::Jin => 4,
            Branch::Sa => 5,
            Branch::O => 6,
            Branch::Mi => 7,
            Branch::Sin => 8,
            Branch::Yu => 9,
            Branch::Sul => 10,
            Branch::Hae => 11,
        }
    }
}

impl FromStr for Branch {
    type Err = AnalysisError;

    /// Accepts the romanized name (case-insensitive) or the hangul character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ja" | "자" => Ok(Branch::Ja),
            "chuk" | "축" => Ok(Branch::Chuk),
            "in" | "인" => Ok(Branch::In),
            "myo" | "묘" => Ok(Branch::Myo),
            "jin" | "진" => Ok(Branch::Jin),
            "sa" | "사" => Ok(Branch::Sa),
            "o" | "오" => Ok(Branch::O),
            "mi" | "미" => Ok(Branch::Mi),
            "sin" | "신" => Ok(Branch::Sin),
            "yu" | "유" => Ok(Branch::Yu),
            "sul" | "술" => Ok(Branch::Sul),
            "hae" | "해" => Ok(Branch::Hae),
            _ => Err(AnalysisError::UnknownBranch(s.to_string())),
        }
    }
}

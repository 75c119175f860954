//! 오행 (five elements) and 음양 (polarity).
//!
//! The generation cycle (상생) and the controlling cycle (상극) are the two
//! fixed orders every downstream classification reduces to. Both are total:
//! each element generates exactly one element and controls exactly one.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 오행 (Five Elements)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Element {
    Wood,  // 목
    Fire,  // 화
    Earth, // 토
    Metal, // 금
    Water, // 수
}

impl Element {
    pub const ALL: [Element; 5] =
        [Element::Wood, Element::Fire, Element::Earth, Element::Metal, Element::Water];

    /// 상생: the element this one generates (목생화, 화생토, 토생금, 금생수, 수생목)
    pub fn generates(&self) -> Element {
        match self {
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
        }
    }

    /// 상극: the element this one controls (목극토, 토극수, 수극화, 화극금, 금극목)
    pub fn controls(&self) -> Element {
        match self {
            Element::Wood => Element::Earth,
            Element::Earth => Element::Water,
            Element::Water => Element::Fire,
            Element::Fire => Element::Metal,
            Element::Metal => Element::Wood,
        }
    }

    /// Inverse of [`Element::generates`]
    pub fn generated_by(&self) -> Element {
        match self {
            Element::Fire => Element::Wood,
            Element::Earth => Element::Fire,
            Element::Metal => Element::Earth,
            Element::Water => Element::Metal,
            Element::Wood => Element::Water,
        }
    }

    /// Inverse of [`Element::controls`]
    pub fn controlled_by(&self) -> Element {
        match self {
            Element::Earth => Element::Wood,
            Element::Water => Element::Earth,
            Element::Fire => Element::Water,
            Element::Metal => Element::Fire,
            Element::Wood => Element::Metal,
        }
    }

    /// 한글 이름
    pub fn korean_name(&self) -> &'static str {
        match self {
            Element::Wood => "목",
            Element::Fire => "화",
            Element::Earth => "토",
            Element::Metal => "금",
            Element::Water => "수",
        }
    }

    /// Stable index for constant-table lookups (Wood=0 .. Water=4)
    pub(crate) fn index(&self) -> usize {
        match self {
            Element::Wood => 0,
            Element::Fire => 1,
            Element::Earth => 2,
            Element::Metal => 3,
            Element::Water => 4,
        }
    }
}

/// 음양 (polarity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Polarity {
    Yang, // 양
    Eum,  // 음
}

impl Polarity {
    pub fn korean_name(&self) -> &'static str {
        match self {
            Polarity::Yang => "양",
            Polarity::Eum => "음",
        }
    }
}

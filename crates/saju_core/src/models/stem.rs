//! 천간 (ten heavenly stems).

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::models::{Element, Polarity};

/// 천간 (Ten Heavenly Stems)
///
/// Each stem carries a fixed element and polarity. Polarity alternates along
/// the canonical order: 갑(양목), 을(음목), 병(양화), ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Stem {
    Gap,    // 갑 (양목)
    Eul,    // 을 (음목)
    Byeong, // 병 (양화)
    Jeong,  // 정 (음화)
    Mu,     // 무 (양토)
    Gi,     // 기 (음토)
    Gyeong, // 경 (양금)
    Sin,    // 신 (음금)
    Im,     // 임 (양수)
    Gye,    // 계 (음수)
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Gap,
        Stem::Eul,
        Stem::Byeong,
        Stem::Jeong,
        Stem::Mu,
        Stem::Gi,
        Stem::Gyeong,
        Stem::Sin,
        Stem::Im,
        Stem::Gye,
    ];

    pub fn element(&self) -> Element {
        match self {
            Stem::Gap | Stem::Eul => Element::Wood,
            Stem::Byeong | Stem::Jeong => Element::Fire,
            Stem::Mu | Stem::Gi => Element::Earth,
            Stem::Gyeong | Stem::Sin => Element::Metal,
            Stem::Im | Stem::Gye => Element::Water,
        }
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            Stem::Gap | Stem::Byeong | Stem::Mu | Stem::Gyeong | Stem::Im => Polarity::Yang,
            Stem::Eul | Stem::Jeong | Stem::Gi | Stem::Sin | Stem::Gye => Polarity::Eum,
        }
    }

    /// 한글 이름
    pub fn korean_name(&self) -> &'static str {
        match self {
            Stem::Gap => "갑",
            Stem::Eul => "을",
            Stem::Byeong => "병",
            Stem::Jeong => "정",
            Stem::Mu => "무",
            Stem::Gi => "기",
            Stem::Gyeong => "경",
            Stem::Sin => "신",
            Stem::Im => "임",
            Stem::Gye => "계",
        }
    }
}

impl FromStr for Stem {
    type Err = AnalysisError;

    /// Accepts the romanized name (case-insensitive) or the hangul character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gap" | "갑" => Ok(Stem::Gap),
            "eul" | "을" => Ok(Stem::Eul),
            "byeong" | "병" => Ok(Stem::Byeong),
            "jeong" | "정" => Ok(Stem::Jeong),
            "mu" | "무" => Ok(Stem::Mu),
            "gi" | "기" => Ok(Stem::Gi),
            "gyeong" | "경" => Ok(Stem::Gyeong),
            "sin" | "신" => Ok(Stem::Sin),
            "im" | "임" => Ok(Stem::Im),
            "gye" | "계" => Ok(Stem::Gye),
            _ => Err(AnalysisError::UnknownStem(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_two_stems_per_element() {
        for element in Element::iter() {
            let count = Stem::iter().filter(|s| s.element() == element).count();
            assert_eq!(count, 2, "element {:?} should own exactly two stems", element);
        }
    }

    #[test]
    fn test_polarity_alternates_along_canonical_order() {
        for (i, stem) in Stem::ALL.iter().enumerate() {
            let expected = if i % 2 == 0 { Polarity::Yang } else { Polarity::Eum };
            assert_eq!(stem.polarity(), expected);
        }
    }

    #[test]
    fn test_from_str_romanized_and_hangul() {
        assert_eq!("gap".parse::<Stem>().unwrap(), Stem::Gap);
        assert_eq!("Gyeong".parse::<Stem>().unwrap(), Stem::Gyeong);
        assert_eq!("임".parse::<Stem>().unwrap(), Stem::Im);
        assert!("zzz".parse::<Stem>().is_err());
    }
}

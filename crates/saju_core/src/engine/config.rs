//! Calculation configuration and school presets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 합화 판정 엄격도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HapHwaStrictness {
    /// 월령과 무극 조건을 모두 요구
    Strict,
    /// 두 조건 중 하나면 합화 인정
    Moderate,
    /// 인접하기만 하면 합화 인정
    Lenient,
}

/// 종격 용신 선택 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum YongshinMode {
    /// 지배 세력의 오행을 따른다 (순응)
    FollowDominant,
    /// 지배 세력을 극하는 오행을 쓴다 (역행)
    CounterDominant,
}

/// 득지 집계 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DeukjiScope {
    /// 네 지지 전체
    AllBranches,
    /// 월지는 득령에서 이미 반영했다고 보고 제외
    ExcludeMonth,
}

/// 학파 프리셋. Each bundles the full config below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SchoolPreset {
    /// 전통: strict 합화, 일간 보호, 좁은 종격 문턱
    Traditional,
    /// 표준: moderate 합화 (기본값)
    Standard,
    /// 실용: lenient 합화, 일간 보호 없음
    Practical,
}

/// Cascade-wide calculation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalculationConfig {
    /// 합화 판정 엄격도 (기본: Moderate)
    pub hap_hwa_strictness: HapHwaStrictness,
    /// 일간불합: 일간이 낀 천간합을 무조건 불성립 처리 (기본: true)
    pub protect_day_master: bool,
    /// 신강 판정 문턱 (기본: 50.0)
    pub strength_threshold: f64,
    /// 종강격 총지지 문턱, 이상이면 후보 (기본: 62.4)
    pub jonggyeok_strong_threshold: f64,
    /// 종약격 총지지 문턱, 이하면 후보 (기본: 15.0)
    pub jonggyeok_weak_threshold: f64,
    /// 종격 용신 방식 (기본: FollowDominant)
    pub jonggyeok_yongshin_mode: YongshinMode,
    /// 득지 집계 범위 (기본: AllBranches)
    pub deukji_scope: DeukjiScope,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            hap_hwa_strictness: HapHwaStrictness::Moderate,
            protect_day_master: true,
            strength_threshold: 50.0,
            jonggyeok_strong_threshold: 62.4,
            jonggyeok_weak_threshold: 15.0,
            jonggyeok_yongshin_mode: YongshinMode::FollowDominant,
            deukji_scope: DeukjiScope::AllBranches,
        }
    }
}

impl CalculationConfig {
    /// Build from a school preset.
    pub fn from_preset(preset: SchoolPreset) -> Self {
        match preset {
            SchoolPreset::Traditional => Self {
                hap_hwa_strictness: HapHwaStrictness::Strict,
                protect_day_master: true,
                jonggyeok_strong_threshold: 70.0,
                jonggyeok_weak_threshold: 12.0,
                jonggyeok_yongshin_mode: YongshinMode::FollowDominant,
                ..Self::default()
            },
            SchoolPreset::Standard => Self::default(),
            SchoolPreset::Practical => Self {
                hap_hwa_strictness: HapHwaStrictness::Lenient,
                protect_day_master: false,
                deukji_scope: DeukjiScope::ExcludeMonth,
                ..Self::default()
            },
        }
    }

    /// Range checks, run at config-build time rather than analysis time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("strength_threshold", self.strength_threshold),
            ("jonggyeok_strong_threshold", self.jonggyeok_strong_threshold),
            ("jonggyeok_weak_threshold", self.jonggyeok_weak_threshold),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.jonggyeok_weak_threshold >= self.jonggyeok_strong_threshold {
            return Err(ConfigError::InvertedJonggyeokBand {
                weak: self.jonggyeok_weak_threshold,
                strong: self.jonggyeok_strong_threshold,
            });
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within 0..=100, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("jonggyeok weak threshold ({weak}) must be below strong threshold ({strong})")]
    InvertedJonggyeokBand { weak: f64, strong: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert_eq!(CalculationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_presets_validate() {
        for preset in [SchoolPreset::Traditional, SchoolPreset::Standard, SchoolPreset::Practical] {
            let config = CalculationConfig::from_preset(preset);
            assert_eq!(config.validate(), Ok(()), "preset {:?} must validate", preset);
        }
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let config = CalculationConfig { strength_threshold: -1.0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange { name: "strength_threshold", .. })
        ));
    }

    #[test]
    fn test_inverted_band_is_rejected() {
        let config = CalculationConfig {
            jonggyeok_weak_threshold: 70.0,
            jonggyeok_strong_threshold: 60.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvertedJonggyeokBand { .. })));
    }

    #[test]
    fn test_standard_preset_is_default() {
        assert_eq!(CalculationConfig::from_preset(SchoolPreset::Standard), Default::default());
    }
}

//! 천간합 평가기: classifies each candidate stem pair as 불성립/합거/합화.
//!
//! Gating runs in a fixed order per candidate pair: 일간 보호 → 인접성 →
//! 월령 지원 → 무극 검사, then the strictness tier decides how the last two
//! conditions promote the pair. Pure function of the chart and settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::data::{combination_for, supports_transformation};
use crate::engine::config::HapHwaStrictness;
use crate::models::{Element, FourPillars, PillarPosition, Stem};

/// 판정 조건 마커. Stable tokens recorded in `conditions_met` /
/// `conditions_failed` so downstream consumers can filter without parsing
/// reasoning text.
pub mod condition_markers {
    /// 일간불합 보호가 발동함
    pub const DAY_MASTER_PROTECTION: &str = "일간불합";
    /// 두 천간이 인접한 기둥에 있음
    pub const ADJACENCY: &str = "인접";
    /// 월지가 화기 오행을 지원함
    pub const SEASONAL_SUPPORT: &str = "월령";
    /// 화기 오행을 극하는 외부 천간이 없음
    pub const NO_OPPOSITION: &str = "무극";
}

/// 합의 상태: 불성립, 합거, 합화.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CombinationState {
    /// 불성립
    NotEstablished,
    /// 합거: 묶이기만 하고 화하지 못함
    Bound,
    /// 합화: 새 오행으로 화함
    Transformed,
}

/// One evaluated stem pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CombinationEvaluation {
    pub stem1: Stem,
    pub stem2: Stem,
    pub position1: PillarPosition,
    pub position2: PillarPosition,
    pub result_element: Element,
    pub state: CombinationState,
    pub confidence: f64,
    pub conditions_met: Vec<String>,
    pub conditions_failed: Vec<String>,
    pub reasoning: String,
    /// True only when the day-master protection gate fired.
    pub day_master_involved: bool,
}

impl CombinationEvaluation {
    /// True when `stem` at `position` is one of this pair's members.
    pub fn involves(&self, stem: Stem, position: PillarPosition) -> bool {
        (self.stem1 == stem && self.position1 == position)
            || (self.stem2 == stem && self.position2 == position)
    }
}

/// 천간합 평가 엔진.
#[derive(Debug)]
pub struct CombinationEvaluator;

impl CombinationEvaluator {
    /// Evaluate every combination-table pair present among the four stems.
    /// A stem used twice yields one evaluation per eligible counterpart
    /// occurrence; a chart with no pair members yields an empty list.
    pub fn evaluate(
        pillars: &FourPillars,
        strictness: HapHwaStrictness,
        protect_day_master: bool,
    ) -> Vec<CombinationEvaluation> {
        let mut evaluations = Vec::new();

        for (i, pos1) in PillarPosition::ALL.iter().enumerate() {
            for pos2 in PillarPosition::ALL.iter().skip(i + 1) {
                let stem1 = pillars.pillar(*pos1).stem;
                let stem2 = pillars.pillar(*pos2).stem;
                if let Some(combo) = combination_for(stem1, stem2) {
                    evaluations.push(Self::evaluate_pair(
                        pillars,
                        strictness,
                        protect_day_master,
                        stem1,
                        stem2,
                        *pos1,
                        *pos2,
                        combo.result_element,
                        combo.name,
                    ));
                }
            }
        }

        evaluations
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate_pair(
        pillars: &FourPillars,
        strictness: HapHwaStrictness,
        protect_day_master: bool,
        stem1: Stem,
        stem2: Stem,
        position1: PillarPosition,
        position2: PillarPosition,
        result_element: Element,
        combo_name: &str,
    ) -> CombinationEvaluation {
        let mut conditions_met = Vec::new();
        let mut conditions_failed = Vec::new();

        // 1. 일간 보호: 일간은 어떤 합에도 응하지 않는다는 교의
        if protect_day_master
            && (position1 == PillarPosition::Day || position2 == PillarPosition::Day)
        {
            conditions_failed.push(condition_markers::DAY_MASTER_PROTECTION.to_string());
            return CombinationEvaluation {
                stem1,
                stem2,
                position1,
                position2,
                result_element,
                state: CombinationState::NotEstablished,
                confidence: 1.0,
                conditions_met,
                conditions_failed,
                reasoning: format!(
                    "{}: 일간불합 원칙에 따라 일간이 관여한 합은 성립하지 않는다",
                    combo_name
                ),
                day_master_involved: true,
            };
        }

        // 2. 인접성
        if !position1.is_adjacent_to(position2) {
            conditions_failed.push(condition_markers::ADJACENCY.to_string());
            return CombinationEvaluation {
                stem1,
                stem2,
                position1,
                position2,
                result_element,
                state: CombinationState::NotEstablished,
                confidence: 1.0,
                conditions_met,
                conditions_failed,
                reasoning: format!(
                    "{}: {}와 {}는 인접하지 않아 합이 성립하지 않는다",
                    combo_name,
                    position1.korean_name(),
                    position2.korean_name()
                ),
                day_master_involved: false,
            };
        }
        conditions_met.push(condition_markers::ADJACENCY.to_string());

        // 3. 월령 지원
        let seasonal = supports_transformation(pillars.month_branch(), result_element);
        if seasonal {
            conditions_met.push(condition_markers::SEASONAL_SUPPORT.to_string());
        } else {
            conditions_failed.push(condition_markers::SEASONAL_SUPPORT.to_string());
        }

        // 4. 무극: 합 당사자가 아닌 천간 중 화기 오행을 극하는 것이 없어야 한다
        let opposition_free = !Self::has_opposition(pillars, position1, position2, result_element);
        if opposition_free {
            conditions_met.push(condition_markers::NO_OPPOSITION.to_string());
        } else {
            conditions_failed.push(condition_markers::NO_OPPOSITION.to_string());
        }

        // 5. 엄격도별 승급 판정
        let transformed = match strictness {
            HapHwaStrictness::Strict => seasonal && opposition_free,
            HapHwaStrictness::Moderate => seasonal || opposition_free,
            HapHwaStrictness::Lenient => true,
        };

        if transformed {
            let (base, ceiling) = match strictness {
                HapHwaStrictness::Strict => (0.70, 0.95),
                HapHwaStrictness::Moderate => (0.65, 0.90),
                HapHwaStrictness::Lenient => (0.55, 0.85),
            };
            let bonus = Self::presence_bonus(pillars, result_element);
            let confidence = (base + bonus).min(ceiling);
            CombinationEvaluation {
                stem1,
                stem2,
                position1,
                position2,
                result_element,
                state: CombinationState::Transformed,
                confidence,
                conditions_met,
                conditions_failed,
                reasoning: format!(
                    "{}: 합화 성립, {} 기운으로 화한다",
                    combo_name,
                    result_element.korean_name()
                ),
                day_master_involved: false,
            }
        } else {
            // 합거 신뢰도는 고정값: 월령 실패 0.50, 월령은 얻었으나 극이 있으면 0.60
            let confidence = if !seasonal { 0.50 } else { 0.60 };
            CombinationEvaluation {
                stem1,
                stem2,
                position1,
                position2,
                result_element,
                state: CombinationState::Bound,
                confidence,
                conditions_met,
                conditions_failed,
                reasoning: format!(
                    "{}: 합거, 두 천간이 묶여 본래 역할을 잃지만 {}로 화하지는 못한다",
                    combo_name,
                    result_element.korean_name()
                ),
                day_master_involved: false,
            }
        }
    }

    /// True when a stem outside the pair controls the result element.
    fn has_opposition(
        pillars: &FourPillars,
        position1: PillarPosition,
        position2: PillarPosition,
        result_element: Element,
    ) -> bool {
        PillarPosition::ALL
            .iter()
            .filter(|pos| **pos != position1 && **pos != position2)
            .any(|pos| pillars.pillar(*pos).stem.element().controls() == result_element)
    }

    /// 지장간 통근 보너스: how strongly the result element is rooted in the
    /// four branches, by 월률분야 day weight. Linear with saturation at 60
    /// days (half of a chart's 120-day total), capped at +0.15.
    fn presence_bonus(pillars: &FourPillars, result_element: Element) -> f64 {
        let matching_days = pillars.hidden_element_days(result_element);
        (0.15 * matching_days / 60.0).min(0.15)
    }
}

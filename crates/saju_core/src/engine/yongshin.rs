//! 용신 결정기.
//!
//! 억부/조후/병약/통관/종격 순응의 다섯 전략이 각자 추천을 내고, 고정
//! 우선순위(화격 > 종격 > 병약 > 억부)로 최종 오행을 고른다. 조후와 통관은
//! 보조 추천으로 합의율 계산에만 참여한다. 화격이면 합화 오행이 강제된다.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::combination::{CombinationEvaluation, CombinationState};
use crate::engine::config::{CalculationConfig, YongshinMode};
use crate::engine::pattern::{GyeokgukCategory, GyeokgukType, PatternResult};
use crate::models::{Branch, Element, FourPillars, TenGodGroup};

/// 용신 선택 전략.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum YongshinStrategy {
    /// 억부: 약하면 돕고 강하면 덜어낸다
    Eokbu,
    /// 조후: 계절 한난조습을 고른다
    Johu,
    /// 병약: 과다한 오행을 극하는 약을 쓴다
    Byeongyak,
    /// 통관: 맞선 두 세력을 잇는 오행을 쓴다
    Tongwan,
    /// 종격 순응: 지배 세력을 따르거나 거스른다
    Jonggyeok,
    /// 화격: 합화 오행을 그대로 쓴다
    Hwagyeok,
}

impl YongshinStrategy {
    pub fn korean_name(&self) -> &'static str {
        match self {
            YongshinStrategy::Eokbu => "억부용신",
            YongshinStrategy::Johu => "조후용신",
            YongshinStrategy::Byeongyak => "병약용신",
            YongshinStrategy::Tongwan => "통관용신",
            YongshinStrategy::Jonggyeok => "종격용신",
            YongshinStrategy::Hwagyeok => "화격용신",
        }
    }
}

/// 한 전략의 추천.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct YongshinRecommendation {
    pub strategy: YongshinStrategy,
    pub primary_element: Element,
    pub secondary_element: Option<Element>,
    pub confidence: f64,
    pub reasoning: String,
}

/// 최종 용신 결정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElementResult {
    pub final_element: Element,
    pub final_confidence: f64,
    /// 채택되지 않은 전략들의 1순위 오행 (중복 제거)
    pub secondary_elements: Vec<Element>,
    /// 최종 오행에 동의한 추천 비율
    pub agreement: f64,
    pub recommendations: Vec<YongshinRecommendation>,
}

/// 전략별 신뢰도 정책 범위.
const CONFIDENCE_FLOOR: f64 = 0.75;
const CONFIDENCE_CAP: f64 = 0.95;

/// 용신 결정 엔진.
#[derive(Debug)]
pub struct YongshinDecider;

impl YongshinDecider {
    pub fn decide(
        pillars: &FourPillars,
        is_strong: bool,
        day_master_element: Element,
        config: &CalculationConfig,
        pattern: &PatternResult,
        evaluations: Option<&[CombinationEvaluation]>,
    ) -> ElementResult {
        let mut recommendations = Vec::new();

        // 화격: 합화 오행 강제
        let hwagyeok = Self::hwagyeok_recommendation(pattern, evaluations);
        if let Some(rec) = hwagyeok.clone() {
            recommendations.push(rec);
        }

        // 종격: 지배 세력을 따르거나 거스른다
        let jonggyeok = Self::jonggyeok_recommendation(pillars, day_master_element, config, pattern);
        if let Some(rec) = jonggyeok.clone() {
            recommendations.push(rec);
        }

        // 병약: 과다 오행 교정
        let byeongyak = Self::byeongyak_recommendation(pillars);
        if let Some(rec) = byeongyak.clone() {
            recommendations.push(rec);
        }

        // 억부: 항상 낸다
        let eokbu = Self::eokbu_recommendation(is_strong, day_master_element);
        recommendations.push(eokbu.clone());

        // 조후: 항상 낸다
        recommendations.push(Self::johu_recommendation(pillars.month_branch()));

        // 통관: 프로파일이 균형일 때의 중재 보조
        if let Some(rec) = Self::tongwan_recommendation(pillars) {
            recommendations.push(rec);
        }

        // 고정 우선순위로 최종 선택
        let chosen = hwagyeok
            .or(jonggyeok)
            .or(byeongyak)
            .unwrap_or(eokbu);

        let agreeing = recommendations
            .iter()
            .filter(|r| r.primary_element == chosen.primary_element)
            .count();
        let agreement = agreeing as f64 / recommendations.len() as f64;

        // 화격은 합화 신뢰도를 그대로 추적하고, 그 외에는 합의 보너스를 준다
        let final_confidence = if chosen.strategy == YongshinStrategy::Hwagyeok {
            chosen.confidence
        } else {
            (chosen.confidence + 0.05 * (agreeing.saturating_sub(1)) as f64).min(CONFIDENCE_CAP)
        };

        let mut secondary_elements = Vec::new();
        for rec in &recommendations {
            if rec.primary_element != chosen.primary_element
                && !secondary_elements.contains(&rec.primary_element)
            {
                secondary_elements.push(rec.primary_element);
            }
        }

        ElementResult {
            final_element: chosen.primary_element,
            final_confidence,
            secondary_elements,
            agreement,
            recommendations,
        }
    }

    fn hwagyeok_recommendation(
        pattern: &PatternResult,
        evaluations: Option<&[CombinationEvaluation]>,
    ) -> Option<YongshinRecommendation> {
        if pattern.category != GyeokgukCategory::Hwagyeok {
            return None;
        }
        let GyeokgukType::Hwagyeok(element) = pattern.gyeokguk else {
            return None;
        };
        // 합화 평가의 신뢰도를 정책 범위로 클램프해 단조 추적한다
        let source_confidence = evaluations
            .and_then(|evals| {
                evals
                    .iter()
                    .find(|e| {
                        e.state == CombinationState::Transformed && e.result_element == element
                    })
                    .map(|e| e.confidence)
            })
            .unwrap_or(pattern.confidence);
        Some(YongshinRecommendation {
            strategy: YongshinStrategy::Hwagyeok,
            primary_element: element,
            secondary_element: Some(element.generated_by()),
            confidence: source_confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CAP),
            reasoning: format!(
                "화격이므로 합화한 {} 기운을 거스르지 않고 그대로 쓴다",
                element.korean_name()
            ),
        })
    }

    fn jonggyeok_recommendation(
        pillars: &FourPillars,
        day_master_element: Element,
        config: &CalculationConfig,
        pattern: &PatternResult,
    ) -> Option<YongshinRecommendation> {
        if pattern.category != GyeokgukCategory::Jonggyeok {
            return None;
        }
        let dominant_group = match pattern.gyeokguk {
            GyeokgukType::Jonggang => TenGodGroup::Bigyeop,
            GyeokgukType::Jonga => TenGodGroup::Siksang,
            GyeokgukType::Jongjae => TenGodGroup::Jaeseong,
            GyeokgukType::Jongsal => TenGodGroup::Gwanseong,
            GyeokgukType::Jongse => Self::dominant_opposing_group(pillars, day_master_element),
            _ => return None,
        };
        let dominant = dominant_group.element_for(day_master_element);
        let (primary, reasoning) = match config.jonggyeok_yongshin_mode {
            YongshinMode::FollowDominant => (
                dominant,
                format!(
                    "종격은 지배 세력 {}({})을 따른다",
                    dominant_group.korean_name(),
                    dominant.korean_name()
                ),
            ),
            YongshinMode::CounterDominant => (
                dominant.controlled_by(),
                format!(
                    "역행 방침에 따라 지배 세력 {}을 극하는 {}를 쓴다",
                    dominant.korean_name(),
                    dominant.controlled_by().korean_name()
                ),
            ),
        };
        Some(YongshinRecommendation {
            strategy: YongshinStrategy::Jonggyeok,
            primary_element: primary,
            secondary_element: Some(primary.generated_by()),
            confidence: 0.85,
            reasoning,
        })
    }

    /// 종세격의 지배 세력: 식상/재성/관성 중 8칸 점유가 가장 큰 것.
    fn dominant_opposing_group(pillars: &FourPillars, dm_element: Element) -> TenGodGroup {
        let counts = pillars.element_counts();
        let occupancy =
            |group: TenGodGroup| counts[group.element_for(dm_element).index()] as usize;
        let mut best = TenGodGroup::Siksang;
        for group in [TenGodGroup::Jaeseong, TenGodGroup::Gwanseong] {
            if occupancy(group) > occupancy(best) {
                best = group;
            }
        }
        best
    }

    fn byeongyak_recommendation(pillars: &FourPillars) -> Option<YongshinRecommendation> {
        let counts = pillars.element_counts();
        let (index, count) = counts
            .iter()
            .enumerate()
            .max_by_key(|(_, c)| **c)
            .expect("five element buckets");
        // 8칸 중 5칸 이상이면 병으로 본다
        if *count < 5 {
            return None;
        }
        let sick = Element::ALL[index];
        let medicine = sick.controlled_by();
        Some(YongshinRecommendation {
            strategy: YongshinStrategy::Byeongyak,
            primary_element: medicine,
            secondary_element: None,
            confidence: 0.80,
            reasoning: format!(
                "{}이 {}칸으로 과다하니 이를 극하는 {}를 약으로 쓴다",
                sick.korean_name(),
                count,
                medicine.korean_name()
            ),
        })
    }

    fn eokbu_recommendation(is_strong: bool, dm_element: Element) -> YongshinRecommendation {
        if is_strong {
            let primary = dm_element.generates();
            YongshinRecommendation {
                strategy: YongshinStrategy::Eokbu,
                primary_element: primary,
                secondary_element: Some(dm_element.controls()),
                confidence: 0.75,
                reasoning: format!(
                    "신강하므로 기운을 덜어내는 식상 {}를 먼저 쓰고 재성 {}로 받친다",
                    primary.korean_name(),
                    dm_element.controls().korean_name()
                ),
            }
        } else {
            let primary = dm_element.generated_by();
            YongshinRecommendation {
                strategy: YongshinStrategy::Eokbu,
                primary_element: primary,
                secondary_element: Some(dm_element),
                confidence: 0.75,
                reasoning: format!(
                    "신약하므로 일간을 생하는 인성 {}를 먼저 쓰고 비겁 {}로 받친다",
                    primary.korean_name(),
                    dm_element.korean_name()
                ),
            }
        }
    }

    /// 계절 조후: 겨울과 가을은 불을, 여름은 물을 먼저 찾는다.
    fn johu_recommendation(month_branch: Branch) -> YongshinRecommendation {
        let (primary, confidence, season) = match month_branch {
            Branch::Hae | Branch::Ja | Branch::Chuk => (Element::Fire, 0.80, "겨울"),
            Branch::Sa | Branch::O | Branch::Mi => (Element::Water, 0.80, "여름"),
            Branch::Sin | Branch::Yu | Branch::Sul => (Element::Fire, 0.70, "가을"),
            Branch::In | Branch::Myo | Branch::Jin => (Element::Fire, 0.65, "봄"),
        };
        YongshinRecommendation {
            strategy: YongshinStrategy::Johu,
            primary_element: primary,
            secondary_element: None,
            confidence,
            reasoning: format!(
                "{}월({}) 조후상 {} 기운이 먼저 필요하다",
                month_branch.korean_name(),
                season,
                primary.korean_name()
            ),
        }
    }

    /// 통관: 극 관계로 맞선 두 세력이 각각 3칸 이상이면 그 사이를 잇는
    /// 오행을 보조 추천한다.
    fn tongwan_recommendation(pillars: &FourPillars) -> Option<YongshinRecommendation> {
        let counts = pillars.element_counts();
        for attacker in Element::ALL {
            let target = attacker.controls();
            if counts[attacker.index()] >= 3 && counts[target.index()] >= 3 {
                let mediator = attacker.generates();
                return Some(YongshinRecommendation {
                    strategy: YongshinStrategy::Tongwan,
                    primary_element: mediator,
                    secondary_element: None,
                    confidence: 0.70,
                    reasoning: format!(
                        "{}와 {}가 맞서니 둘을 통관하는 {}를 쓴다",
                        attacker.korean_name(),
                        target.korean_name(),
                        mediator.korean_name()
                    ),
                });
            }
        }
        None
    }
}

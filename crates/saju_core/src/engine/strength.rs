//! 일간 강약 분석기.
//!
//! Three independent sub-scores over a fixed 100-point budget:
//! 득령 (월령 지원, max 30) + 득지 (지장간 통근, max 40) + 득세 (천간 세력,
//! max 30). 합거/합화 평가는 득세 집계 시점에 순수 변환으로 반영되며 원본
//! 차트는 절대 바뀌지 않는다.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::combination::{CombinationEvaluation, CombinationState};
use crate::engine::config::{CalculationConfig, DeukjiScope};
use crate::models::{Branch, Element, FourPillars, PillarPosition, Polarity, Stem, TenGod};

const DEUKRYEONG_FULL: f64 = 30.0;
const DEUKRYEONG_PARTIAL: f64 = 20.0;
const DEUKJI_PER_BRANCH: f64 = 10.0;
const DEUKSE_PER_STEM: f64 = 10.0;
const TOTAL_BUDGET: f64 = 100.0;

/// 강약 세부 점수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrengthScore {
    pub deukryeong: f64,
    pub deukji: f64,
    pub deukse: f64,
    pub total_support: f64,
    pub total_oppose: f64,
}

/// 강약 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StrengthLevel {
    ExtremeStrong, // 태강
    Strong,        // 신강
    Balanced,      // 중화
    Weak,          // 신약
    ExtremeWeak,   // 태약
}

impl StrengthLevel {
    fn from_support(total_support: f64) -> Self {
        if total_support >= 80.0 {
            StrengthLevel::ExtremeStrong
        } else if total_support >= 60.0 {
            StrengthLevel::Strong
        } else if total_support >= 40.0 {
            StrengthLevel::Balanced
        } else if total_support >= 20.0 {
            StrengthLevel::Weak
        } else {
            StrengthLevel::ExtremeWeak
        }
    }

    pub fn korean_name(&self) -> &'static str {
        match self {
            StrengthLevel::ExtremeStrong => "태강",
            StrengthLevel::Strong => "신강",
            StrengthLevel::Balanced => "중화",
            StrengthLevel::Weak => "신약",
            StrengthLevel::ExtremeWeak => "태약",
        }
    }
}

/// 강약 판정 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrengthResult {
    pub day_master: Stem,
    pub score: StrengthScore,
    pub level: StrengthLevel,
    pub is_strong: bool,
    /// Ordered diagnostics, one line per scoring step.
    pub details: Vec<String>,
}

/// A stem's effective identity at tally time, after 합거/합화 transforms.
enum EffectiveStem {
    /// 합거: 천간이 묶여 세력 집계에서 빠진다
    Removed,
    /// 그대로, 또는 합화로 오행이 바뀐 상태
    Present { element: Element, polarity: Polarity },
}

/// 일간 강약 분석 엔진.
#[derive(Debug)]
pub struct StrengthAnalyzer;

impl StrengthAnalyzer {
    /// Analyze without season-boundary refinement or combination cascade.
    pub fn analyze(pillars: &FourPillars, config: &CalculationConfig) -> StrengthResult {
        Self::analyze_with(pillars, config, None, None)
    }

    /// Full analysis. `days_since_season_boundary` refines which hidden stem
    /// commands the month; `evaluations` folds 합거/합화 effects into 득세.
    /// `NotEstablished` entries and an absent list are no-ops.
    pub fn analyze_with(
        pillars: &FourPillars,
        config: &CalculationConfig,
        days_since_season_boundary: Option<f64>,
        evaluations: Option<&[CombinationEvaluation]>,
    ) -> StrengthResult {
        let day_master = pillars.day_master();
        let dm_element = day_master.element();
        let mut details = Vec::new();

        // 득령
        let commanding =
            Self::commanding_stem(pillars.month_branch(), days_since_season_boundary);
        let deukryeong = if commanding.element() == dm_element {
            DEUKRYEONG_FULL
        } else if commanding.element().generates() == dm_element {
            DEUKRYEONG_PARTIAL
        } else {
            0.0
        };
        details.push(format!(
            "득령: 월지 {} 당령 {}{} 일간 {} (+{:.1})",
            pillars.month_branch().korean_name(),
            commanding.korean_name(),
            if deukryeong > 0.0 { "이 돕는" } else { "과 무관한" },
            day_master.korean_name(),
            deukryeong
        ));

        // 득지
        let mut deukji = 0.0;
        for position in PillarPosition::ALL {
            if config.deukji_scope == DeukjiScope::ExcludeMonth
                && position == PillarPosition::Month
            {
                continue;
            }
            let branch = pillars.pillar(position).branch;
            let supportive_days: f64 = branch
                .hidden_stems()
                .iter()
                .filter(|h| {
                    h.stem.element() == dm_element || h.stem.element().generates() == dm_element
                })
                .map(|h| h.days)
                .sum();
            let branch_score = DEUKJI_PER_BRANCH * supportive_days / 30.0;
            deukji += branch_score;
            details.push(format!(
                "득지: {} {} 지장간 통근 {:.1}/30일 (+{:.1})",
                position.korean_name(),
                branch.korean_name(),
                supportive_days,
                branch_score
            ));
        }

        // 득세
        let mut deukse = 0.0;
        for position in [PillarPosition::Year, PillarPosition::Month, PillarPosition::Hour] {
            let stem = pillars.pillar(position).stem;
            match Self::effective_stem(stem, position, evaluations) {
                EffectiveStem::Removed => {
                    details.push(format!(
                        "득세: {} {}는 합거로 묶여 세력에서 제외",
                        position.korean_name(),
                        stem.korean_name()
                    ));
                }
                EffectiveStem::Present { element, polarity } => {
                    let ten_god = TenGod::of_element(day_master, element, polarity);
                    let supports = ten_god.group().supports_day_master();
                    if supports {
                        deukse += DEUKSE_PER_STEM;
                    }
                    details.push(format!(
                        "득세: {} {}{} {}({}) (+{:.1})",
                        position.korean_name(),
                        stem.korean_name(),
                        if element != stem.element() {
                            format!(" [합화 {}]", element.korean_name())
                        } else {
                            String::new()
                        },
                        ten_god.korean_name(),
                        ten_god.group().korean_name(),
                        if supports { DEUKSE_PER_STEM } else { 0.0 }
                    ));
                }
            }
        }

        let total_support = deukryeong + deukji + deukse;
        let total_oppose = TOTAL_BUDGET - total_support;
        let level = StrengthLevel::from_support(total_support);
        let is_strong = total_support >= config.strength_threshold;
        details.push(format!(
            "합계: 득령 {:.1} + 득지 {:.1} + 득세 {:.1} = {:.1}, 판정 {}",
            deukryeong,
            deukji,
            deukse,
            total_support,
            level.korean_name()
        ));

        StrengthResult {
            day_master,
            score: StrengthScore { deukryeong, deukji, deukse, total_support, total_oppose },
            level,
            is_strong,
            details,
        }
    }

    /// 월률분야 당령: walk the day windows when a boundary offset is given,
    /// otherwise the 정기 commands.
    fn commanding_stem(branch: Branch, days_since_season_boundary: Option<f64>) -> Stem {
        match days_since_season_boundary {
            None => branch.commanding_stem(),
            Some(days) => {
                let mut acc = 0.0;
                for hidden in branch.hidden_stems() {
                    acc += hidden.days;
                    if days < acc {
                        return hidden.stem;
                    }
                }
                branch.commanding_stem()
            }
        }
    }

    /// Pure transform of a visible stem through the combination cascade.
    fn effective_stem(
        stem: Stem,
        position: PillarPosition,
        evaluations: Option<&[CombinationEvaluation]>,
    ) -> EffectiveStem {
        if let Some(evals) = evaluations {
            for eval in evals {
                if !eval.involves(stem, position) {
                    continue;
                }
                match eval.state {
                    CombinationState::Bound => return EffectiveStem::Removed,
                    CombinationState::Transformed => {
                        return EffectiveStem::Present {
                            element: eval.result_element,
                            polarity: stem.polarity(),
                        }
                    }
                    CombinationState::NotEstablished => {}
                }
            }
        }
        EffectiveStem::Present { element: stem.element(), polarity: stem.polarity() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pillar;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// 갑목 일간, 수목 일색의 신강한 차트
    fn strong_wood_chart() -> FourPillars {
        FourPillars::new(
            Pillar::new(Stem::Im, Branch::Ja),
            Pillar::new(Stem::Gye, Branch::Hae),
            Pillar::new(Stem::Gap, Branch::In),
            Pillar::new(Stem::Gap, Branch::Myo),
        )
    }

    fn eval_for(
        stem: Stem,
        position: PillarPosition,
        state: CombinationState,
        result_element: Element,
    ) -> CombinationEvaluation {
        CombinationEvaluation {
            stem1: stem,
            stem2: Stem::Gi,
            position1: position,
            position2: PillarPosition::Year,
            result_element,
            state,
            confidence: 0.8,
            conditions_met: Vec::new(),
            conditions_failed: Vec::new(),
            reasoning: "테스트".to_string(),
            day_master_involved: false,
        }
    }

    #[test]
    fn test_total_support_is_sum_of_parts() {
        let result = StrengthAnalyzer::analyze(&strong_wood_chart(), &Default::default());
        let s = &result.score;
        assert!(approx(s.total_support, s.deukryeong + s.deukji + s.deukse));
        assert!(approx(s.total_oppose, 100.0 - s.total_support));
    }

    #[test]
    fn test_strong_wood_chart_breakdown() {
        let result = StrengthAnalyzer::analyze(&strong_wood_chart(), &Default::default());
        // 해월 정기 임수가 갑목을 생하므로 득령 20
        assert!(approx(result.score.deukryeong, 20.0));
        // 자(30/30) + 해(23/30) + 인(16/30) + 묘(30/30), 각 10점 만점
        assert!(approx(result.score.deukji, 10.0 + 230.0 / 30.0 + 160.0 / 30.0 + 10.0));
        // 임/계(인성), 갑(비견) 모두 지원
        assert!(approx(result.score.deukse, 30.0));
        assert!(result.is_strong);
        assert_eq!(result.level, StrengthLevel::ExtremeStrong);
        assert!(!result.details.is_empty());
    }

    #[test]
    fn test_absent_and_empty_evaluation_lists_are_identical() {
        let pillars = strong_wood_chart();
        let config = Default::default();
        let bare = StrengthAnalyzer::analyze_with(&pillars, &config, None, None);
        let empty = StrengthAnalyzer::analyze_with(&pillars, &config, None, Some(&[]));
        assert_eq!(bare, empty);

        // 불성립 평가도 결과를 바꾸지 않는다
        let noop = vec![eval_for(
            Stem::Gap,
            PillarPosition::Hour,
            CombinationState::NotEstablished,
            Element::Earth,
        )];
        let with_noop = StrengthAnalyzer::analyze_with(&pillars, &config, None, Some(&noop));
        assert_eq!(bare, with_noop);
    }

    #[test]
    fn test_bound_evaluation_removes_stem_support() {
        let pillars = strong_wood_chart();
        let config = Default::default();
        let baseline = StrengthAnalyzer::analyze(&pillars, &config);

        let bound = vec![eval_for(
            Stem::Gap,
            PillarPosition::Hour,
            CombinationState::Bound,
            Element::Earth,
        )];
        let adjusted = StrengthAnalyzer::analyze_with(&pillars, &config, None, Some(&bound));
        // 시간 갑목(비견)의 지지 10점이 사라진다
        assert!(approx(
            adjusted.score.total_support,
            baseline.score.total_support - DEUKSE_PER_STEM
        ));
    }

    #[test]
    fn test_transformed_evaluation_flips_role() {
        let pillars = strong_wood_chart();
        let config = Default::default();
        let baseline = StrengthAnalyzer::analyze(&pillars, &config);

        // 시간 갑목이 토로 화하면 비견이 재성으로 바뀌어 지원을 잃는다
        let transformed = vec![eval_for(
            Stem::Gap,
            PillarPosition::Hour,
            CombinationState::Transformed,
            Element::Earth,
        )];
        let adjusted =
            StrengthAnalyzer::analyze_with(&pillars, &config, None, Some(&transformed));
        assert!(approx(
            adjusted.score.total_support,
            baseline.score.total_support - DEUKSE_PER_STEM
        ));

        // 반대로 수로 화하면 인성이 되어 지원은 그대로다
        let to_water = vec![eval_for(
            Stem::Gap,
            PillarPosition::Hour,
            CombinationState::Transformed,
            Element::Water,
        )];
        let adjusted = StrengthAnalyzer::analyze_with(&pillars, &config, None, Some(&to_water));
        assert!(approx(adjusted.score.total_support, baseline.score.total_support));
    }

    #[test]
    fn test_season_boundary_selects_early_hidden_stem() {
        // 인월 초기 7일 이내면 여기 무토가 당령한다
        let pillars = FourPillars::new(
            Pillar::new(Stem::Im, Branch::Ja),
            Pillar::new(Stem::Gye, Branch::In),
            Pillar::new(Stem::Gap, Branch::In),
            Pillar::new(Stem::Gap, Branch::Myo),
        );
        let config = Default::default();
        let early = StrengthAnalyzer::analyze_with(&pillars, &config, Some(3.0), None);
        // 무토는 갑목을 돕지 않는다 → 득령 0
        assert!(approx(early.score.deukryeong, 0.0));

        let late = StrengthAnalyzer::analyze_with(&pillars, &config, Some(20.0), None);
        // 정기 갑목 당령 → 득령 30
        assert!(approx(late.score.deukryeong, 30.0));
    }

    #[test]
    fn test_deukji_scope_exclude_month() {
        let pillars = strong_wood_chart();
        let all = StrengthAnalyzer::analyze(&pillars, &Default::default());
        let config = CalculationConfig {
            deukji_scope: DeukjiScope::ExcludeMonth,
            ..Default::default()
        };
        let excluded = StrengthAnalyzer::analyze(&pillars, &config);
        // 해월 기여분 23/30 x 10 이 빠진다
        assert!(approx(excluded.score.deukji, all.score.deukji - 230.0 / 30.0));
    }

    #[test]
    fn test_weak_chart_is_not_strong() {
        // 갑목 일간이 화토금 일색에 파묻힌 차트
        let pillars = FourPillars::new(
            Pillar::new(Stem::Byeong, Branch::O),
            Pillar::new(Stem::Mu, Branch::Sul),
            Pillar::new(Stem::Gap, Branch::Sin),
            Pillar::new(Stem::Gyeong, Branch::Yu),
        );
        let result = StrengthAnalyzer::analyze(&pillars, &Default::default());
        assert!(!result.is_strong);
        assert!(result.score.total_support < 20.0);
        assert_eq!(result.level, StrengthLevel::ExtremeWeak);
    }

    #[test]
    fn test_is_strong_respects_threshold() {
        let pillars = strong_wood_chart();
        let config = CalculationConfig { strength_threshold: 95.0, ..Default::default() };
        let result = StrengthAnalyzer::analyze(&pillars, &config);
        assert!(!result.is_strong);
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_stem() -> impl Strategy<Value = Stem> {
            prop::sample::select(Stem::ALL.to_vec())
        }

        fn any_branch() -> impl Strategy<Value = Branch> {
            prop::sample::select(Branch::ALL.to_vec())
        }

        proptest! {
            /// Property: an empty evaluation list equals no list, for any chart
            #[test]
            fn prop_empty_evaluations_are_noop(
                s in prop::collection::vec(any_stem(), 4),
                b in prop::collection::vec(any_branch(), 4)
            ) {
                let pillars = FourPillars::new(
                    Pillar::new(s[0], b[0]),
                    Pillar::new(s[1], b[1]),
                    Pillar::new(s[2], b[2]),
                    Pillar::new(s[3], b[3]),
                );
                let config = CalculationConfig::default();
                let bare = StrengthAnalyzer::analyze_with(&pillars, &config, None, None);
                let empty = StrengthAnalyzer::analyze_with(&pillars, &config, None, Some(&[]));
                prop_assert_eq!(bare, empty);
            }

            /// Property: the 100-point budget invariant holds for any chart
            #[test]
            fn prop_support_plus_oppose_is_hundred(
                s in prop::collection::vec(any_stem(), 4),
                b in prop::collection::vec(any_branch(), 4)
            ) {
                let pillars = FourPillars::new(
                    Pillar::new(s[0], b[0]),
                    Pillar::new(s[1], b[1]),
                    Pillar::new(s[2], b[2]),
                    Pillar::new(s[3], b[3]),
                );
                let result = StrengthAnalyzer::analyze(&pillars, &CalculationConfig::default());
                let score = &result.score;
                prop_assert!((score.total_support + score.total_oppose - 100.0).abs() < 1e-9);
                prop_assert!(
                    (score.total_support - (score.deukryeong + score.deukji + score.deukse)).abs()
                        < 1e-9
                );
            }
        }
    }
}

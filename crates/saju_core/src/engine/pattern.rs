//! 격국 판정기.
//!
//! 2단계 상태기계: 1단계는 월지 당령과 투간으로 내격을 세우고, 합화 평가가
//! 정확히 하나면 화격으로 즉시 확정한다. 2단계는 강약 결과가 주어졌을 때만
//! 종격(종강/종아/종재/종살/종세) 문턱을 검사하며, 어느 조건이든 어긋나면
//! 1단계의 내격이 그대로 선다.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::data::combination_for;
use crate::engine::combination::{CombinationEvaluation, CombinationState};
use crate::engine::config::CalculationConfig;
use crate::engine::strength::StrengthResult;
use crate::models::{Element, FourPillars, PillarPosition, Stem, TenGod, TenGodGroup};

/// 격국 대분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GyeokgukCategory {
    /// 내격 (월지 중심의 일반 격)
    Naegyeok,
    /// 종격 (한 세력을 따라가는 극단 격)
    Jonggyeok,
    /// 화격 (합화가 차트를 지배하는 격)
    Hwagyeok,
}

/// 격국 세부 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GyeokgukType {
    // 내격 10유형
    Geonrok,   // 건록격 (비견)
    Yangin,    // 양인격 (겁재)
    Siksin,    // 식신격
    Sangwan,   // 상관격
    Pyeonjae,  // 편재격
    Jeongjae,  // 정재격
    Pyeongwan, // 편관격
    Jeonggwan, // 정관격
    Pyeonin,   // 편인격
    Jeongin,   // 정인격
    // 종격 5유형
    Jonggang, // 종강격
    Jonga,    // 종아격
    Jongjae,  // 종재격
    Jongsal,  // 종살격
    Jongse,   // 종세격
    // 화격 (화한 오행을 따른다)
    Hwagyeok(Element),
}

impl GyeokgukType {
    fn from_ten_god(ten_god: TenGod) -> Self {
        match ten_god {
            TenGod::Bigyeon => GyeokgukType::Geonrok,
            TenGod::Geopjae => GyeokgukType::Yangin,
            TenGod::Siksin => GyeokgukType::Siksin,
            TenGod::Sangwan => GyeokgukType::Sangwan,
            TenGod::Pyeonjae => GyeokgukType::Pyeonjae,
            TenGod::Jeongjae => GyeokgukType::Jeongjae,
            TenGod::Pyeongwan => GyeokgukType::Pyeongwan,
            TenGod::Jeonggwan => GyeokgukType::Jeonggwan,
            TenGod::Pyeonin => GyeokgukType::Pyeonin,
            TenGod::Jeongin => GyeokgukType::Jeongin,
        }
    }

    /// 한글 이름
    pub fn korean_name(&self) -> &'static str {
        match self {
            GyeokgukType::Geonrok => "건록격",
            GyeokgukType::Yangin => "양인격",
            GyeokgukType::Siksin => "식신격",
            GyeokgukType::Sangwan => "상관격",
            GyeokgukType::Pyeonjae => "편재격",
            GyeokgukType::Jeongjae => "정재격",
            GyeokgukType::Pyeongwan => "편관격",
            GyeokgukType::Jeonggwan => "정관격",
            GyeokgukType::Pyeonin => "편인격",
            GyeokgukType::Jeongin => "정인격",
            GyeokgukType::Jonggang => "종강격",
            GyeokgukType::Jonga => "종아격",
            GyeokgukType::Jongjae => "종재격",
            GyeokgukType::Jongsal => "종살격",
            GyeokgukType::Jongse => "종세격",
            GyeokgukType::Hwagyeok(element) => match element {
                Element::Wood => "화목격",
                Element::Fire => "화화격",
                Element::Earth => "화토격",
                Element::Metal => "화금격",
                Element::Water => "화수격",
            },
        }
    }
}

/// 격국 판정 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PatternResult {
    pub gyeokguk: GyeokgukType,
    pub category: GyeokgukCategory,
    pub base_ten_god: Option<TenGod>,
    pub confidence: f64,
    pub reasoning: String,
    /// 성격 근거 (예: 투간한 천간, 합화 조합)
    pub formation: Option<String>,
}

/// 7개 집계 천간의 십신 분포 (연/월/시 천간 + 네 지지 정기).
struct RoleProfile {
    bigyeop: usize,
    siksang: usize,
    jaeseong: usize,
    gwanseong: usize,
    inseong: usize,
}

impl RoleProfile {
    fn count(pillars: &FourPillars) -> Self {
        let dm_element = pillars.day_master().element();
        let mut profile =
            RoleProfile { bigyeop: 0, siksang: 0, jaeseong: 0, gwanseong: 0, inseong: 0 };

        let visible = [PillarPosition::Year, PillarPosition::Month, PillarPosition::Hour]
            .map(|pos| pillars.pillar(pos).stem);
        let commanding = pillars.branches().map(|b| b.commanding_stem());

        for stem in visible.iter().chain(commanding.iter()) {
            match TenGodGroup::of_element(dm_element, stem.element()) {
                TenGodGroup::Bigyeop => profile.bigyeop += 1,
                TenGodGroup::Siksang => profile.siksang += 1,
                TenGodGroup::Jaeseong => profile.jaeseong += 1,
                TenGodGroup::Gwanseong => profile.gwanseong += 1,
                TenGodGroup::Inseong => profile.inseong += 1,
            }
        }
        profile
    }

    fn has_self_support(&self) -> bool {
        self.bigyeop > 0 || self.inseong > 0
    }
}

/// 격국 판정 엔진.
#[derive(Debug)]
pub struct PatternDeterminer;

impl PatternDeterminer {
    /// Classify the chart. A missing strength result skips the 종격 phase.
    pub fn determine(
        pillars: &FourPillars,
        strength: Option<&StrengthResult>,
        evaluations: &[CombinationEvaluation],
        config: &CalculationConfig,
    ) -> PatternResult {
        let transformed: Vec<&CombinationEvaluation> = evaluations
            .iter()
            .filter(|e| e.state == CombinationState::Transformed)
            .collect();

        // 1단계: 합화가 정확히 하나면 화격이 모든 것에 우선한다
        if transformed.len() == 1 {
            let eval = transformed[0];
            let formation = combination_for(eval.stem1, eval.stem2).map(|c| c.name.to_string());
            return PatternResult {
                gyeokguk: GyeokgukType::Hwagyeok(eval.result_element),
                category: GyeokgukCategory::Hwagyeok,
                base_ten_god: None,
                confidence: eval.confidence,
                reasoning: format!(
                    "{}{}이 {}로 합화하여 화격이 성립한다",
                    eval.stem1.korean_name(),
                    eval.stem2.korean_name(),
                    eval.result_element.korean_name()
                ),
                formation,
            };
        }

        let naegyeok = Self::classify_naegyeok(pillars, &transformed);

        // 2단계: 강약 결과가 있을 때만 종격을 검토한다
        if let Some(strength) = strength {
            if let Some(jonggyeok) = Self::classify_jonggyeok(pillars, strength, config) {
                return jonggyeok;
            }
        }

        naegyeok
    }

    /// 월지 당령과 투간에 따른 내격 분류.
    fn classify_naegyeok(
        pillars: &FourPillars,
        transformed: &[&CombinationEvaluation],
    ) -> PatternResult {
        let day_master = pillars.day_master();
        let month_branch = pillars.month_branch();

        // 합화에 참여한 천간은 투간 후보에서 빠진다
        let consumed: Vec<Stem> =
            transformed.iter().flat_map(|e| [e.stem1, e.stem2]).collect();
        let visible = [PillarPosition::Year, PillarPosition::Month, PillarPosition::Hour]
            .map(|pos| pillars.pillar(pos).stem);

        // 정기부터 역순으로 투간을 찾는다
        let exposed = month_branch
            .hidden_stems()
            .iter()
            .rev()
            .map(|h| h.stem)
            .find(|stem| visible.contains(stem) && !consumed.contains(stem));

        let (chosen, confidence, formation) = match exposed {
            Some(stem) => (
                stem,
                0.80,
                Some(format!("월지 {} 지장간 {} 투간", month_branch.korean_name(), stem.korean_name())),
            ),
            None => (month_branch.commanding_stem(), 0.70, None),
        };

        let ten_god = TenGod::of(day_master, chosen);
        let gyeokguk = GyeokgukType::from_ten_god(ten_god);
        PatternResult {
            gyeokguk,
            category: GyeokgukCategory::Naegyeok,
            base_ten_god: Some(ten_god),
            confidence,
            reasoning: format!(
                "월지 {} 기준 {}({})로 {} 성립",
                month_branch.korean_name(),
                chosen.korean_name(),
                ten_god.korean_name(),
                gyeokguk.korean_name()
            ),
            formation,
        }
    }

    /// 종격 검토. 조건 미달이면 None을 돌려 내격이 서게 한다.
    fn classify_jonggyeok(
        pillars: &FourPillars,
        strength: &StrengthResult,
        config: &CalculationConfig,
    ) -> Option<PatternResult> {
        let support = strength.score.total_support;
        let profile = RoleProfile::count(pillars);

        // 종강: 극강 + 비겁 일색 + 재관 전무
        if support >= config.jonggyeok_strong_threshold
            && profile.bigyeop >= 4
            && profile.jaeseong + profile.gwanseong == 0
        {
            let over = support - config.jonggyeok_strong_threshold;
            let confidence = 0.85 + (over / 18.6).min(1.0) * 0.10;
            return Some(PatternResult {
                gyeokguk: GyeokgukType::Jonggang,
                category: GyeokgukCategory::Jonggyeok,
                base_ten_god: None,
                confidence,
                reasoning: format!(
                    "비겁이 {}주로 일색이고 총지지 {:.1}이 문턱 {:.1} 이상이라 종강격",
                    profile.bigyeop, support, config.jonggyeok_strong_threshold
                ),
                formation: Some("비겁 일색".to_string()),
            });
        }

        // 종약 계열: 극약 + 자기 세력 전무
        if support <= config.jonggyeok_weak_threshold && !profile.has_self_support() {
            let confidence =
                0.75 + ((config.jonggyeok_weak_threshold - support) / 15.0).min(1.0) * 0.15;
            let counts = [
                (profile.siksang, GyeokgukType::Jonga, TenGodGroup::Siksang),
                (profile.jaeseong, GyeokgukType::Jongjae, TenGodGroup::Jaeseong),
                (profile.gwanseong, GyeokgukType::Jongsal, TenGodGroup::Gwanseong),
            ];
            let max = counts.iter().map(|(c, _, _)| *c).max().unwrap_or(0);
            let at_max = counts.iter().filter(|(c, _, _)| *c == max).count();

            if max >= 3 && at_max == 1 {
                let (_, gyeokguk, group) =
                    counts.iter().find(|(c, _, _)| *c == max).expect("max exists");
                return Some(PatternResult {
                    gyeokguk: *gyeokguk,
                    category: GyeokgukCategory::Jonggyeok,
                    base_ten_god: None,
                    confidence,
                    reasoning: format!(
                        "{}이 {}주로 지배적이고 총지지 {:.1}이 문턱 {:.1} 이하라 {}",
                        group.korean_name(),
                        max,
                        support,
                        config.jonggyeok_weak_threshold,
                        gyeokguk.korean_name()
                    ),
                    formation: Some(group.korean_name().to_string()),
                });
            }

            // 동률이거나 지배 세력이 약하면 종세로 수렴한다
            let sum = profile.siksang + profile.jaeseong + profile.gwanseong;
            if sum >= 5 {
                return Some(PatternResult {
                    gyeokguk: GyeokgukType::Jongse,
                    category: GyeokgukCategory::Jonggyeok,
                    base_ten_god: None,
                    confidence,
                    reasoning: format!(
                        "식재관 합계 {}주가 차트를 덮고 총지지 {:.1}이 문턱 {:.1} 이하라 종세격",
                        sum, support, config.jonggyeok_weak_threshold
                    ),
                    formation: Some("식재관 혼성".to_string()),
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combination::CombinationEvaluator;
    use crate::engine::config::HapHwaStrictness;
    use crate::engine::strength::{StrengthLevel, StrengthScore};
    use crate::models::{Branch, Pillar};

    fn chart(stems: [Stem; 4], branches: [Branch; 4]) -> FourPillars {
        FourPillars::new(
            Pillar::new(stems[0], branches[0]),
            Pillar::new(stems[1], branches[1]),
            Pillar::new(stems[2], branches[2]),
            Pillar::new(stems[3], branches[3]),
        )
    }

    fn synthetic_strength(day_master: Stem, total_support: f64) -> StrengthResult {
        StrengthResult {
            day_master,
            score: StrengthScore {
                deukryeong: total_support * 0.3,
                deukji: total_support * 0.4,
                deukse: total_support * 0.3,
                total_support,
                total_oppose: 100.0 - total_support,
            },
            level: StrengthLevel::Balanced,
            is_strong: total_support >= 50.0,
            details: Vec::new(),
        }
    }

    #[test]
    fn test_naegyeok_from_exposed_commanding_stem() {
        // 갑목 일간, 유월 정기 신금이 월간에 투간 → 정관격
        let pillars = chart(
            [Stem::Jeong, Stem::Sin, Stem::Gap, Stem::Gyeong],
            [Branch::Sa, Branch::Yu, Branch::Ja, Branch::O],
        );
        let result = PatternDeterminer::determine(&pillars, None, &[], &Default::default());
        assert_eq!(result.gyeokguk, GyeokgukType::Jeonggwan);
        assert_eq!(result.category, GyeokgukCategory::Naegyeok);
        assert_eq!(result.base_ten_god, Some(TenGod::Jeonggwan));
        assert_eq!(result.confidence, 0.80);
        assert!(result.formation.is_some());
    }

    #[test]
    fn test_naegyeok_without_exposure_uses_commanding_stem() {
        // 아무 지장간도 투간하지 않으면 정기 기준, 신뢰도 0.70
        let pillars = chart(
            [Stem::Im, Stem::Gye, Stem::Gap, Stem::Eul],
            [Branch::Ja, Branch::Yu, Branch::In, Branch::Myo],
        );
        let result = PatternDeterminer::determine(&pillars, None, &[], &Default::default());
        assert_eq!(result.gyeokguk, GyeokgukType::Jeonggwan);
        assert_eq!(result.confidence, 0.70);
        assert!(result.formation.is_none());
    }

    #[test]
    fn test_single_transformed_forces_hwagyeok() {
        // 갑기합토가 진월에 성립하면 화토격이 즉시 선다
        let pillars = chart(
            [Stem::Gap, Stem::Gi, Stem::Byeong, Stem::Jeong],
            [Branch::Ja, Branch::Jin, Branch::O, Branch::Yu],
        );
        let evals = CombinationEvaluator::evaluate(&pillars, HapHwaStrictness::Strict, true);
        assert_eq!(evals.len(), 1);
        let strength = synthetic_strength(Stem::Byeong, 70.0);
        let result =
            PatternDeterminer::determine(&pillars, Some(&strength), &evals, &Default::default());
        assert_eq!(result.gyeokguk, GyeokgukType::Hwagyeok(Element::Earth));
        assert_eq!(result.category, GyeokgukCategory::Hwagyeok);
        // 신뢰도는 합화 평가에서 그대로 승계된다
        assert_eq!(result.confidence, evals[0].confidence);
        assert_eq!(result.formation.as_deref(), Some("갑기합토"));
    }

    #[test]
    fn test_transformed_eliminates_exposed_candidate() {
        // 미월 정기 기토가 투간했지만 합화에 소모되면 투간 후보에서 빠진다
        let pillars = chart(
            [Stem::Gap, Stem::Gi, Stem::Gap, Stem::Gi],
            [Branch::In, Branch::Mi, Branch::Ja, Branch::O],
        );
        let evals = CombinationEvaluator::evaluate(&pillars, HapHwaStrictness::Lenient, false);
        let transformed_count =
            evals.iter().filter(|e| e.state == CombinationState::Transformed).count();
        assert!(transformed_count > 1, "override must not fire in this test");

        let with_evals = PatternDeterminer::determine(&pillars, None, &evals, &Default::default());
        // 소모된 기토 대신 정기 기준으로 내려가 신뢰도가 낮아진다
        assert_eq!(with_evals.confidence, 0.70);
        assert!(with_evals.formation.is_none());

        let without = PatternDeterminer::determine(&pillars, None, &[], &Default::default());
        assert_eq!(without.confidence, 0.80);
    }

    #[test]
    fn test_jonggang_at_exact_threshold() {
        // 비겁 7주, 재관 전무, 총지지가 문턱과 정확히 같음 → 종강격 0.85
        let pillars = chart(
            [Stem::Gap, Stem::Eul, Stem::Gap, Stem::Eul],
            [Branch::In, Branch::Myo, Branch::In, Branch::Myo],
        );
        let strength = synthetic_strength(Stem::Gap, 62.4);
        let result =
            PatternDeterminer::determine(&pillars, Some(&strength), &[], &Default::default());
        assert_eq!(result.gyeokguk, GyeokgukType::Jonggang);
        assert_eq!(result.category, GyeokgukCategory::Jonggyeok);
        assert!((result.confidence - 0.85).abs() < 1e-9);
        assert!(result.reasoning.contains("62.4"));
    }

    #[test]
    fn test_jonggang_confidence_monotone_and_capped() {
        let pillars = chart(
            [Stem::Gap, Stem::Eul, Stem::Gap, Stem::Eul],
            [Branch::In, Branch::Myo, Branch::In, Branch::Myo],
        );
        let config = CalculationConfig::default();
        let mut last = 0.0;
        for support in [62.4, 70.0, 81.0, 95.0, 100.0] {
            let strength = synthetic_strength(Stem::Gap, support);
            let result =
                PatternDeterminer::determine(&pillars, Some(&strength), &[], &config);
            assert!(result.confidence >= last, "confidence must not decrease");
            assert!(result.confidence <= 0.95);
            last = result.confidence;
        }
        assert!((last - 0.95).abs() < 1e-9, "saturates at the tier cap");
    }

    #[test]
    fn test_jonga_with_dominant_output_role() {
        // 임수 일간, 식상(목) 5 > 재성(화) 2, 관성 0, 자기 세력 전무
        let pillars = chart(
            [Stem::Gap, Stem::Eul, Stem::Im, Stem::Byeong],
            [Branch::In, Branch::Myo, Branch::Myo, Branch::O],
        );
        let strength = synthetic_strength(Stem::Im, 5.0);
        let result =
            PatternDeterminer::determine(&pillars, Some(&strength), &[], &Default::default());
        assert_eq!(result.gyeokguk, GyeokgukType::Jonga);
        assert_eq!(result.category, GyeokgukCategory::Jonggyeok);
        assert!((result.confidence - 0.85).abs() < 1e-9);
        assert!(result.reasoning.contains("식상"));
        assert!(result.reasoning.contains("5.0"));
    }

    #[test]
    fn test_role_tie_falls_through_to_jongse() {
        // 임수 일간, 식상 3 = 재성 3 동률, 합계 7 ≥ 5 → 종세격
        let pillars = chart(
            [Stem::Gap, Stem::Eul, Stem::Im, Stem::Byeong],
            [Branch::In, Branch::O, Branch::Sa, Branch::Mi],
        );
        let strength = synthetic_strength(Stem::Im, 5.0);
        let result =
            PatternDeterminer::determine(&pillars, Some(&strength), &[], &Default::default());
        assert_eq!(result.gyeokguk, GyeokgukType::Jongse);
        assert!(result.reasoning.contains("종세격"));
    }

    #[test]
    fn test_self_support_blocks_jonggyeok() {
        // 비겁이 하나라도 있으면 종약은 성립하지 않는다
        let pillars = chart(
            [Stem::Im, Stem::Eul, Stem::Im, Stem::Byeong],
            [Branch::In, Branch::Myo, Branch::Myo, Branch::O],
        );
        let strength = synthetic_strength(Stem::Im, 5.0);
        let result =
            PatternDeterminer::determine(&pillars, Some(&strength), &[], &Default::default());
        assert_eq!(result.category, GyeokgukCategory::Naegyeok);
    }

    #[test]
    fn test_dead_zone_never_yields_jonggyeok() {
        // 비겁 일색이라도 총지지가 두 문턱 사이면 내격
        let pillars = chart(
            [Stem::Gap, Stem::Eul, Stem::Gap, Stem::Eul],
            [Branch::In, Branch::Myo, Branch::In, Branch::Myo],
        );
        for support in [15.1, 30.0, 50.0, 62.3] {
            let strength = synthetic_strength(Stem::Gap, support);
            let result =
                PatternDeterminer::determine(&pillars, Some(&strength), &[], &Default::default());
            assert_eq!(
                result.category,
                GyeokgukCategory::Naegyeok,
                "support {} is in the dead zone",
                support
            );
        }
    }

    #[test]
    fn test_missing_strength_skips_phase_two() {
        let pillars = chart(
            [Stem::Gap, Stem::Eul, Stem::Gap, Stem::Eul],
            [Branch::In, Branch::Myo, Branch::In, Branch::Myo],
        );
        let result = PatternDeterminer::determine(&pillars, None, &[], &Default::default());
        assert_eq!(result.category, GyeokgukCategory::Naegyeok);
    }

    #[test]
    fn test_jongyak_confidence_monotone_in_depth() {
        let pillars = chart(
            [Stem::Gap, Stem::Eul, Stem::Im, Stem::Byeong],
            [Branch::In, Branch::Myo, Branch::Myo, Branch::O],
        );
        let config = CalculationConfig::default();
        let mut last = 0.0;
        for support in [15.0, 10.0, 5.0, 0.0] {
            let strength = synthetic_strength(Stem::Im, support);
            let result = PatternDeterminer::determine(&pillars, Some(&strength), &[], &config);
            assert_eq!(result.gyeokguk, GyeokgukType::Jonga);
            assert!(result.confidence >= last);
            assert!(result.confidence <= 0.90);
            last = result.confidence;
        }
        assert!((last - 0.90).abs() < 1e-9);
    }
}

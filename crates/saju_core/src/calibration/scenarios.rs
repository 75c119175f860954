//! 기준 시나리오 데이터.
//!
//! 손으로 검증한 차트와 기대 판정을 데이터로 고정해 회귀를 잡는다. 전체
//! 분석을 돌리기엔 판정 하나하나가 묻히기 쉬우므로, 시나리오마다 검사
//! 대상을 좁혀 둔다.

use crate::engine::config::{CalculationConfig, SchoolPreset};
use crate::engine::pattern::{GyeokgukCategory, GyeokgukType};
use crate::engine::relation::{BranchRelationType, RelationOutcome};
use crate::engine::CombinationState;
use crate::models::{Branch, Element, FourPillars, Pillar, Stem};

/// 시나리오 하나가 검증하는 판정.
#[derive(Debug, Clone)]
pub enum Expectation {
    /// 첫 번째 합 평가의 상태/오행/신뢰도
    Combination {
        state: CombinationState,
        result_element: Element,
        min_confidence: Option<f64>,
        exact_confidence: Option<f64>,
    },
    /// 특정 지지 관계의 해소 결과
    Relation {
        relation: BranchRelationType,
        members: Vec<Branch>,
        outcome: RelationOutcome,
    },
    /// 합성 강약 결과를 주입했을 때의 격국 판정
    Pattern {
        total_support: f64,
        gyeokguk: GyeokgukType,
        category: GyeokgukCategory,
        approx_confidence: Option<f64>,
    },
}

/// 고정 기준 시나리오.
#[derive(Debug, Clone)]
pub struct ReferenceScenario {
    pub name: &'static str,
    pub pillars: FourPillars,
    pub config: CalculationConfig,
    pub expectations: Vec<Expectation>,
}

fn chart(stems: [Stem; 4], branches: [Branch; 4]) -> FourPillars {
    FourPillars::new(
        Pillar::new(stems[0], branches[0]),
        Pillar::new(stems[1], branches[1]),
        Pillar::new(stems[2], branches[2]),
        Pillar::new(stems[3], branches[3]),
    )
}

/// 전체 기준 시나리오 목록.
pub fn reference_scenarios() -> Vec<ReferenceScenario> {
    vec![
        ReferenceScenario {
            name: "갑기합토: 진월 합화 성립",
            pillars: chart(
                [Stem::Gap, Stem::Gi, Stem::Byeong, Stem::Jeong],
                [Branch::Ja, Branch::Jin, Branch::O, Branch::Yu],
            ),
            config: CalculationConfig::from_preset(SchoolPreset::Traditional),
            expectations: vec![Expectation::Combination {
                state: CombinationState::Transformed,
                result_element: Element::Earth,
                min_confidence: Some(0.70),
                exact_confidence: None,
            }],
        },
        ReferenceScenario {
            name: "갑기합토: 연주-시주 비인접 불성립",
            pillars: chart(
                [Stem::Gap, Stem::Byeong, Stem::Jeong, Stem::Gi],
                [Branch::Ja, Branch::Jin, Branch::O, Branch::Yu],
            ),
            config: CalculationConfig::from_preset(SchoolPreset::Traditional),
            expectations: vec![Expectation::Combination {
                state: CombinationState::NotEstablished,
                result_element: Element::Earth,
                min_confidence: None,
                exact_confidence: Some(1.0),
            }],
        },
        ReferenceScenario {
            name: "자축육합: 인접 공격지 충으로 파괴",
            pillars: chart(
                [Stem::Im, Stem::Byeong, Stem::Gap, Stem::Mu],
                [Branch::Chuk, Branch::Ja, Branch::O, Branch::Jin],
            ),
            config: CalculationConfig::default(),
            expectations: vec![Expectation::Relation {
                relation: BranchRelationType::SixHarmony,
                members: vec![Branch::Ja, Branch::Chuk],
                outcome: RelationOutcome::Broken,
            }],
        },
        ReferenceScenario {
            name: "해묘미 삼합: 완성 국은 충을 약화시킨다",
            pillars: chart(
                [Stem::Im, Stem::Gye, Stem::Byeong, Stem::Gap],
                [Branch::Hae, Branch::Myo, Branch::Mi, Branch::Yu],
            ),
            config: CalculationConfig::default(),
            expectations: vec![
                Expectation::Relation {
                    relation: BranchRelationType::ThreeHarmony,
                    members: vec![Branch::Hae, Branch::Myo, Branch::Mi],
                    outcome: RelationOutcome::Active,
                },
                Expectation::Relation {
                    relation: BranchRelationType::Clash,
                    members: vec![Branch::Myo, Branch::Yu],
                    outcome: RelationOutcome::Weakened,
                },
            ],
        },
        ReferenceScenario {
            name: "종강격: 비겁 7주, 문턱 정확 일치",
            pillars: chart(
                [Stem::Gap, Stem::Eul, Stem::Gap, Stem::Eul],
                [Branch::In, Branch::Myo, Branch::In, Branch::Myo],
            ),
            config: CalculationConfig::default(),
            expectations: vec![Expectation::Pattern {
                total_support: 62.4,
                gyeokguk: GyeokgukType::Jonggang,
                category: GyeokgukCategory::Jonggyeok,
                approx_confidence: Some(0.85),
            }],
        },
        ReferenceScenario {
            name: "종아격: 식상 5 > 재성 2, 자기 세력 전무",
            pillars: chart(
                [Stem::Gap, Stem::Eul, Stem::Im, Stem::Byeong],
                [Branch::In, Branch::Myo, Branch::Myo, Branch::O],
            ),
            config: CalculationConfig::default(),
            expectations: vec![Expectation::Pattern {
                total_support: 5.0,
                gyeokguk: GyeokgukType::Jonga,
                category: GyeokgukCategory::Jonggyeok,
                approx_confidence: None,
            }],
        },
    ]
}

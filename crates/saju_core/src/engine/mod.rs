//! 분석 캐스케이드.
//!
//! 고정 의존 순서: 합 평가 → 관계 탐지 → 충돌 해소 → 점수 → 강약 → 격국 →
//! 용신. 각 단계는 앞 단계의 결과만 읽는 순수 함수이고, 한 번의 분석은
//! 불변 결과 문서 하나를 새로 만들어 돌려준다.

pub mod combination;
pub mod config;
pub mod detector;
pub mod pattern;
pub mod relation;
pub mod score;
pub mod strength;
pub mod yongshin;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::FourPillars;

pub use combination::{CombinationEvaluation, CombinationEvaluator, CombinationState};
pub use config::{
    CalculationConfig, ConfigError, DeukjiScope, HapHwaStrictness, SchoolPreset, YongshinMode,
};
pub use detector::RelationDetector;
pub use pattern::{GyeokgukCategory, GyeokgukType, PatternDeterminer, PatternResult};
pub use relation::{
    BranchRelationType, RelationHit, RelationOutcome, RelationResolver, ResolvedRelation,
    StemRelationHit, StemRelationKind,
};
pub use score::{BranchRelationScorer, InteractionScore, StemRelationScorer};
pub use strength::{StrengthAnalyzer, StrengthLevel, StrengthResult, StrengthScore};
pub use yongshin::{ElementResult, YongshinDecider, YongshinRecommendation, YongshinStrategy};

/// 해소된 지지 관계와 그 점수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredRelation {
    pub resolved: ResolvedRelation,
    pub score: InteractionScore,
}

/// 천간 관계와 그 점수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredStemRelation {
    pub hit: StemRelationHit,
    pub score: InteractionScore,
}

/// 한 차트의 전체 분석 문서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartAnalysis {
    pub pillars: FourPillars,
    pub combinations: Vec<CombinationEvaluation>,
    pub branch_relations: Vec<ScoredRelation>,
    pub stem_relations: Vec<ScoredStemRelation>,
    pub strength: StrengthResult,
    pub pattern: PatternResult,
    pub element: ElementResult,
}

/// 캐스케이드 실행기.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    pillars: FourPillars,
    config: CalculationConfig,
    days_since_season_boundary: Option<f64>,
}

impl AnalysisEngine {
    /// Config validation happens here, before any analysis runs.
    pub fn new(pillars: FourPillars, config: CalculationConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| crate::error::AnalysisError::InvalidRequest(e.to_string()))?;
        Ok(Self { pillars, config, days_since_season_boundary: None })
    }

    /// 절입일 기준 경과일을 알고 있으면 득령 판정이 정밀해진다.
    pub fn with_season_boundary(mut self, days: f64) -> Self {
        self.days_since_season_boundary = Some(days);
        self
    }

    /// Run the full cascade and return one immutable analysis document.
    pub fn analyze(&self) -> ChartAnalysis {
        let pillars = &self.pillars;
        let config = &self.config;

        // 1. 천간합 평가
        let combinations = CombinationEvaluator::evaluate(
            pillars,
            config.hap_hwa_strictness,
            config.protect_day_master,
        );

        // 2. 관계 탐지와 충돌 해소
        let branch_hits = RelationDetector::detect_branch_relations(pillars);
        let resolved = RelationResolver::resolve(&branch_hits, pillars);

        // 3. 점수 부여
        let branch_relations: Vec<ScoredRelation> = resolved
            .into_iter()
            .map(|r| {
                let score = BranchRelationScorer::score(&r, pillars);
                ScoredRelation { resolved: r, score }
            })
            .collect();
        let stem_relations: Vec<ScoredStemRelation> = RelationDetector::detect_stem_relations(
            pillars,
        )
        .into_iter()
        .map(|hit| {
            let evaluation = combinations.iter().find(|e| {
                e.involves(hit.stems.0, hit.positions.0) && e.involves(hit.stems.1, hit.positions.1)
            });
            let score = StemRelationScorer::score(&hit, evaluation);
            ScoredStemRelation { hit, score }
        })
        .collect();

        // 4. 강약 (합거/합화 반영)
        let strength = StrengthAnalyzer::analyze_with(
            pillars,
            config,
            self.days_since_season_boundary,
            Some(&combinations),
        );

        // 5. 격국
        let pattern = PatternDeterminer::determine(pillars, Some(&strength), &combinations, config);

        // 6. 용신
        let element = YongshinDecider::decide(
            pillars,
            strength.is_strong,
            pillars.day_master().element(),
            config,
            &pattern,
            Some(&combinations),
        );

        ChartAnalysis {
            pillars: *pillars,
            combinations,
            branch_relations,
            stem_relations,
            strength,
            pattern,
            element,
        }
    }
}

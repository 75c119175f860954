//! 관계 상호작용 점수 모델.
//!
//! Two pure scorers over already-resolved data: one for branch relations,
//! one for stem relations. Final score is always
//! `clamp(floor((base + adjacency_bonus) * outcome_multiplier), 0, 100)`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::combination::{CombinationEvaluation, CombinationState};
use crate::engine::relation::{
    BranchRelationType, ResolvedRelation, StemRelationHit, StemRelationKind,
};
use crate::models::FourPillars;

/// 인접 보너스 점수.
const ADJACENCY_BONUS: f64 = 10.0;

/// Numeric strength attached to one resolved or stem relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InteractionScore {
    pub base_score: f64,
    /// 0 또는 +10
    pub adjacency_bonus: f64,
    pub outcome_multiplier: f64,
    /// clamp(floor((base + bonus) * multiplier), 0, 100)
    pub final_score: u8,
    pub rationale: String,
}

impl InteractionScore {
    fn compose(base: f64, adjacency_bonus: f64, multiplier: f64, rationale: String) -> Self {
        let raw = ((base + adjacency_bonus) * multiplier).floor();
        let final_score = raw.clamp(0.0, 100.0) as u8;
        Self {
            base_score: base,
            adjacency_bonus,
            outcome_multiplier: multiplier,
            final_score,
            rationale,
        }
    }
}

/// 지지 관계 점수기.
#[derive(Debug)]
pub struct BranchRelationScorer;

impl BranchRelationScorer {
    pub fn score(resolved: &ResolvedRelation, pillars: &FourPillars) -> InteractionScore {
        let base = Self::base_score_for(resolved.hit.relation, resolved.hit.note.as_deref());
        let adjacent = Self::any_members_adjacent(resolved, pillars);
        let bonus = if adjacent { ADJACENCY_BONUS } else { 0.0 };
        let multiplier = resolved.outcome.multiplier();
        let rationale = format!(
            "{}: 기본 {:.0}점{}, 판정 {} (x{:.1})",
            resolved.hit.label(),
            base,
            if adjacent { ", 인접 +10" } else { "" },
            resolved.outcome.korean_name(),
            multiplier
        );
        InteractionScore::compose(base, bonus, multiplier, rationale)
    }

    /// Per-type base constants. 반합 sub-varies by subtype note.
    pub fn base_score_for(relation: BranchRelationType, note: Option<&str>) -> f64 {
        match relation {
            BranchRelationType::DirectionalHarmony => 85.0,
            BranchRelationType::ThreeHarmony => 80.0,
            BranchRelationType::Clash => 70.0,
            BranchRelationType::SixHarmony => 60.0,
            BranchRelationType::Punishment => 55.0,
            BranchRelationType::Harm => 50.0,
            BranchRelationType::Break => 45.0,
            BranchRelationType::Resentment => 30.0,
            BranchRelationType::PartialHarmony => match note {
                Some("saeng-wang") => 45.0,
                Some("wang-go") => 40.0,
                Some("saeng-go") => 35.0,
                _ => 40.0,
            },
        }
    }

    fn any_members_adjacent(resolved: &ResolvedRelation, pillars: &FourPillars) -> bool {
        let members = &resolved.hit.members;
        for (i, a) in members.iter().enumerate() {
            for b in members.iter().skip(i + 1) {
                if pillars.branches_adjacent(*a, *b) {
                    return true;
                }
            }
        }
        false
    }
}

/// 천간 관계 점수기.
#[derive(Debug)]
pub struct StemRelationScorer;

impl StemRelationScorer {
    /// Score a stem hit. For a combination hit the base comes from the
    /// matching evaluation's state when one is supplied; a missing evaluation
    /// falls back to a neutral default.
    pub fn score(
        hit: &StemRelationHit,
        evaluation: Option<&CombinationEvaluation>,
    ) -> InteractionScore {
        let adjacent = hit.positions.0.is_adjacent_to(hit.positions.1);
        let bonus = if adjacent { ADJACENCY_BONUS } else { 0.0 };
        let pair_label = format!("{}{}", hit.stems.0.korean_name(), hit.stems.1.korean_name());

        let (base, rationale) = match hit.kind {
            StemRelationKind::Combination => match evaluation.map(|e| e.state) {
                Some(CombinationState::Transformed) => {
                    (90.0, format!("{} 천간합: 합화 성립 기준 90점", pair_label))
                }
                Some(CombinationState::Bound) => {
                    (70.0, format!("{} 천간합: 합거 기준 70점", pair_label))
                }
                Some(CombinationState::NotEstablished) => {
                    (30.0, format!("{} 천간합: 불성립 기준 30점", pair_label))
                }
                None => (50.0, format!("{} 천간합: 평가 없음, 기본 50점", pair_label)),
            },
            StemRelationKind::Clash => (65.0, format!("{} 천간충: 기본 65점", pair_label)),
        };

        let rationale = if adjacent { format!("{}, 인접 +10", rationale) } else { rationale };
        InteractionScore::compose(base, bonus, 1.0, rationale)
    }
}

//! 지지 관계 충돌 해소기.
//!
//! Raw relation hits come from a detector; two hits conflict when they share
//! at least one branch. Resolution is pairwise with a fixed rule ladder, then
//! merged per hit with worst-outcome-wins (파괴 > 약화 > 강화 > 유지), so a
//! Broken verdict from one conflict is never restored by another pair.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{Branch, FourPillars, PillarPosition, Stem};

/// 지지 관계 9종, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum BranchRelationType {
    ThreeHarmony,       // 삼합
    DirectionalHarmony, // 방합
    SixHarmony,         // 육합
    PartialHarmony,     // 반합
    Clash,              // 충
    Punishment,         // 형
    Break,              // 파
    Harm,               // 해
    Resentment,         // 원진
}

impl BranchRelationType {
    /// Fixed total order, higher wins conflicts under the generic rule.
    /// Injective over the nine types.
    pub fn priority(&self) -> u8 {
        match self {
            BranchRelationType::ThreeHarmony => 9,
            BranchRelationType::DirectionalHarmony => 8,
            BranchRelationType::SixHarmony => 7,
            BranchRelationType::PartialHarmony => 6,
            BranchRelationType::Clash => 5,
            BranchRelationType::Punishment => 4,
            BranchRelationType::Break => 3,
            BranchRelationType::Harm => 2,
            BranchRelationType::Resentment => 1,
        }
    }

    pub fn is_harmony(&self) -> bool {
        matches!(
            self,
            BranchRelationType::ThreeHarmony
                | BranchRelationType::DirectionalHarmony
                | BranchRelationType::SixHarmony
                | BranchRelationType::PartialHarmony
        )
    }

    /// 한글 이름
    pub fn korean_name(&self) -> &'static str {
        match self {
            BranchRelationType::ThreeHarmony => "삼합",
            BranchRelationType::DirectionalHarmony => "방합",
            BranchRelationType::SixHarmony => "육합",
            BranchRelationType::PartialHarmony => "반합",
            BranchRelationType::Clash => "충",
            BranchRelationType::Punishment => "형",
            BranchRelationType::Break => "파",
            BranchRelationType::Harm => "해",
            BranchRelationType::Resentment => "원진",
        }
    }
}

/// One raw relation candidate from the detector: which branches, which type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelationHit {
    pub relation: BranchRelationType,
    /// Member set, 2 or 3 distinct branches.
    pub members: Vec<Branch>,
    /// Subtype note (예: 반합 "saeng-wang", 삼합 국 이름)
    pub note: Option<String>,
}

impl RelationHit {
    pub fn new(relation: BranchRelationType, members: Vec<Branch>) -> Self {
        Self { relation, members, note: None }
    }

    pub fn with_note(relation: BranchRelationType, members: Vec<Branch>, note: &str) -> Self {
        Self { relation, members, note: Some(note.to_string()) }
    }

    pub fn shared_members(&self, other: &RelationHit) -> Vec<Branch> {
        self.members.iter().copied().filter(|m| other.members.contains(m)).collect()
    }

    pub fn same_member_set(&self, other: &RelationHit) -> bool {
        self.members.len() == other.members.len()
            && self.members.iter().all(|m| other.members.contains(m))
    }

    /// 멤버를 한글로 이어붙인 짧은 라벨 (예: "자축 육합")
    pub fn label(&self) -> String {
        let names: String = self.members.iter().map(|m| m.korean_name()).collect();
        format!("{} {}", names, self.relation.korean_name())
    }

    /// 완전한 삼합/방합: 세 멤버가 모두 차트에 실재한다.
    fn is_complete_harmony(&self, pillars: &FourPillars) -> bool {
        matches!(
            self.relation,
            BranchRelationType::ThreeHarmony | BranchRelationType::DirectionalHarmony
        ) && self.members.len() == 3
            && self.members.iter().all(|m| pillars.branches().contains(m))
    }
}

/// Resolution verdict for one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RelationOutcome {
    Active,       // 유지
    Strengthened, // 강화
    Weakened,     // 약화
    Broken,       // 파괴
}

impl RelationOutcome {
    /// Merge rank: the worst verdict across conflicts wins.
    pub fn severity(&self) -> u8 {
        match self {
            RelationOutcome::Active => 0,
            RelationOutcome::Strengthened => 1,
            RelationOutcome::Weakened => 2,
            RelationOutcome::Broken => 3,
        }
    }

    /// Score multiplier applied by the interaction score model.
    pub fn multiplier(&self) -> f64 {
        match self {
            RelationOutcome::Active => 1.0,
            RelationOutcome::Strengthened => 1.3,
            RelationOutcome::Weakened => 0.5,
            RelationOutcome::Broken => 0.0,
        }
    }

    pub fn korean_name(&self) -> &'static str {
        match self {
            RelationOutcome::Active => "유지",
            RelationOutcome::Strengthened => "강화",
            RelationOutcome::Weakened => "약화",
            RelationOutcome::Broken => "파괴",
        }
    }
}

/// One hit after conflict resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedRelation {
    pub hit: RelationHit,
    pub outcome: RelationOutcome,
    /// Hits this one shared a member with.
    pub interacts_with: Vec<RelationHit>,
    pub reasoning: String,
}

/// 천간 관계 2종.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StemRelationKind {
    /// 천간합 (state comes from the matching CombinationEvaluation)
    Combination,
    /// 천간충
    Clash,
}

/// One stem-relation candidate with its chart positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StemRelationHit {
    pub kind: StemRelationKind,
    pub stems: (Stem, Stem),
    pub positions: (PillarPosition, PillarPosition),
}

/// Pairwise ruling: optional downgrades/upgrades for each side plus the rule
/// label used in reasoning strings.
struct PairRuling {
    first: Option<RelationOutcome>,
    second: Option<RelationOutcome>,
    rule: String,
}

/// 지지 관계 충돌 해소 엔진.
#[derive(Debug)]
pub struct RelationResolver;

impl RelationResolver {
    /// Resolve every hit against every conflicting hit. Output order matches
    /// input order; input order never changes any verdict.
    pub fn resolve(hits: &[RelationHit], pillars: &FourPillars) -> Vec<ResolvedRelation> {
        let n = hits.len();
        let mut outcomes = vec![RelationOutcome::Active; n];
        let mut interacts: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut reasons: Vec<Vec<String>> = vec![Vec::new(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let shared = hits[i].shared_members(&hits[j]);
                if shared.is_empty() {
                    continue;
                }
                interacts[i].push(j);
                interacts[j].push(i);

                let ruling = Self::resolve_pair(&hits[i], &hits[j], &shared, pillars);
                if let Some(outcome) = ruling.first {
                    Self::apply(&mut outcomes[i], outcome);
                    reasons[i].push(format!("{} (vs {})", ruling.rule, hits[j].label()));
                }
                if let Some(outcome) = ruling.second {
                    Self::apply(&mut outcomes[j], outcome);
                    reasons[j].push(format!("{} (vs {})", ruling.rule, hits[i].label()));
                }
            }
        }

        (0..n)
            .map(|i| {
                let reasoning = if interacts[i].is_empty() {
                    format!("{}: 다른 관계와 충돌 없음, 그대로 유지", hits[i].label())
                } else if reasons[i].is_empty() {
                    format!("{}: 충돌은 있으나 판정을 바꾸는 규칙 없음", hits[i].label())
                } else {
                    format!("{}: {}", hits[i].label(), reasons[i].join("; "))
                };
                ResolvedRelation {
                    hit: hits[i].clone(),
                    outcome: outcomes[i],
                    interacts_with: interacts[i].iter().map(|&j| hits[j].clone()).collect(),
                    reasoning,
                }
            })
            .collect()
    }

    /// Worst outcome wins; an upgrade never overrides a downgrade.
    fn apply(current: &mut RelationOutcome, new: RelationOutcome) {
        if new.severity() > current.severity() {
            *current = new;
        }
    }

    fn resolve_pair(
        a: &RelationHit,
        b: &RelationHit,
        shared: &[Branch],
        pillars: &FourPillars,
    ) -> PairRuling {
        use BranchRelationType as T;

        // 완전한 삼합/방합은 깨지지 않고, 끼어든 충을 오히려 약화시킨다
        for (x, y, x_is_first) in [(a, b, true), (b, a, false)] {
            if x.is_complete_harmony(pillars) && y.relation == T::Clash {
                return Self::ruling_for(
                    x_is_first,
                    None,
                    Some(RelationOutcome::Weakened),
                    format!("완전한 {}은 충을 약화시킨다", x.relation.korean_name()),
                );
            }
        }

        // 육합 대 충: 공격지가 공유지에 인접하면 육합이 깨지고,
        // 그렇지 않으면 합이 충을 풀어 충이 약화된다
        for (x, y, x_is_first) in [(a, b, true), (b, a, false)] {
            if x.relation == T::SixHarmony && y.relation == T::Clash && shared.len() == 1 {
                let shared_branch = shared[0];
                let attacker = y.members.iter().copied().find(|m| *m != shared_branch);
                let broken = attacker
                    .map(|att| pillars.branches_adjacent(att, shared_branch))
                    .unwrap_or(false);
                if broken {
                    return Self::ruling_for(
                        x_is_first,
                        Some(RelationOutcome::Broken),
                        None,
                        "인접한 공격지의 충이 육합을 깨뜨린다".to_string(),
                    );
                }
                return Self::ruling_for(
                    x_is_first,
                    None,
                    Some(RelationOutcome::Weakened),
                    "육합이 충을 풀어낸다".to_string(),
                );
            }
        }

        // 반합 대 충: 반합은 깨지고 충도 약화된다
        for (x, y, x_is_first) in [(a, b, true), (b, a, false)] {
            if x.relation == T::PartialHarmony && y.relation == T::Clash {
                return Self::ruling_for(
                    x_is_first,
                    Some(RelationOutcome::Broken),
                    Some(RelationOutcome::Weakened),
                    "충이 반합을 깨고 자신도 약화된다".to_string(),
                );
            }
        }

        // 삼형 전체가 그 안의 2지 형을 강화한다
        if a.relation == T::Punishment && b.relation == T::Punishment {
            for (x, y, x_is_first) in [(a, b, true), (b, a, false)] {
                let y_subset_of_x = x.members.len() == 3
                    && y.members.len() == 2
                    && y.members.iter().all(|m| x.members.contains(m));
                if y_subset_of_x {
                    return Self::ruling_for(
                        x_is_first,
                        None,
                        Some(RelationOutcome::Strengthened),
                        "완전한 삼형이 부분 형을 강화한다".to_string(),
                    );
                }
            }
            return PairRuling { first: None, second: None, rule: String::new() };
        }

        // 같은 두 지지가 충이면서 형이면 형이 강화된다
        for (x, y, x_is_first) in [(a, b, true), (b, a, false)] {
            if x.relation == T::Clash && y.relation == T::Punishment && x.same_member_set(y) {
                return Self::ruling_for(
                    x_is_first,
                    None,
                    Some(RelationOutcome::Strengthened),
                    "같은 지지쌍의 충이 형을 강화한다".to_string(),
                );
            }
        }

        // 형은 어떤 합과 겹쳐도 약화되지 않는다
        for (x, y, _) in [(a, b, true), (b, a, false)] {
            if x.relation == T::Punishment && y.relation.is_harmony() {
                return PairRuling {
                    first: None,
                    second: None,
                    rule: "형은 합에 의해 약화되지 않는다".to_string(),
                };
            }
        }

        // 해는 겹친 육합을 약화시킨다
        for (x, y, x_is_first) in [(a, b, true), (b, a, false)] {
            if x.relation == T::Harm && y.relation == T::SixHarmony {
                return Self::ruling_for(
                    x_is_first,
                    None,
                    Some(RelationOutcome::Weakened),
                    "해가 육합을 약화시킨다".to_string(),
                );
            }
        }

        // 파가 합과 정확히 같은 지지쌍이면 그 합을 약화시킨다
        for (x, y, x_is_first) in [(a, b, true), (b, a, false)] {
            if x.relation == T::Break && y.relation.is_harmony() && x.same_member_set(y) {
                return Self::ruling_for(
                    x_is_first,
                    None,
                    Some(RelationOutcome::Weakened),
                    "같은 지지쌍의 파가 합을 약화시킨다".to_string(),
                );
            }
        }

        // 일반 규칙: 우선순위가 낮은 쪽이 약화된다 (같은 유형끼리는 무효)
        if a.relation == b.relation {
            return PairRuling { first: None, second: None, rule: String::new() };
        }
        let (low_is_first, low, _high) = if a.relation.priority() < b.relation.priority() {
            (true, a, b)
        } else {
            (false, b, a)
        };
        if low.is_complete_harmony(pillars) {
            // 완전한 삼합/방합은 일반 규칙으로도 깎이지 않는다
            return PairRuling { first: None, second: None, rule: String::new() };
        }
        let rule = if low.relation == T::Resentment {
            "원진은 상위 관계에 밀려 약화된다".to_string()
        } else {
            "우선순위가 낮은 관계가 약화된다".to_string()
        };
        Self::ruling_for(low_is_first, Some(RelationOutcome::Weakened), None, rule)
    }

    /// Orient a ruling expressed as (x, y) back onto (a, b).
    fn ruling_for(
        x_is_first: bool,
        x_outcome: Option<RelationOutcome>,
        y_outcome: Option<RelationOutcome>,
        rule: String,
    ) -> PairRuling {
        if x_is_first {
            PairRuling { first: x_outcome, second: y_outcome, rule }
        } else {
            PairRuling { first: y_outcome, second: x_outcome, rule }
        }
    }
}

//! 관계 탐지기.
//!
//! 차트의 지지 집합에서 기하적으로 가능한 모든 지지 관계 후보와, 천간
//! 합/충 후보를 뽑아낸다. 해소기는 호출자가 준 어떤 후보 목록도 받으므로
//! 외부 탐지기로 교체할 수 있다. 같은 관계는 멤버 집합 기준으로 한 번만
//! 내보낸다.

use crate::data::{
    combination_for, is_stem_clash, partial_harmony_note, BREAKS, CLASHES, DIRECTIONAL_TRIOS,
    HARMS, PUNISHMENT_PAIRS, PUNISHMENT_TRIOS, RESENTMENTS, SIX_HARMONIES, THREE_HARMONY_TRIOS,
};
use crate::engine::relation::{
    BranchRelationType, RelationHit, StemRelationHit, StemRelationKind,
};
use crate::models::{Branch, FourPillars, PillarPosition};

/// 관계 탐지 엔진.
#[derive(Debug)]
pub struct RelationDetector;

impl RelationDetector {
    /// All geometrically-possible branch-relation hits for the chart.
    pub fn detect_branch_relations(pillars: &FourPillars) -> Vec<RelationHit> {
        let mut hits = Vec::new();
        let present: Vec<Branch> = {
            let mut distinct = Vec::new();
            for branch in pillars.branches() {
                if !distinct.contains(&branch) {
                    distinct.push(branch);
                }
            }
            distinct
        };
        let has = |b: Branch| present.contains(&b);

        // 삼합: 완성이면 3지 하나로, 미완성이면 있는 2지 조합을 반합으로
        for trio in &THREE_HARMONY_TRIOS {
            let members: Vec<Branch> =
                trio.members.iter().copied().filter(|m| has(*m)).collect();
            match members.len() {
                3 => hits.push(RelationHit::with_note(
                    BranchRelationType::ThreeHarmony,
                    members,
                    trio.name,
                )),
                2 => {
                    if let Some(note) = partial_harmony_note(members[0], members[1]) {
                        hits.push(RelationHit::with_note(
                            BranchRelationType::PartialHarmony,
                            members,
                            note,
                        ));
                    }
                }
                _ => {}
            }
        }

        // 방합: 세 지지가 모두 모였을 때만 성립
        for trio in &DIRECTIONAL_TRIOS {
            if trio.members.iter().all(|m| has(*m)) {
                hits.push(RelationHit::with_note(
                    BranchRelationType::DirectionalHarmony,
                    trio.members.to_vec(),
                    trio.name,
                ));
            }
        }

        // 육합
        for (a, b, _) in SIX_HARMONIES {
            if has(a) && has(b) {
                hits.push(RelationHit::new(BranchRelationType::SixHarmony, vec![a, b]));
            }
        }

        // 충
        for (a, b) in CLASHES {
            if has(a) && has(b) {
                hits.push(RelationHit::new(BranchRelationType::Clash, vec![a, b]));
            }
        }

        // 형: 삼형의 2지 부분들, 완성 시 3지 형도 함께
        for trio in &PUNISHMENT_TRIOS {
            let members: Vec<Branch> = trio.iter().copied().filter(|m| has(*m)).collect();
            if members.len() == 3 {
                hits.push(RelationHit::new(BranchRelationType::Punishment, members.clone()));
            }
            if members.len() >= 2 {
                for (i, a) in members.iter().enumerate() {
                    for b in members.iter().skip(i + 1) {
                        hits.push(RelationHit::new(
                            BranchRelationType::Punishment,
                            vec![*a, *b],
                        ));
                    }
                }
            }
        }
        for (a, b) in PUNISHMENT_PAIRS {
            if has(a) && has(b) {
                hits.push(RelationHit::new(BranchRelationType::Punishment, vec![a, b]));
            }
        }

        // 파, 해, 원진
        for (table, relation) in [
            (&BREAKS, BranchRelationType::Break),
            (&HARMS, BranchRelationType::Harm),
            (&RESENTMENTS, BranchRelationType::Resentment),
        ] {
            for (a, b) in *table {
                if has(a) && has(b) {
                    hits.push(RelationHit::new(relation, vec![a, b]));
                }
            }
        }

        hits
    }

    /// All stem combination/clash candidates over the four position pairs.
    pub fn detect_stem_relations(pillars: &FourPillars) -> Vec<StemRelationHit> {
        let mut hits = Vec::new();
        for (i, pos1) in PillarPosition::ALL.iter().enumerate() {
            for pos2 in PillarPosition::ALL.iter().skip(i + 1) {
                let stem1 = pillars.pillar(*pos1).stem;
                let stem2 = pillars.pillar(*pos2).stem;
                if combination_for(stem1, stem2).is_some() {
                    hits.push(StemRelationHit {
                        kind: StemRelationKind::Combination,
                        stems: (stem1, stem2),
                        positions: (*pos1, *pos2),
                    });
                } else if is_stem_clash(stem1, stem2) {
                    hits.push(StemRelationHit {
                        kind: StemRelationKind::Clash,
                        stems: (stem1, stem2),
                        positions: (*pos1, *pos2),
                    });
                }
            }
        }
        hits
    }
}

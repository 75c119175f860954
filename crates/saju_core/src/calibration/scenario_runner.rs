//! 기준 시나리오 실행기.

use crate::calibration::scenarios::{Expectation, ReferenceScenario};
use crate::engine::pattern::PatternDeterminer;
use crate::engine::relation::RelationResolver;
use crate::engine::strength::{StrengthLevel, StrengthResult, StrengthScore};
use crate::engine::{CombinationEvaluator, RelationDetector};

const CONFIDENCE_TOLERANCE: f64 = 0.02;

/// 시나리오를 실행해 기대와 어긋난 항목을 메시지로 돌려준다.
#[derive(Debug)]
pub struct ScenarioRunner;

impl ScenarioRunner {
    pub fn run(scenario: &ReferenceScenario) -> Result<(), String> {
        for expectation in &scenario.expectations {
            Self::check(scenario, expectation)
                .map_err(|msg| format!("[{}] {}", scenario.name, msg))?;
        }
        Ok(())
    }

    fn check(scenario: &ReferenceScenario, expectation: &Expectation) -> Result<(), String> {
        match expectation {
            Expectation::Combination {
                state,
                result_element,
                min_confidence,
                exact_confidence,
            } => {
                let evals = CombinationEvaluator::evaluate(
                    &scenario.pillars,
                    scenario.config.hap_hwa_strictness,
                    scenario.config.protect_day_master,
                );
                let eval = evals.first().ok_or("합 평가가 비어 있음")?;
                if eval.state != *state {
                    return Err(format!("상태 {:?}, 기대 {:?}", eval.state, state));
                }
                if eval.result_element != *result_element {
                    return Err(format!(
                        "오행 {:?}, 기대 {:?}",
                        eval.result_element, result_element
                    ));
                }
                if let Some(min) = min_confidence {
                    if eval.confidence < *min {
                        return Err(format!("신뢰도 {} < 최소 {}", eval.confidence, min));
                    }
                }
                if let Some(exact) = exact_confidence {
                    if (eval.confidence - exact).abs() > f64::EPSILON {
                        return Err(format!("신뢰도 {} != {}", eval.confidence, exact));
                    }
                }
                Ok(())
            }

            Expectation::Relation { relation, members, outcome } => {
                let hits = RelationDetector::detect_branch_relations(&scenario.pillars);
                let resolved = RelationResolver::resolve(&hits, &scenario.pillars);
                let found = resolved
                    .iter()
                    .find(|r| {
                        r.hit.relation == *relation
                            && r.hit.members.len() == members.len()
                            && members.iter().all(|m| r.hit.members.contains(m))
                    })
                    .ok_or(format!("{:?} {:?} 관계가 탐지되지 않음", relation, members))?;
                if found.outcome != *outcome {
                    return Err(format!(
                        "{} 판정 {:?}, 기대 {:?} ({})",
                        found.hit.label(),
                        found.outcome,
                        outcome,
                        found.reasoning
                    ));
                }
                Ok(())
            }

            Expectation::Pattern { total_support, gyeokguk, category, approx_confidence } => {
                let strength = Self::synthetic_strength(scenario, *total_support);
                let result = PatternDeterminer::determine(
                    &scenario.pillars,
                    Some(&strength),
                    &[],
                    &scenario.config,
                );
                if result.gyeokguk != *gyeokguk {
                    return Err(format!("격국 {:?}, 기대 {:?}", result.gyeokguk, gyeokguk));
                }
                if result.category != *category {
                    return Err(format!("분류 {:?}, 기대 {:?}", result.category, category));
                }
                if let Some(expected) = approx_confidence {
                    if (result.confidence - expected).abs() > CONFIDENCE_TOLERANCE {
                        return Err(format!("신뢰도 {} !~ {}", result.confidence, expected));
                    }
                }
                Ok(())
            }
        }
    }

    /// 시나리오가 지정한 총지지로 강약 결과를 합성한다. 세부 배분은 격국
    /// 판정에 영향이 없으므로 고정 비율로 쪼갠다.
    fn synthetic_strength(scenario: &ReferenceScenario, total_support: f64) -> StrengthResult {
        StrengthResult {
            day_master: scenario.pillars.day_master(),
            score: StrengthScore {
                deukryeong: total_support * 0.3,
                deukji: total_support * 0.4,
                deukse: total_support * 0.3,
                total_support,
                total_oppose: 100.0 - total_support,
            },
            level: StrengthLevel::Balanced,
            is_strong: total_support >= scenario.config.strength_threshold,
            details: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::scenarios::reference_scenarios;

    #[test]
    fn test_all_reference_scenarios_pass() {
        for scenario in reference_scenarios() {
            ScenarioRunner::run(&scenario).unwrap_or_else(|msg| panic!("{}", msg));
        }
    }

    #[test]
    fn test_scenarios_have_unique_names() {
        let scenarios = reference_scenarios();
        let names: std::collections::HashSet<&str> =
            scenarios.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), scenarios.len());
    }
}

//! # saju_core - Deterministic Four-Pillar Analysis Engine
//!
//! This library takes a four-pillar (사주) chart already converted from a
//! birth moment and derives the full interaction cascade: stem-combination
//! states, resolved branch relations with numeric interaction scores, a
//! day-master strength verdict, a 격국 classification and a 용신 element.
//!
//! ## Features
//! - 100% deterministic analysis (same chart + config = same result)
//! - Every stage is a pure function over immutable inputs
//! - All doctrine tables are compile-time constants
//! - JSON API for easy integration with app/service layers

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Domain APIs occasionally need many parameters for chart, config, cascade state
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod calibration;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;

// Re-export main API functions
pub use api::{analyze_chart_json, AnalysisRequest, AnalysisResponse};
pub use error::{AnalysisError, Result};

// Re-export the cascade engine and its result documents
pub use engine::{
    AnalysisEngine, BranchRelationScorer, BranchRelationType, CalculationConfig, ChartAnalysis,
    CombinationEvaluation, CombinationEvaluator, CombinationState, ElementResult, GyeokgukCategory,
    GyeokgukType, HapHwaStrictness, InteractionScore, PatternDeterminer, PatternResult,
    RelationDetector, RelationHit, RelationOutcome, RelationResolver, ResolvedRelation,
    SchoolPreset, StemRelationHit, StemRelationKind, StemRelationScorer, StrengthAnalyzer,
    StrengthLevel, StrengthResult, YongshinDecider, YongshinMode, YongshinStrategy,
};

// Re-export domain model types
pub use models::{
    Branch, Element, FourPillars, Pillar, PillarPosition, Polarity, Stem, TenGod, TenGodGroup,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> serde_json::Value {
        json!({
            "schema_version": 1,
            "pillars": {
                "year": {"stem": "im", "branch": "ja"},
                "month": {"stem": "gye", "branch": "hae"},
                "day": {"stem": "gap", "branch": "in"},
                "hour": {"stem": "gap", "branch": "myo"}
            }
        })
    }

    #[test]
    fn test_basic_analysis() {
        let result = analyze_chart_json(&sample_request().to_string());
        assert!(result.is_ok(), "analysis should succeed");

        let parsed: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        // 수목 일색의 갑목 일간은 신강해야 한다
        assert_eq!(parsed["analysis"]["strength"]["is_strong"], true);
    }

    #[test]
    fn test_determinism() {
        let request = sample_request().to_string();
        let result1 = analyze_chart_json(&request).unwrap();
        let result2 = analyze_chart_json(&request).unwrap();
        assert_eq!(result1, result2, "same request should produce same response");
    }

    #[test]
    fn test_engine_and_json_api_agree() {
        let pillars = FourPillars::new(
            Pillar::new(Stem::Im, Branch::Ja),
            Pillar::new(Stem::Gye, Branch::Hae),
            Pillar::new(Stem::Gap, Branch::In),
            Pillar::new(Stem::Gap, Branch::Myo),
        );
        let engine = AnalysisEngine::new(pillars, CalculationConfig::default()).unwrap();
        let direct = engine.analyze();

        let via_json = analyze_chart_json(&sample_request().to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&via_json).unwrap();
        assert_eq!(
            parsed["analysis"]["strength"]["score"]["total_support"].as_f64().unwrap(),
            direct.strength.score.total_support
        );
        assert_eq!(
            parsed["analysis"]["pattern"]["gyeokguk"],
            serde_json::to_value(direct.pattern.gyeokguk).unwrap()
        );
    }
}

//! JSON 분석 API.
//!
//! 게임/서비스 쪽 통합을 위한 문자열 in/out 경계. 구조 오류(모르는 간지,
//! 스키마 불일치, 설정 범위 초과)는 여기서 즉시 실패하고, 캐스케이드는
//! 검증된 입력만 받는다.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::{
    AnalysisEngine, CalculationConfig, ChartAnalysis, HapHwaStrictness, SchoolPreset, YongshinMode,
};
use crate::error::{AnalysisError, Result};
use crate::models::{FourPillars, Pillar};
use crate::SCHEMA_VERSION;

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub schema_version: u8,
    pub pillars: PillarsData,
    #[serde(default)]
    pub config: Option<ConfigData>,
    /// 절입일 기준 경과일 (월률분야 당령 보정)
    #[serde(default)]
    pub days_since_season_boundary: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PillarsData {
    pub year: PillarData,
    pub month: PillarData,
    pub day: PillarData,
    pub hour: PillarData,
}

/// 간지는 로마자("gap") 또는 한글("갑") 이름으로 받는다.
#[derive(Debug, Deserialize)]
pub struct PillarData {
    pub stem: String,
    pub branch: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigData {
    /// "traditional" | "standard" | "practical"
    #[serde(default)]
    pub preset: Option<String>,
    /// "strict" | "moderate" | "lenient"
    #[serde(default)]
    pub strictness: Option<String>,
    #[serde(default)]
    pub protect_day_master: Option<bool>,
    #[serde(default)]
    pub strength_threshold: Option<f64>,
    #[serde(default)]
    pub jonggyeok_strong_threshold: Option<f64>,
    #[serde(default)]
    pub jonggyeok_weak_threshold: Option<f64>,
    /// "follow" | "counter"
    #[serde(default)]
    pub yongshin_mode: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AnalysisResponse {
    pub schema_version: u8,
    pub analysis: ChartAnalysis,
}

/// Run the full cascade from a request JSON string.
pub fn analyze_chart_json(request_json: &str) -> Result<String> {
    let request: AnalysisRequest = serde_json::from_str(request_json)?;
    if request.schema_version != SCHEMA_VERSION {
        warn!(
            found = request.schema_version,
            expected = SCHEMA_VERSION,
            "schema version mismatch"
        );
        return Err(AnalysisError::InvalidRequest(format!(
            "unsupported schema_version {}, expected {}",
            request.schema_version, SCHEMA_VERSION
        )));
    }

    let pillars = parse_pillars(&request.pillars)?;
    let config = build_config(request.config.as_ref())?;
    info!(
        day_master = pillars.day_master().korean_name(),
        month_branch = pillars.month_branch().korean_name(),
        "starting chart analysis"
    );

    let mut engine = AnalysisEngine::new(pillars, config)?;
    if let Some(days) = request.days_since_season_boundary {
        engine = engine.with_season_boundary(days);
    }
    let analysis = engine.analyze();
    debug!(
        gyeokguk = analysis.pattern.gyeokguk.korean_name(),
        yongshin = analysis.element.final_element.korean_name(),
        "analysis complete"
    );

    let response = AnalysisResponse { schema_version: SCHEMA_VERSION, analysis };
    Ok(serde_json::to_string(&response)?)
}

/// JSON Schema for the response document, for downstream consumers.
pub fn analysis_response_schema() -> schemars::schema::RootSchema {
    schema_for!(AnalysisResponse)
}

fn parse_pillars(data: &PillarsData) -> Result<FourPillars> {
    let parse = |p: &PillarData| -> Result<Pillar> {
        Ok(Pillar::new(p.stem.parse()?, p.branch.parse()?))
    };
    Ok(FourPillars::new(
        parse(&data.year)?,
        parse(&data.month)?,
        parse(&data.day)?,
        parse(&data.hour)?,
    ))
}

fn build_config(data: Option<&ConfigData>) -> Result<CalculationConfig> {
    let Some(data) = data else {
        return Ok(CalculationConfig::default());
    };

    let mut config = match data.preset.as_deref() {
        None => CalculationConfig::default(),
        Some("traditional") => CalculationConfig::from_preset(SchoolPreset::Traditional),
        Some("standard") => CalculationConfig::from_preset(SchoolPreset::Standard),
        Some("practical") => CalculationConfig::from_preset(SchoolPreset::Practical),
        Some(other) => {
            return Err(AnalysisError::InvalidRequest(format!("unknown preset: {}", other)))
        }
    };

    if let Some(strictness) = data.strictness.as_deref() {
        config.hap_hwa_strictness = match strictness {
            "strict" => HapHwaStrictness::Strict,
            "moderate" => HapHwaStrictness::Moderate,
            "lenient" => HapHwaStrictness::Lenient,
            other => {
                return Err(AnalysisError::InvalidRequest(format!(
                    "unknown strictness: {}",
                    other
                )))
            }
        };
    }
    if let Some(mode) = data.yongshin_mode.as_deref() {
        config.jonggyeok_yongshin_mode = match mode {
            "follow" => YongshinMode::FollowDominant,
            "counter" => YongshinMode::CounterDominant,
            other => {
                return Err(AnalysisError::InvalidRequest(format!(
                    "unknown yongshin_mode: {}",
                    other
                )))
            }
        };
    }
    if let Some(value) = data.protect_day_master {
        config.protect_day_master = value;
    }
    if let Some(value) = data.strength_threshold {
        config.strength_threshold = value;
    }
    if let Some(value) = data.jonggyeok_strong_threshold {
        config.jonggyeok_strong_threshold = value;
    }
    if let Some(value) = data.jonggyeok_weak_threshold {
        config.jonggyeok_weak_threshold = value;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> serde_json::Value {
        json!({
            "schema_version": 1,
            "pillars": {
                "year": {"stem": "gap", "branch": "ja"},
                "month": {"stem": "gi", "branch": "jin"},
                "day": {"stem": "byeong", "branch": "o"},
                "hour": {"stem": "jeong", "branch": "yu"}
            }
        })
    }

    #[test]
    fn test_basic_analysis_roundtrip() {
        let result = analyze_chart_json(&sample_request().to_string());
        assert!(result.is_ok(), "analysis should succeed: {:?}", result.err());

        let parsed: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert!(parsed["analysis"]["strength"]["score"]["total_support"].is_number());
        assert!(parsed["analysis"]["pattern"]["confidence"].is_number());
        assert!(parsed["analysis"]["element"]["final_element"].is_string());
    }

    #[test]
    fn test_same_request_yields_identical_response() {
        let request = sample_request().to_string();
        let first = analyze_chart_json(&request).unwrap();
        let second = analyze_chart_json(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_hangul_names_accepted() {
        let request = json!({
            "schema_version": 1,
            "pillars": {
                "year": {"stem": "갑", "branch": "자"},
                "month": {"stem": "기", "branch": "진"},
                "day": {"stem": "병", "branch": "오"},
                "hour": {"stem": "정", "branch": "유"}
            }
        });
        assert!(analyze_chart_json(&request.to_string()).is_ok());
    }

    #[test]
    fn test_unknown_stem_fails_fast() {
        let mut request = sample_request();
        request["pillars"]["year"]["stem"] = json!("zzz");
        let err = analyze_chart_json(&request.to_string()).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownStem(_)));
    }

    #[test]
    fn test_schema_version_mismatch_rejected() {
        let mut request = sample_request();
        request["schema_version"] = json!(9);
        let err = analyze_chart_json(&request.to_string()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRequest(_)));
    }

    #[test]
    fn test_out_of_range_config_rejected() {
        let mut request = sample_request();
        request["config"] = json!({"strength_threshold": -5.0});
        assert!(analyze_chart_json(&request.to_string()).is_err());
    }

    #[test]
    fn test_preset_changes_verdict() {
        // practical 프리셋은 lenient 합화라 같은 차트라도 판정이 다를 수 있다
        let mut request = sample_request();
        request["config"] = json!({"preset": "practical"});
        let result = analyze_chart_json(&request.to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["analysis"]["combinations"][0]["state"], "Transformed");
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let mut request = sample_request();
        request["config"] = json!({"preset": "mystic"});
        let err = analyze_chart_json(&request.to_string()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRequest(_)));
    }

    #[test]
    fn test_response_schema_is_generatable() {
        let schema = analysis_response_schema();
        let rendered = serde_json::to_string(&schema).unwrap();
        assert!(rendered.contains("ChartAnalysis"));
    }
}

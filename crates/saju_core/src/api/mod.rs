//! 외부 통합용 JSON 경계.

pub mod json_api;

pub use json_api::{
    analysis_response_schema, analyze_chart_json, AnalysisRequest, AnalysisResponse, ConfigData,
    PillarData, PillarsData,
};

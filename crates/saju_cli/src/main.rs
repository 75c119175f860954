//! Saju CLI
//!
//! 차트 요청 JSON → 분석 결과 JSON 변환 도구

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "saju_cli")]
#[command(about = "Analyze four-pillar charts from request JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis cascade on a request JSON file
    Analyze {
        /// Input request JSON file path ("-" reads stdin)
        #[arg(long)]
        r#in: PathBuf,

        /// Pretty-print the response JSON
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Print the JSON Schema of the analysis response document
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { r#in, pretty } => {
            let request = read_input(&r#in)?;
            let response = saju_core::analyze_chart_json(&request)
                .with_context(|| format!("analysis failed for {}", r#in.display()))?;
            if pretty {
                let value: serde_json::Value = serde_json::from_str(&response)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", response);
            }
        }
        Commands::Schema => {
            let schema = saju_core::api::analysis_response_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read request from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))
    }
}

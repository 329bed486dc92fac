use crate::domain::model::ExtractionResult;
use crate::utils::error::{ExtractorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

pub fn render(result: &ExtractionResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => render_csv(result),
    }
}

fn render_csv(result: &ExtractionResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["text", "url", "page_title", "short_title"])?;
    for link in &result.links {
        writer.write_record([
            link.text.as_str(),
            link.url.as_str(),
            link.page_title.as_deref().unwrap_or_default(),
            link.short_title.as_deref().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExtractorError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| ExtractorError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ExtractedLink;

    fn sample() -> ExtractionResult {
        let mut link = ExtractedLink::new("Jerky, smoked", "https://gymbeam.com/jerky");
        link.page_title = Some("Jelení jerky - GymBeam".to_string());
        link.short_title = Some("Jelení jerky - GymBeam".to_string());
        ExtractionResult {
            title: "Gym Haul".to_string(),
            description: "Jerky, smoked: https://gymbeam.com/jerky".to_string(),
            links: vec![link],
        }
    }

    #[test]
    fn test_csv_output_quotes_fields() {
        let csv = render(&sample(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "text,url,page_title,short_title");
        assert_eq!(
            lines[1],
            "\"Jerky, smoked\",https://gymbeam.com/jerky,Jelení jerky - GymBeam,Jelení jerky - GymBeam"
        );
    }

    #[test]
    fn test_json_output_shape() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Gym Haul");
        assert_eq!(value["links"][0]["short_title"], "Jelení jerky - GymBeam");
    }
}

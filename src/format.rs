use std::fmt;
use std::str::FromStr;

use crate::address::AddressKind;
use crate::error::{ProbeError, Result};
use crate::record::ExtractionResult;

pub const CSV_HEADER: [&str; 3] = ["Region", "Type", "IP Address"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Csv,
}

impl OutputFormat {
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ProbeError::UnsupportedFormat(s.to_string())),
        }
    }
}

pub fn render(result: &ExtractionResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Yaml => to_yaml(result),
        OutputFormat::Csv => to_csv(result),
    }
}

fn serialize_error(format: OutputFormat, e: impl ToString) -> ProbeError {
    ProbeError::Serialize {
        format: format.name(),
        reason: e.to_string(),
    }
}

pub fn to_json(result: &ExtractionResult) -> Result<String> {
    let mut out =
        serde_json::to_string_pretty(result).map_err(|e| serialize_error(OutputFormat::Json, e))?;
    out.push('\n');
    Ok(out)
}

pub fn to_yaml(result: &ExtractionResult) -> Result<String> {
    serde_yaml::to_string(result).map_err(|e| serialize_error(OutputFormat::Yaml, e))
}

/// One row per address; a region's IPv4 rows precede its IPv6 rows.
pub fn to_csv(result: &ExtractionResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| serialize_error(OutputFormat::Csv, e))?;

    for record in result {
        let rows = record
            .ipv4
            .iter()
            .map(|ip| (AddressKind::V4, ip))
            .chain(record.ipv6.iter().map(|ip| (AddressKind::V6, ip)));

        for (kind, ip) in rows {
            writer
                .write_record([record.region.as_str(), kind.label(), ip.as_str()])
                .map_err(|e| serialize_error(OutputFormat::Csv, e))?;
        }
    }

    let data = writer
        .into_inner()
        .map_err(|e| serialize_error(OutputFormat::Csv, e))?;
    String::from_utf8(data).map_err(|e| serialize_error(OutputFormat::Csv, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ProbeRegionRecord;

    fn sample() -> ExtractionResult {
        ExtractionResult::new(vec![
            ProbeRegionRecord {
                region: "North America - East".to_string(),
                ipv4: vec!["156.154.35.153".to_string(), "156.154.35.154".to_string()],
                ipv6: vec!["2610:a1:3008:128::153".to_string()],
            },
            ProbeRegionRecord {
                region: "Europe, West".to_string(),
                ipv4: vec![],
                ipv6: vec!["2610:a1:3009:128::1".to_string(), "2610:a1:3009:128::2".to_string()],
            },
        ])
    }

    #[test]
    fn json_round_trips() {
        let result = sample();
        let json = to_json(&result).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn json_keeps_field_order() {
        let json = to_json(&sample()).unwrap();
        let region = json.find("\"region\"").unwrap();
        let ipv4 = json.find("\"ipv4\"").unwrap();
        let ipv6 = json.find("\"ipv6\"").unwrap();
        assert!(region < ipv4 && ipv4 < ipv6);
        assert!(json.contains("\"ipv4\": []"));
    }

    #[test]
    fn yaml_round_trips() {
        let result = sample();
        let yaml = to_yaml(&result).unwrap();
        assert!(yaml.starts_with("- region: "));
        let back: ExtractionResult = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn csv_has_header_plus_one_row_per_address() {
        let result = sample();
        let csv = to_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), result.address_count() + 1);
        assert_eq!(
            lines,
            vec![
                "Region,Type,IP Address",
                "North America - East,IPv4,156.154.35.153",
                "North America - East,IPv4,156.154.35.154",
                "North America - East,IPv6,2610:a1:3008:128::153",
                "\"Europe, West\",IPv6,2610:a1:3009:128::1",
                "\"Europe, West\",IPv6,2610:a1:3009:128::2",
            ]
        );
    }

    #[test]
    fn empty_result_renders_header_only() {
        let csv = to_csv(&ExtractionResult::default()).unwrap();
        assert_eq!(csv, "Region,Type,IP Address\n");
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, ProbeError::UnsupportedFormat(f) if f == "xml"));
    }
}

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the "IP Probes by Region" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRegionRecord {
    #[serde(deserialize_with = "non_empty_region")]
    pub region: String,
    #[serde(default)]
    pub ipv4: Vec<String>,
    #[serde(default)]
    pub ipv6: Vec<String>,
}

fn non_empty_region<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let region = String::deserialize(deserializer)?;
    if region.trim().is_empty() {
        return Err(de::Error::invalid_value(
            Unexpected::Str(&region),
            &"a non-empty region name",
        ));
    }
    Ok(region)
}

impl ProbeRegionRecord {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ipv4: Vec::new(),
            ipv6: Vec::new(),
        }
    }

    pub fn address_count(&self) -> usize {
        self.ipv4.len() + self.ipv6.len()
    }
}

/// Records in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    pub records: Vec<ProbeRegionRecord>,
}

impl ExtractionResult {
    pub fn new(records: Vec<ProbeRegionRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeRegionRecord> {
        self.records.iter()
    }

    pub fn address_count(&self) -> usize {
        self.records.iter().map(ProbeRegionRecord::address_count).sum()
    }
}

impl<'a> IntoIterator for &'a ExtractionResult {
    type Item = &'a ProbeRegionRecord;
    type IntoIter = std::slice::Iter<'a, ProbeRegionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_array_with_field_order() {
        let result = ExtractionResult::new(vec![ProbeRegionRecord {
            region: "Asia".to_string(),
            ipv4: vec!["1.2.3.4".to_string()],
            ipv6: vec![],
        }]);

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"[{"region":"Asia","ipv4":["1.2.3.4"],"ipv6":[]}]"#);
    }

    #[test]
    fn empty_region_is_rejected() {
        assert!(serde_json::from_str::<ExtractionResult>(r#"[{"region":""}]"#).is_err());
        assert!(serde_yaml::from_str::<ExtractionResult>("- region: '  '\n").is_err());
    }

    #[test]
    fn missing_address_lists_deserialize_as_empty() {
        let result: ExtractionResult = serde_json::from_str(r#"[{"region":"Asia"}]"#).unwrap();
        assert_eq!(result.records[0], ProbeRegionRecord::new("Asia"));
    }
}

use crate::model::{FieldPath, SubField, SubKind, TemplateDocument};
use serde::{Deserialize, Deserializer, Serialize};

/// Per-kind counts over a template document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStats {
    pub total: usize,
    pub analog: usize,
    pub discrete: usize,
    pub breaker: usize,
}

impl TemplateStats {
    pub fn of(doc: &TemplateDocument) -> Self {
        let mut stats = Self {
            total: doc.len(),
            ..Default::default()
        };
        for (_, record) in doc.iter() {
            for kind in record.active_kinds() {
                match kind {
                    SubKind::Analog => stats.analog += 1,
                    SubKind::Discrete => stats.discrete += 1,
                    SubKind::Breaker => stats.breaker += 1,
                }
            }
        }
        stats
    }
}

/// Body of the backend's template statistics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub stats: TemplateStats,
    // The server sends `null` rather than `[]` when there is nothing to report.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub warnings: Vec<String>,
}

impl StatsReport {
    pub fn of(doc: &TemplateDocument) -> Self {
        Self {
            stats: TemplateStats::of(doc),
            warnings: validate(doc),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Health warnings: templates with no active definition, and active definitions without a name.
/// Sorted by template key.
pub fn validate(doc: &TemplateDocument) -> Vec<String> {
    let mut keys: Vec<&str> = doc.keys().collect();
    keys.sort_unstable();

    let mut warnings = Vec::new();
    for key in keys {
        let Some(record) = doc.get(key) else {
            continue;
        };
        if record.is_inactive() {
            warnings.push(format!("template '{key}' has no definition type"));
            continue;
        }
        for kind in record.active_kinds() {
            let name = record.value(kind, FieldPath::Field(SubField::Name));
            if name.is_none_or(str::is_empty) {
                warnings.push(format!("template '{key}' ({kind}) has no name"));
            }
        }
    }
    warnings
}

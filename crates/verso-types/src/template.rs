//! Collaboration template structures.

use serde::{Deserialize, Serialize};

use crate::TemplateId;

/// A reusable blueprint for a collaboration project.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub display_text: Option<String>,
    /// Absent on legacy rows; resolve with [`Template::kind_or_inferred`].
    pub kind: Option<TemplateKind>,
    pub phases: Option<u32>,
    pub duration: Option<String>,
    pub requirements: Option<String>,
    pub connection_rules: Option<String>,
    pub internal_reference: Option<String>,
}

impl Template {
    /// The template kind, falling back to name inference for legacy rows.
    pub fn kind_or_inferred(&self) -> TemplateKind {
        self.kind.unwrap_or_else(|| TemplateKind::infer(&self.name))
    }
}

/// Template kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Chain,
    Theme,
    Narrative,
}

impl TemplateKind {
    /// Stable string form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Chain => "chain",
            TemplateKind::Theme => "theme",
            TemplateKind::Narrative => "narrative",
        }
    }

    /// Parse the database string form. Unknown values map to `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "chain" => Some(TemplateKind::Chain),
            "theme" => Some(TemplateKind::Theme),
            "narrative" => Some(TemplateKind::Narrative),
            _ => None,
        }
    }

    /// Legacy fallback: infer the kind from the template name.
    ///
    /// Rows predating the `kind` column are classified by substring match,
    /// defaulting to narrative.
    pub fn infer(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("chain") {
            TemplateKind::Chain
        } else if lower.contains("theme") {
            TemplateKind::Theme
        } else {
            TemplateKind::Narrative
        }
    }
}

/// Templates grouped by kind, for catalog listings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TemplateGroups {
    pub chain: Vec<Template>,
    pub theme: Vec<Template>,
    pub narrative: Vec<Template>,
}

impl TemplateGroups {
    /// True when no templates are available in any group.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty() && self.theme.is_empty() && self.narrative.is_empty()
    }

    /// Place a template into the group matching its resolved kind.
    pub fn push(&mut self, template: Template) {
        match template.kind_or_inferred() {
            TemplateKind::Chain => self.chain.push(template),
            TemplateKind::Theme => self.theme.push(template),
            TemplateKind::Narrative => self.narrative.push(template),
        }
    }
}

use crate::foundation::error::{PagewrightError, PagewrightResult};

/// What a rule does at each anchor match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchMode {
    /// Keep the matched text and emit the payload right after it.
    Insert,
    /// Emit the payload, then the matched text.
    InsertBefore,
    /// Replace the matched text. The payload may reference capture groups (`$1`, `${name}`).
    Replace,
    /// Remove the matched text.
    Delete,
}

impl PatchMode {
    pub fn takes_payload(self) -> bool {
        !matches!(self, Self::Delete)
    }
}

/// How many anchor matches a rule transforms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrences {
    #[default]
    First,
    All,
    AtMost(usize),
}

impl Occurrences {
    /// Maximum number of matches to transform, `None` meaning unbounded.
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::First => Some(1),
            Self::All => None,
            Self::AtMost(n) => Some(n),
        }
    }
}

fn default_required() -> bool {
    true
}

/// One step of a patch pipeline.
///
/// Rules are plain data so a pipeline can be kept in JSON next to the document it edits.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatchRule {
    pub name: String,
    /// Regular expression located in the current document text.
    pub anchor: String,
    pub mode: PatchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default)]
    pub occurrences: Occurrences,
    /// A required rule that matches nothing is reported (or fails the run in strict mode).
    #[serde(default = "default_required")]
    pub required: bool,
    /// Literal markers that earlier stages must have left in the document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// Skip the rule when this literal is already present (makes re-runs a no-op).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if_present: Option<String>,
}

impl PatchRule {
    fn new(
        name: impl Into<String>,
        anchor: impl Into<String>,
        mode: PatchMode,
        payload: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            anchor: anchor.into(),
            mode,
            payload,
            occurrences: Occurrences::First,
            required: true,
            requires: Vec::new(),
            skip_if_present: None,
        }
    }

    pub fn insert(
        name: impl Into<String>,
        anchor: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::new(name, anchor, PatchMode::Insert, Some(payload.into()))
    }

    pub fn insert_before(
        name: impl Into<String>,
        anchor: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::new(name, anchor, PatchMode::InsertBefore, Some(payload.into()))
    }

    pub fn replace(
        name: impl Into<String>,
        anchor: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::new(name, anchor, PatchMode::Replace, Some(payload.into()))
    }

    pub fn delete(name: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self::new(name, anchor, PatchMode::Delete, None)
    }

    pub fn all(mut self) -> Self {
        self.occurrences = Occurrences::All;
        self
    }

    pub fn at_most(mut self, n: usize) -> Self {
        self.occurrences = Occurrences::AtMost(n);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn requires(mut self, marker: impl Into<String>) -> Self {
        self.requires.push(marker.into());
        self
    }

    pub fn skip_if_present(mut self, sentinel: impl Into<String>) -> Self {
        self.skip_if_present = Some(sentinel.into());
        self
    }

    pub fn validate(&self) -> PagewrightResult<()> {
        if self.name.trim().is_empty() {
            return Err(PagewrightError::validation("rule name must be non-empty"));
        }
        if self.anchor.is_empty() {
            return Err(PagewrightError::validation(format!(
                "rule '{}' has an empty anchor",
                self.name
            )));
        }
        match (self.mode.takes_payload(), &self.payload) {
            (true, None) => {
                return Err(PagewrightError::validation(format!(
                    "rule '{}' ({:?}) requires a payload",
                    self.name, self.mode
                )));
            }
            (false, Some(_)) => {
                return Err(PagewrightError::validation(format!(
                    "rule '{}' deletes text and must not carry a payload",
                    self.name
                )));
            }
            _ => {}
        }
        if self.occurrences == Occurrences::AtMost(0) {
            return Err(PagewrightError::validation(format!(
                "rule '{}' has an occurrence limit of 0",
                self.name
            )));
        }
        if self.requires.iter().any(|m| m.is_empty()) {
            return Err(PagewrightError::validation(format!(
                "rule '{}' declares an empty marker",
                self.name
            )));
        }
        if self.skip_if_present.as_deref() == Some("") {
            return Err(PagewrightError::validation(format!(
                "rule '{}' declares an empty skip sentinel",
                self.name
            )));
        }
        Ok(())
    }
}

pub fn rules_from_json(s: &str) -> PagewrightResult<Vec<PatchRule>> {
    let rules: Vec<PatchRule> = serde_json::from_str(s)?;
    for rule in &rules {
        rule.validate()?;
    }
    Ok(rules)
}

pub fn rules_to_json(rules: &[PatchRule]) -> PagewrightResult<String> {
    Ok(serde_json::to_string_pretty(rules)?)
}

pub type PagewrightResult<T> = Result<T, PagewrightError>;

#[derive(thiserror::Error, Debug)]
pub enum PagewrightError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("pattern error in rule #{rule_index} '{rule}': {reason}")]
    Pattern {
        rule_index: usize,
        rule: String,
        reason: String,
    },

    #[error("patch application error in rule #{rule_index} '{rule}': {reason}")]
    PatchApplication {
        rule_index: usize,
        rule: String,
        reason: String,
    },

    #[error("asset error: {0}")]
    Asset(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PagewrightError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn pattern(rule_index: usize, rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Pattern {
            rule_index,
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    pub fn patch(rule_index: usize, rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PatchApplication {
            rule_index,
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PagewrightError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

//! The built-in upgrade of the interactive training page.
//!
//! Stage order matters: the tour hooks call functions defined by the runtime script stage, and
//! they declare that with `requires` markers.

use crate::{
    foundation::error::PagewrightResult,
    patch::rule::PatchRule,
    runtime::{links::LinkMatch, script::RuntimeScript},
};

const TRAINING_CSS: &str = include_str!("recipe/training.css");

pub const CSS_SENTINEL: &str = "/* === ENHANCED CONTROL PANEL ANIMATIONS === */";
pub const SCRIPT_SENTINEL: &str = "// === BUTTON EXPLANATION AUDIO SYSTEM ===";

const WELCOME_NOTE: &str = "// Always show welcome modal (localStorage check removed for training)";
const PANEL_TRIGGER: &str = "showControlPanelWithAnimation(); // Show panel after welcome";
const LOCK_CALL: &str = "lockScroll(); // hold scroll during tour";
const UNLOCK_ON_COMPLETE: &str = "unlockScroll(); // tour finished";
const UNLOCK_ON_CANCEL: &str = "unlockScroll(); // tour cancelled";

#[derive(Clone, Debug)]
pub struct TrainingRecipe {
    pub script: RuntimeScript,
}

impl TrainingRecipe {
    pub fn new(link_match: LinkMatch) -> Self {
        Self {
            script: RuntimeScript::training(link_match),
        }
    }

    /// Ordered rule list. The runtime script stage carries the asset slot and lands at the top
    /// level of the last script block, where the tour hooks can reach its functions.
    pub fn rules(&self) -> PagewrightResult<Vec<PatchRule>> {
        let script = self.script.render()?;

        Ok(vec![
            PatchRule::insert(
                "control-panel-css",
                r"#training-controls button:focus \{[^}]+\}",
                TRAINING_CSS,
            )
            .skip_if_present(CSS_SENTINEL),
            PatchRule::delete(
                "remove-practice-form-button",
                r#"<button id="btn-practice-form"[^>]*>[^<]*</button>\s*"#,
            )
            .all()
            .optional(),
            PatchRule::replace(
                "welcome-modal-always",
                "function showWelcomeModal\\(\\) \\{\n  \
                 const hasVisited = localStorage\\.getItem\\('mpp-training-visited'\\);\n\n  \
                 if \\(!hasVisited\\) \\{",
                format!("function showWelcomeModal() {{\n  {WELCOME_NOTE}\n  {{"),
            )
            .all()
            .skip_if_present(WELCOME_NOTE),
            PatchRule::replace(
                "panel-reveal-trigger",
                r"localStorage\.setItem\('mpp-training-visited', 'true'\);\s*",
                format!("{PANEL_TRIGGER}\n      "),
            )
            .all()
            .skip_if_present(PANEL_TRIGGER),
            PatchRule::insert_before(
                "runtime-script",
                r"</script>\s*</body>",
                format!("{script}\n"),
            )
            .skip_if_present(SCRIPT_SENTINEL),
            PatchRule::insert(
                "tour-start-lock",
                r"window\.startTour = function\(\) \{",
                format!("\n    {LOCK_CALL}"),
            )
            .all()
            .requires("function lockScroll(")
            .skip_if_present(LOCK_CALL),
            PatchRule::insert_before(
                "tour-complete-unlock",
                r"trainingState\.tourComplete = true;\s*saveProgress\(\);",
                format!("{UNLOCK_ON_COMPLETE}\n      "),
            )
            .all()
            .requires("function unlockScroll(")
            .skip_if_present(UNLOCK_ON_COMPLETE),
            PatchRule::insert(
                "tour-cancel-unlock",
                r"\.on\('cancel', (?:function\s*\(\)|\(\)\s*=>)\s*\{",
                format!("\n      {UNLOCK_ON_CANCEL}"),
            )
            .all()
            .optional()
            .requires("function unlockScroll(")
            .skip_if_present(UNLOCK_ON_CANCEL),
            PatchRule::replace(
                "progress-total",
                r"const total = 4;",
                "const total = 3; // tour, hotspots (5), quiz",
            )
            .all(),
            PatchRule::delete(
                "progress-drop-form",
                r"\+ \(trainingState\.formPracticed \? 1 : 0\)",
            )
            .all(),
            PatchRule::replace(
                "remove-practice-form-fn",
                r"(?s)window\.practiceForm = function\(\) \{[^}]+\}[^}]+\};",
                "// practiceForm function removed",
            )
            .all()
            .optional(),
        ])
    }
}

impl Default for TrainingRecipe {
    fn default() -> Self {
        Self::new(LinkMatch::default())
    }
}

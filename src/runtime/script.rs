use crate::{
    foundation::error::{PagewrightError, PagewrightResult},
    patch::asset::ASSET_SLOT,
    runtime::{
        links::{LinkInterceptor, LinkMatch, LinkTable},
        sequencer::HighlightSchedule,
    },
};

const TEMPLATE: &str = include_str!("page_runtime.js");

/// Script installed into the page: highlight sequencer, panel reveal, tour scroll session and
/// link interception, with their tables filled in from the Rust models.
///
/// The asset slot is left in place; the patch engine fills it.
#[derive(Clone, Debug)]
pub struct RuntimeScript {
    pub schedule: HighlightSchedule,
    pub interceptor: LinkInterceptor,
    pub audio_mime: String,
    /// Delay before the control panel slides in.
    pub panel_delay_ms: u32,
    /// Delay between the panel appearing and narration starting.
    pub audio_delay_ms: u32,
}

impl RuntimeScript {
    pub fn training(link_match: LinkMatch) -> Self {
        Self {
            schedule: HighlightSchedule::training_controls(),
            interceptor: LinkInterceptor::new(LinkTable::training_resources(), link_match),
            audio_mime: "audio/mpeg".to_string(),
            panel_delay_ms: 300,
            audio_delay_ms: 500,
        }
    }

    pub fn render(&self) -> PagewrightResult<String> {
        if self.audio_mime.is_empty()
            || !self
                .audio_mime
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "/+.-".contains(c))
        {
            return Err(PagewrightError::validation(format!(
                "invalid audio mime type '{}'",
                self.audio_mime
            )));
        }

        let table = self.interceptor.table();
        let out = TEMPLATE
            .replace("__AUDIO_MIME__", &self.audio_mime)
            .replace("__HIGHLIGHT_WINDOWS__", &js_literal(&self.schedule)?)
            .replace("__LINK_DESCRIPTIONS__", &js_literal(table.entries())?)
            .replace("__LINK_FALLBACK__", &js_literal(table.fallback())?)
            .replace("__LINK_MATCH__", &js_literal(&self.interceptor.policy())?)
            .replace("__DIALOG_STYLE__", &js_literal(self.interceptor.style())?)
            .replace("__PANEL_DELAY_MS__", &self.panel_delay_ms.to_string())
            .replace("__AUDIO_DELAY_MS__", &self.audio_delay_ms.to_string());

        debug_assert_eq!(out.matches(ASSET_SLOT).count(), 1);
        Ok(out)
    }
}

/// JSON text that is also safe inside an inline `<script>` element.
pub fn js_literal<T: serde::Serialize + ?Sized>(value: &T) -> PagewrightResult<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_every_table() {
        let js = RuntimeScript::training(LinkMatch::Normalized).render().unwrap();
        for token in [
            "__AUDIO_MIME__",
            "__HIGHLIGHT_WINDOWS__",
            "__LINK_DESCRIPTIONS__",
            "__LINK_FALLBACK__",
            "__LINK_MATCH__",
            "__DIALOG_STYLE__",
            "__PANEL_DELAY_MS__",
            "__AUDIO_DELAY_MS__",
        ] {
            assert!(!js.contains(token), "{token} left in script");
        }
        assert_eq!(js.matches(ASSET_SLOT).count(), 1);
        assert!(js.contains("'data:audio/mpeg;base64,'"));
        assert!(js.contains(r#"{"targetId":"btn-take-quiz","start":8.5,"end":12.5}"#));
        assert!(js.contains(r#"const LINK_MATCH = "normalized";"#));
        assert!(js.contains(r#""title":"SAM.gov Registration""#));
        assert!(js.contains("}, 300);"));
        assert!(js.contains("ButtonExplanationAudio.play(), 500);"));
    }

    #[test]
    fn link_policy_is_carried_into_script() {
        let js = RuntimeScript::training(LinkMatch::Containment).render().unwrap();
        assert!(js.contains(r#"const LINK_MATCH = "containment";"#));
    }

    #[test]
    fn script_defines_hook_functions() {
        let js = RuntimeScript::training(LinkMatch::default()).render().unwrap();
        for name in [
            "function lockScroll(",
            "function unlockScroll(",
            "function showControlPanelWithAnimation(",
            "function interceptLinks(",
        ] {
            assert!(js.contains(name), "missing {name}");
        }
    }

    #[test]
    fn literal_cannot_close_the_script_element() {
        let s = js_literal("</script><script>alert(1)").unwrap();
        assert!(!s.contains("</script"));
        assert_eq!(s, r#""<\/script><script>alert(1)""#);
    }

    #[test]
    fn rejects_odd_mime() {
        let mut script = RuntimeScript::training(LinkMatch::default());
        script.audio_mime = "audio/mpeg';alert(1)//".to_string();
        assert!(script.render().is_err());
    }
}

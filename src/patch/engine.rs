use regex::Regex;

use crate::{
    foundation::error::{PagewrightError, PagewrightResult},
    patch::{
        asset::{ASSET_SLOT, AssetPayload, slot_value},
        rule::{PatchMode, PatchRule},
    },
};

/// What to do when a required rule cannot act.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Log a warning, record it in the report, keep going.
    #[default]
    Lenient,
    /// Abort the run with [`PagewrightError::PatchApplication`].
    Strict,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PatchOptions {
    pub strictness: Strictness,
}

/// Inputs the rules draw on besides the document itself.
#[derive(Clone, Debug, Default)]
pub struct PatchContext {
    pub asset: Option<AssetPayload>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RuleStatus {
    Applied { matches: usize },
    NoMatch,
    MissingMarker { marker: String },
    Skipped { sentinel: String },
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RuleOutcome {
    pub index: usize,
    pub name: String,
    pub required: bool,
    #[serde(flatten)]
    pub status: RuleStatus,
}

impl RuleOutcome {
    pub fn matches(&self) -> usize {
        match self.status {
            RuleStatus::Applied { matches } => matches,
            _ => 0,
        }
    }

    /// A required rule that did not transform anything.
    pub fn is_failure(&self) -> bool {
        self.required
            && matches!(
                self.status,
                RuleStatus::NoMatch | RuleStatus::MissingMarker { .. }
            )
    }
}

#[derive(Clone, Debug)]
pub struct PatchReport {
    pub document: String,
    pub outcomes: Vec<RuleOutcome>,
    pub warnings: Vec<String>,
}

impl PatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Apply `rules` in order, each one to the output of the previous one.
///
/// All anchors are compiled before the first rule runs, so a bad pattern never leaves a
/// half-patched document behind.
#[tracing::instrument(skip(document, rules, ctx), fields(rule_count = rules.len(), doc_bytes = document.len()))]
pub fn apply_patches(
    document: &str,
    rules: &[PatchRule],
    ctx: &PatchContext,
    opts: PatchOptions,
) -> PagewrightResult<PatchReport> {
    let mut compiled = Vec::with_capacity(rules.len());
    for (index, rule) in rules.iter().enumerate() {
        rule.validate()?;
        let re = Regex::new(&rule.anchor)
            .map_err(|e| PagewrightError::pattern(index, &rule.name, e.to_string()))?;
        compiled.push(re);
    }

    let mut warnings = Vec::new();
    let slot_rule = find_asset_slot(rules)?;
    if slot_rule.is_none() && ctx.asset.as_ref().is_some_and(|a| !a.is_empty()) {
        let msg = "asset supplied but no rule carries the asset slot".to_string();
        tracing::warn!("{msg}");
        warnings.push(msg);
    }

    let mut text = document.to_string();
    let mut outcomes = Vec::with_capacity(rules.len());

    for (index, (rule, re)) in rules.iter().zip(&compiled).enumerate() {
        if let Some(sentinel) = rule
            .skip_if_present
            .as_ref()
            .filter(|s| text.contains(s.as_str()))
        {
            tracing::debug!(rule = %rule.name, "sentinel present, skipping");
            outcomes.push(outcome(
                index,
                rule,
                RuleStatus::Skipped {
                    sentinel: sentinel.clone(),
                },
            ));
            continue;
        }

        if let Some(marker) = rule.requires.iter().find(|m| !text.contains(m.as_str())) {
            let reason = format!("required marker {marker:?} is not present");
            note_failure(index, rule, &reason, opts, &mut warnings)?;
            outcomes.push(outcome(
                index,
                rule,
                RuleStatus::MissingMarker {
                    marker: marker.clone(),
                },
            ));
            continue;
        }

        let payload = match rule.payload.as_deref() {
            Some(p) if slot_rule == Some(index) => p.replace(ASSET_SLOT, &slot_value(ctx.asset.as_ref())),
            Some(p) => p.to_string(),
            None => String::new(),
        };

        let (next, matches) = apply_rule(&text, re, rule.mode, &payload, rule.occurrences.limit());
        if matches == 0 {
            note_failure(index, rule, "anchor matched 0 times", opts, &mut warnings)?;
            outcomes.push(outcome(index, rule, RuleStatus::NoMatch));
            continue;
        }

        tracing::info!(rule = %rule.name, matches, "applied rule");
        text = next;
        outcomes.push(outcome(index, rule, RuleStatus::Applied { matches }));
    }

    Ok(PatchReport {
        document: text,
        outcomes,
        warnings,
    })
}

fn outcome(index: usize, rule: &PatchRule, status: RuleStatus) -> RuleOutcome {
    RuleOutcome {
        index,
        name: rule.name.clone(),
        required: rule.required,
        status,
    }
}

fn note_failure(
    index: usize,
    rule: &PatchRule,
    reason: &str,
    opts: PatchOptions,
    warnings: &mut Vec<String>,
) -> PagewrightResult<()> {
    if !rule.required {
        tracing::debug!(rule = %rule.name, "optional rule did not apply: {reason}");
        return Ok(());
    }
    match opts.strictness {
        Strictness::Strict => Err(PagewrightError::patch(index, &rule.name, reason)),
        Strictness::Lenient => {
            tracing::warn!(rule = %rule.name, index, "{reason}");
            warnings.push(format!("rule #{index} '{}': {reason}", rule.name));
            Ok(())
        }
    }
}

/// Index of the single rule whose payload holds [`ASSET_SLOT`].
fn find_asset_slot(rules: &[PatchRule]) -> PagewrightResult<Option<usize>> {
    let mut found = None;
    for (index, rule) in rules.iter().enumerate() {
        let Some(payload) = rule.payload.as_deref() else {
            continue;
        };
        let n = payload.matches(ASSET_SLOT).count();
        if n == 0 {
            continue;
        }
        if n > 1 || found.is_some() {
            return Err(PagewrightError::validation(
                "asset slot must appear in exactly one rule payload",
            ));
        }
        found = Some(index);
    }
    Ok(found)
}

fn apply_rule(
    text: &str,
    re: &Regex,
    mode: PatchMode,
    payload: &str,
    limit: Option<usize>,
) -> (String, usize) {
    let mut out = String::with_capacity(text.len() + payload.len());
    let mut last = 0usize;
    let mut count = 0usize;

    for caps in re.captures_iter(text) {
        if limit.is_some_and(|n| count >= n) {
            break;
        }
        let Some(m) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..m.start()]);
        match mode {
            PatchMode::Insert => {
                out.push_str(m.as_str());
                out.push_str(payload);
            }
            PatchMode::InsertBefore => {
                out.push_str(payload);
                out.push_str(m.as_str());
            }
            PatchMode::Replace => caps.expand(payload, &mut out),
            PatchMode::Delete => {}
        }
        last = m.end();
        count += 1;
    }

    if count == 0 {
        return (text.to_string(), 0);
    }
    out.push_str(&text[last..]);
    (out, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(doc: &str, rules: &[PatchRule]) -> PatchReport {
        apply_patches(doc, rules, &PatchContext::default(), PatchOptions::default()).unwrap()
    }

    fn strict() -> PatchOptions {
        PatchOptions {
            strictness: Strictness::Strict,
        }
    }

    #[test]
    fn insert_keeps_anchor_and_appends() {
        let r = run("a{x}b", &[PatchRule::insert("i", r"\{x\}", "Y")]);
        assert_eq!(r.document, "a{x}Yb");
        assert_eq!(r.outcomes[0].matches(), 1);
    }

    #[test]
    fn insert_before_keeps_anchor_and_prepends() {
        let r = run("save();", &[PatchRule::insert_before("i", r"save\(\);", "unlock();")]);
        assert_eq!(r.document, "unlock();save();");
    }

    #[test]
    fn insert_payload_is_literal() {
        let r = run("x", &[PatchRule::insert("i", "x", "`-${offset}px` $1")]);
        assert_eq!(r.document, "x`-${offset}px` $1");
    }

    #[test]
    fn replace_expands_capture_groups() {
        let r = run(
            "const total = 4; const total = 4;",
            &[PatchRule::replace("t", r"total = (\d)", "count = ${1}0")],
        );
        assert_eq!(r.document, "const count = 40; const total = 4;");

        let r = run(
            "const total = 4; const total = 4;",
            &[PatchRule::replace("t", r"total = (?P<n>\d)", "n=$n").all()],
        );
        assert_eq!(r.document, "const n=4; const n=4;");
        assert_eq!(r.outcomes[0].matches(), 2);
    }

    #[test]
    fn delete_respects_occurrence_limit() {
        let r = run("a-b-c-d", &[PatchRule::delete("d", "-").at_most(2)]);
        assert_eq!(r.document, "abc-d");
        assert_eq!(r.outcomes[0].matches(), 2);

        let r = run("a-b-c-d", &[PatchRule::delete("d", "-").all()]);
        assert_eq!(r.document, "abcd");
    }

    #[test]
    fn zero_matches_is_reported_in_lenient_mode() {
        let r = run("abc", &[PatchRule::replace("missing", "zzz", "y")]);
        assert_eq!(r.document, "abc");
        assert_eq!(r.outcomes[0].status, RuleStatus::NoMatch);
        assert_eq!(r.failures().count(), 1);
        assert!(!r.is_clean());
    }

    #[test]
    fn zero_matches_fails_in_strict_mode() {
        let err = apply_patches(
            "abc",
            &[
                PatchRule::replace("ok", "a", "A"),
                PatchRule::replace("missing", "zzz", "y"),
            ],
            &PatchContext::default(),
            strict(),
        )
        .unwrap_err();
        match err {
            PagewrightError::PatchApplication {
                rule_index, rule, ..
            } => {
                assert_eq!(rule_index, 1);
                assert_eq!(rule, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn optional_rules_never_fail() {
        let r = apply_patches(
            "abc",
            &[PatchRule::delete("cleanup", "zzz").optional()],
            &PatchContext::default(),
            strict(),
        )
        .unwrap();
        assert!(r.is_clean());
        assert_eq!(r.outcomes[0].status, RuleStatus::NoMatch);
        assert!(!r.outcomes[0].is_failure());
    }

    #[test]
    fn rules_compose_sequentially() {
        let define = PatchRule::insert("define", "<script>", "function hook() {}");
        let call = PatchRule::insert("call", r"function hook\(\) \{", " run();");

        let ordered = run("<script></script>", &[define.clone(), call.clone()]);
        assert!(ordered.is_clean());
        assert_eq!(ordered.document, "<script>function hook() { run();}</script>");

        let reordered = run("<script></script>", &[call, define]);
        assert_eq!(reordered.outcomes[0].status, RuleStatus::NoMatch);
        assert!(reordered.outcomes[0].is_failure());
    }

    #[test]
    fn missing_marker_blocks_rule() {
        let rule = PatchRule::insert("lock", "start", " lock();").requires("function lock(");
        let r = run("start", &[rule]);
        assert_eq!(r.document, "start");
        assert!(matches!(
            r.outcomes[0].status,
            RuleStatus::MissingMarker { .. }
        ));
        assert!(r.outcomes[0].is_failure());
    }

    #[test]
    fn sentinel_makes_rerun_a_noop() {
        let rules = [PatchRule::insert("css", "</style>", "/* extra */").skip_if_present("/* extra */")];
        let once = run("<style></style>", &rules);
        let twice = run(&once.document, &rules);
        assert_eq!(once.document, twice.document);
        assert!(matches!(twice.outcomes[0].status, RuleStatus::Skipped { .. }));
    }

    #[test]
    fn output_is_deterministic() {
        let rules = [
            PatchRule::replace("a", "(b+)", "[$1]").all(),
            PatchRule::delete("d", "c"),
        ];
        let doc = "abbcabc";
        assert_eq!(run(doc, &rules).document, run(doc, &rules).document);
    }

    #[test]
    fn bad_pattern_fails_before_any_rule_runs() {
        let err = apply_patches(
            "abc",
            &[PatchRule::replace("ok", "a", "A"), PatchRule::delete("bad", "(")],
            &PatchContext::default(),
            PatchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PagewrightError::Pattern { rule_index: 1, .. }));
    }

    #[test]
    fn asset_fills_exactly_one_slot() {
        let rule = PatchRule::insert("js", "<script>", format!("const A = '{ASSET_SLOT}';"));
        let ctx = PatchContext {
            asset: Some(AssetPayload::from_bytes(b"abc".to_vec())),
        };
        let r = apply_patches("<script>", &[rule.clone()], &ctx, PatchOptions::default()).unwrap();
        assert_eq!(r.document, "<script>const A = 'YWJj';");

        let r = run("<script>", &[rule.clone()]);
        assert_eq!(r.document, "<script>const A = '';");

        let err = apply_patches(
            "<script>",
            &[rule.clone(), rule],
            &PatchContext::default(),
            PatchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PagewrightError::Validation(_)));
    }

    #[test]
    fn unused_asset_is_a_warning() {
        let ctx = PatchContext {
            asset: Some(AssetPayload::from_bytes(b"abc".to_vec())),
        };
        let r = apply_patches("x", &[PatchRule::replace("r", "x", "y")], &ctx, PatchOptions::default())
            .unwrap();
        assert_eq!(r.document, "y");
        assert_eq!(r.warnings.len(), 1);
    }
}

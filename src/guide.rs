//! # Pagewright guide
//!
//! A walkthrough of how a training page gets upgraded and what the upgraded page does at runtime.
//! For command lines, run `pagewright --help`.
//!
//! ---
//!
//! ## Two phases
//!
//! 1. **Build time.** [`apply_patches`](crate::apply_patches) takes the document text and an
//!    ordered list of [`PatchRule`](crate::PatchRule)s and derives new text. Nothing is parsed
//!    into a tree; every rule locates a regular-expression anchor in the *current* text.
//! 2. **Page time.** One of the rules injects a script. That script drives the highlight
//!    sequencer, the link interceptor and the tour scroll lock. Each of these is also modeled in
//!    Rust ([`HighlightSequencer`](crate::HighlightSequencer),
//!    [`LinkInterceptor`](crate::LinkInterceptor), [`TourSession`](crate::TourSession)), and the
//!    script's tables are serialized from those same Rust values by
//!    [`RuntimeScript`](crate::RuntimeScript).
//!
//! ---
//!
//! ## Rules
//!
//! | mode            | effect at each match                              |
//! |-----------------|---------------------------------------------------|
//! | `insert`        | matched text, then payload                        |
//! | `insert_before` | payload, then matched text                        |
//! | `replace`       | payload with `$1` / `${name}` expanded            |
//! | `delete`        | nothing                                           |
//!
//! Insert payloads are literal, so script text containing `${...}` template literals is safe
//! there. In replace payloads write `$$` for a literal dollar.
//!
//! Rules run in declaration order, each on the previous rule's output. A rule can declare
//! `requires` markers (literals an earlier stage must have produced) and a `skip_if_present`
//! sentinel that turns a re-run into a no-op.
//!
//! ```
//! use pagewright::{PatchContext, PatchOptions, PatchRule, apply_patches};
//!
//! let rules = [
//!     PatchRule::insert("define", "<script>", "function hook() {}"),
//!     PatchRule::insert("call", r"function hook\(\) \{", " run();").requires("function hook("),
//! ];
//! let report = apply_patches(
//!     "<script></script>",
//!     &rules,
//!     &PatchContext::default(),
//!     PatchOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(report.document, "<script>function hook() { run();}</script>");
//! assert!(report.is_clean());
//! ```
//!
//! ---
//!
//! ## When an anchor is missing
//!
//! Every rule reports how many matches it transformed ([`RuleOutcome`](crate::RuleOutcome)).
//! A required rule with zero matches (or a missing marker) is:
//!
//! - a `warn!` plus an entry in [`PatchReport::warnings`](crate::PatchReport) under
//!   [`Strictness::Lenient`](crate::Strictness), the library default;
//! - a [`PagewrightError::PatchApplication`](crate::PagewrightError) under
//!   [`Strictness::Strict`](crate::Strictness) (`pagewright --strict`).
//!
//! Optional rules only log at debug level.
//!
//! ---
//!
//! ## The audio asset
//!
//! The narration audio is inlined as base64 into the single payload carrying
//! [`ASSET_SLOT`](crate::ASSET_SLOT). Without an asset the slot becomes
//! [`EMPTY_ASSET_MARKER`](crate::EMPTY_ASSET_MARKER), the data URI has no body, and the page
//! script quietly disables narration and highlights.
//!
//! ---
//!
//! ## Runtime behavior
//!
//! - **Highlights**: on every playback time update the active set is exactly the buttons whose
//!   `[start, end)` window contains the current time. At `4.5s` with windows
//!   `[0, 4.5)` and `[4.5, 8.5)` only the second is lit. End of playback and `stop` clear
//!   everything.
//! - **Links**: clicks on non-fragment links open a dialog instead of navigating. Targets are
//!   matched by normalized URL ([`LinkMatch::Normalized`](crate::LinkMatch)) or, optionally, by
//!   two-way substring containment. Unknown targets get the "External Link" fallback.
//! - **Scroll lock**: starting the tour pins the page at the current offset; completing or
//!   cancelling it restores that offset. A second lock while one is held is refused.

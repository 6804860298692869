//! Pagewright patches a hand-authored training page in place.
//!
//! - [`apply_patches`] runs an ordered list of [`PatchRule`]s over the document text
//! - [`TrainingRecipe`] is the built-in rule list, including the page runtime script
//! - the runtime pieces that script installs are modeled (and tested) in Rust:
//!   [`HighlightSequencer`], [`LinkInterceptor`] and [`TourSession`]
//!
//! See [`guide`] for the full walkthrough.
#![forbid(unsafe_code)]

mod foundation;

pub mod guide;
pub mod patch;
pub mod pipeline;
pub mod recipe;
pub mod runtime;

pub use crate::foundation::core::{ScrollOffset, TimeWindow};
pub use crate::foundation::error::{PagewrightError, PagewrightResult};

pub use crate::patch::asset::{ASSET_SLOT, AssetPayload, EMPTY_ASSET_MARKER, slot_value};
pub use crate::patch::engine::{
    PatchContext, PatchOptions, PatchReport, RuleOutcome, RuleStatus, Strictness, apply_patches,
};
pub use crate::patch::rule::{Occurrences, PatchMode, PatchRule, rules_from_json, rules_to_json};
pub use crate::pipeline::upgrade_document;
pub use crate::recipe::TrainingRecipe;
pub use crate::runtime::links::{
    DialogRequest, DialogStyle, LinkDescriptor, LinkInterceptor, LinkMatch, LinkTable,
    is_interceptable, normalize_url,
};
pub use crate::runtime::script::RuntimeScript;
pub use crate::runtime::scroll::{TourEnd, TourSession, Viewport};
pub use crate::runtime::sequencer::{
    HighlightSchedule, HighlightSequencer, HighlightSurface, HighlightWindow, MediaElement,
    PlaybackRejected, SequencerState,
};

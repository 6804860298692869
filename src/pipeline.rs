use crate::{
    foundation::error::PagewrightResult,
    patch::{
        asset::AssetPayload,
        engine::{PatchContext, PatchOptions, PatchReport, apply_patches},
    },
    recipe::TrainingRecipe,
};

/// Render the recipe's rules and apply them to `document`.
pub fn upgrade_document(
    document: &str,
    recipe: &TrainingRecipe,
    asset: Option<AssetPayload>,
    opts: PatchOptions,
) -> PagewrightResult<PatchReport> {
    let rules = recipe.rules()?;
    apply_patches(document, &rules, &PatchContext { asset }, opts)
}

use crate::foundation::core::{ColorId, PageType};
use crate::model::ImageAsset;

/// Whether `asset` may appear on `page` under the active folder color.
///
/// - No `destinations` at all: matches everything.
/// - Non-empty `pages`: `page` must be listed.
/// - An active color: a non-empty `folder_colors` must list it.
/// - No active color: color-scoped assets are excluded.
pub fn image_matches_destination(
    asset: &ImageAsset,
    page: PageType,
    folder_color: Option<&ColorId>,
) -> bool {
    let Some(dest) = &asset.destinations else {
        return true;
    };

    if !dest.pages.is_empty() && !dest.pages.contains(&page) {
        return false;
    }

    match folder_color.filter(|c| !c.as_str().is_empty()) {
        Some(color) => dest.folder_colors.is_empty() || dest.folder_colors.contains(color),
        None => dest.folder_colors.is_empty(),
    }
}

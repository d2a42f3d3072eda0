pub mod memo;
pub mod strategy;

use crate::context::BannerContext;
use crate::index::{LibraryIndex, ThemeConfig};
use crate::resolved::ResolvedImage;

pub use strategy::{ResolveInput, Strategy};

/// A resolved banner and the source that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub strategy: Strategy,
    pub image: ResolvedImage,
}

/// Ordered cascade of override sources; the first one that resolves wins.
#[derive(Clone, Debug)]
pub struct OverrideResolver {
    cascade: Vec<Strategy>,
}

impl Default for OverrideResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OverrideResolver {
    /// The standard banner cascade ([`Strategy::CASCADE`]).
    pub fn new() -> Self {
        Self {
            cascade: Strategy::CASCADE.to_vec(),
        }
    }

    /// A resolver over a custom ordering.
    pub fn with_cascade(cascade: impl Into<Vec<Strategy>>) -> Self {
        Self {
            cascade: cascade.into(),
        }
    }

    pub fn cascade(&self) -> &[Strategy] {
        &self.cascade
    }

    /// Resolve the banner for `ctx`. `None` means render no overlay.
    pub fn resolve(&self, ctx: &BannerContext, index: &LibraryIndex) -> Option<ResolvedImage> {
        self.resolve_traced(ctx, index).map(|r| r.image)
    }

    /// Like [`OverrideResolver::resolve`], also reporting which source won.
    #[tracing::instrument(level = "debug", skip(self, index), fields(seed = ctx.seed()))]
    pub fn resolve_traced(&self, ctx: &BannerContext, index: &LibraryIndex) -> Option<Resolution> {
        let theme = ThemeConfig::capture(index);
        let input = ResolveInput {
            ctx,
            index,
            theme: &theme,
        };

        for &strategy in &self.cascade {
            if let Some(image) = strategy.try_resolve(&input) {
                tracing::debug!(
                    strategy = strategy.name(),
                    image_id = image.image_id.as_ref().map(|i| i.as_str()),
                    "banner resolved"
                );
                return Some(Resolution { strategy, image });
            }
        }

        tracing::debug!("no banner source resolved");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StoreSnapshot;
    use serde_json::json;

    fn index() -> LibraryIndex {
        let snap: StoreSnapshot = serde_json::from_value(json!({
            "imageFolders": [
                { "id": "default", "selectionPolicy": "sequential",
                  "images": [ { "id": "d", "imageData": "data:d" } ] }
            ],
            "bannerBindings": {
                "7": { "image": "data:playlist" },
                "7:red": { "image": "data:red" }
            }
        }))
        .unwrap();
        LibraryIndex::new(snap)
    }

    #[test]
    fn first_success_wins() {
        let idx = index();
        let ctx = BannerContext::from_navigation("Videos", Some("7".into()), Some("red".into()));
        let r = OverrideResolver::new().resolve_traced(&ctx, &idx).unwrap();
        assert_eq!(r.strategy, Strategy::FolderBinding);
        assert_eq!(r.image.image, "data:red");

        let ctx = BannerContext::from_navigation("Videos", Some("7".into()), Some("blue".into()));
        let r = OverrideResolver::new().resolve_traced(&ctx, &idx).unwrap();
        assert_eq!(r.strategy, Strategy::PlaylistBinding);
    }

    #[test]
    fn cascade_can_be_reordered() {
        let idx = index();
        let ctx = BannerContext::from_navigation("Videos", Some("7".into()), Some("red".into()));
        let resolver =
            OverrideResolver::with_cascade([Strategy::DefaultLibrary, Strategy::FolderBinding]);
        let r = resolver.resolve_traced(&ctx, &idx).unwrap();
        assert_eq!(r.strategy, Strategy::DefaultLibrary);
        assert_eq!(r.image.image, "data:d");
    }

    #[test]
    fn empty_cascade_resolves_nothing() {
        let idx = index();
        let ctx = BannerContext::from_navigation("Videos", Some("7".into()), None);
        assert!(
            OverrideResolver::with_cascade(Vec::new())
                .resolve(&ctx, &idx)
                .is_none()
        );
    }
}

use crate::foundation::core::{ColorId, PageType, PlaylistId};

/// The viewing context a banner is resolved for.
///
/// Immutable once built; the seed is derived from the other fields so two equal contexts always
/// carry equal seeds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BannerContext {
    page_title: String,
    page_type: PageType,
    playlist_id: Option<PlaylistId>,
    playlist_name: Option<String>,
    folder_color: Option<ColorId>,
    seed: String,
}

impl BannerContext {
    /// Build a context from what the navigation layer knows.
    ///
    /// The page type is inferred from the title. An empty folder color counts as none.
    pub fn from_navigation(
        page_title: impl Into<String>,
        playlist_id: Option<PlaylistId>,
        folder_color: Option<ColorId>,
    ) -> Self {
        let page_title = page_title.into();
        let page_type = PageType::from_title(&page_title);
        Self::new(page_title, page_type, playlist_id, folder_color)
    }

    /// Build a context with an explicit page type.
    pub fn new(
        page_title: impl Into<String>,
        page_type: PageType,
        playlist_id: Option<PlaylistId>,
        folder_color: Option<ColorId>,
    ) -> Self {
        let page_title = page_title.into();
        let playlist_id = playlist_id.filter(|p| !p.as_str().is_empty());
        let folder_color = folder_color.filter(|c| !c.as_str().is_empty());
        let seed = format!(
            "{}-{}-{}",
            playlist_id.as_ref().map_or("none", |p| p.as_str()),
            folder_color.as_ref().map_or(ColorId::UNSORTED, |c| c.as_str()),
            page_title
        );
        Self {
            page_title,
            page_type,
            playlist_id,
            playlist_name: None,
            folder_color,
            seed,
        }
    }

    /// Attach the active playlist's display name (used for name-based orb bindings).
    ///
    /// The name does not take part in the seed.
    pub fn with_playlist_name(mut self, name: impl Into<String>) -> Self {
        self.playlist_name = Some(name.into());
        self
    }

    pub fn page_title(&self) -> &str {
        &self.page_title
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn playlist_id(&self) -> Option<&PlaylistId> {
        self.playlist_id.as_ref()
    }

    pub fn playlist_name(&self) -> Option<&str> {
        self.playlist_name.as_deref()
    }

    /// Active folder color, possibly a sentinel.
    pub fn folder_color(&self) -> Option<&ColorId> {
        self.folder_color.as_ref()
    }

    /// Seed for every seeded pick made in this context.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// `true` when the page title names the Unsorted view.
    pub fn is_unsorted_view(&self) -> bool {
        self.page_title.to_ascii_lowercase().contains("unsorted")
    }

    /// Key to look up in a folder's color assignments.
    ///
    /// The active color when there is one, else `unsorted` on the Unsorted view and `all`
    /// everywhere else.
    pub fn assignment_slot(&self) -> ColorId {
        match &self.folder_color {
            Some(c) => c.clone(),
            None if self.is_unsorted_view() => ColorId::from(ColorId::UNSORTED),
            None => ColorId::from(ColorId::ALL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_composite_of_context() {
        let ctx = BannerContext::from_navigation("Videos", Some("1".into()), None);
        assert_eq!(ctx.seed(), "1-unsorted-Videos");
        let ctx = BannerContext::from_navigation("Videos", Some("42".into()), Some("red".into()));
        assert_eq!(ctx.seed(), "42-red-Videos");
        let ctx = BannerContext::from_navigation("Settings", None, None);
        assert_eq!(ctx.seed(), "none-unsorted-Settings");
    }

    #[test]
    fn equal_inputs_equal_contexts() {
        let a = BannerContext::from_navigation("Likes", Some("9".into()), Some("blue".into()));
        let b = BannerContext::from_navigation("Likes", Some("9".into()), Some("blue".into()));
        assert_eq!(a, b);
        assert_eq!(a.page_type(), PageType::Likes);
    }

    #[test]
    fn empty_color_and_playlist_are_none() {
        let ctx = BannerContext::from_navigation("Videos", Some("".into()), Some("".into()));
        assert!(ctx.playlist_id().is_none());
        assert!(ctx.folder_color().is_none());
    }

    #[test]
    fn assignment_slot_sentinels() {
        let ctx = BannerContext::from_navigation("Mix - Unsorted", Some("1".into()), None);
        assert_eq!(ctx.assignment_slot().as_str(), "unsorted");
        let ctx = BannerContext::from_navigation("Mix", Some("1".into()), None);
        assert_eq!(ctx.assignment_slot().as_str(), "all");
        let ctx = BannerContext::from_navigation("Mix", Some("1".into()), Some("red".into()));
        assert_eq!(ctx.assignment_slot().as_str(), "red");
    }
}

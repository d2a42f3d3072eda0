use kurbo::{Affine, Size};

use crate::color::parse_bg_color;
use crate::foundation::core::{FolderId, ImageId, Rgba8Premul};
use crate::model::{BannerLiteral, ImageAsset, OrbGroup, OverrideBinding};

/// The banner overlay picked for a context: image plus transform.
///
/// A plain value; two results are the same result when all fields are equal.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    pub image: String,
    /// Zoom in percent.
    pub scale: f64,
    /// Horizontal position in percent.
    pub x_offset: f64,
    /// Vertical position in percent.
    pub y_offset: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<ImageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

/// What the transition controller compares to decide whether the picture changed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DisplayIdentity {
    /// A library asset, by id.
    Asset(ImageId),
    /// An image without an asset id, by payload.
    Raw(String),
    /// Nothing displayed.
    Nothing,
}

impl DisplayIdentity {
    /// Identity of an optional resolution: asset id, else raw image, else nothing.
    pub fn of(image: Option<&ResolvedImage>) -> Self {
        match image {
            Some(r) => match &r.image_id {
                Some(id) => Self::Asset(id.clone()),
                None if !r.image.is_empty() => Self::Raw(r.image.clone()),
                None => Self::Nothing,
            },
            None => Self::Nothing,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }
}

impl ResolvedImage {
    /// Live values of a library asset.
    pub fn from_asset(asset: &ImageAsset, folder_id: &FolderId) -> Self {
        Self {
            image: asset.image.clone(),
            scale: asset.scale,
            x_offset: asset.x_offset,
            y_offset: asset.y_offset,
            image_id: Some(asset.id.clone()),
            folder_id: Some(folder_id.clone()),
            bg_color: asset.bg_color.clone(),
        }
    }

    /// Values stored on a binding, or `None` when it stores no image.
    pub fn from_binding(binding: &OverrideBinding) -> Option<Self> {
        let image = binding.image.as_deref().filter(|s| !s.is_empty())?;
        Some(Self {
            image: image.to_owned(),
            scale: binding.scale,
            x_offset: binding.x_offset,
            y_offset: binding.y_offset,
            image_id: binding.image_id.clone(),
            folder_id: binding.folder_id.clone(),
            bg_color: binding.bg_color.clone(),
        })
    }

    pub fn from_literal(lit: &BannerLiteral) -> Self {
        Self {
            image: lit.image.clone(),
            scale: lit.scale,
            x_offset: lit.x_offset,
            y_offset: lit.y_offset,
            image_id: None,
            folder_id: None,
            bg_color: lit.bg_color.clone(),
        }
    }

    /// Orb groups are identified by their group id.
    pub fn from_orb(orb: &OrbGroup) -> Self {
        Self {
            image: orb.image.clone(),
            scale: orb.scale,
            x_offset: orb.x_offset,
            y_offset: orb.y_offset,
            image_id: Some(ImageId::new(format!("orb:{}", orb.id))),
            folder_id: None,
            bg_color: orb.bg_color.clone(),
        }
    }

    pub fn identity(&self) -> DisplayIdentity {
        DisplayIdentity::of(Some(self))
    }

    /// Parsed background color, if present and well-formed.
    pub fn bg_rgba8(&self) -> Option<Rgba8Premul> {
        self.bg_color.as_deref().and_then(parse_bg_color)
    }

    /// `true` when the other result carries the same transform and background.
    pub fn same_presentation(&self, other: &Self) -> bool {
        self.scale == other.scale
            && self.x_offset == other.x_offset
            && self.y_offset == other.y_offset
            && self.bg_color == other.bg_color
    }

    /// Placement of an image of `natural` size inside a `viewport`.
    ///
    /// The image first covers the viewport, is then zoomed by `scale` percent, and is positioned
    /// so that `x_offset`/`y_offset` percent of the overflow lies left/above, the same way a CSS
    /// `background-position` percentage works.
    pub fn placement(&self, viewport: Size, natural: Size) -> Affine {
        let zoom = (self.scale / 100.0).max(0.0);
        if natural.width <= 0.0 || natural.height <= 0.0 {
            return Affine::scale(zoom);
        }
        let cover = (viewport.width / natural.width).max(viewport.height / natural.height);
        let s = cover * zoom;
        let tx = (viewport.width - natural.width * s) * (self.x_offset / 100.0);
        let ty = (viewport.height - natural.height * s) * (self.y_offset / 100.0);
        Affine::translate((tx, ty)) * Affine::scale(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(image_id: Option<&str>, image: &str) -> ResolvedImage {
        ResolvedImage {
            image: image.to_string(),
            scale: 100.0,
            x_offset: 50.0,
            y_offset: 50.0,
            image_id: image_id.map(ImageId::from),
            folder_id: None,
            bg_color: None,
        }
    }

    #[test]
    fn identity_prefers_asset_id() {
        assert_eq!(
            resolved(Some("a"), "data:a").identity(),
            DisplayIdentity::Asset("a".into())
        );
        assert_eq!(
            resolved(None, "data:a").identity(),
            DisplayIdentity::Raw("data:a".into())
        );
        assert_eq!(resolved(None, "").identity(), DisplayIdentity::Nothing);
        assert_eq!(DisplayIdentity::of(None), DisplayIdentity::Nothing);
    }

    #[test]
    fn presentation_ignores_payload_and_ids() {
        let a = resolved(Some("a"), "data:a");
        let mut b = resolved(Some("b"), "data:b");
        assert!(a.same_presentation(&b));
        b.bg_color = Some("#000".to_string());
        assert!(!a.same_presentation(&b));
        let mut c = resolved(Some("a"), "data:a");
        c.y_offset = 0.0;
        assert!(!a.same_presentation(&c));
    }

    #[test]
    fn binding_without_image_is_unresolved() {
        let b = OverrideBinding {
            image: Some(String::new()),
            scale: 100.0,
            x_offset: 50.0,
            y_offset: 50.0,
            bg_color: None,
            image_id: None,
            folder_id: None,
        };
        assert!(ResolvedImage::from_binding(&b).is_none());
    }

    #[test]
    fn placement_centers_covering_image() {
        let r = resolved(None, "x");
        let a = r.placement(Size::new(200.0, 100.0), Size::new(100.0, 100.0));
        // cover = 2, scaled 200x200, vertical overflow 100 split evenly.
        let c = a.as_coeffs();
        assert_eq!(c[0], 2.0);
        assert_eq!(c[3], 2.0);
        assert_eq!(c[4], 0.0);
        assert_eq!(c[5], -50.0);
    }

    #[test]
    fn placement_of_degenerate_image() {
        let r = resolved(None, "x");
        let a = r.placement(Size::new(200.0, 100.0), Size::ZERO);
        assert_eq!(a, Affine::scale(1.0));
    }

    #[test]
    fn bg_color_parses() {
        let mut r = resolved(None, "x");
        r.bg_color = Some("#000000".to_string());
        assert_eq!(r.bg_rgba8().unwrap().a, 255);
        r.bg_color = Some("nope".to_string());
        assert!(r.bg_rgba8().is_none());
    }
}

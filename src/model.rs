use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use crate::foundation::core::{
    AssetRef, ColorId, FolderId, ImageId, OrbGroupId, PageType, PlaylistId,
};
use crate::foundation::error::{BannerError, BannerResult};

fn default_scale() -> f64 {
    100.0
}

fn default_offset() -> f64 {
    50.0
}

/// Page list that drops names it does not know instead of rejecting the whole store.
fn deserialize_known_pages<'de, D>(deserializer: D) -> Result<BTreeSet<PageType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Known(PageType),
        Unknown(serde::de::IgnoredAny),
    }

    let entries = <Vec<Entry> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|e| match e {
            Entry::Known(page) => Some(page),
            Entry::Unknown(_) => None,
        })
        .collect())
}

/// How a folder picks among several eligible images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Always the first eligible image.
    Sequential,
    /// Seeded pick, stable per viewing context. Unknown policies read as random.
    #[default]
    #[serde(other)]
    Random,
}

/// Where an asset is allowed to appear.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Destinations {
    /// Page types the asset may show on. Empty means any page. Unknown names are dropped.
    #[serde(deserialize_with = "deserialize_known_pages")]
    pub pages: BTreeSet<PageType>,
    /// Folder colors the asset is scoped to. Empty means no color scoping.
    pub folder_colors: BTreeSet<ColorId>,
}

/// A group member reference as persisted.
///
/// Older stores write `"folderId:imageId"` strings, newer ones write objects. Both are turned into
/// an [`AssetRef`] by [`MemberKey::asset_ref`]; an unparseable string simply refers to nothing.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MemberKey {
    /// Explicit `{folderId, imageId}` object.
    Explicit(AssetRef),
    /// Composite `"folderId:imageId"` string.
    Composite(String),
}

impl MemberKey {
    /// Typed reference, or `None` when the composite key is malformed.
    pub fn asset_ref(&self) -> Option<AssetRef> {
        match self {
            Self::Explicit(r) => Some(r.clone()),
            Self::Composite(s) => AssetRef::parse_composite(s),
        }
    }
}

impl From<AssetRef> for MemberKey {
    fn from(r: AssetRef) -> Self {
        Self::Explicit(r)
    }
}

/// One image in a folder, with its banner transform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub id: ImageId,
    /// Image payload (data URL or file URL), opaque to the engine. Empty on half-written
    /// records; such assets are never selected.
    #[serde(default, rename = "imageData", alias = "image")]
    pub image: String,
    /// Zoom in percent.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Horizontal position in percent.
    #[serde(default = "default_offset")]
    pub x_offset: f64,
    /// Vertical position in percent.
    #[serde(default = "default_offset")]
    pub y_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destinations: Option<Destinations>,
    /// Non-owning links to other assets forming a group led by this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_members: Vec<MemberKey>,
}

/// A named collection of images. Insertion order is display order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFolder {
    pub id: FolderId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageAsset>,
    #[serde(default)]
    pub selection_policy: SelectionPolicy,
    /// Playlists this folder is bound to as their standard banner group.
    #[serde(default)]
    pub playlist_ids: Vec<PlaylistId>,
    /// Folder color (or `all`/`unsorted`) to a specific image in this folder.
    #[serde(default)]
    pub color_assignments: BTreeMap<ColorId, ImageId>,
    /// Legacy app-wide theme binding.
    #[serde(default)]
    pub is_theme_folder: bool,
}

impl ImageAsset {
    /// `false` for records without an image payload.
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

impl ImageFolder {
    /// Look up an image of this folder by id.
    pub fn image(&self, id: &ImageId) -> Option<&ImageAsset> {
        self.images.iter().find(|img| &img.id == id)
    }
}

/// Literal banner values: image plus transform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerLiteral {
    #[serde(default, alias = "imageData")]
    pub image: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_offset")]
    pub x_offset: f64,
    #[serde(default = "default_offset")]
    pub y_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

/// A user-set override for a playlist, or for one folder color of a playlist.
///
/// Always carries the values that were current when it was saved. When it also points at a
/// library asset (`imageId` + `folderId`) that still exists, the live asset wins.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideBinding {
    #[serde(default, alias = "imageData")]
    pub image: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_offset")]
    pub x_offset: f64,
    #[serde(default = "default_offset")]
    pub y_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<ImageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
}

impl OverrideBinding {
    /// Library asset this binding points at, if any.
    pub fn source(&self) -> Option<AssetRef> {
        match (&self.folder_id, &self.image_id) {
            (Some(f), Some(i)) => Some(AssetRef::new(f.clone(), i.clone())),
            _ => None,
        }
    }
}

/// Leader-plus-members cluster bound to playlists for the orb slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbGroup {
    pub id: OrbGroupId,
    /// Playlist ids or playlist names. Absent on groups that were never bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_ids: Option<Vec<PlaylistId>>,
    #[serde(default, alias = "imageData")]
    pub image: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_offset")]
    pub x_offset: f64,
    #[serde(default = "default_offset")]
    pub y_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Folder colors this group is tagged with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folder_colors: Vec<ColorId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_members: Vec<OrbGroupId>,
}

impl OrbGroup {
    /// `false` for groups without an image payload.
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// A playlist known to the library.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlaylistInfo {
    pub id: PlaylistId,
    #[serde(default)]
    pub name: String,
}

/// Read-only view of the configuration store the engine resolves against.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSnapshot {
    pub image_folders: Vec<ImageFolder>,
    pub orb_groups: Vec<OrbGroup>,
    /// Keyed by `playlistId` or `playlistId:colorId`.
    pub banner_bindings: BTreeMap<String, OverrideBinding>,
    /// Global theme-group leader.
    pub theme_group_leader: Option<MemberKey>,
    /// Overlay shown when no playlist is active (settings preview).
    #[serde(rename = "customPageBannerImage2")]
    pub global_overlay: Option<BannerLiteral>,
    pub playlists: Vec<PlaylistInfo>,
}

impl StoreSnapshot {
    /// Decode a snapshot from JSON text.
    pub fn from_json_str(s: &str) -> BannerResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Decode a snapshot from a reader.
    pub fn from_reader(r: impl Read) -> BannerResult<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    /// Check structural invariants.
    ///
    /// Resolution does not require a valid snapshot; this is for the settings side to surface
    /// corrupted stores.
    pub fn validate(&self) -> BannerResult<()> {
        let mut folder_ids = BTreeSet::new();
        for folder in &self.image_folders {
            if !folder_ids.insert(&folder.id) {
                return Err(BannerError::validation(format!(
                    "duplicate folder id '{}'",
                    folder.id
                )));
            }

            let mut image_ids = BTreeSet::new();
            for img in &folder.images {
                if !image_ids.insert(&img.id) {
                    return Err(BannerError::validation(format!(
                        "folder '{}' has duplicate image id '{}'",
                        folder.id, img.id
                    )));
                }
            }

            for (color, image_id) in &folder.color_assignments {
                if !image_ids.contains(image_id) {
                    return Err(BannerError::validation(format!(
                        "folder '{}' assigns color '{}' to missing image '{}'",
                        folder.id, color, image_id
                    )));
                }
            }
        }

        if !folder_ids.iter().any(|id| id.as_str() == FolderId::DEFAULT) {
            return Err(BannerError::validation("missing reserved 'default' folder"));
        }

        let theme_folders = self
            .image_folders
            .iter()
            .filter(|f| f.is_theme_folder)
            .count();
        if theme_folders > 1 {
            return Err(BannerError::validation(format!(
                "{theme_folders} folders are flagged as theme folder, at most one is allowed"
            )));
        }

        if let Some(leader) = &self.theme_group_leader
            && leader.asset_ref().is_none()
        {
            return Err(BannerError::validation(
                "theme group leader key must be 'folderId:imageId'",
            ));
        }

        for key in self.banner_bindings.keys() {
            if key.is_empty() || key.starts_with(':') || key.ends_with(':') {
                return Err(BannerError::validation(format!(
                    "malformed banner binding key '{key}'"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> StoreSnapshot {
        serde_json::from_value(json!({
            "imageFolders": [
                {
                    "id": "default",
                    "name": "Default",
                    "images": [
                        { "id": "a", "imageData": "data:a" },
                        { "id": 7, "imageData": "data:b", "scale": 120, "xOffset": 10 }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn defaults_fill_transform() {
        let snap = minimal();
        let a = &snap.image_folders[0].images[0];
        assert_eq!(a.scale, 100.0);
        assert_eq!(a.x_offset, 50.0);
        assert_eq!(a.y_offset, 50.0);
        let b = &snap.image_folders[0].images[1];
        assert_eq!(b.id.as_str(), "7");
        assert_eq!(b.scale, 120.0);
        assert_eq!(snap.image_folders[0].selection_policy, SelectionPolicy::Random);
    }

    #[test]
    fn unknown_policy_reads_as_random() {
        let p: SelectionPolicy = serde_json::from_value(json!("shuffle")).unwrap();
        assert_eq!(p, SelectionPolicy::Random);
        let p: SelectionPolicy = serde_json::from_value(json!("sequential")).unwrap();
        assert_eq!(p, SelectionPolicy::Sequential);
    }

    #[test]
    fn unknown_pages_are_dropped() {
        let d: Destinations = serde_json::from_value(json!({
            "pages": ["home", "likes", 3, "pins"]
        }))
        .unwrap();
        assert_eq!(
            d.pages.into_iter().collect::<Vec<_>>(),
            vec![PageType::Likes, PageType::Pins]
        );
    }

    #[test]
    fn records_without_image_still_load() {
        let img: ImageAsset = serde_json::from_value(json!({ "id": "half" })).unwrap();
        assert!(!img.has_image());
        assert_eq!(img.scale, 100.0);
        let orb: OrbGroup = serde_json::from_value(json!({ "id": "o" })).unwrap();
        assert!(!orb.has_image());
    }

    #[test]
    fn member_keys_accept_both_forms() {
        let keys: Vec<MemberKey> = serde_json::from_value(json!([
            "default:a",
            { "folderId": "default", "imageId": "b" },
            "garbage"
        ]))
        .unwrap();
        assert_eq!(keys[0].asset_ref(), Some(AssetRef::new("default", "a")));
        assert_eq!(keys[1].asset_ref(), Some(AssetRef::new("default", "b")));
        assert_eq!(keys[2].asset_ref(), None);
    }

    #[test]
    fn validate_accepts_minimal() {
        minimal().validate().unwrap();
    }

    #[test]
    fn validate_rejects_missing_default() {
        let mut snap = minimal();
        snap.image_folders[0].id = FolderId::from("other");
        assert!(snap.validate().is_err());
    }

    #[test]
    fn validate_rejects_two_theme_folders() {
        let mut snap = minimal();
        let mut second = snap.image_folders[0].clone();
        second.id = FolderId::from("second");
        snap.image_folders[0].is_theme_folder = true;
        second.is_theme_folder = true;
        snap.image_folders.push(second);
        assert!(snap.validate().is_err());
    }

    #[test]
    fn validate_rejects_dangling_color_assignment() {
        let mut snap = minimal();
        snap.image_folders[0]
            .color_assignments
            .insert(ColorId::from("red"), ImageId::from("gone"));
        assert!(snap.validate().is_err());
    }

    #[test]
    fn binding_source_needs_both_halves() {
        let b: OverrideBinding = serde_json::from_value(json!({
            "image": "data:x",
            "imageId": "a"
        }))
        .unwrap();
        assert!(b.source().is_none());
        let b: OverrideBinding = serde_json::from_value(json!({
            "image": "data:x",
            "imageId": "a",
            "folderId": "default"
        }))
        .unwrap();
        assert_eq!(b.source(), Some(AssetRef::new("default", "a")));
    }
}

use std::collections::HashMap;

use crate::fingerprint::{StoreFingerprint, fingerprint_store};
use crate::foundation::core::{AssetRef, ColorId, FolderId, OrbGroupId, PlaylistId};
use crate::model::{
    BannerLiteral, ImageAsset, ImageFolder, OrbGroup, OverrideBinding, StoreSnapshot,
};

/// Typed key of a banner binding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingKey {
    /// Applies to a whole playlist.
    Playlist(PlaylistId),
    /// Applies to one folder color of a playlist.
    PlaylistColor(PlaylistId, ColorId),
}

impl BindingKey {
    /// Parse a persisted `playlistId` / `playlistId:colorId` key.
    pub fn parse(key: &str) -> Option<Self> {
        if key.is_empty() {
            return None;
        }
        match key.split_once(':') {
            None => Some(Self::Playlist(PlaylistId::from(key))),
            Some((p, c)) if !p.is_empty() && !c.is_empty() => {
                Some(Self::PlaylistColor(PlaylistId::from(p), ColorId::from(c)))
            }
            Some(_) => None,
        }
    }
}

/// Lookup tables over a [`StoreSnapshot`].
///
/// Built once per snapshot; composite string keys are parsed here so resolution only deals with
/// typed references. Anything that fails to parse is left out and reads as "not found".
#[derive(Debug)]
pub struct LibraryIndex {
    snapshot: StoreSnapshot,
    folders: HashMap<FolderId, usize>,
    assets: HashMap<AssetRef, (usize, usize)>,
    orbs: HashMap<OrbGroupId, usize>,
    playlist_names: HashMap<PlaylistId, String>,
    bindings: HashMap<BindingKey, OverrideBinding>,
    fingerprint: StoreFingerprint,
}

impl LibraryIndex {
    /// Index a snapshot. Never fails; duplicates keep their first occurrence.
    pub fn new(snapshot: StoreSnapshot) -> Self {
        let mut folders = HashMap::new();
        let mut assets = HashMap::new();
        for (fi, folder) in snapshot.image_folders.iter().enumerate() {
            folders.entry(folder.id.clone()).or_insert(fi);
            for (ii, img) in folder.images.iter().enumerate() {
                assets
                    .entry(AssetRef::new(folder.id.clone(), img.id.clone()))
                    .or_insert((fi, ii));
            }
        }

        let mut orbs = HashMap::new();
        for (oi, orb) in snapshot.orb_groups.iter().enumerate() {
            orbs.entry(orb.id.clone()).or_insert(oi);
        }

        let mut playlist_names = HashMap::new();
        for p in &snapshot.playlists {
            playlist_names
                .entry(p.id.clone())
                .or_insert_with(|| p.name.clone());
        }

        let mut bindings = HashMap::new();
        for (key, binding) in &snapshot.banner_bindings {
            match BindingKey::parse(key) {
                Some(k) => {
                    bindings.insert(k, binding.clone());
                }
                None => tracing::trace!(key = %key, "skipping malformed banner binding key"),
            }
        }

        let fingerprint = fingerprint_store(&snapshot);

        Self {
            snapshot,
            folders,
            assets,
            orbs,
            playlist_names,
            bindings,
            fingerprint,
        }
    }

    /// The indexed snapshot.
    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    /// Content fingerprint of the snapshot.
    pub fn fingerprint(&self) -> StoreFingerprint {
        self.fingerprint
    }

    pub fn folder(&self, id: &FolderId) -> Option<&ImageFolder> {
        self.folders
            .get(id)
            .map(|&i| &self.snapshot.image_folders[i])
    }

    /// Resolve an asset reference; dangling references yield `None`.
    pub fn asset(&self, r: &AssetRef) -> Option<&ImageAsset> {
        self.assets
            .get(r)
            .map(|&(fi, ii)| &self.snapshot.image_folders[fi].images[ii])
    }

    pub fn orb(&self, id: &OrbGroupId) -> Option<&OrbGroup> {
        self.orbs.get(id).map(|&i| &self.snapshot.orb_groups[i])
    }

    pub fn orb_groups(&self) -> &[OrbGroup] {
        &self.snapshot.orb_groups
    }

    pub fn playlist_name(&self, id: &PlaylistId) -> Option<&str> {
        self.playlist_names.get(id).map(String::as_str)
    }

    pub fn binding(&self, key: &BindingKey) -> Option<&OverrideBinding> {
        self.bindings.get(key)
    }

    /// First folder whose standard binding lists `playlist`.
    pub fn folder_for_playlist(&self, playlist: &PlaylistId) -> Option<&ImageFolder> {
        self.snapshot
            .image_folders
            .iter()
            .find(|f| f.playlist_ids.contains(playlist))
    }
}

/// App-wide theme bindings, captured once per resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeConfig {
    /// Overlay previewed when no playlist is active.
    pub global_overlay: Option<BannerLiteral>,
    /// Theme-group leader asset.
    pub group_leader: Option<AssetRef>,
    /// Legacy single theme folder.
    pub theme_folder: Option<FolderId>,
}

impl ThemeConfig {
    /// Read the theme bindings out of an index.
    ///
    /// If several folders carry the theme flag the first one wins.
    pub fn capture(index: &LibraryIndex) -> Self {
        let snap = index.snapshot();
        Self {
            global_overlay: snap.global_overlay.clone(),
            group_leader: snap.theme_group_leader.as_ref().and_then(|k| k.asset_ref()),
            theme_folder: snap
                .image_folders
                .iter()
                .find(|f| f.is_theme_folder)
                .map(|f| f.id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index() -> LibraryIndex {
        let snap: StoreSnapshot = serde_json::from_value(json!({
            "imageFolders": [
                { "id": "default", "images": [ { "id": "a", "imageData": "data:a" } ] },
                { "id": "blue", "isThemeFolder": true, "playlistIds": [42],
                  "images": [ { "id": "b", "imageData": "data:b" } ] }
            ],
            "bannerBindings": {
                "42": { "image": "data:p" },
                "42:red": { "image": "data:r" },
                ":bad": { "image": "data:bad" }
            },
            "themeGroupLeader": "blue:b",
            "playlists": [ { "id": 42, "name": "Mix" } ]
        }))
        .unwrap();
        LibraryIndex::new(snap)
    }

    #[test]
    fn binding_keys_parse() {
        assert_eq!(
            BindingKey::parse("42"),
            Some(BindingKey::Playlist("42".into()))
        );
        assert_eq!(
            BindingKey::parse("42:red"),
            Some(BindingKey::PlaylistColor("42".into(), "red".into()))
        );
        assert_eq!(BindingKey::parse(""), None);
        assert_eq!(BindingKey::parse("42:"), None);
    }

    #[test]
    fn lookups() {
        let idx = index();
        assert!(idx.asset(&AssetRef::new("blue", "b")).is_some());
        assert!(idx.asset(&AssetRef::new("blue", "a")).is_none());
        assert_eq!(idx.playlist_name(&"42".into()), Some("Mix"));
        assert_eq!(
            idx.folder_for_playlist(&"42".into()).map(|f| f.id.as_str()),
            Some("blue")
        );
        assert!(
            idx.binding(&BindingKey::PlaylistColor("42".into(), "red".into()))
                .is_some()
        );
        assert_eq!(idx.bindings.len(), 2);
    }

    #[test]
    fn theme_capture() {
        let theme = ThemeConfig::capture(&index());
        assert_eq!(theme.group_leader, Some(AssetRef::new("blue", "b")));
        assert_eq!(theme.theme_folder, Some(FolderId::from("blue")));
        assert!(theme.global_overlay.is_none());
    }
}

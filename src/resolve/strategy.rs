use smallvec::SmallVec;

use crate::context::BannerContext;
use crate::destination::image_matches_destination;
use crate::foundation::core::{FolderId, PlaylistId};
use crate::index::{BindingKey, LibraryIndex, ThemeConfig};
use crate::model::{ImageAsset, OrbGroup, SelectionPolicy};
use crate::resolved::ResolvedImage;
use crate::select::{select_candidate, select_image_from_folder};

/// Everything a strategy may read.
#[derive(Clone, Copy, Debug)]
pub struct ResolveInput<'a> {
    pub ctx: &'a BannerContext,
    pub index: &'a LibraryIndex,
    pub theme: &'a ThemeConfig,
}

/// One source of banner overrides.
///
/// Each variant either resolves the context or declines; declining is never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Settings preview when no playlist is active. Bypasses destination filtering.
    GlobalPreview,
    /// `playlistId:color` binding, trusted verbatim.
    FolderBinding,
    /// `playlistId` binding, following its library pointer while the asset exists.
    PlaylistBinding,
    /// Orb group bound to the playlist by id or name.
    OrbGroup,
    /// Image folder bound to the playlist, with per-color assignments.
    FolderGroup,
    /// App-wide theme group leader and its members.
    ThemeGroup,
    /// Legacy app-wide theme folder.
    ThemeFolder,
    /// The reserved `default` folder.
    DefaultLibrary,
}

impl Strategy {
    /// Priority order, most specific first.
    pub const CASCADE: [Strategy; 8] = [
        Strategy::GlobalPreview,
        Strategy::FolderBinding,
        Strategy::PlaylistBinding,
        Strategy::OrbGroup,
        Strategy::FolderGroup,
        Strategy::ThemeGroup,
        Strategy::ThemeFolder,
        Strategy::DefaultLibrary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::GlobalPreview => "global_preview",
            Self::FolderBinding => "folder_binding",
            Self::PlaylistBinding => "playlist_binding",
            Self::OrbGroup => "orb_group",
            Self::FolderGroup => "folder_group",
            Self::ThemeGroup => "theme_group",
            Self::ThemeFolder => "theme_folder",
            Self::DefaultLibrary => "default_library",
        }
    }

    /// Try this source alone.
    pub fn try_resolve(self, input: &ResolveInput<'_>) -> Option<ResolvedImage> {
        match self {
            Self::GlobalPreview => global_preview(input),
            Self::FolderBinding => folder_binding(input),
            Self::PlaylistBinding => playlist_binding(input),
            Self::OrbGroup => orb_group(input),
            Self::FolderGroup => folder_group(input),
            Self::ThemeGroup => theme_group(input),
            Self::ThemeFolder => theme_folder(input),
            Self::DefaultLibrary => default_library(input),
        }
    }
}

fn global_preview(input: &ResolveInput<'_>) -> Option<ResolvedImage> {
    if input.ctx.playlist_id().is_some() {
        return None;
    }
    let overlay = input.theme.global_overlay.as_ref()?;
    if overlay.image.is_empty() {
        return None;
    }
    Some(ResolvedImage::from_literal(overlay))
}

fn folder_binding(input: &ResolveInput<'_>) -> Option<ResolvedImage> {
    let playlist = input.ctx.playlist_id()?;
    let color = input.ctx.folder_color()?;
    let key = BindingKey::PlaylistColor(playlist.clone(), color.clone());
    ResolvedImage::from_binding(input.index.binding(&key)?)
}

fn playlist_binding(input: &ResolveInput<'_>) -> Option<ResolvedImage> {
    let playlist = input.ctx.playlist_id()?;
    let binding = input
        .index
        .binding(&BindingKey::Playlist(playlist.clone()))?;

    if let Some(source) = binding.source() {
        match input.index.asset(&source).filter(|a| a.has_image()) {
            Some(asset) => return Some(ResolvedImage::from_asset(asset, &source.folder_id)),
            None => tracing::trace!(
                playlist = %playlist,
                source = %source,
                "binding points at a missing asset, using stored values"
            ),
        }
    }
    ResolvedImage::from_binding(binding)
}

fn orb_bound_to(orb: &OrbGroup, playlist: &PlaylistId, name: Option<&str>) -> bool {
    let Some(ids) = &orb.playlist_ids else {
        return false;
    };
    ids.iter()
        .any(|p| p == playlist || name.is_some_and(|n| !n.is_empty() && p.as_str() == n))
}

fn orb_group(input: &ResolveInput<'_>) -> Option<ResolvedImage> {
    let ctx = input.ctx;
    let playlist = ctx.playlist_id()?;
    let name = ctx
        .playlist_name()
        .or_else(|| input.index.playlist_name(playlist));

    let leader = input
        .index
        .orb_groups()
        .iter()
        .find(|o| orb_bound_to(o, playlist, name))?;

    let mut members: SmallVec<[&OrbGroup; 8]> = SmallVec::new();
    members.push(leader);
    for id in &leader.group_members {
        match input.index.orb(id) {
            Some(m) if !members.iter().any(|seen| seen.id == m.id) => members.push(m),
            Some(_) => {}
            None => tracing::trace!(orb = %leader.id, member = %id, "skipping dangling orb member"),
        }
    }

    members.retain(|m| m.has_image());
    if let Some(color) = ctx.folder_color().filter(|c| c.is_concrete()) {
        members.retain(|m| m.folder_colors.contains(color));
    }

    select_candidate(&members, ctx.seed(), SelectionPolicy::Random)
        .map(|orb| ResolvedImage::from_orb(orb))
}

fn folder_group(input: &ResolveInput<'_>) -> Option<ResolvedImage> {
    let ctx = input.ctx;
    let playlist = ctx.playlist_id()?;
    let folder = input.index.folder_for_playlist(playlist)?;

    let slot = ctx.assignment_slot();
    if let Some(image_id) = folder.color_assignments.get(&slot) {
        match folder.image(image_id).filter(|a| a.has_image()) {
            Some(asset) => return Some(ResolvedImage::from_asset(asset, &folder.id)),
            None => tracing::trace!(
                folder = %folder.id,
                slot = %slot,
                image = %image_id,
                "skipping dangling color assignment"
            ),
        }
    }

    select_image_from_folder(folder, ctx.seed(), ctx.page_type(), ctx.folder_color())
        .map(|asset| ResolvedImage::from_asset(asset, &folder.id))
}

/// A resolved group member together with the folder it lives in.
#[derive(Clone, Copy, Debug)]
struct GroupCandidate<'a> {
    folder: &'a FolderId,
    asset: &'a ImageAsset,
}

fn theme_group(input: &ResolveInput<'_>) -> Option<ResolvedImage> {
    let ctx = input.ctx;
    let leader_ref = input.theme.group_leader.as_ref()?;
    let Some(leader) = input.index.asset(leader_ref) else {
        tracing::trace!(leader = %leader_ref, "theme group leader is missing");
        return None;
    };

    let mut group: SmallVec<[GroupCandidate<'_>; 8]> = SmallVec::new();
    group.push(GroupCandidate {
        folder: &leader_ref.folder_id,
        asset: leader,
    });
    for key in &leader.group_members {
        let Some(member_ref) = key.asset_ref() else {
            tracing::trace!(leader = %leader_ref, "skipping malformed group member key");
            continue;
        };
        if &member_ref == leader_ref {
            continue;
        }
        let Some(folder) = input.index.folder(&member_ref.folder_id) else {
            tracing::trace!(member = %member_ref, "skipping group member in missing folder");
            continue;
        };
        match folder.image(&member_ref.image_id) {
            Some(asset) => group.push(GroupCandidate {
                folder: &folder.id,
                asset,
            }),
            None => tracing::trace!(member = %member_ref, "skipping dangling group member"),
        }
    }

    // The leader names the group even when it has no image of its own.
    group.retain(|c| c.asset.has_image());

    let eligible: SmallVec<[GroupCandidate<'_>; 8]> = group
        .iter()
        .copied()
        .filter(|c| image_matches_destination(c.asset, ctx.page_type(), ctx.folder_color()))
        .collect();
    // Theme bindings always show something: fall back to the whole group.
    let pool = if eligible.is_empty() { &group } else { &eligible };

    let policy = input
        .index
        .folder(&leader_ref.folder_id)
        .map(|f| f.selection_policy)
        .unwrap_or_default();

    select_candidate(pool, ctx.seed(), policy)
        .map(|c| ResolvedImage::from_asset(c.asset, c.folder))
}

fn theme_folder(input: &ResolveInput<'_>) -> Option<ResolvedImage> {
    let folder_id = input.theme.theme_folder.as_ref()?;
    library_pick(input, folder_id)
}

fn default_library(input: &ResolveInput<'_>) -> Option<ResolvedImage> {
    library_pick(input, &FolderId::default_library())
}

fn library_pick(input: &ResolveInput<'_>, folder_id: &FolderId) -> Option<ResolvedImage> {
    let ctx = input.ctx;
    let folder = input.index.folder(folder_id)?;
    select_image_from_folder(folder, ctx.seed(), ctx.page_type(), ctx.folder_color())
        .map(|asset| ResolvedImage::from_asset(asset, &folder.id))
}

//! Banner override resolution for a personal media library.
//!
//! Given a viewing context (page, playlist, active folder color) and a read-only snapshot of the
//! configuration store, [`OverrideResolver`] walks a fixed priority cascade of override sources
//! and picks one background image plus its transform. [`TransitionController`] turns successive
//! resolutions into a fade-out, swap, fade-in sequence that never shows a stale swap.
#![forbid(unsafe_code)]

mod foundation;

pub mod color;
pub mod config;
pub mod context;
pub mod destination;
pub mod ease;
pub mod fingerprint;
pub mod index;
pub mod model;
pub mod resolve;
pub mod resolved;
pub mod seed;
pub mod select;
pub mod transition;
pub mod view;

pub use crate::foundation::core::{
    Affine, AssetRef, ColorId, FolderId, ImageId, OrbGroupId, PageType, PlaylistId, Rgba8Premul,
    Vec2,
};
pub use crate::foundation::error::{BannerError, BannerResult};

pub use crate::config::{EngineConfig, TransitionTiming};
pub use crate::context::BannerContext;
pub use crate::destination::image_matches_destination;
pub use crate::ease::FadeEase;
pub use crate::index::{BindingKey, LibraryIndex, ThemeConfig};
pub use crate::model::{
    BannerLiteral, Destinations, ImageAsset, ImageFolder, MemberKey, OrbGroup, OverrideBinding,
    PlaylistInfo, SelectionPolicy, StoreSnapshot,
};
pub use crate::resolve::memo::{MemoStats, MemoizedResolver};
pub use crate::resolve::{OverrideResolver, Resolution, ResolveInput, Strategy};
pub use crate::resolved::{DisplayIdentity, ResolvedImage};
pub use crate::seed::{seeded_index, seeded_random};
pub use crate::select::{select_candidate, select_image_from_folder};
pub use crate::transition::{
    DisplayState, SwapTicket, TransitionController, TransitionPhase, TransitionStep,
};
pub use crate::view::BannerView;

use std::fmt;

pub use kurbo::{Affine, Vec2};

/// Accept either a JSON string or a JSON number and keep its textual form.
///
/// Playlist and image ids are persisted as numbers by some writers and as strings by others;
/// both spell the same id.
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match <Repr as serde::Deserialize>::deserialize(deserializer)? {
        Repr::Str(s) => s,
        Repr::Int(n) => n.to_string(),
        Repr::Float(f) => f.to_string(),
    })
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Construct from anything string-like.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserialize_string_or_number(deserializer).map(Self)
            }
        }
    };
}

string_id!(
    /// Playlist identity as known to the navigation layer.
    PlaylistId
);
string_id!(
    /// Id of an [`ImageFolder`](crate::model::ImageFolder).
    FolderId
);
string_id!(
    /// Id of an [`ImageAsset`](crate::model::ImageAsset), unique within its folder.
    ImageId
);
string_id!(
    /// Id of an [`OrbGroup`](crate::model::OrbGroup).
    OrbGroupId
);
string_id!(
    /// Folder color tag (`"red"`, `"blue"`, ...) or one of the `all`/`unsorted` sentinels.
    ColorId
);

impl FolderId {
    /// Reserved id of the fallback library folder.
    pub const DEFAULT: &'static str = "default";

    /// The reserved `default` folder id.
    pub fn default_library() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl ColorId {
    /// Sentinel for "every folder color".
    pub const ALL: &'static str = "all";
    /// Sentinel for "videos without a folder color".
    pub const UNSORTED: &'static str = "unsorted";

    /// `true` for the `all`/`unsorted` sentinels.
    pub fn is_sentinel(&self) -> bool {
        self.0 == Self::ALL || self.0 == Self::UNSORTED
    }

    /// `true` for a real color tag.
    pub fn is_concrete(&self) -> bool {
        !self.0.is_empty() && !self.is_sentinel()
    }
}

/// Page kinds a banner can be rendered on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    /// Video grid of a playlist.
    Videos,
    /// Playlist overview.
    Playlists,
    /// Liked videos.
    Likes,
    /// Watch history.
    History,
    /// Pinned videos.
    Pins,
}

impl PageType {
    /// Stable lowercase name, identical to the persisted form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Videos => "videos",
            Self::Playlists => "playlists",
            Self::Likes => "likes",
            Self::History => "history",
            Self::Pins => "pins",
        }
    }

    /// Infer the page type from a page title.
    ///
    /// Unknown titles are treated as a video grid, which is what playlist pages are titled after.
    pub fn from_title(title: &str) -> Self {
        let t = title.trim().to_ascii_lowercase();
        if t.starts_with("playlists") {
            Self::Playlists
        } else if t.starts_with("likes") || t.starts_with("liked") {
            Self::Likes
        } else if t.starts_with("history") {
            Self::History
        } else if t.starts_with("pins") || t.starts_with("pinned") {
            Self::Pins
        } else {
            Self::Videos
        }
    }
}

/// Weak reference to an asset inside a folder.
///
/// Never an ownership edge: a reference whose target was deleted resolves to nothing and is
/// skipped.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    /// Owning folder.
    pub folder_id: FolderId,
    /// Asset id inside that folder.
    pub image_id: ImageId,
}

impl AssetRef {
    /// Build a reference from its two halves.
    pub fn new(folder_id: impl Into<FolderId>, image_id: impl Into<ImageId>) -> Self {
        Self {
            folder_id: folder_id.into(),
            image_id: image_id.into(),
        }
    }

    /// Parse a persisted `"folderId:imageId"` key.
    ///
    /// Only the first `:` separates; image ids may themselves contain colons. Keys with an empty
    /// half yield `None`.
    pub fn parse_composite(key: &str) -> Option<Self> {
        let (folder, image) = key.split_once(':')?;
        if folder.is_empty() || image.is_empty() {
            return None;
        }
        Some(Self::new(folder, image))
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.folder_id, self.image_id)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

use smallvec::SmallVec;

use crate::destination::image_matches_destination;
use crate::foundation::core::{ColorId, PageType};
use crate::model::{ImageAsset, ImageFolder, SelectionPolicy};
use crate::seed::seeded_index;

/// Candidate list sized for typical folders without spilling to the heap.
pub(crate) type Candidates<'a, T> = SmallVec<[&'a T; 8]>;

/// Pick one candidate under `policy`.
///
/// `Random` takes `floor(seeded_random(seed) * len)`, `Sequential` the first element. Empty input
/// yields `None`.
pub fn select_candidate<'c, T>(
    candidates: &'c [T],
    seed: &str,
    policy: SelectionPolicy,
) -> Option<&'c T> {
    let idx = match policy {
        SelectionPolicy::Sequential => {
            if candidates.is_empty() {
                return None;
            }
            0
        }
        SelectionPolicy::Random => seeded_index(seed, candidates.len())?,
    };
    candidates.get(idx)
}

/// Destination-filter a folder's images and pick one under the folder's policy.
///
/// Images without a payload never qualify. An empty filtered set yields `None`; there is no
/// relaxation to the unfiltered list here.
pub fn select_image_from_folder<'a>(
    folder: &'a ImageFolder,
    seed: &str,
    page: PageType,
    folder_color: Option<&ColorId>,
) -> Option<&'a ImageAsset> {
    let eligible: Candidates<'a, ImageAsset> = folder
        .images
        .iter()
        .filter(|img| img.has_image() && image_matches_destination(img, page, folder_color))
        .collect();
    select_candidate(&eligible, seed, folder.selection_policy).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Destinations;

    fn img(id: &str) -> ImageAsset {
        ImageAsset {
            id: id.into(),
            image: format!("data:{id}"),
            scale: 100.0,
            x_offset: 50.0,
            y_offset: 50.0,
            bg_color: None,
            destinations: None,
            group_members: vec![],
        }
    }

    fn folder(images: Vec<ImageAsset>, policy: SelectionPolicy) -> ImageFolder {
        ImageFolder {
            id: "default".into(),
            name: "Default".to_string(),
            images,
            selection_policy: policy,
            playlist_ids: vec![],
            color_assignments: Default::default(),
            is_theme_folder: false,
        }
    }

    #[test]
    fn random_uses_seed_bucket() {
        let f = folder(vec![img("x"), img("y")], SelectionPolicy::Random);
        // 0.5472 * 2 -> 1
        let pick = select_image_from_folder(&f, "42-unsorted-Videos", PageType::Videos, None);
        assert_eq!(pick.unwrap().id.as_str(), "y");
        // 0.0365 * 2 -> 0
        let pick = select_image_from_folder(&f, "1-unsorted-Videos", PageType::Videos, None);
        assert_eq!(pick.unwrap().id.as_str(), "x");
    }

    #[test]
    fn sequential_ignores_seed() {
        let f = folder(vec![img("x"), img("y")], SelectionPolicy::Sequential);
        for seed in ["42-unsorted-Videos", "1-unsorted-Videos", ""] {
            let pick = select_image_from_folder(&f, seed, PageType::Videos, None);
            assert_eq!(pick.unwrap().id.as_str(), "x");
        }
    }

    #[test]
    fn filtered_out_folder_yields_none() {
        let mut only = img("p");
        only.destinations = Some(Destinations {
            pages: [PageType::Playlists].into_iter().collect(),
            folder_colors: Default::default(),
        });
        let f = folder(vec![only], SelectionPolicy::Random);
        assert!(select_image_from_folder(&f, "s", PageType::Videos, None).is_none());
        assert!(select_image_from_folder(&f, "s", PageType::Playlists, None).is_some());
    }

    #[test]
    fn empty_candidates() {
        let none: [&ImageAsset; 0] = [];
        assert!(select_candidate(&none, "s", SelectionPolicy::Random).is_none());
        assert!(select_candidate(&none, "s", SelectionPolicy::Sequential).is_none());
    }
}

//! Image grouping.
//!
//! Loose images found directly inside a content folder are moved into a real
//! image folder: the first conventional one that already exists, or a newly
//! created `<image_folder_name>`. The folder's images are then listed under
//! one synthetic group node whose path is that folder.
//!
//! [`group_in_place`] builds the same group without touching the disk, for
//! trees that must not be rearranged.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::fs::FileSystem;

use super::node::{DocNode, NodeKind};
use super::sort::sort_nodes;

/// Folder names that already hold images by convention, in lookup order.
pub const IMAGE_FOLDER_NAMES: [&str; 4] = ["images", "img", "assets", "static"];

/// The existing conventional image folder directly inside `folder`, if any.
pub fn find_image_folder<FS: FileSystem>(fs: &FS, folder: &Path) -> Option<PathBuf> {
    IMAGE_FOLDER_NAMES
        .iter()
        .map(|name| folder.join(name))
        .find(|path| fs.is_dir(path))
}

/// Result of gathering a folder's images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    /// The real folder the images live in
    pub folder: PathBuf,
    /// Every image, at its real path after any moves
    pub images: Vec<PathBuf>,
}

impl ImageSet {
    /// The synthetic group node for this set.
    pub fn into_group(self) -> DocNode {
        let mut children: Vec<DocNode> = self
            .images
            .iter()
            .map(|path| DocNode {
                label: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                path: path.clone(),
                position: None,
                kind: NodeKind::ImageAsset,
                children: None,
            })
            .collect();
        sort_nodes(&mut children);

        let name = self
            .folder
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let count = children.len();

        DocNode {
            label: format!("{} ({})", name, count),
            path: self.folder,
            position: None,
            kind: NodeKind::ImageGroup { count },
            children: Some(children),
        }
    }
}

/// Images directly inside `dir`, sorted.
pub fn list_images<FS: FileSystem>(fs: &FS, dir: &Path, config: &Config) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = match fs.list_entries(dir) {
        Ok(entries) => entries
            .into_iter()
            .filter(|p| !is_hidden(p) && config.is_image(p) && !fs.is_dir(p))
            .collect(),
        Err(e) => {
            log::warn!("Could not list images in {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    images.sort();
    images
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

/// Group `loose` images of `folder` with its image folder's images, moving
/// nothing.
///
/// The group's path is the existing image folder, or the one [`gather`] would
/// create. Loose images keep their real paths.
pub fn group_in_place<FS: FileSystem>(
    fs: &FS,
    folder: &Path,
    loose: Vec<PathBuf>,
    config: &Config,
) -> Option<ImageSet> {
    let target = find_image_folder(fs, folder);
    let mut images = target
        .as_ref()
        .map(|target| list_images(fs, target, config))
        .unwrap_or_default();
    images.extend(loose);
    if images.is_empty() {
        return None;
    }
    Some(ImageSet {
        folder: target.unwrap_or_else(|| folder.join(&config.image_folder_name)),
        images,
    })
}

/// Move `loose` images of `folder` into its image folder and collect the
/// folder's full image set.
///
/// Returns `None` if the folder has no images at all. Images that cannot be
/// moved stay where they are and are still part of the set.
pub fn gather<FS: FileSystem>(
    fs: &FS,
    folder: &Path,
    loose: Vec<PathBuf>,
    config: &Config,
) -> Option<ImageSet> {
    let existing = find_image_folder(fs, folder);
    if loose.is_empty() {
        let target = existing?;
        let images = list_images(fs, &target, config);
        return (!images.is_empty()).then_some(ImageSet {
            folder: target,
            images,
        });
    }

    let target = existing.unwrap_or_else(|| folder.join(&config.image_folder_name));
    let mut stranded = Vec::new();

    if let Err(e) = fs.create_dir_all(&target) {
        log::warn!("Could not create image folder {}: {}", target.display(), e);
        stranded = loose;
    } else {
        for image in loose {
            let Some(name) = image.file_name() else {
                continue;
            };
            let destination = target.join(name);
            match fs.move_path(&image, &destination) {
                Ok(()) => log::debug!("Moved {} into {}", image.display(), target.display()),
                Err(e) => {
                    log::warn!(
                        "Leaving {} in place, could not move it into {}: {}",
                        image.display(),
                        target.display(),
                        e
                    );
                    stranded.push(image);
                }
            }
        }
    }

    let mut images = if fs.is_dir(&target) {
        list_images(fs, &target, config)
    } else {
        Vec::new()
    };
    images.extend(stranded);

    Some(ImageSet {
        folder: target,
        images,
    })
}

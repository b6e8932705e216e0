//! Media staging for the product form.
//!
//! Files picked by the host land here before submission. Each staged file
//! owns a preview handle obtained from the host's [`PreviewRegistry`]; the
//! handle is released exactly once, when the file is removed, when the
//! staging area is cleared, or when the area is dropped.

use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use selleasy_core::constants::{MAX_MEDIA_FILE_BYTES, MAX_MEDIA_FILES};
use selleasy_core::models::MediaKind;

/// Where the host's picker sourced a file. Staging treats both the same;
/// hosts use it for capture-flow affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSource {
    #[default]
    Gallery,
    Camera,
}

/// A file delivered by the host's picker, not yet staged.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
            source: FileSource::Gallery,
        }
    }

    pub fn from_camera(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            source: FileSource::Camera,
            ..Self::new(name, content_type, data)
        }
    }
}

/// A file accepted into the staging area.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    pub kind: MediaKind,
    pub source: FileSource,
    pub data: Bytes,
    pub preview: String,
}

impl StagedFile {
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Host hook that materializes local previews for staged files (object URLs
/// in a browser host). `release` is called exactly once per handle created
/// through `create`.
pub trait PreviewRegistry {
    fn create(&mut self, file: &SelectedFile) -> String;
    fn release(&mut self, preview: &str);
}

/// Preview registry for hosts that render nothing, and for tests.
#[derive(Debug, Default)]
pub struct NoopPreviewRegistry;

impl PreviewRegistry for NoopPreviewRegistry {
    fn create(&mut self, file: &SelectedFile) -> String {
        format!("preview:{}", file.name)
    }

    fn release(&mut self, _preview: &str) {}
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StagingError {
    #[error("Up to {} files can be attached", MAX_MEDIA_FILES)]
    TooManyFiles,
    #[error("{name} is larger than the {limit} MB per-file limit", limit = MAX_MEDIA_FILE_BYTES / (1024 * 1024))]
    FileTooLarge { name: String },
}

/// Ordered collection of files attached to the form, capped at
/// [`MAX_MEDIA_FILES`] entries of at most [`MAX_MEDIA_FILE_BYTES`] each.
pub struct MediaStaging {
    registry: Box<dyn PreviewRegistry>,
    files: Vec<StagedFile>,
}

impl MediaStaging {
    pub fn new(registry: Box<dyn PreviewRegistry>) -> Self {
        Self {
            registry,
            files: Vec::new(),
        }
    }

    /// Stage a batch of picked files in order. The first file that would
    /// break the count or size limit rejects it and everything after it;
    /// files staged before the offender stay staged.
    pub fn add_files(&mut self, selected: Vec<SelectedFile>) -> Result<(), StagingError> {
        for file in selected {
            if self.files.len() >= MAX_MEDIA_FILES {
                return Err(StagingError::TooManyFiles);
            }
            if file.data.len() > MAX_MEDIA_FILE_BYTES {
                return Err(StagingError::FileTooLarge { name: file.name });
            }

            let preview = self.registry.create(&file);
            self.files.push(StagedFile {
                id: Uuid::new_v4(),
                kind: MediaKind::from_content_type(&file.content_type),
                name: file.name,
                content_type: file.content_type,
                source: file.source,
                data: file.data,
                preview,
            });
        }
        Ok(())
    }

    /// Remove one staged file and release its preview. Unknown ids are
    /// ignored; later files keep their order.
    pub fn remove(&mut self, id: Uuid) {
        if let Some(index) = self.files.iter().position(|file| file.id == id) {
            let removed = self.files.remove(index);
            self.registry.release(&removed.preview);
        }
    }

    /// Drop every staged file, releasing each preview.
    pub fn clear(&mut self) {
        for file in self.files.drain(..) {
            self.registry.release(&file.preview);
        }
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Drop for MediaStaging {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records create/release calls so tests can assert the preview
    /// lifecycle.
    struct RecordingRegistry {
        created: Rc<RefCell<Vec<String>>>,
        released: Rc<RefCell<Vec<String>>>,
        next: u32,
    }

    impl RecordingRegistry {
        fn new() -> (Self, Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<String>>>) {
            let created = Rc::new(RefCell::new(Vec::new()));
            let released = Rc::new(RefCell::new(Vec::new()));
            let registry = Self {
                created: created.clone(),
                released: released.clone(),
                next: 0,
            };
            (registry, created, released)
        }
    }

    impl PreviewRegistry for RecordingRegistry {
        fn create(&mut self, file: &SelectedFile) -> String {
            self.next += 1;
            let preview = format!("blob:{}-{}", file.name, self.next);
            self.created.borrow_mut().push(preview.clone());
            preview
        }

        fn release(&mut self, preview: &str) {
            self.released.borrow_mut().push(preview.to_string());
        }
    }

    fn image(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/jpeg", vec![1u8, 2, 3])
    }

    #[test]
    fn test_staged_files_keep_selection_order() {
        let (registry, _, _) = RecordingRegistry::new();
        let mut staging = MediaStaging::new(Box::new(registry));

        staging
            .add_files(vec![image("a.jpg"), image("b.jpg")])
            .unwrap();

        let names: Vec<&str> = staging.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
        assert_eq!(staging.files()[0].kind, MediaKind::Image);
    }

    #[test]
    fn test_remove_releases_preview_once_and_keeps_rest() {
        let (registry, created, released) = RecordingRegistry::new();
        let mut staging = MediaStaging::new(Box::new(registry));

        staging
            .add_files(vec![image("a.jpg"), image("b.jpg")])
            .unwrap();
        let first_id = staging.files()[0].id;
        let first_preview = staging.files()[0].preview.clone();

        staging.remove(first_id);

        let names: Vec<&str> = staging.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b.jpg"]);
        assert_eq!(created.borrow().len(), 2);
        assert_eq!(*released.borrow(), vec![first_preview]);

        // Removing the same id again is a no-op.
        staging.remove(first_id);
        assert_eq!(released.borrow().len(), 1);
    }

    #[test]
    fn test_sixth_file_is_rejected_with_batch_remainder() {
        let (registry, _, _) = RecordingRegistry::new();
        let mut staging = MediaStaging::new(Box::new(registry));

        let batch: Vec<SelectedFile> = (0..5).map(|i| image(&format!("{}.jpg", i))).collect();
        staging.add_files(batch).unwrap();

        let overflow = vec![image("5.jpg"), image("6.jpg")];
        assert_eq!(
            staging.add_files(overflow),
            Err(StagingError::TooManyFiles)
        );
        assert_eq!(staging.len(), 5);
    }

    #[test]
    fn test_oversize_file_rejected_but_earlier_files_stay() {
        let (registry, created, released) = RecordingRegistry::new();
        let mut staging = MediaStaging::new(Box::new(registry));

        let oversize = SelectedFile::new(
            "huge.mp4",
            "video/mp4",
            vec![0u8; MAX_MEDIA_FILE_BYTES + 1],
        );
        let result = staging.add_files(vec![image("ok.jpg"), oversize, image("after.jpg")]);

        assert_eq!(
            result,
            Err(StagingError::FileTooLarge {
                name: "huge.mp4".to_string()
            })
        );
        let names: Vec<&str> = staging.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ok.jpg"]);
        // No preview was created for the rejected files.
        assert_eq!(created.borrow().len(), 1);
        assert!(released.borrow().is_empty());
    }

    #[test]
    fn test_clear_and_drop_release_every_preview() {
        let (registry, created, released) = RecordingRegistry::new();
        {
            let mut staging = MediaStaging::new(Box::new(registry));
            staging
                .add_files(vec![image("a.jpg"), image("b.jpg")])
                .unwrap();
            staging.clear();
            assert_eq!(released.borrow().len(), 2);

            staging.add_files(vec![image("c.jpg")]).unwrap();
            // Dropped here with one file still staged.
        }
        assert_eq!(created.borrow().len(), 3);
        assert_eq!(released.borrow().len(), 3);
    }

    #[test]
    fn test_camera_source_is_preserved() {
        let (registry, _, _) = RecordingRegistry::new();
        let mut staging = MediaStaging::new(Box::new(registry));

        let shot = SelectedFile::from_camera("shot.jpg", "image/jpeg", vec![9u8]);
        staging.add_files(vec![shot]).unwrap();

        assert_eq!(staging.files()[0].source, FileSource::Camera);
    }
}

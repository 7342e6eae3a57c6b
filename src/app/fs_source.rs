// SPDX-License-Identifier: MPL-2.0
//! Directory-backed host ports.
//!
//! Every supported file directly inside the gallery directory is one item,
//! ordered by file name. The directory is scanned again for each page so
//! files added or removed while the gallery is open change the page count.

use crate::domain::{Direction, GalleryItem, Page, PageInfo};
use crate::error::{FetchError, RenderError};
use crate::host::{ContentRenderer, ImageLoader, PageSource};
use crate::media::{self, ImageData, RenderedDocument};
use chrono::{DateTime, Local};
use futures_util::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
];

const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("xhtml", "application/xhtml+xml"),
];

/// Media type for a file, judged by its extension.
#[must_use]
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .chain(DOCUMENT_TYPES)
        .find(|(ext, _)| *ext == extension)
        .map(|(_, media_type)| *media_type)
}

/// Lists supported files in `directory`, sorted by file name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn scan_directory(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && media_type_for(&path).is_some() {
            files.push(path);
        }
    }
    files.sort_by_key(|path| path.file_name().map(|name| name.to_ascii_lowercase()));
    Ok(files)
}

fn item_for(path: &Path) -> GalleryItem {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.clone());

    let mut item = GalleryItem::new(name, title, path.to_string_lossy());
    if let Some(media_type) = media_type_for(path) {
        item = item.with_media_type(media_type);
    }
    if let Ok(metadata) = std::fs::metadata(path) {
        item.size_bytes = Some(metadata.len());
        item.modified = metadata.modified().ok().map(DateTime::<Local>::from);
    }
    item
}

fn total_pages(files: usize, page_size: usize) -> usize {
    files.div_ceil(page_size.max(1))
}

/// Pages over the supported files of a directory.
#[derive(Debug, Clone)]
pub struct FsPageSource {
    directory: PathBuf,
    page_size: usize,
}

impl FsPageSource {
    #[must_use]
    pub fn new(directory: PathBuf, page_size: usize) -> Self {
        Self {
            directory,
            page_size: page_size.max(1),
        }
    }

    /// Pagination metadata for opening the gallery at `start_page`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn page_info(&self, start_page: usize) -> Result<PageInfo, FetchError> {
        let files = scan_directory(&self.directory)?;
        let total = total_pages(files.len(), self.page_size);
        Ok(PageInfo::new(start_page.min(total.saturating_sub(1)), total))
    }

    /// Reads `page` synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::OutOfRange`] for pages past the end and
    /// [`FetchError::Io`] if the directory cannot be read.
    pub fn read_page(&self, page: usize) -> Result<Page, FetchError> {
        let files = scan_directory(&self.directory)?;
        let total = total_pages(files.len(), self.page_size);
        if page >= total {
            return Err(FetchError::OutOfRange {
                page,
                total_pages: total,
            });
        }

        let items = files
            .iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .map(|path| Arc::new(item_for(path)))
            .collect();
        Ok(Page::new(PageInfo::new(page, total), items))
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl PageSource for FsPageSource {
    fn fetch_page(
        &self,
        direction: Direction,
        page: usize,
    ) -> BoxFuture<'static, Result<Page, FetchError>> {
        let source = self.clone();
        async move {
            tracing::debug!(page, ?direction, directory = %source.directory.display(), "reading page");
            tokio::task::spawn_blocking(move || source.read_page(page))
                .await
                .unwrap_or_else(|e| Err(FetchError::Host(format!("page task failed: {e}"))))
        }
        .boxed()
    }
}

/// Decodes the item's `full` path from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load(&self, item: &GalleryItem) -> BoxFuture<'static, Result<ImageData, RenderError>> {
        media::load_image_async(PathBuf::from(&item.full)).boxed()
    }
}

/// Renders (X)HTML files as extracted text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ContentRenderer for HtmlRenderer {
    fn render(
        &self,
        item: &GalleryItem,
        _width: f32,
        _height: f32,
    ) -> BoxFuture<'static, Result<RenderedDocument, RenderError>> {
        let path = PathBuf::from(&item.full);
        async move {
            let markup = tokio::fs::read_to_string(&path).await?;
            tokio::task::spawn_blocking(move || media::extract_text(&markup))
                .await
                .unwrap_or_else(|e| Err(RenderError::Host(format!("render task failed: {e}"))))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentKind;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str, contents: &[u8]) {
        std::fs::write(dir.join(name), contents).expect("write file");
    }

    #[test]
    fn media_types_follow_extension() {
        assert_eq!(media_type_for(Path::new("a.JPG")), Some("image/jpeg"));
        assert_eq!(media_type_for(Path::new("page.html")), Some("text/html"));
        assert_eq!(media_type_for(Path::new("notes.txt")), None);
        assert_eq!(media_type_for(Path::new("noext")), None);
    }

    #[test]
    fn scan_lists_supported_files_sorted() {
        let dir = tempdir().expect("temp dir");
        touch(dir.path(), "b.png", b"");
        touch(dir.path(), "A.jpg", b"");
        touch(dir.path(), "readme.txt", b"");
        std::fs::create_dir(dir.path().join("nested.png")).expect("dir");

        let files = scan_directory(dir.path()).expect("scan");
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["A.jpg", "b.png"]);
    }

    #[test]
    fn pages_slice_directory_listing() {
        let dir = tempdir().expect("temp dir");
        for name in ["1.png", "2.png", "3.png", "4.html", "5.png"] {
            touch(dir.path(), name, b"x");
        }
        let source = FsPageSource::new(dir.path().to_path_buf(), 2);

        assert_eq!(source.page_info(9).expect("info"), PageInfo::new(2, 3));

        let page = source.read_page(1).expect("page 1");
        assert_eq!(page.info, PageInfo::new(1, 3));
        let ids: Vec<_> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["3.png", "4.html"]);
        assert_eq!(page.items[1].content_kind(), ContentKind::Rendered);
        assert_eq!(page.items[0].content_kind(), ContentKind::Image);
        assert_eq!(page.items[0].size_bytes, Some(1));

        let last = source.read_page(2).expect("page 2");
        assert_eq!(last.items.len(), 1);
    }

    #[test]
    fn page_past_end_is_out_of_range() {
        let dir = tempdir().expect("temp dir");
        touch(dir.path(), "1.png", b"");
        let source = FsPageSource::new(dir.path().to_path_buf(), 10);
        assert_eq!(
            source.read_page(1).unwrap_err(),
            FetchError::OutOfRange {
                page: 1,
                total_pages: 1
            }
        );
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempdir().expect("temp dir");
        let source = FsPageSource::new(dir.path().join("gone"), 10);
        assert!(matches!(source.read_page(0), Err(FetchError::Io(_))));
    }

    #[tokio::test]
    async fn fetch_page_runs_off_thread() {
        let dir = tempdir().expect("temp dir");
        touch(dir.path(), "1.png", b"");
        let source = FsPageSource::new(dir.path().to_path_buf(), 10);
        let page = source
            .fetch_page(Direction::Forward, 0)
            .await
            .expect("page 0");
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn html_renderer_extracts_text() {
        let dir = tempdir().expect("temp dir");
        touch(dir.path(), "doc.html", b"<html><body><h2>Hello</h2></body></html>");
        let item = item_for(&dir.path().join("doc.html"));

        let document = HtmlRenderer
            .render(&item, 800.0, 600.0)
            .await
            .expect("rendered");
        assert_eq!(document.blocks[0].text, "Hello");
    }

    #[tokio::test]
    async fn html_renderer_reports_missing_file() {
        let item = GalleryItem::new("x", "x", "/definitely/not/here.html");
        let result = HtmlRenderer.render(&item, 1.0, 1.0).await;
        assert!(matches!(result, Err(RenderError::Io(_))));
    }
}

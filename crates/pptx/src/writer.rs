//! PPTX package writer.

use crate::inspector::PptxInspector;
use crate::parts;
use deck_core::{DocumentWriter, Error, Presentation, Result};
use std::io::{Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes a [`Presentation`] as a `.pptx` file.
#[derive(Debug, Clone)]
pub struct PptxWriter {
    /// Recorded as the package's application and creator.
    application: String,

    /// Re-open the written file and check its slide count.
    verify: bool,
}

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self {
            application: env!("CARGO_PKG_NAME").to_string(),
            verify: false,
        }
    }

    /// Set the application name stored in the document properties.
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    /// Read every written file back and fail unless it holds all the slides.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Write the package to any seekable sink.
    pub fn write_to<W: Write + Seek>(&self, document: &Presentation, sink: W) -> Result<W> {
        let mut zip = ZipWriter::new(sink);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let slide_count = document.slide_count();
        let mut entries: Vec<(String, String)> = vec![
            ("[Content_Types].xml".to_string(), parts::content_types(slide_count)),
            ("_rels/.rels".to_string(), parts::package_rels()),
            (
                "docProps/app.xml".to_string(),
                parts::app_properties(document, &self.application),
            ),
            (
                "docProps/core.xml".to_string(),
                parts::core_properties(&self.application),
            ),
            ("ppt/presentation.xml".to_string(), parts::presentation(document)),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                parts::presentation_rels(slide_count),
            ),
            ("ppt/slideMasters/slideMaster1.xml".to_string(), parts::slide_master()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                parts::slide_master_rels(),
            ),
            ("ppt/slideLayouts/slideLayout1.xml".to_string(), parts::slide_layout()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                parts::slide_layout_rels(),
            ),
            ("ppt/theme/theme1.xml".to_string(), parts::theme()),
        ];

        for (i, slide) in document.slides().iter().enumerate() {
            let n = i + 1;
            entries.push((format!("ppt/slides/slide{}.xml", n), parts::slide(slide)));
            entries.push((format!("ppt/slides/_rels/slide{}.xml.rels", n), parts::slide_rels()));
        }

        for (name, content) in entries {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(content.as_bytes())?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter for PptxWriter {
    fn write(&self, document: &Presentation, output: &Path) -> Result<()> {
        log::debug!(
            "Writing {} slide(s) to {}",
            document.slide_count(),
            output.display()
        );

        // Staged next to the output so the final rename stays on one filesystem.
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = NamedTempFile::new_in(dir)?;
        let mut staged = self.write_to(document, staged)?;
        staged.flush()?;

        self.commit(staged, output, document.slide_count())
    }
}

impl PptxWriter {
    /// Verify the staged package if asked to, then move it into place.
    /// On any error the staged file is dropped and `output` is left untouched.
    fn commit(&self, staged: NamedTempFile, output: &Path, expected: usize) -> Result<()> {
        if self.verify {
            let summary = PptxInspector::new().verify(staged.path(), expected)?;
            log::debug!("Verified {} slide(s) before saving", summary.slides.len());
        }

        staged.persist(output).map_err(|e| Error::IoError(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::PptxInspector;
    use deck_core::{Bullet, Frame, Layout, Shape, TextStyle};
    use std::io::Cursor;

    fn document(titles: &[&str]) -> Presentation {
        let mut doc = Presentation::new(Layout::Widescreen16x9);
        for title in titles {
            let mut shape = Shape::new("Heading 1", Frame::default(), TextStyle::default());
            shape.add_paragraph(*title, Bullet::None);
            doc.add_slide().add_shape(shape);
        }
        doc
    }

    #[test]
    fn test_write_and_read_back() {
        let doc = document(&["Alpha", "Beta", "Gamma"]);
        let cursor = PptxWriter::new().write_to(&doc, Cursor::new(Vec::new())).unwrap();

        let summary = PptxInspector::new()
            .inspect(Cursor::new(cursor.into_inner()))
            .unwrap();
        assert_eq!(summary.slide_size, (9_144_000, 5_143_500));
        let texts: Vec<Vec<String>> = summary.slides.iter().map(|s| s.texts.clone()).collect();
        assert_eq!(
            texts,
            vec![
                vec!["Alpha".to_string()],
                vec!["Beta".to_string()],
                vec!["Gamma".to_string()],
            ]
        );
    }

    #[test]
    fn test_package_parts_present() {
        let doc = document(&["Only"]);
        let cursor = PptxWriter::new().write_to(&doc, Cursor::new(Vec::new())).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();

        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/_rels/slide1.xml.rels",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");

        PptxWriter::new().write(&document(&["One", "Two"]), &path).unwrap();

        let summary = PptxInspector::new().inspect_file(&path).unwrap();
        assert_eq!(summary.slides.len(), 2);
    }

    #[test]
    fn test_write_with_verification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");

        PptxWriter::new()
            .with_verification(true)
            .write(&document(&["One", "Two", "Three"]), &path)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/deck.pptx");

        let err = PptxWriter::new().write(&document(&["One"]), &path).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
        assert!(!path.exists());
    }

    fn entries(dir: &Path) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[test]
    fn test_failed_verification_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let writer = PptxWriter::new().with_verification(true);

        let staged = writer
            .write_to(&document(&["One", "Two"]), NamedTempFile::new_in(dir.path()).unwrap())
            .unwrap();
        let err = writer.commit(staged, &path, 3).unwrap_err();

        assert!(err.to_string().contains("expected 3"));
        assert!(!path.exists());
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_failed_write_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        PptxWriter::new().write(&document(&["Old"]), &path).unwrap();

        let writer = PptxWriter::new().with_verification(true);
        let staged = writer
            .write_to(&document(&["New"]), NamedTempFile::new_in(dir.path()).unwrap())
            .unwrap();
        assert!(writer.commit(staged, &path, 2).is_err());

        let summary = PptxInspector::new().inspect_file(&path).unwrap();
        assert_eq!(summary.slides[0].texts, vec!["Old".to_string()]);
        assert_eq!(entries(dir.path()), vec![path]);
    }

    #[test]
    fn test_overwrite_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        PptxWriter::new().write(&document(&["Old"]), &path).unwrap();
        PptxWriter::new().write(&document(&["New", "Newer"]), &path).unwrap();

        let summary = PptxInspector::new().inspect_file(&path).unwrap();
        assert_eq!(summary.slides.len(), 2);
        assert_eq!(entries(dir.path()), vec![path]);
    }

    #[test]
    fn test_output_is_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("deck.pptx");
        std::fs::create_dir(&target).unwrap();

        let err = PptxWriter::new().write(&document(&["One"]), &target).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
        assert!(target.is_dir());
        assert_eq!(entries(dir.path()), vec![target]);
    }
}

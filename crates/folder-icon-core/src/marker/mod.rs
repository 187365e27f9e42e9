//! `desktop.ini` handling: associates a folder with a custom icon.

pub mod document;

pub use document::{MarkerText, TextEncoding, ICON_RESOURCE_KEY, MARKER_FILE_NAME, SHELL_SECTION};

use crate::error::Error;
use crate::platform::AttributeSetter;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct MarkerOutcome {
    pub path: PathBuf,
    /// False when an existing record was merged.
    pub created: bool,
    pub previous_icon: Option<String>,
    /// Attribute changes that failed; the record content was still written.
    pub attribute_warnings: Vec<Error>,
}

/// Create or merge the marker record in `folder` so it references
/// `icon_file_name`, then hide the record and mark the folder as system.
///
/// An existing record that cannot be decoded or parsed is left untouched and
/// reported as [`Error::Marker`].
pub fn apply_marker(
    folder: &Path,
    icon_file_name: &str,
    folder_type: &str,
    attributes: &dyn AttributeSetter,
) -> Result<MarkerOutcome, Error> {
    let path = folder.join(MARKER_FILE_NAME);
    let mut warnings = Vec::new();

    let (created, previous_icon) = if path.exists() {
        let previous = merge_existing(&path, icon_file_name, attributes, &mut warnings)?;
        (false, previous)
    } else {
        let content = document::fresh_record(icon_file_name, folder_type)
            .map_err(|e| Error::marker(&path, e))?;
        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        debug!("Created {}", path.display());
        note(attributes.set_hidden(&path, true), &path, &mut warnings);
        (true, None)
    };

    note(attributes.set_system(folder, true), folder, &mut warnings);

    Ok(MarkerOutcome {
        path,
        created,
        previous_icon,
        attribute_warnings: warnings,
    })
}

fn merge_existing(
    path: &Path,
    icon_file_name: &str,
    attributes: &dyn AttributeSetter,
    warnings: &mut Vec<Error>,
) -> Result<Option<String>, Error> {
    let raw = fs::read(path).map_err(|e| Error::io(path, e))?;
    let marker = MarkerText::decode(&raw).map_err(|e| Error::marker(path, e))?;
    document::validate(&marker.text).map_err(|e| Error::marker(path, e))?;

    let previous = document::icon_resource(&marker.text);
    let merged = marker.with_text(document::set_icon_resource(&marker.text, icon_file_name));
    debug!(
        "Updating {} ({:?}): {:?} -> {}",
        path.display(),
        marker.encoding,
        previous,
        document::icon_resource_value(icon_file_name)
    );

    note(attributes.set_hidden(path, false), path, warnings);
    let written = write_in_place(path, &merged.encode()).map_err(|e| Error::io(path, e));
    note(attributes.set_hidden(path, true), path, warnings);
    written?;

    Ok(previous)
}

// Opens without create so Windows accepts the write on hidden/system files.
fn write_in_place(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(bytes)?;
    file.flush()
}

fn note(result: io::Result<()>, path: &Path, warnings: &mut Vec<Error>) {
    if let Err(source) = result {
        warn!("Unable to change attributes of {}: {}", path.display(), source);
        warnings.push(Error::Attribute {
            path: path.to_path_buf(),
            source,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingAttributes {
        calls: RefCell<Vec<(PathBuf, &'static str, bool)>>,
    }

    impl AttributeSetter for RecordingAttributes {
        fn set_hidden(&self, path: &Path, hidden: bool) -> io::Result<()> {
            self.calls
                .borrow_mut()
                .push((path.to_path_buf(), "hidden", hidden));
            Ok(())
        }

        fn set_system(&self, path: &Path, system: bool) -> io::Result<()> {
            self.calls
                .borrow_mut()
                .push((path.to_path_buf(), "system", system));
            Ok(())
        }
    }

    struct DeniedAttributes;

    impl AttributeSetter for DeniedAttributes {
        fn set_hidden(&self, _path: &Path, _hidden: bool) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn set_system(&self, _path: &Path, _system: bool) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_fresh_marker_is_created_hidden() {
        let tmp = tempdir().unwrap();
        let attrs = RecordingAttributes::default();

        let outcome = apply_marker(tmp.path(), "logo.ico", "Generic", &attrs).unwrap();
        assert!(outcome.created);
        assert!(outcome.attribute_warnings.is_empty());

        let text = fs::read_to_string(&outcome.path).unwrap();
        assert_eq!(document::icon_resource(&text).as_deref(), Some("logo.ico,0"));

        let calls = attrs.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                (outcome.path.clone(), "hidden", true),
                (tmp.path().to_path_buf(), "system", true),
            ]
        );
    }

    #[test]
    fn test_existing_marker_is_merged_and_rehidden() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(MARKER_FILE_NAME);
        let original = "[ViewState]\r\nFolderType=Music\r\n[.ShellClassInfo]\r\nIconResource=old.ico,0\r\n";
        fs::write(&path, original).unwrap();
        let attrs = RecordingAttributes::default();

        let outcome = apply_marker(tmp.path(), "new.ico", "Generic", &attrs).unwrap();
        assert!(!outcome.created);
        assert_eq!(outcome.previous_icon.as_deref(), Some("old.ico,0"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[ViewState]\r\nFolderType=Music\r\n[.ShellClassInfo]\r\nIconResource=new.ico,0\r\n"
        );

        let calls = attrs.calls.borrow();
        assert_eq!(calls[0], (path.clone(), "hidden", false));
        assert_eq!(calls[1], (path.clone(), "hidden", true));
        assert_eq!(calls[2], (tmp.path().to_path_buf(), "system", true));
    }

    #[test]
    fn test_malformed_marker_is_left_untouched() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(MARKER_FILE_NAME);
        let original = "[.ShellClassInfo\nIconResource=old.ico,0\n";
        fs::write(&path, original).unwrap();

        let result = apply_marker(tmp.path(), "new.ico", "Generic", &RecordingAttributes::default());
        assert!(matches!(result, Err(Error::Marker { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_utf16_marker_keeps_encoding() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(MARKER_FILE_NAME);
        let original = MarkerText {
            encoding: TextEncoding::Utf16Le,
            text: "[.ShellClassInfo]\r\nIconResource=old.ico,0\r\n".to_string(),
        };
        fs::write(&path, original.encode()).unwrap();

        apply_marker(tmp.path(), "new.ico", "Generic", &RecordingAttributes::default()).unwrap();

        let merged = MarkerText::decode(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(merged.encoding, TextEncoding::Utf16Le);
        assert_eq!(merged.text, "[.ShellClassInfo]\r\nIconResource=new.ico,0\r\n");
    }

    #[test]
    fn test_attribute_failures_do_not_undo_content() {
        let tmp = tempdir().unwrap();

        let outcome = apply_marker(tmp.path(), "logo.ico", "Generic", &DeniedAttributes).unwrap();
        assert_eq!(outcome.attribute_warnings.len(), 2);
        assert!(outcome
            .attribute_warnings
            .iter()
            .all(|w| matches!(w, Error::Attribute { .. })));

        let text = fs::read_to_string(&outcome.path).unwrap();
        assert!(text.contains("IconResource=logo.ico,0"));
    }
}

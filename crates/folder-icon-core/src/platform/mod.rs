#[cfg(target_os = "windows")]
pub mod windows;

use std::io;
use std::path::Path;

/// Sets visibility attributes on file system entries.
///
/// Failures are reported to the caller, which treats them as warnings.
pub trait AttributeSetter {
    fn set_hidden(&self, path: &Path, hidden: bool) -> io::Result<()>;
    fn set_system(&self, path: &Path, system: bool) -> io::Result<()>;
}

/// Attribute setter backed by the operating system.
///
/// Only Windows has hidden/system flags; elsewhere both calls succeed without
/// doing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeAttributes;

#[cfg(target_os = "windows")]
impl AttributeSetter for NativeAttributes {
    fn set_hidden(&self, path: &Path, hidden: bool) -> io::Result<()> {
        windows::set_hidden(path, hidden)
    }

    fn set_system(&self, path: &Path, system: bool) -> io::Result<()> {
        windows::set_system(path, system)
    }
}

#[cfg(not(target_os = "windows"))]
impl AttributeSetter for NativeAttributes {
    fn set_hidden(&self, _path: &Path, _hidden: bool) -> io::Result<()> {
        Ok(())
    }

    fn set_system(&self, _path: &Path, _system: bool) -> io::Result<()> {
        Ok(())
    }
}

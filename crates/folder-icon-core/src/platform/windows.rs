use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use winapi::shared::minwindef::DWORD;
use winapi::um::fileapi::{GetFileAttributesW, SetFileAttributesW, INVALID_FILE_ATTRIBUTES};
use winapi::um::winnt::{FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_NORMAL, FILE_ATTRIBUTE_SYSTEM};

pub fn set_hidden(path: &Path, hidden: bool) -> io::Result<()> {
    set_flag(path, FILE_ATTRIBUTE_HIDDEN, hidden)
}

pub fn set_system(path: &Path, system: bool) -> io::Result<()> {
    set_flag(path, FILE_ATTRIBUTE_SYSTEM, system)
}

#[cfg(test)]
pub fn is_hidden(path: &Path) -> io::Result<bool> {
    let wide = to_wide(path);
    let current = unsafe { GetFileAttributesW(wide.as_ptr()) };
    if current == INVALID_FILE_ATTRIBUTES {
        return Err(io::Error::last_os_error());
    }
    Ok(current & FILE_ATTRIBUTE_HIDDEN != 0)
}

fn set_flag(path: &Path, flag: DWORD, enabled: bool) -> io::Result<()> {
    let wide = to_wide(path);

    unsafe {
        let current = GetFileAttributesW(wide.as_ptr());
        if current == INVALID_FILE_ATTRIBUTES {
            return Err(io::Error::last_os_error());
        }

        let updated = if enabled {
            current | flag
        } else {
            current & !flag
        };
        if updated == current {
            return Ok(());
        }

        // A zero mask is rejected; NORMAL is the "no attributes" value.
        let updated = if updated == 0 {
            FILE_ATTRIBUTE_NORMAL
        } else {
            updated
        };
        if SetFileAttributesW(wide.as_ptr(), updated) == 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

fn to_wide(path: &Path) -> Vec<u16> {
    path.as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

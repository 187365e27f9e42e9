use ini::{EscapePolicy, Ini, LineSeparator, ParseError, WriteOption};

pub const MARKER_FILE_NAME: &str = "desktop.ini";
pub const SHELL_SECTION: &str = ".ShellClassInfo";
pub const ICON_RESOURCE_KEY: &str = "IconResource";
const VIEW_STATE_SECTION: &str = "ViewState";

const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";
const UTF16LE_BOM: &[u8; 2] = b"\xFF\xFE";

/// `IconResource` value pointing at the first image of `icon_file_name`.
pub fn icon_resource_value(icon_file_name: &str) -> String {
    format!("{},0", icon_file_name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
}

/// Marker file contents along with the encoding they were stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerText {
    pub encoding: TextEncoding,
    pub text: String,
}

impl MarkerText {
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        if let Some(rest) = bytes.strip_prefix(UTF16LE_BOM) {
            if rest.len() % 2 != 0 {
                return Err("truncated UTF-16 text".to_string());
            }
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            let text = String::from_utf16(&units).map_err(|e| e.to_string())?;
            return Ok(Self {
                encoding: TextEncoding::Utf16Le,
                text,
            });
        }

        let (encoding, body) = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => (TextEncoding::Utf8Bom, rest),
            None => (TextEncoding::Utf8, bytes),
        };
        let text = std::str::from_utf8(body)
            .map_err(|e| e.to_string())?
            .to_string();
        Ok(Self { encoding, text })
    }

    pub fn encode(&self) -> Vec<u8> {
        match self.encoding {
            TextEncoding::Utf8 => self.text.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => {
                let mut out = UTF8_BOM.to_vec();
                out.extend_from_slice(self.text.as_bytes());
                out
            }
            TextEncoding::Utf16Le => {
                let mut out = UTF16LE_BOM.to_vec();
                for unit in self.text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
        }
    }

    pub fn with_text(&self, text: String) -> Self {
        Self {
            encoding: self.encoding,
            text,
        }
    }
}

/// Contents of a new marker record.
pub fn fresh_record(icon_file_name: &str, folder_type: &str) -> std::io::Result<String> {
    let mut ini = Ini::new();
    ini.with_section(Some(SHELL_SECTION))
        .set(ICON_RESOURCE_KEY, icon_resource_value(icon_file_name));
    ini.with_section(Some(VIEW_STATE_SECTION))
        .set("Mode", "")
        .set("Vid", "")
        .set("FolderType", folder_type);

    let mut out = Vec::new();
    ini.write_to_opt(
        &mut out,
        WriteOption {
            escape_policy: EscapePolicy::Nothing,
            line_separator: LineSeparator::CRLF,
            ..Default::default()
        },
    )?;
    String::from_utf8(out).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Check that `text` is a well-formed INI document.
///
/// Backslashes are literal in `desktop.ini` (`C:\Windows\...`), so escape
/// processing is disabled.
pub fn validate(text: &str) -> Result<(), ParseError> {
    Ini::load_from_str_noescape(text).map(|_| ())
}

/// Current `IconResource` of the shell section, matched case-insensitively.
pub fn icon_resource(text: &str) -> Option<String> {
    let ini = Ini::load_from_str_noescape(text).ok()?;
    ini.iter()
        .filter(|(section, _)| section.is_some_and(|s| s.eq_ignore_ascii_case(SHELL_SECTION)))
        .flat_map(|(_, props)| props.iter())
        .find(|(key, _)| key.eq_ignore_ascii_case(ICON_RESOURCE_KEY))
        .map(|(_, value)| value.to_string())
}

/// Point the shell section's `IconResource` at `icon_file_name`.
///
/// Every line other than the `IconResource` line(s) is kept byte for byte.
/// The existing key spelling and the spacing around its delimiter are kept.
/// A missing key goes directly below the section header; a missing section
/// is appended at the end.
pub fn set_icon_resource(text: &str, icon_file_name: &str) -> String {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let value = icon_resource_value(icon_file_name);

    let mut lines: Vec<String> = Vec::new();
    let mut in_shell = false;
    let mut shell_header: Option<usize> = None;
    let mut key_written = false;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        let terminator = &line[content.len()..];

        if let Some(name) = section_name(content) {
            in_shell = name.eq_ignore_ascii_case(SHELL_SECTION);
            if in_shell && shell_header.is_none() {
                shell_header = Some(lines.len());
            }
            lines.push(line.to_string());
            continue;
        }

        if in_shell {
            if let Some(split) = key_split(content) {
                if content[..split].trim().eq_ignore_ascii_case(ICON_RESOURCE_KEY) {
                    let after = &content[split + 1..];
                    let spacing = &after[..after.len() - after.trim_start().len()];
                    lines.push(format!(
                        "{}{}{}{}",
                        &content[..=split],
                        spacing,
                        value,
                        terminator
                    ));
                    key_written = true;
                    continue;
                }
            }
        }

        lines.push(line.to_string());
    }

    match shell_header {
        Some(index) if !key_written => {
            if !lines[index].ends_with('\n') {
                lines[index].push_str(newline);
            }
            lines.insert(
                index + 1,
                format!("{}={}{}", ICON_RESOURCE_KEY, value, newline),
            );
        }
        None => {
            if let Some(last) = lines.last_mut() {
                if !last.ends_with('\n') {
                    last.push_str(newline);
                }
            }
            lines.push(format!("[{}]{}", SHELL_SECTION, newline));
            lines.push(format!("{}={}{}", ICON_RESOURCE_KEY, value, newline));
        }
        _ => {}
    }

    lines.concat()
}

fn section_name(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    let inner = trimmed.strip_prefix('[')?;
    let end = inner.find(']')?;
    Some(inner[..end].trim())
}

// Byte offset of the key/value delimiter, skipping comments.
fn key_split(content: &str) -> Option<usize> {
    let trimmed = content.trim_start();
    if trimmed.starts_with(';') || trimmed.starts_with('#') {
        return None;
    }
    content.find(['=', ':'])
}

//! Path helpers for talking to git

use std::path::Path;

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Undo git's C-style quoting of a path (`"a\tb"`, `"caf\303\251"`)
///
/// Unquoted input is returned unchanged.
pub fn unquote_git_path(raw: &str) -> String {
  let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
    return raw.to_string();
  };

  let mut bytes = Vec::with_capacity(inner.len());
  let mut chars = inner.bytes().peekable();
  while let Some(b) = chars.next() {
    if b != b'\\' {
      bytes.push(b);
      continue;
    }
    match chars.next() {
      Some(b'n') => bytes.push(b'\n'),
      Some(b't') => bytes.push(b'\t'),
      Some(b'r') => bytes.push(b'\r'),
      Some(b'a') => bytes.push(0x07),
      Some(b'b') => bytes.push(0x08),
      Some(b'f') => bytes.push(0x0c),
      Some(b'v') => bytes.push(0x0b),
      Some(d @ b'0'..=b'7') => {
        let mut value = u32::from(d - b'0');
        for _ in 0..2 {
          match chars.peek() {
            Some(&n @ b'0'..=b'7') => {
              value = value * 8 + u32::from(n - b'0');
              chars.next();
            }
            _ => break,
          }
        }
        bytes.push(value as u8);
      }
      Some(other) => bytes.push(other),
      None => bytes.push(b'\\'),
    }
  }

  String::from_utf8_lossy(&bytes).into_owned()
}

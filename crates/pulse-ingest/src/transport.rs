//! Browser upload transport encoding.
//!
//! A file read with `FileReader.readAsDataURL` arrives as
//! `data:<mime>;base64,<payload>`. A bare base64 payload is accepted too.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{Error, Result};

/// Decode an upload payload into the raw file bytes.
pub fn decode_contents(contents: &str) -> Result<Vec<u8>> {
  let payload = match contents.split_once(',') {
    Some((header, data)) => {
      if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(Error::Transport(
          "expected a base64 data URL".to_string(),
        ));
      }
      data
    }
    None => contents,
  };
  Ok(STANDARD.decode(payload.trim())?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_data_url() {
    let bytes = decode_contents("data:text/csv;base64,aGVsbG8=").unwrap();
    assert_eq!(bytes, b"hello");
  }

  #[test]
  fn decodes_bare_payload() {
    assert_eq!(decode_contents("aGVsbG8=").unwrap(), b"hello");
  }

  #[test]
  fn rejects_non_base64_data_url() {
    let err = decode_contents("data:text/csv,hello").unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
  }

  #[test]
  fn rejects_invalid_base64() {
    let err = decode_contents("data:text/csv;base64,@@@").unwrap_err();
    assert!(matches!(err, Error::Base64(_)));
  }
}

use crate::utils::error::Result;
use std::io::{IsTerminal, Read};

/// Picks the text to parse: the argument when given, otherwise piped stdin.
/// `None` means there is nothing to parse.
pub fn read_input(text: Option<&str>) -> Result<Option<String>> {
    if let Some(text) = text {
        return Ok(Some(text.to_string()));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    read_from(stdin.lock()).map(Some)
}

fn read_from<R: Read>(mut reader: R) -> Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    Ok(buffer)
}

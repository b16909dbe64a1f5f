pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a plan from `--input` if given, otherwise from piped stdin.
pub fn read_plan<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path).map(Some);
    }
    match stdin::piped_text()? {
        Some(text) => stdin::parse_plan("stdin", &text),
        None => Ok(None),
    }
}

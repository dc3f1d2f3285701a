use crate::url::output_identifier;
use crate::{DiscovererError, Result};
use std::path::{Path, PathBuf};

/// Extension of every result file
pub const RESULT_EXTENSION: &str = "txt";

/// Builds the result file path for `domain` inside `output_dir`
///
/// The identifier is derived with [`output_identifier`]; identifiers that
/// would escape the directory are refused.
///
/// # Examples
///
/// ```
/// use product_discoverer::output::result_path;
/// use std::path::Path;
///
/// let path = result_path(Path::new("out"), "https://www.example.com").unwrap();
/// assert_eq!(path, Path::new("out").join("example.txt"));
/// ```
pub fn result_path(output_dir: &Path, domain: &str) -> Result<PathBuf> {
    let identifier = output_identifier(domain);
    if !is_safe_identifier(&identifier) {
        return Err(DiscovererError::InvalidIdentifier {
            domain: domain.to_string(),
            identifier,
        });
    }
    Ok(output_dir.join(format!("{}.{}", identifier, RESULT_EXTENSION)))
}

/// Finds the result file previously written for `domain`
///
/// # Errors
///
/// * `DiscovererError::NotFound` - no result file exists yet
/// * `DiscovererError::InvalidIdentifier` - the domain maps to an unsafe name
pub fn locate_result(output_dir: &Path, domain: &str) -> Result<PathBuf> {
    let path = result_path(output_dir, domain)?;
    if path.is_file() {
        Ok(path)
    } else {
        Err(DiscovererError::NotFound {
            domain: domain.to_string(),
        })
    }
}

fn is_safe_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier != "."
        && !identifier.contains("..")
        && !identifier.contains('/')
        && !identifier.contains('\\')
}

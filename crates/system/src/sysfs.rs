use std::path::Path;
use std::str::FromStr;

/// Read a sysfs attribute and parse its trimmed contents.
///
/// Returns `None` if the file is missing, unreadable or not a `T`.  Sysfs
/// attributes come and go with drivers and power states.
pub fn read_value<T: FromStr>(path: impl AsRef<Path>) -> Option<T> {
    std::fs::read_to_string(path.as_ref()).ok()?.trim().parse().ok()
}

/// First entry of `dir` whose file name starts with `prefix` and which
/// contains `attribute`.
pub fn find_with_attribute(dir: impl AsRef<Path>, prefix: &str, attribute: &str) -> Option<std::path::PathBuf> {
    let mut entries: Vec<_> = std::fs::read_dir(dir.as_ref())
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    entries.sort();
    entries.into_iter().find(|p| p.join(attribute).exists())
}

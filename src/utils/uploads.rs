use std::path::Path;

/// Read a local file for upload, returning its bare file name and
/// contents.
pub fn read_upload(path: &Path) -> std::io::Result<(String, Vec<u8>)> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(String::from)
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
        })?;

    let bytes = std::fs::read(path)?;
    Ok((filename, bytes))
}

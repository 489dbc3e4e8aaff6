//! Remote path normalization and display URL helpers.

use crate::error::{Result, StretchFsError};

/// Normalize the leading character of a remote path.
///
/// A leading `.` is dropped and a leading `/` is ensured. Nothing else in
/// the path is inspected.
pub fn sanitize_path(path: &str) -> String {
    let path = path.strip_prefix('.').unwrap_or(path);
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Normalize an upload target folder, which must end in `/`.
pub fn sanitize_folder(folder: &str) -> Result<String> {
    let folder = sanitize_path(folder);
    if !folder.ends_with('/') {
        return Err(StretchFsError::InvalidPath(format!(
            "folder must end with '/': {}",
            folder
        )));
    }
    Ok(folder)
}

/// Split a remote file path into its folder (with trailing `/`) and name.
pub fn split_file_path(path: &str) -> Result<(String, String)> {
    let path = sanitize_path(path);
    // sanitize_path guarantees a leading '/', so rfind always hits
    let idx = path.rfind('/').unwrap_or(0);
    let (folder, name) = path.split_at(idx + 1);
    if name.is_empty() {
        return Err(StretchFsError::InvalidPath(format!(
            "path has no file name: {}",
            path
        )));
    }
    Ok((folder.to_string(), name.to_string()))
}

/// Public static URL for stored content, `//{domain}/static/{hash}/{name}`.
pub fn static_url(domain: &str, hash: &str, name: &str) -> String {
    format!("//{}/static/{}/{}", domain, hash, urlencoding::encode(name))
}

/// Download URL for a file produced by a job.
pub fn job_content_url(domain: &str, port: u16, handle: &str, file: &str) -> String {
    format!(
        "//{}:{}/job/content/download/{}/{}",
        domain, port, handle, file
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_relative() {
        assert_eq!(sanitize_path("relative/path"), "/relative/path");
    }

    #[test]
    fn test_sanitize_absolute_unchanged() {
        assert_eq!(sanitize_path("/already/abs"), "/already/abs");
    }

    #[test]
    fn test_sanitize_leading_dot() {
        assert_eq!(sanitize_path(".hidden/path"), "/hidden/path");
        assert_eq!(sanitize_path("./here"), "/here");
    }

    #[test]
    fn test_sanitize_empty_is_root() {
        assert_eq!(sanitize_path(""), "/");
        assert_eq!(sanitize_path("."), "/");
    }

    #[test]
    fn test_folder_requires_trailing_slash() {
        assert_eq!(sanitize_folder("docs/").unwrap(), "/docs/");
        assert_eq!(sanitize_folder("/").unwrap(), "/");
        assert!(matches!(
            sanitize_folder("/docs"),
            Err(StretchFsError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_split_file_path() {
        let (folder, name) = split_file_path("a/b/c.txt").unwrap();
        assert_eq!(folder, "/a/b/");
        assert_eq!(name, "c.txt");

        let (folder, name) = split_file_path("top.txt").unwrap();
        assert_eq!(folder, "/");
        assert_eq!(name, "top.txt");

        assert!(split_file_path("/a/b/").is_err());
    }

    #[test]
    fn test_static_url_encodes_name() {
        assert_eq!(
            static_url("cdn.example.com", "abc123", "my file.txt"),
            "//cdn.example.com/static/abc123/my%20file.txt"
        );
    }

    #[test]
    fn test_job_content_url() {
        assert_eq!(
            job_content_url("cdn.example.com", 8161, "H1", "f.zip"),
            "//cdn.example.com:8161/job/content/download/H1/f.zip"
        );
    }
}

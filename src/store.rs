use crate::Error;
use std::path::PathBuf;
use rocket::fs::TempFile;
use rocket::http::RawStr;
use rocket::tokio::fs;


/// Abstract storage for uploaded image bytes, decoupling the upload pipeline
/// from the storage backend. `put` persists the bytes and returns the public
/// URL saved in the photo's `image_url` column; `serve_url` resolves a stored
/// name to the direct asset path the `/uploads/<filename>` route redirects to.
#[rocket::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, stored_name: &str, file: &mut TempFile<'_>) -> Result<String, Error>;
    fn serve_url(&self, stored_name: &str) -> String;
}


/// Blob store backed by a local directory, served through the static file
/// server mounted on `/media`. Suitable for development : a same-named upload
/// silently overwrites the previous file, last writer wins.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: &str) -> Self {
        Self {
            root: PathBuf::from(root),
        }
    }
}

#[rocket::async_trait]
impl BlobStore for DiskStore {
    async fn put(&self, stored_name: &str, file: &mut TempFile<'_>) -> Result<String, Error> {
        // Creating the directory is idempotent, concurrent uploads may both
        // attempt it safely
        fs::create_dir_all(&self.root).await
            .map_err(|e| Error::FileError(e, self.root.clone()))?;

        let mut path = self.root.clone();
        path.push(stored_name);
        file.move_copy_to(&path).await
            .map_err(|e| Error::FileError(e, path.clone()))?;

        Ok(format!("/uploads/{}", stored_name))
    }

    fn serve_url(&self, stored_name: &str) -> String {
        // The name goes into a Location header : reserved characters like
        // '%', '#' or '?' must be percent-encoded to keep the path intact
        format!("/media/{}", RawStr::new(stored_name).percent_encode())
    }
}


/// Reduce a client-supplied filename to its final path component, so a name
/// like "../../etc/passwd" can't escape the uploads directory. Returns None
/// when nothing usable remains.
pub fn sanitize_filename(original_filename: &str) -> Option<String> {
    let name = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");
    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(sanitize_filename("Nature_Hike.jpg").as_deref(), Some("Nature_Hike.jpg"));
        assert_eq!(sanitize_filename("random.png").as_deref(), Some("random.png"));
    }

    #[test]
    fn path_components_are_stripped() {
        assert_eq!(sanitize_filename("holiday/city.jpg").as_deref(), Some("city.jpg"));
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_filename("C:\\photos\\people.png").as_deref(), Some("people.png"));
    }

    #[test]
    fn unusable_names_are_rejected() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("."), None);
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename("photos/"), None);
    }

    #[test]
    fn disk_store_urls_use_the_stored_name() {
        let store = DiskStore::new("uploads");
        assert_eq!(store.serve_url("city.jpg"), "/media/city.jpg");
    }

    #[test]
    fn disk_store_urls_escape_reserved_characters() {
        let store = DiskStore::new("uploads");
        assert_eq!(store.serve_url("100% city#1.jpg"), "/media/100%25%20city%231.jpg");
        assert_eq!(store.serve_url("what?.png"), "/media/what%3F.png");
    }
}

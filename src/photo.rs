use rocket::serde::Serialize;

use crate::classify::Classification;


/// A photo row as stored in the database and rendered in the gallery.
/// Rows are written once on upload and never updated or deleted.
#[derive(Serialize, Clone, Debug)]
pub struct Photo {
    /// Unique, sequentially assigned by the database
    pub id: i64,
    /// Original client-supplied name, kept for display
    pub filename: String,
    /// Public URL of the stored bytes
    pub image_url: String,
    /// UTC timestamp assigned by the database at insert
    pub upload_date: String,
    pub category: String,
    /// Comma-joined tag tokens, empty under the filename heuristic
    pub tags: String,
}


/// The caller-provided part of a photo row : `id` and `upload_date` are
/// assigned by the database on insert
#[derive(Debug)]
pub struct NewPhoto {
    pub filename: String,
    pub image_url: String,
    pub category: String,
    pub tags: String,
}

impl NewPhoto {
    pub fn new(filename: String, image_url: String, classification: &Classification) -> Self {
        Self {
            filename,
            image_url,
            category: classification.category.as_str().to_string(),
            tags: classification.tags_joined(),
        }
    }
}

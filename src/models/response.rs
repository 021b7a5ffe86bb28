use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

/// Returned by the image upload endpoint; `id` is the opaque handle the
/// editor stores in `featuredImage`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponseDto {
    pub status: &'static str,
    pub id: String,
}

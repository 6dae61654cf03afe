//! Generated wallpaper model

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MoodPaperError, MoodPaperResult};

/// Raw image returned by a generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64 image bytes
    pub data: String,
}

/// One generated wallpaper variation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallpaper {
    /// Unique within a session: `<unix-millis>-<index>-<random>`
    pub id: String,
    /// Displayable image reference (`data:` URL)
    pub url: String,
    /// Prompt that produced this wallpaper
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

/// Length of the random id suffix
const ID_SUFFIX_LEN: usize = 9;

/// Nine lowercase base-36 characters drawn from a v4 UUID
fn random_suffix() -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut value = Uuid::new_v4().as_u128();
    (0..ID_SUFFIX_LEN)
        .map(|_| {
            let digit = DIGITS[(value % 36) as usize] as char;
            value /= 36;
            digit
        })
        .collect()
}

impl Wallpaper {
    /// Wrap a generated image; `index` is its position within the batch
    pub fn from_image(image: GeneratedImage, prompt: &str, index: usize) -> Self {
        let timestamp = Utc::now();
        Self {
            id: format!("{}-{}-{}", timestamp.timestamp_millis(), index, random_suffix()),
            url: format!("data:{};base64,{}", image.mime_type, image.data),
            prompt: prompt.to_string(),
            timestamp,
        }
    }

    /// MIME type from the data URL
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.url.strip_prefix("data:")?;
        rest.split_once(';').map(|(mime, _)| mime)
    }

    /// Decode the image bytes from the data URL
    pub fn image_bytes(&self) -> MoodPaperResult<Vec<u8>> {
        let (_, data) = self
            .url
            .split_once(";base64,")
            .filter(|_| self.url.starts_with("data:"))
            .ok_or_else(|| {
                MoodPaperError::Validation(format!("wallpaper {} has no inline image", self.id))
            })?;
        STANDARD.decode(data).map_err(|e| {
            MoodPaperError::Validation(format!("wallpaper {} has invalid image data: {}", self.id, e))
        })
    }

    /// File extension matching the image type
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type() {
            Some("image/jpeg") | Some("image/jpg") => "jpg",
            Some("image/webp") => "webp",
            Some("image/gif") => "gif",
            _ => "png",
        }
    }

    pub fn file_name(&self) -> String {
        format!("moodpaper-{}.{}", self.id, self.file_extension())
    }
}

use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

/// Guess a MIME type from a file extension.
///
/// Covers what the image picker and the audio recorder produce.
pub fn mime_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FALLBACK;
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "m4a" => "audio/m4a",
        "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "caf" => "audio/x-caf",
        "3gp" => "audio/3gpp",
        "ogg" => "audio/ogg",
        "webm" => "audio/webm",
        _ => FALLBACK,
    }
}

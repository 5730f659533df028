//! Decoding insight images off the UI thread.

/// Largest edge, in pixels, of an insight image kept for display.
const MAX_EDGE: u32 = 1024;

#[derive(Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub fn decode_insight_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = if dynamic.width() > MAX_EDGE || dynamic.height() > MAX_EDGE {
        dynamic.thumbnail(MAX_EDGE, MAX_EDGE)
    } else {
        dynamic
    }
    .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

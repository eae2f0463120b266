// The decoding collaborator hands frames over as PNG dumps (one file per
// sampled frame, fixed rate, typically 10/s). This helper turns one such
// dump into a `Frame`; it is the only place the crate touches an image
// codec, keeping the analysis stages free of any decode concern.

pub mod image_helper {
    use crate::core_modules::frame::Frame;
    use image::ImageFormat;

    /// Decodes one PNG frame dump into an RGBA `Frame` stamped with the
    /// caller-supplied presentation time.
    pub fn frame_from_png(bytes: &[u8], timestamp: f64) -> Result<Frame, image::ImageError> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Frame::new(timestamp, width, height, decoded.into_raw()))
    }
}

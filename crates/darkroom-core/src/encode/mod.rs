//! Output encoding for rendered bitmaps.
//!
//! Rendered bitmaps are RGBA; the JPEG encoder drops alpha and takes the
//! host's 0-1 quality scale.
//!
//! # Examples
//!
//! ```ignore
//! use darkroom_core::encode::encode_jpeg;
//!
//! let rendered = Bitmap::filled(100, 100, [128, 128, 128, 255]);
//! let jpeg_bytes = encode_jpeg(&rendered, 0.9)?;
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, quality_to_jpeg, EncodeError};

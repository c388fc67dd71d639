//! # feedback-qr
//!
//! Generates the branded feedback QR code for a hotel: a QR code encoding
//! `https://roommitra.com/feedback?h=<hotel_code>`, with a transparent
//! background and a logo centered on top.
//!
//! ## Pipeline
//!
//! 1. **URL**: [`url::feedback_url`] builds the payload from the hotel code.
//! 2. **Encode**: an [`encoder::Encoder`] turns the payload into a [`encoder::ModuleGrid`]
//!    (default [`encoder::QrEncoder`], backed by the `qrcode` crate).
//! 3. **Rasterize**: [`raster::rasterize`] paints the grid into an RGBA image.
//! 4. **Key**: [`transparency::make_color_transparent`] turns the pure white
//!    background transparent.
//! 5. **Composite**: [`composite::composite`] resizes the logo and blends it
//!    over the center using its alpha channel.
//! 6. **Save**: [`helper::save_result`] writes `<output_dir>/qr_<hotel_code>.png`.
//!
//! Image decoding, resampling and PNG output go through [`codec::ImageCodec`],
//! so steps 3 to 5 can be tested on synthetic buffers.
//!
//! ## Example
//!
//! ```no_run
//! use feedback_qr::{config::GeneratorConfig, helper::generate_feedback_qr};
//!
//! let config = GeneratorConfig {
//!     hotel_code: "Woodrose".into(),
//!     logo_path: "assets/logo.png".into(),
//!     ..GeneratorConfig::default()
//! };
//! let path = generate_feedback_qr(&config).expect("failed to generate QR code");
//! assert!(path.ends_with("qr_Woodrose.png"));
//! ```
#![forbid(unsafe_code)]

pub mod codec;
pub mod composite;
pub mod config;
pub mod encoder;
pub mod error;
pub mod helper;
pub mod raster;
pub mod transparency;
pub mod url;

pub use config::GeneratorConfig;
pub use encoder::{EcLevel, Encoder, ModuleGrid, QrEncoder, VersionChoice};
pub use error::{QrError, QrResult};
pub use helper::{generate_feedback_qr, render_feedback_qr, save_result, CompositionResult};

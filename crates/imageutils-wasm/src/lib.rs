//! ImageUtils WASM - WebAssembly bindings for the imageutils engine
//!
//! Exposes the four transform methods (crop, rotate, resize, resizeToMax) to
//! JavaScript. Every call takes encoded image bytes and returns re-encoded
//! bytes, or `undefined`/`null` when the call fails for any reason.
//!
//! # Module Structure
//!
//! - `args` - Named-argument method calls and boundary errors
//! - `channel` - Reply delivery and failure logging
//!
//! # Usage
//!
//! ```typescript
//! import init, { crop, handle_method_call, ImageUtils } from '@imageutils/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const jpeg = crop(bytes, 10, 10, 100, 100, 90, 0);
//! if (jpeg === undefined) console.log('crop failed');
//!
//! // Named arguments with a reply callback
//! handle_method_call('resizeToMax', { bytes, maxSize: 256, quality: 80, format: 2 }, (out) => {
//!   if (out !== null) show(out);
//! });
//!
//! // Engine with its own configuration
//! const utils = new ImageUtils({ upscaleToMax: false, background: [255, 255, 255, 255] });
//! const png = utils.rotate(bytes, 15, 100, 1);
//! ```

use imageutils_core::{Engine, EngineConfig, OutputFormat, TransformRequest};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod args;
pub mod channel;

pub use args::{Arguments, BoundaryError, Method, MethodCall};
pub use channel::{respond, run_request, JsResponder, Responder};

/// Crop `bytes` to the rectangle at (`x`, `y`) of `width` × `height`.
///
/// Coordinates refer to the image after EXIF orientation correction.
#[wasm_bindgen]
pub fn crop(
    bytes: &[u8],
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    quality: i32,
    format: i32,
) -> Option<Vec<u8>> {
    let request = TransformRequest::crop(x, y, width, height, quality, format);
    run_request(&Engine::default(), &request, bytes)
}

/// Rotate `bytes` clockwise by `angle` degrees.
#[wasm_bindgen]
pub fn rotate(bytes: &[u8], angle: i32, quality: i32, format: i32) -> Option<Vec<u8>> {
    let request = TransformRequest::rotate(angle, quality, format);
    run_request(&Engine::default(), &request, bytes)
}

/// Resize `bytes` to exactly `dest_width` × `dest_height`.
#[wasm_bindgen]
pub fn resize(
    bytes: &[u8],
    dest_width: i32,
    dest_height: i32,
    quality: i32,
    format: i32,
) -> Option<Vec<u8>> {
    let request = TransformRequest::resize(dest_width, dest_height, quality, format);
    run_request(&Engine::default(), &request, bytes)
}

/// Scale `bytes` so the longer side equals `max_size`.
#[wasm_bindgen]
pub fn resize_to_max(bytes: &[u8], max_size: i32, quality: i32, format: i32) -> Option<Vec<u8>> {
    let request = TransformRequest::resize_to_max(max_size, quality, format);
    run_request(&Engine::default(), &request, bytes)
}

/// Run a named method with an object of named arguments and deliver the
/// result to `reply` as a `Uint8Array` or `null`.
///
/// `reply` is always called exactly once, including when `args` cannot be
/// read.
#[wasm_bindgen]
pub fn handle_method_call(method: &str, args: JsValue, reply: &js_sys::Function) {
    dispatch_js(&Engine::default(), method, args, reply);
}

fn dispatch_js(engine: &Engine, method: &str, args: JsValue, reply: &js_sys::Function) {
    let responder = JsResponder(reply.clone());
    match serde_wasm_bindgen::from_value::<Arguments>(args) {
        Ok(arguments) => respond(engine, MethodCall::new(method, arguments), responder),
        Err(err) => {
            let err = BoundaryError::InvalidArguments(err.to_string());
            channel::report_failure(method, &err);
            responder.reply(None);
        }
    }
}

/// Transform engine with its own configuration.
#[wasm_bindgen]
pub struct ImageUtils {
    engine: Engine,
}

#[wasm_bindgen]
impl ImageUtils {
    /// Create an engine from an optional configuration object.
    ///
    /// # Errors
    /// Returns error if `config` is present but has the wrong shape
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ImageUtils, JsValue> {
        if config.is_undefined() || config.is_null() {
            return Ok(ImageUtils::default());
        }
        let config: EngineConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid engine config: {}", e)))?;
        Ok(ImageUtils::with_config(config))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn crop(
        &self,
        bytes: &[u8],
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        quality: i32,
        format: i32,
    ) -> Option<Vec<u8>> {
        let request = TransformRequest::crop(x, y, width, height, quality, format);
        run_request(&self.engine, &request, bytes)
    }

    pub fn rotate(&self, bytes: &[u8], angle: i32, quality: i32, format: i32) -> Option<Vec<u8>> {
        run_request(&self.engine, &TransformRequest::rotate(angle, quality, format), bytes)
    }

    pub fn resize(
        &self,
        bytes: &[u8],
        dest_width: i32,
        dest_height: i32,
        quality: i32,
        format: i32,
    ) -> Option<Vec<u8>> {
        let request = TransformRequest::resize(dest_width, dest_height, quality, format);
        run_request(&self.engine, &request, bytes)
    }

    pub fn resize_to_max(
        &self,
        bytes: &[u8],
        max_size: i32,
        quality: i32,
        format: i32,
    ) -> Option<Vec<u8>> {
        let request = TransformRequest::resize_to_max(max_size, quality, format);
        run_request(&self.engine, &request, bytes)
    }

    pub fn handle_method_call(&self, method: &str, args: JsValue, reply: &js_sys::Function) {
        dispatch_js(&self.engine, method, args, reply);
    }
}

impl ImageUtils {
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: Engine::new(config),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl Default for ImageUtils {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

/// One entry of the output format table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatInfo {
    pub name: &'static str,
    pub code: i32,
    pub mime_type: &'static str,
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Jpeg => "JPEG",
        OutputFormat::Png => "PNG",
        OutputFormat::WebP => "WEBP",
    }
}

/// The `format` codes accepted by every method.
pub fn format_table() -> Vec<FormatInfo> {
    OutputFormat::ALL
        .iter()
        .map(|&format| FormatInfo {
            name: format_name(format),
            code: format.code(),
            mime_type: format.mime_type(),
        })
        .collect()
}

/// Output formats as an array of `{ name, code, mimeType }`.
#[wasm_bindgen]
pub fn output_formats() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&format_table()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

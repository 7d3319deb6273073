//! Reply delivery for boundary calls.
//!
//! Every call produces exactly one reply: the encoded bytes, or `None` when
//! anything went wrong. Failures are logged with their kind before they
//! collapse to `None`.

use imageutils_core::{Engine, TransformRequest};
use tracing::warn;
use wasm_bindgen::JsValue;

use crate::args::{BoundaryError, MethodCall};

/// Receiver of a call's single reply.
pub trait Responder {
    fn reply(self, payload: Option<Vec<u8>>);
}

impl<F> Responder for F
where
    F: FnOnce(Option<Vec<u8>>),
{
    fn reply(self, payload: Option<Vec<u8>>) {
        self(payload)
    }
}

/// A JavaScript callback used as a responder. It is called with a
/// `Uint8Array` or `null`.
pub struct JsResponder(pub js_sys::Function);

impl Responder for JsResponder {
    fn reply(self, payload: Option<Vec<u8>>) {
        let value = match payload {
            Some(bytes) => js_sys::Uint8Array::from(bytes.as_slice()).into(),
            None => JsValue::NULL,
        };
        if let Err(err) = self.0.call1(&JsValue::NULL, &value) {
            warn!(error = ?err, "reply callback threw");
        }
    }
}

/// Log a boundary failure.
pub(crate) fn report_failure(method: &str, err: &BoundaryError) {
    warn!(method, kind = err.kind(), error = %err, "call failed");

    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&format!(
        "imageutils: {} failed ({}): {}",
        method,
        err.kind(),
        err
    )));
}

/// Run an already-built request, collapsing failure to `None`.
pub fn run_request(engine: &Engine, request: &TransformRequest, bytes: &[u8]) -> Option<Vec<u8>> {
    match engine.execute(request, bytes) {
        Ok(encoded) => Some(encoded.into_bytes()),
        Err(err) => {
            report_failure(request.operation.name(), &BoundaryError::from(err));
            None
        }
    }
}

fn dispatch(engine: &Engine, call: MethodCall) -> Result<Vec<u8>, BoundaryError> {
    let (request, bytes) = call.into_request()?;
    let encoded = engine.execute(&request, &bytes)?;
    Ok(encoded.into_bytes())
}

/// Resolve and run a method call.
pub fn handle_method_call(engine: &Engine, call: MethodCall) -> Option<Vec<u8>> {
    let method = call.method.clone();
    match dispatch(engine, call) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            report_failure(&method, &err);
            None
        }
    }
}

/// Run `call` and hand the outcome to `responder`. Replies exactly once.
pub fn respond<R: Responder>(engine: &Engine, call: MethodCall, responder: R) {
    responder.reply(handle_method_call(engine, call));
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use imageutils_core::encode::encode_image;
    use imageutils_core::{EngineConfig, OutputFormat, RasterImage};

    use super::*;
    use crate::args::Arguments;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RasterImage::filled(width, height, [10, 20, 30, 255]).unwrap();
        encode_image(&image, 100, OutputFormat::Png).unwrap().into_bytes()
    }

    fn dimensions(bytes: &[u8]) -> (u32, u32) {
        let engine = Engine::default();
        let decoded = imageutils_core::decode::decode_image(bytes, &engine.config().decode_limits())
            .unwrap();
        decoded.dimensions()
    }

    fn resize_call(bytes: Vec<u8>, width: i32, height: i32) -> MethodCall {
        MethodCall::new(
            "resize",
            Arguments {
                bytes: Some(bytes),
                dest_width: Some(width),
                dest_height: Some(height),
                quality: Some(80),
                format: Some(1),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_handle_method_call_success() {
        let engine = Engine::default();
        let reply = handle_method_call(&engine, resize_call(png(40, 20), 10, 30)).unwrap();
        assert_eq!(dimensions(&reply), (10, 30));
    }

    #[test]
    fn test_handle_method_call_collapses_failures() {
        let engine = Engine::default();

        // Unknown method
        let mut call = resize_call(png(4, 4), 2, 2);
        call.method = "sharpen".to_string();
        assert_eq!(handle_method_call(&engine, call), None);

        // Missing argument
        let mut call = resize_call(png(4, 4), 2, 2);
        call.arguments.dest_height = None;
        assert_eq!(handle_method_call(&engine, call), None);

        // Undecodable bytes
        assert_eq!(handle_method_call(&engine, resize_call(vec![0; 16], 2, 2)), None);

        // Bad quality
        let mut call = resize_call(png(4, 4), 2, 2);
        call.arguments.quality = Some(150);
        assert_eq!(handle_method_call(&engine, call), None);

        // Bad geometry
        assert_eq!(handle_method_call(&engine, resize_call(png(4, 4), 0, 2)), None);

        // Output too large to allocate
        assert_eq!(
            handle_method_call(&engine, resize_call(png(4, 4), i32::MAX, i32::MAX)),
            None
        );
    }

    #[test]
    fn test_respond_replies_once_with_bytes() {
        let replies = RefCell::new(Vec::new());
        respond(&Engine::default(), resize_call(png(8, 8), 4, 4), |payload: Option<Vec<u8>>| {
            replies.borrow_mut().push(payload)
        });

        let replies = replies.into_inner();
        assert_eq!(replies.len(), 1);
        let bytes = replies[0].as_ref().unwrap();
        assert_eq!(dimensions(bytes), (4, 4));
    }

    #[test]
    fn test_respond_replies_once_with_absent() {
        let replies = RefCell::new(Vec::new());
        respond(
            &Engine::default(),
            resize_call(Vec::new(), 4, 4),
            |payload: Option<Vec<u8>>| replies.borrow_mut().push(payload),
        );
        assert_eq!(replies.into_inner(), vec![None]);
    }

    #[test]
    fn test_run_request_uses_engine_config() {
        let mut config = EngineConfig::default();
        config.upscale_to_max = false;
        let engine = Engine::new(config);

        let request = TransformRequest::resize_to_max(100, 90, 1);
        let reply = run_request(&engine, &request, &png(30, 10)).unwrap();
        assert_eq!(dimensions(&reply), (30, 10));

        let request = TransformRequest::resize_to_max(-1, 90, 1);
        assert_eq!(run_request(&engine, &request, &png(30, 10)), None);
    }
}

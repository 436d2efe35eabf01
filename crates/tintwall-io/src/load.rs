//! Futures over the browser's load and decode events.

use js_sys::{Array, Function, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlImageElement};

use crate::error::{DomError, describe};

/// Resolve once the document has been parsed.
///
/// Returns immediately when `DOMContentLoaded` has already fired.
///
/// # Errors
///
/// Returns [`DomError::Js`] if the listener cannot be registered.
pub async fn dom_ready(document: &Document) -> Result<(), DomError> {
    if document.ready_state() != "loading" {
        return Ok(());
    }
    let mut registered = Ok(());
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        let listener = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        registered =
            document.add_event_listener_with_callback("DOMContentLoaded", listener.unchecked_ref());
    });
    registered?;
    JsFuture::from(promise).await?;
    Ok(())
}

/// Create an `<img>`, point it at `src`, and resolve when it loads.
///
/// # Errors
///
/// Returns [`DomError::Load`] when the browser fires `error` for the
/// image, or [`DomError::Js`] if the element cannot be created.
pub async fn load_image(document: &Document, src: &str) -> Result<HtmlImageElement, DomError> {
    let image = document
        .create_element("img")?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| DomError::WrongType("image element"))?;

    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        let onload = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let onerror = Closure::once_into_js(move |event: JsValue| {
            let _ = reject.call1(&JsValue::NULL, &event);
        });
        image.set_onload(Some(onload.unchecked_ref()));
        image.set_onerror(Some(onerror.unchecked_ref()));
    });
    image.set_src(src);

    let outcome = JsFuture::from(promise).await;
    image.set_onload(None);
    image.set_onerror(None);
    match outcome {
        Ok(_) => Ok(image),
        Err(event) => Err(DomError::Load {
            src: src.to_owned(),
            reason: describe(&event),
        }),
    }
}

/// Resolve once every image in `images` has decoded.
///
/// Joins the images' `decode()` promises, so it also covers images that
/// finished before the call.
///
/// # Errors
///
/// Returns [`DomError::Js`] if any image fails to decode.
pub async fn wait_decoded(images: &[HtmlImageElement]) -> Result<(), DomError> {
    let decodes: Array = images.iter().map(HtmlImageElement::decode).collect();
    JsFuture::from(Promise::all(&decodes)).await?;
    Ok(())
}

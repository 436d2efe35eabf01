use log::LevelFilter;
use tintwall_core::GalleryConfig;
use wasm_bindgen::JsValue;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = tintwall_io::console_log::init(LevelFilter::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger not installed: {err}")));
    }

    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = tintwall_io::run(GalleryConfig::default()).await {
            log::error!("gallery failed: {err}");
        }
    });
}

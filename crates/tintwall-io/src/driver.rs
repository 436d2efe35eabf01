//! Wires the gallery to the live page.
//!
//! The driver owns the page behind `Rc<RefCell<_>>` so the demo-group
//! task and the gallery task can share it on the single browser thread.
//! No borrow is held across an `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use tintwall_core::{
    DemoGroupFilterRunner, FilterAssignmentTable, FilterEngine, Gallery, GalleryConfig,
    GalleryError, GroupId, Page,
};
use web_sys::Document;

use crate::dom::DomPage;
use crate::error::DomError;
use crate::load;
use crate::pixels_js::select_engine;

/// Errors that stop the driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A browser call failed outside any gallery operation.
    #[error(transparent)]
    Dom(#[from] DomError),

    /// A gallery operation failed.
    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

type SharedPage = Rc<RefCell<DomPage>>;
type SharedEngine = Rc<dyn FilterEngine>;

/// Run the gallery on the current document.
///
/// Waits for the document to be parsed, provisions the tile surfaces,
/// schedules the demo groups behind their decode join, then loads the
/// source image and orchestrates once it arrives.
///
/// # Errors
///
/// Returns [`DriverError`] if the page is missing required elements,
/// the source image fails to load, or orchestration fails. Demo-group
/// failures are logged and do not affect the result.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
pub async fn run(config: GalleryConfig) -> Result<(), DriverError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| DomError::Missing("document".into()))?;
    load::dom_ready(&document).await?;

    let page: SharedPage = Rc::new(RefCell::new(DomPage::new(document.clone(), &config)?));
    let engine: SharedEngine = Rc::from(select_engine());
    let runner = DemoGroupFilterRunner::new(FilterAssignmentTable::BUILTIN, config.bounds);

    let mut gallery = Gallery::<DomPage>::new(config);
    gallery.page_ready(&mut page.borrow_mut())?;

    wasm_bindgen_futures::spawn_local(demo_groups(Rc::clone(&page), Rc::clone(&engine), runner));

    load_and_orchestrate(&document, &page, &*engine, &mut gallery).await
}

#[allow(clippy::future_not_send)]
async fn load_and_orchestrate(
    document: &Document,
    page: &SharedPage,
    engine: &dyn FilterEngine,
    gallery: &mut Gallery<DomPage>,
) -> Result<(), DriverError> {
    let image = load::load_image(document, gallery.source()).await?;
    let pixels = page.borrow().image_pixels(&image)?;

    // Let the browser paint the provisioned tiles first.
    TimeoutFuture::new(0).await;

    if let Some(report) = gallery.on_image_loaded(&mut page.borrow_mut(), engine, &pixels)? {
        log::info!(
            "filled {} tiles in {:.1} ms ({} filters skipped)",
            report.applied.len(),
            report.total_duration.as_secs_f64() * 1000.0,
            report.skipped.len()
        );
    }
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn demo_groups(page: SharedPage, engine: SharedEngine, runner: DemoGroupFilterRunner) {
    if let Err(err) = run_demo_groups(&page, &*engine, runner).await {
        log::error!("demo groups: {err}");
    }
}

#[allow(clippy::future_not_send)]
async fn run_demo_groups(
    page: &SharedPage,
    engine: &dyn FilterEngine,
    runner: DemoGroupFilterRunner,
) -> Result<(), DriverError> {
    let images = {
        let page = page.borrow();
        let mut images = Vec::new();
        for group in GroupId::ALL {
            images.extend(page.thumbnails(group).map_err(GalleryError::from)?);
        }
        images
    };
    load::wait_decoded(&images).await?;

    let reports = runner.run_all(&mut *page.borrow_mut(), engine)?;
    for report in reports {
        log::debug!(
            "group {}: {} filtered, {} untouched",
            report.group,
            report.filtered,
            report.untouched
        );
    }
    Ok(())
}

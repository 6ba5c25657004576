//! Viewer Coordinator
//!
//! Owns the displayed image, the overlay and the recognition channel. All
//! overlay mutation happens here, on the thread that owns the viewer.

use ab_glyph::FontArc;
use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use image::RgbaImage;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, RecognitionInput};
use crate::overlay::surface::load_font;
use crate::overlay::{FitTransform, GraphicOverlay, ImageSurface, Surface, TextGraphic};
use crate::shared::{Notice, RecognitionEvent, RequestId, RuntimeState};
use crate::source::{scale_to_fit, Bitmap};
use crate::vision::{RecognitionService, TextRecognizer};

/// Image viewer with a recognized-text overlay
pub struct Viewer {
    config: AppConfig,
    /// Bitmap as loaded; every rescale starts from here
    source: Bitmap,
    /// Bitmap currently shown in the viewport
    displayed: Bitmap,
    /// Fit of `displayed` inside the viewport, once computed
    fit: Option<FitTransform>,
    overlay: GraphicOverlay,
    service: RecognitionService,
    events: Receiver<RecognitionEvent>,
    runtime: RuntimeState,
    label_font: Option<FontArc>,
}

impl Viewer {
    /// Create a viewer showing `source` unscaled until text is requested
    pub fn new(source: Bitmap, recognizer: Arc<dyn TextRecognizer>, config: AppConfig) -> Self {
        let (service, events) = RecognitionService::new(recognizer);
        info!(
            "Viewer ready: {}x{} image, {}x{} viewport, recognizer '{}'",
            source.width(),
            source.height(),
            config.viewport.width,
            config.viewport.height,
            service.recognizer_name()
        );

        let label_font = config.render.label_font.as_deref().and_then(|path| match load_font(path) {
            Ok(font) => {
                info!("Label font loaded from {:?}", path);
                Some(font)
            }
            Err(e) => {
                warn!("Labels will not be rasterized: {:#}", e);
                None
            }
        });

        Self {
            config,
            displayed: source.clone(),
            source,
            fit: None,
            overlay: GraphicOverlay::default(),
            service,
            events,
            runtime: RuntimeState::default(),
            label_font,
        }
    }

    /// "Find text" action: rescale, update the transform and dispatch recognition
    pub fn find_text(&mut self) -> Result<RequestId> {
        let viewport = self.config.viewport;
        let (scaled, fit) = scale_to_fit(
            &self.source,
            viewport.width,
            viewport.height,
            self.config.overlay.alignment,
        )
        .context("Failed to fit image into viewport")?;

        self.displayed = scaled;
        self.fit = Some(fit);

        let (input, transform) = match self.config.recognition.input {
            RecognitionInput::Displayed => (self.displayed.clone(), fit.displayed_to_view()),
            RecognitionInput::Source => (self.source.clone(), fit.source_to_view()),
        };
        self.overlay
            .set_transform(transform.context("Failed to derive overlay transform")?);
        debug!(
            "Overlay transform: scale {:.3}, offset {:?}",
            self.overlay.transform().scale(),
            self.overlay.transform().offset()
        );

        let request = self.service.submit(input);
        self.runtime.latest_request = Some(request);
        self.runtime.in_flight += 1;
        info!("Recognition request {} dispatched", request);
        Ok(request)
    }

    /// Apply every result that has already arrived
    pub fn poll(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            notices.extend(self.apply_event(event));
        }
        notices
    }

    /// Block until the latest request is answered or `timeout` elapses
    ///
    /// Returns the notice for the latest request, or `None` on timeout.
    pub fn wait_for_result(&mut self, timeout: Duration) -> Option<Notice> {
        let latest = self.runtime.latest_request?;
        if self.runtime.latest_applied() {
            // Already drained by an earlier poll
            return self.runtime.last_notice.clone();
        }
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok(event) => {
                    let request = event.request;
                    let notice = self.apply_event(event);
                    if request == latest {
                        return notice;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!("Timed out waiting for recognition request {}", latest);
                    return None;
                }
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Apply one recognition event to the overlay
    ///
    /// Results for anything but the latest request are dropped. Failures
    /// leave the overlay untouched.
    pub fn apply_event(&mut self, event: RecognitionEvent) -> Option<Notice> {
        self.runtime.in_flight = self.runtime.in_flight.saturating_sub(1);

        if self.runtime.latest_request != Some(event.request) {
            self.runtime.stale_results += 1;
            debug!("Discarding stale result for request {}", event.request);
            return None;
        }

        self.runtime.applied_request = Some(event.request);
        let notice = match event.outcome {
            Ok(result) => {
                self.overlay.clear();
                for element in result.elements() {
                    let graphic = TextGraphic::from_element(element, self.config.overlay.style.clone());
                    self.overlay.add(Box::new(graphic));
                }
                self.overlay.request_redraw();
                self.runtime.elements_displayed = self.overlay.len();
                self.runtime.clear_error();

                if self.overlay.is_empty() {
                    Notice::NoTextFound
                } else {
                    Notice::TextFound {
                        elements: self.overlay.len(),
                    }
                }
            }
            Err(e) => {
                error!("Text recognition failed for request {}: {}", event.request, e);
                self.runtime.set_error(e.to_string());
                Notice::RecognitionFailed(e.to_string())
            }
        };

        info!("{}", notice);
        self.runtime.last_notice = Some(notice.clone());
        Some(notice)
    }

    /// Paint the displayed image and the overlay onto `surface`
    pub fn paint(&self, surface: &mut ImageSurface) {
        let (x, y) = self.fit.map(|f| (f.offset_x, f.offset_y)).unwrap_or((0.0, 0.0));
        surface.draw_bitmap(&self.displayed, x, y);
        self.overlay.draw(surface);
    }

    /// Render a full viewport-sized frame
    pub fn render(&mut self) -> RgbaImage {
        let viewport = self.config.viewport;
        let mut surface = ImageSurface::new(viewport.width, viewport.height, self.config.render.background);
        if let Some(font) = &self.label_font {
            surface = surface.with_font(font.clone());
        }
        self.paint(&mut surface);
        self.overlay.take_redraw_request();
        surface.into_image()
    }

    /// Paint only the overlay onto an arbitrary surface
    pub fn paint_overlay(&self, surface: &mut dyn Surface) {
        self.overlay.draw(surface);
    }

    pub fn displayed(&self) -> &Bitmap {
        &self.displayed
    }

    pub fn fit(&self) -> Option<&FitTransform> {
        self.fit.as_ref()
    }

    pub fn runtime(&self) -> &RuntimeState {
        &self.runtime
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

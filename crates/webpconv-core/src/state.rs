//! Converter state and its transitions.
//!
//! [`ConverterState`] is the single record behind the converter UI:
//! source and converted images, settings, and the transient busy and
//! drag-hover flags. Every user gesture maps to one transition method;
//! none of them perform I/O, so the whole flow can be driven from tests
//! without a rendered interface.
//!
//! # Generations
//!
//! Acquisition and conversion both complete asynchronously in the
//! browser. Starting either hands out a ticket stamped with the current
//! generation; completing it with a ticket that is no longer current is
//! a no-op. Starting an acquisition also invalidates any in-flight
//! conversion, since its result would describe the previous source.

use serde::{Deserialize, Serialize};

use crate::types::{
    ConversionSettings, ConvertError, ConvertedImage, Download, OutputFormat, Quality, SourceImage,
};

/// Proof that an acquisition was started; pass it back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireTicket(u64);

/// Proof that a conversion was started; pass it back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertTicket(u64);

/// Everything needed to run one conversion, captured at invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    /// Ticket to hand to [`ConverterState::complete_convert`].
    pub ticket: ConvertTicket,
    /// Source bytes at invocation time.
    pub source: Vec<u8>,
    /// Settings at invocation time.
    pub settings: ConversionSettings,
}

impl ConvertRequest {
    /// Run the conversion this request describes.
    ///
    /// # Errors
    ///
    /// Propagates any [`ConvertError`] from the conversion stages.
    pub fn run(self) -> Result<ConvertedImage, ConvertError> {
        crate::pipeline::Pending::new(self.source, self.settings)
            .decode()?
            .allocate_surface()?
            .draw()
            .encode()
    }
}

/// The converter's complete state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterState {
    source: Option<SourceImage>,
    converted: Option<ConvertedImage>,
    settings: ConversionSettings,
    busy: bool,
    drag_hover: bool,
    last_failure: Option<String>,
    acquire_generation: u64,
    convert_generation: u64,
}

impl ConverterState {
    /// An empty state with the given settings.
    #[must_use]
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// The current source image, if one has been acquired.
    #[must_use]
    pub const fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The most recent conversion output for the current source.
    #[must_use]
    pub const fn converted(&self) -> Option<&ConvertedImage> {
        self.converted.as_ref()
    }

    /// Current output settings.
    #[must_use]
    pub const fn settings(&self) -> ConversionSettings {
        self.settings
    }

    /// Whether a conversion is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether a drag gesture is over the drop target.
    #[must_use]
    pub const fn is_drag_hover(&self) -> bool {
        self.drag_hover
    }

    /// Message from the last failed conversion of the current source.
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Whether the converted image was produced under settings that
    /// would now encode differently. Nothing reconverts automatically.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.converted.as_ref().is_some_and(|c| {
            c.format != self.settings.format
                || (c.format.supports_quality() && c.quality != self.settings.quality)
        })
    }

    /// Select the output format.
    pub const fn set_format(&mut self, format: OutputFormat) {
        self.settings.format = format;
    }

    /// Select the output quality.
    pub const fn set_quality(&mut self, quality: Quality) {
        self.settings.quality = quality;
    }

    /// Replace both settings at once.
    pub const fn set_settings(&mut self, settings: ConversionSettings) {
        self.settings = settings;
    }

    /// Track whether a drag gesture is over the drop target.
    pub const fn set_drag_hover(&mut self, hovering: bool) {
        self.drag_hover = hovering;
    }

    /// Start acquiring a new source image.
    ///
    /// Any conversion still in flight is invalidated and the busy flag
    /// is cleared, since that conversion can no longer complete.
    pub fn begin_acquire(&mut self) -> AcquireTicket {
        self.acquire_generation += 1;
        self.convert_generation += 1;
        self.busy = false;
        log::debug!("acquire #{} started", self.acquire_generation);
        AcquireTicket(self.acquire_generation)
    }

    /// Finish an acquisition.
    ///
    /// `None` means the file could not be read: the state is left
    /// unchanged apart from the drag-hover flag. On success the source
    /// is replaced and any converted image is cleared.
    ///
    /// Returns `true` if a new source image was applied.
    pub fn complete_acquire(&mut self, ticket: AcquireTicket, image: Option<SourceImage>) -> bool {
        self.drag_hover = false;
        if ticket.0 != self.acquire_generation {
            log::info!(
                "discarding stale acquire #{} (current #{})",
                ticket.0,
                self.acquire_generation
            );
            return false;
        }
        let Some(image) = image else {
            log::warn!("acquire #{} produced no image", ticket.0);
            return false;
        };
        log::debug!(
            "acquired {} ({} bytes)",
            image.name.as_deref().unwrap_or("<unnamed>"),
            image.bytes.len()
        );
        self.source = Some(image);
        self.converted = None;
        self.last_failure = None;
        true
    }

    /// Acquire a source image synchronously.
    pub fn acquire(&mut self, image: SourceImage) {
        let ticket = self.begin_acquire();
        self.complete_acquire(ticket, Some(image));
    }

    /// Start a conversion of the current source under the current
    /// settings.
    ///
    /// Returns `None`, leaving the state untouched, when there is no
    /// source image.
    pub fn begin_convert(&mut self) -> Option<ConvertRequest> {
        let Some(source) = self.source.as_ref() else {
            log::debug!("convert requested without a source image; ignoring");
            return None;
        };
        self.convert_generation += 1;
        self.busy = true;
        log::debug!(
            "convert #{} started: {} at quality {}",
            self.convert_generation,
            self.settings.format,
            self.settings.quality
        );
        Some(ConvertRequest {
            ticket: ConvertTicket(self.convert_generation),
            source: source.bytes.clone(),
            settings: self.settings,
        })
    }

    /// Finish a conversion.
    ///
    /// A stale ticket is discarded without touching the state. Otherwise
    /// the busy flag is cleared and the result stored; a failure keeps
    /// any previous converted image and records the error message.
    ///
    /// Returns `true` if the outcome was applied.
    pub fn complete_convert(
        &mut self,
        ticket: ConvertTicket,
        outcome: Result<ConvertedImage, ConvertError>,
    ) -> bool {
        if ticket.0 != self.convert_generation {
            log::info!(
                "discarding stale convert #{} (current #{})",
                ticket.0,
                self.convert_generation
            );
            return false;
        }
        self.busy = false;
        match outcome {
            Ok(converted) => {
                self.converted = Some(converted);
                self.last_failure = None;
            }
            Err(e) => {
                log::warn!("convert #{} failed: {e}", ticket.0);
                self.last_failure = Some(e.to_string());
            }
        }
        true
    }

    /// Convert synchronously: begin, run, and complete in one step.
    ///
    /// Returns `true` if a new converted image was stored.
    pub fn convert_now(&mut self) -> bool {
        let Some(request) = self.begin_convert() else {
            return false;
        };
        let ticket = request.ticket;
        let outcome = request.run();
        let succeeded = outcome.is_ok();
        self.complete_convert(ticket, outcome) && succeeded
    }

    /// Prepare a save of the converted image, if there is one.
    #[must_use]
    pub fn export(&self) -> Option<Download> {
        self.converted.as_ref().map(crate::export::prepare_download)
    }

    /// Drop both images and all transient flags, keeping settings.
    pub fn clear(&mut self) {
        self.acquire_generation += 1;
        self.convert_generation += 1;
        self.source = None;
        self.converted = None;
        self.busy = false;
        self.drag_hover = false;
        self.last_failure = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use super::*;
    use crate::types::Dimensions;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 9) as u8, (y * 9) as u8, 0, 255])
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    fn source(name: &str) -> SourceImage {
        SourceImage::new(Some(name.to_owned()), png(8, 4))
    }

    fn fake_converted(format: OutputFormat) -> ConvertedImage {
        ConvertedImage {
            format,
            quality: Quality::DEFAULT,
            dimensions: Dimensions {
                width: 1,
                height: 1,
            },
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn new_state_is_empty() {
        let state = ConverterState::default();
        assert!(state.source().is_none());
        assert!(state.converted().is_none());
        assert!(!state.is_busy());
        assert!(!state.is_drag_hover());
        assert_eq!(state.settings(), ConversionSettings::default());
    }

    #[test]
    fn convert_without_source_is_a_noop() {
        let mut state = ConverterState::default();
        let before = state.clone();
        assert!(state.begin_convert().is_none());
        assert_eq!(state, before);
        assert!(!state.convert_now());
        assert_eq!(state, before);
    }

    #[test]
    fn begin_convert_sets_busy_until_completion() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        let request = state.begin_convert().unwrap();
        assert!(state.is_busy());
        let ticket = request.ticket;
        assert!(state.complete_convert(ticket, request.run()));
        assert!(!state.is_busy());
        assert!(state.converted().is_some());
    }

    #[test]
    fn failed_conversion_clears_busy_and_keeps_previous_output() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        assert!(state.convert_now());
        let previous = state.converted().cloned();

        let request = state.begin_convert().unwrap();
        assert!(state.complete_convert(request.ticket, Err(ConvertError::EmptyInput)));
        assert!(!state.is_busy());
        assert_eq!(state.converted().cloned(), previous);
        assert_eq!(state.last_failure(), Some("input image data is empty"));
    }

    #[test]
    fn undecodable_source_reports_failure() {
        let mut state = ConverterState::default();
        state.acquire(SourceImage::new(None, b"not an image".to_vec()));
        assert!(!state.convert_now());
        assert!(!state.is_busy());
        assert!(state.converted().is_none());
        assert!(state.last_failure().unwrap().contains("decode"));
    }

    #[test]
    fn acquisition_clears_converted_image() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        assert!(state.convert_now());
        state.acquire(source("b.webp"));
        assert!(state.converted().is_none());
        assert_eq!(state.source().unwrap().name.as_deref(), Some("b.webp"));
    }

    #[test]
    fn failed_read_leaves_state_unchanged() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        assert!(state.convert_now());
        let ticket = state.begin_acquire();
        assert!(!state.complete_acquire(ticket, None));
        assert_eq!(state.source().unwrap().name.as_deref(), Some("a.webp"));
        assert!(state.converted().is_some());
    }

    #[test]
    fn stale_acquire_is_discarded() {
        let mut state = ConverterState::default();
        let first = state.begin_acquire();
        let second = state.begin_acquire();
        assert!(state.complete_acquire(second, Some(source("second.webp"))));
        assert!(!state.complete_acquire(first, Some(source("first.webp"))));
        assert_eq!(state.source().unwrap().name.as_deref(), Some("second.webp"));
    }

    #[test]
    fn newer_conversion_wins_over_older_completion() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        let older = state.begin_convert().unwrap();
        state.set_format(OutputFormat::Png);
        let newer = state.begin_convert().unwrap();

        assert!(state.complete_convert(newer.ticket, Ok(fake_converted(OutputFormat::Png))));
        assert!(!state.complete_convert(older.ticket, Ok(fake_converted(OutputFormat::Jpeg))));
        assert_eq!(state.converted().unwrap().format, OutputFormat::Png);
    }

    #[test]
    fn acquisition_invalidates_in_flight_conversion() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        let request = state.begin_convert().unwrap();
        assert!(state.is_busy());

        let ticket = state.begin_acquire();
        assert!(!state.is_busy());
        assert!(state.complete_acquire(ticket, Some(source("b.webp"))));

        assert!(!state.complete_convert(request.ticket, Ok(fake_converted(OutputFormat::Jpeg))));
        assert!(state.converted().is_none());
    }

    #[test]
    fn settings_change_after_conversion_marks_stale() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        assert!(state.convert_now());
        assert!(!state.is_stale());
        state.set_quality(Quality::new(10).unwrap());
        assert!(state.is_stale());
        state.set_format(OutputFormat::Png);
        assert!(state.is_stale());
    }

    #[test]
    fn quality_change_does_not_stale_png_output() {
        let mut state = ConverterState::new(ConversionSettings {
            format: OutputFormat::Png,
            quality: Quality::DEFAULT,
        });
        state.acquire(source("a.webp"));
        assert!(state.convert_now());
        state.set_quality(Quality::MIN);
        assert!(!state.is_stale());
    }

    #[test]
    fn converted_is_tagged_with_format_at_invocation() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        state.set_format(OutputFormat::Jpg);
        let request = state.begin_convert().unwrap();
        state.set_format(OutputFormat::Png);
        let ticket = request.ticket;
        assert!(state.complete_convert(ticket, request.run()));
        assert_eq!(state.converted().unwrap().format, OutputFormat::Jpg);
        assert_eq!(state.export().unwrap().filename, "converted-image.jpg");
    }

    #[test]
    fn export_without_conversion_is_none() {
        let mut state = ConverterState::default();
        assert!(state.export().is_none());
        state.acquire(source("a.webp"));
        assert!(state.export().is_none());
    }

    #[test]
    fn drag_hover_resets_on_drop() {
        let mut state = ConverterState::default();
        state.set_drag_hover(true);
        assert!(state.is_drag_hover());
        let ticket = state.begin_acquire();
        state.complete_acquire(ticket, Some(source("a.webp")));
        assert!(!state.is_drag_hover());
    }

    #[test]
    fn clear_keeps_settings() {
        let mut state = ConverterState::default();
        state.set_format(OutputFormat::Png);
        state.acquire(source("a.webp"));
        assert!(state.convert_now());
        state.clear();
        assert!(state.source().is_none());
        assert!(state.converted().is_none());
        assert_eq!(state.settings().format, OutputFormat::Png);
    }

    #[test]
    fn state_serializes_to_json() {
        let mut state = ConverterState::default();
        state.acquire(source("a.webp"));
        let json = serde_json::to_string(&state).unwrap();
        let back: ConverterState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}

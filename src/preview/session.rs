//! Multi-part preview session
//!
//! A session holds the parts produced by one operation (merge, split, ...),
//! tracks the current part and page, and renders that page through a
//! [`DocumentRenderer`]. Navigation may be issued while a render is still in
//! flight: every render request takes a sequence number and a result is only
//! shown if no newer request was issued in the meantime.

use crate::error::{Error, Result};
use crate::preview::config::PreviewConfig;
use crate::preview::renderer::{DocumentHandle, DocumentRenderer, RenderedPage};
use crate::preview::saver::FileSaver;
use futures_util::future::try_join_all;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// One previewable, downloadable document
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    handle: DocumentHandle,
}

impl Part {
    /// Suggested file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Document bytes
    pub fn bytes(&self) -> &[u8] {
        self.handle.bytes()
    }

    /// Page count reported by the renderer
    pub fn total_pages(&self) -> u32 {
        self.handle.page_count()
    }
}

/// The page currently on display
#[derive(Debug, Clone)]
pub struct DisplayedPage {
    pub part_index: usize,
    pub part_name: String,
    pub page: u32,
    pub total_pages: u32,
    pub surface: Arc<RenderedPage>,
}

impl DisplayedPage {
    /// "Page X of Y"
    pub fn indicator(&self) -> String {
        page_indicator(self.page, self.total_pages)
    }
}

/// Result of a render request that did not fail
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    /// The page is now on display
    Displayed(DisplayedPage),
    /// A newer request was issued before this one finished; its result was dropped
    Superseded,
}

impl RenderOutcome {
    pub fn is_displayed(&self) -> bool {
        matches!(self, RenderOutcome::Displayed(_))
    }
}

/// Summary of a part for status output
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PartSummary {
    pub name: String,
    pub total_pages: u32,
    pub size_bytes: usize,
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionStatus {
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
    pub parts: Vec<PartSummary>,
    pub current_part_index: usize,
    pub current_page: u32,
    pub total_pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayed_page: Option<u32>,
    pub has_previous_part: bool,
    pub has_next_part: bool,
}

fn page_indicator(page: u32, total: u32) -> String {
    format!("Page {} of {}", page, total)
}

struct OpenState {
    parts: Vec<Part>,
    base_name: String,
    current_part: usize,
    current_page: u32,
    displayed: Option<DisplayedPage>,
}

impl OpenState {
    fn part(&self) -> &Part {
        &self.parts[self.current_part]
    }
}

#[derive(Default)]
struct SessionState {
    open: Option<OpenState>,
    /// Latest issued render request. Never reset, so requests from an
    /// earlier session can't match a later one.
    sequence: u64,
}

impl SessionState {
    fn issue_ticket(&mut self) -> Option<RenderTicket> {
        let open = self.open.as_ref()?;
        let ticket = RenderTicket {
            sequence: self.sequence + 1,
            part_index: open.current_part,
            part_name: open.part().name.clone(),
            page: open.current_page,
            handle: open.part().handle.clone(),
        };
        self.sequence = ticket.sequence;
        Some(ticket)
    }
}

/// A render request captured under the lock
struct RenderTicket {
    sequence: u64,
    part_index: usize,
    part_name: String,
    page: u32,
    handle: DocumentHandle,
}

/// Preview session over a renderer `R` and a file saver `S`
pub struct PreviewSession<R, S> {
    renderer: R,
    saver: S,
    config: PreviewConfig,
    state: Mutex<SessionState>,
}

impl<R: DocumentRenderer, S: FileSaver> PreviewSession<R, S> {
    /// Create a closed session
    pub fn new(renderer: R, saver: S) -> Self {
        Self::with_config(renderer, saver, PreviewConfig::default())
    }

    /// Create a closed session with explicit configuration
    pub fn with_config(renderer: R, saver: S, config: PreviewConfig) -> Self {
        Self {
            renderer,
            saver,
            config,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn saver(&self) -> &S {
        &self.saver
    }

    /// Open a session on `parts` and display page 1 of the first part.
    ///
    /// Page counts are gathered concurrently; the session only becomes
    /// visible once every part opened. If any part fails, nothing is kept and
    /// the session is closed. A render failure of the first page is returned
    /// but leaves the session open.
    pub async fn open(&self, parts: Vec<Vec<u8>>, base_name: &str) -> Result<RenderOutcome> {
        self.close();
        if parts.is_empty() {
            return Err(Error::NoParts);
        }

        let opening_sequence = self.state.lock().sequence;
        let part_count = parts.len();

        let handles = try_join_all(
            parts
                .into_iter()
                .map(|bytes| self.renderer.open_document(Arc::from(bytes))),
        )
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, base_name, "failed to open preview parts");
            e
        })?;

        if let Some(index) = handles.iter().position(|h| h.page_count() == 0) {
            tracing::warn!(base_name, part = index + 1, "preview part has no pages");
            return Err(Error::DocumentOpen {
                reason: format!("part {} has no pages", index + 1),
            });
        }

        let parts: Vec<Part> = handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| Part {
                name: self.config.part_name(base_name, index),
                handle,
            })
            .collect();

        let ticket = {
            let mut state = self.state.lock();
            if state.sequence != opening_sequence {
                // closed or reopened while the parts were loading
                tracing::debug!(base_name, "preview open superseded");
                return Ok(RenderOutcome::Superseded);
            }
            state.open = Some(OpenState {
                parts,
                base_name: base_name.to_string(),
                current_part: 0,
                current_page: 1,
                displayed: None,
            });
            state.issue_ticket().ok_or(Error::SessionClosed)?
        };

        tracing::info!(base_name, parts = part_count, "preview opened");
        self.complete(ticket).await
    }

    /// Render the current page
    pub async fn render(&self) -> Result<RenderOutcome> {
        let ticket = self
            .state
            .lock()
            .issue_ticket()
            .ok_or(Error::SessionClosed)?;
        self.complete(ticket).await
    }

    /// Move `offset` pages within the current part.
    ///
    /// Returns `false` without changing anything if the target page does not
    /// exist or the session is closed.
    pub async fn change_page(&self, offset: i64) -> Result<bool> {
        let ticket = {
            let mut state = self.state.lock();
            let Some(open) = state.open.as_mut() else {
                return Ok(false);
            };
            let total = open.part().total_pages();
            let Some(new_page) = i64::from(open.current_page)
                .checked_add(offset)
                .filter(|page| (1..=i64::from(total)).contains(page))
            else {
                tracing::debug!(
                    page = open.current_page,
                    offset,
                    total,
                    "page change out of range"
                );
                return Ok(false);
            };
            open.current_page = new_page as u32;
            state.issue_ticket().ok_or(Error::SessionClosed)?
        };

        self.complete(ticket).await?;
        Ok(true)
    }

    /// Move `offset` parts and show the first page of the new part.
    ///
    /// Returns `false` without changing anything if the target part does not
    /// exist or the session is closed.
    pub async fn change_part(&self, offset: i64) -> Result<bool> {
        let ticket = {
            let mut state = self.state.lock();
            let Some(open) = state.open.as_mut() else {
                return Ok(false);
            };
            let part_count = open.parts.len() as i64;
            let Some(new_index) = (open.current_part as i64)
                .checked_add(offset)
                .filter(|index| (0..part_count).contains(index))
            else {
                tracing::debug!(
                    part = open.current_part,
                    offset,
                    parts = open.parts.len(),
                    "part change out of range"
                );
                return Ok(false);
            };
            open.current_part = new_index as usize;
            open.current_page = 1;
            state.issue_ticket().ok_or(Error::SessionClosed)?
        };

        self.complete(ticket).await?;
        Ok(true)
    }

    /// Hand the current part to the file saver
    pub fn download(&self) -> Result<()> {
        let part = self.current_part().ok_or(Error::SessionClosed)?;
        self.saver
            .save(part.bytes(), part.name(), &self.config.mime_type);
        Ok(())
    }

    /// Hand the displayed page to the file saver as a PNG image
    pub fn download_page_image(&self) -> Result<()> {
        let displayed = {
            let state = self.state.lock();
            let open = state.open.as_ref().ok_or(Error::SessionClosed)?;
            open.displayed.clone().ok_or(Error::NothingDisplayed)?
        };

        let png = displayed.surface.to_png()?;
        let stem = Path::new(&displayed.part_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| displayed.part_name.clone());
        let name = format!("{}_page{}.png", stem, displayed.page);
        self.saver.save(&png, &name, "image/png");
        Ok(())
    }

    /// Drop all parts and return to the closed state. In-flight renders are
    /// discarded when they finish.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.sequence += 1;
        if let Some(open) = state.open.take() {
            tracing::info!(base_name = %open.base_name, "preview closed");
        }
    }

    async fn complete(&self, ticket: RenderTicket) -> Result<RenderOutcome> {
        tracing::debug!(
            sequence = ticket.sequence,
            part = ticket.part_index,
            page = ticket.page,
            "rendering page"
        );
        let result = self
            .renderer
            .render_page(&ticket.handle, ticket.page, self.config.render_scale)
            .await;

        let mut state = self.state.lock();
        if state.sequence != ticket.sequence {
            tracing::debug!(
                sequence = ticket.sequence,
                latest = state.sequence,
                "discarding superseded render"
            );
            return Ok(RenderOutcome::Superseded);
        }
        let Some(open) = state.open.as_mut() else {
            return Ok(RenderOutcome::Superseded);
        };

        match result {
            Ok(surface) => {
                let displayed = DisplayedPage {
                    part_index: ticket.part_index,
                    part_name: ticket.part_name,
                    page: ticket.page,
                    total_pages: ticket.handle.page_count(),
                    surface: Arc::new(surface),
                };
                open.displayed = Some(displayed.clone());
                Ok(RenderOutcome::Displayed(displayed))
            }
            Err(e) => {
                // back to whatever is still on screen
                if let Some(shown) = &open.displayed {
                    open.current_part = shown.part_index;
                    open.current_page = shown.page;
                }
                tracing::warn!(
                    error = %e,
                    part = %ticket.part_name,
                    page = ticket.page,
                    "page render failed"
                );
                Err(match e {
                    Error::Render { .. } => e,
                    other => Error::Render {
                        page: ticket.page,
                        reason: other.to_string(),
                    },
                })
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open.is_some()
    }

    /// Clone of the active part
    pub fn current_part(&self) -> Option<Part> {
        self.state.lock().open.as_ref().map(|open| open.part().clone())
    }

    pub fn current_part_name(&self) -> Option<String> {
        self.state
            .lock()
            .open
            .as_ref()
            .map(|open| open.part().name.clone())
    }

    /// 0 when closed
    pub fn current_part_index(&self) -> usize {
        self.state
            .lock()
            .open
            .as_ref()
            .map_or(0, |open| open.current_part)
    }

    /// 1 when closed
    pub fn current_page(&self) -> u32 {
        self.state
            .lock()
            .open
            .as_ref()
            .map_or(1, |open| open.current_page)
    }

    /// Pages in the current part, 0 when closed
    pub fn total_pages(&self) -> u32 {
        self.state
            .lock()
            .open
            .as_ref()
            .map_or(0, |open| open.part().total_pages())
    }

    pub fn part_count(&self) -> usize {
        self.state.lock().open.as_ref().map_or(0, |open| open.parts.len())
    }

    pub fn parts(&self) -> Vec<Part> {
        self.state
            .lock()
            .open
            .as_ref()
            .map(|open| open.parts.clone())
            .unwrap_or_default()
    }

    pub fn displayed(&self) -> Option<DisplayedPage> {
        self.state
            .lock()
            .open
            .as_ref()
            .and_then(|open| open.displayed.clone())
    }

    /// "Page X of Y" for the current position
    pub fn page_indicator(&self) -> Option<String> {
        self.state
            .lock()
            .open
            .as_ref()
            .map(|open| page_indicator(open.current_page, open.part().total_pages()))
    }

    pub fn has_previous_part(&self) -> bool {
        self.state
            .lock()
            .open
            .as_ref()
            .is_some_and(|open| open.current_part > 0)
    }

    pub fn has_next_part(&self) -> bool {
        self.state
            .lock()
            .open
            .as_ref()
            .is_some_and(|open| open.current_part + 1 < open.parts.len())
    }

    pub fn has_previous_page(&self) -> bool {
        self.state
            .lock()
            .open
            .as_ref()
            .is_some_and(|open| open.current_page > 1)
    }

    pub fn has_next_page(&self) -> bool {
        self.state
            .lock()
            .open
            .as_ref()
            .is_some_and(|open| open.current_page < open.part().total_pages())
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.state.lock();
        match state.open.as_ref() {
            Some(open) => SessionStatus {
                open: true,
                base_name: Some(open.base_name.clone()),
                parts: open
                    .parts
                    .iter()
                    .map(|part| PartSummary {
                        name: part.name.clone(),
                        total_pages: part.total_pages(),
                        size_bytes: part.bytes().len(),
                    })
                    .collect(),
                current_part_index: open.current_part,
                current_page: open.current_page,
                total_pages: open.part().total_pages(),
                displayed_page: open.displayed.as_ref().map(|d| d.page),
                has_previous_part: open.current_part > 0,
                has_next_part: open.current_part + 1 < open.parts.len(),
            },
            None => SessionStatus {
                open: false,
                base_name: None,
                parts: Vec::new(),
                current_part_index: 0,
                current_page: 1,
                total_pages: 0,
                displayed_page: None,
                has_previous_part: false,
                has_next_part: false,
            },
        }
    }
}

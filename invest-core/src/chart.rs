//! Chart collaborator seam.
//!
//! A [`ChartRenderer`] turns a [`ProjectionSeries`] into some chart handle.
//! [`ChartSession`] owns the renderer and the handle of the chart currently on
//! screen, and disposes that handle before rendering a replacement.

use tracing::debug;

use crate::ProjectionSeries;

/// Something that can draw a projection and later tear the drawing down.
pub trait ChartRenderer {
    /// Handle to a rendered chart.
    type Chart;
    type Error;

    fn render(
        &mut self,
        series: &ProjectionSeries,
    ) -> Result<Self::Chart, Self::Error>;

    fn dispose(
        &mut self,
        chart: Self::Chart,
    ) -> Result<(), Self::Error>;
}

/// Owns at most one live chart.
///
/// Typical lifetime:
/// 1. Create with `ChartSession::new(renderer)`.
/// 2. Call `show` once per simulation; the previous chart is disposed first.
/// 3. Call `close` (or `into_renderer`) when done.
pub struct ChartSession<R: ChartRenderer> {
    renderer: R,
    active: Option<R::Chart>,
    rendered: usize,
}

impl<R: ChartRenderer> ChartSession<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            active: None,
            rendered: 0,
        }
    }

    /// Disposes the current chart, if any, then renders `series`.
    ///
    /// If disposal fails the old chart is dropped and nothing new is rendered.
    pub fn show(
        &mut self,
        series: &ProjectionSeries,
    ) -> Result<&R::Chart, R::Error> {
        self.close()?;

        let chart = self.renderer.render(series)?;
        self.rendered += 1;
        debug!(points = series.len(), rendered = self.rendered, "chart rendered");

        Ok(self.active.insert(chart))
    }

    /// Disposes the current chart, if any.
    pub fn close(&mut self) -> Result<(), R::Error> {
        match self.active.take() {
            Some(previous) => {
                debug!("disposing previous chart");
                self.renderer.dispose(previous)
            }
            None => Ok(()),
        }
    }

    pub fn active(&self) -> Option<&R::Chart> {
        self.active.as_ref()
    }

    /// Number of charts rendered over the session's lifetime.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Closes the session and hands back the renderer.
    pub fn into_renderer(mut self) -> Result<R, R::Error> {
        self.close()?;
        Ok(self.renderer)
    }
}

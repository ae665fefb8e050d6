//! Playback engine
//!
//! `PlaybackEngine` owns every piece of mutable playback state: the adopted
//! response, the compare-mode scheduler, the throw animator, and one frame
//! loop handle per surface. Hosts hold the engine and pass surfaces in per
//! call, so several engines can coexist and everything runs headlessly.
//!
//! A submission is split around its single suspension point:
//! `begin_submission` (validate, issue ticket) → remote call →
//! `complete_submission` (adopt or report). Only the latest ticket may adopt,
//! and a reset or mode switch retires it.

use crate::client::{self, SimulationClient, SimulationTransport, parse_angles};
use crate::error::{ClientResult, SimulationError, ValidationError};
use crate::mode::ModeController;
use crate::model::{Mode, SimulationParameters, SimulationResponse};
use crate::playback::{FrameLoop, LoopId, PlaybackScheduler, TrajectoryPhase};
use crate::presenter::{Field, Presenter};
use crate::render::{CanvasAnimator, FrameOutcome, Theme, TraceRenderer};
use crate::settings::Settings;
use crate::stats::StatsPresenter;
use crate::surface::{ChartSurface, RasterSurface, SeriesUpdate};

/// Surfaces borrowed for the duration of one engine call
pub struct Surfaces<'a> {
    pub chart: &'a mut dyn ChartSurface,
    pub canvas: &'a mut dyn RasterSurface,
    pub presenter: &'a mut dyn Presenter,
}

/// Identifies one submission; carries the mode it was made in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    id: u64,
    mode: Mode,
}

impl SubmissionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// Frame loop the host must drive after an adoption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Call `step_compare` once per display frame
    Compare(LoopId),
    /// Call `step_throw` once per display frame
    Throw(LoopId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Started(Playback),
    /// A later submission, a reset, or a mode switch retired this ticket
    Superseded,
    Failed(SimulationError),
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Continue,
    Finished,
    /// The loop was cancelled or replaced; drop the callback
    Stale,
}

pub struct PlaybackEngine {
    settings: Settings,
    mode: ModeController,
    theme: Theme,
    compare_all: bool,

    response: Option<SimulationResponse>,
    tickets_issued: u64,
    /// Ticket allowed to adopt; cleared by reset and mode switches
    in_flight: Option<u64>,

    traces: TraceRenderer,
    /// Trajectories currently plotted on the chart
    charted: usize,
    scheduler: Option<PlaybackScheduler>,
    compare_loop: FrameLoop,

    animator: CanvasAnimator,
    throw_loop: FrameLoop,

    stats: StatsPresenter,
}

impl PlaybackEngine {
    pub fn new(settings: Settings) -> Self {
        Self {
            mode: ModeController::new(settings.mode),
            theme: Theme::from_dark(settings.dark_theme),
            compare_all: settings.compare_all,
            response: None,
            tickets_issued: 0,
            in_flight: None,
            traces: TraceRenderer::new(settings.palette.clone()),
            charted: 0,
            scheduler: None,
            compare_loop: FrameLoop::new(),
            animator: CanvasAnimator::new(settings.scene),
            throw_loop: FrameLoop::new(),
            stats: StatsPresenter::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn compare_all(&self) -> bool {
        self.compare_all
    }

    /// The adopted response, if any
    pub fn response(&self) -> Option<&SimulationResponse> {
        self.response.as_ref()
    }

    /// Compare-mode sample indices, one per trajectory
    pub fn indices(&self) -> Option<&[usize]> {
        self.scheduler.as_ref().map(PlaybackScheduler::indices)
    }

    pub fn phase(&self, trajectory: usize) -> Option<TrajectoryPhase> {
        self.scheduler.as_ref()?.phase(trajectory)
    }

    /// Next sample the throw animation will draw
    pub fn throw_cursor(&self) -> Option<usize> {
        self.animator.cursor()
    }

    pub fn is_compare_running(&self) -> bool {
        self.compare_loop.is_active()
    }

    pub fn is_throw_running(&self) -> bool {
        self.throw_loop.is_active()
    }

    /// Draw the idle throw scene (host calls this after resizing the canvas)
    pub fn draw_idle_scene(&self, canvas: &mut dyn RasterSurface) {
        self.animator.draw_idle(canvas);
    }

    /// Read and parse the inputs relevant to `mode`
    pub fn read_parameters(
        &self,
        presenter: &dyn Presenter,
        mode: Mode,
    ) -> Result<SimulationParameters, ValidationError> {
        let angles = match mode {
            Mode::Compare => parse_angles(&presenter.get_text(Field::Angles).unwrap_or_default())?,
            Mode::Throw => {
                let angle = presenter
                    .get_number(Field::Angle)
                    .filter(|a| a.is_finite())
                    .ok_or(ValidationError::MissingAngle)?;
                vec![angle]
            }
        };
        let velocity = presenter
            .get_number(Field::Velocity)
            .ok_or(ValidationError::InvalidVelocity)?;
        let gravity = presenter
            .get_number(Field::Gravity)
            .ok_or(ValidationError::InvalidGravity)?;

        Ok(SimulationParameters {
            velocity,
            gravity,
            angles,
            dt: self.settings.dt,
        })
    }

    /// Stop playback, validate inputs, and issue a ticket for the remote call.
    ///
    /// A validation failure is reported to the presenter and no ticket is
    /// issued, so an earlier call still in flight stays current.
    pub fn begin_submission(
        &mut self,
        presenter: &mut dyn Presenter,
    ) -> ClientResult<(SubmissionTicket, SimulationParameters)> {
        self.cancel_playback();
        let mode = self.mode();

        let checked = self
            .read_parameters(presenter, mode)
            .and_then(|params| client::validate(&params, mode).map(|_| params));
        let params = match checked {
            Ok(params) => params,
            Err(err) => {
                let err = SimulationError::from(err);
                report(presenter, &err);
                return Err(err);
            }
        };

        self.tickets_issued += 1;
        self.in_flight = Some(self.tickets_issued);
        let ticket = SubmissionTicket {
            id: self.tickets_issued,
            mode,
        };
        Ok((ticket, params))
    }

    /// Adopt or report the outcome of the remote call for `ticket`.
    /// `now` is the current time in seconds.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: ClientResult<SimulationResponse>,
        now: f64,
        surfaces: &mut Surfaces<'_>,
    ) -> SubmissionOutcome {
        if self.in_flight != Some(ticket.id) {
            log::warn!(
                "Dropping result of submission {} (current is {:?})",
                ticket.id,
                self.in_flight
            );
            return SubmissionOutcome::Superseded;
        }
        self.in_flight = None;

        match outcome.and_then(|response| self.adopt(response, ticket.mode, now, surfaces)) {
            Ok(playback) => SubmissionOutcome::Started(playback),
            Err(err) => {
                report(surfaces.presenter, &err);
                SubmissionOutcome::Failed(err)
            }
        }
    }

    /// Full round trip against `client`. `now` is sampled once the reply is in.
    pub async fn submit<T: SimulationTransport>(
        &mut self,
        client: &SimulationClient<T>,
        now: impl Fn() -> f64,
        surfaces: &mut Surfaces<'_>,
    ) -> SubmissionOutcome {
        let (ticket, params) = match self.begin_submission(surfaces.presenter) {
            Ok(started) => started,
            Err(err) => return SubmissionOutcome::Failed(err),
        };
        let outcome = client.simulate(&params, ticket.mode).await;
        self.complete_submission(ticket, outcome, now(), surfaces)
    }

    /// Replace all playback state with `response` and start its frame loop.
    ///
    /// All-or-nothing: a response that breaks the sample invariants is
    /// rejected before anything is touched.
    pub fn adopt(
        &mut self,
        response: SimulationResponse,
        mode: Mode,
        now: f64,
        surfaces: &mut Surfaces<'_>,
    ) -> ClientResult<Playback> {
        let Some(first) = response.results.first() else {
            return Err(SimulationError::Server(
                "malformed simulation response".to_string(),
            ));
        };
        response.check(response.results.len())?;

        self.cancel_playback();
        self.scheduler = None;
        self.mode.apply(mode, surfaces.presenter);
        self.settings.mode = mode;
        surfaces.presenter.set_text(Field::Message, "");
        self.stats.present(&response, surfaces.presenter);

        let playback = match mode {
            Mode::Compare => {
                self.traces
                    .initialize(surfaces.chart, &response, self.compare_all, self.theme);
                self.charted = response.results.len();
                let mut scheduler = PlaybackScheduler::from_response(&response);
                scheduler.start(now);
                self.scheduler = Some(scheduler);
                Playback::Compare(self.compare_loop.start())
            }
            Mode::Throw => {
                self.animator.start(first, &*surfaces.canvas);
                Playback::Throw(self.throw_loop.start())
            }
        };

        log::info!(
            "Adopted simulation: {} trajectories, dt={} ({})",
            response.results.len(),
            response.dt,
            mode.as_str()
        );
        self.response = Some(response);
        Ok(playback)
    }

    /// One compare-mode tick. `now` is in seconds.
    pub fn step_compare(
        &mut self,
        id: LoopId,
        now: f64,
        chart: &mut dyn ChartSurface,
    ) -> LoopStatus {
        if !self.compare_loop.is_current(id) {
            return LoopStatus::Stale;
        }
        let (Some(scheduler), Some(response)) = (self.scheduler.as_mut(), self.response.as_ref())
        else {
            self.compare_loop.finish(id);
            return LoopStatus::Finished;
        };
        let Some(frame) = scheduler.tick(now) else {
            self.compare_loop.finish(id);
            return LoopStatus::Finished;
        };

        let updates: Vec<SeriesUpdate> = frame
            .moved
            .iter()
            .flat_map(|m| {
                TraceRenderer::cursor_updates(&response.results[m.trajectory], m.trajectory, m.index)
            })
            .collect();
        if !updates.is_empty() {
            chart.restyle_points(&updates);
        }

        if frame.done {
            self.compare_loop.finish(id);
            log::debug!("Compare playback finished");
            LoopStatus::Finished
        } else {
            LoopStatus::Continue
        }
    }

    /// One throw-mode frame
    pub fn step_throw(&mut self, id: LoopId, canvas: &mut dyn RasterSurface) -> LoopStatus {
        if !self.throw_loop.is_current(id) {
            return LoopStatus::Stale;
        }
        match self.animator.draw_frame(canvas) {
            FrameOutcome::Continue => LoopStatus::Continue,
            FrameOutcome::Finished | FrameOutcome::Idle => {
                self.throw_loop.finish(id);
                LoopStatus::Finished
            }
        }
    }

    /// Stop both frame loops. Compare indices are kept.
    pub fn cancel_playback(&mut self) {
        if self.compare_loop.cancel() {
            log::debug!("Compare playback cancelled");
        }
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.cancel();
        }
        if self.throw_loop.cancel() {
            log::debug!("Throw animation cancelled");
        }
        self.animator.cancel();
    }

    fn retire_in_flight(&mut self) {
        if let Some(id) = self.in_flight.take() {
            log::info!("Submission {} retired", id);
        }
    }

    /// Drop the adopted response and all playback state, whatever the mode.
    /// A call still in flight can no longer adopt.
    pub fn reset(&mut self, surfaces: &mut Surfaces<'_>) {
        self.cancel_playback();
        self.retire_in_flight();
        self.response = None;
        self.scheduler = None;
        self.charted = 0;
        self.stats.clear(surfaces.presenter);
        surfaces.presenter.set_text(Field::Message, "");
        self.traces.clear(surfaces.chart, self.theme);
        self.animator.draw_idle(surfaces.canvas);
        log::info!("Playback reset");
    }

    /// Show the inputs and surface for `mode`. Never submits, never touches
    /// playback state. Returns whether the mode changed.
    ///
    /// A call still in flight was made for the old mode, so a change retires it.
    pub fn set_mode(&mut self, mode: Mode, surfaces: &mut Surfaces<'_>) -> bool {
        let changed = self.mode.apply(mode, surfaces.presenter);
        if changed {
            self.retire_in_flight();
        }
        if mode == Mode::Throw && !self.animator.is_animating() {
            self.animator.draw_idle(surfaces.canvas);
        }
        self.settings.mode = mode;
        changed
    }

    /// Show all trajectories or only the first. Only visibility changes.
    pub fn set_compare_all(&mut self, compare_all: bool, chart: &mut dyn ChartSurface) {
        self.compare_all = compare_all;
        self.settings.compare_all = compare_all;
        if self.charted > 0 {
            TraceRenderer::apply_visibility(chart, self.charted, compare_all);
        }
    }

    pub fn set_theme(&mut self, theme: Theme, chart: &mut dyn ChartSurface) {
        self.theme = theme;
        self.settings.dark_theme = theme.is_dark();
        TraceRenderer::apply_theme(chart, theme);
    }

    pub fn toggle_theme(&mut self, chart: &mut dyn ChartSurface) -> Theme {
        let theme = self.theme.toggled();
        self.set_theme(theme, chart);
        theme
    }

    /// Mirror the typed velocity into the slider
    pub fn sync_slider_from_velocity(&self, presenter: &mut dyn Presenter) {
        let position = self
            .settings
            .slider_position(presenter.get_number(Field::Velocity));
        presenter.set_text(Field::VelocitySlider, &position.to_string());
    }

    /// Mirror the slider into the velocity input
    pub fn sync_velocity_from_slider(&self, presenter: &mut dyn Presenter) {
        if let Some(value) = presenter.get_number(Field::VelocitySlider) {
            presenter.set_text(Field::Velocity, &value.to_string());
        }
    }
}

fn report(presenter: &mut dyn Presenter, err: &SimulationError) {
    log::warn!("Simulation failed: {}", err);
    presenter.set_text(Field::Message, &err.to_string());
}

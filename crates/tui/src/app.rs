//! Main application struct and run loop.
//!
//! This module provides the [`App`] struct, which owns the current payload
//! and one fitted [`Region`] per widget, and drives them through the
//! render and measure cycle before anything reaches the terminal.

use std::time::{Duration, Instant};

use chrono::Local;
use headway_config::{CarouselConfig, Config};
use headway_feed::{FeedEvent, Poller};
use headway_fit::{Epoch, Pass};
use headway_protocol::{Message, ScreenData};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Widget, Wrap},
};
use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::{
    event::{event_to_message, poll_event},
    layout::{
        HEADER_HEIGHT, MAX_POLL_TIMEOUT, MAX_SETTLE_PASSES, MIN_HEIGHT, MIN_HEIGHT_WITH_HEADER,
        MIN_WIDTH,
    },
    report::{ErrorReporter, RateLimiter},
    terminal::AppTerminal,
    widgets::{HeaderRegion, HeaderView, Region, Registry},
};

/// Clock format shown in the header.
const CLOCK_FORMAT: &str = "%H:%M";

/// A running feed: the poller task and the channel it reports on.
///
/// Dropping the handle stops the poller.
#[derive(Debug)]
pub struct FeedHandle {
    /// The polling task.
    pub poller: Poller,
    /// Events sent by the polling task.
    pub events: UnboundedReceiver<FeedEvent>,
}

/// Outcome of one [`App::settle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    /// Render passes taken.
    pub passes: usize,
    /// Whether every region stopped changing within the pass bound.
    pub converged: bool,
}

/// Screen areas for one frame.
struct Areas {
    header: Option<Rect>,
    body: Vec<Rect>,
}

/// The main application struct.
///
/// Holds the current payload, one fitted region per widget, and the header.
/// Every new payload starts a new data epoch, which resets every fitting
/// session on the sign.
#[derive(Debug)]
pub struct App {
    screen: ScreenData,
    epoch: Epoch,
    registry: Registry,
    cadence: CarouselConfig,
    header: HeaderRegion,
    regions: Vec<Box<dyn Region>>,
    reporter: ErrorReporter,
    clock: String,
    stale: bool,
    should_quit: bool,
    refresh_requested: bool,
    /// Whether the header was shown in the last render.
    header_visible: bool,
}

impl App {
    /// Creates an application showing `screen` with the standard widget
    /// registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_config::Config;
    /// use headway_protocol::dummy::dummy_screen;
    /// use headway_tui::App;
    ///
    /// let app = App::new(dummy_screen(), &Config::default());
    /// assert_eq!(app.screen().screen_id, "dummy-bus-stop");
    /// ```
    #[must_use]
    pub fn new(screen: ScreenData, config: &Config) -> Self {
        Self::with_registry(screen, config, Registry::standard())
    }

    /// Creates an application with a custom widget registry.
    #[must_use]
    pub fn with_registry(screen: ScreenData, config: &Config, registry: Registry) -> Self {
        let mut app = Self {
            screen: ScreenData {
                screen_id: String::new(),
                fetched_at: None,
                header: Default::default(),
                widgets: Vec::new(),
            },
            epoch: Epoch::ZERO,
            registry,
            cadence: config.carousel.clone(),
            header: HeaderRegion::new(),
            regions: Vec::new(),
            reporter: ErrorReporter::new(RateLimiter::new(config.errors.ttl())),
            clock: String::new(),
            stale: false,
            should_quit: false,
            refresh_requested: false,
            header_visible: true,
        };
        app.set_screen(screen);
        app
    }

    /// Returns the payload being shown.
    #[must_use]
    pub fn screen(&self) -> &ScreenData {
        &self.screen
    }

    /// Returns the current data epoch.
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Returns the widget regions, in screen order.
    #[must_use]
    pub fn regions(&self) -> &[Box<dyn Region>] {
        &self.regions
    }

    /// Returns whether the last feed update failed.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns whether the app has been asked to quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns whether the header was shown in the last render.
    #[must_use]
    pub const fn header_visible(&self) -> bool {
        self.header_visible
    }

    /// Returns the error reporter.
    #[must_use]
    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Shows a new payload.
    ///
    /// Starts a new data epoch and rebuilds every widget region, so all
    /// fitting starts over from the most detailed presentation.
    pub fn set_screen(&mut self, screen: ScreenData) {
        self.epoch = self.epoch.next();
        self.regions = screen
            .widgets
            .iter()
            .map(|widget| self.registry.build(widget, &self.cadence))
            .collect();
        debug!(
            epoch = self.epoch.get(),
            widgets = self.regions.len(),
            "new payload"
        );
        self.screen = screen;
        self.stale = false;
        self.reporter.clear();
    }

    /// Applies an event from the feed poller.
    pub fn handle_feed_event(&mut self, event: FeedEvent, now: Instant) {
        match event {
            FeedEvent::Payload(screen) => self.set_screen(*screen),
            FeedEvent::Failed { signature, message } => {
                self.stale = true;
                self.reporter.report(&signature, &message, now);
            }
        }
    }

    /// Updates the application state based on a message.
    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::Quit => {
                self.should_quit = true;
            }
            Message::Refresh => {
                self.refresh_requested = true;
            }
            Message::Resize { width, height } => {
                // Region tokens include their area, so the next settle refits.
                debug!(width, height, "terminal resized");
            }
        }
    }

    /// Returns whether a refresh was requested since the last call, and
    /// clears the request.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    /// Sets the clock text shown in the header.
    pub fn set_clock(&mut self, clock: impl Into<String>) {
        self.clock = clock.into();
    }

    /// Advances every carousel. Returns `true` if any page changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for region in &mut self.regions {
            changed |= region.tick(now);
        }
        changed
    }

    /// Returns the nearest carousel deadline across all regions.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.regions.iter().filter_map(|r| r.next_deadline()).min()
    }

    /// Returns how long to wait for input before the next frame.
    ///
    /// This is the time until the nearest carousel deadline, capped at
    /// [`MAX_POLL_TIMEOUT`].
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.next_deadline()
            .map_or(MAX_POLL_TIMEOUT, |deadline| {
                deadline.saturating_duration_since(now)
            })
            .min(MAX_POLL_TIMEOUT)
    }

    /// Returns `true` if `area` is too small for useful rendering.
    fn too_small(area: Rect) -> bool {
        area.height < MIN_HEIGHT || area.width < MIN_WIDTH
    }

    /// Splits `area` into the header and one area per widget.
    fn areas(&self, area: Rect) -> Areas {
        let (header, body) = if area.height >= MIN_HEIGHT_WITH_HEADER {
            let [header, body] =
                Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
                    .areas(area);
            (Some(header), body)
        } else {
            (None, area)
        };

        let constraints = self
            .screen
            .widgets
            .iter()
            .map(|widget| self.registry.constraint(widget));
        let body = Layout::vertical(constraints).split(body).to_vec();
        Areas { header, body }
    }

    /// Fits every region to `area`.
    ///
    /// Each pass syncs every region, renders the whole screen into a
    /// scratch buffer, then lets each region measure itself and apply at
    /// most one change. Passes repeat until nothing changes, or until
    /// [`MAX_SETTLE_PASSES`] is reached. A region that settles while still
    /// overflowing is reported through the error reporter.
    pub fn settle(&mut self, area: Rect, now: Instant) -> Settle {
        if Self::too_small(area) {
            return Settle {
                passes: 0,
                converged: true,
            };
        }
        let areas = self.areas(area);

        let mut passes = 0;
        loop {
            passes += 1;
            self.sync(&areas, now);
            let mut scratch = Buffer::empty(area);
            self.render(&areas, &mut scratch);

            let mut changed = false;
            let mut outcomes = Vec::with_capacity(self.regions.len() + 1);
            if areas.header.is_some() {
                outcomes.push(("header", self.header.after_paint()));
            }
            for region in &mut self.regions {
                outcomes.push((region.label(), region.after_paint(now)));
            }
            for (label, pass) in outcomes {
                match pass {
                    Pass::Changed => changed = true,
                    Pass::Exhausted => {
                        self.reporter.layout_failed(label, now);
                    }
                    Pass::Settled => {}
                }
            }

            if !changed {
                return Settle {
                    passes,
                    converged: true,
                };
            }
            if passes >= MAX_SETTLE_PASSES {
                warn!(passes, "layout did not settle, drawing as is");
                return Settle {
                    passes,
                    converged: false,
                };
            }
        }
    }

    fn sync(&mut self, areas: &Areas, now: Instant) {
        if let Some(header_area) = areas.header {
            let view = HeaderView {
                header: &self.screen.header,
                clock: &self.clock,
                stale: self.stale,
                status: self.reporter.last_message(),
            };
            self.header.sync(&view, header_area, self.epoch);
        }
        for ((region, widget), area) in self
            .regions
            .iter_mut()
            .zip(&self.screen.widgets)
            .zip(&areas.body)
        {
            region.sync(widget, *area, self.epoch, now);
        }
    }

    fn render(&self, areas: &Areas, buf: &mut Buffer) {
        if let Some(header_area) = areas.header {
            let view = HeaderView {
                header: &self.screen.header,
                clock: &self.clock,
                stale: self.stale,
                status: self.reporter.last_message(),
            };
            self.header.render(&view, header_area, buf);
        }
        for ((region, widget), area) in self.regions.iter().zip(&self.screen.widgets).zip(&areas.body)
        {
            region.render(widget, *area, buf);
        }
    }

    /// Renders the application UI to the given frame.
    ///
    /// Implements graceful degradation for small terminal sizes:
    /// - If terminal is below minimum dimensions, shows a "terminal too small" message.
    /// - If terminal is tight (below `MIN_HEIGHT_WITH_HEADER`), hides the header to reclaim space.
    /// - Otherwise, settles every region and draws the settled frame.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if Self::too_small(area) {
            self.header_visible = false;
            Self::render_terminal_too_small(area, frame.buffer_mut());
            return;
        }

        self.settle(area, Instant::now());
        let areas = self.areas(area);
        self.header_visible = areas.header.is_some();
        self.render(&areas, frame.buffer_mut());
    }

    /// Renders a message indicating the terminal is too small.
    fn render_terminal_too_small(area: Rect, buf: &mut Buffer) {
        let message = format!(
            "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );

        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        // Center the message vertically
        let vertical_offset = area.height.saturating_sub(2) / 2;
        let centered_area = Rect {
            x: area.x,
            y: area.y + vertical_offset,
            width: area.width,
            height: area.height.saturating_sub(vertical_offset),
        };

        paragraph.render(centered_area, buf);
    }

    /// Drains pending feed events. Returns `false` once the poller is gone.
    fn drain_feed(&mut self, events: &mut UnboundedReceiver<FeedEvent>) -> bool {
        loop {
            match events.try_recv() {
                Ok(event) => self.handle_feed_event(event, Instant::now()),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    /// Runs the main application loop.
    ///
    /// Each iteration applies pending feed events, updates the clock,
    /// advances carousels, draws a settled frame, then waits for input no
    /// longer than the nearest carousel deadline. Returns when the user
    /// quits.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use headway_config::Config;
    /// use headway_protocol::dummy::dummy_screen;
    /// use headway_tui::{App, terminal};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let mut terminal = terminal::setup_terminal()?;
    ///     let mut app = App::new(dummy_screen(), &Config::default());
    ///     app.run(&mut terminal, None).await?;
    ///     terminal::restore_terminal(&mut terminal)?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn run(
        &mut self,
        terminal: &mut AppTerminal,
        mut feed: Option<FeedHandle>,
    ) -> anyhow::Result<()> {
        loop {
            if let Some(handle) = feed.as_mut()
                && !self.drain_feed(&mut handle.events)
            {
                warn!("feed poller stopped, showing last payload");
                feed = None;
            }

            self.set_clock(Local::now().format(CLOCK_FORMAT).to_string());
            self.tick(Instant::now());
            terminal.draw(|frame| self.view(frame))?;

            let timeout = self.poll_timeout(Instant::now());
            if let Some(event) = poll_event(timeout)?
                && let Some(msg) = event_to_message(&event)
            {
                self.update(msg);
            }

            if self.take_refresh_request() {
                match &feed {
                    Some(handle) => {
                        info!("refresh requested");
                        handle.poller.refresh();
                    }
                    None => debug!("refresh requested without a feed"),
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}

//! Trajectory Playback entry point
//!
//! In the browser this wires the engine to the page and drives playback from
//! `requestAnimationFrame`. Natively it runs one simulation against a service
//! and plays it back headlessly on a timer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::Document;

    use trajectory_playback::platform::web::{self, CanvasSurface, DomPresenter, PlotlyChart};
    use trajectory_playback::{
        Field, HttpTransport, LoopStatus, Mode, Playback, PlaybackEngine, Presenter, Settings,
        SimulationClient, SubmissionOutcome, Surfaces,
    };

    const MODE_SELECT_ID: &str = "simMode";

    /// Engine plus the page surfaces it draws on
    struct App {
        engine: PlaybackEngine,
        chart: PlotlyChart,
        canvas: CanvasSurface,
        presenter: DomPresenter,
    }

    impl App {
        fn with_surfaces<R>(
            &mut self,
            f: impl FnOnce(&mut PlaybackEngine, &mut Surfaces<'_>) -> R,
        ) -> R {
            let App {
                engine,
                chart,
                canvas,
                presenter,
            } = self;
            let mut surfaces = Surfaces {
                chart,
                canvas,
                presenter,
            };
            f(engine, &mut surfaces)
        }

        /// Resize the canvas buffer to its element and redraw the idle scene
        fn refit_canvas(&mut self) {
            self.canvas.fit_to_element();
            if self.engine.mode() == Mode::Throw && !self.engine.is_throw_running() {
                self.engine.draw_idle_scene(&mut self.canvas);
            }
        }

        fn save_preferences(&self) {
            self.engine.settings().save();
        }
    }

    type Shared = Rc<RefCell<App>>;
    type Client = Rc<SimulationClient<HttpTransport>>;

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Trajectory playback starting...");

        let document = web::document()?;
        let settings = Settings::load();
        // The page is served by the simulation service itself
        let endpoint = web::page_origin().unwrap_or_else(|| settings.endpoint.clone());
        let client: Client = Rc::new(SimulationClient::new(HttpTransport::new(endpoint)));

        let app = App {
            chart: PlotlyChart::new(Field::Chart.element_id()),
            canvas: CanvasSurface::from_id(&document, &Field::Canvas.element_id())?,
            presenter: DomPresenter::new(document.clone()),
            engine: PlaybackEngine::new(settings),
        };
        let app: Shared = Rc::new(RefCell::new(app));

        restore_preferences(&app, &document);
        setup_controls(&app, &client, &document);
        setup_resize(&app)?;

        log::info!("Trajectory playback ready");
        Ok(())
    }

    fn restore_preferences(app: &Shared, document: &Document) {
        let mut guard = app.borrow_mut();
        let a = &mut *guard;
        let mode = a.engine.mode();

        web::set_select_value(document, MODE_SELECT_ID, mode.as_str());
        web::apply_page_theme(document, a.engine.theme());
        a.presenter.set_checked(Field::CompareAll, a.engine.compare_all());

        a.with_surfaces(|engine, surfaces| {
            engine.reset(surfaces);
            engine.set_mode(mode, surfaces);
        });
        a.refit_canvas();
        a.engine.sync_slider_from_velocity(&mut a.presenter);
    }

    fn listen(
        document: &Document,
        id: &str,
        event: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing element #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(app: &Shared, client: &Client, document: &Document) {
        {
            let app = app.clone();
            let client = client.clone();
            listen(document, "simulateBtn", "click", move |_| submit(&app, &client));
        }

        {
            let app = app.clone();
            listen(document, "resetBtn", "click", move |_| {
                app.borrow_mut()
                    .with_surfaces(|engine, surfaces| engine.reset(surfaces));
            });
        }

        {
            let app = app.clone();
            let doc = document.clone();
            listen(document, MODE_SELECT_ID, "change", move |_| {
                let Some(value) = web::select_value(&doc, MODE_SELECT_ID) else {
                    return;
                };
                let Some(mode) = Mode::from_str(&value) else {
                    log::warn!("Unknown mode '{}'", value);
                    return;
                };
                let mut guard = app.borrow_mut();
                guard.with_surfaces(|engine, surfaces| engine.set_mode(mode, surfaces));
                // The canvas has no layout size while hidden
                guard.refit_canvas();
                guard.save_preferences();
            });
        }

        {
            let app = app.clone();
            listen(
                document,
                &Field::CompareAll.element_id(),
                "change",
                move |_| {
                    let mut guard = app.borrow_mut();
                    let a = &mut *guard;
                    let on = a.presenter.get_flag(Field::CompareAll);
                    a.engine.set_compare_all(on, &mut a.chart);
                    a.save_preferences();
                },
            );
        }

        {
            let app = app.clone();
            let doc = document.clone();
            listen(document, "themeToggle", "click", move |_| {
                let mut guard = app.borrow_mut();
                let a = &mut *guard;
                let theme = a.engine.toggle_theme(&mut a.chart);
                web::apply_page_theme(&doc, theme);
                a.save_preferences();
            });
        }

        {
            let app = app.clone();
            listen(
                document,
                &Field::Velocity.element_id(),
                "input",
                move |_| {
                    let mut guard = app.borrow_mut();
                    let a = &mut *guard;
                    a.engine.sync_slider_from_velocity(&mut a.presenter);
                },
            );
        }

        {
            let app = app.clone();
            listen(
                document,
                &Field::VelocitySlider.element_id(),
                "input",
                move |_| {
                    let mut guard = app.borrow_mut();
                    let a = &mut *guard;
                    a.engine.sync_velocity_from_slider(&mut a.presenter);
                },
            );
        }
    }

    fn setup_resize(app: &Shared) -> Result<(), JsValue> {
        let window = web::window()?;
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().refit_canvas();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Validate synchronously, then finish the round trip in the background
    fn submit(app: &Shared, client: &Client) {
        let started = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.engine.begin_submission(&mut a.presenter)
        };
        let Ok((ticket, params)) = started else {
            return;
        };

        let app = app.clone();
        let client = client.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = client.simulate(&params, ticket.mode()).await;
            let outcome = app.borrow_mut().with_surfaces(|engine, surfaces| {
                engine.complete_submission(ticket, outcome, web::now_seconds(), surfaces)
            });
            if let SubmissionOutcome::Started(playback) = outcome {
                request_animation_frame(app, playback);
            }
        });
    }

    fn request_animation_frame(app: Shared, playback: Playback) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            playback_frame(app, playback, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn playback_frame(app: Shared, playback: Playback, time: f64) {
        let status = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            match playback {
                Playback::Compare(id) => a.engine.step_compare(id, time / 1000.0, &mut a.chart),
                Playback::Throw(id) => a.engine.step_throw(id, &mut a.canvas),
            }
        };

        if status == LoopStatus::Continue {
            request_animation_frame(app, playback);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    web_app::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::process::ExitCode;
    use std::time::{Duration, Instant};

    use clap::Parser;

    use trajectory_playback::presenter::MemoryPresenter;
    use trajectory_playback::surface::{RecordingCanvas, RecordingChart};
    use trajectory_playback::{
        Field, HttpTransport, LoopStatus, Mode, Playback, PlaybackEngine, Settings,
        SimulationClient, SubmissionOutcome, Surfaces,
    };

    /// Fetch one simulation and play it back headlessly
    #[derive(Parser, Debug)]
    #[command(name = "trajectory-playback", version, about)]
    struct Cli {
        /// Simulation service base URL (overrides settings)
        #[arg(long)]
        endpoint: Option<String>,

        /// Launch speed (m/s)
        #[arg(long, default_value_t = 20.0)]
        velocity: f64,

        /// Gravitational acceleration (m/s²)
        #[arg(long, default_value_t = 9.81)]
        gravity: f64,

        /// Comma separated launch angles in degrees (throw mode uses the first)
        #[arg(long, default_value = "30,45,60")]
        angles: String,

        /// compare or throw
        #[arg(long, value_parser = parse_mode)]
        mode: Option<Mode>,

        /// Show every angle in compare mode
        #[arg(long)]
        compare_all: bool,

        /// Playback frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    }

    /// The single angle thrown in throw mode: the first entry of the list
    fn throw_angle(angles: &str) -> String {
        angles
            .split(',')
            .map(str::trim)
            .find(|token| !token.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    /// Inputs as the page would hold them
    fn page_inputs(cli: &Cli) -> MemoryPresenter {
        MemoryPresenter::new()
            .with_input(Field::Velocity, cli.velocity.to_string())
            .with_input(Field::Gravity, cli.gravity.to_string())
            .with_input(Field::Angles, cli.angles.clone())
            .with_input(Field::Angle, throw_angle(&cli.angles))
    }

    fn parse_mode(s: &str) -> Result<Mode, String> {
        Mode::from_str(s).ok_or_else(|| format!("unknown mode '{}' (compare or throw)", s))
    }

    pub async fn run() -> ExitCode {
        env_logger::init();
        let cli = Cli::parse();

        let mut settings = Settings::load();
        if let Some(endpoint) = cli.endpoint.clone() {
            settings.endpoint = endpoint;
        }
        if let Some(mode) = cli.mode {
            settings.mode = mode;
        }
        settings.compare_all |= cli.compare_all;

        log::info!("Trajectory playback (native) against {}", settings.endpoint);

        let client = SimulationClient::new(HttpTransport::new(settings.endpoint.clone()));
        let mode = settings.mode;
        let mut engine = PlaybackEngine::new(settings);

        let mut chart = RecordingChart::new();
        let mut canvas = RecordingCanvas::new(800.0, 400.0);
        let mut presenter = page_inputs(&cli);

        let started = Instant::now();
        let clock = || started.elapsed().as_secs_f64();

        let outcome = {
            let mut surfaces = Surfaces {
                chart: &mut chart,
                canvas: &mut canvas,
                presenter: &mut presenter,
            };
            engine.set_mode(mode, &mut surfaces);
            engine.submit(&client, clock, &mut surfaces).await
        };

        let playback = match outcome {
            SubmissionOutcome::Started(playback) => playback,
            SubmissionOutcome::Failed(err) => {
                eprintln!("error: {}", err);
                return ExitCode::FAILURE;
            }
            SubmissionOutcome::Superseded => {
                eprintln!("error: submission was superseded");
                return ExitCode::FAILURE;
            }
        };

        let frame = Duration::from_secs_f64(1.0 / cli.fps.max(1.0));
        let mut interval = tokio::time::interval(frame);
        let mut frames = 0usize;
        loop {
            interval.tick().await;
            frames += 1;
            let status = match playback {
                Playback::Compare(id) => engine.step_compare(id, clock(), &mut chart),
                Playback::Throw(id) => engine.step_throw(id, &mut canvas),
            };
            if status != LoopStatus::Continue {
                break;
            }
        }

        println!(
            "Played back in {} frames ({:.2} s)",
            frames,
            started.elapsed().as_secs_f64()
        );
        print_summary(&presenter);
        ExitCode::SUCCESS
    }

    fn print_summary(presenter: &MemoryPresenter) {
        let field = |f: Field| presenter.text(f).unwrap_or("–").to_string();
        println!("Max height:     {}", field(Field::StatHeight));
        println!("Time of flight: {}", field(Field::StatTime));
        println!("Range:          {}", field(Field::StatRange));
        for row in presenter.stat_rows() {
            println!("  {}", row);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use trajectory_playback::Presenter;

        #[test]
        fn test_throw_angle_takes_first_entry() {
            assert_eq!(throw_angle("30,45,60"), "30");
            assert_eq!(throw_angle(" , 45 , 60"), "45");
            assert_eq!(throw_angle("12.5"), "12.5");
            assert_eq!(throw_angle(""), "");
        }

        #[test]
        fn test_default_angles_submit_in_throw_mode() {
            let cli = Cli::parse_from(["trajectory-playback", "--mode", "throw"]);
            assert_eq!(cli.mode, Some(Mode::Throw));

            let mut presenter = page_inputs(&cli);
            let mut settings = Settings::default();
            settings.mode = Mode::Throw;
            let mut engine = PlaybackEngine::new(settings);

            let (ticket, params) = engine.begin_submission(&mut presenter).unwrap();
            assert_eq!(ticket.mode(), Mode::Throw);
            assert_eq!(params.angles, vec![30.0]);
            assert_eq!(presenter.get_number(Field::Angle), Some(30.0));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> std::process::ExitCode {
    cli::run().await
}

//! Neon Arcade entry point
//!
//! Boots whichever mini-game the page asks for (`<body data-game="runner">`
//! or `"cruise"`), wires DOM input, and drives the animation-frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use neon_arcade::cruise::{self, CruiseState, SceneSync, SteerKey, SwipeState, VehicleKind};
    use neon_arcade::render::runner_pass;
    use neon_arcade::render::{Pipeline2d, Scene3d};
    use neon_arcade::runner::{self, DragState, RunnerPhase, RunnerState};

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let game = document
            .body()
            .and_then(|body| body.get_attribute("data-game"))
            .unwrap_or_else(|| "runner".to_string());

        match game.as_str() {
            "cruise" => run_cruise(document).await,
            _ => run_runner(document).await,
        }
    }

    /// Grab the canvas and size its backing store to device pixels.
    /// Returns (canvas, device w, device h, css w, css h).
    fn sized_canvas(document: &Document) -> (HtmlCanvasElement, u32, u32, f32, f32) {
        let window = web_sys::window().unwrap();
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (canvas, width, height, client_w as f32, client_h as f32)
    }

    async fn surface_and_adapter(
        canvas: &HtmlCanvasElement,
    ) -> (wgpu::Surface<'static>, wgpu::Adapter) {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);
        (surface, adapter)
    }

    /// Schedule one animation frame
    fn request_frame(callback: impl FnOnce(f64) + 'static) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(callback);
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Unified pointer x from a touch event's first touch
    fn touch_x(event: &TouchEvent) -> Option<f32> {
        event.touches().get(0).map(|touch| touch.client_x() as f32)
    }

    // ========================================================================
    // Lane-dodger
    // ========================================================================

    struct RunnerApp {
        state: RunnerState,
        drag: DragState,
        render_state: Option<Pipeline2d>,
        last_time: f64,
    }

    async fn run_runner(document: Document) {
        let (canvas, width, height, client_w, client_h) = sized_canvas(&document);
        let (surface, adapter) = surface_and_adapter(&canvas).await;
        let render_state =
            Pipeline2d::new(surface, &adapter, width, height, (client_w, client_h)).await;

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(RunnerApp {
            state: RunnerState::new(seed, client_w, client_h),
            drag: DragState::new(),
            render_state: Some(render_state),
            last_time: 0.0,
        }));
        log::info!("Lane-dodger initialized with seed: {}", seed);

        setup_runner_input(&canvas, app.clone());
        setup_runner_resize(&canvas, app.clone());
        setup_start_button(&document, app.clone());

        // First paint behind the menu overlay
        draw_runner(&mut app.borrow_mut());
        set_text(&document, "score", "Score: 0");
        set_hidden(&document, "overlay", false);

        log::info!("Neon Arcade running!");
    }

    fn draw_runner(app: &mut RunnerApp) {
        let vertices = runner_pass::frame_vertices(&app.state);
        if let Some(render_state) = app.render_state.as_mut() {
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = render_state.size;
                    let logical = render_state.logical_size;
                    render_state.resize(w, h, logical);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    fn runner_frame(app: Rc<RefCell<RunnerApp>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            if a.state.phase != RunnerPhase::Playing {
                return;
            }

            let now = time / 1000.0;
            let dt = if a.last_time > 0.0 {
                (now - a.last_time) as f32
            } else {
                0.0
            };
            a.last_time = now;

            // Draw the current state, then advance it
            draw_runner(&mut a);
            runner::tick(&mut a.state, dt);

            let document = web_sys::window().unwrap().document().unwrap();
            set_text(
                &document,
                "score",
                &format!("Score: {}", a.state.display_score()),
            );

            if a.state.phase == RunnerPhase::GameOver {
                log::info!("Game over at score {}", a.state.display_score());
                set_hidden(&document, "overlay", false);
                set_text(&document, "start-btn", "Restart");
                // Collision ends the loop: no further frames are scheduled
                return;
            }
        }
        request_frame(move |time| runner_frame(app, time));
    }

    fn setup_start_button(document: &Document, app: Rc<RefCell<RunnerApp>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut a = app.borrow_mut();
                    if a.state.phase == RunnerPhase::Playing {
                        return;
                    }
                    a.state.start();
                    a.last_time = 0.0;
                    let document = web_sys::window().unwrap().document().unwrap();
                    set_hidden(&document, "overlay", true);
                    set_text(&document, "score", "Score: 0");
                    log::info!("Session started ({} lanes)", a.state.road.lanes);
                }
                let app = app.clone();
                request_frame(move |time| runner_frame(app, time));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_runner_input(canvas: &HtmlCanvasElement, app: Rc<RefCell<RunnerApp>>) {
        // Mouse down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let x = event.client_x() as f32;
                let RunnerApp { state, drag, .. } = &mut *a;
                drag.pointer_down(x, state);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let x = event.client_x() as f32;
                let RunnerApp { state, drag, .. } = &mut *a;
                drag.pointer_move(x, state);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().drag.pointer_up();
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&event) {
                    let mut a = app.borrow_mut();
                    let RunnerApp { state, drag, .. } = &mut *a;
                    drag.pointer_down(x, state);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&event) {
                    let mut a = app.borrow_mut();
                    let RunnerApp { state, drag, .. } = &mut *a;
                    drag.pointer_move(x, state);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().drag.pointer_up();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_runner_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<RunnerApp>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let dpr = window.device_pixel_ratio();
            let client_w = canvas.client_width();
            let client_h = canvas.client_height();
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            a.state.resize_viewport(client_w as f32, client_h as f32);
            if let Some(render_state) = a.render_state.as_mut() {
                render_state.resize(width, height, (client_w as f32, client_h as f32));
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // ========================================================================
    // Endless drive
    // ========================================================================

    struct CruiseApp {
        state: CruiseState,
        swipe: SwipeState,
        scene: Option<Scene3d>,
        sync: Option<SceneSync>,
        /// The loop starts once, on the first vehicle choice
        started: bool,
    }

    async fn run_cruise(document: Document) {
        let (canvas, width, height, _client_w, _client_h) = sized_canvas(&document);
        let (surface, adapter) = surface_and_adapter(&canvas).await;
        let mut scene = Scene3d::new(surface, &adapter, width, height).await;
        let sync = SceneSync::new(&mut scene);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(CruiseApp {
            state: CruiseState::new(seed),
            swipe: SwipeState::new(),
            scene: Some(scene),
            sync: Some(sync),
            started: false,
        }));
        log::info!("Endless drive initialized with seed: {}", seed);

        setup_vehicle_menu(&document, app.clone());
        setup_cruise_input(&canvas, app.clone());
        setup_cruise_resize(&canvas, app.clone());

        // First paint: empty road behind the menu
        draw_cruise(&mut app.borrow_mut());
        set_hidden(&document, "menu", false);

        log::info!("Neon Arcade running!");
    }

    fn draw_cruise(app: &mut CruiseApp) {
        let CruiseApp {
            state, scene, sync, ..
        } = app;
        if let (Some(scene), Some(sync)) = (scene.as_mut(), sync.as_mut()) {
            sync.sync(state, scene);
            match scene.render() {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = scene.size;
                    scene.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    fn cruise_frame(app: Rc<RefCell<CruiseApp>>, _time: f64) {
        {
            let mut a = app.borrow_mut();
            cruise::tick(&mut a.state);
            draw_cruise(&mut a);
        }
        // No exit: the drive runs until the page unloads
        request_frame(move |time| cruise_frame(app, time));
    }

    fn setup_vehicle_menu(document: &Document, app: Rc<RefCell<CruiseApp>>) {
        for (id, kind) in [
            ("select-car", VehicleKind::Car),
            ("select-bike", VehicleKind::Bike),
        ] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let first = {
                    let mut a = app.borrow_mut();
                    a.state.select_vehicle(kind);
                    let document = web_sys::window().unwrap().document().unwrap();
                    set_hidden(&document, "menu", true);
                    let first = !a.started;
                    a.started = true;
                    first
                };
                if first {
                    log::info!("Vehicle selected: {:?}", kind);
                    let app = app.clone();
                    request_frame(move |time| cruise_frame(app, time));
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_cruise_input(canvas: &HtmlCanvasElement, app: Rc<RefCell<CruiseApp>>) {
        let window = web_sys::window().unwrap();

        // Arrow keys steer
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => cruise::apply_key_down(&mut a.state, SteerKey::Left),
                    "ArrowRight" => cruise::apply_key_down(&mut a.state, SteerKey::Right),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), "ArrowLeft" | "ArrowRight") {
                    cruise::apply_key_up(&mut app.borrow_mut().state);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Horizontal swipe steers on touch screens
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(x) = touch_x(&event) {
                    app.borrow_mut().swipe.touch_start(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&event) {
                    let mut a = app.borrow_mut();
                    let CruiseApp { state, swipe, .. } = &mut *a;
                    swipe.touch_move(x, state);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut a = app.borrow_mut();
                let CruiseApp { state, swipe, .. } = &mut *a;
                swipe.touch_end(state);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_cruise_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<CruiseApp>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(scene) = app.borrow_mut().scene.as_mut() {
                scene.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Arcade (native) starting...");
    log::info!("The games are browser apps - build for wasm32 and serve the page");

    println!("\nRunning headless smoke pass...");
    smoke_run();
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use neon_arcade::runner::{RunnerPhase, RunnerState, tick};

    let mut state = RunnerState::new(0xC0FFEE, 1280.0, 720.0);
    state.start();
    for _ in 0..600 {
        tick(&mut state, 1.0 / 60.0);
        if state.phase == RunnerPhase::GameOver {
            break;
        }
    }
    println!(
        "✓ Smoke pass ok ({} lanes, score {})",
        state.road.lanes,
        state.display_score()
    );
}

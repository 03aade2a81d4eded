//! Chihuahua Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop. The 3D
//! scene itself lives in the embedding page; this shell feeds it a snapshot
//! per frame and forwards input events into the simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use chihuahua_rush::Settings;
    use chihuahua_rush::render_snapshot::build_snapshot;
    use chihuahua_rush::sim::{GamePhase, SessionEvent, SessionState, TickInput, tick};
    use chihuahua_rush::thoughts;
    use glam::Vec2;

    // Collaborator hooks implemented by the embedding page: the 3D renderer,
    // the score sink, and the thought-card overlay. All optional.
    #[wasm_bindgen(inline_js = "
        export function render_frame(snapshot) {
            if (window.renderFrame) window.renderFrame(JSON.parse(snapshot));
        }
        export function report_game_over(score) {
            if (window.reportGameOver) window.reportGameOver(score);
            else console.log('Game over, score:', score);
        }
        export function show_thought(json) {
            if (window.showThought) window.showThought(JSON.parse(json));
        }
    ")]
    extern "C" {
        fn render_frame(snapshot: &str);
        fn report_game_over(score: u32);
        fn show_thought(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: SessionState,
        input: TickInput,
        settings: Settings,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: SessionState::new(seed),
                input: TickInput::default(),
                settings: Settings::load(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn restart(&mut self, seed: u64) {
            self.state.reset(seed);
            self.input = TickInput::default();
            log::info!("session restarted with seed {seed}");
        }

        /// One rendered frame: advance the sim by the real delta, ship the
        /// snapshot, drain events.
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                0.0
            };
            self.last_time = time;

            let input = self.input.clone();
            tick(&mut self.state, &input, dt);

            // Clear one-shot inputs after processing
            self.input.dodge = false;
            self.input.duck = false;
            self.input.pause = false;
            self.input.pointer = None;

            self.handle_events();
            self.track_fps(time);
            self.render(time);
        }

        fn handle_events(&mut self) {
            for event in self.state.take_events() {
                match event {
                    SessionEvent::GameOver { score } => {
                        report_game_over(score);
                    }
                    SessionEvent::BossDefeated { kind, level } => {
                        log::info!("defeated {kind:?} level {level}");
                        request_thought(&self.state);
                    }
                    SessionEvent::PlayerHit { lives } => {
                        if lives <= 1.0 {
                            request_thought(&self.state);
                        }
                    }
                    _ => {}
                }
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 && time > oldest {
                self.fps = (60_000.0 / (time - oldest)).round() as u32;
            }
        }

        /// Ship the frame snapshot to the page renderer and refresh the HUD
        fn render(&mut self, _time: f64) {
            let snapshot = build_snapshot(&self.state);
            if let Ok(json) = serde_json::to_string(&snapshot) {
                render_frame(&json);
            }
            self.update_hud();
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set_text = |id: &str, value: String| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&value));
                }
            };

            set_text("score", format!("{}", self.state.score as u32));
            set_text("distance", format!("{:.0}m", self.state.distance));
            set_text("combo", format!("x{}", self.state.combo));
            set_text(
                "lives",
                "\u{2764}".repeat(self.state.lives.ceil().max(0.0) as usize),
            );
            set_text(
                "boss-hits",
                format!("{}/10", self.state.boss.hits_landed),
            );
            if self.settings.show_fps {
                set_text("fps", format!("{} FPS", self.fps));
            }

            // Phase overlays toggle on class
            let toggle = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            toggle("game-over", self.state.phase == GamePhase::GameOver);
            toggle("pause-menu", self.state.phase == GamePhase::Paused);
        }
    }

    /// Cosmetic: ask the thought service for a line, show whatever comes back
    fn request_thought(state: &SessionState) {
        let context = thoughts::context_line(
            state.score as u32,
            state.lives,
            state.combo,
        );
        wasm_bindgen_futures::spawn_local(async move {
            let thought = thoughts::generate_thought(&context).await;
            if let Ok(json) = serde_json::to_string(&thought) {
                show_thought(&json);
            }
        });
    }

    /// Normalized [0,1] screen coordinates of a mouse/touch event
    fn event_pointer(x: f32, y: f32) -> Option<Vec2> {
        let window = web_sys::window()?;
        let w = window.inner_width().ok()?.as_f64()? as f32;
        let h = window.inner_height().ok()?.as_f64()? as f32;
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(Vec2::new(x / w, y / h))
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Reaction buttons: clicks carry a pointer position so the cut-in
        // lands near the tap.
        for (id, is_dodge) in [("dodge-btn", true), ("duck-btn", false)] {
            if let Some(btn) = document.get_element_by_id(id) {
                let click_game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                    let mut g = click_game.borrow_mut();
                    if is_dodge {
                        g.input.dodge = true;
                    } else {
                        g.input.duck = true;
                    }
                    g.input.pointer =
                        event_pointer(event.client_x() as f32, event.client_y() as f32);
                });
                let _ = btn.add_event_listener_with_callback(
                    "click",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();

                let touch_game = game.clone();
                let touch = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    let mut g = touch_game.borrow_mut();
                    if is_dodge {
                        g.input.dodge = true;
                    } else {
                        g.input.duck = true;
                    }
                    if let Some(t) = event.touches().get(0) {
                        g.input.pointer =
                            event_pointer(t.client_x() as f32, t.client_y() as f32);
                    }
                });
                let _ = btn.add_event_listener_with_callback(
                    "touchstart",
                    touch.as_ref().unchecked_ref(),
                );
                touch.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pause = true;
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.code().as_str() {
                "Space" | "ArrowUp" => g.input.dodge = true,
                "ArrowDown" => g.input.duck = true,
                "Escape" | "KeyP" => g.input.pause = true,
                _ => {}
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Running {
                        g.input.pause = true;
                        log::info!("auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Running {
                    g.input.pause = true;
                    log::info!("auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        web_sys::window()
            .unwrap()
            .request_animation_frame(f.as_ref().unchecked_ref())
            .expect("requestAnimationFrame");
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let seed = js_sys::Date::now() as u64;
        log::info!("Chihuahua Rush starting, seed {seed}");

        let game = Rc::new(RefCell::new(Game::new(seed)));
        setup_buttons(game.clone());
        setup_keyboard(game.clone());
        setup_auto_pause(game.clone());

        // requestAnimationFrame loop
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let loop_game = game.clone();
        *g.borrow_mut() = Some(Closure::new(move |time: f64| {
            loop_game.borrow_mut().frame(time);
            request_animation_frame(f.borrow().as_ref().unwrap());
        }));
        request_animation_frame(g.borrow().as_ref().unwrap());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use chihuahua_rush::sim::{SessionEvent, SessionState, TickInput, tick};

    env_logger::init();
    log::info!("Chihuahua Rush (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Scripted smoke session: run a minute of play, reacting to everything
    // once it is past the halfway mark.
    let mut state = SessionState::new(0xD06);
    for _ in 0..3600 {
        let react = (state.hazard.active && state.hazard.approach > 0.5)
            || (state.projectile.active && state.projectile.approach > 0.5);
        let input = TickInput {
            dodge: react,
            ..Default::default()
        };
        tick(&mut state, &input, 1.0 / 60.0);
        for event in state.take_events() {
            if let SessionEvent::GameOver { score } = event {
                log::info!("caught! final score {score}");
            }
        }
    }

    println!(
        "60s session: score {}, distance {:.0}m, speed {:.2}, lives {:.1}, boss {:?} lv{} ({}/10 hits)",
        state.score as u32,
        state.distance,
        state.speed,
        state.lives,
        state.boss.kind,
        state.boss.level,
        state.boss.hits_landed,
    );
}

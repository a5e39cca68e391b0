use clap::Parser;
use nannou::event::{TouchEvent, TouchPhase};
use nannou::prelude::*;
use tracing::{error, info};

use ncap::cli::Cli;
use ncap::frame_rate::IDLE_FPS;
use ncap::model::{Bootstrap, Model, StartupError, MOUSE_TOUCH_ID};
use ncap::render_drawing::{to_screen, FontMetrics, NannouSurface};
use ncap::session::Tick;

const WINDOW_TITLE: &str = "com.msun.ncap";

fn main() {
    nannou::app(model).update(update).exit(exit).run();
}

fn model(app: &App) -> Model {
    let cli = Cli::parse();
    let bootstrap = Bootstrap::prepare(&cli);

    let window = app
        .new_window()
        .title(WINDOW_TITLE)
        .fullscreen()
        .touch(touch)
        .mouse_pressed(mouse_pressed)
        .mouse_moved(mouse_moved)
        .mouse_released(mouse_released)
        .view(view)
        .build();
    if let Err(err) = window {
        bootstrap.abort(&StartupError::Window(format!("{err:?}")));
        std::process::exit(1);
    }

    info!(fps = IDLE_FPS, "initial frame rate");

    let win = app.window_rect();
    match Model::new(bootstrap, win.w(), win.h(), &FontMetrics::new()) {
        Ok(model) => model,
        Err((bootstrap, err)) => {
            bootstrap.abort(&err);
            std::process::exit(1);
        }
    }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    let sample = model.touches.sample();
    match model.session.tick(sample) {
        Tick::Continue { .. } => model.session.pace(),
        Tick::Close => app.quit(),
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let mut surface = NannouSurface::new(&draw, app.window_rect());
    model.session.draw(&mut surface);

    if let Err(err) = draw.to_frame(app, &frame) {
        error!(?err, "could not draw frame");
    }
}

fn exit(_app: &App, model: Model) {
    model.shutdown();
}

fn touch(app: &App, model: &mut Model, touch: TouchEvent) {
    let pos = to_screen(app.window_rect(), touch.position);
    match touch.phase {
        TouchPhase::Started => model.touches.press(touch.id, pos),
        TouchPhase::Moved => model.touches.move_to(touch.id, pos),
        TouchPhase::Ended | TouchPhase::Cancelled => model.touches.release(touch.id),
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        let pos = to_screen(app.window_rect(), app.mouse.position());
        model.touches.press(MOUSE_TOUCH_ID, pos);
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    if model.touches.is_down(MOUSE_TOUCH_ID) {
        model
            .touches
            .move_to(MOUSE_TOUCH_ID, to_screen(app.window_rect(), pos));
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.touches.release(MOUSE_TOUCH_ID);
    }
}

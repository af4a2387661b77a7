use amrsim::{Agent, Config, DriveDirection, Grid, Mode, Point, Session, TurnDirection};
use arboard::Clipboard;
use log::{error, info, warn};
use macroquad::prelude::*;
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Configuration shared by the window setup and the main loop
fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        Config::load()
    })
}

fn window_conf() -> Conf {
    let config = config();
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: config.workspace.width,
        window_height: config.workspace.height,
        window_resizable: false,
        ..Default::default()
    }
}

/// Everything the draw calls need, passed explicitly
struct RenderContext {
    background: Color,
    obstacle: Color,
    danger_zone: Color,
    occupied_cell: Color,
    agent_body: Color,
    agent_front: Color,
    waypoint: Color,
    track: Color,
    panel: Color,
    text: Color,
    font_size: f32,
    padding: f32,
    cell_size: f32,
    show_grid: bool,
}

impl RenderContext {
    fn new(config: &Config, session: &Session) -> Self {
        let visual = &config.visual;
        RenderContext {
            background: Color::from_rgba(visual.background_r, visual.background_g, visual.background_b, 255),
            obstacle: BLACK,
            danger_zone: Color::from_rgba(255, 0, 0, 120),
            occupied_cell: Color::from_rgba(255, 200, 0, 60),
            agent_body: BLACK,
            agent_front: Color::from_rgba(0, 149, 218, 255),
            waypoint: GREEN,
            track: RED,
            panel: GRAY,
            text: BLACK,
            font_size: 20.0,
            padding: session.planner().padding(),
            cell_size: session.planner().factor() as f32,
            show_grid: visual.show_grid,
        }
    }
}

fn draw_coarse_grid(ctx: &RenderContext, grid: &Grid) {
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            if grid.is_blocked(x, y) {
                draw_rectangle(
                    x as f32 * ctx.cell_size,
                    y as f32 * ctx.cell_size,
                    ctx.cell_size,
                    ctx.cell_size,
                    ctx.occupied_cell,
                );
            }
        }
    }
}

fn draw_obstacles(ctx: &RenderContext, session: &Session) {
    for obstacle in session.obstacles().iter() {
        let zone = obstacle.danger_zone(ctx.padding);
        draw_rectangle_lines(zone.min.x, zone.min.y, zone.width(), zone.height(), 1.0, ctx.danger_zone);

        let bbox = obstacle.bounding_box();
        draw_rectangle(bbox.min.x, bbox.min.y, bbox.width(), bbox.height(), ctx.obstacle);
    }

    if let (Mode::PlacingObstacle { anchor }, (mx, my)) = (session.mode(), mouse_position()) {
        let (x, y) = (anchor.x.min(mx), anchor.y.min(my));
        draw_rectangle_lines(x, y, (anchor.x - mx).abs(), (anchor.y - my).abs(), 2.0, ctx.obstacle);
    }
}

fn draw_path(ctx: &RenderContext, session: &Session) {
    let mut previous = session.agent().target();
    if let Some(target) = previous {
        draw_circle(target.x, target.y, 3.0, ctx.waypoint);
    }
    for point in session.waypoints().iter() {
        if let Some(prev) = previous {
            draw_line(prev.x, prev.y, point.x, point.y, 1.0, ctx.waypoint);
        }
        draw_circle(point.x, point.y, 2.0, ctx.waypoint);
        previous = Some(*point);
    }
}

fn draw_agent(ctx: &RenderContext, agent: &Agent) {
    for point in agent.track().iter().step_by(5) {
        draw_circle(point.x, point.y, 2.0, ctx.track);
    }

    let [a, b, c, d] = agent.corners().map(|p| vec2(p.x, p.y));
    draw_triangle(a, b, c, ctx.agent_body);
    draw_triangle(a, c, d, ctx.agent_body);
    // Corners 0 and 1 are the front edge
    draw_line(a.x, a.y, b.x, b.y, 5.0, ctx.agent_front);
}

fn draw_panel(ctx: &RenderContext, session: &Session) {
    let (width, height) = (220.0, 100.0);
    let x = screen_width() - width;
    let y = screen_height() - height;
    draw_rectangle(x, y, width, height, ctx.panel);

    let agent = session.agent();
    let lines = [
        format!("X: {:.2}  Y: {:.2}", agent.position.x, agent.position.y),
        format!("Angle: {:.2}", agent.heading.to_degrees()),
        format!("Mode: {}", session.mode().name()),
        session.last_error().unwrap_or("").to_string(),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, x + 10.0, y + 22.0 + i as f32 * 22.0, ctx.font_size, ctx.text);
    }

    draw_text(
        "arrows: drive  drag: obstacle  T: target  X: clear  Space: cancel  G: copy grid  L: log  Esc: quit",
        10.0,
        20.0,
        16.0,
        ctx.text,
    );
}

fn copy_to_clipboard(text: &str) {
    match Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text) {
                warn!("Failed to copy to clipboard: {}", e);
            } else {
                info!("Coarse grid copied to clipboard");
                // Keep clipboard alive for a moment so clipboard managers can capture it
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
        }
        Err(e) => warn!("Failed to access clipboard: {}", e),
    }
}

fn handle_mouse(session: &mut Session) -> bool {
    let (mx, my) = mouse_position();
    let point = Point::new(mx, my);
    let mut obstacles_changed = false;

    if is_mouse_button_pressed(MouseButton::Left) {
        let result = match session.mode() {
            Mode::Idle => session.begin_obstacle(point),
            Mode::Targeting => session.spawn_target(point),
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!("{}", e);
        }
    }

    if is_mouse_button_released(MouseButton::Left) {
        if let Mode::PlacingObstacle { .. } = session.mode() {
            obstacles_changed = session.finish_obstacle(point).is_ok();
        }
    }

    obstacles_changed
}

/// Arrow keys drive the agent by hand while no plan is active
fn handle_manual_drive(session: &mut Session, dt: f32) {
    if session.mode() != Mode::Idle {
        return;
    }

    let mut result = Ok(());
    if is_key_down(KeyCode::Up) {
        result = result.and(session.drive(DriveDirection::Forward, dt));
    }
    if is_key_down(KeyCode::Down) {
        result = result.and(session.drive(DriveDirection::Backward, dt));
    }
    if is_key_down(KeyCode::Left) {
        result = result.and(session.turn(TurnDirection::Left, dt));
    }
    if is_key_down(KeyCode::Right) {
        result = result.and(session.turn(TurnDirection::Right, dt));
    }
    if let Err(e) = result {
        warn!("{}", e);
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = config();
    let mut session = Session::new(config);
    let mut ctx = RenderContext::new(config, &session);
    let mut grid_view = session.coarse_grid();

    let (width, height) = session.planner().workspace_size();
    info!(
        "workspace {}x{}, K={}, padding {:.1}",
        width,
        height,
        session.planner().factor(),
        session.planner().padding()
    );

    loop {
        if handle_mouse(&mut session) {
            grid_view = session.coarse_grid();
        }

        if is_key_pressed(KeyCode::T) {
            if let Err(e) = session.begin_targeting() {
                warn!("{}", e);
            }
        }
        if is_key_pressed(KeyCode::X) {
            match session.clear_obstacles() {
                Ok(_) => grid_view = session.coarse_grid(),
                Err(e) => warn!("{}", e),
            }
        }
        if is_key_pressed(KeyCode::Space) {
            if let Err(e) = session.cancel() {
                warn!("{}", e);
            }
        }
        if is_key_pressed(KeyCode::V) {
            ctx.show_grid = !ctx.show_grid;
        }
        if is_key_pressed(KeyCode::G) {
            copy_to_clipboard(&grid_view.to_ascii());
        }
        if is_key_pressed(KeyCode::L) {
            session.event_log().print_with_durations();
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        let dt = get_frame_time();
        handle_manual_drive(&mut session, dt);
        session.tick(dt);

        clear_background(ctx.background);
        if ctx.show_grid {
            draw_coarse_grid(&ctx, &grid_view);
        }
        draw_obstacles(&ctx, &session);
        draw_path(&ctx, &session);
        draw_agent(&ctx, session.agent());
        draw_panel(&ctx, &session);

        next_frame().await
    }

    info!("{}", session.event_log().summary());
    if config.logging.enable_event_log {
        match session.event_log().save_to_file(&config.logging.event_log_path) {
            Ok(()) => info!("Event log saved to {}", config.logging.event_log_path),
            Err(e) => error!("Failed to save event log: {}", e),
        }
    }
}

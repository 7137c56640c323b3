use std::path::PathBuf;
use std::time::Duration;

use box_stacks::input::{on_mouse_motion, on_mouse_press, on_mouse_release, on_mouse_scroll};
use box_stacks::render::TEXT_SIZE;
use box_stacks::{
    render_scene, tick, Accumulator, Canvas, EntityKind, FrameTiming, InputState,
    MouseButton as PointerButton, Scene, SceneConfig, SceneError, Sprite, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use clap::Parser;
use log::{error, info, warn};
use macroquad::prelude::*;

const BOX_TEXTURE: &str = "assets/boxCrate_double.png";
const COIN_TEXTURE: &str = "assets/coin_01.png";
const BACKGROUND: Color = Color::new(0.18, 0.31, 0.31, 1.0);
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Drag boxes with the left button, shoot coins with the right one.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Scene configuration (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Rapier2D + Macroquad box stacks".to_owned(),
        window_width: SCREEN_WIDTH as i32,
        window_height: SCREEN_HEIGHT as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SceneError> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SceneConfig::from_file(path)?,
        None => SceneConfig::default(),
    };

    let mut canvas = MacroquadCanvas {
        world_size: vec2(config.screen_width, config.screen_height),
        box_texture: load_sprite(BOX_TEXTURE).await,
        coin_texture: load_sprite(COIN_TEXTURE).await,
    };
    let mut accumulator = Accumulator::new(config.timestep).with_max_steps(MAX_STEPS_PER_FRAME);
    let mut scene = Scene::new(config)?;
    let mut input = InputState::default();
    let mut timing = FrameTiming::default();
    let mut last_pointer = canvas.screen_to_world(mouse_position().into());

    loop {
        if is_key_pressed(KeyCode::Escape) {
            info!("escape pressed, closing");
            break;
        }

        let pointer = canvas.screen_to_world(mouse_position().into());
        if is_mouse_button_pressed(MouseButton::Left) {
            on_mouse_press(&mut scene, &mut input, pointer, PointerButton::Primary)?;
        }
        if is_mouse_button_pressed(MouseButton::Right) {
            on_mouse_press(&mut scene, &mut input, pointer, PointerButton::Secondary)?;
        }
        if is_mouse_button_pressed(MouseButton::Middle) {
            on_mouse_press(&mut scene, &mut input, pointer, PointerButton::Middle)?;
        }
        if is_mouse_button_released(MouseButton::Left) {
            on_mouse_release(&mut input, PointerButton::Primary);
        }
        let delta = [pointer[0] - last_pointer[0], pointer[1] - last_pointer[1]];
        if delta != [0.0, 0.0] {
            on_mouse_motion(&mut scene, &mut input, pointer, delta)?;
        }
        last_pointer = pointer;
        let (wheel_x, wheel_y) = mouse_wheel();
        if wheel_x != 0.0 || wheel_y != 0.0 {
            on_mouse_scroll(&mut input, [wheel_x, wheel_y]);
        }

        accumulator.accumulate(Duration::from_secs_f32(get_frame_time()));
        while accumulator.should_step() {
            timing = tick(&mut scene, &mut input)?;
        }

        render_scene(&scene, &timing, &mut canvas);

        next_frame().await;
    }
    Ok(())
}

async fn load_sprite(path: &str) -> Option<Texture2D> {
    match load_texture(path).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Linear);
            Some(texture)
        }
        Err(err) => {
            warn!("could not load {path} ({err:?}), drawing plain shapes instead");
            None
        }
    }
}

/// Draws world-space (y up) sprites into the macroquad window (y down),
/// stretching the configured world size to the window.
struct MacroquadCanvas {
    world_size: Vec2,
    box_texture: Option<Texture2D>,
    coin_texture: Option<Texture2D>,
}

impl MacroquadCanvas {
    fn scale(&self) -> Vec2 {
        vec2(
            screen_width() / self.world_size.x,
            screen_height() / self.world_size.y,
        )
    }

    fn world_to_screen(&self, position: [f32; 2]) -> Vec2 {
        let scale = self.scale();
        vec2(
            position[0] * scale.x,
            screen_height() - position[1] * scale.y,
        )
    }

    fn screen_to_world(&self, position: Vec2) -> [f32; 2] {
        let scale = self.scale();
        [
            position.x / scale.x,
            (screen_height() - position.y) / scale.y,
        ]
    }
}

impl Canvas for MacroquadCanvas {
    fn begin_frame(&mut self) {
        clear_background(BACKGROUND);
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        let center = self.world_to_screen(sprite.transform.position);
        let [width, height] = sprite.kind.sprite_size();
        let size = vec2(width, height) * self.scale();
        // Screen y points down, so a counter-clockwise world angle turns clockwise.
        let rotation = -sprite.transform.angle_degrees.to_radians();

        let texture = match sprite.kind {
            EntityKind::Box { .. } => self.box_texture.as_ref(),
            EntityKind::Circle { .. } => self.coin_texture.as_ref(),
        };
        if let Some(texture) = texture {
            draw_texture_ex(
                texture,
                center.x - size.x * 0.5,
                center.y - size.y * 0.5,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(size),
                    rotation,
                    ..Default::default()
                },
            );
            return;
        }

        match sprite.kind {
            EntityKind::Box { .. } => {
                draw_rectangle_ex(
                    center.x,
                    center.y,
                    size.x,
                    size.y,
                    DrawRectangleParams {
                        offset: vec2(0.5, 0.5),
                        rotation,
                        color: ORANGE,
                    },
                );
            }
            EntityKind::Circle { .. } => {
                let radius = size.x * 0.5;
                draw_circle(center.x, center.y, radius, GOLD);
                let spoke = Vec2::from_angle(rotation) * radius;
                draw_line(center.x, center.y, center.x + spoke.x, center.y + spoke.y, 1.0, BROWN);
            }
        }
    }

    fn draw_line(&mut self, a: [f32; 2], b: [f32; 2], thickness: f32) {
        let a = self.world_to_screen(a);
        let b = self.world_to_screen(b);
        draw_line(a.x, a.y, b.x, b.y, thickness, WHITE);
    }

    fn draw_text(&mut self, text: &str, position: [f32; 2], size: f32) {
        let at = self.world_to_screen(position);
        // Font sizes in macroquad are pixel heights; 12 px is unreadable.
        draw_text(text, at.x, at.y, size.max(TEXT_SIZE) * 1.6, BLACK);
    }
}

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use cloner_core::{update, AppState, Msg};
use cloner_logging::{cloner_error, cloner_info};

use super::config::{AppConfig, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging;
use super::ui::constants::QUIT_COMMAND;
use super::ui::render::Renderer;

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load(&PathBuf::from(CONFIG_FILENAME))?
        .with_env_overrides(|key| std::env::var(key).ok());
    logging::initialize(config.log_destination, config.level(), &config.log_file);
    cloner_info!("Starting with service {}", config.service_url);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&config.client_settings(), msg_tx.clone())
        .context("starting clone engine")?;
    runner.health_check();

    let policy = config.sandbox_policy();
    if !policy.isolates_origin() {
        cloner_info!(
            "Preview sandbox grants \"{}\"; set same_origin_preview: false in {} to isolate it",
            policy.attribute_value(),
            CONFIG_FILENAME
        );
    }
    let mut renderer = Renderer::new(config.output_dir.clone(), policy);

    spawn_input_reader(msg_tx.clone());

    // Background tick to coalesce rendering.
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut state = AppState::new();
    render(&mut renderer, &state);

    while let Ok(msg) = msg_rx.recv() {
        let closing = msg == Msg::ViewClosed;
        let tick = msg == Msg::Tick;

        let (next, effects) = update(std::mem::take(&mut state), msg);
        state = next;
        runner.run(effects);

        if closing {
            break;
        }
        if tick && state.consume_dirty() {
            render(&mut renderer, &state);
        }
    }

    runner.shutdown();
    cloner_info!("View closed");
    Ok(())
}

fn render(renderer: &mut Renderer, state: &AppState) {
    if let Err(err) = renderer.render(&state.view()) {
        cloner_error!("Failed to write host page: {}", err);
    }
}

/// Each stdin line replaces the URL field and submits the form.
fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim() == QUIT_COMMAND {
                break;
            }
            if msg_tx.send(Msg::InputChanged(line)).is_err() || msg_tx.send(Msg::Submitted).is_err()
            {
                return;
            }
        }
        let _ = msg_tx.send(Msg::ViewClosed);
    });
}

//! Runs a scripted input session against a demo menu and logs what gets drawn.

#[macro_use]
extern crate tracing;

use anyhow::{Context, Result};
use clap::Parser;
use framekit::color::Color;
use framekit::events::{KeyCode, Listener, MouseButton, RawEvent};
use framekit::look_and_feel::{Alignment, DrawCommand, Fonts, Recorder, TextType};
use framekit::widgets::{
    Button, DropDown, Filler, Panel, ScrollableList, Slider, TextArea, TextInput, ToggleButton,
};
use framekit::{Frame, FrameManager, Host, Settings, WidgetId, WidgetTree};
use std::path::PathBuf;
use std::{env, panic};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Our crate is debug, everything else is warn.
const DEFAULT_FILTER: &str = "warn,framekit=debug,framekit_demo=debug";

#[derive(Parser, Debug)]
#[command(name = "framekit-demo", about = "Drives a demo menu with scripted input")]
struct Args {
    /// Settings file (TOML). Defaults are used for anything it leaves out.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the screen width from the settings.
    #[arg(long)]
    width: Option<i32>,

    /// Overrides the screen height from the settings.
    #[arg(long)]
    height: Option<i32>,

    /// Print every draw command of the final frame to stdout.
    #[arg(long)]
    dump: bool,
}

fn init_logging() {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let format = fmt::format().compact().with_line_number(true);
    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(fmt::layer().event_format(format));
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("unable to install log subscriber: {}", err);
    }

    panic::set_hook(Box::new(|info| {
        error!("{}", info);
    }));
    trace!("installed custom panic hook");
}

/// Widgets the script interacts with.
struct Demo {
    settings_frame: WidgetId,
    input: WidgetId,
    dropdown: WidgetId,
    list: WidgetId,
}

fn build_menu(manager: &mut FrameManager, settings: &Settings) -> Result<Demo> {
    let tree = manager.tree_mut();

    let title = tree.insert(TextArea::new(
        "framekit demo",
        TextType::Title,
        settings.text_alignment,
    ));
    let quit = tree.insert(Button::with_action("Quit", |()| info!("quit pressed")));
    let toolbar = tree.insert(Panel::row());
    tree.add_children(toolbar, &[title, quit])?;
    let main = tree.insert(Panel::column());
    let spacer = tree.insert(Filler::default());
    tree.add_children(main, &[toolbar, spacer])?;
    manager.set_main_gui(main)?;

    let tree = manager.tree_mut();
    let mut name = TextInput::new("", 200, 30);
    name.on_submit(Listener::new(|text: String| info!("name submitted: {:?}", text)));
    let input = tree.insert(name);

    let mut volume = Slider::new(0., 100., 50., 250, 30).with_scroll_speed(settings.slider_scroll_speed);
    volume.add_listener(Listener::new(|value: f32| debug!("volume: {:.1}", value)));
    let volume = tree.insert(volume);

    let mut music = ToggleButton::new("Music", true).with_color(Color::rgb(0.3, 0.7, 0.4));
    music.on_toggle(Listener::new(|state: bool| info!("music: {}", state)));
    let music = tree.insert(music);

    let qualities = vec!["Low".to_string(), "Medium".to_string(), "High".to_string()];
    let dropdown = DropDown::create(tree, qualities, 1);
    tree.update::<DropDown, _>(dropdown, |d| {
        d.add_listener(Listener::new(|index: usize| info!("quality: {}", index)))
    })?;

    let items: Vec<_> = (1..=8)
        .map(|i| {
            tree.insert(
                TextArea::new(format!("Save slot {}", i), TextType::Regular, Alignment::LeftMiddle)
                    .with_min_size(200, 30),
            )
        })
        .collect();
    let list = ScrollableList::create(tree, 3, &items)?;

    let content = tree.insert(Panel::column());
    tree.add_children(content, &[input, volume, music, dropdown, list])?;

    let settings_frame = Frame::create(tree, "Settings", 0, 0);
    Frame::set_main_panel(tree, settings_frame, content)?;
    Frame::pack(tree, settings_frame);
    manager.add_frame_centered(settings_frame)?;

    let about = Frame::create(manager.tree_mut(), "About", 300, 200);
    manager.add_frame_default(about)?;
    manager.focus(settings_frame)?;

    Ok(Demo {
        settings_frame,
        input,
        dropdown,
        list,
    })
}

fn center(tree: &WidgetTree, id: WidgetId) -> (i32, i32) {
    let position = tree.screen_position(id);
    let size = tree.size(id);
    (position.x + size.x / 2, position.y + size.y / 2)
}

fn click(events: &mut Vec<RawEvent>, (x, y): (i32, i32)) {
    events.push(RawEvent::MouseMove {
        dx: 0,
        dy: 0,
        x: x as f32,
        y: y as f32,
    });
    events.push(RawEvent::MouseDown {
        button: MouseButton::Left,
        x,
        y,
    });
    events.push(RawEvent::MouseUp {
        button: MouseButton::Left,
    });
}

/// Runs one input step: queue the events, apply them, draw.
fn step(
    name: &str,
    host: &mut Host,
    manager: &mut FrameManager,
    recorder: &mut Recorder,
    events: Vec<RawEvent>,
) -> Result<()> {
    let sender = host.sender();
    for event in events {
        sender.send(event).context("event queue closed")?;
    }
    let count = host.poll(manager);
    recorder.take();
    manager.draw(recorder);
    info!(
        "{}: applied {} events, drew {} commands",
        name,
        count,
        recorder.commands().len()
    );
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {:?}", path))?,
        None => Settings::default(),
    };
    if let Some(width) = args.width {
        settings.window_width = width;
    }
    if let Some(height) = args.height {
        settings.window_height = height;
    }
    debug!("settings: {:?}", settings);

    let mut manager = FrameManager::new(&settings);
    let mut host = Host::new();
    let mut recorder = Recorder::new(Fonts::load(&settings.fonts));
    let demo = build_menu(&mut manager, &settings)?;
    manager.draw(&mut recorder);

    // type a name
    let mut events = Vec::new();
    click(&mut events, center(manager.tree(), demo.input));
    events.extend("Player One".chars().map(RawEvent::CharTyped));
    events.push(RawEvent::KeyDown(KeyCode::Return));
    events.push(RawEvent::KeyUp(KeyCode::Return));
    step("name", &mut host, &mut manager, &mut recorder, events)?;

    // pick a quality
    let mut events = Vec::new();
    click(&mut events, center(manager.tree(), demo.dropdown));
    step("open dropdown", &mut host, &mut manager, &mut recorder, events)?;
    let options = manager
        .tree()
        .widget::<DropDown>(demo.dropdown)
        .map(DropDown::options)
        .context("dropdown is gone")?;
    let high = *manager
        .tree()
        .children(options)
        .last()
        .context("dropdown has no options")?;
    let mut events = Vec::new();
    click(&mut events, center(manager.tree(), high));
    step("select quality", &mut host, &mut manager, &mut recorder, events)?;

    // scroll the save slots
    let (x, y) = center(manager.tree(), demo.list);
    let mut events = vec![RawEvent::MouseMove {
        dx: 0,
        dy: 0,
        x: x as f32,
        y: y as f32,
    }];
    events.extend((0..3).map(|_| RawEvent::Scroll { delta: -1. }));
    step("scroll", &mut host, &mut manager, &mut recorder, events)?;

    // drag the frame by its title bar
    let origin = manager.tree().screen_position(demo.settings_frame);
    let (x, y) = (origin.x + 20, origin.y + 10);
    let events = vec![
        RawEvent::MouseDown {
            button: MouseButton::Left,
            x,
            y,
        },
        RawEvent::MouseMove {
            dx: 40,
            dy: 25,
            x: (x + 40) as f32,
            y: (y + 25) as f32,
        },
        RawEvent::MouseUp {
            button: MouseButton::Left,
        },
    ];
    step("drag", &mut host, &mut manager, &mut recorder, events)?;
    info!(
        "settings frame moved from {:?} to {:?}",
        origin,
        manager.tree().position(demo.settings_frame)
    );

    if args.dump {
        for command in recorder.commands() {
            match command {
                DrawCommand::Element {
                    element, position, ..
                } => println!("{:?} at ({}, {})", element, position.x, position.y),
                DrawCommand::Text { text, position, .. } => {
                    println!("{:?} at ({}, {})", text, position.x, position.y)
                }
            }
        }
    }
    Ok(())
}

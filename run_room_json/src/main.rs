use std::{
    env,
    error::Error,
    fs::File,
    io::{BufWriter, Write},
};

use mirror_room::*;
use mirror_room_json::{load_events, load_scene, ScriptEvent};
use mirror_room_svg::SvgSurface;

fn replay(engine: &mut Engine<SvgSurface>, events: &[ScriptEvent]) {
    for event in events {
        if let Some(delay) = event.delay() {
            engine.tick(delay);
        } else if let Some(pointer) = event.to_pointer_event(|id| engine.element(id)) {
            engine.handle_pointer(&pointer);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);

    let scene_path = args
        .next()
        .ok_or("expected a scene file path as a first argument.")?;

    let out_path = args
        .next()
        .ok_or("expected an output svg path as a second argument.")?;

    let events = args.next().map(load_events).transpose()?.unwrap_or_default();

    let config = load_scene(scene_path)?.to_engine_config()?;
    let max = config.bounds.max();

    let mut engine = Engine::new(SvgSurface::new(max.x, max.y), config);

    replay(&mut engine, &events);
    engine.finish_reveal();

    log::info!(
        "replayed {} events, {} bodies on the surface, light path: {:?}",
        events.len(),
        engine.graph().len(),
        engine.light_path().map(LightPath::waypoints),
    );

    let mut out = BufWriter::new(File::create(out_path)?);
    engine.surface().write_svg(&mut out)?;
    out.flush()?;

    Ok(())
}

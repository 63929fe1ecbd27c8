use std::{env, error::Error, fs::File};

use mirror_room_json::serde_json;
use mirror_room_random::*;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("please provide a path to serialize the scene json data")?;

    let mut rng = rand::thread_rng();

    let scene = match args.next().and_then(|arg| arg.parse().ok()) {
        Some(num_shapes) => random_scene(&mut rng, num_shapes),
        None => Random::random(&mut rng),
    };

    log::info!(
        "generated {} shapes in {:?} with {:?} mirrors",
        scene.shapes.len(),
        scene.bounds,
        scene.mirror_location,
    );

    serde_json::to_writer_pretty(File::create(file_path)?, &scene)?;

    Ok(())
}

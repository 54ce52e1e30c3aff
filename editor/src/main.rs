use std::{io, path::PathBuf};

use novo_core::render::RenderOptions;

mod app;
mod command;
mod render;
mod resource;
mod scene;

struct Args {
    scene: Option<PathBuf>,
    camera: scene::CameraConfig,
    options: RenderOptions,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args {
        scene: None,
        camera: Default::default(),
        options: Default::default(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--zero-hidden-lights" => parsed.options.zero_hidden_light_positions = true,
            "--speed" | "--sensitivity" | "--boost" => {
                let value = args
                    .next()
                    .and_then(|v| v.parse::<f32>().ok())
                    .ok_or_else(|| format!("`{}` needs a number", arg))?;
                match arg.as_str() {
                    "--speed" => parsed.camera.speed = value,
                    "--sensitivity" => parsed.camera.sensitivity = value,
                    _ => parsed.camera.boost = value,
                }
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option `{}`", flag)),
            path if parsed.scene.is_none() => parsed.scene = Some(PathBuf::from(path)),
            extra => return Err(format!("Unexpected argument `{}`", extra)),
        }
    }

    Ok(parsed)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args();
    let exe_path = args.next().unwrap_or_default();
    let args = match parse_args(args) {
        Ok(args) => args,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("usage: novo_editor [scene.json] [--speed f] [--sensitivity f] [--boost f] [--zero-hidden-lights]");
            std::process::exit(2);
        }
    };

    let mut app = match app::Application::open(exe_path, args.scene, args.camera, args.options) {
        Ok(app) => app,
        Err(err) => {
            log::error!("Failed to start editor: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = app.run(io::stdin().lock(), io::stdout().lock()) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(s: &str) -> Result<Args, String> {
        parse_args(s.split_whitespace().map(str::to_string))
    }

    #[test]
    fn parses_options() {
        let parsed = args("scenes/a.json --speed 4 --zero-hidden-lights").unwrap();
        assert_eq!(parsed.scene, Some(PathBuf::from("scenes/a.json")));
        assert_eq!(parsed.camera.speed, 4.);
        assert_eq!(parsed.camera.boost, scene::CameraConfig::default().boost);
        assert!(parsed.options.zero_hidden_light_positions);

        assert!(args("--speed fast").is_err());
        assert!(args("a.json b.json").is_err());
        assert!(args("--fly").is_err());
    }
}

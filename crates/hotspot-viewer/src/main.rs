//! Hotspot Viewer - native entry point

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use anyhow::{Context, Result};
    use clap::Parser;
    use hotspot_core::SceneConfig;
    use hotspot_viewer::ViewerOptions;
    use std::path::PathBuf;

    #[derive(Parser, Debug)]
    #[command(name = "hotspot-viewer")]
    #[command(about = "Interactive 3D hotspot viewer")]
    #[command(version)]
    pub struct Args {
        /// Path to a scene file (defaults to the built-in scene)
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        pub log_level: String,

        /// Print the effective scene as TOML and exit
        #[arg(long)]
        pub dump_config: bool,
    }

    pub fn load_scene(path: Option<&PathBuf>) -> Result<SceneConfig> {
        match path {
            Some(path) => SceneConfig::from_file(path)
                .with_context(|| format!("Failed to load scene {}", path.display())),
            None => hotspot_viewer::default_config().context("Invalid built-in scene"),
        }
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();
        let config = load_scene(args.config.as_ref())?;

        if args.dump_config {
            println!("{}", config.to_toml()?);
            return Ok(());
        }

        let options = ViewerOptions {
            log_level: hotspot_viewer::parse_level(&args.log_level),
            ..ViewerOptions::default()
        };
        hotspot_viewer::run(config, &options)?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_args() {
            let args = Args::parse_from(["hotspot-viewer", "--config", "room.toml", "-l", "debug"]);
            assert_eq!(args.config, Some(PathBuf::from("room.toml")));
            assert_eq!(args.log_level, "debug");
            assert!(!args.dump_config);
        }

        #[test]
        fn test_load_scene_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(
                file,
                r#"
[[panel]]
title = "Only"

[[marker]]
name = "dot"
position = [0.0, 1.0, 0.0]
panel = 0
"#
            )
            .unwrap();

            let config = load_scene(Some(&file.path().to_path_buf())).unwrap();
            assert_eq!(config.panels.len(), 1);
            assert_eq!(config.marker_list[0].name, "dot");
        }

        #[test]
        fn test_load_scene_rejects_orphan_marker() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(
                file,
                r#"
[[panel]]
title = "Only"

[[marker]]
name = "dot"
position = [0.0, 1.0, 0.0]
panel = 4
"#
            )
            .unwrap();

            assert!(load_scene(Some(&file.path().to_path_buf())).is_err());
        }

        #[test]
        fn test_builtin_scene() {
            assert_eq!(load_scene(None).unwrap(), SceneConfig::default());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

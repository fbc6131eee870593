use std::fmt::Debug;
use std::path::Path;

use eyre::WrapErr;
use rrt_graph::Scene;

/// Load the scene from the provided path, or fall back to the built-in scene.
#[tracing::instrument(level = "debug")]
pub fn load_scene(scene_path: Option<&Path>) -> eyre::Result<Scene> {
    match scene_path {
        Some(path) => Scene::load(path),
        None => {
            tracing::debug!("No scene file given, using the built-in scene");
            Ok(Scene::default())
        }
    }
}

/// Write `contents` to `path`, creating any missing parent directories.
pub fn write_creating_dirs(path: impl AsRef<Path> + Debug, contents: impl AsRef<[u8]>) -> eyre::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).wrap_err_with(|| format!("Failed to create `{}`", parent.display()))?;
    }
    std::fs::write(path, contents).wrap_err_with(|| format!("Failed to write `{}`", path.display()))
}

use anyhow::{Context, Result, anyhow, bail};
use fence_core::{StyleCatalog, StyleTemplate};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Usage:
///   cargo run -p xtask -- styles check [FILE]
///   cargo run -p xtask -- styles list  [FILE]
///   cargo run -p xtask -- styles add <KEY> <LABEL> <SCENE_PATH> [FILE]
///
/// `FILE` defaults to `editor/assets/styles.toml`.
///
/// `add` appends a `[[style]]` table for a scene-based pylon, borrowing the beam
/// of the green energy style. The file is edited with `toml_edit` so existing
/// comments and layout survive, and it is restored if the result doesn't load.
fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(cmd) = args.next() else {
        print_usage();
        bail!("missing command");
    };

    match cmd.as_str() {
        "styles" => {
            let Some(sub) = args.next() else {
                print_usage();
                bail!("missing subcommand for `styles`");
            };
            let rest: Vec<String> = args.collect();
            match sub.as_str() {
                "check" => styles_check(&catalog_path(rest.first())?),
                "list" => styles_list(&catalog_path(rest.first())?),
                "add" => {
                    let [key, label, scene, file @ ..] = rest.as_slice() else {
                        print_usage();
                        bail!("`styles add` needs <KEY> <LABEL> <SCENE_PATH>");
                    };
                    styles_add(&catalog_path(file.first())?, key, label, scene)
                }
                other => {
                    print_usage();
                    bail!("unknown `styles` subcommand: {other}");
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {other}");
        }
    }
}

fn print_usage() {
    eprintln!(
        r#"xtask

Usage:
  cargo run -p xtask -- styles <check|list|add> ...

Commands:
  styles check [FILE]                          Load the catalog the way the editor does
  styles list  [FILE]                          Print every style, built-ins included
  styles add <KEY> <LABEL> <SCENE_PATH> [FILE] Append a scene-based style
"#
    );
}

/// The project root is the directory containing this workspace's `Cargo.toml`.
fn project_root() -> Result<PathBuf> {
    let exe = env::current_exe().context("failed to locate current executable")?;
    // Typically: <root>/target/.../xtask[.exe]
    let mut dir = exe
        .parent()
        .ok_or_else(|| anyhow!("current_exe has no parent directory"))?
        .to_path_buf();

    for _ in 0..12 {
        let cargo = dir.join("Cargo.toml");
        if cargo.is_file() && dir.join("fence_core").is_dir() && dir.join("editor").is_dir() {
            return Ok(dir);
        }
        let Some(parent) = dir.parent() else { break };
        dir = parent.to_path_buf();
    }

    bail!(
        "could not determine project root; expected to find Cargo.toml with fence_core/ and editor/ siblings"
    );
}

fn catalog_path(arg: Option<&String>) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(project_root()?.join("editor/assets/styles.toml")),
    }
}

fn load_catalog(path: &Path) -> Result<StyleCatalog> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    StyleCatalog::from_toml_str(&source)
        .with_context(|| format!("failed to load styles from {}", path.display()))
}

fn styles_check(path: &Path) -> Result<()> {
    let catalog = load_catalog(path)?;
    println!("{}: {} style(s) ok", path.display(), catalog.len());
    Ok(())
}

fn describe(style: &StyleTemplate) -> String {
    let pylon = match &style.pylon {
        fence_core::PylonAsset::Scene { path } => format!("scene {path}"),
        fence_core::PylonAsset::Primitive { shape, .. } => format!("{shape:?}").to_lowercase(),
    };
    format!(
        "{:<24} {:<24} pylon: {pylon}, width x{}, {}",
        style.key,
        style.label,
        style.width_multiplier,
        if style.close_loop { "closed" } else { "open" }
    )
}

fn styles_list(path: &Path) -> Result<()> {
    let catalog = load_catalog(path)?;
    for style in catalog.iter() {
        println!("{}", describe(style));
    }
    Ok(())
}

/// RAII guard that restores a file to its original contents when dropped.
struct RestoreFile {
    path: PathBuf,
    original: String,
    /// A file that didn't exist is removed again instead of restored.
    existed: bool,
    kept: bool,
}

impl RestoreFile {
    fn capture(path: PathBuf) -> Result<Self> {
        let (original, existed) = match fs::read_to_string(&path) {
            Ok(contents) => (contents, true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => (String::new(), false),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        Ok(Self {
            path,
            original,
            existed,
            kept: false,
        })
    }

    fn write(&self, contents: &str) -> Result<()> {
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for RestoreFile {
    fn drop(&mut self) {
        if self.kept {
            return;
        }
        // Best-effort restore. We can't bubble errors in Drop.
        if self.existed {
            let _ = fs::write(&self.path, &self.original);
        } else {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn append_scene_style(original: &str, key: &str, label: &str, scene: &str) -> Result<String> {
    let builtin = StyleCatalog::builtin();
    let base = builtin
        .get("green_energy")
        .ok_or_else(|| anyhow!("built-in green_energy style is missing"))?;

    let mut doc = original
        .parse::<toml_edit::DocumentMut>()
        .context("failed to parse style catalog as TOML")?;

    let styles = doc
        .entry("style")
        .or_insert(toml_edit::Item::ArrayOfTables(toml_edit::ArrayOfTables::new()))
        .as_array_of_tables_mut()
        .ok_or_else(|| anyhow!("`style` must be an array of tables ([[style]])"))?;

    let mut pylon = toml_edit::Table::new();
    pylon["kind"] = toml_edit::value("scene");
    pylon["path"] = toml_edit::value(scene);

    let color: toml_edit::Array = base.beam.color.iter().map(|&c| f64::from(c)).collect();
    let mut beam = toml_edit::Table::new();
    beam["color"] = toml_edit::value(color);
    beam["start_width"] = toml_edit::value(f64::from(base.beam.start_width));
    beam["end_width"] = toml_edit::value(f64::from(base.beam.end_width));

    let mut style = toml_edit::Table::new();
    style["key"] = toml_edit::value(key);
    style["label"] = toml_edit::value(label);
    style["width_multiplier"] = toml_edit::value(f64::from(base.width_multiplier));
    style["pylon"] = toml_edit::Item::Table(pylon);
    style["beam"] = toml_edit::Item::Table(beam);
    styles.push(style);

    Ok(doc.to_string())
}

fn styles_add(path: &Path, key: &str, label: &str, scene: &str) -> Result<()> {
    if scene.trim().is_empty() {
        bail!("scene path must not be empty");
    }

    let guard = RestoreFile::capture(path.to_path_buf())?;
    let patched = append_scene_style(&guard.original, key, label, scene)?;
    guard.write(&patched)?;

    // Duplicate keys and bad values surface here; the guard puts the old file back.
    let catalog = load_catalog(path)?;
    guard.keep();

    println!(
        "added `{key}` to {} ({} style(s))",
        path.display(),
        catalog.len()
    );
    Ok(())
}

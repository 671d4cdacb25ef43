use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use map_content_migration::{
    from_text, to_text, CandidatePolicy, ClipboardHeader, ContentHashIndex, IdCorrector, ItemId,
    MigrationConfig, MigrationContext, Tile, VersionTable, CLIPBOARD_TEXT_TAG,
};
use mcm_assets::SpriteStore;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about = "Map content migration between client revisions")]
struct Cli {
    /// TOML migration config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the header of a clipboard file as JSON.
    Inspect { input: PathBuf },
    /// Encode a JSON tile list into a clipboard buffer.
    Encode {
        tiles: PathBuf,
        #[arg(long)]
        revision: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        no_compress: bool,
        /// Write the base64 text form instead of raw bytes.
        #[arg(long, default_value_t = false)]
        text: bool,
    },
    /// Decode a clipboard buffer (binary or text) into JSON tiles.
    Decode {
        input: PathBuf,
        #[arg(long)]
        target: String,
        #[arg(long)]
        mappings: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail when the payload checksum does not match.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Translate one item id through a mapping file.
    TranslateId {
        id: ItemId,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        mappings: PathBuf,
    },
    /// List visually identical sprites between two revisions.
    Equivalents {
        #[arg(long)]
        scope_a: String,
        #[arg(long)]
        sprites_a: PathBuf,
        #[arg(long)]
        scope_b: String,
        #[arg(long)]
        sprites_b: PathBuf,
    },
    /// Decode a clipboard and re-emit it for another revision using sprite equivalence.
    Migrate {
        input: PathBuf,
        #[arg(long)]
        target: String,
        #[arg(long)]
        source_sprites: PathBuf,
        #[arg(long)]
        target_sprites: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report ids that duplicate a lower id's sprite within one revision.
    Correct {
        #[arg(long)]
        scope: String,
        #[arg(long)]
        sprites: PathBuf,
        ids: Vec<ItemId>,
    },
}

#[derive(Serialize)]
struct EquivalentPair {
    source: ItemId,
    targets: Vec<ItemId>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => MigrationConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => MigrationConfig::default(),
    };
    match cli.command {
        Command::Inspect { input } => inspect(&input),
        Command::Encode {
            tiles,
            revision,
            output,
            no_compress,
            text,
        } => encode(
            config,
            &tiles,
            &revision,
            output.as_deref(),
            !no_compress,
            text,
        ),
        Command::Decode {
            input,
            target,
            mappings,
            output,
            strict,
        } => decode(
            config,
            &input,
            &target,
            mappings.as_deref(),
            output.as_deref(),
            strict,
        ),
        Command::TranslateId {
            id,
            from,
            to,
            mappings,
        } => translate_id(id, &from, &to, &mappings),
        Command::Equivalents {
            scope_a,
            sprites_a,
            scope_b,
            sprites_b,
        } => equivalents(&scope_a, &sprites_a, &scope_b, &sprites_b),
        Command::Migrate {
            input,
            target,
            source_sprites,
            target_sprites,
            output,
        } => migrate(
            config,
            &input,
            &target,
            &source_sprites,
            &target_sprites,
            output.as_deref(),
        ),
        Command::Correct {
            scope,
            sprites,
            ids,
        } => correct(&scope, &sprites, &ids),
    }
}

/// Clipboard bytes from a file holding either the raw buffer or its text form.
fn read_clipboard(path: &Path) -> Result<(Vec<u8>, bool)> {
    let raw = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    match std::str::from_utf8(&raw) {
        Ok(text) if text.trim_start().starts_with(CLIPBOARD_TEXT_TAG) => {
            let bytes = from_text(text).context("parse clipboard text")?;
            Ok((bytes, true))
        }
        _ => Ok((raw, false)),
    }
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(out) => {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(out, bytes).with_context(|| format!("write {}", out.display()))?;
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn write_clipboard(output: Option<&Path>, bytes: &[u8], text: bool) -> Result<()> {
    if text || output.is_none() {
        write_output(output, to_text(bytes).as_bytes())
    } else {
        write_output(output, bytes)
    }
}

fn load_sprites(index: &mut ContentHashIndex, scope: &str, dir: &Path) -> Result<usize> {
    SpriteStore::open(dir)
        .register_into(index, scope)
        .with_context(|| format!("register sprites from {}", dir.display()))
}

fn inspect(input: &Path) -> Result<()> {
    let (bytes, _) = read_clipboard(input)?;
    let Some(header) = ClipboardHeader::unpack(&bytes) else {
        bail!("{} is not a clipboard buffer", input.display());
    };
    println!("{}", serde_json::to_string_pretty(&header)?);
    Ok(())
}

fn encode(
    config: MigrationConfig,
    tiles_path: &Path,
    revision: &str,
    output: Option<&Path>,
    compress: bool,
    text: bool,
) -> Result<()> {
    let raw = fs::read_to_string(tiles_path)
        .with_context(|| format!("read {}", tiles_path.display()))?;
    let tiles: Vec<Tile> = serde_json::from_str(&raw).context("parse tiles")?;
    let mut context = MigrationContext::from_config(config);
    let bytes = context.cross.write(&tiles, revision, compress)?;
    info!(tiles = tiles.len(), bytes = bytes.len(), revision, "encoded clipboard");
    write_clipboard(output, &bytes, text)
}

fn decode(
    config: MigrationConfig,
    input: &Path,
    target: &str,
    mappings: Option<&Path>,
    output: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let mut context = MigrationContext::from_config(config);
    if let Some(path) = mappings {
        context
            .table
            .try_load_from_file(path)
            .with_context(|| format!("load mappings {}", path.display()))?;
    }
    let (bytes, _) = read_clipboard(input)?;
    let decoded = context
        .cross
        .read(&bytes, target, Some(&mut context.table))?;
    if !decoded.checksum_ok {
        if strict {
            bail!("clipboard checksum mismatch");
        }
        warn!("clipboard checksum mismatch, content may be corrupted");
    }
    info!(
        source = %decoded.source_revision,
        target,
        tiles = decoded.tiles.len(),
        translated = decoded.translation.is_some(),
        "decoded clipboard"
    );
    let json = serde_json::to_string_pretty(&decoded.tiles)?;
    write_output(output, json.as_bytes())
}

fn translate_id(id: ItemId, from: &str, to: &str, mappings: &Path) -> Result<()> {
    let mut table = VersionTable::new();
    table
        .try_load_from_file(mappings)
        .with_context(|| format!("load mappings {}", mappings.display()))?;
    println!("{}", table.translate_item(id, from, to));
    Ok(())
}

fn equivalent_pairs(index: &ContentHashIndex, scope_a: &str, scope_b: &str) -> Vec<EquivalentPair> {
    let mut sources: Vec<ItemId> = index
        .records()
        .filter(|record| record.key.scope == scope_a)
        .map(|record| record.key.asset_id)
        .collect();
    sources.sort_unstable();
    sources
        .into_iter()
        .filter_map(|source| {
            let mut targets: Vec<ItemId> = index
                .equivalents_of(scope_a, source)
                .into_iter()
                .filter(|key| key.scope == scope_b)
                .map(|key| key.asset_id)
                .collect();
            if targets.is_empty() {
                return None;
            }
            targets.sort_unstable();
            Some(EquivalentPair { source, targets })
        })
        .collect()
}

fn equivalents(scope_a: &str, sprites_a: &Path, scope_b: &str, sprites_b: &Path) -> Result<()> {
    let mut index = ContentHashIndex::new();
    load_sprites(&mut index, scope_a, sprites_a)?;
    load_sprites(&mut index, scope_b, sprites_b)?;
    let pairs = equivalent_pairs(&index, scope_a, scope_b);
    println!("{}", serde_json::to_string_pretty(&pairs)?);
    Ok(())
}

fn migrate(
    config: MigrationConfig,
    input: &Path,
    target: &str,
    source_sprites: &Path,
    target_sprites: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let compress = config.compress;
    let mut context = MigrationContext::from_config(config);
    let (bytes, was_text) = read_clipboard(input)?;
    let decoded = context.cross.read(&bytes, "", None)?;
    if !decoded.checksum_ok {
        warn!("clipboard checksum mismatch, content may be corrupted");
    }
    let source = decoded.source_revision;

    load_sprites(&mut context.index, &source, source_sprites)?;
    load_sprites(&mut context.index, target, target_sprites)?;
    let tiles = retarget_tiles(&mut context, &decoded.tiles, &source, target)?;

    let bytes = context.cross.write(&tiles, target, compress)?;
    info!(from = %source, to = target, tiles = tiles.len(), "migrated clipboard");
    write_clipboard(output, &bytes, was_text)
}

/// Re-pastes `tiles` for `target`, only ever swapping in ids that exist in
/// the target revision.
fn retarget_tiles(
    context: &mut MigrationContext,
    tiles: &[Tile],
    source: &str,
    target: &str,
) -> Result<Vec<Tile>> {
    context.clipboard.set_policy(CandidatePolicy::TargetScopeOnly);
    context.clipboard.copy(tiles, source)?;
    Ok(context.paste(target)?)
}

fn correct(scope: &str, sprites: &Path, ids: &[ItemId]) -> Result<()> {
    let mut index = ContentHashIndex::new();
    let registered = load_sprites(&mut index, scope, sprites)?;
    let ids: Vec<ItemId> = if ids.is_empty() {
        let mut all: Vec<ItemId> = index.records().map(|record| record.key.asset_id).collect();
        all.sort_unstable();
        all
    } else {
        ids.to_vec()
    };
    let mut corrector = IdCorrector::new(&index, scope);
    corrector.correct_batch(&ids);
    info!(scope, registered, checked = ids.len(), "checked sprite ids");
    println!("{}", corrector.report());
    Ok(())
}

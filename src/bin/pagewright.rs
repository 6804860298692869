use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

const DEFAULT_DOC: &str = "index.html";
const DEFAULT_ASSET: &str = "button-explanation-base64.txt";

#[derive(Parser, Debug)]
#[command(name = "pagewright", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Patch the document in place (the default when no subcommand is given).
    Apply(ApplyArgs),
    /// Patch in memory and print the per-rule report; fails if a required rule did not apply.
    Check(ApplyArgs),
    /// Print the built-in rule list as JSON.
    Rules(RulesArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Document to patch.
    #[arg(long, default_value = DEFAULT_DOC)]
    doc: PathBuf,

    /// Narration audio. Defaults to `button-explanation-base64.txt` next to the document; a
    /// missing file disables narration with a warning.
    #[arg(long)]
    asset: Option<PathBuf>,

    /// Treat the asset as raw audio bytes instead of base64 text.
    #[arg(long)]
    asset_raw: bool,

    /// JSON rule list to run instead of the built-in recipe.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Fail when a required rule matches nothing.
    #[arg(long)]
    strict: bool,

    /// How intercepted links are matched to descriptions.
    #[arg(long, value_enum, default_value_t = LinkMatchChoice::Normalized)]
    link_match: LinkMatchChoice,

    /// Write here instead of overwriting the document.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Do not write anything.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct RulesArgs {
    #[arg(long, value_enum, default_value_t = LinkMatchChoice::Normalized)]
    link_match: LinkMatchChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LinkMatchChoice {
    Normalized,
    Containment,
}

impl From<LinkMatchChoice> for pagewright::LinkMatch {
    fn from(c: LinkMatchChoice) -> Self {
        match c {
            LinkMatchChoice::Normalized => pagewright::LinkMatch::Normalized,
            LinkMatchChoice::Containment => pagewright::LinkMatch::Containment,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        None => cmd_apply(ApplyArgs::parse_from(["apply"])),
        Some(Command::Apply(args)) => cmd_apply(args),
        Some(Command::Check(args)) => cmd_check(args),
        Some(Command::Rules(args)) => cmd_rules(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_rules(args: &ApplyArgs) -> anyhow::Result<Vec<pagewright::PatchRule>> {
    match &args.rules {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read rules '{}'", path.display()))?;
            let rules = pagewright::rules_from_json(&s)
                .with_context(|| format!("parse rules '{}'", path.display()))?;
            Ok(rules)
        }
        None => Ok(pagewright::TrainingRecipe::new(args.link_match.into()).rules()?),
    }
}

fn load_asset(args: &ApplyArgs) -> anyhow::Result<Option<pagewright::AssetPayload>> {
    let path = match &args.asset {
        Some(p) => p.clone(),
        None => doc_dir(&args.doc).join(DEFAULT_ASSET),
    };
    if !path.exists() {
        if args.asset.is_some() {
            tracing::warn!(path = %path.display(), "asset does not exist, audio disabled");
        } else {
            tracing::info!(path = %path.display(), "no narration asset, audio disabled");
        }
        return Ok(None);
    }

    let asset = if args.asset_raw {
        let bytes =
            std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;
        pagewright::AssetPayload::from_bytes(bytes)
    } else {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read asset '{}'", path.display()))?;
        pagewright::AssetPayload::from_encoded_text(&text)
            .with_context(|| format!("decode asset '{}'", path.display()))?
    };
    tracing::info!(chars = asset.inline_len(), "loaded narration asset");
    Ok(Some(asset))
}

fn doc_dir(doc: &Path) -> &Path {
    doc.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn run(args: &ApplyArgs) -> anyhow::Result<pagewright::PatchReport> {
    let html = std::fs::read_to_string(&args.doc)
        .with_context(|| format!("read document '{}'", args.doc.display()))?;
    let rules = load_rules(args)?;
    let ctx = pagewright::PatchContext {
        asset: load_asset(args)?,
    };
    let opts = pagewright::PatchOptions {
        strictness: if args.strict {
            pagewright::Strictness::Strict
        } else {
            pagewright::Strictness::Lenient
        },
    };
    Ok(pagewright::apply_patches(&html, &rules, &ctx, opts)?)
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let report = run(&args)?;

    for w in &report.warnings {
        eprintln!("warning: {w}");
    }

    if args.dry_run {
        eprintln!("dry run, nothing written");
        return Ok(());
    }

    let out = args.out.as_ref().unwrap_or(&args.doc);
    std::fs::write(out, &report.document)
        .with_context(|| format!("write document '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_check(args: ApplyArgs) -> anyhow::Result<()> {
    let report = run(&args)?;
    println!("{}", serde_json::to_string_pretty(&report.outcomes)?);

    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    if !failed.is_empty() {
        anyhow::bail!("required rules did not apply: {}", failed.join(", "));
    }
    Ok(())
}

fn cmd_rules(args: RulesArgs) -> anyhow::Result<()> {
    let rules = pagewright::TrainingRecipe::new(args.link_match.into()).rules()?;
    println!("{}", pagewright::rules_to_json(&rules)?);
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::filters::{CatalogFilter, content_preview};
use crate::models::{CatalogStats, FileEvent, ProjectCatalog, ProjectInfo, VersionChain};
use crate::recovery::{FileRecovery, Layout, RecoveryResult, plan_recovery};
use crate::scanner::{
    CatalogBuilder, build_catalog, build_catalog_with_root, discover_projects, find_project,
};
use crate::utils::{
    format_path_with_tilde, format_size, get_claude_dir, sanitize_line, strip_ansi_codes,
};

const DEFAULT_PREVIEW_CHARS: &str = "37";
const CONVERSATION_ID_CHARS: usize = 8;
const MAX_DISPLAY_PATH: usize = 60;

#[derive(Parser)]
#[command(name = "claude-file-recovery")]
#[command(version)]
#[command(about = "Recover files from Claude Code conversation logs", long_about = None)]
pub struct Cli {
    /// Path to the .claude directory (default: ~/.claude)
    #[arg(long, global = true, value_name = "DIR")]
    pub claude_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects and their recoverable files
    Projects,

    /// List the recoverable files of one project
    Scan {
        /// Project name (or unique part of it)
        project: String,

        /// Only show files of this type (Python, Markdown, ...)
        #[arg(long = "type", short = 't', value_name = "CATEGORY")]
        file_type: Option<String>,

        /// Maximum number of files to list
        #[arg(long, short = 'l', default_value_t = 50)]
        limit: usize,

        /// Show the first line of each file, cut to N characters
        #[arg(long, short = 'p', value_name = "N", num_args = 0..=1, default_missing_value = DEFAULT_PREVIEW_CHARS)]
        preview: Option<usize>,

        /// Project root used to make absolute paths relative
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Print the content of one file version
    Show {
        project: String,

        /// File path as listed by `scan`
        path: String,

        /// Version index, 0 being the oldest (default: current)
        #[arg(long, value_name = "N")]
        version: Option<usize>,
    },

    /// Write recoverable files to disk
    Recover {
        project: String,

        /// Directory to recover files into
        #[arg(long, short = 't', value_name = "DIR", default_value = "./recovered-files")]
        target: PathBuf,

        /// Put every file directly in the target directory
        #[arg(long)]
        flat: bool,

        /// Overwrite existing files
        #[arg(long, short = 'f')]
        force: bool,

        /// Don't create .backup copies of overwritten files
        #[arg(long)]
        no_backups: bool,

        /// Show what would be written without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Only recover files of this type
        #[arg(long = "type", value_name = "CATEGORY")]
        file_type: Option<String>,

        /// Recover version N of each file instead of the current one
        #[arg(long, value_name = "N")]
        version: Option<usize>,

        /// Project root used to make absolute paths relative
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let claude_dir = match cli.claude_dir {
        Some(dir) => dir,
        None => get_claude_dir()?,
    };

    match cli.command {
        Some(Commands::Projects) => list_projects(&claude_dir),
        Some(Commands::Scan { project, file_type, limit, preview, root }) => {
            scan_project(&claude_dir, &project, file_type, limit, preview, root)
        }
        Some(Commands::Show { project, path, version }) => {
            show_file(&claude_dir, &project, &path, version)
        }
        Some(Commands::Recover {
            project,
            target,
            flat,
            force,
            no_backups,
            dry_run,
            file_type,
            version,
            root,
        }) => {
            let options = RecoverOptions {
                target,
                layout: if flat { Layout::Flat } else { Layout::Preserve },
                recovery: FileRecovery::new(!no_backups, force),
                dry_run,
                file_type,
                version,
            };
            recover_project(&claude_dir, &project, root, &options)
        }
        None => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

fn list_projects(claude_dir: &Path) -> Result<()> {
    let projects = discover_projects(claude_dir)?;

    if projects.is_empty() {
        println!("No Claude Code projects found");
        println!("Looked in: {}", format_path_with_tilde(&claude_dir.join("projects")));
        return Ok(());
    }

    println!("Claude Code Projects");
    println!("====================");
    println!(
        "{:<30} {:>5} {:>6}  {:<36} {:>8}  {}",
        "Project", "Logs", "Files", "Types", "Size", "Last Activity"
    );

    for project in &projects {
        let catalog = project_summary(project);
        let stats = catalog.stats();
        let last_activity = stats
            .latest_activity
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Never".to_string());

        println!(
            "{:<30} {:>5} {:>6}  {:<36} {:>8}  {}",
            sanitize_line(&project.name),
            project.log_files.len(),
            stats.total_files,
            stats.category_breakdown(3),
            format_size(stats.total_size_bytes),
            last_activity
        );
    }

    println!();
    println!("Use 'claude-file-recovery scan <project>' to see recoverable files");
    Ok(())
}

/// Catalog of every readable log of a project; unreadable logs are warned about and skipped
fn project_summary(project: &ProjectInfo) -> ProjectCatalog {
    let mut builder = CatalogBuilder::new(&project.name, project.root.clone());
    for log_file in &project.log_files {
        if let Err(e) = builder.add_log_file(log_file) {
            warn!(project = %project.name, "Skipping unreadable log: {}", e);
        }
    }
    builder.finish()
}

/// Resolve a project query and build its catalog, honoring a `--root` override
fn load_catalog(
    claude_dir: &Path,
    query: &str,
    root: Option<PathBuf>,
) -> Result<(ProjectInfo, ProjectCatalog)> {
    let projects = discover_projects(claude_dir)?;
    let project = find_project(&projects, query)?.clone();
    let catalog = match root {
        Some(root) => build_catalog_with_root(&project, Some(root))?,
        None => build_catalog(&project)?,
    };
    Ok((project, catalog))
}

fn category_filter(file_type: Option<String>) -> CatalogFilter {
    match file_type {
        Some(name) => CatalogFilter::new().with_category(name),
        None => CatalogFilter::new(),
    }
}

fn scan_project(
    claude_dir: &Path,
    query: &str,
    file_type: Option<String>,
    limit: usize,
    preview: Option<usize>,
    root: Option<PathBuf>,
) -> Result<()> {
    let (project, catalog) = load_catalog(claude_dir, query, root)?;
    let filter = category_filter(file_type.clone());
    let files = filter.apply(&catalog);

    println!("Scanning {} for recoverable files", strip_ansi_codes(&project.name));
    println!();

    if files.is_empty() {
        match file_type {
            Some(name) => println!("No {} files found in this project", strip_ansi_codes(&name)),
            None => println!("No recoverable files found in this project"),
        }
        return Ok(());
    }

    print_summary(&files);

    print!("{:>3}  {:<50} {:<16} {:<9} {:>8}", "#", "File", "Type", "Operation", "Size");
    if preview.is_some() {
        print!("  {:<40}", "Preview");
    }
    println!("  {:<16}  {}", "Date", "Conversation");

    for (i, chain) in files.iter().take(limit).enumerate() {
        let current = chain.current();
        let file_type = if chain.has_history() {
            format!("{} ({}v)", chain.category(), chain.version_count())
        } else {
            chain.category().to_string()
        };

        print!(
            "{:>3}  {:<50} {:<16} {:<9} {:>8}",
            i + 1,
            shorten_for_display(&sanitize_line(&current.display_path())),
            file_type,
            current.kind,
            format_size(current.size_bytes())
        );
        if let Some(max_chars) = preview {
            print!("  {:<40}", content_preview(&current.content, max_chars));
        }
        println!("  {:<16}  {}", format_timestamp(current), short_conversation_id(current));
    }

    if files.len() > limit {
        println!("... and {} more files", files.len() - limit);
    }

    println!();
    println!("Use 'claude-file-recovery recover <project>' to recover files");
    Ok(())
}

/// Totals over the files a scan shows, which may be a filtered subset of the catalog
fn summary_stats(files: &[&VersionChain]) -> CatalogStats {
    let mut stats = CatalogStats::default();
    for chain in files {
        stats.add_chain(chain);
    }
    stats
}

fn print_summary(files: &[&VersionChain]) {
    let stats = summary_stats(files);

    println!(
        "Found {} recoverable files ({} total)",
        stats.total_files,
        format_size(stats.total_size_bytes)
    );
    println!("File types: {}", stats.category_breakdown(3));
    if stats.multi_version_files > 0 {
        println!("{} files have multiple versions", stats.multi_version_files);
    }
    println!();
}

fn show_file(claude_dir: &Path, query: &str, path: &str, version: Option<usize>) -> Result<()> {
    let (_, catalog) = load_catalog(claude_dir, query, None)?;
    let chain = find_chain(&catalog, path)?;

    let event = match version {
        Some(index) => match chain.version(index) {
            Some(event) => event,
            None => bail!(
                "{} has {} versions (0..={})",
                strip_ansi_codes(chain.path()),
                chain.version_count(),
                chain.version_count() - 1
            ),
        },
        None => chain.current(),
    };

    print!("{}", event.content);
    if !event.content.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Exact path match first, then a unique path suffix
fn find_chain<'a>(catalog: &'a ProjectCatalog, path: &str) -> Result<&'a VersionChain> {
    if let Some(chain) = catalog.get(path) {
        return Ok(chain);
    }

    let matches: Vec<&VersionChain> =
        catalog.files().iter().filter(|c| c.path().ends_with(path)).collect();
    match matches.as_slice() {
        [chain] => Ok(chain),
        [] => bail!("No recoverable file matches: {}", strip_ansi_codes(path)),
        _ => bail!(
            "{} files match {}; use the full path",
            matches.len(),
            strip_ansi_codes(path)
        ),
    }
}

struct RecoverOptions {
    target: PathBuf,
    layout: Layout,
    recovery: FileRecovery,
    dry_run: bool,
    file_type: Option<String>,
    version: Option<usize>,
}

fn recover_project(
    claude_dir: &Path,
    query: &str,
    root: Option<PathBuf>,
    options: &RecoverOptions,
) -> Result<()> {
    let (project, catalog) = load_catalog(claude_dir, query, root.clone())?;
    let chains = category_filter(options.file_type.clone()).apply(&catalog);

    let events: Vec<&FileEvent> = chains
        .iter()
        .filter_map(|chain| match options.version {
            Some(index) => chain.version(index),
            None => Some(chain.current()),
        })
        .collect();

    if events.is_empty() {
        println!("No files to recover");
        return Ok(());
    }

    let root = root.or(project.root);
    let target_dir = Some(options.target.as_path());

    if options.dry_run {
        let plan = plan_recovery(events.iter().copied(), target_dir, root.as_deref(), options.layout);
        println!("Recovery preview:");
        for planned in &plan {
            let status = if planned.exists { "OVERWRITE" } else { "NEW" };
            println!(
                "{:<9} {} ({})",
                status,
                sanitize_line(&planned.target_path.display().to_string()),
                format_size(planned.size_bytes)
            );
        }
        println!();
        println!("Total files: {}", plan.len());
        println!("Total size: {}", format_size(plan.iter().map(|p| p.size_bytes).sum()));
        return Ok(());
    }

    let results = options.recovery.recover_files(
        events.iter().copied(),
        target_dir,
        root.as_deref(),
        options.layout,
    );
    print_report(&results, &options.target);
    Ok(())
}

fn print_report(results: &[RecoveryResult], target: &Path) {
    let recovered = results.iter().filter(|r| r.success).count();
    let backups = results.iter().filter(|r| r.backup_created()).count();

    for result in results.iter().filter(|r| !r.success) {
        println!(
            "Not recovered: {} ({})",
            sanitize_line(&result.target_path.display().to_string()),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    println!("Recovered {} of {} files into {}", recovered, results.len(), format_path_with_tilde(target));
    if backups > 0 {
        println!("Created {} backup files", backups);
    }
}

fn format_timestamp(event: &FileEvent) -> String {
    event
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn short_conversation_id(event: &FileEvent) -> String {
    let id = sanitize_line(&event.conversation_id);
    if id.chars().count() > CONVERSATION_ID_CHARS {
        format!("{}...", id.chars().take(CONVERSATION_ID_CHARS).collect::<String>())
    } else {
        id
    }
}

/// Keep long paths inside the table: `...<tail of parent>/<file name>`
fn shorten_for_display(path: &str) -> String {
    if path.chars().count() <= MAX_DISPLAY_PATH {
        return path.to_string();
    }

    let (parent, file_name) = match path.rsplit_once('/') {
        Some((parent, file_name)) => (parent, file_name),
        None => return path.to_string(),
    };
    let tail: String = {
        let chars: Vec<char> = parent.chars().collect();
        chars[chars.len().saturating_sub(30)..].iter().collect()
    };
    format!("...{}/{}", tail, file_name)
}

use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::io::logging::{LogTarget, init_logging};
use crate::io::page_io::{self, StoreError, resolve_data_dir};
use crate::model::config::AppConfig;
use crate::model::page::{PAGE_COUNT, Page, PageEvent, ROWS_PER_PAGE};
use crate::model::row::{LEVEL_COUNT, LevelInputError};

/// Error type for command-line operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no page {0} (pages are 1-{max})", max = PAGE_COUNT)]
    NoSuchPage(usize),
    #[error("no row {0} (rows are 1-{max})", max = ROWS_PER_PAGE)]
    NoSuchRow(usize),
    #[error("no level {0} (levels are 1-{max})", max = LEVEL_COUNT)]
    NoSuchLevel(usize),
    #[error("level value rejected: {0}")]
    Rejected(#[from] LevelInputError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything a command needs: where the pages live and how they default
struct Context {
    data_dir: PathBuf,
    config: AppConfig,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    init_logging(&LogTarget::Stderr)?;
    let config = config_io::read_config(&data_dir)?;
    let ctx = Context {
        data_dir,
        config,
        json: cli.json,
    };

    // No subcommand launches the TUI from main.rs
    let Some(cmd) = cli.command else {
        return Ok(());
    };
    let result = match cmd {
        Commands::Show(args) => cmd_show(&ctx, args),
        Commands::Title(args) => cmd_title(&ctx, args),
        Commands::Task(args) => cmd_task(&ctx, args),
        Commands::Level(args) => cmd_level(&ctx, args),
        Commands::Inc(args) => cmd_step(&ctx, args, Step::Up),
        Commands::Dec(args) => cmd_step(&ctx, args, Step::Down),
    };
    Ok(result?)
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Convert a 1-based number into an index below `count`
fn one_based(n: usize, count: usize) -> Option<usize> {
    (1..=count).contains(&n).then(|| n - 1)
}

fn page_index(n: usize) -> Result<usize, CliError> {
    one_based(n, PAGE_COUNT).ok_or(CliError::NoSuchPage(n))
}

fn row_index(n: usize) -> Result<usize, CliError> {
    one_based(n, ROWS_PER_PAGE).ok_or(CliError::NoSuchRow(n))
}

fn level_index(n: usize) -> Result<usize, CliError> {
    one_based(n, LEVEL_COUNT).ok_or(CliError::NoSuchLevel(n))
}

fn load(ctx: &Context, index: usize) -> Page {
    let mut page = Page::new(index, ctx.config.page_title(index));
    page_io::load_page(&ctx.data_dir, &mut page);
    page
}

fn print_pages(ctx: &Context, pages: &[Page]) {
    if ctx.json {
        let out: Vec<PageJson> = pages.iter().map(page_to_json).collect();
        // A single page prints as an object, several as an array
        let text = match out.as_slice() {
            [one] => serde_json::to_string_pretty(one),
            _ => serde_json::to_string_pretty(&out),
        };
        println!("{}", text.unwrap_or_default());
    } else {
        let blocks: Vec<String> = pages.iter().map(format_page).collect();
        println!("{}", blocks.join("\n\n"));
    }
}

/// Run the shift for a row that just completed, then persist and print
fn finish_edit(ctx: &Context, page: &mut Page, event: Option<PageEvent>) -> Result<(), CliError> {
    if let Some(PageEvent::RowReady(k)) = event {
        page.complete_row(k);
        tracing::info!(page = %page.id(), row = k, "row complete, shifted rows up");
        if !ctx.json {
            println!("Row {} complete: cleared and shifted up", k + 1);
        }
    }
    page_io::save_page(&ctx.data_dir, page)?;
    print_pages(ctx, std::slice::from_ref(page));
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &Context, args: ShowArgs) -> Result<(), CliError> {
    let pages = match args.page {
        Some(n) => vec![load(ctx, page_index(n)?)],
        None => (0..PAGE_COUNT).map(|i| load(ctx, i)).collect(),
    };
    print_pages(ctx, &pages);
    Ok(())
}

fn cmd_title(ctx: &Context, args: TitleArgs) -> Result<(), CliError> {
    let mut page = load(ctx, page_index(args.page)?);
    page.set_title(args.text);
    finish_edit(ctx, &mut page, None)
}

fn cmd_task(ctx: &Context, args: TaskArgs) -> Result<(), CliError> {
    let mut page = load(ctx, page_index(args.page)?);
    page.set_task(row_index(args.row)?, args.text);
    finish_edit(ctx, &mut page, None)
}

fn cmd_level(ctx: &Context, args: LevelArgs) -> Result<(), CliError> {
    let mut page = load(ctx, page_index(args.page)?);
    let row = row_index(args.row)?;
    let level = level_index(args.level)?;
    let event = page.enter_level_text(row, level, &args.value)?;
    finish_edit(ctx, &mut page, event)
}

enum Step {
    Up,
    Down,
}

fn cmd_step(ctx: &Context, args: StepArgs, step: Step) -> Result<(), CliError> {
    let mut page = load(ctx, page_index(args.page)?);
    let row = row_index(args.row)?;
    let level = level_index(args.level)?;
    let event = match step {
        Step::Up => page.increment(row, level),
        Step::Down => page.decrement(row, level),
    };
    finish_edit(ctx, &mut page, event)
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use sidediff::commands;
use sidediff::diff::text::{CompareType, DiffOptions};
use sidediff::dirdiff::file_compare::{DEFAULT_TIME_PRECISION_SECS, DirFileMode};
use sidediff::dirdiff::file_filter::FileFilter;
use sidediff::dirdiff::walker::DirDiffOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sidediff",
    version = "0.1.0",
    about = "Compare files, text, and directory trees",
    long_about = "Compares two files or two directory trees and reports the \
    minimal set of changes between them. File comparison picks a text, XML, \
    or binary strategy per input pair; directory comparison walks both trees \
    and flags added, removed, and modified entries.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "files",
        about = "Compare two files",
        long_about = "This command compares two files and prints the edit runs \
        transforming the left file into the right one, plus a similarity summary."
    )]
    Files {
        #[arg(index = 1, help = "The left file")]
        left: PathBuf,
        #[arg(index = 2, help = "The right file")]
        right: PathBuf,
        #[arg(long, default_value = "auto", help = "Compare strategy: auto, text, xml or binary")]
        mode: String,
        #[arg(long, help = "Ignore case when comparing lines")]
        ignore_case: bool,
        #[arg(long, help = "Ignore leading and trailing whitespace when comparing lines")]
        ignore_whitespace: bool,
        #[arg(long, help = "Strip insignificant whitespace when comparing XML")]
        ignore_xml_whitespace: bool,
        #[arg(long, help = "Report changed lines as separate deletes and inserts")]
        no_change_grouping: bool,
        #[arg(long, default_value_t = 8, help = "Block granularity for binary comparison")]
        footprint: usize,
        #[arg(long, default_value_t = 4, help = "Spaces per tab stop for display widths")]
        tab_width: usize,
    },
    #[command(
        name = "dirs",
        about = "Compare two directory trees",
        long_about = "This command walks two directory trees in lockstep and \
        reports entries that exist on one side only or whose files fail the \
        selected equality checks."
    )]
    Dirs {
        #[arg(index = 1, help = "The left directory")]
        left: PathBuf,
        #[arg(index = 2, help = "The right directory")]
        right: PathBuf,
        #[arg(long, help = "Compare only the top level, without recursing")]
        flat: bool,
        #[arg(long, help = "File masks to compare, e.g. \"*.rs;*.toml\"")]
        filter: Option<String>,
        #[arg(long, requires = "filter", help = "Treat the filter as an exclusion")]
        exclude: bool,
        #[arg(
            long,
            default_value = "bytes",
            help = "Equality checks to run, comma separated: length, time, bytes"
        )]
        check: String,
        #[arg(long, help = "Tolerate differing line-ending bytes during the byte check")]
        ignore_eol: bool,
        #[arg(
            long,
            default_value_t = DEFAULT_TIME_PRECISION_SECS,
            help = "Tolerance window in seconds for the time check"
        )]
        precision: f64,
        #[arg(long, help = "Hide entries that exist on the left side only")]
        hide_left_only: bool,
        #[arg(long, help = "Hide entries that exist on the right side only")]
        hide_right_only: bool,
        #[arg(long, help = "Also list files that are the same on both sides")]
        show_same: bool,
        #[arg(long, help = "Never flag directories, only individual files")]
        ignore_dir_compare: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut writer = std::io::stdout();

    let different = match &cli.command {
        Commands::Files {
            left,
            right,
            mode,
            ignore_case,
            ignore_whitespace,
            ignore_xml_whitespace,
            no_change_grouping,
            footprint,
            tab_width,
        } => {
            let compare_type = CompareType::try_parse(mode)
                .ok_or_else(|| anyhow::anyhow!("Invalid compare mode: {}", mode))?;
            let options = DiffOptions {
                compare_type,
                ignore_case: *ignore_case,
                ignore_text_whitespace: *ignore_whitespace,
                ignore_xml_whitespace: *ignore_xml_whitespace,
                show_change_as_delete_insert: *no_change_grouping,
                binary_footprint_length: *footprint,
                spaces_per_tab: *tab_width,
            };

            commands::files::run(&mut writer, left, right, &options)?
        }
        Commands::Dirs {
            left,
            right,
            flat,
            filter,
            exclude,
            check,
            ignore_eol,
            precision,
            hide_left_only,
            hide_right_only,
            show_same,
            ignore_dir_compare,
        } => {
            let mut file_mode = DirFileMode::try_parse(check)
                .ok_or_else(|| anyhow::anyhow!("Invalid check list: {}", check))?;
            if *ignore_eol {
                file_mode |= DirFileMode::IGNORE_EOL;
            }

            let file_filter = filter
                .as_deref()
                .map(|pattern| FileFilter::new(pattern, !exclude))
                .transpose()?;

            let options = DirDiffOptions {
                recursive: !flat,
                show_only_in_a: !hide_left_only,
                show_only_in_b: !hide_right_only,
                show_different: true,
                show_same: *show_same,
                ignore_directory_comparison: *ignore_dir_compare,
                file_filter,
                file_mode,
                time_precision_secs: *precision,
            };

            commands::dirs::run(&mut writer, left, right, &options)?
        }
    };

    if different {
        std::process::exit(1);
    }

    Ok(())
}

//! Command-line front end for the deduku solving engine.
//!
//! Loads one puzzle from a file, runs the technique catalog over it,
//! prints the resulting board, and reports whether the puzzle was
//! resolved. Individual techniques can be switched off to probe what a
//! puzzle actually requires; `RUST_LOG=debug` prints every deduction
//! the solver makes.

use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use deduku_core::{Field, ParseFieldError};
use deduku_solver::{
    Resolution, Resolver,
    technique::{
        BiLocationColoring, HiddenGroup, HiddenSingle, Intersections, NakedGroup, NakedSingle,
        UniqueRectangle, XWing, XyzWing, YWing,
    },
};

#[derive(Debug, Parser)]
#[command(
    name = "deduku",
    version,
    about = "Human-style solver for 9x9, 16x16, and 25x25 sudoku puzzles"
)]
struct Cli {
    /// The puzzle file to open.
    file: PathBuf,

    /// The 1-based number of the puzzle to solve within the file;
    /// clamped to the last puzzle present.
    #[arg(default_value_t = 1)]
    puzzle: usize,

    /// Read the file as one formatted N×N block instead of one puzzle
    /// per line.
    #[arg(long)]
    formatted: bool,

    /// Disable the Hidden Single technique.
    #[arg(long)]
    no_hidden_single: bool,

    /// Disable the Naked Group technique.
    #[arg(long)]
    no_naked_group: bool,

    /// Disable the Hidden Group technique.
    #[arg(long)]
    no_hidden_group: bool,

    /// Disable the Intersections technique.
    #[arg(long)]
    no_intersections: bool,

    /// Disable the Bi-Location Coloring technique.
    #[arg(long)]
    no_bi_location_coloring: bool,

    /// Disable the X-Wing technique.
    #[arg(long)]
    no_xwing: bool,

    /// Disable the Y-Wing technique.
    #[arg(long)]
    no_ywing: bool,

    /// Disable the XYZ-Wing technique.
    #[arg(long)]
    no_xyzwing: bool,

    /// Disable the Unique Rectangle technique.
    #[arg(long)]
    no_unique_rectangle: bool,

    /// Let Bi-Location Coloring also place values on the surviving
    /// color instead of only removing candidates.
    #[arg(long)]
    color_placements: bool,
}

/// Picks the requested puzzle line from a plain-format file: comment
/// and blank lines are skipped, and an out-of-range number clamps to
/// the last puzzle.
fn select_plain_line(text: &str, puzzle: usize) -> Option<&str> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    if lines.is_empty() {
        return None;
    }
    let index = puzzle.clamp(1, lines.len());
    Some(lines[index - 1])
}

fn load_field(cli: &Cli) -> Result<Field, String> {
    let text = fs::read_to_string(&cli.file)
        .map_err(|error| format!("unable to open {}: {error}", cli.file.display()))?;

    let parsed: Result<Field, ParseFieldError> = if cli.formatted {
        Field::from_formatted_lines(&text)
    } else {
        let line = select_plain_line(&text, cli.puzzle)
            .ok_or_else(|| format!("{} contains no puzzles", cli.file.display()))?;
        Field::from_plain_line(line)
    };
    parsed.map_err(|error| format!("bad puzzle in {}: {error}", cli.file.display()))
}

fn build_resolver(field: Field, cli: &Cli) -> Resolver {
    let mut resolver = Resolver::new(field);
    resolver.register(Box::new(NakedSingle));
    resolver.register(Box::new(HiddenSingle));
    resolver.register(Box::new(NakedGroup));
    resolver.register(Box::new(HiddenGroup));
    resolver.register(Box::new(Intersections));
    resolver.register(Box::new(BiLocationColoring::with_placements(
        cli.color_placements,
    )));
    resolver.register(Box::new(XWing));
    resolver.register(Box::new(YWing));
    resolver.register(Box::new(XyzWing));
    resolver.register(Box::new(UniqueRectangle));

    for (name, disabled) in [
        ("hidden single", cli.no_hidden_single),
        ("naked group", cli.no_naked_group),
        ("hidden group", cli.no_hidden_group),
        ("intersections", cli.no_intersections),
        ("bi-location coloring", cli.no_bi_location_coloring),
        ("x-wing", cli.no_xwing),
        ("y-wing", cli.no_ywing),
        ("xyz-wing", cli.no_xyzwing),
        ("unique rectangle", cli.no_unique_rectangle),
    ] {
        if disabled
            && let Some(technique) = resolver.technique_mut(name)
        {
            technique.set_enabled(false);
        }
    }
    resolver
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return ExitCode::from(1);
        }
    };

    let field = match load_field(&cli) {
        Ok(field) => field,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(1);
        }
    };
    if !field.is_valid() {
        eprintln!("invalid sudoku read");
        return ExitCode::from(1);
    }

    let mut resolver = build_resolver(field, &cli);
    let resolution = resolver.resolve();

    print!("{}", resolver.field());
    let status = match resolution {
        Resolution::Solved => "resolved",
        Resolution::Stuck => "NOT resolved",
        Resolution::Invalid => "INVALID",
    };
    println!(
        "{}[{}] done in {} ms and is {status}",
        cli.file.display(),
        cli.puzzle,
        resolver.resolve_time().as_millis()
    );

    ExitCode::SUCCESS
}

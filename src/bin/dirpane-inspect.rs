//! Developer utility that materializes a directory and prints the tree rows.

use std::path::PathBuf;

use dirpane::{DirTree, DirTreeController, LocalFs, NullView, TreeOptions, TreeRow, config, logging};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug)]
struct CliOptions {
    path: PathBuf,
    show_hidden: bool,
    refresh: bool,
    log: bool,
}

fn run() -> Result<(), String> {
    let Some(cli) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if cli.log
        && let Err(err) = logging::init()
    {
        eprintln!("Logging disabled: {err}");
    }
    let mut options = config::load_or_default().unwrap_or_else(|err| {
        eprintln!("Using default options: {err}");
        TreeOptions::default()
    });
    if cli.show_hidden {
        options.show_hidden_files = true;
    }

    let path = std::path::absolute(&cli.path).map_err(|err| err.to_string())?;
    let tree = DirTree::new(LocalFs, NullView, options);
    let mut controller = DirTreeController::new(tree);
    if !controller.set_path(&path) {
        return Err(format!("Unable to open {}", path.display()));
    }
    if cli.refresh {
        controller.refresh();
    }
    for row in controller.tree().rows() {
        println!("{}", format_row(&row));
    }
    Ok(())
}

fn format_row(row: &TreeRow) -> String {
    let marker = match (row.has_children, row.expanded) {
        (true, true) => "[-]",
        (true, false) => "[+]",
        (false, _) => "   ",
    };
    let selected = if row.selected { " *" } else { "" };
    format!("{}{marker} {}{selected}", "  ".repeat(row.depth), row.name)
}

fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut path: Option<PathBuf> = None;
    let mut show_hidden = false;
    let mut refresh = false;
    let mut log = false;
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--hidden" => show_hidden = true,
            "--refresh" => refresh = true,
            "--log" => log = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            value => {
                if path.is_some() {
                    return Err(format!("Unexpected argument: {value}\n\n{}", help_text()));
                }
                path = Some(PathBuf::from(value));
            }
        }
    }
    let Some(path) = path else {
        return Err(format!("A directory path is required\n\n{}", help_text()));
    };
    Ok(Some(CliOptions {
        path,
        show_hidden,
        refresh,
        log,
    }))
}

fn help_text() -> String {
    [
        "dirpane-inspect",
        "",
        "Usage:",
        "  dirpane-inspect [--hidden] [--refresh] [--log] <directory>",
        "",
        "Options:",
        "  --hidden   Show entries whose name starts with a dot",
        "  --refresh  Re-read every directory on the path after opening it",
        "  --log      Write tracing output to stderr and the log directory",
    ]
    .join("\n")
}

//! Flag surface (spec §6), grounded in `acorngo/src/main.go`'s hand-rolled
//! argv loop rather than a `clap` derive: the dynamic `--ecma<N>` /
//! `--ecma<YEAR>` flag shape (`^--ecma(\d+)$` in the Go port) isn't
//! expressible as a fixed derive field, so every flag here is matched the
//! same way acorn's `createOptionsFromArgs` does it.

use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct Cli {
    pub ecma_version: Option<u32>,
    pub module: bool,
    pub locations: bool,
    pub allow_hash_bang: bool,
    pub allow_await_outside_function: bool,
    pub allow_reserved_never: bool,
    pub tokenize: bool,
    pub compact: bool,
    pub silent: bool,
    pub files: Vec<PathBuf>,
}

pub enum ArgError {
    Help(String),
    Message(String),
}

pub fn usage() -> String {
    "usage: ecma-cli [options] [file ...]\n\
     \n\
     --ecma<N>                  ecmaVersion as an edition (e.g. --ecma6)\n\
     --ecma<YEAR>                ecmaVersion as a year (e.g. --ecma2020)\n\
     --module                    parse as an ES module (sourceType: module)\n\
     --locations                 attach line/column locations to every node\n\
     --allow-hash-bang            allow a leading `#!` shebang line\n\
     --allow-await-outside-function  allow top-level `await`\n\
     --allow-reserved-never       reject reserved words even as property names\n\
     --tokenize                  print the token stream instead of parsing\n\
     --compact                   print JSON without indentation\n\
     --silent                    suppress JSON output, print only diagnostics\n\
     --help                      print this message\n\
     --                          treat every remaining argument as a file path\n\
     \n\
     With no files (or a lone `-`), reads a single program from stdin."
        .to_string()
}

pub fn parse_args(argv: Vec<String>) -> Result<Cli, ArgError> {
    let mut cli = Cli::default();
    let mut files_only = false;
    let mut iter = argv.into_iter();

    while let Some(arg) = iter.next() {
        if files_only {
            cli.files.push(PathBuf::from(arg));
            continue;
        }
        match arg.as_str() {
            "--" => files_only = true,
            "--help" | "-h" => return Err(ArgError::Help(usage())),
            "--module" => cli.module = true,
            "--locations" => cli.locations = true,
            "--allow-hash-bang" => cli.allow_hash_bang = true,
            "--allow-await-outside-function" => cli.allow_await_outside_function = true,
            "--allow-reserved-never" => cli.allow_reserved_never = true,
            "--tokenize" => cli.tokenize = true,
            "--compact" => cli.compact = true,
            "--silent" => cli.silent = true,
            "-" => cli.files.push(PathBuf::from("-")),
            other if other.starts_with("--ecma") => {
                let digits = &other["--ecma".len()..];
                let version: u32 = digits
                    .parse()
                    .map_err(|_| ArgError::Message(format!("unrecognized option '{other}'")))?;
                cli.ecma_version = Some(version);
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(ArgError::Message(format!("unrecognized option '{other}'")));
            }
            other => cli.files.push(PathBuf::from(other)),
        }
    }

    Ok(cli)
}

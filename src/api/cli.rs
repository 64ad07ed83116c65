use clap::{Parser, Subcommand};

pub struct Cli;

impl Cli {
    pub fn run(&self) -> CliProgram {
        CliProgram::parse()
    }
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliProgram {
    #[arg(short, long, global = true, help = "Log every request (RUST_LOG overrides)")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    #[command(about = "Add Khan Academy links to the descriptions of uploaded videos in the topic tree")]
    Links {
        #[arg(
            short = 'n',
            long,
            help = "Skip the actual description update requests"
        )]
        dry_run: bool,

        #[arg(
            short,
            long,
            value_name = "CODE",
            default_value = "en",
            help = "Catalog language, also selects the link subdomain and preamble"
        )]
        language: String,

        #[arg(
            long,
            help = "Strip links from videos that are no longer in the topic tree"
        )]
        remove_stale: bool,

        #[arg(
            long,
            short,
            value_name = "FILE_PATH",
            help = "Custom path to config file"
        )]
        config: Option<String>,
    },
    #[command(about = "Add the partner credit footer to videos the partner authored")]
    Credits {
        #[arg(
            short = 'n',
            long,
            help = "Skip the actual description update requests"
        )]
        dry_run: bool,

        #[arg(
            long,
            help = "Strip credits from videos that should not carry them"
        )]
        remove_stale: bool,

        #[arg(
            long,
            short,
            value_name = "FILE_PATH",
            help = "Custom path to config file"
        )]
        config: Option<String>,
    },
    #[command(about = "Print one video and its annotation state")]
    Show {
        #[arg(value_name = "VIDEO_ID")]
        video_id: String,

        #[arg(
            long,
            help = "Read the owner's view, which includes the edit link"
        )]
        editable: bool,

        #[arg(
            long,
            short,
            value_name = "FILE_PATH",
            help = "Custom path to config file"
        )]
        config: Option<String>,
    },
    #[command(about = "Obtain a refresh token for the config file")]
    Authorize {
        #[arg(
            long,
            short,
            value_name = "FILE_PATH",
            help = "Custom path to config file"
        )]
        config: Option<String>,
    },
}

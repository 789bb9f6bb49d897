use clap::Parser;

/// This is a review tool for survey respondents.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The spreadsheet containing the survey responses (xlsx or csv).
    /// If not provided, the default dataset data/example.csv is attempted and a
    /// failure to read it leaves the catalog empty.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default inferred from the file extension) The type of the input: 'xlsx' or 'csv'.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, default reviews.json) The file holding the durable review state.
    /// It is read at startup and rewritten after every rating or comment change.
    #[clap(short, long, value_parser)]
    pub state: Option<String>,

    /// The reviewer name to start the session with. It can also be set from within
    /// the session with the 'reviewer' command.
    #[clap(short, long, value_parser)]
    pub reviewer: Option<String>,

    /// If passed as an argument, prints the cross-reviewer summary table and exits
    /// instead of starting an interactive session.
    #[clap(long, takes_value = false)]
    pub summary: bool,

    /// (file path or 'stdout') If specified, the summary of the review round will be
    /// written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, svreview will
    /// check that the produced summary matches the reference.
    #[clap(long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
